//! OpenAPI document for every REST endpoint.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::dto::{
    AdminStatsResponse, EmailRowDto, ExportResponse, InterestCountResponse, InterestRowDto,
    LandingResponse, SubscribeRequest, SubscribeResponse, SummaryDto,
};
use crate::api::handlers::{admin, interest, market, system};
use crate::domain::InterestUpdate;
use crate::error::{ErrorBody, ErrorResponse};
use crate::market::MarketSeries;

/// OpenAPI document served at `/api-docs/openapi.json`.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "Landing Gateway API",
        description = "Interest counter, email capture and live count push for a product landing page",
    ),
    paths(
        interest::increment_interest,
        interest::subscribe,
        interest::landing,
        admin::admin_stats,
        admin::export_data,
        market::sp500_data,
        system::health_handler,
    ),
    components(schemas(
        InterestCountResponse,
        SubscribeRequest,
        SubscribeResponse,
        LandingResponse,
        AdminStatsResponse,
        ExportResponse,
        SummaryDto,
        InterestRowDto,
        EmailRowDto,
        MarketSeries,
        InterestUpdate,
        system::HealthResponse,
        ErrorResponse,
        ErrorBody,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "Interest", description = "Visitor interest and subscriptions"),
        (name = "Admin", description = "Password-protected dashboard and export"),
        (name = "Market", description = "S&P 500 chart data"),
        (name = "System", description = "Health check"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` scheme referenced by the admin endpoints.
#[derive(Debug)]
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}
