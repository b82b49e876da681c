//! Custom request extractors: admin credential and client origin.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts, Query};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use serde::Deserialize;

use crate::app_state::AppState;
use crate::error::GatewayError;

/// Proof that the request carried the admin shared secret.
///
/// Accepted either as `?password=<secret>` or as
/// `Authorization: Bearer <secret>`. The secret is compared by plain
/// equality; an unset (empty) secret rejects every request.
#[derive(Debug, Clone, Copy)]
pub struct AdminCredential;

#[derive(Debug, Deserialize)]
struct PasswordQuery {
    password: Option<String>,
}

impl FromRequestParts<AppState> for AdminCredential {
    type Rejection = GatewayError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let expected = state.admin_password.as_ref();
        if expected.is_empty() {
            tracing::warn!("admin request rejected: no admin password configured");
            return Err(GatewayError::Unauthorized);
        }

        let from_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_string);

        let from_query = Query::<PasswordQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(q)| q.password);

        let presented = from_header.into_iter().chain(from_query);
        for candidate in presented {
            if candidate == expected {
                return Ok(Self);
            }
        }

        tracing::warn!(path = %parts.uri.path(), "admin request rejected");
        Err(GatewayError::Unauthorized)
    }
}

/// Caller identifier recorded with each interest event: the peer IP
/// address, or `"unknown"` when the server was not started with
/// connect info.
#[derive(Debug, Clone)]
pub struct ClientOrigin(pub String);

impl<S> FromRequestParts<S> for ClientOrigin
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let origin = ConnectInfo::<SocketAddr>::from_request_parts(parts, state)
            .await
            .map_or_else(|_| "unknown".to_string(), |ConnectInfo(addr)| addr.ip().to_string());
        Ok(Self(origin))
    }
}
