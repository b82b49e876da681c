//! Data Transfer Objects for REST request/response serialization.

pub mod admin_dto;
pub mod interest_dto;

pub use admin_dto::*;
pub use interest_dto::*;
