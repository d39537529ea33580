//! HTTP request handlers

pub mod health;
pub mod objects;
pub mod upload;

use actix_web::HttpResponse;
use serde::Serialize;
use utoipa::ToSchema;

/// Error envelope returned by every failing endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { error: message.into() }
    }
}

pub(crate) fn internal_error(message: &str) -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse::new(message))
}
