use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use shared::ErrorResponse;
use thiserror::Error;

/// Failure of one relay call. Every variant is reported to the client as a
/// 500 with an `{ "error": ... }` body.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Upstream inference URL is not configured")]
    UpstreamNotConfigured,
    #[error("Invalid upload body: {0}")]
    Multipart(String),
    #[error("Failed to connect to the API: {0}")]
    Unreachable(#[from] reqwest::Error),
    #[error("Upstream responded with status {0}")]
    Rejected(u16),
    #[error("Invalid JSON response from server: {0}")]
    InvalidJson(String),
}

impl ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
