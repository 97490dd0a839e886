use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::errors::ShortenerError;

/// Body of every error response: `{"error": "<message>"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Message shown to clients; backend detail stays in the logs.
const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

impl ShortenerError {
    pub fn public_message(&self) -> &str {
        match self {
            ShortenerError::Backend(_) | ShortenerError::Config(_) => INTERNAL_ERROR_MESSAGE,
            other => other.message(),
        }
    }
}

// Lookups that miss answer 400, not 404, to stay compatible with existing clients.
impl ResponseError for ShortenerError {
    fn status_code(&self) -> StatusCode {
        match self {
            ShortenerError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ShortenerError::Backend(_) | ShortenerError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ShortenerError::InvalidRequest(_)
            | ShortenerError::InvalidUrl(_)
            | ShortenerError::SelfReference(_)
            | ShortenerError::Conflict(_)
            | ShortenerError::NotFound(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            error!("{} {}: {}", self.code(), self.error_type(), self.message());
        }
        HttpResponse::build(self.status_code()).json(ErrorBody::new(self.public_message()))
    }
}
