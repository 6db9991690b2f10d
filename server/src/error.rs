//! API errors and their JSON responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mail_merge::MailMergeError;
use serde::Serialize;
use thiserror::Error;

/// Body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Errors returned by the handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request input
    #[error("{0}")]
    BadRequest(String),

    /// A sample asset or static file does not exist
    #[error("{0}")]
    NotFound(String),

    /// The batch failed
    #[error("Error al procesar: {0}")]
    Merge(#[from] MailMergeError),

    /// Reading or writing scratch files failed
    #[error("Error al procesar: {0}")]
    Io(#[from] std::io::Error),

    /// Any other failure, with its full client-facing message
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Merge(_) | ApiError::Io(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// `error: cause: cause ...` for logging
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut chain = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    chain
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", error_chain(&self));
        } else {
            tracing::warn!("{} {}", status.as_u16(), self);
        }

        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(MailMergeError::RecordNotFound(1)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        let err = ApiError::from(MailMergeError::UnsupportedFormat("a.txt".into()));
        assert_eq!(err.to_string(), "Error al procesar: Unsupported file format: a.txt");
        assert_eq!(
            ApiError::BadRequest("Faltan archivos requeridos".into()).to_string(),
            "Faltan archivos requeridos"
        );
    }

    #[test]
    fn test_error_chain_includes_sources() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err = ApiError::from(MailMergeError::from(io));
        let chain = error_chain(&err);
        assert!(chain.starts_with("Error al procesar: IO error: disk full: "));
        assert!(chain.ends_with(": disk full"));
    }
}
