//! Error types for the djset-ai HTTP surface
//!
//! Every error response uses the `{ "success": false, "error": "..." }`
//! envelope, except missing catalog authentication, which redirects the
//! browser to `/login`.

use crate::catalog::CatalogError;
use crate::services::PipelineError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Where unauthenticated users are sent
pub const LOGIN_PATH: &str = "/login";

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Catalog login needed (303 to /login)
    #[error("Catalog authentication required")]
    AuthenticationRequired,

    /// Internal server error (500)
    #[error("{0}")]
    Internal(String),
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Validation(e) => ApiError::BadRequest(e.to_string()),
            PipelineError::CorpusNotFound(_) => ApiError::NotFound(err.to_string()),
            PipelineError::AuthenticationRequired => ApiError::AuthenticationRequired,
            PipelineError::Configuration(_)
            | PipelineError::GenerationBackend(_)
            | PipelineError::Catalog(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotAuthenticated => ApiError::AuthenticationRequired,
            CatalogError::NotFound(_) => ApiError::NotFound(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::AuthenticationRequired => StatusCode::SEE_OTHER,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::AuthenticationRequired = self {
            return Redirect::to(LOGIN_PATH).into_response();
        }

        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::GenerationError;
    use crate::models::BriefError;

    #[test]
    fn test_pipeline_error_status_mapping() {
        let cases = [
            (PipelineError::Validation(BriefError::MissingFields(vec!["venue"])), StatusCode::BAD_REQUEST),
            (PipelineError::CorpusNotFound("DJ Set Corpus".to_string()), StatusCode::NOT_FOUND),
            (PipelineError::AuthenticationRequired, StatusCode::SEE_OTHER),
            (PipelineError::Configuration("no key".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                PipelineError::GenerationBackend(GenerationError::Network("timeout".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                PipelineError::Catalog(CatalogError::Api(502, "bad gateway".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status_code(), expected);
        }
    }

    #[test]
    fn test_auth_required_redirects_to_login() {
        let response = ApiError::AuthenticationRequired.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], LOGIN_PATH);
    }

    #[test]
    fn test_validation_message_kept() {
        let err = ApiError::from(PipelineError::Validation(BriefError::MissingFields(vec!["style"])));
        assert_eq!(err.to_string(), "Missing required fields: style");
    }
}
