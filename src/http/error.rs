//! HTTP error responses
//!
//! Every failure is rendered as `{ "error": <message> }`. Persistence
//! failures are logged with their cause and answered with the endpoint's
//! generic message only.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::AppError;

#[derive(Debug)]
pub enum ApiError {
    /// A service error, with the message to use if it is a persistence failure
    App {
        context: &'static str,
        source: AppError,
    },
    BadRequest(String),
    Internal {
        context: &'static str,
        cause: String,
    },
}

impl ApiError {
    pub fn new(context: &'static str, source: AppError) -> Self {
        ApiError::App { context, source }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::App { source, context } => match source {
                AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                AppError::NotFound { .. } => (StatusCode::NOT_FOUND, source.to_string()),
                AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
                AppError::Persistence(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, (*context).to_string())
                }
            },
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Internal { context, .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, (*context).to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::App {
                context,
                source: AppError::Persistence(err),
            } => tracing::error!(error = %err, "{}", context),
            ApiError::Internal { context, cause } => tracing::error!(error = %cause, "{}", context),
            other => tracing::debug!(error = ?other, "Request rejected"),
        }

        let (status, message) = self.status_and_message();
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
