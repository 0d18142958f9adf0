use std::time::Duration;

use axum::{
    http::{header::RETRY_AFTER, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use capjobs_store::StoreError;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error, warn};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid keyword: '{0}'")]
    InvalidKeyword(String),

    #[error("No jobs found for keyword '{0}'")]
    NotFound(String),

    #[error("Rate limit exceeded: {limit} per {window_secs} seconds")]
    RateLimited {
        limit: u32,
        window_secs: u64,
        retry_after: Duration,
    },

    #[error("Not implemented yet")]
    NotImplemented,

    #[error("Not Found")]
    RouteNotFound,

    #[error("{0}")]
    MissingStaticAsset(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidKeyword(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) | AppError::RouteNotFound | AppError::MissingStaticAsset(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::NotImplemented => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Storage(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::Storage(_) | AppError::Internal(_) => error!("{self}"),
            AppError::RateLimited { .. } => warn!("{self}"),
            _ => debug!(%status, "{self}"),
        }

        // Storage and internal failures are logged in full but not echoed back.
        let detail = if status.is_server_error() {
            "Internal Server Error".to_string()
        } else {
            self.to_string()
        };

        let mut response = (status, Json(json!({ "detail": detail }))).into_response();

        if let AppError::RateLimited { retry_after, .. } = self {
            // Round up so clients never retry inside the window.
            let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            if let Ok(value) = HeaderValue::from_str(&secs.max(1).to_string()) {
                response.headers_mut().insert(RETRY_AFTER, value);
            }
        }

        response
    }
}
