use crate::directory_store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, info, warn};

/// Failures of read handlers, rendered as dedicated error pages.
#[derive(Debug, PartialEq, Eq)]
pub enum AppError {
    NotFound,
    Internal,
}

#[derive(Serialize)]
struct ErrorPage {
    page: &'static str,
    status: u16,
    message: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Page not found"),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong"),
        };
        let page = ErrorPage {
            page: "error",
            status: status.as_u16(),
            message,
        };
        (status, Json(page)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => {
                info!("{}", err);
                AppError::NotFound
            }
            StoreError::Validation(e) => {
                warn!("Unexpected validation failure on read: {}", e);
                AppError::Internal
            }
            StoreError::Storage(e) => {
                error!("Storage failure: {}", e);
                AppError::Internal
            }
        }
    }
}

/// Logs a failed write according to its kind.
pub fn log_write_error(action: &str, err: &StoreError) {
    match err {
        StoreError::Validation(e) => warn!("Rejected {}: {}", action, e),
        StoreError::NotFound { .. } => info!("Could not {}: {}", action, err),
        StoreError::Storage(e) => error!("Storage failure during {}: {}", action, e),
    }
}

/// Ids in paths that are not integers cannot name a record.
pub fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse().map_err(|_| {
        info!("Invalid id in path: {}", raw);
        AppError::NotFound
    })
}
