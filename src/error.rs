//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Startup failures. The service cannot run without a schema snapshot, so
/// these abort the process instead of mapping to a status code.
#[derive(Error, Debug)]
pub enum IntrospectionError {
    #[error("listing tables: {0}")]
    ListTables(#[source] sqlx::Error),
    #[error("describing columns of '{table}': {source}")]
    DescribeColumns {
        table: String,
        #[source]
        source: sqlx::Error,
    },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("unknown table")]
    UnknownTable,
    #[error("record not found")]
    RecordNotFound,
    #[error("field '{0}' has invalid type")]
    Validation(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("internal: {0}")]
    Internal(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::UnknownTable | AppError::RecordNotFound => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            AppError::Validation(_) | AppError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            // 405 carries no body at all.
            AppError::MethodNotAllowed => return StatusCode::METHOD_NOT_ALLOWED.into_response(),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into()),
            AppError::Db(sqlx::Error::RowNotFound) => {
                (StatusCode::NOT_FOUND, "record not found".into())
            }
            // Driver detail stays in the log, never in the response.
            AppError::Db(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into()),
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
