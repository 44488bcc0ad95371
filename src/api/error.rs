//! Error to HTTP response mapping.
//!
//! Every error body is `{"detail": "<message>"}`. Server-side failures are
//! logged and answered with a generic message.

use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

/// HTTP status for an error.
#[must_use]
pub const fn status_code(err: &Error) -> StatusCode {
    match err {
        Error::Validation { .. } | Error::Spreadsheet { .. } | Error::DateOutOfRange { .. } => {
            StatusCode::BAD_REQUEST
        }
        Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
        Error::ProductNotFound { .. }
        | Error::MemberNotFound { .. }
        | Error::CoachNotFound { .. }
        | Error::AdminNotFound { .. } => StatusCode::NOT_FOUND,
        Error::Conflict { .. } => StatusCode::CONFLICT,
        Error::Config { .. }
        | Error::Database(_)
        | Error::Io(_)
        | Error::SpreadsheetWrite { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = status_code(&self);
        let detail = if status.is_server_error() {
            error!("Request failed: {self}");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(ErrorBody { detail })).into_response()
    }
}
