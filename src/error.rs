use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Typed failure returned by every handler. Each internal operation reports
/// one of these; the status/body mapping happens once, in `IntoResponse`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A unique key (email) is already taken. Reported as 400, matching the
    /// long-standing client contract for duplicate signups.
    #[error("{0}")]
    Conflict(String),

    /// Undifferentiated auth failure: the message never reveals whether the
    /// email exists or the password was wrong.
    #[error("Invalid email or password!")]
    InvalidCredentials,

    /// Missing or malformed required input.
    #[error("{0}")]
    BadRequest(String),

    /// No matching record.
    #[error("{0}")]
    NotFound(String),

    /// Object-store fault; the underlying message is surfaced to the caller.
    #[error("{0}")]
    Storage(String),

    /// Any other internal fault. Logged here, reported as a generic 500 so
    /// nothing internal leaks.
    #[error("Internal server error!")]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Conflict(_)
            | Self::InvalidCredentials
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(e) = &self {
            error!(error = %e, "internal error");
        }
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
