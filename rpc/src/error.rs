//! RPC error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use shadow_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("metrics are disabled")]
    MetricsDisabled,

    #[error("store error: {0}")]
    Store(String),

    #[error("server error: {0}")]
    Server(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl RpcError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::AccountNotFound(_) | Self::MetricsDisabled => StatusCode::NOT_FOUND,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) | Self::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Internal details go to the log, not to the client.
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<StoreError> for RpcError {
    fn from(e: StoreError) -> Self {
        RpcError::Store(e.to_string())
    }
}
