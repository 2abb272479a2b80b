use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::error;

use crate::fetch::is_timeout;
use crate::services::signal_api::SignalFeed;

/// Longest upstream body excerpt echoed back to clients.
pub const BODY_PREVIEW_CHARS: usize = 500;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("missing apiKey (set TDATA_API_KEY env)")]
    MissingApiKey,
    #[error("{feed} upstream non-json")]
    NonJson {
        feed: SignalFeed,
        upstream_status: u16,
        body_preview: String,
    },
    #[error("unexpected upstream shape (array not found)")]
    UnexpectedShape { timing_status: u16, phase_status: u16 },
    #[error("upstream timeout")]
    UpstreamTimeout { detail: String },
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Classifies a failed upstream call.
    pub fn from_fetch(err: anyhow::Error) -> Self {
        if is_timeout(&err) {
            ApiError::UpstreamTimeout {
                detail: format!("{err:#}"),
            }
        } else {
            ApiError::Internal(err)
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::MissingApiKey => StatusCode::BAD_REQUEST,
            ApiError::NonJson { .. } | ApiError::UnexpectedShape { .. } => StatusCode::BAD_GATEWAY,
            ApiError::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body: Value = match &self {
            ApiError::NonJson {
                upstream_status,
                body_preview,
                ..
            } => json!({
                "error": self.to_string(),
                "upstreamStatus": upstream_status,
                "bodyPreview": body_preview,
            }),
            ApiError::UnexpectedShape {
                timing_status,
                phase_status,
            } => json!({
                "error": self.to_string(),
                "timingStatus": timing_status,
                "phaseStatus": phase_status,
            }),
            ApiError::UpstreamTimeout { detail } => json!({
                "error": self.to_string(),
                "detail": detail,
            }),
            ApiError::Internal(e) => {
                error!(error = %format!("{e:#}"), "Request failed");
                json!({ "error": "internal server error" })
            }
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
