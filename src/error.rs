use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
};
use thiserror::Error;

use crate::models::PeriodError;

/// Error shape every handler returns: a status and `{"detail": ...}`.
pub type ApiError = (StatusCode, Json<serde_json::Value>);

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Failed to build stats API client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Stats API request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Stats API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode stats API response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("Period '{period}' is not available for personal insight")]
    UnsupportedPeriod { period: &'static str },
}

impl UpstreamError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UnsupportedPeriod { .. } => StatusCode::BAD_REQUEST,
            Self::Client(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Request(_) | Self::Status { .. } | Self::Decode(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

pub fn detail(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(serde_json::json!({"detail": message.into()})))
}

pub fn upstream_error(error: UpstreamError) -> ApiError {
    let status = error.status_code();
    if status.is_server_error() {
        tracing::error!("Stats API call failed: {}", error);
    }
    detail(status, error.to_string())
}

pub fn json_rejection(rejection: JsonRejection) -> ApiError {
    detail(rejection.status(), rejection.body_text())
}

pub fn query_rejection(rejection: QueryRejection) -> ApiError {
    detail(rejection.status(), rejection.body_text())
}

pub fn period_error(error: PeriodError) -> ApiError {
    detail(StatusCode::BAD_REQUEST, error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_status_errors_map_to_bad_gateway() {
        let error = UpstreamError::Status {
            status: 503,
            body: "down".to_string(),
        };
        let (status, Json(body)) = upstream_error(error);

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["detail"], "Stats API returned 503: down");
    }

    #[test]
    fn unsupported_period_is_a_client_error() {
        let (status, _) = upstream_error(UpstreamError::UnsupportedPeriod { period: "lastWeek" });
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn period_errors_carry_their_message() {
        let (status, Json(body)) = period_error(PeriodError::InvalidDate("x".to_string()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Invalid date 'x'. Expected YYYY-MM-DD");
    }
}
