//! Error kinds surfaced to tool callers

use slack_lists_api::ApiError;
use thiserror::Error;

/// Errors produced by list operations
///
/// Every variant maps to a stable [`kind`](ListsError::kind) token so callers
/// can branch on the failure class without parsing messages.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ListsError {
    /// Malformed input, caught before any external call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid or revoked credential
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Unknown list or item
    #[error("Not found: {0}")]
    NotFound(String),

    /// Slack is throttling requests
    #[error("Rate limited by Slack: {}", rate_limit_guidance(.retry_after_secs))]
    RateLimit {
        /// Seconds Slack asked us to wait, if it said
        retry_after_secs: Option<u64>,
    },

    /// Export format other than json or csv
    #[error("Unsupported export format: {0}. Use 'json' or 'csv'")]
    UnsupportedFormat(String),

    /// Transport failure or an unmapped Slack error code
    #[error("Slack service error: {0}")]
    Service(String),
}

fn rate_limit_guidance(retry_after_secs: &Option<u64>) -> String {
    match retry_after_secs {
        Some(secs) => format!("retry after {secs}s or increase rate_limit_delay"),
        None => "wait before retrying or increase rate_limit_delay".to_string(),
    }
}

impl ListsError {
    /// Build a validation error
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Stable snake_case token for the error class
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Auth(_) => "auth_error",
            Self::NotFound(_) => "not_found_error",
            Self::RateLimit { .. } => "rate_limit_error",
            Self::UnsupportedFormat(_) => "unsupported_format_error",
            Self::Service(_) => "service_error",
        }
    }
}

impl From<ApiError> for ListsError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::MissingToken => Self::Auth(err.to_string()),
            ApiError::Unauthorized(code) => Self::Auth(code),
            ApiError::NotFound(what) => Self::NotFound(what),
            ApiError::RateLimited { retry_after_secs } => Self::RateLimit { retry_after_secs },
            ApiError::RequestFailed(_)
            | ApiError::ResponseParseFailed(_)
            | ApiError::Slack(_)
            | ApiError::ApiError { .. } => Self::Service(err.to_string()),
        }
    }
}
