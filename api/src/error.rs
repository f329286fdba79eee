//! Error types for the Slack Lists API client

use thiserror::Error;

/// Errors that can occur when interacting with the Slack Lists API
#[derive(Debug, Error)]
pub enum ApiError {
    /// No bot token was supplied
    #[error("Missing Slack bot token")]
    MissingToken,

    /// HTTP request failed before a response was received
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response parsing failed
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// Rate limited - too many requests
    #[error("Rate limited by Slack{}", retry_hint(.retry_after_secs))]
    RateLimited {
        /// Seconds to wait before retrying, from the `Retry-After` header
        retry_after_secs: Option<u64>,
    },

    /// Token is invalid, revoked, or lacks a required scope
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Unknown list or item
    #[error("Not found: {0}")]
    NotFound(String),

    /// Slack answered `ok: false` with an error code not covered above
    #[error("Slack API error: {0}")]
    Slack(String),

    /// API returned an unexpected HTTP status
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },
}

fn retry_hint(retry_after_secs: &Option<u64>) -> String {
    retry_after_secs.map_or_else(String::new, |secs| format!(" - retry after {secs}s"))
}

impl ApiError {
    /// Map a Slack `error` code from an `ok: false` body to an error
    #[must_use]
    pub fn from_slack_code(code: &str) -> Self {
        match code {
            "invalid_auth" | "not_authed" | "token_revoked" | "token_expired"
            | "account_inactive" | "missing_scope" | "no_permission" => {
                Self::Unauthorized(code.to_string())
            }
            "list_not_found" | "item_not_found" | "not_found" | "channel_not_found" => {
                Self::NotFound(code.to_string())
            }
            "ratelimited" | "rate_limited" => Self::RateLimited {
                retry_after_secs: None,
            },
            other => Self::Slack(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_codes() {
        for code in ["invalid_auth", "not_authed", "token_revoked", "missing_scope"] {
            assert!(matches!(ApiError::from_slack_code(code), ApiError::Unauthorized(_)));
        }
    }

    #[test]
    fn test_not_found_codes() {
        assert!(matches!(
            ApiError::from_slack_code("list_not_found"),
            ApiError::NotFound(_)
        ));
    }

    #[test]
    fn test_unknown_code_is_preserved() {
        match ApiError::from_slack_code("invalid_arguments") {
            ApiError::Slack(code) => assert_eq!(code, "invalid_arguments"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rate_limit_message() {
        let err = ApiError::RateLimited {
            retry_after_secs: Some(30),
        };
        assert_eq!(err.to_string(), "Rate limited by Slack - retry after 30s");

        let err = ApiError::RateLimited {
            retry_after_secs: None,
        };
        assert_eq!(err.to_string(), "Rate limited by Slack");
    }
}
