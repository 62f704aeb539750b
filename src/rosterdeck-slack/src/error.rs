//! Error types for Slack operations.

use thiserror::Error;

/// Errors that can occur while talking to the Slack API.
#[derive(Error, Debug)]
pub enum SlackError {
    /// Configuration error (missing or invalid config).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Authentication error (invalid or revoked token).
    #[error("Authentication error: {0}")]
    Auth(String),

    /// API request failed.
    #[error("Slack API error: {0}")]
    Api(String),

    /// API rate limited.
    #[error("Rate limited: retry after {retry_after_secs} seconds")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// Channel not found or bot not in channel.
    #[error("Channel error: {0}")]
    Channel(String),

    /// User not found.
    #[error("User error: {0}")]
    User(String),

    /// Network/HTTP error.
    #[error("Network error: {0}")]
    Network(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<reqwest::Error> for SlackError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            SlackError::Network(format!("Connection failed: {}", err))
        } else {
            SlackError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SlackError {
    fn from(err: serde_json::Error) -> Self {
        SlackError::Json(err.to_string())
    }
}

/// Result type for Slack operations.
pub type SlackResult<T> = std::result::Result<T, SlackError>;

/// Map a Slack API error code (e.g. `"channel_not_found"`) to a typed error.
pub(crate) fn api_error(method: &str, code: &str) -> SlackError {
    match code {
        "invalid_auth" | "not_authed" | "account_inactive" | "token_revoked" => {
            SlackError::Auth(format!("{method} failed: {code}"))
        }
        "channel_not_found" | "not_in_channel" | "is_archived" => {
            SlackError::Channel(format!("{method} failed: {code}"))
        }
        "user_not_found" | "user_not_visible" => {
            SlackError::User(format!("{method} failed: {code}"))
        }
        _ => SlackError::Api(format!("{method} failed: {code}")),
    }
}
