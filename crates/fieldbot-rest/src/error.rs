//! REST error types

/// Errors from the Discord REST API
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// Transport-level failure (connect, TLS, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the API
    #[error("Discord API error {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
}
