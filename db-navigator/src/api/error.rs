//! Transit API error types.

/// Errors that can occur when talking to the transit API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP request failed (DNS, connection, timeout, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Rate limited by the API
    #[error("rate limited by the transit API")]
    RateLimited,

    /// API returned a non-success status
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body was not the expected JSON shape
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Configured base URL cannot carry endpoint paths
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}
