/// Errors that can occur when talking to the monitoring backend's read API.
///
/// # Examples
///
/// ```rust
/// use promtap_source::error::SourceError;
///
/// let err = SourceError::InvalidAddress("not a url".to_string());
/// assert!(err.to_string().contains("not a url"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP-level error: non-2xx status code from the backend.
    #[error("source API HTTP error: status={status}, body={body}")]
    Http { status: u16, body: String },

    /// The backend returned a 2xx status but the response envelope reports
    /// a logical error.
    #[error("source API error: type={error_type}, message={message}")]
    Api {
        error_type: String,
        message: String,
    },

    /// An underlying HTTP transport error from `reqwest`.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON deserialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configured source address is not a valid URL.
    #[error("invalid source address: {0}")]
    InvalidAddress(String),
}

/// Convenience type alias so callers can write `error::Result<T>`.
pub type Result<T> = std::result::Result<T, SourceError>;
