use thiserror::Error;

/// Errors returned by the TrueNAS API client.
///
/// SECURITY: Error messages must NEVER contain the API key.
#[derive(Debug, Error)]
pub enum TrueNasError {
    /// API key rejected (401/403)
    #[error("authentication failed: {message}")]
    Auth { message: String },

    /// API returned a non-success response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The addressed object does not exist (404)
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },

    /// Network-level error (connection failed, timeout, etc.)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body could not be decoded
    #[error("failed to decode response: {message}")]
    Decode { message: String },
}

impl TrueNasError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, TrueNasError::NotFound { .. })
    }
}
