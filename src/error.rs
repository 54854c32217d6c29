use thiserror::Error;

/// Everything that can stop a single domain lookup from producing a verdict.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("rate limited (HTTP {status})")]
    RateLimited { status: u16 },

    #[error("SSL error: {0}")]
    TransientTransport(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("invalid Content-Type: {content_type}")]
    InvalidContentType { content_type: String, body: String },

    #[error("{source}")]
    MalformedJson {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("{0}")]
    Unexpected(String),
}

impl CheckError {
    /// Rate limiting and TLS handshake failures are the only errors worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CheckError::RateLimited { .. } | CheckError::TransientTransport(_)
        )
    }
}
