/// Failures of the HTTP call to the verification authority.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiClientError {
    #[error("Failed to construct the HTTP client")]
    ClientConstructionFailed,
    #[error("Failed to encode the verification request")]
    RequestEncodingFailed,
    #[error("Invalid verification endpoint URL: {0}")]
    InvalidUrl(String),
    #[error("Verification request timed out")]
    RequestTimeoutReceived,
    #[error("Could not reach the verification service")]
    ConnectionFailed,
    #[error("Verification service responded with status {status_code}")]
    UnexpectedStatus {
        status_code: u16,
        message: Option<String>,
    },
    #[error("Failed to read the verification response")]
    ResponseReadFailed,
}

impl ApiClientError {
    /// Text suitable for a user-facing notification. Prefers the message the
    /// verification service put in its error body.
    pub fn user_message(&self) -> String {
        match self {
            Self::UnexpectedStatus {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    #[error("A transaction id is required for verification")]
    MissingTransactionId,
    #[error("Verification request is invalid: {0}")]
    InvalidRequest(String),
    #[error("Verification service call failed")]
    TransportFailure,
}
