use ringside_core::CoreError;
use ringside_secrets::SecretsError;
use thiserror::Error;

/// Errors from PSA API calls.
#[derive(Debug, Error)]
pub enum PsaError {
    /// The PSA rejected our credentials, even after one re-authentication.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    /// Non-retryable HTTP failure from the PSA.
    #[error("PSA API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The PSA answered but the body was not what we expect.
    #[error("Invalid PSA response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Secrets(#[from] SecretsError),
}

impl PsaError {
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }
}

impl From<PsaError> for CoreError {
    fn from(err: PsaError) -> Self {
        match err {
            PsaError::Authentication(m) => CoreError::Authentication(m),
            PsaError::Timeout(m) => CoreError::Timeout(m),
            PsaError::Network(m) => CoreError::Network(m),
            PsaError::Api { status, message } => CoreError::Api { status, message },
            PsaError::InvalidResponse(m) => CoreError::Unknown(m),
            PsaError::Secrets(e) => CoreError::Secrets(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_preserves_error_kind() {
        let core: CoreError = PsaError::authentication("rejected").into();
        assert_eq!(core.status_code(), 502);

        let core: CoreError = PsaError::timeout("5000ms elapsed").into();
        assert_eq!(core.status_code(), 504);

        let core: CoreError = PsaError::api(422, "bad search").into();
        assert_eq!(core.status_code(), 422);

        let core: CoreError = PsaError::Secrets(SecretsError::fetch_failed("nope")).into();
        assert!(matches!(core, CoreError::Secrets(_)));
    }
}
