use thiserror::Error;

/// Core error types for Ringside operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Secrets error: {0}")]
    Secrets(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Upstream API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl CoreError {
    /// Create a new Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a new Secrets error
    pub fn secrets(message: impl Into<String>) -> Self {
        Self::Secrets(message.into())
    }

    /// Create a new Authentication error (external API rejected credentials)
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    /// Create a new Timeout error
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout(message.into())
    }

    /// Create a new Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Create a new Unauthorized error (caller presented a bad credential)
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Create a new upstream Api error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a new Unknown error
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown(message.into())
    }

    /// Check if this error is a client error (4xx category)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Unauthorized(_))
            || matches!(self, Self::Api { status, .. } if (400..500).contains(status))
    }

    /// Check if this error is a server error (5xx category)
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }

    /// HTTP status code this error surfaces as.
    ///
    /// Upstream failures map to gateway-class codes: an authentication
    /// rejection from the external system is 502 (we could not act on the
    /// caller's behalf), a timeout is 504.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::Authentication(_) => 502,
            Self::Timeout(_) => 504,
            Self::Api { status, .. } if (400..500).contains(status) => *status,
            Self::Api { .. } => 502,
            Self::Config(_)
            | Self::Secrets(_)
            | Self::Network(_)
            | Self::JsonError(_)
            | Self::Unknown(_) => 500,
        }
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) => ErrorCategory::Validation,
            Self::Config(_) => ErrorCategory::Configuration,
            Self::Secrets(_) => ErrorCategory::Secrets,
            Self::Authentication(_) => ErrorCategory::Authentication,
            Self::Timeout(_) => ErrorCategory::Timeout,
            Self::Network(_) => ErrorCategory::Network,
            Self::Unauthorized(_) => ErrorCategory::Unauthorized,
            Self::Api { .. } => ErrorCategory::Upstream,
            Self::JsonError(_) => ErrorCategory::Serialization,
            Self::Unknown(_) => ErrorCategory::Unknown,
        }
    }
}

/// Error categories for monitoring and classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    Secrets,
    Authentication,
    Timeout,
    Network,
    Unauthorized,
    Upstream,
    Serialization,
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Configuration => write!(f, "configuration"),
            Self::Secrets => write!(f, "secrets"),
            Self::Authentication => write!(f, "authentication"),
            Self::Timeout => write!(f, "timeout"),
            Self::Network => write!(f, "network"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Upstream => write!(f, "upstream"),
            Self::Serialization => write!(f, "serialization"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
