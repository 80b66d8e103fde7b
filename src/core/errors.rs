use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Connection, TLS, timeout or body-read failure from the transport.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The body was not valid JSON or did not match the expected shape.
    #[error("{context}: {source}")]
    DecodeError {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The envelope carried a non-success `code`.
    #[error("API error: {code} - {message}")]
    ApiError { code: String, message: String },

    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The system clock is before the Unix epoch.
    #[error("Clock error: {0}")]
    ClockError(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::core::config::ConfigError),
}

impl ExchangeError {
    pub(crate) fn decode(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::DecodeError {
            context: context.into(),
            source,
        }
    }

    /// True for failures that happened before a response body was obtained.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::HttpError(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::HttpError(e) if e.is_timeout())
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::DecodeError { .. })
    }

    /// The exchange-defined error code, if this is an application error.
    pub fn api_code(&self) -> Option<&str> {
        match self {
            Self::ApiError { code, .. } => Some(code),
            _ => None,
        }
    }
}
