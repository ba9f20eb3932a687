//! Common error types for Clubhouse clients

/// Common result type
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type shared by the client crates
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Cookie error: {0}")]
    Cookie(String),
}

impl Error {
    /// Short machine-readable code, used in structured log fields
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Configuration(_) => "CONFIGURATION_ERROR",
            Error::Cookie(_) => "COOKIE_ERROR",
        }
    }
}
