//! Error types for the dependency health gate

use thiserror::Error;

/// init-probe error types
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The discovery service endpoint could not be set up
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Dependent services not ready after {0} attempts")]
    AttemptsExhausted(u32),
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

impl From<tonic::Status> for Error {
    fn from(status: tonic::Status) -> Self {
        Self::Rpc(format!("{}: {}", status.code(), status.message()))
    }
}

/// Result type for init-probe operations
pub type Result<T> = std::result::Result<T, Error>;
