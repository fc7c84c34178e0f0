//! Core error types for Periscope

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the Periscope ecosystem
#[derive(Error, Debug)]
pub enum PeriError {
    /// Connection error
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Connection-related errors surfaced by a realtime client
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// Credential was rejected by the endpoint
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// Endpoint refused or could not be reached
    #[error("Connection refused: {0}")]
    ConnectionRefused(String),

    /// Connection dropped mid-stream
    #[error("Connection lost: {0}")]
    ConnectionLost(String),

    /// Operation attempted on a closed client
    #[error("Client is closed")]
    Closed,

    /// Command could not be delivered
    #[error("Send failed: {0}")]
    SendFailed(String),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Invalid configuration
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialize error
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
