//! Error types for the VBAN text client

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),
}

/// Endpoint resolution and config file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("must provide a host with --host flag or config.toml")]
    MissingHost,

    #[error("unable to locate {}", .0.display())]
    NotFound(PathBuf),

    #[error("unable to determine home directory")]
    NoHomeDir,

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Network errors
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Address resolution failed for {addr}: {reason}")]
    ResolveFailed { addr: String, reason: String },

    #[error("Socket bind failed: {0}")]
    BindFailed(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Packet too large: {0} bytes")]
    PacketTooLarge(usize),
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, Error>;
