//! Error handling for the Graphgen code generation library.
//!
//! This module defines the main error type `Error` used throughout the
//! library, along with a convenient `Result` type alias. It uses
//! `thiserror` and implements conversions from common error types.
//!
//! The absence of a configuration file is an expected condition that
//! callers recover from by substituting defaults, so it gets its own
//! variant instead of being folded into `Io`.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for Graphgen generation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Graphgen generation operations
#[derive(Debug, Error)]
pub enum Error {
    /// No configuration file at the given path; recoverable by defaults
    #[error("config file not found at {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Schema source error
    #[error("schema error: {0}")]
    Schema(String),

    /// Template engine error
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// Configuration error
    #[error("invalid config: {0}")]
    Config(String),

    /// Code generation error
    #[error("generation failed: {0}")]
    Codegen(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new schema error
    pub fn schema<S: Into<String>>(msg: S) -> Self {
        Self::Schema(msg.into())
    }

    /// Create a new code generation error
    pub fn codegen<S: Into<String>>(msg: S) -> Self {
        Self::Codegen(msg.into())
    }

    /// Whether this is the recoverable "no config file" condition, as
    /// opposed to a load failure that must be surfaced to the user.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ConfigNotFound(_))
    }
}
