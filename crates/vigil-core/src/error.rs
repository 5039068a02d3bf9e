//! Error types for verification sessions.

use thiserror::Error;

/// Result type alias for configuration validation.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised when a verification session is constructed.
///
/// These are the only fail-fast conditions in the engine. Probe
/// failures during polling are not errors; they are captured in
/// `ProbeOutcome` and surface in the final report.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no probe targets configured")]
    NoTargets,

    #[error("max_attempts must be greater than zero")]
    InvalidMaxAttempts,

    #[error("invalid base url {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("invalid target path {path}: {reason}")]
    InvalidTargetPath { path: String, reason: String },

    #[error("duplicate target path: {0}")]
    DuplicateTarget(String),
}
