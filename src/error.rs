//! Error types for policy construction.
//!
//! Evaluation has no error type: once a [`PolicyEngine`](crate::PolicyEngine)
//! exists, every call to `decide` succeeds. All failures surface here, while
//! the configuration is being loaded or compiled.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias for configuration and construction operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Which list a failing pattern came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// A User-Agent block pattern (preset or custom).
    Block,
    /// A request-path exemption pattern.
    Exempt,
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Block => write!(f, "user agent"),
            Self::Exempt => write!(f, "exempt path"),
        }
    }
}

/// Errors raised while validating configuration or building the engine.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("at least one of preset_categories or custom_patterns must be non-empty")]
    NoBlockPatterns,

    #[error("configuration must be a mapping of field names to values")]
    NotAnObject,

    #[error("{field} must be {expected} if provided")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    #[error("unknown configuration field: {0}{hint}", hint = unknown_field_hint(.0))]
    UnknownField(String),

    #[error("unknown preset category: {0}")]
    UnknownCategory(String),

    #[error("invalid {kind} pattern: {pattern}: {source}")]
    InvalidPattern {
        pattern: String,
        kind: PatternKind,
        #[source]
        source: regex::Error,
    },

    #[error("status_code must be an HTTP status code between 100 and 999, got {0}")]
    InvalidStatusCode(String),

    #[error("redirect_url must not contain control characters: {0:?}")]
    InvalidRedirectUrl(String),

    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Pointer for fields from the flat single-list config format.
fn unknown_field_hint(field: &str) -> &'static str {
    match field {
        "blockedUserAgents" | "blocked_user_agents" => {
            " (list user agent patterns under custom_patterns instead)"
        }
        _ => "",
    }
}
