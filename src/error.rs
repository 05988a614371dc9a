//! Error taxonomy for tool invocations.
//!
//! Every adapter fails with one of four kinds, all raised from `invoke`
//! and passed to the caller unmodified:
//! - **Configuration**: the credential is missing (no request was sent)
//! - **Validation**: the arguments do not match the tool's schema (no request was sent)
//! - **Transport**: the provider answered with a non-success status, an
//!   undecodable body, or never answered at all
//! - **ResponseShape**: the provider answered with valid JSON that lacks
//!   the field(s) the tool needs

use std::fmt;

use thiserror::Error;

/// Marker used when the provider's error body itself cannot be read.
pub const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0}")]
    Configuration(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("FAL response did not include {expected}")]
    ResponseShape { expected: &'static str },
}

impl ToolError {
    /// Short machine-readable name of the error kind (used in logs).
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::Configuration(_) => "configuration",
            ToolError::Validation(_) => "validation",
            ToolError::Transport(_) => "transport",
            ToolError::ResponseShape { .. } => "response_shape",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    /// The provider answered outside the 2xx range.
    #[error("FAL request failed: {status} {message}")]
    Status { status: u16, message: String },

    /// A 2xx answer whose body is not JSON.
    #[error("FAL returned a malformed body ({status}): {reason}")]
    MalformedBody { status: u16, reason: String },

    /// The request never produced a response (DNS, connect, TLS, reset).
    #[error("FAL request could not be sent: {0}")]
    Request(String),
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } | TransportError::MalformedBody { status, .. } => {
                Some(*status)
            }
            TransportError::Request(_) => None,
        }
    }
}

/// One field that failed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldIssue {
    /// Dotted path to the field, e.g. `voices[1].turn_prefix`
    pub path: String,
    /// Human description of the expected shape
    pub expected: String,
    /// What was actually found (`missing`, `null`, `number`, ...)
    pub found: String,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: expected {}, found {}", self.path, self.expected, self.found)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub tool: String,
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// Whether any issue concerns the given field path.
    pub fn mentions(&self, path: &str) -> bool {
        self.issues.iter().any(|i| i.path == path)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid arguments for tool '{}': ", self.tool)?;
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
