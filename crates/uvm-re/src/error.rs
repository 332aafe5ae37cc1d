//! Error types for uvm-re.
//!
//! A failed compilation is the only error this crate produces. A subject
//! that simply does not match is not an error; match operations return
//! `Ok(false)` for that case so callers can always tell the two apart.

use thiserror::Error;

/// The error type for regex-cache operations.
#[derive(Debug, Error)]
pub enum ReError {
    /// The pattern text is not a valid regular expression.
    ///
    /// `pattern` is the caller's original input, delimiters included, so the
    /// message line can be grepped out of simulator logs verbatim.
    #[error("regex compiler: invalid glob or regular expression: |{pattern}|")]
    Compile {
        /// The offending pattern as the caller supplied it.
        pattern: String,
        /// The underlying engine error.
        #[source]
        source: regex::Error,
    },
}

impl ReError {
    /// Create a compile error for the given original input.
    pub fn compile(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::Compile {
            pattern: pattern.into(),
            source,
        }
    }

    /// Get the pattern that failed to compile.
    #[must_use]
    pub fn pattern(&self) -> &str {
        match self {
            Self::Compile { pattern, .. } => pattern,
        }
    }
}

/// Result type alias for uvm-re operations.
pub type Result<T> = std::result::Result<T, ReError>;
