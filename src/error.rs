//! Error types for rs-readable.
//!
//! Every failure is a value returned to the caller. Resource guard violations
//! abort the extraction that hit them and never carry a partial result.

use std::time::Duration;

/// Error type for extraction operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The raw input is larger than the processor accepts.
    #[error("input too large: {size} bytes exceeds limit of {max} bytes")]
    InputTooLarge { size: usize, max: usize },

    /// Tree traversal went deeper than the configured maximum.
    #[error("document nesting exceeds maximum depth of {max}")]
    DepthExceeded { max: usize },

    /// The extraction did not finish inside its time budget.
    #[error("processing timed out after {budget:?}")]
    ProcessingTimeout { budget: Duration },

    /// The upstream tree builder produced no usable tree.
    #[error("HTML parsing failed: {0}")]
    ParseError(String),

    /// A configuration value was rejected.
    #[error("invalid configuration: {field} - {reason}")]
    InvalidConfig { field: String, reason: String },

    /// The extraction was cancelled by its batch (fail-fast policy).
    #[error("extraction cancelled")]
    Cancelled,

    /// The batch worker pool could not be created.
    #[error("worker pool unavailable: {0}")]
    WorkerPool(String),
}

impl Error {
    pub(crate) fn invalid_config(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig { field: field.to_string(), reason: reason.into() }
    }
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InputTooLarge { size: 20, max: 10 };
        assert!(err.to_string().contains("20 bytes"));

        let err = Error::invalid_config("inline_image_format", "unknown mode 'svg'");
        assert_eq!(err.to_string(), "invalid configuration: inline_image_format - unknown mode 'svg'");
    }

    #[test]
    fn test_depth_exceeded_names_limit() {
        let err = Error::DepthExceeded { max: 64 };
        assert!(err.to_string().contains("64"));
    }
}
