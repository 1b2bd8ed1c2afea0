//! Error handling for DeltaDsp
//!
//! Format errors surface synchronously from `set_format`/`resolve`; the
//! per-buffer path can only fail when no format has been resolved yet or
//! when the caller hands over mismatched buffers.

use thiserror::Error;

/// Result type alias for DeltaDsp operations
pub type Result<T> = std::result::Result<T, DeltaError>;

/// Main error type for DeltaDsp operations
#[derive(Error, Debug)]
pub enum DeltaError {
    // Negotiation Errors
    #[error("Unsupported sample format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Invalid channel count: {channels} (must be at least 1)")]
    InvalidChannelCount { channels: usize },

    // Processing Errors
    #[error("Buffer transform requested before a sample format was resolved")]
    NotResolved,

    #[error("Buffer size mismatch: input is {input} bytes, output is {output} bytes")]
    BufferSizeMismatch { input: usize, output: usize },

    // Configuration Errors
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    // File Errors
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid audio file: {reason}")]
    InvalidAudio {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DeltaError {
    /// Shorthand for an unsupported format with a formatted description
    pub fn unsupported(format: impl Into<String>) -> Self {
        DeltaError::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Shorthand for a rejected parameter value
    pub fn invalid_param(name: impl Into<String>, reason: impl Into<String>) -> Self {
        DeltaError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            DeltaError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            DeltaError::InvalidChannelCount { .. } => "INVALID_CHANNEL_COUNT",
            DeltaError::NotResolved => "NOT_RESOLVED",
            DeltaError::BufferSizeMismatch { .. } => "BUFFER_SIZE_MISMATCH",
            DeltaError::InvalidParameter { .. } => "INVALID_PARAMETER",
            DeltaError::FileNotFound { .. } => "FILE_NOT_FOUND",
            DeltaError::InvalidAudio { .. } => "INVALID_AUDIO",
            DeltaError::Io(_) => "IO_ERROR",
            DeltaError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recoverable
    ///
    /// A rejected format or parameter leaves the filter usable; calling
    /// `transform` while unresolved is a precondition violation.
    pub fn is_recoverable(&self) -> bool {
        match self {
            DeltaError::UnsupportedFormat { .. } => true,
            DeltaError::InvalidChannelCount { .. } => true,
            DeltaError::InvalidParameter { .. } => true,
            DeltaError::FileNotFound { .. } => true,
            DeltaError::InvalidAudio { .. } => true,
            _ => false,
        }
    }
}
