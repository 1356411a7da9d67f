//! Error handling for the fastrie library.

use thiserror::Error;

/// Main error type for the fastrie library.
#[derive(Error, Debug)]
pub enum FastrieError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Build input violates the index contract (unsorted keys, reserved byte)
    #[error("invalid input: {message}")]
    InvalidInput {
        /// Error message describing the violation
        message: String,
    },

    /// A serialized index failed validation during load
    #[error("corrupt index: {message}")]
    CorruptIndex {
        /// Error message describing what failed to validate
        message: String,
    },

    /// Index out of bounds access
    #[error("out of bounds: index {index}, size {size}")]
    OutOfBounds {
        /// The invalid index
        index: usize,
        /// The valid size/length
        size: usize,
    },
}

impl FastrieError {
    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a corrupt index error
    pub fn corrupt_index<S: Into<String>>(message: S) -> Self {
        Self::CorruptIndex {
            message: message.into(),
        }
    }

    /// Create an out of bounds error
    pub fn out_of_bounds(index: usize, size: usize) -> Self {
        Self::OutOfBounds { index, size }
    }

    /// Get the error category for logging/metrics
    pub fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::InvalidInput { .. } => "input",
            Self::CorruptIndex { .. } => "corrupt",
            Self::OutOfBounds { .. } => "bounds",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, FastrieError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = FastrieError::invalid_input("keys not sorted");
        assert_eq!(err.category(), "input");
        let display = format!("{}", err);
        assert!(display.contains("invalid input"));
        assert!(display.contains("keys not sorted"));
    }

    #[test]
    fn test_corrupt_index_display() {
        let err = FastrieError::corrupt_index("bad magic");
        assert_eq!(err.category(), "corrupt");
        assert!(format!("{}", err).contains("bad magic"));
    }

    #[test]
    fn test_out_of_bounds_display() {
        let err = FastrieError::out_of_bounds(10, 5);
        assert_eq!(err.category(), "bounds");
        let display = format!("{}", err);
        assert!(display.contains("10"));
        assert!(display.contains("5"));
    }

    #[test]
    fn test_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: FastrieError = io_error.into();
        assert_eq!(err.category(), "io");
        assert!(format!("{}", err).contains("I/O error"));
    }
}
