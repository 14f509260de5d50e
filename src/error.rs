//! Error types for surface analysis.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while configuring or running an analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Malformed image dimensions, out-of-range color channel, negative
    /// tolerance or an inconsistent category set. Raised before any scan.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of the violated constraint
        message: String,
    },

    /// Every pixel was classified as background, so the non-background
    /// percentages have no denominator.
    #[error(
        "No non-background area detected: {background_pixels} of {total_pixels} pixels are background"
    )]
    UndefinedPercentage {
        /// Pixels credited to the background category
        background_pixels: u64,
        /// Total pixel count of the image (W×H)
        total_pixels: u64,
    },

    /// Image decoding or encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AnalysisError {
    /// Create an invalid input error with a message.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Whether the caller can still use the partial results.
    ///
    /// Only [`AnalysisError::UndefinedPercentage`] qualifies: the background
    /// share and the annotated image remain valid.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::UndefinedPercentage { .. })
    }

    /// Short message suitable for end-user display.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput { message } => format!("Cannot start the analysis: {}", message),
            Self::UndefinedPercentage { .. } => "No non-background area detected".to_string(),
            Self::Image(e) => format!("Could not read or write the image: {}", e),
            Self::Io(e) => format!("File error: {}", e),
            Self::Config(e) => format!("Invalid configuration: {}", e),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message() {
        let err = AnalysisError::invalid_input("image has zero width");
        assert_eq!(err.to_string(), "Invalid input: image has zero width");
        assert!(!err.is_recoverable());
        assert!(err.user_message().contains("zero width"));
    }

    #[test]
    fn test_undefined_percentage_is_recoverable() {
        let err = AnalysisError::UndefinedPercentage {
            background_pixels: 100,
            total_pixels: 100,
        };
        assert!(err.is_recoverable());
        assert_eq!(err.user_message(), "No non-background area detected");
        assert!(err.to_string().contains("100 of 100"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.png");
        let err: AnalysisError = io.into();
        assert!(matches!(err, AnalysisError::Io(_)));
        assert!(!err.is_recoverable());
    }
}
