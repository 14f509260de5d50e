//! Color matching tolerance.

use crate::constants::MAX_TOLERANCE;
use crate::error::{AnalysisError, Result};

/// Maximum allowed per-channel absolute difference for a color match.
///
/// Shared by every category and every channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Tolerance(u8);

impl Tolerance {
    /// Exact color equality.
    pub const EXACT: Self = Self(0);

    /// Build a tolerance from a raw signed value.
    ///
    /// Negative values are rejected. Values above 255 behave exactly like 255
    /// since no channel difference can exceed it, so they are saturated.
    pub fn new(value: i64) -> Result<Self> {
        if value < 0 {
            return Err(AnalysisError::invalid_input(format!(
                "tolerance must be non-negative, got {}",
                value
            )));
        }
        Ok(Self(u8::try_from(value).unwrap_or(MAX_TOLERANCE)))
    }

    /// The tolerance as a channel difference.
    pub fn value(self) -> u8 {
        self.0
    }
}

impl From<u8> for Tolerance {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Tolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_rejected() {
        let err = Tolerance::new(-1).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput { .. }));
    }

    #[test]
    fn test_large_values_saturate() {
        assert_eq!(Tolerance::new(255).unwrap().value(), 255);
        assert_eq!(Tolerance::new(1000).unwrap().value(), 255);
    }

    #[test]
    fn test_zero_is_exact() {
        assert_eq!(Tolerance::new(0).unwrap(), Tolerance::EXACT);
    }
}
