//! Global constants for plan surface analysis

/// Tolerance used when none is configured
pub const DEFAULT_TOLERANCE: i64 = 10;

/// Upper bound of the tolerance slider in interactive front-ends.
/// Larger values are accepted but match almost every color.
pub const MAX_UI_TOLERANCE: i64 = 150;

/// Largest meaningful tolerance; channel differences never exceed it
pub const MAX_TOLERANCE: u8 = u8::MAX;

/// Width of the stacked proportion bar, in percent
pub const BAR_SPAN: f64 = 100.0;

/// Tolerance allowed when checking that percentages sum to 100
pub const PERCENT_EPSILON: f64 = 1e-9;

/// Suffix appended to the input file stem for the annotated output
pub const ANNOTATED_SUFFIX: &str = "_annotated";
