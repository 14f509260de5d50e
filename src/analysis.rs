//! Single entry point running the classifier then the aggregator.

use image::RgbImage;

use crate::aggregator::{SurfaceReport, aggregate};
use crate::classifier::{LogObserver, ScanObserver, SurfaceCounts, classify_with_observer};
use crate::config::{AnalysisConfig, ValidatedConfig};
use crate::error::Result;

/// Everything an analysis run produces.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// Source image with annotated categories repainted
    pub annotated: RgbImage,
    /// Pixels credited to each category
    pub counts: SurfaceCounts,
    /// Percentages and proportion bar
    pub report: SurfaceReport,
}

/// Validate `config` and analyze `source`.
///
/// Invalid configuration or an empty image fails before scanning. An
/// all-background image succeeds with undefined detailed percentages; use
/// [`SurfaceReport::ensure_defined`] to treat that as an error.
pub fn analyze(source: &RgbImage, config: &AnalysisConfig) -> Result<AnalysisOutcome> {
    let validated = config.validate()?;
    analyze_validated(source, &validated, &mut LogObserver::default())
}

/// Analyze `source` with an already validated configuration.
pub fn analyze_validated(
    source: &RgbImage,
    config: &ValidatedConfig,
    observer: &mut dyn ScanObserver,
) -> Result<AnalysisOutcome> {
    let classification =
        classify_with_observer(source, &config.categories, config.tolerance, observer)?;
    let report = aggregate(&classification.counts, &config.categories)?;

    Ok(AnalysisOutcome {
        annotated: classification.annotated,
        counts: classification.counts,
        report,
    })
}
