//! Per-pixel color classification.
//!
//! Every pixel is compared against the reference colors of a
//! [`CategorySet`] in its configured order. The first category whose
//! tolerance window contains the pixel is credited, and no further category
//! is tried, so a pixel is counted at most once even when windows overlap.
//! Pixels credited to an annotated category are repainted with its marker
//! color in a copy of the source; everything else keeps its source color.

use image::{Rgb as Pixel, RgbImage};
use serde::Serialize;
use web_time::Instant;

use crate::color_utils::{Rgb, colors_match};
use crate::error::{AnalysisError, Result};
use crate::model::{CategorySet, Tolerance};

/// Pixel counts per category, in category order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurfaceCounts {
    counts: Vec<u64>,
    total_pixels: u64,
}

impl SurfaceCounts {
    /// Zeroed counts for `categories` categories over `total_pixels` pixels.
    pub fn new(categories: usize, total_pixels: u64) -> Self {
        Self {
            counts: vec![0; categories],
            total_pixels,
        }
    }

    /// Build counts from known values.
    ///
    /// Fails when the counts add up to more than `total_pixels`.
    pub fn from_counts(counts: Vec<u64>, total_pixels: u64) -> Result<Self> {
        let matched: u64 = counts.iter().sum();
        if matched > total_pixels {
            return Err(AnalysisError::invalid_input(format!(
                "counts add up to {} but the image only has {} pixels",
                matched, total_pixels
            )));
        }
        Ok(Self {
            counts,
            total_pixels,
        })
    }

    fn increment(&mut self, index: usize) {
        self.counts[index] += 1;
    }

    /// Count of the category at `index` (0 when out of range).
    pub fn get(&self, index: usize) -> u64 {
        self.counts.get(index).copied().unwrap_or(0)
    }

    /// All counts in category order.
    pub fn as_slice(&self) -> &[u64] {
        &self.counts
    }

    /// Number of categories tracked.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no category is tracked.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Image size in pixels (W×H).
    pub fn total_pixels(&self) -> u64 {
        self.total_pixels
    }

    /// Pixels credited to some category.
    pub fn matched_pixels(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Pixels no category matched.
    pub fn unmatched_pixels(&self) -> u64 {
        self.total_pixels - self.matched_pixels()
    }
}

/// Result of a scan: counts plus the annotated copy of the image.
#[derive(Debug, Clone)]
pub struct Classification {
    /// Pixels credited to each category
    pub counts: SurfaceCounts,
    /// Source image with matched annotated pixels repainted
    pub annotated: RgbImage,
}

/// Receives busy notifications around a scan.
///
/// No partial results are reported; the scan either finishes or fails
/// before starting.
pub trait ScanObserver {
    /// Called once the inputs are validated, before the first pixel.
    fn scan_started(&mut self, _width: u32, _height: u32) {}

    /// Called after the last pixel.
    fn scan_finished(&mut self, _counts: &SurfaceCounts) {}
}

/// Silent observer.
impl ScanObserver for () {}

/// Observer that reports progress through the `log` facade.
#[derive(Debug, Default)]
pub struct LogObserver {
    started: Option<Instant>,
}

impl ScanObserver for LogObserver {
    fn scan_started(&mut self, width: u32, height: u32) {
        self.started = Some(Instant::now());
        log::debug!("Analysis started on {}x{} image", width, height);
    }

    fn scan_finished(&mut self, counts: &SurfaceCounts) {
        let elapsed = self.started.map(|t| t.elapsed()).unwrap_or_default();
        log::debug!(
            "Analysis finished in {:?}: {} of {} pixels matched",
            elapsed,
            counts.matched_pixels(),
            counts.total_pixels()
        );
    }
}

/// Index of the first category whose reference matches `color`.
#[inline]
pub fn match_pixel(color: Rgb, categories: &CategorySet, tolerance: Tolerance) -> Option<usize> {
    categories
        .iter()
        .position(|c| colors_match(color, c.reference, tolerance.value()))
}

/// Classify every pixel of `source`.
pub fn classify(
    source: &RgbImage,
    categories: &CategorySet,
    tolerance: Tolerance,
) -> Result<Classification> {
    classify_with_observer(source, categories, tolerance, &mut ())
}

/// Classify every pixel of `source`, notifying `observer` around the scan.
///
/// Fails with [`AnalysisError::InvalidInput`] when the image has a zero
/// dimension.
pub fn classify_with_observer(
    source: &RgbImage,
    categories: &CategorySet,
    tolerance: Tolerance,
    observer: &mut dyn ScanObserver,
) -> Result<Classification> {
    let (width, height) = source.dimensions();
    if width == 0 || height == 0 {
        return Err(AnalysisError::invalid_input(format!(
            "image must have non-zero dimensions, got {}x{}",
            width, height
        )));
    }

    let markers: Vec<Option<Pixel<u8>>> = categories.iter().map(|c| c.marker.map(Pixel)).collect();
    let mut counts = SurfaceCounts::new(categories.len(), u64::from(width) * u64::from(height));
    let mut annotated = source.clone();

    observer.scan_started(width, height);

    for (dst, src) in annotated.pixels_mut().zip(source.pixels()) {
        let Some(index) = match_pixel(src.0, categories, tolerance) else {
            continue;
        };
        counts.increment(index);
        // Background has no marker and keeps its source color
        if let Some(marker) = markers[index] {
            *dst = marker;
        }
    }

    observer.scan_finished(&counts);
    log::trace!(
        "Classifier: {} unmatched pixels at tolerance {}",
        counts.unmatched_pixels(),
        tolerance
    );

    Ok(Classification { counts, annotated })
}
