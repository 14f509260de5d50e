//! Conversion of pixel counts into surface percentages.
//!
//! Two denominators are used. The background share is relative to the whole
//! image; every other category is relative to the non-background area
//! (total pixels minus background pixels). When that area is empty the
//! non-background percentages are [`Percentage::Undefined`] instead of a
//! division by zero.

use serde::{Serialize, Serializer};

use crate::classifier::SurfaceCounts;
use crate::color_utils::{Rgb, normalized};
use crate::constants::{BAR_SPAN, PERCENT_EPSILON};
use crate::error::{AnalysisError, Result};
use crate::model::CategorySet;

/// A surface share in percent, or undefined when its denominator is zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Percentage {
    /// Share in percent (0-100)
    Defined(f64),
    /// No area to divide by
    Undefined,
}

impl Percentage {
    fn ratio(count: u64, denominator: u64) -> Self {
        if denominator == 0 {
            Percentage::Undefined
        } else {
            Percentage::Defined(count as f64 / denominator as f64 * 100.0)
        }
    }

    /// The value, if defined.
    pub fn value(self) -> Option<f64> {
        match self {
            Percentage::Defined(v) => Some(v),
            Percentage::Undefined => None,
        }
    }

    /// Whether the percentage has a value.
    pub fn is_defined(self) -> bool {
        matches!(self, Percentage::Defined(_))
    }
}

impl std::fmt::Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Percentage::Defined(v) => write!(f, "{:.2} %", v),
            Percentage::Undefined => write!(f, "undefined"),
        }
    }
}

/// Serialized as a number, or `null` when undefined.
impl Serialize for Percentage {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Percentage::Defined(v) => serializer.serialize_f64(*v),
            Percentage::Undefined => serializer.serialize_none(),
        }
    }
}

/// One line of the surface table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceRow {
    /// Category identifier
    pub name: String,
    /// Category display label
    pub label: String,
    /// Pixels credited to the category
    pub pixels: u64,
    /// Share of the relevant denominator
    pub percentage: Percentage,
    /// Whether this row is the background
    pub background: bool,
}

/// One segment of the stacked proportion bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSegment {
    /// Category display label
    pub label: String,
    /// Share of the non-background area
    pub percentage: f64,
    /// Fill color (the category marker)
    pub color: Rgb,
    /// Left edge on the 0-100 bar
    pub start: f64,
    /// Segment width on the 0-100 bar, equal to `percentage`
    pub width: f64,
}

impl BarSegment {
    /// Text drawn at the segment center.
    pub fn caption(&self) -> String {
        format!("{}\n{:.1}%", self.label, self.percentage)
    }

    /// Horizontal center of the segment.
    pub fn center(&self) -> f64 {
        self.start + self.width / 2.0
    }

    /// Fill color scaled to 0.0-1.0.
    pub fn normalized_color(&self) -> [f32; 3] {
        normalized(self.color)
    }
}

/// Non-background proportions laid out left to right in category order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Breakdown {
    /// Contiguous segments; empty when percentages are undefined
    pub segments: Vec<BarSegment>,
}

impl Breakdown {
    /// Full bar width.
    pub const SPAN: f64 = BAR_SPAN;

    fn from_rows(rows: &[SurfaceRow], categories: &CategorySet) -> Self {
        let mut start = 0.0;
        let mut segments = Vec::new();

        for (row, category) in rows.iter().zip(categories.iter()) {
            let (Some(percentage), Some(color)) = (row.percentage.value(), category.marker) else {
                continue;
            };
            if row.background {
                continue;
            }
            segments.push(BarSegment {
                label: row.label.clone(),
                percentage,
                color,
                start,
                width: percentage,
            });
            start += percentage;
        }

        Self { segments }
    }

    /// Combined width of all segments.
    pub fn total_width(&self) -> f64 {
        self.segments.iter().map(|s| s.width).sum()
    }

    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Percentages for every category plus the proportion bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceReport {
    /// Rows in category order, background included
    pub rows: Vec<SurfaceRow>,
    /// Image size in pixels
    pub total_pixels: u64,
    /// Pixels credited to the background
    pub background_pixels: u64,
    /// Stacked bar of the non-background categories
    pub breakdown: Breakdown,
}

impl SurfaceReport {
    /// Row of the category named `name`.
    pub fn row(&self, name: &str) -> Option<&SurfaceRow> {
        self.rows.iter().find(|r| r.name == name)
    }

    /// The background row.
    pub fn background(&self) -> Option<&SurfaceRow> {
        self.rows.iter().find(|r| r.background)
    }

    /// Area the non-background percentages are relative to.
    pub fn non_background_pixels(&self) -> u64 {
        self.total_pixels.saturating_sub(self.background_pixels)
    }

    /// Whether the non-background percentages could be computed.
    pub fn is_defined(&self) -> bool {
        self.non_background_pixels() > 0
    }

    /// Sum of the non-background percentages, if defined.
    pub fn non_background_total(&self) -> Option<f64> {
        if !self.is_defined() {
            return None;
        }
        Some(
            self.rows
                .iter()
                .filter(|r| !r.background)
                .filter_map(|r| r.percentage.value())
                .sum(),
        )
    }

    /// Turn an undefined report into [`AnalysisError::UndefinedPercentage`].
    pub fn ensure_defined(self) -> Result<Self> {
        if self.is_defined() {
            Ok(self)
        } else {
            Err(AnalysisError::UndefinedPercentage {
                background_pixels: self.background_pixels,
                total_pixels: self.total_pixels,
            })
        }
    }
}

/// Compute the surface table for `counts`.
///
/// Fails with [`AnalysisError::InvalidInput`] when the image is empty or
/// `counts` does not line up with `categories`. An all-background image is
/// not an error here: the report carries undefined percentages.
pub fn aggregate(counts: &SurfaceCounts, categories: &CategorySet) -> Result<SurfaceReport> {
    let total_pixels = counts.total_pixels();
    if total_pixels == 0 {
        return Err(AnalysisError::invalid_input("image has no pixels"));
    }
    if counts.len() != categories.len() {
        return Err(AnalysisError::invalid_input(format!(
            "{} counts for {} categories",
            counts.len(),
            categories.len()
        )));
    }
    if counts.matched_pixels() > total_pixels {
        return Err(AnalysisError::invalid_input(format!(
            "{} pixels counted in an image of {}",
            counts.matched_pixels(),
            total_pixels
        )));
    }

    let background_pixels = counts.get(categories.background_index());
    let non_background = total_pixels - background_pixels;

    let rows: Vec<SurfaceRow> = categories
        .iter()
        .enumerate()
        .map(|(index, category)| {
            let pixels = counts.get(index);
            let denominator = if category.is_background {
                total_pixels
            } else {
                non_background
            };
            SurfaceRow {
                name: category.name.clone(),
                label: category.label.clone(),
                pixels,
                percentage: Percentage::ratio(pixels, denominator),
                background: category.is_background,
            }
        })
        .collect();

    if non_background == 0 {
        log::warn!("No non-background area detected, detailed percentages are undefined");
    }

    let breakdown = Breakdown::from_rows(&rows, categories);
    let report = SurfaceReport {
        rows,
        total_pixels,
        background_pixels,
        breakdown,
    };

    if let Some(sum) = report.non_background_total() {
        // Unmatched pixels are part of the denominator, so the sum only
        // reaches 100 when every non-background pixel matched a category
        let unmatched = counts.unmatched_pixels() as f64 / non_background as f64 * 100.0;
        debug_assert!((sum + unmatched - 100.0).abs() < PERCENT_EPSILON * 100.0);
    }

    Ok(report)
}
