//! Plan surface - site plan land-cover analysis
//!
//! Classifies every pixel of a site plan against user-chosen reference
//! colors, counts the surface of each category, and turns the counts into
//! percentages of the whole image (background) or of the non-background
//! area (every other category). An annotated copy of the plan shows which
//! pixels were credited to which category.
//!
//! ```rust,ignore
//! use plan_surface::{AnalysisConfig, analyze, data::load_image};
//!
//! let plan = load_image(Path::new("plan.png"))?;
//! let outcome = analyze(&plan, &AnalysisConfig::default())?;
//! println!("{}", plan_surface::report::format_summary(&outcome.report));
//! ```

pub mod aggregator;
pub mod analysis;
pub mod classifier;
pub mod color_utils;
pub mod config;
pub mod constants;
pub mod data;
pub mod error;
pub mod model;
pub mod report;

pub use aggregator::{BarSegment, Breakdown, Percentage, SurfaceReport, SurfaceRow, aggregate};
pub use analysis::{AnalysisOutcome, analyze, analyze_validated};
pub use classifier::{
    Classification, LogObserver, ScanObserver, SurfaceCounts, classify, classify_with_observer,
};
pub use config::{AnalysisConfig, ValidatedConfig};
pub use error::{AnalysisError, Result};
pub use model::{Category, CategorySet, Tolerance};
