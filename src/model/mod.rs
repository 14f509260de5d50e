//! Data models for surface analysis.

mod category;
mod tolerance;

pub use category::{Category, CategorySet};
pub use tolerance::Tolerance;
