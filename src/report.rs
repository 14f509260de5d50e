//! Text and JSON renderings of a [`SurfaceReport`].

use std::fmt::Write;

use crate::aggregator::SurfaceReport;

/// Human-readable summary: one block per category, then the breakdown.
pub fn format_summary(report: &SurfaceReport) -> String {
    let mut out = String::new();

    for row in &report.rows {
        let _ = writeln!(out, "**{}** :", row.label);
        let _ = writeln!(out, "- Pixels: {}", row.pixels);
        let _ = writeln!(out, "- Percentage: {}", row.percentage);
    }

    out.push('\n');
    if !report.is_defined() {
        let _ = writeln!(out, "No non-background area detected");
        return out;
    }
    if report.breakdown.is_empty() {
        return out;
    }

    let _ = writeln!(out, "Surface breakdown:");
    for segment in &report.breakdown.segments {
        let _ = writeln!(
            out,
            "- {}: {:.1}% [{:.1} - {:.1}]",
            segment.label,
            segment.percentage,
            segment.start,
            segment.start + segment.width
        );
    }

    out
}

/// Report as pretty-printed JSON.
pub fn to_json(report: &SurfaceReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::aggregate;
    use crate::classifier::SurfaceCounts;
    use crate::config::default_categories;
    use crate::model::{Category, CategorySet};

    fn report_for(counts: Vec<u64>, total: u64) -> SurfaceReport {
        let categories = CategorySet::new(default_categories()).unwrap();
        let counts = SurfaceCounts::from_counts(counts, total).unwrap();
        aggregate(&counts, &categories).unwrap()
    }

    #[test]
    fn test_summary_blocks() {
        let summary = format_summary(&report_for(vec![2, 1, 0, 1], 4));
        assert!(summary.contains("**Background** :\n- Pixels: 2\n- Percentage: 50.00 %"));
        assert!(summary.contains("**Urbanized** :\n- Pixels: 1\n- Percentage: 50.00 %"));
        assert!(summary.contains("- Natural artificial: 0.0% [50.0 - 50.0]"));
        assert!(summary.contains("- Natural existing: 50.0% [50.0 - 100.0]"));
    }

    #[test]
    fn test_summary_undefined() {
        let summary = format_summary(&report_for(vec![9, 0, 0, 0], 9));
        assert!(summary.contains("- Percentage: 100.00 %"));
        assert!(summary.contains("- Percentage: undefined"));
        assert!(summary.contains("No non-background area detected"));
    }

    #[test]
    fn test_summary_background_only_set_with_unmatched_pixels() {
        let categories =
            CategorySet::new(vec![Category::background("background", "Background", [0, 77, 169])])
                .unwrap();
        let counts = SurfaceCounts::from_counts(vec![1], 2).unwrap();
        let report = aggregate(&counts, &categories).unwrap();
        assert!(report.is_defined());

        let summary = format_summary(&report);
        assert!(summary.contains("- Percentage: 50.00 %"));
        assert!(!summary.contains("No non-background area detected"));
        assert!(!summary.contains("Surface breakdown:"));
    }

    #[test]
    fn test_json_shape() {
        let json = to_json(&report_for(vec![4, 0, 0, 0], 4)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total_pixels"], 4);
        assert_eq!(value["rows"][0]["percentage"], 100.0);
        assert!(value["rows"][1]["percentage"].is_null());
        assert_eq!(value["breakdown"]["segments"].as_array().unwrap().len(), 0);
    }
}
