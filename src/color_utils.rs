//! Color utility functions shared across the analysis.
//!
//! Colors are plain `[u8; 3]` RGB triples. Matching uses the per-channel
//! maximum absolute difference, not a Euclidean or perceptual distance.

use crate::error::{AnalysisError, Result};

/// An RGB color with channels in 0-255.
pub type Rgb = [u8; 3];

/// Convert a raw integer to a color channel.
///
/// `what` names the value in the error message (e.g. `"reference color of
/// 'urbanized'"`).
pub fn channel_from_int(value: i64, what: &str) -> Result<u8> {
    u8::try_from(value).map_err(|_| {
        AnalysisError::invalid_input(format!(
            "{} has channel value {} outside [0, 255]",
            what, value
        ))
    })
}

/// Convert three raw integers to a color, validating each channel.
pub fn rgb_from_ints(channels: [i64; 3], what: &str) -> Result<Rgb> {
    Ok([
        channel_from_int(channels[0], what)?,
        channel_from_int(channels[1], what)?,
        channel_from_int(channels[2], what)?,
    ])
}

/// Parse a `#RRGGBB` hex string.
pub fn hex_to_rgb(hex: &str) -> Result<Rgb> {
    let digits = hex
        .strip_prefix('#')
        .filter(|d| d.len() == 6 && d.chars().all(|c| c.is_ascii_hexdigit()))
        .ok_or_else(|| {
            AnalysisError::invalid_input(format!("'{}' is not a #RRGGBB color", hex))
        })?;

    let mut rgb = [0u8; 3];
    for (i, channel) in rgb.iter_mut().enumerate() {
        *channel = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16)
            .map_err(|e| AnalysisError::invalid_input(format!("'{}': {}", hex, e)))?;
    }
    Ok(rgb)
}

/// Format a color as lowercase `#rrggbb`.
pub fn rgb_to_hex(rgb: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

/// Largest absolute per-channel difference between two colors.
pub fn max_channel_distance(a: Rgb, b: Rgb) -> u8 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| x.abs_diff(*y))
        .max()
        .unwrap_or(0)
}

/// Whether every channel of `a` is within `tolerance` of `b` (inclusive).
#[inline]
pub fn colors_match(a: Rgb, b: Rgb, tolerance: u8) -> bool {
    a[0].abs_diff(b[0]) <= tolerance
        && a[1].abs_diff(b[1]) <= tolerance
        && a[2].abs_diff(b[2]) <= tolerance
}

/// Channels scaled to 0.0-1.0, as chart renderers expect.
pub fn normalized(rgb: Rgb) -> [f32; 3] {
    [
        f32::from(rgb[0]) / 255.0,
        f32::from(rgb[1]) / 255.0,
        f32::from(rgb[2]) / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#004DA9").unwrap(), [0, 77, 169]);
        assert_eq!(hex_to_rgb("#90ee90").unwrap(), [144, 238, 144]);
        assert_eq!(hex_to_rgb("#FFFFFF").unwrap(), [255, 255, 255]);
    }

    #[test]
    fn test_hex_to_rgb_rejects_malformed() {
        assert!(hex_to_rgb("004DA9").is_err());
        assert!(hex_to_rgb("#004DA").is_err());
        assert!(hex_to_rgb("#004DA9FF").is_err());
        assert!(hex_to_rgb("#GG0000").is_err());
        assert!(hex_to_rgb("").is_err());
    }

    #[test]
    fn test_rgb_to_hex_lowercase() {
        assert_eq!(rgb_to_hex([255, 165, 0]), "#ffa500");
        assert_eq!(rgb_to_hex([0, 77, 169]), "#004da9");
    }

    #[test]
    fn test_channel_range() {
        assert_eq!(channel_from_int(0, "c").unwrap(), 0);
        assert_eq!(channel_from_int(255, "c").unwrap(), 255);
        assert!(channel_from_int(256, "c").is_err());
        assert!(channel_from_int(-1, "c").is_err());
        assert!(rgb_from_ints([10, 300, 10], "marker").is_err());
    }

    #[test]
    fn test_colors_match_is_inclusive_max_norm() {
        let reference = [100, 100, 100];
        assert!(colors_match([110, 90, 100], reference, 10));
        assert!(!colors_match([111, 100, 100], reference, 10));
        // Euclidean distance would be ~17.3 here, still a match per channel
        assert!(colors_match([110, 110, 110], reference, 10));
    }

    #[test]
    fn test_zero_tolerance_requires_equality() {
        assert!(colors_match([1, 2, 3], [1, 2, 3], 0));
        assert!(!colors_match([1, 2, 4], [1, 2, 3], 0));
    }

    #[test]
    fn test_max_channel_distance() {
        assert_eq!(max_channel_distance([0, 0, 0], [255, 10, 3]), 255);
        assert_eq!(max_channel_distance([5, 5, 5], [5, 5, 5]), 0);
    }

    #[test]
    fn test_normalized() {
        let [r, g, b] = normalized([255, 0, 51]);
        assert!((r - 1.0).abs() < 0.001);
        assert!(g.abs() < 0.001);
        assert!((b - 0.2).abs() < 0.001);
    }
}
