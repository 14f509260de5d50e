//! Land-cover categories detected on a site plan.

use serde::Serialize;

use crate::color_utils::{Rgb, rgb_to_hex};
use crate::error::{AnalysisError, Result};

/// A detectable category with its reference and marker colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Stable identifier (e.g. `"urbanized"`)
    pub name: String,
    /// Display label (e.g. `"Urbanized"`)
    pub label: String,
    /// Color the pixels are matched against
    pub reference: Rgb,
    /// Color matched pixels are painted with; `None` for the background
    pub marker: Option<Rgb>,
    /// Whether this is the background category
    pub is_background: bool,
}

impl Category {
    /// Create an annotated (non-background) category.
    pub fn new(name: &str, label: &str, reference: Rgb, marker: Rgb) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            reference,
            marker: Some(marker),
            is_background: false,
        }
    }

    /// Create the background category. It is counted but never annotated.
    pub fn background(name: &str, label: &str, reference: Rgb) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            reference,
            marker: None,
            is_background: true,
        }
    }
}

/// Ordered set of categories with exactly one background entry.
///
/// Order is significant: a pixel is credited to the first category whose
/// tolerance window contains it, so reordering changes results when
/// windows overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySet {
    categories: Vec<Category>,
    background: usize,
}

impl CategorySet {
    /// Validate and build a category set.
    ///
    /// Fails when the list is empty, when there is not exactly one
    /// background, when names repeat, when the background carries a marker
    /// or when an annotated category has none.
    pub fn new(categories: Vec<Category>) -> Result<Self> {
        if categories.is_empty() {
            return Err(AnalysisError::invalid_input("no categories configured"));
        }

        let mut background = None;
        for (index, category) in categories.iter().enumerate() {
            if category.name.is_empty() {
                return Err(AnalysisError::invalid_input(format!(
                    "category #{} has an empty name",
                    index
                )));
            }
            if categories[..index].iter().any(|c| c.name == category.name) {
                return Err(AnalysisError::invalid_input(format!(
                    "duplicate category name '{}'",
                    category.name
                )));
            }

            match (category.is_background, category.marker) {
                (true, Some(marker)) => {
                    return Err(AnalysisError::invalid_input(format!(
                        "background category '{}' cannot have a marker color ({})",
                        category.name,
                        rgb_to_hex(marker)
                    )));
                }
                (true, None) => {
                    if let Some(previous) = background {
                        let previous: &Category = &categories[previous];
                        return Err(AnalysisError::invalid_input(format!(
                            "both '{}' and '{}' are marked as background",
                            previous.name, category.name
                        )));
                    }
                    background = Some(index);
                }
                (false, None) => {
                    return Err(AnalysisError::invalid_input(format!(
                        "category '{}' has no marker color",
                        category.name
                    )));
                }
                (false, Some(_)) => {}
            }
        }

        let background = background
            .ok_or_else(|| AnalysisError::invalid_input("no background category configured"))?;

        Ok(Self {
            categories,
            background,
        })
    }

    /// Number of categories, background included.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Always false; a valid set holds at least the background.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Categories in matching order.
    pub fn iter(&self) -> std::slice::Iter<'_, Category> {
        self.categories.iter()
    }

    /// Category at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Category> {
        self.categories.get(index)
    }

    /// Position of the background category.
    pub fn background_index(&self) -> usize {
        self.background
    }

    /// The background category.
    pub fn background(&self) -> &Category {
        &self.categories[self.background]
    }

    /// Annotated categories with their positions, in matching order.
    pub fn annotated(&self) -> impl Iterator<Item = (usize, &Category)> + '_ {
        self.categories
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_background)
    }

    /// Position of the category named `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.name == name)
    }
}

impl<'a> IntoIterator for &'a CategorySet {
    type Item = &'a Category;
    type IntoIter = std::slice::Iter<'a, Category>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site_plan() -> Vec<Category> {
        vec![
            Category::background("background", "Background", [0, 77, 169]),
            Category::new("urbanized", "Urbanized", [255, 255, 255], [255, 0, 0]),
            Category::new("natural_existing", "Natural existing", [0, 100, 0], [235, 246, 0]),
        ]
    }

    #[test]
    fn test_valid_set() {
        let set = CategorySet::new(site_plan()).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.background_index(), 0);
        assert_eq!(set.background().name, "background");
        assert_eq!(set.position("natural_existing"), Some(2));
        let annotated: Vec<usize> = set.annotated().map(|(i, _)| i).collect();
        assert_eq!(annotated, vec![1, 2]);
    }

    #[test]
    fn test_background_need_not_be_first() {
        let mut categories = site_plan();
        categories.rotate_left(1);
        let set = CategorySet::new(categories).unwrap();
        assert_eq!(set.background_index(), 2);
    }

    #[test]
    fn test_empty_rejected() {
        assert!(CategorySet::new(Vec::new()).is_err());
    }

    #[test]
    fn test_missing_background_rejected() {
        let categories = site_plan().into_iter().skip(1).collect();
        assert!(CategorySet::new(categories).is_err());
    }

    #[test]
    fn test_two_backgrounds_rejected() {
        let mut categories = site_plan();
        categories.push(Category::background("sea", "Sea", [0, 0, 255]));
        assert!(CategorySet::new(categories).is_err());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut categories = site_plan();
        categories.push(Category::new("urbanized", "Again", [1, 1, 1], [2, 2, 2]));
        assert!(CategorySet::new(categories).is_err());
    }

    #[test]
    fn test_marker_rules() {
        let mut categories = site_plan();
        categories[0].marker = Some([1, 2, 3]);
        assert!(CategorySet::new(categories).is_err());

        let mut categories = site_plan();
        categories[1].marker = None;
        assert!(CategorySet::new(categories).is_err());
    }
}
