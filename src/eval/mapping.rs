//! Classifier output → coarse category scores.

use crate::{Error, Result};
use indexmap::IndexMap;
use std::fs;
use std::path::Path;

/// The sixteen categories of the Geirhos style-transfer set.
pub const GEIRHOS_CATEGORIES: [&str; 16] = [
    "airplane", "bear", "bicycle", "bird", "boat", "bottle", "car", "cat", "chair", "clock", "dog",
    "elephant", "keyboard", "knife", "oven", "truck",
];

/// Reduces a probability vector over fine classes to one score per category.
pub trait CategoryMapping {
    /// Category names, in the order [`CategoryMapping::map`] returns scores.
    fn categories(&self) -> &[String];

    /// One score per category.
    fn map(&self, probabilities: &[f32]) -> Result<Vec<f32>>;
}

/// Each category scores the mean probability of its group of fine classes.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedMapping {
    categories: Vec<String>,
    groups: Vec<Vec<usize>>,
}

impl GroupedMapping {
    pub fn new(groups: IndexMap<String, Vec<usize>>) -> Result<Self> {
        if let Some((category, _)) = groups.iter().find(|(_, classes)| classes.is_empty()) {
            return Err(Error::ConfigError(format!(
                "category '{category}' has no classes"
            )));
        }
        let (categories, groups) = groups.into_iter().unzip();
        Ok(Self { categories, groups })
    }

    /// Read `{category: [class index, ...]}` from a JSON file, keeping the
    /// categories listed in `categories`, in that order.
    pub fn load(path: &Path, categories: &[String]) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!(
                "Failed to read category mapping {}: {e}",
                path.display()
            ))
        })?;
        let mut groups: IndexMap<String, Vec<usize>> = serde_json::from_str(&content)
            .map_err(|e| Error::Serialization(format!("JSON deserialization failed: {e}")))?;

        let mut selected = IndexMap::with_capacity(categories.len());
        for category in categories {
            let classes = groups.shift_remove(category).ok_or_else(|| {
                Error::ConfigError(format!(
                    "category '{category}' missing from {}",
                    path.display()
                ))
            })?;
            selected.insert(category.clone(), classes);
        }
        Self::new(selected)
    }

    /// Number of fine classes the mapping expects, at least.
    pub fn min_classes(&self) -> usize {
        self.groups
            .iter()
            .flatten()
            .max()
            .map_or(0, |&max| max + 1)
    }
}

impl CategoryMapping for GroupedMapping {
    fn categories(&self) -> &[String] {
        &self.categories
    }

    fn map(&self, probabilities: &[f32]) -> Result<Vec<f32>> {
        let needed = self.min_classes();
        if probabilities.len() < needed {
            return Err(Error::DimensionMismatch {
                expected: needed,
                actual: probabilities.len(),
            });
        }
        Ok(self
            .groups
            .iter()
            .map(|classes| {
                classes.iter().map(|&i| probabilities[i]).sum::<f32>() / classes.len() as f32
            })
            .collect())
    }
}

/// Scores already expressed per category.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityMapping {
    categories: Vec<String>,
}

impl IdentityMapping {
    pub fn new(categories: Vec<String>) -> Self {
        Self { categories }
    }
}

impl CategoryMapping for IdentityMapping {
    fn categories(&self) -> &[String] {
        &self.categories
    }

    fn map(&self, probabilities: &[f32]) -> Result<Vec<f32>> {
        if probabilities.len() != self.categories.len() {
            return Err(Error::DimensionMismatch {
                expected: self.categories.len(),
                actual: probabilities.len(),
            });
        }
        Ok(probabilities.to_vec())
    }
}

/// The Geirhos categories as owned strings.
pub fn geirhos_categories() -> Vec<String> {
    GEIRHOS_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use tempfile::NamedTempFile;

    fn groups(pairs: &[(&str, &[usize])]) -> IndexMap<String, Vec<usize>> {
        pairs
            .iter()
            .map(|(name, classes)| (name.to_string(), classes.to_vec()))
            .collect()
    }

    #[test]
    fn test_grouped_average() {
        let mapping = GroupedMapping::new(groups(&[("cat", &[0, 2]), ("dog", &[1])])).unwrap();
        let scores = mapping.map(&[0.2, 0.5, 0.4]).unwrap();
        assert_eq!(mapping.categories(), ["cat", "dog"]);
        assert_abs_diff_eq!(scores[0], 0.3, epsilon = 1e-6);
        assert_abs_diff_eq!(scores[1], 0.5);
    }

    #[test]
    fn test_short_probability_vector() {
        let mapping = GroupedMapping::new(groups(&[("cat", &[0, 9])])).unwrap();
        assert!(matches!(
            mapping.map(&[0.1; 4]),
            Err(Error::DimensionMismatch { expected: 10, actual: 4 })
        ));
    }

    #[test]
    fn test_empty_group_rejected() {
        assert!(GroupedMapping::new(groups(&[("cat", &[])])).is_err());
    }

    #[test]
    fn test_load_selects_and_orders_categories() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), r#"{"dog": [1], "cat": [0], "fish": [2]}"#).unwrap();

        let categories = vec!["cat".to_string(), "dog".to_string()];
        let mapping = GroupedMapping::load(file.path(), &categories).unwrap();
        assert_eq!(mapping.categories(), ["cat", "dog"]);
        assert_eq!(mapping.map(&[0.7, 0.2, 0.1]).unwrap(), vec![0.7, 0.2]);

        let missing = vec!["cat".to_string(), "bear".to_string()];
        assert!(matches!(
            GroupedMapping::load(file.path(), &missing),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn test_identity_checks_length() {
        let mapping = IdentityMapping::new(geirhos_categories());
        assert!(mapping.map(&[0.0; 16]).is_ok());
        assert!(mapping.map(&[0.0; 15]).is_err());
    }
}
