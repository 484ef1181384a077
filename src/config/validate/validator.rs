//! Configuration validation logic

use super::error::ValidationError;
use crate::config::schema::ExperimentSpec;
use std::collections::HashSet;

/// Validate an experiment specification
///
/// Checks:
/// - Transform size and normalization values
/// - Evaluation categories and model name
/// - Cache file names are set and distinct
///
/// Stimulus roots are not required to exist; a persisted index is enough.
pub fn validate_config(spec: &ExperimentSpec) -> Result<(), ValidationError> {
    let transform = &spec.transform;
    if transform.size == 0 {
        return Err(ValidationError::InvalidSize(transform.size));
    }

    match (&transform.mean, &transform.std) {
        (None, None) => {}
        (Some(mean), Some(std)) => {
            for (field, values) in [("mean", mean), ("std", std)] {
                if values.len() != 3 {
                    return Err(ValidationError::InvalidChannelCount {
                        field,
                        len: values.len(),
                    });
                }
            }
            if let Some(&m) = mean.iter().find(|m| !m.is_finite()) {
                return Err(ValidationError::InvalidMean(m));
            }
            if let Some(&s) = std.iter().find(|&&s| !(s > 0.0 && s.is_finite())) {
                return Err(ValidationError::InvalidStd(s));
            }
        }
        _ => return Err(ValidationError::IncompleteNormalization),
    }

    let evaluation = &spec.evaluation;
    if evaluation.categories.is_empty() {
        return Err(ValidationError::EmptyCategories);
    }
    let mut seen = HashSet::new();
    for category in &evaluation.categories {
        if !seen.insert(category.as_str()) {
            return Err(ValidationError::DuplicateCategory(category.clone()));
        }
    }
    if evaluation.model.trim().is_empty() {
        return Err(ValidationError::EmptyModelName);
    }

    let cache = &spec.cache;
    let names = [
        ("style_transfer_index", &cache.style_transfer_index),
        ("triplets", &cache.triplets),
        ("fake_index", &cache.fake_index),
        ("trials", &cache.trials),
    ];
    for (field, name) in names {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyCacheName(field));
        }
    }
    for (i, (a, name_a)) in names.iter().enumerate() {
        if let Some((b, _)) = names[i + 1..].iter().find(|(_, name_b)| name_a == name_b) {
            return Err(ValidationError::CacheNameCollision(*a, *b));
        }
    }

    Ok(())
}
