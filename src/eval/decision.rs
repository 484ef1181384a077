//! Shape-vs-texture decisions from category scores.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Numerically stable softmax.
pub fn softmax(values: &[f32]) -> Vec<f32> {
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = values.iter().map(|&v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// A model's decision on one cue-conflict stimulus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Arg-max category over all categories.
    pub decision: String,
    pub decision_value: f32,
    pub shape_value: f32,
    pub texture_value: f32,
    /// Shape or texture, whichever scored higher; texture on ties.
    pub restricted: String,
    pub restricted_shape_value: f32,
    pub restricted_texture_value: f32,
    pub shape: String,
    pub texture: String,
}

impl Decision {
    /// Decide from per-category scores.
    ///
    /// `class_values[i]` is the score of `categories[i]`. The arg-max takes
    /// the first maximum. Restricted values are the softmax of the shape and
    /// texture scores.
    pub fn from_class_values(
        categories: &[String],
        class_values: &[f32],
        shape: &str,
        texture: &str,
    ) -> Result<Self> {
        if categories.len() != class_values.len() {
            return Err(Error::DimensionMismatch {
                expected: categories.len(),
                actual: class_values.len(),
            });
        }
        let position = |name: &str| {
            categories
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| Error::ConfigError(format!("unknown category '{name}'")))
        };
        let shape_idx = position(shape)?;
        let texture_idx = position(texture)?;

        let mut decision_idx = 0;
        for (i, &v) in class_values.iter().enumerate() {
            if v > class_values[decision_idx] {
                decision_idx = i;
            }
        }

        let shape_value = class_values[shape_idx];
        let texture_value = class_values[texture_idx];
        let restricted = if shape_value > texture_value {
            shape
        } else {
            texture
        };
        let restricted_values = softmax(&[shape_value, texture_value]);

        Ok(Self {
            decision: categories[decision_idx].clone(),
            decision_value: class_values[decision_idx],
            shape_value,
            texture_value,
            restricted: restricted.to_string(),
            restricted_shape_value: restricted_values[0],
            restricted_texture_value: restricted_values[1],
            shape: shape.to_string(),
            texture: texture.to_string(),
        })
    }

    pub fn is_shape(&self) -> bool {
        self.decision == self.shape
    }

    pub fn is_texture(&self) -> bool {
        self.decision == self.texture
    }

    pub fn is_neither(&self) -> bool {
        !self.is_shape() && !self.is_texture()
    }

    pub fn is_restricted_shape(&self) -> bool {
        self.restricted == self.shape
    }

    pub fn is_restricted_texture(&self) -> bool {
        self.restricted == self.texture
    }
}
