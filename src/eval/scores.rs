//! Sources of per-stimulus class probabilities.

use super::decision::softmax;
use crate::data::StimulusLoader;
use crate::stimuli::Stimulus;
use crate::{Error, Result};
use ndarray::Array4;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// An image classifier: one `[1, 3, H, W]` batch in, raw class scores out.
pub trait Classifier {
    fn forward(&mut self, batch: &Array4<f32>) -> Result<Vec<f32>>;
}

/// Produces class probabilities for a stimulus.
pub trait ScoreSource {
    fn class_scores(&mut self, stimulus: &Stimulus) -> Result<Vec<f32>>;
}

/// Runs a classifier on loaded stimuli and softmaxes its output.
pub struct ModelScores<'a, C> {
    loader: StimulusLoader<'a>,
    classifier: C,
}

impl<'a, C: Classifier> ModelScores<'a, C> {
    pub fn new(loader: StimulusLoader<'a>, classifier: C) -> Self {
        Self { loader, classifier }
    }

    pub fn into_classifier(self) -> C {
        self.classifier
    }
}

impl<C: Classifier> ScoreSource for ModelScores<'_, C> {
    fn class_scores(&mut self, stimulus: &Stimulus) -> Result<Vec<f32>> {
        let batch = self.loader.load_stimulus(stimulus)?;
        let logits = self.classifier.forward(&batch)?;
        debug!(stimulus = %stimulus.id, classes = logits.len(), "classified stimulus");
        Ok(softmax(&logits))
    }
}

/// Probabilities read from a JSON file of `{stimulus id: [p, ...]}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrecomputedScores {
    scores: HashMap<String, Vec<f32>>,
}

impl PrecomputedScores {
    pub fn new(scores: HashMap<String, Vec<f32>>) -> Self {
        Self { scores }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let scores = serde_json::from_str(&content)
            .map_err(|e| Error::Serialization(format!("JSON deserialization failed: {e}")))?;
        Ok(Self { scores })
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl ScoreSource for PrecomputedScores {
    fn class_scores(&mut self, stimulus: &Stimulus) -> Result<Vec<f32>> {
        self.scores
            .get(&stimulus.id)
            .cloned()
            .ok_or_else(|| Error::UnknownStimulus(stimulus.id.clone()))
    }
}
