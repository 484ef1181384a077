//! YAML schema for experiment configuration
//!
//! Every section is optional; defaults reproduce the standard layout of the
//! Geirhos and fake stimulus sets.

use crate::data::{channel_stats, ChannelStats, ImageTransform, StimulusLoader, DEFAULT_SIZE};
use crate::eval::geirhos_categories;
use crate::stimuli::{Convention, JsonCache, PersistedIndex, StimulusIndex, TupleCorpus};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete experiment specification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperimentSpec {
    /// Stimulus storage roots
    #[serde(default)]
    pub stimuli: StimuliConfig,

    /// Persisted index and corpus files
    #[serde(default)]
    pub cache: CacheConfig,

    /// Image preprocessing
    #[serde(default)]
    pub transform: TransformConfig,

    /// Decision analysis
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

/// Stimulus storage roots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StimuliConfig {
    /// Shape-organised style-transfer set (`<root>/<shape>/<image>.png`)
    #[serde(default = "default_style_transfer_root")]
    pub style_transfer: PathBuf,

    /// Fake stimuli (`<root>/<image>.png`)
    #[serde(default = "default_fake_root")]
    pub fake: PathBuf,

    /// Target of the texture-organised mirror
    #[serde(default = "default_texture_root")]
    pub texture: PathBuf,
}

impl Default for StimuliConfig {
    fn default() -> Self {
        Self {
            style_transfer: default_style_transfer_root(),
            fake: default_fake_root(),
            texture: default_texture_root(),
        }
    }
}

fn default_style_transfer_root() -> PathBuf {
    PathBuf::from("stimuli-shape/style-transfer")
}

fn default_fake_root() -> PathBuf {
    PathBuf::from("stimuli-shape/fake")
}

fn default_texture_root() -> PathBuf {
    PathBuf::from("stimuli-texture/style-transfer")
}

impl StimuliConfig {
    pub fn root(&self, convention: Convention) -> &PathBuf {
        match convention {
            Convention::StyleTransfer => &self.style_transfer,
            Convention::Fake => &self.fake,
        }
    }
}

/// Persisted index and corpus file names, relative to `dir`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_style_transfer_index")]
    pub style_transfer_index: String,

    #[serde(default = "default_triplets")]
    pub triplets: String,

    #[serde(default = "default_fake_index")]
    pub fake_index: String,

    #[serde(default = "default_trials")]
    pub trials: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            style_transfer_index: default_style_transfer_index(),
            triplets: default_triplets(),
            fake_index: default_fake_index(),
            trials: default_trials(),
        }
    }
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_style_transfer_index() -> String {
    "geirhos_shape_classes.json".to_string()
}

fn default_triplets() -> String {
    "geirhos_triplets.json".to_string()
}

fn default_fake_index() -> String {
    "fake_stimulus_classes.json".to_string()
}

fn default_trials() -> String {
    "fake_trials.json".to_string()
}

impl CacheConfig {
    pub fn index_path(&self, convention: Convention) -> PathBuf {
        match convention {
            Convention::StyleTransfer => self.dir.join(&self.style_transfer_index),
            Convention::Fake => self.dir.join(&self.fake_index),
        }
    }

    pub fn tuples_path(&self, convention: Convention) -> PathBuf {
        match convention {
            Convention::StyleTransfer => self.dir.join(&self.triplets),
            Convention::Fake => self.dir.join(&self.trials),
        }
    }

    pub fn index_cache(&self, convention: Convention) -> JsonCache<PersistedIndex> {
        JsonCache::new(self.index_path(convention))
    }

    pub fn tuples_cache(&self, convention: Convention) -> JsonCache<TupleCorpus> {
        JsonCache::new(self.tuples_path(convention))
    }
}

/// Image preprocessing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformConfig {
    /// Length of the shorter side after resizing
    #[serde(default = "default_size")]
    pub size: u32,

    /// Fixed per-channel mean; computed from the stimulus set when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean: Option<Vec<f32>>,

    /// Fixed per-channel std; computed from the stimulus set when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub std: Option<Vec<f32>>,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            mean: None,
            std: None,
        }
    }
}

fn default_size() -> u32 {
    DEFAULT_SIZE
}

impl TransformConfig {
    /// The configured transform, if mean and std are both fixed.
    pub fn fixed(&self) -> Option<ImageTransform> {
        let mean = <[f32; 3]>::try_from(self.mean.as_deref()?).ok()?;
        let std = <[f32; 3]>::try_from(self.std.as_deref()?).ok()?;
        Some(ImageTransform::new(self.size, mean, std))
    }

    /// The fixed transform, or one normalizing with the statistics from
    /// `compute` when mean and std are not configured.
    pub fn resolve<F>(&self, compute: F) -> crate::Result<ImageTransform>
    where
        F: FnOnce() -> crate::Result<ChannelStats>,
    {
        match self.fixed() {
            Some(transform) => Ok(transform),
            None => Ok(compute()?.to_transform(self.size)),
        }
    }
}

/// Decision analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Reports go to `<results_dir>/<model>/`
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,

    #[serde(default = "default_model")]
    pub model: String,

    /// Coarse categories, in score order
    #[serde(default = "geirhos_categories")]
    pub categories: Vec<String>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
            model: default_model(),
            categories: geirhos_categories(),
        }
    }
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_model() -> String {
    "saycam".to_string()
}

impl ExperimentSpec {
    /// Load or build the index of one stimulus set.
    pub fn index(&self, convention: Convention) -> crate::Result<StimulusIndex> {
        StimulusIndex::build_or_load(
            self.stimuli.root(convention),
            convention,
            &self.cache.index_cache(convention),
        )
    }

    /// Rescan one stimulus set and replace its persisted index.
    ///
    /// The persisted tuples of the set were enumerated from the old index
    /// and are discarded.
    pub fn rebuild_index(&self, convention: Convention) -> crate::Result<StimulusIndex> {
        let index = StimulusIndex::rebuild(
            self.stimuli.root(convention),
            convention,
            &self.cache.index_cache(convention),
        )?;
        self.cache.tuples_cache(convention).invalidate()?;
        Ok(index)
    }

    /// Image transform for one stimulus set.
    ///
    /// Uses the configured mean and std, or computes them over the set.
    pub fn transform(&self, convention: Convention) -> crate::Result<ImageTransform> {
        self.transform
            .resolve(|| channel_stats(self.stimuli.root(convention), convention))
    }

    /// Loader over `index` with the transform of its stimulus set.
    pub fn loader<'a>(&self, index: &'a StimulusIndex) -> crate::Result<StimulusLoader<'a>> {
        Ok(StimulusLoader::new(index, self.transform(index.convention())?))
    }
}
