//! Stimulus indexing and combinatorial tuple generation
//!
//! The engine behind every cue-conflict experiment:
//!
//! - `parse`: filename → shape/texture/color attributes
//! - `index`: persistent id → stimulus mapping with validity filters
//! - `matching`: per-anchor shape/texture/color match sets
//! - `tuples`: triplet (style-transfer) and trial (fake) enumeration
//! - `cache`: JSON persistence with an explicit miss path
//! - `layout`: directory scanning and the texture-organised mirror
//!
//! ## Example
//!
//! ```no_run
//! use cuebias::stimuli::{Convention, JsonCache, StimulusIndex, TupleCorpus};
//!
//! let index = StimulusIndex::build_or_load(
//!     "stimuli-shape/style-transfer",
//!     Convention::StyleTransfer,
//!     &JsonCache::new("geirhos_shape_classes.json"),
//! )?;
//! let corpus = TupleCorpus::build_or_load(&index, &JsonCache::new("geirhos_triplets.json"))?;
//! println!("{} triplets over {} anchors", corpus.len(), corpus.anchor_count());
//! # Ok::<(), cuebias::Error>(())
//! ```

pub mod cache;
pub mod index;
pub mod layout;
pub mod matching;
pub mod parse;
pub mod tuples;

pub use cache::{CacheStatus, JsonCache};
pub use index::{PersistedIndex, ScanReport, StimulusIndex};
pub use layout::{mirror_by_texture, scan_images};
pub use matching::{MatchFinder, MatchKind};
pub use parse::{
    AttributeParser, FakeStimulusParser, InvalidStimulus, StyleTransferParser, UNASSIGNED_MARKER,
};
pub use tuples::{AnchorEntry, Tuple, TupleCorpus, ALL_KEY};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Stimulus key: the image filename.
pub type StimulusId = String;

/// File-naming convention of a stimulus set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Convention {
    /// Geirhos style transfer: `<shape>/<shape_instance>-<texture_instance>.png`
    StyleTransfer,
    /// Synthetic stimuli: `<shape>_<texture>_<color>.png`
    Fake,
}

impl Convention {
    /// Attribute parser for this convention.
    pub fn parser(self) -> &'static dyn AttributeParser {
        match self {
            Self::StyleTransfer => &StyleTransferParser,
            Self::Fake => &FakeStimulusParser,
        }
    }

    /// Attributes that take part in match predicates.
    pub fn tracked_kinds(self) -> &'static [MatchKind] {
        match self {
            Self::StyleTransfer => &[MatchKind::Shape, MatchKind::Texture],
            Self::Fake => &[MatchKind::Shape, MatchKind::Texture, MatchKind::Color],
        }
    }

    /// Directory depth of image files below the storage root.
    pub fn image_depth(self) -> usize {
        match self {
            Self::StyleTransfer => 2,
            Self::Fake => 1,
        }
    }

    /// Name of a tuple in this set ("triplet" or "trial").
    pub fn tuple_name(self) -> &'static str {
        match self {
            Self::StyleTransfer => "triplet",
            Self::Fake => "trial",
        }
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StyleTransfer => write!(f, "style-transfer"),
            Self::Fake => write!(f, "fake"),
        }
    }
}

impl std::str::FromStr for Convention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "style-transfer" | "style_transfer" | "geirhos" => Ok(Self::StyleTransfer),
            "fake" => Ok(Self::Fake),
            _ => Err(format!(
                "Unknown stimulus set: {s}. Valid sets: style-transfer, fake"
            )),
        }
    }
}

/// Attributes extracted from a stimulus filename.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StimulusAttributes {
    pub shape: String,
    pub texture: String,
    pub color: Option<String>,
    pub shape_instance: Option<String>,
    pub texture_instance: Option<String>,
}

/// One indexed image.
///
/// Serialized as the value of the persisted index map; the id is the map key
/// and is restored on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stimulus {
    #[serde(skip)]
    pub id: StimulusId,
    pub shape: String,
    pub texture: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(rename = "shape_spec", default, skip_serializing_if = "Option::is_none")]
    pub shape_instance: Option<String>,
    #[serde(rename = "texture_spec", default, skip_serializing_if = "Option::is_none")]
    pub texture_instance: Option<String>,
    #[serde(rename = "dir")]
    pub location: PathBuf,
}

impl Stimulus {
    pub fn new(
        id: impl Into<StimulusId>,
        attributes: StimulusAttributes,
        location: impl Into<PathBuf>,
    ) -> Self {
        let StimulusAttributes {
            shape,
            texture,
            color,
            shape_instance,
            texture_instance,
        } = attributes;
        Self {
            id: id.into(),
            shape,
            texture,
            color,
            shape_instance,
            texture_instance,
            location: location.into(),
        }
    }

    /// Value of the attribute a match kind compares.
    pub fn attribute(&self, kind: MatchKind) -> Option<&str> {
        match kind {
            MatchKind::Shape => Some(&self.shape),
            MatchKind::Texture => Some(&self.texture),
            MatchKind::Color => self.color.as_deref(),
        }
    }

    /// Whether shape and texture disagree.
    pub fn is_cue_conflict(&self) -> bool {
        self.shape != self.texture
    }
}
