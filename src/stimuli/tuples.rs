//! Triplet and trial enumeration.
//!
//! For every anchor the corpus holds the Cartesian product of its match sets,
//! shape outer, texture middle, color inner, keeping only tuples whose
//! members are pairwise distinct. Anchors are visited in index scan order.

use super::cache::JsonCache;
use super::matching::{MatchFinder, MatchKind};
use super::{StimulusId, StimulusIndex};
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Reserved corpus key holding the flattened tuple list.
pub const ALL_KEY: &str = "all";

/// Members of a triplet (3) or a trial (4).
const TUPLE_LEN: std::ops::RangeInclusive<usize> = 3..=4;

/// Ordered stimulus ids: `[anchor, shape, texture]` or
/// `[anchor, shape, texture, color]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Tuple(Vec<StimulusId>);

impl Tuple {
    /// `ids` must hold 3 or 4 members.
    pub fn new(ids: Vec<StimulusId>) -> Self {
        debug_assert!(TUPLE_LEN.contains(&ids.len()));
        Self(ids)
    }

    pub fn anchor(&self) -> &str {
        &self.0[0]
    }

    pub fn shape_match(&self) -> &str {
        &self.0[1]
    }

    pub fn texture_match(&self) -> &str {
        &self.0[2]
    }

    pub fn color_match(&self) -> Option<&str> {
        self.0.get(3).map(String::as_str)
    }

    pub fn ids(&self) -> &[StimulusId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// No id appears twice.
    pub fn is_distinct(&self) -> bool {
        all_distinct(&self.0)
    }
}

impl<'de> Deserialize<'de> for Tuple {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let ids = Vec::<StimulusId>::deserialize(deserializer)?;
        if !TUPLE_LEN.contains(&ids.len()) {
            return Err(de::Error::invalid_length(ids.len(), &"3 or 4 stimulus ids"));
        }
        Ok(Self(ids))
    }
}

fn all_distinct(ids: &[StimulusId]) -> bool {
    ids.iter()
        .enumerate()
        .all(|(i, a)| ids[i + 1..].iter().all(|b| a != b))
}

/// Match sets and tuples for one anchor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnchorEntry {
    #[serde(rename = "shape matches")]
    pub shape_matches: Vec<StimulusId>,
    #[serde(rename = "texture matches")]
    pub texture_matches: Vec<StimulusId>,
    /// Present for trials only.
    #[serde(rename = "color matches", default)]
    pub color_matches: Option<Vec<StimulusId>>,
    #[serde(rename = "triplets", alias = "trials")]
    pub tuples: Vec<Tuple>,
}

impl AnchorEntry {
    /// Enumerate the tuples of `anchor` from its match sets.
    pub fn enumerate(
        anchor: &str,
        shape_matches: Vec<StimulusId>,
        texture_matches: Vec<StimulusId>,
        color_matches: Option<Vec<StimulusId>>,
    ) -> Self {
        let mut tuples = Vec::new();
        for s in &shape_matches {
            for t in &texture_matches {
                match &color_matches {
                    None => push_distinct(&mut tuples, vec![anchor.into(), s.clone(), t.clone()]),
                    Some(colors) => {
                        for c in colors {
                            push_distinct(
                                &mut tuples,
                                vec![anchor.into(), s.clone(), t.clone(), c.clone()],
                            );
                        }
                    }
                }
            }
        }

        Self {
            shape_matches,
            texture_matches,
            color_matches,
            tuples,
        }
    }

    pub fn matches(&self, kind: MatchKind) -> Option<&[StimulusId]> {
        match kind {
            MatchKind::Shape => Some(&self.shape_matches),
            MatchKind::Texture => Some(&self.texture_matches),
            MatchKind::Color => self.color_matches.as_deref(),
        }
    }

    /// Size of the unfiltered Cartesian product.
    pub fn product_size(&self) -> usize {
        self.shape_matches.len()
            * self.texture_matches.len()
            * self.color_matches.as_ref().map_or(1, Vec::len)
    }

    fn tuple_key(&self) -> &'static str {
        if self.color_matches.is_some() {
            "trials"
        } else {
            "triplets"
        }
    }
}

fn push_distinct(tuples: &mut Vec<Tuple>, ids: Vec<StimulusId>) {
    if all_distinct(&ids) {
        tuples.push(Tuple(ids));
    }
}

impl Serialize for AnchorEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let len = if self.color_matches.is_some() { 4 } else { 3 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry(MatchKind::Shape.persisted_key(), &self.shape_matches)?;
        map.serialize_entry(MatchKind::Texture.persisted_key(), &self.texture_matches)?;
        if let Some(colors) = &self.color_matches {
            map.serialize_entry(MatchKind::Color.persisted_key(), colors)?;
        }
        map.serialize_entry(self.tuple_key(), &self.tuples)?;
        map.end()
    }
}

/// Every tuple of a stimulus set, flattened and per anchor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TupleCorpus {
    anchors: IndexMap<StimulusId, AnchorEntry>,
    all: Vec<Tuple>,
}

impl TupleCorpus {
    /// Enumerate the corpus of `index`.
    pub fn build(index: &StimulusIndex) -> Self {
        let finder = MatchFinder::new(index);
        let convention = index.convention();

        let mut corpus = Self::default();
        let mut empty_anchors = 0usize;
        for anchor in index.iter() {
            let color = convention
                .tracked_kinds()
                .contains(&MatchKind::Color)
                .then(|| finder.find_for(anchor, MatchKind::Color));
            let entry = AnchorEntry::enumerate(
                &anchor.id,
                finder.find_for(anchor, MatchKind::Shape),
                finder.find_for(anchor, MatchKind::Texture),
                color,
            );

            if entry.tuples.is_empty() {
                empty_anchors += 1;
                debug!(anchor = %anchor.id, "anchor contributes no {}s", convention.tuple_name());
            }
            corpus.all.extend(entry.tuples.iter().cloned());
            corpus.anchors.insert(anchor.id.clone(), entry);
        }

        if empty_anchors > 0 {
            warn!(
                set = %convention,
                empty_anchors,
                anchors = corpus.anchors.len(),
                "anchors without any {}; the stimulus set may be incomplete",
                convention.tuple_name()
            );
        }
        info!(
            set = %convention,
            anchors = corpus.anchors.len(),
            tuples = corpus.all.len(),
            "enumerated {}s",
            convention.tuple_name()
        );
        corpus
    }

    /// Load the persisted corpus, or enumerate it from `index` and persist.
    ///
    /// A persisted corpus whose anchors are not exactly the ids of `index`
    /// was enumerated from another index; it is enumerated again and
    /// overwritten.
    pub fn build_or_load(index: &StimulusIndex, cache: &JsonCache<TupleCorpus>) -> Result<Self> {
        if let Some(corpus) = cache.lookup()? {
            if corpus.is_enumerated_from(index) {
                debug!(path = %cache.path().display(), "loaded cached tuple corpus");
                return Ok(corpus);
            }
            warn!(
                path = %cache.path().display(),
                anchors = corpus.anchor_count(),
                indexed = index.len(),
                "cached {}s do not match the stimulus index; enumerating again",
                index.convention().tuple_name()
            );
        }

        let corpus = Self::build(index);
        cache.store(&corpus)?;
        Ok(corpus)
    }

    /// Whether the anchors are the ids of `index`, in index order.
    pub fn is_enumerated_from(&self, index: &StimulusIndex) -> bool {
        self.anchors.keys().eq(index.ids())
    }

    /// Flattened tuples in anchor order.
    pub fn tuples(&self) -> &[Tuple] {
        &self.all
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    pub fn entry(&self, anchor: &str) -> Result<&AnchorEntry> {
        self.anchors
            .get(anchor)
            .ok_or_else(|| Error::UnknownStimulus(anchor.to_string()))
    }

    /// Per-anchor entries in anchor order.
    pub fn anchors(&self) -> impl Iterator<Item = (&StimulusId, &AnchorEntry)> {
        self.anchors.iter()
    }

    /// Anchors whose match sets produced no tuple.
    pub fn empty_anchors(&self) -> impl Iterator<Item = &StimulusId> {
        self.anchors
            .iter()
            .filter(|(_, entry)| entry.tuples.is_empty())
            .map(|(id, _)| id)
    }

    /// Check that the anchors are the ids of `index` and that every
    /// referenced id is present in it.
    pub fn verify_against(&self, index: &StimulusIndex) -> Result<()> {
        if !self.is_enumerated_from(index) {
            return Err(Error::StaleCorpus {
                anchors: self.anchor_count(),
                indexed: index.len(),
            });
        }
        for (anchor, entry) in &self.anchors {
            index.get(anchor)?;
            for tuple in &entry.tuples {
                for id in tuple.ids() {
                    index.get(id)?;
                }
            }
        }
        Ok(())
    }
}

impl Serialize for TupleCorpus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.anchors.len() + 1))?;
        for (anchor, entry) in &self.anchors {
            map.serialize_entry(anchor, entry)?;
        }
        map.serialize_entry(ALL_KEY, &self.all)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for TupleCorpus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let mut raw = IndexMap::<String, serde_json::Value>::deserialize(deserializer)?;
        let all = raw
            .shift_remove(ALL_KEY)
            .ok_or_else(|| de::Error::missing_field(ALL_KEY))?;
        let all: Vec<Tuple> = serde_json::from_value(all).map_err(de::Error::custom)?;

        let anchors = raw
            .into_iter()
            .map(|(anchor, value)| {
                serde_json::from_value::<AnchorEntry>(value)
                    .map(|entry| (anchor, entry))
                    .map_err(de::Error::custom)
            })
            .collect::<std::result::Result<IndexMap<_, _>, D::Error>>()?;

        Ok(Self { anchors, all })
    }
}
