//! Per-anchor match sets.
//!
//! A candidate matches an anchor on one attribute when that attribute agrees
//! and every other tracked attribute disagrees. Style-transfer matches are
//! further pinned to the exemplar: a shape match shares the anchor's shape
//! instance (`cat4`), a texture match shares its texture instance
//! (`truck3`).

use super::{Convention, StimulusId, StimulusIndex};
use crate::stimuli::Stimulus;
use crate::Result;
use std::fmt;

/// Attribute a match agrees on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    Shape,
    Texture,
    Color,
}

impl MatchKind {
    pub const ALL: [MatchKind; 3] = [MatchKind::Shape, MatchKind::Texture, MatchKind::Color];

    /// Key used for this match list in persisted corpora.
    pub fn persisted_key(self) -> &'static str {
        match self {
            Self::Shape => "shape matches",
            Self::Texture => "texture matches",
            Self::Color => "color matches",
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shape => write!(f, "shape"),
            Self::Texture => write!(f, "texture"),
            Self::Color => write!(f, "color"),
        }
    }
}

/// Finds match sets against a fixed index.
#[derive(Debug, Clone, Copy)]
pub struct MatchFinder<'a> {
    index: &'a StimulusIndex,
}

impl<'a> MatchFinder<'a> {
    pub fn new(index: &'a StimulusIndex) -> Self {
        Self { index }
    }

    /// Ids matching `anchor_id` on `kind`, in index scan order.
    pub fn find(&self, anchor_id: &str, kind: MatchKind) -> Result<Vec<StimulusId>> {
        let anchor = self.index.get(anchor_id)?;
        Ok(self.find_for(anchor, kind))
    }

    /// [`MatchFinder::find`] for an anchor already in hand.
    pub fn find_for(&self, anchor: &Stimulus, kind: MatchKind) -> Vec<StimulusId> {
        let convention = self.index.convention();
        if !convention.tracked_kinds().contains(&kind) {
            return Vec::new();
        }

        self.index
            .iter()
            .filter(|candidate| is_match(convention, anchor, candidate, kind))
            .map(|candidate| candidate.id.clone())
            .collect()
    }
}

/// Match predicate for one anchor/candidate pair.
pub fn is_match(
    convention: Convention,
    anchor: &Stimulus,
    candidate: &Stimulus,
    kind: MatchKind,
) -> bool {
    if candidate.id == anchor.id {
        return false;
    }

    let tracked = convention.tracked_kinds();
    if !tracked.contains(&kind) || candidate.attribute(kind) != anchor.attribute(kind) {
        return false;
    }
    let others_differ = tracked
        .iter()
        .filter(|&&other| other != kind)
        .all(|&other| candidate.attribute(other) != anchor.attribute(other));
    if !others_differ {
        return false;
    }

    match (convention, kind) {
        (Convention::StyleTransfer, MatchKind::Shape) => {
            candidate.shape_instance == anchor.shape_instance
        }
        (Convention::StyleTransfer, MatchKind::Texture) => {
            candidate.texture_instance == anchor.texture_instance
        }
        _ => true,
    }
}
