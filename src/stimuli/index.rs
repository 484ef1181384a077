//! Persistent stimulus index.

use super::cache::{CacheStatus, JsonCache};
use super::layout::scan_images;
use super::parse::InvalidStimulus;
use super::tuples::ALL_KEY;
use super::{Convention, Stimulus, StimulusId};
use crate::{Error, Result};
use indexmap::IndexMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, trace, warn};

/// Persisted form of an index: id → attribute record, in scan order.
pub type PersistedIndex = IndexMap<StimulusId, Stimulus>;

/// Immutable mapping from stimulus id to its attributes.
///
/// Iteration follows insertion (scan) order. Positional access goes through
/// the sorted id list so it does not depend on how the index was produced.
#[derive(Debug, Clone, PartialEq)]
pub struct StimulusIndex {
    convention: Convention,
    stimuli: PersistedIndex,
    sorted: Vec<StimulusId>,
}

/// Counters from one scan of a storage root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub indexed: usize,
    pub deleted: usize,
    pub not_cue_conflict: usize,
    pub malformed: usize,
}

impl StimulusIndex {
    /// Build from already-parsed stimuli, keeping their order.
    pub fn from_stimuli(
        convention: Convention,
        stimuli: impl IntoIterator<Item = Stimulus>,
    ) -> Result<Self> {
        let mut map = PersistedIndex::new();
        for stimulus in stimuli {
            if stimulus.id == ALL_KEY {
                return Err(Error::ReservedId(stimulus.id));
            }
            map.insert(stimulus.id.clone(), stimulus);
        }
        Ok(Self::from_map(convention, map))
    }

    fn from_map(convention: Convention, stimuli: PersistedIndex) -> Self {
        let mut sorted: Vec<StimulusId> = stimuli.keys().cloned().collect();
        sorted.sort();
        Self {
            convention,
            stimuli,
            sorted,
        }
    }

    /// Scan `root` and index every valid stimulus.
    ///
    /// Fake stimuli carrying the unassigned marker are deleted from disk.
    pub fn build(root: impl AsRef<Path>, convention: Convention) -> Result<Self> {
        Self::build_with_report(root, convention).map(|(index, _)| index)
    }

    /// [`StimulusIndex::build`], also returning what the scan skipped.
    pub fn build_with_report(
        root: impl AsRef<Path>,
        convention: Convention,
    ) -> Result<(Self, ScanReport)> {
        let root = root.as_ref();
        let parser = convention.parser();
        let mut report = ScanReport::default();
        let mut stimuli = Vec::new();

        for path in scan_images(root, convention)? {
            let Some(id) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
                report.malformed += 1;
                warn!(path = %path.display(), "skipping stimulus with non UTF-8 name");
                continue;
            };

            match parser.parse(&path) {
                Ok(attributes) => stimuli.push(Stimulus::new(id, attributes, path)),
                Err(invalid) if invalid.requires_deletion() => {
                    report.deleted += 1;
                    info!(path = %path.display(), "removing invalid stimulus: {invalid}");
                    if let Err(e) = fs::remove_file(&path) {
                        warn!(path = %path.display(), "failed to remove invalid stimulus: {e}");
                    }
                }
                Err(InvalidStimulus::NotCueConflict { .. }) => {
                    report.not_cue_conflict += 1;
                    trace!(stimulus = %id, "not a cue conflict");
                }
                Err(invalid) => {
                    report.malformed += 1;
                    warn!(path = %path.display(), "skipping stimulus: {invalid}");
                }
            }
        }

        let index = Self::from_stimuli(convention, stimuli)?;
        report.indexed = index.len();
        info!(
            root = %root.display(),
            set = %convention,
            indexed = report.indexed,
            deleted = report.deleted,
            skipped = report.not_cue_conflict + report.malformed,
            "built stimulus index"
        );
        Ok((index, report))
    }

    /// Load the persisted index, or scan `root` and persist the result.
    ///
    /// A cached index is returned as-is. `IndexUnavailable` is returned only
    /// when there is no cache and `root` does not exist.
    pub fn build_or_load(
        root: impl AsRef<Path>,
        convention: Convention,
        cache: &JsonCache<PersistedIndex>,
    ) -> Result<Self> {
        let root = root.as_ref();
        let (map, status) = cache.load_or_build(|| {
            Self::build(root, convention).map(|index| index.stimuli)
        })?;

        if status == CacheStatus::Hit {
            debug!(path = %cache.path().display(), "loaded cached stimulus index");
        }
        Ok(Self::from_persisted(convention, map))
    }

    /// Rescan `root` and replace the persisted index.
    ///
    /// The cache is only overwritten once the scan has succeeded, so a
    /// missing root leaves the previous index in place.
    pub fn rebuild(
        root: impl AsRef<Path>,
        convention: Convention,
        cache: &JsonCache<PersistedIndex>,
    ) -> Result<Self> {
        let index = Self::build(root, convention)?;
        cache.store(index.as_persisted())?;
        Ok(index)
    }

    /// Restore an index from its persisted form.
    pub fn from_persisted(convention: Convention, mut map: PersistedIndex) -> Self {
        for (id, stimulus) in map.iter_mut() {
            stimulus.id.clone_from(id);
        }
        Self::from_map(convention, map)
    }

    /// Persisted form (id → record, scan order).
    pub fn as_persisted(&self) -> &PersistedIndex {
        &self.stimuli
    }

    pub fn convention(&self) -> Convention {
        self.convention
    }

    pub fn len(&self) -> usize {
        self.stimuli.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stimuli.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.stimuli.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Result<&Stimulus> {
        self.stimuli
            .get(id)
            .ok_or_else(|| Error::UnknownStimulus(id.to_string()))
    }

    /// Stimulus at `position` in sorted-id order.
    pub fn get_sorted(&self, position: usize) -> Result<&Stimulus> {
        let id = self
            .sorted
            .get(position)
            .ok_or_else(|| Error::UnknownStimulus(format!("#{position}")))?;
        self.get(id)
    }

    /// Ids in lexicographic order.
    pub fn sorted_ids(&self) -> &[StimulusId] {
        &self.sorted
    }

    /// Stimuli in scan order.
    pub fn iter(&self) -> impl Iterator<Item = &Stimulus> {
        self.stimuli.values()
    }

    /// Ids in scan order.
    pub fn ids(&self) -> impl Iterator<Item = &StimulusId> {
        self.stimuli.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"png").unwrap();
    }

    fn style_transfer_root(dir: &TempDir) -> PathBuf {
        let root = dir.path().join("style-transfer");
        for file in [
            "cat/cat4-truck3.png",
            "cat/cat4-boat2.png",
            "cat/cat1-cat2.png",
            "dog/dog3-truck3.png",
            "dog/malformed.png",
        ] {
            touch(&root.join(file));
        }
        root
    }

    #[test]
    fn test_build_style_transfer_filters_non_conflict() {
        let dir = TempDir::new().unwrap();
        let root = style_transfer_root(&dir);

        let (index, report) =
            StimulusIndex::build_with_report(&root, Convention::StyleTransfer).unwrap();
        assert_eq!(index.len(), 3);
        assert!(!index.contains("cat1-cat2.png"));
        assert!(index.iter().all(Stimulus::is_cue_conflict));
        assert_eq!(report.not_cue_conflict, 1);
        assert_eq!(report.malformed, 1);
        assert_eq!(report.deleted, 0);
        assert!(root.join("cat/cat1-cat2.png").exists());

        let ids: Vec<&str> = index.ids().map(String::as_str).collect();
        assert_eq!(ids, ["cat4-boat2.png", "cat4-truck3.png", "dog3-truck3.png"]);

        let stimulus = index.get("dog3-truck3.png").unwrap();
        assert_eq!(stimulus.shape, "dog");
        assert_eq!(stimulus.texture, "truck");
        assert_eq!(stimulus.location, root.join("dog/dog3-truck3.png"));
    }

    #[test]
    fn test_build_fake_deletes_unassigned() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("fake");
        for file in ["sq_red_blue.png", "sq_X_blue.png", "x_red_green.png", "tri_red.png"] {
            touch(&root.join(file));
        }

        let (index, report) = StimulusIndex::build_with_report(&root, Convention::Fake).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(report.deleted, 2);
        assert_eq!(report.malformed, 1);
        assert!(!root.join("sq_X_blue.png").exists());
        assert!(!root.join("x_red_green.png").exists());
        assert!(root.join("tri_red.png").exists());
        assert_eq!(index.get("sq_red_blue.png").unwrap().color.as_deref(), Some("blue"));
    }

    #[test]
    fn test_missing_root_without_cache_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let cache = JsonCache::new(dir.path().join("index.json"));
        let err = StimulusIndex::build_or_load(dir.path().join("absent"), Convention::Fake, &cache)
            .unwrap_err();
        assert!(matches!(err, Error::IndexUnavailable(_)));
        assert!(!cache.path().exists());
    }

    #[test]
    fn test_cached_index_used_without_storage() {
        let dir = TempDir::new().unwrap();
        let root = style_transfer_root(&dir);
        let cache = JsonCache::new(dir.path().join("geirhos_shape_classes.json"));

        let built = StimulusIndex::build_or_load(&root, Convention::StyleTransfer, &cache).unwrap();
        fs::remove_dir_all(&root).unwrap();

        let loaded = StimulusIndex::build_or_load(&root, Convention::StyleTransfer, &cache).unwrap();
        assert_eq!(built, loaded);
        assert_eq!(loaded.get("cat4-boat2.png").unwrap().id, "cat4-boat2.png");
    }

    #[test]
    fn test_get_sorted_ignores_insertion_order() {
        let make = |id: &str| {
            Stimulus::new(
                id,
                crate::stimuli::StimulusAttributes {
                    shape: "a".into(),
                    texture: "b".into(),
                    ..Default::default()
                },
                id,
            )
        };
        let index = StimulusIndex::from_stimuli(
            Convention::StyleTransfer,
            [make("c.png"), make("a.png"), make("b.png")],
        )
        .unwrap();

        assert_eq!(index.get_sorted(0).unwrap().id, "a.png");
        assert_eq!(index.get_sorted(2).unwrap().id, "c.png");
        assert!(matches!(index.get_sorted(3), Err(Error::UnknownStimulus(_))));
        let ids: Vec<&str> = index.ids().map(String::as_str).collect();
        assert_eq!(ids, ["c.png", "a.png", "b.png"]);
    }

    #[test]
    fn test_reserved_id_rejected() {
        let stimulus = Stimulus::new(
            ALL_KEY,
            crate::stimuli::StimulusAttributes::default(),
            "all",
        );
        let err = StimulusIndex::from_stimuli(Convention::Fake, [stimulus]).unwrap_err();
        assert!(matches!(err, Error::ReservedId(_)));
    }

    #[test]
    fn test_unknown_id() {
        let index = StimulusIndex::from_stimuli(Convention::Fake, Vec::new()).unwrap();
        assert!(index.is_empty());
        assert!(matches!(index.get("nope.png"), Err(Error::UnknownStimulus(id)) if id == "nope.png"));
    }

    #[test]
    fn test_rebuild_refreshes_cache() {
        let dir = TempDir::new().unwrap();
        let root = style_transfer_root(&dir);
        let cache = JsonCache::new(dir.path().join("index.json"));
        StimulusIndex::build_or_load(&root, Convention::StyleTransfer, &cache).unwrap();

        touch(&root.join("truck/truck1-cat4.png"));
        let cached = StimulusIndex::build_or_load(&root, Convention::StyleTransfer, &cache).unwrap();
        assert!(!cached.contains("truck1-cat4.png"));

        let rebuilt = StimulusIndex::rebuild(&root, Convention::StyleTransfer, &cache).unwrap();
        assert!(rebuilt.contains("truck1-cat4.png"));
        let reloaded = StimulusIndex::build_or_load(&root, Convention::StyleTransfer, &cache).unwrap();
        assert_eq!(reloaded, rebuilt);
    }

    #[test]
    fn test_rebuild_without_storage_keeps_cache() {
        let dir = TempDir::new().unwrap();
        let root = style_transfer_root(&dir);
        let cache = JsonCache::new(dir.path().join("index.json"));
        let original = StimulusIndex::build_or_load(&root, Convention::StyleTransfer, &cache).unwrap();
        let bytes = fs::read(cache.path()).unwrap();

        fs::remove_dir_all(&root).unwrap();
        let err = StimulusIndex::rebuild(&root, Convention::StyleTransfer, &cache).unwrap_err();
        assert!(matches!(err, Error::IndexUnavailable(_)));
        assert_eq!(fs::read(cache.path()).unwrap(), bytes);

        let fallback = StimulusIndex::build_or_load(&root, Convention::StyleTransfer, &cache).unwrap();
        assert_eq!(fallback, original);
    }
}
