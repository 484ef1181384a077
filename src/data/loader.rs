//! Tensor access to indexed stimuli.

use super::transform::{open_rgb, ImageTransform};
use crate::stimuli::{Stimulus, StimulusIndex, Tuple};
use crate::{Error, Result};
use ndarray::Array4;

/// Loads indexed stimuli as normalized batches of one.
#[derive(Debug, Clone)]
pub struct StimulusLoader<'a> {
    index: &'a StimulusIndex,
    transform: ImageTransform,
}

impl<'a> StimulusLoader<'a> {
    pub fn new(index: &'a StimulusIndex, transform: ImageTransform) -> Self {
        Self { index, transform }
    }

    pub fn index(&self) -> &'a StimulusIndex {
        self.index
    }

    pub fn transform(&self) -> &ImageTransform {
        &self.transform
    }

    /// Decode and transform the stimulus `id`.
    pub fn load(&self, id: &str) -> Result<Array4<f32>> {
        let stimulus = self.index.get(id)?;
        self.load_stimulus(stimulus)
    }

    pub fn load_stimulus(&self, stimulus: &Stimulus) -> Result<Array4<f32>> {
        let image = open_rgb(&stimulus.location)?;
        Ok(self.transform.to_batch(&image))
    }

    /// Positional access through the sorted id list.
    pub fn load_sorted(&self, position: usize) -> Result<(Array4<f32>, &'a Stimulus)> {
        let stimulus = self.index.get_sorted(position)?;
        Ok((self.load_stimulus(stimulus)?, stimulus))
    }

    /// Anchor, shape match and texture match.
    pub fn load_triplet(&self, triplet: &Tuple) -> Result<[Array4<f32>; 3]> {
        self.load_exact::<3>(triplet)
    }

    /// Anchor, shape, texture and color match.
    pub fn load_trial(&self, trial: &Tuple) -> Result<[Array4<f32>; 4]> {
        self.load_exact::<4>(trial)
    }

    fn load_exact<const N: usize>(&self, tuple: &Tuple) -> Result<[Array4<f32>; N]> {
        if tuple.len() != N {
            return Err(Error::DimensionMismatch {
                expected: N,
                actual: tuple.len(),
            });
        }
        let tensors = tuple
            .ids()
            .iter()
            .map(|id| self.load(id))
            .collect::<Result<Vec<_>>>()?;
        tensors.try_into().map_err(|v: Vec<_>| Error::DimensionMismatch {
            expected: N,
            actual: v.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stimuli::Convention;
    use image::{Rgb, RgbImage};
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, name: &str, rgb: [u8; 3]) {
        RgbImage::from_pixel(4, 4, Rgb(rgb))
            .save(root.join(name))
            .unwrap();
    }

    fn fake_index(dir: &TempDir) -> StimulusIndex {
        write(dir.path(), "sq_red_blue.png", [255, 0, 0]);
        write(dir.path(), "sq_dots_green.png", [0, 255, 0]);
        write(dir.path(), "tri_red_green.png", [0, 0, 255]);
        write(dir.path(), "circ_dots_blue.png", [255, 255, 255]);
        StimulusIndex::build(dir.path(), Convention::Fake).unwrap()
    }

    #[test]
    fn test_load_by_id() {
        let dir = TempDir::new().unwrap();
        let index = fake_index(&dir);
        let loader = StimulusLoader::new(&index, ImageTransform::new(2, [0.0; 3], [1.0; 3]));

        let batch = loader.load("sq_dots_green.png").unwrap();
        assert_eq!(batch.shape(), &[1, 3, 2, 2]);
        assert!((batch[[0, 1, 0, 0]] - 1.0).abs() < 1e-6);
        assert!(matches!(loader.load("nope.png"), Err(Error::UnknownStimulus(_))));
    }

    #[test]
    fn test_load_sorted_uses_sorted_ids() {
        let dir = TempDir::new().unwrap();
        let index = fake_index(&dir);
        let loader = StimulusLoader::new(&index, ImageTransform::new(2, [0.0; 3], [1.0; 3]));

        let (batch, stimulus) = loader.load_sorted(0).unwrap();
        assert_eq!(stimulus.id, "circ_dots_blue.png");
        assert!((batch[[0, 0, 1, 1]] - 1.0).abs() < 1e-6);
        assert_eq!(loader.len(), 4);
    }

    #[test]
    fn test_load_trial_and_arity() {
        let dir = TempDir::new().unwrap();
        let index = fake_index(&dir);
        let loader = StimulusLoader::new(&index, ImageTransform::new(2, [0.0; 3], [1.0; 3]));
        let trial = Tuple::new(vec![
            "sq_red_blue.png".into(),
            "sq_dots_green.png".into(),
            "tri_red_green.png".into(),
            "circ_dots_blue.png".into(),
        ]);

        let [anchor, _, texture, _] = loader.load_trial(&trial).unwrap();
        assert!((anchor[[0, 0, 0, 0]] - 1.0).abs() < 1e-6);
        assert!((texture[[0, 2, 0, 0]] - 1.0).abs() < 1e-6);
        assert!(matches!(
            loader.load_triplet(&trial),
            Err(Error::DimensionMismatch { expected: 3, actual: 4 })
        ));
    }
}
