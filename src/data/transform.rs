//! Image preprocessing: resize, tensor layout, normalization.

use crate::{Error, Result};
use image::imageops::{self, FilterType};
use image::RgbImage;
use ndarray::{Array3, Array4, Axis};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default length of the shorter image side after resizing.
pub const DEFAULT_SIZE: u32 = 224;

/// Resize, convert to CHW in `[0, 1]`, and normalize per channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageTransform {
    pub size: u32,
    pub mean: [f32; 3],
    pub std: [f32; 3],
}

impl Default for ImageTransform {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            mean: [0.0; 3],
            std: [1.0; 3],
        }
    }
}

impl ImageTransform {
    pub fn new(size: u32, mean: [f32; 3], std: [f32; 3]) -> Self {
        Self { size, mean, std }
    }

    /// Output `(height, width)` for an input of `width x height`.
    ///
    /// The shorter side becomes `size`; the longer side keeps the aspect
    /// ratio, truncated.
    pub fn output_dims(&self, width: u32, height: u32) -> (u32, u32) {
        if width <= height {
            let h = (u64::from(self.size) * u64::from(height) / u64::from(width.max(1))) as u32;
            (h, self.size)
        } else {
            let w = (u64::from(self.size) * u64::from(width) / u64::from(height.max(1))) as u32;
            (self.size, w)
        }
    }

    /// Transform a decoded RGB image into a `[3, H, W]` tensor.
    pub fn apply(&self, image: &RgbImage) -> Array3<f32> {
        let (height, width) = self.output_dims(image.width(), image.height());
        let resized = if (width, height) == image.dimensions() {
            image.clone()
        } else {
            imageops::resize(image, width, height, FilterType::Triangle)
        };

        let mut tensor = Array3::<f32>::zeros((3, height as usize, width as usize));
        for (x, y, pixel) in resized.enumerate_pixels() {
            for c in 0..3 {
                let value = f32::from(pixel[c]) / 255.0;
                tensor[[c, y as usize, x as usize]] = (value - self.mean[c]) / self.std[c];
            }
        }
        tensor
    }

    /// [`ImageTransform::apply`] with a leading batch axis of one.
    pub fn to_batch(&self, image: &RgbImage) -> Array4<f32> {
        self.apply(image).insert_axis(Axis(0))
    }
}

/// Decode an image file as 8-bit RGB.
pub fn open_rgb(path: &Path) -> Result<RgbImage> {
    let image = image::open(path).map_err(|e| Error::Image {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(image.to_rgb8())
}
