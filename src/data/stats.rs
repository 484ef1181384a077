//! Channel statistics over a stimulus set.

use super::transform::{open_rgb, ImageTransform};
use crate::stimuli::{scan_images, Convention};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Per-channel mean and population standard deviation, RGB order, `[0, 1]` scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelStats {
    pub mean: [f64; 3],
    pub std: [f64; 3],
    /// Pixels per channel the statistics were computed over.
    pub pixels: u64,
}

impl ChannelStats {
    /// Transform normalizing with these statistics.
    pub fn to_transform(&self, size: u32) -> ImageTransform {
        ImageTransform::new(
            size,
            self.mean.map(|m| m as f32),
            self.std.map(|s| s as f32),
        )
    }
}

#[derive(Debug, Default)]
struct Accumulator {
    sum: [f64; 3],
    sum_sq: [f64; 3],
    pixels: u64,
}

impl Accumulator {
    fn add(&mut self, rgb: [u8; 3]) {
        for (c, &v) in rgb.iter().enumerate() {
            let x = f64::from(v) / 255.0;
            self.sum[c] += x;
            self.sum_sq[c] += x * x;
        }
        self.pixels += 1;
    }

    fn finish(self) -> Option<ChannelStats> {
        if self.pixels == 0 {
            return None;
        }
        let n = self.pixels as f64;
        let mean = self.sum.map(|s| s / n);
        let mut std = [0.0; 3];
        for c in 0..3 {
            std[c] = (self.sum_sq[c] / n - mean[c] * mean[c]).max(0.0).sqrt();
        }
        Some(ChannelStats {
            mean,
            std,
            pixels: self.pixels,
        })
    }
}

/// Mean and std of every pixel of every image of a stimulus set.
///
/// Images are found as for indexing; each one is decoded as RGB at its
/// native size.
pub fn channel_stats(root: &Path, convention: Convention) -> Result<ChannelStats> {
    let images = scan_images(root, convention)?;
    let mut acc = Accumulator::default();
    for path in &images {
        let image = open_rgb(path)?;
        for pixel in image.pixels() {
            acc.add(pixel.0);
        }
        debug!(path = %path.display(), "accumulated image");
    }

    let stats = acc.finish().ok_or_else(|| Error::Image {
        path: root.to_path_buf(),
        message: "no stimulus images to compute statistics over".into(),
    })?;
    info!(
        set = %convention,
        images = images.len(),
        mean = ?stats.mean,
        std = ?stats.std,
        "computed channel statistics"
    );
    Ok(stats)
}
