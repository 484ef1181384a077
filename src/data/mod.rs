//! Image data for stimuli: decoding, normalization and set statistics.

mod loader;
mod stats;
mod transform;

pub use loader::StimulusLoader;
pub use stats::{channel_stats, ChannelStats};
pub use transform::{open_rgb, ImageTransform, DEFAULT_SIZE};
