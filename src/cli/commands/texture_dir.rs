//! Texture-dir command implementation

use super::diagnostic;
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{ExperimentSpec, TextureDirArgs};
use crate::stimuli::mirror_by_texture;

pub fn run_texture_dir(
    spec: &ExperimentSpec,
    args: TextureDirArgs,
    level: LogLevel,
) -> Result<(), String> {
    let from = args.from.unwrap_or_else(|| spec.stimuli.style_transfer.clone());
    let to = args.to.unwrap_or_else(|| spec.stimuli.texture.clone());

    let copied = mirror_by_texture(&from, &to).map_err(diagnostic)?;
    log(
        level,
        LogLevel::Normal,
        &format!(
            "Copied {copied} images from {} into {}",
            from.display(),
            to.display()
        ),
    );
    Ok(())
}
