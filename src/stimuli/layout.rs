//! On-disk stimulus layout: scanning and the texture-organised mirror.

use super::parse::strip_digits;
use super::Convention;
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Image file extension of the stimulus sets.
pub const IMAGE_EXTENSION: &str = "png";

/// macOS metadata entry skipped when walking category directories.
const DS_STORE: &str = ".DS_Store";

/// All stimulus images under `root`, in file-name order.
///
/// Style-transfer images live one directory below the root, fake images
/// directly in it. Returns `IndexUnavailable` when `root` is not a directory.
pub fn scan_images(root: &Path, convention: Convention) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::IndexUnavailable(root.to_path_buf()));
    }

    let depth = convention.image_depth();
    let mut images = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(depth)
        .max_depth(depth)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            Error::Io(e.into_io_error().unwrap_or_else(|| {
                std::io::Error::other("filesystem loop while scanning stimuli")
            }))
        })?;
        if entry.file_type().is_file() && has_image_extension(entry.path()) {
            images.push(entry.into_path());
        }
    }

    debug!(root = %root.display(), count = images.len(), "scanned stimulus images");
    Ok(images)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(IMAGE_EXTENSION)
}

/// Copy a shape-organised style-transfer set into a texture-organised tree.
///
/// `texture_root` is removed and recreated. One directory is created per
/// shape category under `shape_root`; every image is copied to
/// `texture_root/<texture>/<file>`, where `<texture>` is the digit-stripped
/// texture instance. Every image is copied, cue-conflict or not.
///
/// Returns the number of files copied. `OverlappingRoots` is returned, and
/// nothing is removed, when either root contains the other.
pub fn mirror_by_texture(shape_root: &Path, texture_root: &Path) -> Result<usize> {
    if !shape_root.is_dir() {
        return Err(Error::IndexUnavailable(shape_root.to_path_buf()));
    }

    let source = shape_root.canonicalize()?;
    let target = resolve(texture_root)?;
    if source.starts_with(&target) || target.starts_with(&source) {
        return Err(Error::OverlappingRoots {
            source_root: shape_root.to_path_buf(),
            target: texture_root.to_path_buf(),
        });
    }

    if texture_root.exists() {
        fs::remove_dir_all(texture_root)?;
    }
    fs::create_dir_all(texture_root)?;

    let mut categories: Vec<String> = fs::read_dir(shape_root)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .filter(|name| name != DS_STORE)
        .collect();
    categories.sort();

    for category in &categories {
        fs::create_dir_all(texture_root.join(category))?;
    }

    let mut copied = 0;
    for image in scan_images(shape_root, Convention::StyleTransfer)? {
        let Some(name) = image.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some((_, texture_instance)) = name
            .trim_end_matches(&format!(".{IMAGE_EXTENSION}"))
            .split_once('-')
        else {
            debug!(file = name, "skipping image without texture instance");
            continue;
        };
        let texture = strip_digits(texture_instance);

        let target_dir = texture_root.join(&texture);
        fs::create_dir_all(&target_dir)?;
        fs::copy(&image, target_dir.join(name))?;
        copied += 1;
    }

    info!(
        from = %shape_root.display(),
        to = %texture_root.display(),
        copied,
        "mirrored stimuli by texture"
    );
    Ok(copied)
}

/// Absolute form of `path`, following symlinks through its longest existing
/// prefix.
fn resolve(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut existing = absolute.as_path();
    let mut rest = Vec::new();
    while !existing.exists() {
        let (Some(parent), Some(name)) = (existing.parent(), existing.file_name()) else {
            return Ok(absolute);
        };
        rest.push(name.to_os_string());
        existing = parent;
    }

    let mut resolved = existing.canonicalize()?;
    for name in rest.iter().rev() {
        resolved.push(name);
    }
    Ok(resolved)
}
