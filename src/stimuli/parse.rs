//! Stimulus attribute extraction from file names.

use super::{Convention, StimulusAttributes};
use std::path::Path;

/// Field value marking an attribute that was never assigned.
pub const UNASSIGNED_MARKER: &str = "x";

/// Why a file cannot be indexed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidStimulus {
    /// A fake-set field carries the unassigned marker.
    #[error("{field} is unassigned")]
    Unassigned { field: &'static str },

    /// Shape and texture agree, so the image carries no cue conflict.
    #[error("shape and texture are both '{category}'")]
    NotCueConflict { category: String },

    /// Name does not follow the convention.
    #[error("malformed stimulus name: {reason}")]
    Malformed { reason: String },
}

impl InvalidStimulus {
    /// Whether the backing file should be removed from storage.
    pub fn requires_deletion(&self) -> bool {
        matches!(self, Self::Unassigned { .. })
    }

    fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed { reason: reason.into() }
    }
}

/// Extracts attributes from a stimulus path.
pub trait AttributeParser: Send + Sync {
    fn convention(&self) -> Convention;

    fn parse(&self, path: &Path) -> Result<StimulusAttributes, InvalidStimulus>;
}

/// `<shape>/<shape_instance>-<texture_instance>.png`
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleTransferParser;

impl AttributeParser for StyleTransferParser {
    fn convention(&self) -> Convention {
        Convention::StyleTransfer
    }

    fn parse(&self, path: &Path) -> Result<StimulusAttributes, InvalidStimulus> {
        let stem = file_stem(path)?;
        let shape = path
            .parent()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| InvalidStimulus::malformed("no enclosing shape directory"))?;

        let (shape_instance, texture_instance) = stem
            .split_once('-')
            .ok_or_else(|| InvalidStimulus::malformed(format!("'{stem}' has no '-' separator")))?;
        if shape_instance.is_empty() || texture_instance.is_empty() {
            return Err(InvalidStimulus::malformed(format!(
                "'{stem}' has an empty instance"
            )));
        }
        if texture_instance.contains('-') {
            return Err(InvalidStimulus::malformed(format!(
                "'{stem}' has more than one '-' separator"
            )));
        }

        let texture = strip_digits(texture_instance);
        if texture.is_empty() {
            return Err(InvalidStimulus::malformed(format!(
                "texture instance '{texture_instance}' has no category"
            )));
        }
        if texture == shape {
            return Err(InvalidStimulus::NotCueConflict { category: texture });
        }

        Ok(StimulusAttributes {
            shape: shape.to_string(),
            texture,
            color: None,
            shape_instance: Some(shape_instance.to_string()),
            texture_instance: Some(texture_instance.to_string()),
        })
    }
}

/// `<shape>_<texture>_<color>.png`
#[derive(Debug, Clone, Copy, Default)]
pub struct FakeStimulusParser;

impl AttributeParser for FakeStimulusParser {
    fn convention(&self) -> Convention {
        Convention::Fake
    }

    fn parse(&self, path: &Path) -> Result<StimulusAttributes, InvalidStimulus> {
        const FIELDS: [&str; 3] = ["shape", "texture", "color"];

        let stem = file_stem(path)?;
        let parts: Vec<&str> = stem.split('_').collect();
        if parts.len() != FIELDS.len() {
            return Err(InvalidStimulus::malformed(format!(
                "'{stem}' has {} fields, expected 3",
                parts.len()
            )));
        }

        for (field, value) in FIELDS.iter().zip(&parts) {
            if value.eq_ignore_ascii_case(UNASSIGNED_MARKER) {
                return Err(InvalidStimulus::Unassigned { field: *field });
            }
        }
        if let Some((field, _)) = FIELDS.iter().zip(&parts).find(|(_, v)| v.is_empty()) {
            return Err(InvalidStimulus::malformed(format!("'{stem}' has an empty {field}")));
        }

        Ok(StimulusAttributes {
            shape: parts[0].to_string(),
            texture: parts[1].to_string(),
            color: Some(parts[2].to_string()),
            shape_instance: None,
            texture_instance: None,
        })
    }
}

fn file_stem(path: &Path) -> Result<&str, InvalidStimulus> {
    path.file_stem()
        .ok_or_else(|| InvalidStimulus::malformed("no file name"))?
        .to_str()
        .ok_or_else(|| InvalidStimulus::malformed("file name is not valid UTF-8"))
}

/// Texture category of a texture instance (`clock2` → `clock`).
pub fn strip_digits(instance: &str) -> String {
    instance.chars().filter(|c| !c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn st(path: &str) -> Result<StimulusAttributes, InvalidStimulus> {
        StyleTransferParser.parse(&PathBuf::from(path))
    }

    fn fake(path: &str) -> Result<StimulusAttributes, InvalidStimulus> {
        FakeStimulusParser.parse(&PathBuf::from(path))
    }

    #[test]
    fn test_style_transfer_attributes() {
        let attrs = st("stimuli-shape/style-transfer/cat/cat4-truck3.png").unwrap();
        assert_eq!(attrs.shape, "cat");
        assert_eq!(attrs.texture, "truck");
        assert_eq!(attrs.shape_instance.as_deref(), Some("cat4"));
        assert_eq!(attrs.texture_instance.as_deref(), Some("truck3"));
        assert_eq!(attrs.color, None);
    }

    #[test]
    fn test_style_transfer_shape_comes_from_directory() {
        // The shape instance prefix is not consulted for the category.
        let attrs = st("root/airplane/airplane1-bicycle2.png").unwrap();
        assert_eq!(attrs.shape, "airplane");
        assert_eq!(attrs.texture, "bicycle");
    }

    #[test]
    fn test_style_transfer_multi_digit_texture() {
        let attrs = st("root/bear/bear10-clock12.png").unwrap();
        assert_eq!(attrs.texture, "clock");
        assert_eq!(attrs.texture_instance.as_deref(), Some("clock12"));
    }

    #[test]
    fn test_style_transfer_rejects_non_conflict() {
        let err = st("root/cat/cat1-cat2.png").unwrap_err();
        assert_eq!(err, InvalidStimulus::NotCueConflict { category: "cat".into() });
        assert!(!err.requires_deletion());
    }

    #[test]
    fn test_style_transfer_rejects_missing_separator() {
        assert!(matches!(
            st("root/cat/cat4truck3.png"),
            Err(InvalidStimulus::Malformed { .. })
        ));
        assert!(matches!(
            st("root/cat/-truck3.png"),
            Err(InvalidStimulus::Malformed { .. })
        ));
        assert!(matches!(
            st("root/cat/cat4-truck3-extra.png"),
            Err(InvalidStimulus::Malformed { .. })
        ));
    }

    #[test]
    fn test_style_transfer_requires_parent() {
        assert!(matches!(st("cat4-truck3.png"), Err(InvalidStimulus::Malformed { .. })));
    }

    #[test]
    fn test_fake_attributes() {
        let attrs = fake("stimuli-shape/fake/sq_red_blue.png").unwrap();
        assert_eq!(attrs.shape, "sq");
        assert_eq!(attrs.texture, "red");
        assert_eq!(attrs.color.as_deref(), Some("blue"));
        assert_eq!(attrs.shape_instance, None);
    }

    #[test]
    fn test_fake_unassigned_marker_any_case() {
        assert_eq!(
            fake("fake/x_red_blue.png").unwrap_err(),
            InvalidStimulus::Unassigned { field: "shape" }
        );
        assert_eq!(
            fake("fake/sq_X_blue.png").unwrap_err(),
            InvalidStimulus::Unassigned { field: "texture" }
        );
        let err = fake("fake/sq_red_x.png").unwrap_err();
        assert_eq!(err, InvalidStimulus::Unassigned { field: "color" });
        assert!(err.requires_deletion());
    }

    #[test]
    fn test_fake_marker_must_be_whole_field() {
        // "xray" merely contains the marker.
        let attrs = fake("fake/xray_red_blue.png").unwrap();
        assert_eq!(attrs.shape, "xray");
    }

    #[test]
    fn test_fake_wrong_arity_is_malformed_not_deleted() {
        let err = fake("fake/sq_red.png").unwrap_err();
        assert!(matches!(err, InvalidStimulus::Malformed { .. }));
        assert!(!err.requires_deletion());
        assert!(fake("fake/sq_red_blue_green.png").is_err());
        assert!(fake("fake/sq__blue.png").is_err());
    }

    #[test]
    fn test_convention_parser_dispatch() {
        assert_eq!(
            Convention::Fake.parser().convention(),
            Convention::Fake
        );
        assert_eq!(
            Convention::StyleTransfer.parser().convention(),
            Convention::StyleTransfer
        );
    }

    #[test]
    fn test_strip_digits() {
        assert_eq!(strip_digits("clock2"), "clock");
        assert_eq!(strip_digits("truck"), "truck");
        assert_eq!(strip_digits("12"), "");
    }
}
