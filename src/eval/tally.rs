//! Per-stimulus results aggregated into per-shape tables, totals and
//! proportions.

use super::decision::Decision;
use super::mapping::CategoryMapping;
use super::scores::ScoreSource;
use crate::stimuli::{Convention, StimulusIndex};
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

/// The decision on one stimulus, with its full category scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StimulusResult {
    pub id: String,
    pub class_values: Vec<f32>,
    pub decision: Decision,
}

/// Run every style-transfer stimulus through `source` and `mapping`.
///
/// Stimuli are visited in sorted-id order.
pub fn evaluate_style_transfer(
    index: &StimulusIndex,
    source: &mut dyn ScoreSource,
    mapping: &dyn CategoryMapping,
) -> Result<Vec<StimulusResult>> {
    if index.convention() != Convention::StyleTransfer {
        return Err(Error::ConfigError(format!(
            "decision analysis needs a style-transfer index, got {}",
            index.convention()
        )));
    }

    let mut results = Vec::with_capacity(index.len());
    for id in index.sorted_ids() {
        let stimulus = index.get(id)?;
        let probabilities = source.class_scores(stimulus)?;
        let class_values = mapping.map(&probabilities)?;
        let decision = Decision::from_class_values(
            mapping.categories(),
            &class_values,
            &stimulus.shape,
            &stimulus.texture,
        )?;
        results.push(StimulusResult {
            id: id.clone(),
            class_values,
            decision,
        });
    }

    info!(stimuli = results.len(), "evaluated style-transfer stimuli");
    Ok(results)
}

/// One row of a per-shape table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRow {
    pub id: String,
    pub decision: Decision,
}

impl ShapeRow {
    pub const HEADERS: [&'static str; 14] = [
        "Shape",
        "Texture",
        "Decision",
        "Shape Category Value",
        "Texture Category Value",
        "Decision Category Value",
        "Shape Decision",
        "Texture Decision",
        "Neither",
        "Restricted Decision",
        "Restricted Shape Value",
        "Restricted Texture Value",
        "Restricted Shape Decision",
        "Restricted Texture Decision",
    ];

    pub fn fields(&self) -> Vec<String> {
        let d = &self.decision;
        let flag = |b: bool| u8::from(b).to_string();
        vec![
            d.shape.clone(),
            d.texture.clone(),
            d.decision.clone(),
            d.shape_value.to_string(),
            d.texture_value.to_string(),
            d.decision_value.to_string(),
            flag(d.is_shape()),
            flag(d.is_texture()),
            flag(d.is_neither()),
            d.restricted.clone(),
            d.restricted_shape_value.to_string(),
            d.restricted_texture_value.to_string(),
            flag(d.is_restricted_shape()),
            flag(d.is_restricted_texture()),
        ]
    }
}

/// All results for one shape category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeTable {
    pub shape: String,
    pub rows: Vec<ShapeRow>,
}

impl ShapeTable {
    /// Group results by shape, shapes sorted, rows in result order.
    pub fn group(results: &[StimulusResult]) -> Vec<ShapeTable> {
        let mut by_shape: IndexMap<&str, Vec<ShapeRow>> = IndexMap::new();
        for result in results {
            by_shape
                .entry(result.decision.shape.as_str())
                .or_default()
                .push(ShapeRow {
                    id: result.id.clone(),
                    decision: result.decision.clone(),
                });
        }
        by_shape.sort_keys();
        by_shape
            .into_iter()
            .map(|(shape, rows)| ShapeTable {
                shape: shape.to_string(),
                rows,
            })
            .collect()
    }
}

/// Decision counts for one shape category, or for all of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub shape: usize,
    pub texture: usize,
    pub neither: usize,
    pub restricted_shape: usize,
    pub restricted_texture: usize,
}

impl Counts {
    pub fn total(&self) -> usize {
        self.shape + self.texture + self.neither
    }

    fn add(&mut self, other: &Counts) {
        self.shape += other.shape;
        self.texture += other.texture;
        self.neither += other.neither;
        self.restricted_shape += other.restricted_shape;
        self.restricted_texture += other.restricted_texture;
    }
}

/// Per-category counts plus the overall total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub by_shape: IndexMap<String, Counts>,
    pub total: Counts,
}

impl Totals {
    pub const HEADERS: [&'static str; 7] = [
        "Shape Category",
        "Number Shape Decisions",
        "Number Texture Decisions",
        "Number Neither",
        "Number Restricted Shape Decisions",
        "Number Restricted Texture Decisions",
        "Total Number Stimuli",
    ];

    /// Label of the overall row.
    pub const TOTAL_ROW: &'static str = "total";

    /// Count decisions for every category in `categories`.
    ///
    /// Only rows whose restricted shape and restricted texture flags differ
    /// are counted. Categories without rows count zero.
    pub fn from_tables(categories: &[String], tables: &[ShapeTable]) -> Self {
        let mut by_shape: IndexMap<String, Counts> = categories
            .iter()
            .map(|c| (c.clone(), Counts::default()))
            .collect();

        for table in tables {
            let counts = by_shape.entry(table.shape.clone()).or_default();
            for row in &table.rows {
                let d = &row.decision;
                if d.is_restricted_shape() == d.is_restricted_texture() {
                    continue;
                }
                counts.shape += usize::from(d.is_shape());
                counts.texture += usize::from(d.is_texture());
                counts.neither += usize::from(d.is_neither());
                counts.restricted_shape += usize::from(d.is_restricted_shape());
                counts.restricted_texture += usize::from(d.is_restricted_texture());
            }
        }

        let mut total = Counts::default();
        for counts in by_shape.values() {
            total.add(counts);
        }
        Self { by_shape, total }
    }

    /// Rows as written to `totals.csv`, overall row last.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.by_shape
            .iter()
            .map(|(shape, counts)| (shape.as_str(), counts))
            .chain(std::iter::once((Self::TOTAL_ROW, &self.total)))
            .map(|(label, c)| {
                vec![
                    label.to_string(),
                    c.shape.to_string(),
                    c.texture.to_string(),
                    c.neither.to_string(),
                    c.restricted_shape.to_string(),
                    c.restricted_texture.to_string(),
                    c.total().to_string(),
                ]
            })
            .collect()
    }
}

/// Shape and texture proportions of the overall counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Proportions {
    /// shape / (shape + texture)
    pub shape_of_cue: f64,
    /// texture / (shape + texture)
    pub texture_of_cue: f64,
    /// shape / total
    pub shape_of_all: f64,
    /// texture / total
    pub texture_of_all: f64,
    /// restricted shape / total
    pub restricted_shape: f64,
    /// restricted texture / total
    pub restricted_texture: f64,
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

impl Proportions {
    pub fn from_counts(c: &Counts) -> Self {
        let cue = c.shape + c.texture;
        let total = c.total();
        Self {
            shape_of_cue: ratio(c.shape, cue),
            texture_of_cue: ratio(c.texture, cue),
            shape_of_all: ratio(c.shape, total),
            texture_of_all: ratio(c.texture, total),
            restricted_shape: ratio(c.restricted_shape, total),
            restricted_texture: ratio(c.restricted_texture, total),
        }
    }

    /// Labelled lines as written to `proportions.txt`.
    pub fn lines(&self) -> [String; 6] {
        [
            format!(
                "Proportion of shape decisions (disregarding 'neither' decisions): {}",
                self.shape_of_cue
            ),
            format!(
                "Proportion of texture decisions (disregarding 'neither' decisions): {}",
                self.texture_of_cue
            ),
            format!(
                "Proportion of shape decisions (including 'neither' decisions): {}",
                self.shape_of_all
            ),
            format!(
                "Proportion of texture decisions (including 'neither' decisions): {}",
                self.texture_of_all
            ),
            format!(
                "Proportion of shape decisions (restricted to only shape/texture classes): {}",
                self.restricted_shape
            ),
            format!(
                "Proportion of texture decisions (restricted to only shape/texture classes): {}",
                self.restricted_texture
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::mapping::{geirhos_categories, IdentityMapping};
    use crate::eval::scores::PrecomputedScores;
    use crate::stimuli::{Stimulus, StimulusAttributes};
    use approx::assert_abs_diff_eq;
    use std::collections::HashMap;

    fn scores_for(pairs: &[(&str, f32)]) -> Vec<f32> {
        let categories = geirhos_categories();
        let mut v = vec![0.0; 16];
        for (name, value) in pairs {
            v[categories.iter().position(|c| c == name).unwrap()] = *value;
        }
        v
    }

    fn stimulus(id: &str, shape: &str, texture: &str) -> Stimulus {
        Stimulus::new(
            id,
            StimulusAttributes {
                shape: shape.into(),
                texture: texture.into(),
                ..Default::default()
            },
            id,
        )
    }

    fn evaluate() -> Vec<StimulusResult> {
        let index = StimulusIndex::from_stimuli(
            Convention::StyleTransfer,
            [
                stimulus("dog3-truck3.png", "dog", "truck"),
                stimulus("cat4-truck3.png", "cat", "truck"),
                stimulus("cat4-boat2.png", "cat", "boat"),
            ],
        )
        .unwrap();
        let mut source = PrecomputedScores::new(HashMap::from([
            ("cat4-truck3.png".to_string(), scores_for(&[("cat", 0.8), ("truck", 0.1)])),
            ("cat4-boat2.png".to_string(), scores_for(&[("bird", 0.6), ("boat", 0.3)])),
            ("dog3-truck3.png".to_string(), scores_for(&[("truck", 0.9)])),
        ]));
        let mapping = IdentityMapping::new(geirhos_categories());
        evaluate_style_transfer(&index, &mut source, &mapping).unwrap()
    }

    #[test]
    fn test_evaluation_follows_sorted_ids() {
        let results = evaluate();
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["cat4-boat2.png", "cat4-truck3.png", "dog3-truck3.png"]);
        assert_eq!(results[0].decision.decision, "bird");
        assert_eq!(results[0].decision.restricted, "boat");
        assert_eq!(results[0].class_values.len(), 16);
    }

    #[test]
    fn test_fake_index_rejected() {
        let index = StimulusIndex::from_stimuli(Convention::Fake, Vec::new()).unwrap();
        let mapping = IdentityMapping::new(geirhos_categories());
        let mut source = PrecomputedScores::default();
        assert!(evaluate_style_transfer(&index, &mut source, &mapping).is_err());
    }

    #[test]
    fn test_tables_and_totals() {
        let results = evaluate();
        let tables = ShapeTable::group(&results);
        let shapes: Vec<&str> = tables.iter().map(|t| t.shape.as_str()).collect();
        assert_eq!(shapes, ["cat", "dog"]);
        assert_eq!(tables[0].rows.len(), 2);

        let fields = tables[1].rows[0].fields();
        assert_eq!(fields.len(), ShapeRow::HEADERS.len());
        assert_eq!(&fields[..3], ["dog", "truck", "truck"]);
        assert_eq!(&fields[6..9], ["0", "1", "0"]);

        let totals = Totals::from_tables(&geirhos_categories(), &tables);
        assert_eq!(totals.by_shape.len(), 16);
        assert_eq!(
            totals.by_shape["cat"],
            Counts { shape: 1, texture: 0, neither: 1, restricted_shape: 1, restricted_texture: 1 }
        );
        assert_eq!(totals.by_shape["airplane"], Counts::default());
        assert_eq!(totals.total.total(), 3);

        let rows = totals.rows();
        assert_eq!(rows.len(), 17);
        assert_eq!(rows[16][0], Totals::TOTAL_ROW);
        assert_eq!(rows[16][6], "3");
    }

    #[test]
    fn test_proportions() {
        let counts = Counts { shape: 3, texture: 1, neither: 4, restricted_shape: 6, restricted_texture: 2 };
        let p = Proportions::from_counts(&counts);
        assert_abs_diff_eq!(p.shape_of_cue, 0.75);
        assert_abs_diff_eq!(p.texture_of_cue, 0.25);
        assert_abs_diff_eq!(p.shape_of_all, 0.375);
        assert_abs_diff_eq!(p.restricted_texture, 0.25);
        assert!(p.lines()[0].ends_with("0.75"));
    }

    #[test]
    fn test_proportions_of_nothing_are_zero() {
        let p = Proportions::from_counts(&Counts::default());
        assert_eq!(p.shape_of_cue, 0.0);
        assert_eq!(p.restricted_shape, 0.0);
    }
}
