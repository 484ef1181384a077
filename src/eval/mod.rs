//! Shape-vs-texture decision analysis
//!
//! Classifier probabilities are reduced to coarse category scores
//! ([`CategoryMapping`]), turned into a [`Decision`] per stimulus, and
//! aggregated into per-shape tables, totals and proportions.

mod decision;
mod mapping;
mod report;
mod scores;
mod tally;

pub use decision::{softmax, Decision};
pub use mapping::{
    geirhos_categories, CategoryMapping, GroupedMapping, IdentityMapping, GEIRHOS_CATEGORIES,
};
pub use report::{write_reports, Report, PROPORTIONS_FILE, TOTALS_FILE};
pub use scores::{Classifier, ModelScores, PrecomputedScores, ScoreSource};
pub use tally::{
    evaluate_style_transfer, Counts, Proportions, ShapeRow, ShapeTable, StimulusResult, Totals,
};
