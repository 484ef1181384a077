//! Result files: per-shape CSVs, `totals.csv` and `proportions.txt`.

use super::tally::{Proportions, ShapeRow, ShapeTable, StimulusResult, Totals};
use crate::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const TOTALS_FILE: &str = "totals.csv";
pub const PROPORTIONS_FILE: &str = "proportions.txt";

/// Everything written for one model.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub dir: PathBuf,
    pub tables: Vec<ShapeTable>,
    pub totals: Totals,
    pub proportions: Proportions,
}

impl Report {
    pub fn new(dir: PathBuf, categories: &[String], results: &[StimulusResult]) -> Self {
        let tables = ShapeTable::group(results);
        let totals = Totals::from_tables(categories, &tables);
        let proportions = Proportions::from_counts(&totals.total);
        Self {
            dir,
            tables,
            totals,
            proportions,
        }
    }

    /// Write all files under `dir`, creating it if needed.
    pub fn write(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        for table in &self.tables {
            let rows: Vec<Vec<String>> = table.rows.iter().map(ShapeRow::fields).collect();
            write_csv(
                &self.dir.join(format!("{}.csv", table.shape)),
                &ShapeRow::HEADERS,
                &rows,
            )?;
        }
        write_csv(
            &self.dir.join(TOTALS_FILE),
            &Totals::HEADERS,
            &self.totals.rows(),
        )?;

        let mut text = self.proportions.lines().join("\n");
        text.push('\n');
        fs::write(self.dir.join(PROPORTIONS_FILE), text)?;

        info!(
            dir = %self.dir.display(),
            shapes = self.tables.len(),
            "wrote decision reports"
        );
        Ok(())
    }
}

/// Compute and write the reports of `model` under `results_dir/model`.
pub fn write_reports(
    results_dir: &Path,
    model: &str,
    categories: &[String],
    results: &[StimulusResult],
) -> Result<Report> {
    let report = Report::new(results_dir.join(model), categories, results);
    report.write()?;
    Ok(report)
}

fn write_csv(path: &Path, headers: &[&str], rows: &[Vec<String>]) -> Result<()> {
    let mut out = String::new();
    push_record(&mut out, headers.iter().copied());
    for row in rows {
        push_record(&mut out, row.iter().map(String::as_str));
    }
    fs::write(path, out)?;
    Ok(())
}

fn push_record<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        if field.contains([',', '"', '\n']) {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(field);
        }
    }
    out.push('\n');
}
