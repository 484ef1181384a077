//! Evaluate command implementation

use super::diagnostic;
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{EvaluateArgs, ExperimentSpec};
use crate::eval::{
    evaluate_style_transfer, write_reports, CategoryMapping, GroupedMapping, IdentityMapping,
    PrecomputedScores, Totals,
};
use crate::stimuli::Convention;
use cuebias_common::{format_percent, TableBuilder};

pub fn run_evaluate(
    spec: &ExperimentSpec,
    args: EvaluateArgs,
    level: LogLevel,
) -> Result<(), String> {
    let categories = &spec.evaluation.categories;
    let index = spec.index(Convention::StyleTransfer).map_err(diagnostic)?;

    let mapping: Box<dyn CategoryMapping> = match &args.mapping {
        Some(path) => Box::new(GroupedMapping::load(path, categories).map_err(diagnostic)?),
        None => Box::new(IdentityMapping::new(categories.clone())),
    };
    let mut source = PrecomputedScores::load(&args.scores).map_err(diagnostic)?;

    let results =
        evaluate_style_transfer(&index, &mut source, mapping.as_ref()).map_err(diagnostic)?;

    let model = args.model.as_deref().unwrap_or(&spec.evaluation.model);
    let results_dir = args
        .results_dir
        .as_deref()
        .unwrap_or(&spec.evaluation.results_dir);
    let report = write_reports(results_dir, model, categories, &results).map_err(diagnostic)?;

    log(
        level,
        LogLevel::Normal,
        &format!(
            "Evaluated {} stimuli for {model}; reports in {}",
            results.len(),
            report.dir.display()
        ),
    );

    if level == LogLevel::Verbose {
        let rows = report.totals.rows();
        let mut table = TableBuilder::new().headers(Totals::HEADERS.to_vec());
        for row in &rows {
            table = table.row(row.iter().map(String::as_str).collect());
        }
        println!();
        println!("{}", table.build().render());
    }

    let p = &report.proportions;
    log(
        level,
        LogLevel::Normal,
        &format!(
            "Shape {} / texture {} (disregarding 'neither'); restricted shape {} / texture {}",
            format_percent(p.shape_of_cue),
            format_percent(p.texture_of_cue),
            format_percent(p.restricted_shape),
            format_percent(p.restricted_texture)
        ),
    );

    Ok(())
}
