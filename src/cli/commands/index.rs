//! Index command implementation

use super::diagnostic;
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{ExperimentSpec, IndexArgs};
use cuebias_common::TableBuilder;
use indexmap::IndexMap;

pub fn run_index(spec: &ExperimentSpec, args: IndexArgs, level: LogLevel) -> Result<(), String> {
    let cache = spec.cache.index_cache(args.set);
    let index = if args.rebuild {
        spec.rebuild_index(args.set)
    } else {
        spec.index(args.set)
    }
    .map_err(diagnostic)?;

    log(
        level,
        LogLevel::Normal,
        &format!("{} stimulus index: {} stimuli", args.set, index.len()),
    );
    log(
        level,
        LogLevel::Normal,
        &format!("  Cache: {}", cache.path().display()),
    );

    if level == LogLevel::Verbose {
        let mut per_shape: IndexMap<&str, usize> = IndexMap::new();
        for stimulus in index.iter() {
            *per_shape.entry(stimulus.shape.as_str()).or_default() += 1;
        }
        per_shape.sort_keys();

        let counts: Vec<(String, String)> = per_shape
            .iter()
            .map(|(shape, n)| (shape.to_string(), n.to_string()))
            .collect();
        let mut table = TableBuilder::new().headers(vec!["Shape", "Stimuli"]);
        for (shape, n) in &counts {
            table = table.row(vec![shape.as_str(), n.as_str()]);
        }
        println!();
        println!("{}", table.build().render());
    }

    Ok(())
}
