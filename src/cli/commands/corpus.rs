//! Triplets and trials command implementation

use super::diagnostic;
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{CorpusArgs, ExperimentSpec};
use crate::stimuli::{Convention, TupleCorpus};

pub fn run_corpus(
    spec: &ExperimentSpec,
    convention: Convention,
    args: CorpusArgs,
    level: LogLevel,
) -> Result<(), String> {
    let index = spec.index(convention).map_err(diagnostic)?;

    let cache = spec.cache.tuples_cache(convention);
    if args.rebuild {
        cache.invalidate().map_err(diagnostic)?;
    }
    let corpus = TupleCorpus::build_or_load(&index, &cache).map_err(diagnostic)?;
    corpus.verify_against(&index).map_err(diagnostic)?;

    let name = convention.tuple_name();
    let empty: Vec<&String> = corpus.empty_anchors().collect();
    log(
        level,
        LogLevel::Normal,
        &format!(
            "{} {name}s over {} anchors ({} anchors without any)",
            corpus.len(),
            corpus.anchor_count(),
            empty.len()
        ),
    );
    log(
        level,
        LogLevel::Normal,
        &format!("  Cache: {}", cache.path().display()),
    );

    if level == LogLevel::Verbose {
        for (anchor, entry) in corpus.anchors() {
            log(
                level,
                LogLevel::Verbose,
                &format!("  {anchor}: {} {name}s", entry.tuples.len()),
            );
        }
    }
    if args.show_empty && level != LogLevel::Quiet {
        println!();
        println!("Anchors without {name}s:");
        for anchor in empty {
            println!("  {anchor}");
        }
    }

    Ok(())
}
