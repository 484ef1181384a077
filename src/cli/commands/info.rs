//! Info command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{ExperimentSpec, InfoArgs, OutputFormat};
use crate::stimuli::Convention;

pub fn run_info(spec: &ExperimentSpec, args: InfoArgs, level: LogLevel) -> Result<(), String> {
    match args.format {
        OutputFormat::Text => {
            log(level, LogLevel::Normal, "Configuration Info:");
            println!();
            for convention in [Convention::StyleTransfer, Convention::Fake] {
                println!(
                    "{convention}: {} (index: {}, {}s: {})",
                    spec.stimuli.root(convention).display(),
                    spec.cache.index_path(convention).display(),
                    convention.tuple_name(),
                    spec.cache.tuples_path(convention).display()
                );
            }
            println!("Texture mirror: {}", spec.stimuli.texture.display());
            match spec.transform.fixed() {
                Some(t) => println!(
                    "Transform: size={} mean={:?} std={:?}",
                    t.size, t.mean, t.std
                ),
                None => println!(
                    "Transform: size={} (mean and std computed over each stimulus set; see `cuebias stats`)",
                    spec.transform.size
                ),
            }
            println!(
                "Evaluation: model={} results={} categories={}",
                spec.evaluation.model,
                spec.evaluation.results_dir.display(),
                spec.evaluation.categories.len()
            );
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(spec)
                .map_err(|e| format!("JSON serialization error: {e}"))?;
            println!("{json}");
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(spec)
                .map_err(|e| format!("YAML serialization error: {e}"))?;
            println!("{yaml}");
        }
    }

    Ok(())
}
