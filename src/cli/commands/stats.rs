//! Stats command implementation

use super::diagnostic;
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{ExperimentSpec, OutputFormat, StatsArgs};
use crate::data::channel_stats;
use cuebias_common::TableBuilder;

pub fn run_stats(spec: &ExperimentSpec, args: StatsArgs, level: LogLevel) -> Result<(), String> {
    let root = spec.stimuli.root(args.set);
    let stats = channel_stats(root, args.set).map_err(diagnostic)?;
    let transform = spec.transform.resolve(|| Ok(stats)).map_err(diagnostic)?;
    let normalization = if spec.transform.fixed().is_some() {
        "configured"
    } else {
        "computed"
    };

    match args.format {
        OutputFormat::Text => {
            log(
                level,
                LogLevel::Normal,
                &format!("Channel statistics for {} ({}):", args.set, root.display()),
            );
            let rows: Vec<[String; 3]> = ["R", "G", "B"]
                .iter()
                .enumerate()
                .map(|(c, name)| {
                    [
                        name.to_string(),
                        format!("{:.6}", stats.mean[c]),
                        format!("{:.6}", stats.std[c]),
                    ]
                })
                .collect();
            let mut table = TableBuilder::new().headers(vec!["Channel", "Mean", "Std"]);
            for row in &rows {
                table = table.row(row.iter().map(String::as_str).collect());
            }
            println!("{}", table.build().render());
            log(
                level,
                LogLevel::Normal,
                &format!(
                    "Transform ({normalization}): size={} mean={:?} std={:?}",
                    transform.size, transform.mean, transform.std
                ),
            );
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&stats)
                .map_err(|e| format!("JSON serialization error: {e}"))?;
            println!("{json}");
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&stats)
                .map_err(|e| format!("YAML serialization error: {e}"))?;
            println!("{yaml}");
        }
    }

    Ok(())
}
