//! CLI argument parsing
//!
//! # Usage
//!
//! ```bash
//! cuebias index --set fake
//! cuebias --config experiment.yaml triplets
//! cuebias trials --rebuild
//! cuebias stats --set style-transfer --format json
//! cuebias texture-dir
//! cuebias evaluate --scores probs.json --mapping imagenet16.json --model resnet50
//! cuebias info --format yaml
//! ```

mod core;
mod types;

pub use self::core::{
    parse_args, Cli, Command, CorpusArgs, EvaluateArgs, IndexArgs, InfoArgs, StatsArgs,
    TextureDirArgs,
};
pub use types::OutputFormat;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stimuli::Convention;
    use std::path::PathBuf;

    #[test]
    fn test_parse_index_defaults() {
        let cli = parse_args(["cuebias", "index"]).unwrap();
        match cli.command {
            Command::Index(args) => {
                assert_eq!(args.set, Convention::StyleTransfer);
                assert!(!args.rebuild);
            }
            _ => panic!("Expected Index command"),
        }
        assert_eq!(cli.config, None);
    }

    #[test]
    fn test_parse_index_fake_rebuild() {
        let cli = parse_args(["cuebias", "index", "--set", "fake", "--rebuild"]).unwrap();
        match cli.command {
            Command::Index(args) => {
                assert_eq!(args.set, Convention::Fake);
                assert!(args.rebuild);
            }
            _ => panic!("Expected Index command"),
        }
    }

    #[test]
    fn test_parse_unknown_set() {
        assert!(parse_args(["cuebias", "index", "--set", "imagenet"]).is_err());
    }

    #[test]
    fn test_parse_corpus_commands() {
        let cli = parse_args(["cuebias", "triplets", "--show-empty"]).unwrap();
        assert!(matches!(cli.command, Command::Triplets(CorpusArgs { show_empty: true, .. })));

        let cli = parse_args(["cuebias", "trials", "--rebuild"]).unwrap();
        assert!(matches!(cli.command, Command::Trials(CorpusArgs { rebuild: true, .. })));
    }

    #[test]
    fn test_parse_stats() {
        let cli = parse_args(["cuebias", "stats", "--set", "fake", "--format", "json"]).unwrap();
        match cli.command {
            Command::Stats(args) => {
                assert_eq!(args.set, Convention::Fake);
                assert_eq!(args.format, OutputFormat::Json);
            }
            _ => panic!("Expected Stats command"),
        }
    }

    #[test]
    fn test_parse_texture_dir() {
        let cli = parse_args(["cuebias", "texture-dir", "--to", "out"]).unwrap();
        match cli.command {
            Command::TextureDir(args) => {
                assert_eq!(args.from, None);
                assert_eq!(args.to, Some(PathBuf::from("out")));
            }
            _ => panic!("Expected TextureDir command"),
        }
    }

    #[test]
    fn test_parse_evaluate() {
        let cli = parse_args([
            "cuebias",
            "evaluate",
            "--scores",
            "probs.json",
            "--mapping",
            "groups.json",
            "--model",
            "resnet50",
        ])
        .unwrap();
        match cli.command {
            Command::Evaluate(args) => {
                assert_eq!(args.scores, PathBuf::from("probs.json"));
                assert_eq!(args.mapping, Some(PathBuf::from("groups.json")));
                assert_eq!(args.model.as_deref(), Some("resnet50"));
                assert_eq!(args.results_dir, None);
            }
            _ => panic!("Expected Evaluate command"),
        }
    }

    #[test]
    fn test_evaluate_requires_scores() {
        assert!(parse_args(["cuebias", "evaluate"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse_args(["cuebias", "info", "-v", "--config", "exp.yaml"]).unwrap();
        assert!(cli.verbose);
        assert!(!cli.quiet);
        assert_eq!(cli.config, Some(PathBuf::from("exp.yaml")));
    }

    #[test]
    fn test_global_quiet_flag() {
        let cli = parse_args(["cuebias", "-q", "trials"]).unwrap();
        assert!(cli.quiet);
    }

    #[test]
    fn test_unknown_command() {
        assert!(parse_args(["cuebias", "train"]).is_err());
    }
}
