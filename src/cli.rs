//! Command-line interface for the Combine Ace scenario runner

use clap::Parser;
use std::path::PathBuf;

use crate::tunables::DEFAULT_TUNABLES_PATH;

/// Headless Combine Ace scenario runner
#[derive(Parser, Debug)]
#[command(name = "combine-ace")]
#[command(about = "Run scripted Combine Ace damage scenarios")]
#[command(version)]
pub struct Args {
    /// JSON scenario file to run
    #[arg(long, value_name = "SCENARIO_FILE")]
    pub scenario: PathBuf,

    /// RON tunables file
    #[arg(long, value_name = "TUNABLES_FILE", default_value = DEFAULT_TUNABLES_PATH)]
    pub tunables: PathBuf,

    /// Output path for the combat log (overrides the scenario's)
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Random seed (overrides the scenario's)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Maximum scenario duration in seconds (overrides the scenario's)
    #[arg(long)]
    pub max_duration: Option<f32>,
}

pub fn parse_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["combine-ace", "--scenario", "s.json"]).unwrap();
        assert_eq!(args.scenario, PathBuf::from("s.json"));
        assert_eq!(args.tunables, PathBuf::from(DEFAULT_TUNABLES_PATH));
        assert!(args.seed.is_none());
        assert!(args.max_duration.is_none());
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "combine-ace",
            "--scenario",
            "s.json",
            "--seed",
            "7",
            "--max-duration",
            "12.5",
            "--output",
            "log.json",
        ])
        .unwrap();
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.max_duration, Some(12.5));
        assert_eq!(args.output, Some(PathBuf::from("log.json")));
    }

    #[test]
    fn test_scenario_is_required() {
        assert!(Args::try_parse_from(["combine-ace"]).is_err());
    }
}
