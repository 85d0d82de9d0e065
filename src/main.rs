//! Combine Ace - headless scenario runner
//!
//! Loads a JSON scenario and the RON tunables, runs the scenario against the
//! ace plugin and prints a summary.

use std::process::ExitCode;

use combine_ace::cli;
use combine_ace::headless::{run_scenario, ScenarioConfig};
use combine_ace::tunables::Tunables;

fn main() -> ExitCode {
    let args = cli::parse_args();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: cli::Args) -> Result<(), String> {
    let mut config = ScenarioConfig::load_from_file(&args.scenario)?;

    // Command-line flags win over the scenario file
    if let Some(output) = args.output {
        config.output_path = Some(output.to_string_lossy().into_owned());
    }
    if let Some(seed) = args.seed {
        config.random_seed = Some(seed);
    }
    if let Some(max_duration) = args.max_duration {
        config.max_duration_secs = max_duration;
    }
    config.validate()?;

    let tunables = Tunables::load(&args.tunables)?;

    run_scenario(config, tunables).map(|_| ())
}
