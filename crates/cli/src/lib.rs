//! bto CLI -- step through basic timestamp ordering runs.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};

pub mod catalog;
pub mod driver;
pub mod render;
pub mod source;

#[derive(Debug, Parser)]
#[command(
    name = "bto",
    about = "Step-by-step basic timestamp ordering simulator"
)]
pub struct App {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a history to completion, printing every step
    Run(RunArgs),
    /// List the built-in scenarios
    Scenarios,
    /// Generate random histories as JSON files
    Generate(GenerateArgs),
    /// Print the JSON Schema of the final snapshot to stdout
    Schema,
}

#[derive(Debug, Parser)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["scenario", "file", "ops", "history"]),
))]
pub struct RunArgs {
    /// Key of a built-in scenario (see `bto scenarios`)
    #[arg(long)]
    pub scenario: Option<String>,
    /// Scenario catalog file to read the history from
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Scenario key within --file (defaults to the first one)
    #[arg(long, requires = "file", conflicts_with_all = ["scenario", "ops", "history"])]
    pub name: Option<String>,
    /// Operation list, e.g. "r1(x), w1(x), c1"
    #[arg(long)]
    pub ops: Option<String>,
    /// History JSON file written by `bto generate`
    #[arg(long)]
    pub history: Option<PathBuf>,
    /// Print one JSON object per step and a final JSON snapshot
    #[arg(long)]
    pub json: bool,
    /// Pause between steps, in milliseconds
    #[arg(long, default_value_t = 0)]
    pub delay_ms: u64,
    /// Give up after this many steps
    #[arg(long, default_value_t = 100_000)]
    pub max_steps: u64,
    /// Verify the scheduler invariants after every step
    #[arg(long)]
    pub check_invariants: bool,
}

#[derive(Debug, Parser)]
pub struct GenerateArgs {
    /// Number of histories to generate
    #[arg(long)]
    pub n_hist: u64,
    /// Number of transactions per history
    #[arg(long)]
    pub n_txn: u64,
    /// Number of data items
    #[arg(long)]
    pub n_item: u64,
    /// Number of reads and writes per transaction
    #[arg(long)]
    pub n_op: u64,
    /// Output directory for generated history files
    #[arg(long)]
    pub output_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        App::command().debug_assert();
    }

    #[test]
    fn test_run_requires_a_source() {
        assert!(App::try_parse_from(["bto", "run"]).is_err());
        assert!(App::try_parse_from(["bto", "run", "--scenario", "a", "--ops", "c1"]).is_err());
        assert!(App::try_parse_from(["bto", "run", "--ops", "c1", "--name", "a"]).is_err());
        assert!(App::try_parse_from(["bto", "run", "--scenario", "a", "--name", "b"]).is_err());
        assert!(App::try_parse_from(["bto", "run", "--file", "f", "--name", "a"]).is_ok());
        assert!(App::try_parse_from(["bto", "run", "--history", "0.json"]).is_ok());
    }

    #[test]
    fn test_run_defaults() {
        let app = App::try_parse_from(["bto", "run", "--scenario", "serial"]).unwrap();
        let Command::Run(args) = app.command else {
            panic!("expected run");
        };
        assert_eq!(args.scenario.as_deref(), Some("serial"));
        assert_eq!(args.delay_ms, 0);
        assert_eq!(args.max_steps, 100_000);
        assert!(!args.json);
    }
}
