use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use eyre::Result;

use crate::commands;

#[derive(Parser, Debug)]
#[command(
    name = "psymap",
    about = "Map personality trait profiles to predicted distress and explain the pathways",
    version
)]
pub(crate) struct Cli {
    /// Emit logs as JSON lines instead of human-readable text
    #[arg(long, global = true)]
    pub(crate) json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a trait bundle read from a JSON input file
    Analyze(AnalyzeArgs),
    /// Compare a saved prediction with a later measurement and log the result
    Feedback(FeedbackArgs),
    /// Summarize prediction accuracy across a feedback log
    Calibration(CalibrationArgs),
    /// Print or write the default model parameter document
    Params(ParamsArgs),
    /// List the reference instruments and their subscales
    Instruments,
    /// Check raw subscale scores against an instrument's valid ranges
    Validate(ValidateArgs),
}

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Path to an analysis input document
    pub(crate) input: PathBuf,
    /// Model parameter document (defaults to the config directory copy, then built-ins)
    #[arg(long)]
    pub(crate) params: Option<PathBuf>,
    /// Also write the prediction needed for later feedback to this file
    #[arg(long)]
    pub(crate) prediction_out: Option<PathBuf>,
    /// Pretty-print the JSON output
    #[arg(long)]
    pub(crate) pretty: bool,
}

#[derive(Args, Debug)]
pub(crate) struct FeedbackArgs {
    /// Prediction saved by `analyze --prediction-out`
    #[arg(long)]
    pub(crate) prediction: PathBuf,
    /// Measured DASS-21 snapshot (0–42 scale)
    #[arg(long)]
    pub(crate) actual: PathBuf,
    /// Opaque reference to the person measured
    #[arg(long)]
    pub(crate) user: String,
    /// JSON Lines feedback log to append to
    #[arg(long)]
    pub(crate) log: PathBuf,
    #[arg(long)]
    pub(crate) params: Option<PathBuf>,
    #[arg(long)]
    pub(crate) pretty: bool,
}

#[derive(Args, Debug)]
pub(crate) struct CalibrationArgs {
    /// JSON Lines feedback log to summarize
    #[arg(long)]
    pub(crate) log: PathBuf,
    #[arg(long)]
    pub(crate) pretty: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ParamsArgs {
    /// Write to the config directory (or `--path`) instead of printing
    #[arg(long)]
    pub(crate) write: bool,
    /// Destination for `--write`
    #[arg(long, requires = "write")]
    pub(crate) path: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// Instrument id (see `psymap instruments`)
    #[arg(long)]
    pub(crate) instrument: String,
    /// JSON array of `{ "subscale_id", "value" }` entries
    pub(crate) scores: PathBuf,
}

pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Analyze(args) => commands::analyze(args),
        Command::Feedback(args) => commands::feedback(args),
        Command::Calibration(args) => commands::calibration(args),
        Command::Params(args) => commands::params(args),
        Command::Instruments => commands::instruments(),
        Command::Validate(args) => commands::validate(args),
    }
}
