// pmatch - match quality checks for cross-store price comparison datasets

mod check;
mod config_cmd;
mod exit_codes;
mod export;
mod summary;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::*;
use pricematch_quality::QualityError;

#[derive(Parser)]
#[command(name = "pmatch")]
#[command(about = "Score, tier and sanity-check product match groups")]
#[command(version)]
struct Cli {
    /// More log output (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate every match group in a dataset and report on quality
    #[command(after_help = "\
Reads the JSON array of match groups (use - for stdin), scores each group,
assigns a HIGH/MEDIUM/LOW tier and runs the conflict rules.

Examples:
  pmatch check data/matches.json
  pmatch check data/matches.json --json > quality.json
  pmatch check data/matches.json --csv groups.csv --strict
  cat matches.json | pmatch check - --config quality.toml")]
    Check {
        /// Dataset file (JSON array of match groups), or - for stdin
        dataset: PathBuf,

        /// Config file (TOML). Defaults to <config dir>/pricematch/quality.toml
        #[arg(long, short = 'c', env = "PMATCH_CONFIG")]
        config: Option<PathBuf>,

        /// Write the full run as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Write the full run as JSON to a file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Write the per-group evaluation table as CSV
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Override report.top_savings
        #[arg(long)]
        top: Option<usize>,

        /// Override report.review_sample
        #[arg(long)]
        sample: Option<usize>,

        /// Exit 3 if any group is LOW tier or flagged
        #[arg(long)]
        strict: bool,

        /// Suppress the human summary on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Inspect and validate engine configuration
    #[command(subcommand)]
    Config(config_cmd::ConfigCommands),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    // RUST_LOG, when set, wins over -v.
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Check {
            dataset,
            config,
            json,
            output,
            csv,
            top,
            sample,
            strict,
            quiet,
        } => check::cmd_check(check::CheckArgs {
            dataset,
            config,
            json,
            output,
            csv,
            top,
            sample,
            strict,
            quiet,
        }),
        Commands::Config(cmd) => config_cmd::cmd_config(cmd),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn dataset(msg: impl Into<String>) -> Self {
        Self { code: EXIT_DATASET, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG, message: msg.into(), hint: None }
    }

    pub fn output(msg: impl Into<String>) -> Self {
        Self { code: EXIT_OUTPUT, message: msg.into(), hint: None }
    }

    /// Map an engine error onto the matching exit code.
    pub fn quality(err: QualityError) -> Self {
        match &err {
            QualityError::DatasetLoad(_) => Self::dataset(err.to_string())
                .with_hint("the dataset must be a JSON array of {category, products: [...]} groups"),
            QualityError::ConfigParse(_) | QualityError::ConfigValidation(_) => {
                Self::config(err.to_string())
                    .with_hint("pmatch config defaults prints a valid starting point")
            }
        }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
