//! `pmatch check` — evaluate a dataset and emit the report.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use pricematch_quality::dataset::read_dataset;
use pricematch_quality::{MatchGroup, QualityRun, QualityTier};

use crate::config_cmd::load_config;
use crate::exit_codes::{EXIT_ERROR, EXIT_QUALITY_FLAGGED};
use crate::{export, summary, CliError};

pub struct CheckArgs {
    pub dataset: PathBuf,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub output: Option<PathBuf>,
    pub csv: Option<PathBuf>,
    pub top: Option<usize>,
    pub sample: Option<usize>,
    pub strict: bool,
    pub quiet: bool,
}

pub fn cmd_check(args: CheckArgs) -> Result<(), CliError> {
    if let (Some(json), Some(csv)) = (&args.output, &args.csv) {
        if json == csv {
            return Err(CliError::args(format!(
                "--output and --csv both write to {}",
                json.display()
            ))
            .with_hint("give the JSON run and the CSV table separate files"));
        }
    }

    let mut config = load_config(args.config.as_deref())?;
    if let Some(top) = args.top {
        config.report.top_savings = top;
    }
    if let Some(sample) = args.sample {
        config.report.review_sample = sample;
    }

    let groups = load_groups(&args.dataset)?;
    log::debug!("loaded {} groups from {}", groups.len(), args.dataset.display());

    let run = pricematch_quality::run(&config, &groups);

    if args.json || args.output.is_some() {
        let json = serde_json::to_string_pretty(&run).map_err(|e| CliError {
            code: EXIT_ERROR,
            message: format!("failed to serialize run: {}", e),
            hint: None,
        })?;
        if let Some(path) = &args.output {
            std::fs::write(path, format!("{}\n", json))
                .map_err(|e| CliError::output(format!("{}: {}", path.display(), e)))?;
        }
        if args.json {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", json).map_err(|e| CliError::output(e.to_string()))?;
        }
    }

    if let Some(path) = &args.csv {
        let file = File::create(path)
            .map_err(|e| CliError::output(format!("{}: {}", path.display(), e)))?;
        export::write_evaluations_csv(file, &run.groups)
            .map_err(|e| CliError::output(format!("{}: {}", path.display(), e)))?;
    }

    if !args.quiet {
        let stderr = io::stderr();
        let mut handle = stderr.lock();
        summary::write_summary(&mut handle, &run)
            .map_err(|e| CliError::output(format!("failed to write summary: {}", e)))?;
    }

    if args.strict {
        check_strict(&run)?;
    }
    Ok(())
}

fn load_groups(path: &Path) -> Result<Vec<MatchGroup>, CliError> {
    if path.as_os_str() == "-" {
        let stdin = io::stdin();
        return read_dataset(stdin.lock()).map_err(CliError::quality);
    }
    let file = File::open(path)
        .map_err(|e| CliError::dataset(format!("{}: {}", path.display(), e)))?;
    read_dataset(BufReader::new(file)).map_err(|e| {
        let mut err = CliError::quality(e);
        err.message = format!("{}: {}", path.display(), err.message);
        err
    })
}

/// Strict mode fails the run when anything needs a human look.
fn check_strict(run: &QualityRun) -> Result<(), CliError> {
    let low = run
        .report
        .tiers
        .iter()
        .find(|t| t.tier == QualityTier::Low)
        .map_or(0, |t| t.count);
    let flagged = run.report.flagged;
    if low == 0 && flagged == 0 {
        return Ok(());
    }
    Err(CliError {
        code: EXIT_QUALITY_FLAGGED,
        message: format!("{} LOW-tier and {} flagged group(s) need review", low, flagged),
        hint: Some("rerun with --csv to list every group with its issues".to_string()),
    })
}
