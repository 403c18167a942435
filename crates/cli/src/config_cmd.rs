//! `pmatch config` — config resolution, validation and the defaults template.

use std::path::{Path, PathBuf};

use clap::Subcommand;

use pricematch_quality::QualityConfig;

use crate::CliError;

const CONFIG_DIR: &str = "pricematch";
const CONFIG_FILE: &str = "quality.toml";

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Parse and validate a config file
    Validate {
        /// Config file (TOML)
        file: PathBuf,
    },
    /// Print the default config as TOML
    #[command(after_help = "\
Examples:
  pmatch config defaults > ~/.config/pricematch/quality.toml")]
    Defaults,
}

pub fn cmd_config(cmd: ConfigCommands) -> Result<(), CliError> {
    match cmd {
        ConfigCommands::Validate { file } => {
            let config = read_config(&file)?;
            eprintln!(
                "{}: ok ({} rule(s) disabled, {} expected store(s))",
                file.display(),
                config.rules.disabled.len(),
                config.report.expected_stores.len(),
            );
            Ok(())
        }
        ConfigCommands::Defaults => {
            let toml = QualityConfig::default().to_toml().map_err(CliError::quality)?;
            print!("{}", toml);
            Ok(())
        }
    }
}

/// Per-user config location, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Resolve the config: explicit path, else the per-user file if it exists,
/// else the built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<QualityConfig, CliError> {
    if let Some(path) = explicit {
        return read_config(path);
    }
    match default_config_path() {
        Some(path) if path.is_file() => read_config(&path),
        _ => {
            log::debug!("no config file, using defaults");
            Ok(QualityConfig::default())
        }
    }
}

fn read_config(path: &Path) -> Result<QualityConfig, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::config(format!("{}: {}", path.display(), e)))?;
    let config = QualityConfig::from_toml(&text).map_err(|e| {
        let mut err = CliError::quality(e);
        err.message = format!("{}: {}", path.display(), err.message);
        err
    })?;
    log::debug!("loaded config from {}", path.display());
    Ok(config)
}
