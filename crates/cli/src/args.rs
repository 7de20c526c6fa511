//! Command-line arguments

use crate::settings;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use watchrun_core::RawInputs;

/// watchrun - Run a command when files change
///
/// Watches a directory and runs COMMAND when a changed file matches the
/// selectors. Runs are throttled: changes within DELAY (+10%) of the last
/// accepted change are dropped.
#[derive(Parser, Debug, Default)]
#[command(name = "watchrun")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to watch (default: current directory; not with --file)
    #[arg(long, value_name = "DIR")]
    pub path: Option<String>,

    /// Comma-separated extensions to react to, e.g. js,ts (not with --file)
    #[arg(long, value_name = "EXT[,EXT...]")]
    pub extension: Option<String>,

    /// Comma-separated file names (substrings) to react to, e.g. src/a.js,b.js
    #[arg(long, value_name = "FILE[,FILE...]")]
    pub file: Option<String>,

    /// Watch subdirectories too (implied when a --file entry contains '/')
    #[arg(long)]
    pub recursive: bool,

    /// Minimum milliseconds between runs (default: 200)
    #[arg(long, value_name = "MS")]
    pub delay: Option<u64>,

    /// Shell command to run when a matching file changes
    #[arg(long, value_name = "CMD", allow_hyphen_values = true)]
    pub command: Option<String>,

    /// Only print errors
    #[arg(long)]
    pub silence: bool,

    /// TOML file with defaults for the options above
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Flags as given on the command line
    pub fn flag_inputs(&self) -> RawInputs {
        RawInputs {
            path: self.path.clone(),
            extension: self.extension.clone(),
            file: self.file.clone(),
            recursive: self.recursive,
            delay: self.delay,
            command: self.command.clone(),
            silence: self.silence,
        }
    }

    /// Flags layered over the config file, if one was given
    pub fn inputs(&self) -> Result<RawInputs> {
        let flags = self.flag_inputs();
        match &self.config {
            Some(path) => Ok(flags.or(settings::load(path)?)),
            None => Ok(flags),
        }
    }
}
