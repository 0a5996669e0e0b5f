//! Command definitions for the Work/Rest timer CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::types::{AlarmChoice, AppConfig};

// ============================================================================
// CLI Structure
// ============================================================================

/// Work/Rest timer - earn rest while you work
#[derive(Parser, Debug)]
#[command(
    name = "workrest",
    version,
    about = "Terminal work/rest timer that earns one minute of rest per five minutes of work",
    long_about = "A small terminal timer. While you work, rest credit accrues at one fifth of \
                  the time worked. When you rest, the credit counts down and an alarm \
                  sounds when it runs out.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the interactive timer
    Run(RunArgs),

    /// List the alarm sounds available on this system
    Sounds,

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Alarm sound: a system sound name (see `sounds`) or an audio file path
    #[arg(short, long, value_parser = validate_alarm)]
    pub alarm: Option<String>,

    /// Never play the alarm sound
    #[arg(short, long)]
    pub mute: bool,

    /// Write logs to this file (logs are discarded otherwise)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl RunArgs {
    /// Builds the session configuration.
    pub fn to_config(&self, verbose: bool) -> AppConfig {
        let alarm = self
            .alarm
            .as_deref()
            .map(AlarmChoice::parse)
            .unwrap_or_default();

        AppConfig {
            alarm,
            muted: self.mute,
            log_file: self.log_file.clone(),
            verbose,
        }
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validates the alarm argument.
///
/// - Must not be empty or whitespace
fn validate_alarm(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        return Err("alarm must not be empty".to_string());
    }
    Ok(s.to_string())
}

// ============================================================================
// Tests
// ============================================================================
