//! Work/Rest Timer CLI
//!
//! A terminal timer that turns work into rest:
//! - Every five minutes of work earns one minute of rest
//! - Resting spends the credit, and an alarm sounds when it runs out
//! - Time spent suspended (Ctrl-Z) while working still counts

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tokio::sync::mpsc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use workrest::app::Controller;
use workrest::cli::{Cli, Commands, Display, RunArgs};
use workrest::lifecycle::default_suspender;
use workrest::sound::{
    create_alarm, discover_system_sounds, SoundError, SoundSource, EMBEDDED_ALARM_NAME,
};
use workrest::types::AppConfig;
use workrest::ui::{spawn_input_reader, TerminalRenderer};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        if let Some(sound) = e.downcast_ref::<SoundError>() {
            Display::show_hint(sound.suggestion());
        }
        std::process::exit(1);
    }
}

// ============================================================================
// Logging
// ============================================================================

/// Where log output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LogTarget {
    /// Standard error (non-interactive commands)
    Stderr,
    /// Appended to a file
    File(PathBuf),
    /// Dropped; the timer screen owns the terminal
    Discard,
}

impl LogTarget {
    fn for_session(config: &AppConfig) -> Self {
        match &config.log_file {
            Some(path) => Self::File(path.clone()),
            None => Self::Discard,
        }
    }
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` overrides the level chosen by `--verbose`.
fn init_tracing(target: LogTarget, verbose: bool) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "workrest=debug,warn" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let (writer, ansi) = match target {
        LogTarget::Stderr => (BoxMakeWriter::new(std::io::stderr), true),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        LogTarget::Discard => (BoxMakeWriter::new(std::io::sink), false),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(writer)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to initialize logging")
}

// ============================================================================
// Commands
// ============================================================================

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    let command = cli
        .command
        .unwrap_or_else(|| Commands::Run(RunArgs::default()));

    match command {
        Commands::Run(args) => {
            let config = args.to_config(cli.verbose);
            config.validate()?;
            init_tracing(LogTarget::for_session(&config), config.verbose)?;
            run_session(config).await?;
        }
        Commands::Sounds => {
            init_tracing(LogTarget::Stderr, cli.verbose)?;
            let mut sounds = vec![SoundSource::embedded(EMBEDDED_ALARM_NAME)];
            sounds.extend(discover_system_sounds());
            Display::show_sounds(&sounds);
        }
        Commands::Completions { shell } => {
            generate_completions(shell);
        }
    }

    Ok(())
}

/// Runs one interactive timer session and prints the summary afterwards.
async fn run_session(config: AppConfig) -> Result<()> {
    tracing::info!(?config, "starting session");

    let alarm = create_alarm(&config)?;

    let (intent_tx, intent_rx) = mpsc::unbounded_channel();
    let (lifecycle_tx, lifecycle_rx) = mpsc::unbounded_channel();

    #[cfg(unix)]
    let observer = workrest::lifecycle::spawn_signal_observer(lifecycle_tx)?;
    #[cfg(not(unix))]
    drop(lifecycle_tx);

    let controller = Controller::new(alarm, default_suspender());

    let mut renderer = TerminalRenderer::enter()?;
    spawn_input_reader(intent_tx)?;

    let result = controller.run(&mut renderer, intent_rx, lifecycle_rx).await;
    renderer.leave()?;

    #[cfg(unix)]
    observer.abort();

    let state = result?;
    Display::show_summary(&state);
    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_args_runs() {
        let cli = Cli::parse_from(["workrest"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_run_with_options() {
        let cli = Cli::parse_from(["workrest", "run", "--mute", "--alarm", "Glass"]);
        match cli.command {
            Some(Commands::Run(args)) => {
                assert!(args.mute);
                assert_eq!(args.alarm, Some("Glass".to_string()));
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_log_target_discards_by_default() {
        let config = AppConfig::default();
        assert_eq!(LogTarget::for_session(&config), LogTarget::Discard);
    }

    #[test]
    fn test_log_target_file() {
        let config = AppConfig {
            log_file: Some(PathBuf::from("/tmp/workrest.log")),
            ..AppConfig::default()
        };
        assert_eq!(
            LogTarget::for_session(&config),
            LogTarget::File(PathBuf::from("/tmp/workrest.log"))
        );
    }

    #[test]
    fn test_cli_command_is_valid() {
        Cli::command().debug_assert();
    }
}
