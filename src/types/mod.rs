//! Core data types for the Work/Rest timer.
//!
//! This module defines the data structures used for:
//! - Accrual state (mode, work elapsed, rest credit, alarm)
//! - User actions and intents
//! - Application configuration with validation

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// Length of one accrual unit in milliseconds.
pub const TICK_MS: u64 = 1000;

/// Period of the live accrual timer.
pub const TICK_INTERVAL: Duration = Duration::from_millis(TICK_MS);

/// Units of work needed to earn one unit of rest.
pub const WORK_TO_REST_RATIO: u64 = 5;

/// Rest credit earned by one tick of work.
pub const REST_CREDIT_PER_TICK_MS: i64 = (TICK_MS / WORK_TO_REST_RATIO) as i64;

/// Smallest rest credit that allows a rest to begin.
pub const MIN_REST_CREDIT_MS: i64 = 1000;

// ============================================================================
// Mode
// ============================================================================

/// What the user is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Nothing is counting (initial and paused state)
    #[default]
    Idle,
    /// Work time accrues and earns rest credit
    Working,
    /// Rest credit counts down
    Resting,
}

impl Mode {
    /// Returns the string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Idle => "idle",
            Mode::Working => "working",
            Mode::Resting => "resting",
        }
    }

    /// Returns true if the live timer should run in this mode.
    pub fn is_active(&self) -> bool {
        matches!(self, Mode::Working | Mode::Resting)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// AlarmState
// ============================================================================

/// Whether the rest-exhausted alarm is sounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlarmState {
    #[default]
    Stopped,
    Playing,
}

impl AlarmState {
    /// Returns true if the alarm is sounding.
    pub fn is_playing(&self) -> bool {
        matches!(self, AlarmState::Playing)
    }
}

// ============================================================================
// Action / Intent
// ============================================================================

/// State machine actions triggered by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    StartWorking,
    StartResting,
    Pause,
    Reset,
    AcknowledgeAlarm,
}

impl Action {
    /// Returns the string representation of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::StartWorking => "start_working",
            Action::StartResting => "start_resting",
            Action::Pause => "pause",
            Action::Reset => "reset",
            Action::AcknowledgeAlarm => "acknowledge_alarm",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the input side can ask of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Forward an action to the accrual engine
    Action(Action),
    /// Leave the foreground (job-control suspend)
    Suspend,
    /// Repaint the screen (e.g. after a resize)
    Redraw,
    /// Exit the application
    Quit,
}

impl From<Action> for Intent {
    fn from(action: Action) -> Self {
        Intent::Action(action)
    }
}

// ============================================================================
// AccrualState
// ============================================================================

/// The accumulators and flags owned by the accrual engine.
///
/// Transitions here are unconditional; precondition checks live in
/// [`crate::engine::AccrualEngine`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccrualState {
    /// Current mode
    pub mode: Mode,
    /// Milliseconds worked since the last rest or reset
    pub work_elapsed_ms: u64,
    /// Milliseconds of rest earned and not yet spent (may dip below zero)
    pub rest_credit_ms: i64,
    /// Alarm flag
    pub alarm: AlarmState,
}

impl AccrualState {
    /// Creates a new state in `Idle` with empty accumulators.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters `Working`.
    pub fn start_working(&mut self) {
        self.mode = Mode::Working;
    }

    /// Enters `Resting` and clears the work timer.
    pub fn start_resting(&mut self) {
        self.mode = Mode::Resting;
        self.work_elapsed_ms = 0;
    }

    /// Returns to `Idle`, keeping both accumulators.
    pub fn pause(&mut self) {
        self.mode = Mode::Idle;
    }

    /// Returns to `Idle` with empty accumulators.
    pub fn reset(&mut self) {
        self.mode = Mode::Idle;
        self.work_elapsed_ms = 0;
        self.rest_credit_ms = 0;
    }

    /// Silences the alarm and returns to `Idle` with no rest credit.
    pub fn acknowledge_alarm(&mut self) {
        self.alarm = AlarmState::Stopped;
        self.mode = Mode::Idle;
        self.rest_credit_ms = 0;
    }

    /// Adds worked time and the rest credit it earns.
    pub fn accrue_work(&mut self, work_ms: u64, credit_ms: i64) {
        self.work_elapsed_ms = self.work_elapsed_ms.saturating_add(work_ms);
        self.rest_credit_ms = self.rest_credit_ms.saturating_add(credit_ms);
    }

    /// Spends rest credit.
    ///
    /// Returns true if this call moved the credit from positive to
    /// non-positive.
    pub fn spend_rest(&mut self, ms: i64) -> bool {
        let previous = self.rest_credit_ms;
        self.rest_credit_ms = previous.saturating_sub(ms);
        previous > 0 && self.rest_credit_ms <= 0
    }

    /// Returns true if there is enough credit to start resting.
    pub fn can_rest(&self) -> bool {
        self.rest_credit_ms >= MIN_REST_CREDIT_MS
    }

    /// Returns true if the live timer should be running.
    pub fn is_ticking(&self) -> bool {
        self.mode.is_active() && !self.alarm.is_playing()
    }

    /// Rest credit as shown to the user (never negative).
    pub fn displayed_rest_ms(&self) -> u64 {
        self.rest_credit_ms.max(0) as u64
    }

    /// Returns true if either accumulator holds time.
    pub fn has_accrued(&self) -> bool {
        self.work_elapsed_ms > 0 || self.rest_credit_ms != 0
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Errors raised while validating the application configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("alarm sound file not found: {0}")]
    AlarmFileNotFound(PathBuf),

    #[error("alarm sound name must not be empty")]
    EmptyAlarmName,

    #[error("log file directory does not exist: {0}")]
    LogDirectoryMissing(PathBuf),
}

/// Which sound to use for the alarm.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AlarmChoice {
    /// The built-in beep pattern
    #[default]
    Embedded,
    /// A system sound looked up by name (e.g. "Glass")
    Named(String),
    /// An audio file on disk
    File(PathBuf),
}

impl AlarmChoice {
    /// Interprets a `--alarm` argument.
    ///
    /// Anything that looks like a path (contains a separator or has an
    /// extension) is treated as a file, everything else as a sound name.
    pub fn parse(value: &str) -> Self {
        let path = PathBuf::from(value);
        if value.contains(std::path::MAIN_SEPARATOR)
            || value.contains('/')
            || path.extension().is_some()
        {
            AlarmChoice::File(path)
        } else {
            AlarmChoice::Named(value.to_string())
        }
    }
}

/// Runtime configuration for an interactive session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Alarm sound selection
    pub alarm: AlarmChoice,
    /// Never produce sound
    pub muted: bool,
    /// Where log output goes (discarded when None)
    pub log_file: Option<PathBuf>,
    /// Debug-level logging
    pub verbose: bool,
}

impl AppConfig {
    /// Creates a new configuration with the given alarm.
    pub fn with_alarm(mut self, alarm: AlarmChoice) -> Self {
        self.alarm = alarm;
        self
    }

    /// Creates a new configuration with sound muted or not.
    pub fn with_muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.alarm {
            AlarmChoice::File(path) if !self.muted && !path.is_file() => {
                return Err(ConfigError::AlarmFileNotFound(path.clone()));
            }
            AlarmChoice::Named(name) if name.trim().is_empty() => {
                return Err(ConfigError::EmptyAlarmName);
            }
            _ => {}
        }

        if let Some(log_file) = &self.log_file {
            if let Some(parent) = log_file.parent() {
                if !parent.as_os_str().is_empty() && !parent.is_dir() {
                    return Err(ConfigError::LogDirectoryMissing(parent.to_path_buf()));
                }
            }
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
