//! Work/Rest Timer Library
//!
//! This library provides the core functionality for the Work/Rest timer CLI.
//! It includes:
//! - Accrual engine: work time, rest credit and the alarm state machine
//! - Tick scheduling and catch-up after the process was suspended
//! - Alarm sound playback with graceful fallback to silence
//! - Job-control lifecycle (Ctrl-Z / `fg`)
//! - Terminal UI and the session controller
//! - CLI command parsing and display utilities

pub mod app;
pub mod cli;
pub mod engine;
pub mod lifecycle;
pub mod sound;
pub mod types;
pub mod ui;

// Re-export commonly used types for convenience
pub use types::{AccrualState, Action, AlarmState, AppConfig, Intent, Mode};

// Re-export engine types
pub use engine::{AccrualEngine, EngineError, EngineEvent, TickScheduler};

// Re-export sound types
pub use sound::{create_alarm, Alarm, AlarmPlayer, MockAlarmPlayer, SoundError, SoundSource};

// Re-export session types
pub use app::Controller;
pub use lifecycle::{LifecycleEvent, Suspender};
pub use ui::{Renderer, ViewModel};
