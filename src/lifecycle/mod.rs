//! Foreground/background lifecycle for the Work/Rest timer.
//!
//! In a terminal, "background" means job-control suspension (Ctrl-Z or
//! `SIGTSTP`) and "foreground" means continuation (`SIGCONT`). Events carry
//! the wall-clock time at which they happened so the engine can catch up on
//! the time the live timer missed.

mod error;
#[cfg(unix)]
mod signals;

use chrono::{DateTime, Utc};

pub use error::LifecycleError;
#[cfg(unix)]
pub use signals::{spawn_signal_observer, ProcessSuspender};

/// A change in process lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The process is leaving the foreground.
    Background { at: DateTime<Utc> },
    /// The process is back in the foreground.
    Foreground { at: DateTime<Utc> },
}

impl LifecycleEvent {
    pub fn background_now() -> Self {
        Self::Background { at: Utc::now() }
    }

    pub fn foreground_now() -> Self {
        Self::Foreground { at: Utc::now() }
    }

    /// Returns when the event happened.
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Self::Background { at } | Self::Foreground { at } => *at,
        }
    }
}

/// Actually takes the process out of the foreground.
pub trait Suspender: Send {
    /// Blocks until the process is continued.
    ///
    /// # Errors
    ///
    /// Returns an error if the process could not be suspended; the caller
    /// should then carry on as if it had been resumed immediately.
    fn suspend(&self) -> Result<(), LifecycleError>;
}

/// A suspender for platforms without job control.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedSuspender;

impl Suspender for UnsupportedSuspender {
    fn suspend(&self) -> Result<(), LifecycleError> {
        Err(LifecycleError::Unsupported)
    }
}

/// A suspender that returns immediately (for tests and embedding).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSuspender;

impl Suspender for NoopSuspender {
    fn suspend(&self) -> Result<(), LifecycleError> {
        Ok(())
    }
}

/// Returns the suspender appropriate for this platform.
pub fn default_suspender() -> Box<dyn Suspender> {
    #[cfg(unix)]
    {
        Box::new(ProcessSuspender)
    }
    #[cfg(not(unix))]
    {
        Box::new(UnsupportedSuspender)
    }
}
