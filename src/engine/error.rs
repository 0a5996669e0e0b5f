//! Accrual engine error types.

use thiserror::Error;

/// Errors returned by [`super::AccrualEngine`] operations.
///
/// Most variants are rejections: the requested transition is not allowed
/// in the current state and nothing was changed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// A start action arrived while the alarm is sounding.
    #[error("the alarm is playing; stop it first")]
    AlarmPlaying,

    /// Resting was requested without enough credit.
    #[error("not enough rest credit to rest ({credit_ms} ms earned, {required_ms} ms needed)")]
    InsufficientRestCredit { credit_ms: i64, required_ms: i64 },

    /// Acknowledge was requested with no alarm sounding.
    #[error("the alarm is not playing")]
    AlarmNotPlaying,

    /// Nobody is listening for engine events anymore.
    #[error("engine event channel closed")]
    EventChannelClosed,
}

impl EngineError {
    /// Returns true if this error only means "action not allowed right now".
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::EventChannelClosed)
    }
}
