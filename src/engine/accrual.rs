//! Work/rest accrual engine.
//!
//! This module provides the core state machine:
//! - Mode transitions (Idle ↔ Working ↔ Resting)
//! - Live accrual on each tick (1:1 work, 5:1 rest credit)
//! - Alarm firing on the rest-credit zero crossing
//! - Lump catch-up after a suspend/resume cycle

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::info;

use super::catchup::{Accrual, BackgroundCatchUp};
use super::error::EngineError;
use crate::types::{
    AccrualState, Action, AlarmState, Mode, MIN_REST_CREDIT_MS, REST_CREDIT_PER_TICK_MS, TICK_MS,
};

// ============================================================================
// EngineEvent
// ============================================================================

/// Engine events for the alarm adapter and other observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The mode changed
    ModeChanged {
        from: Mode,
        to: Mode,
    },
    /// One live tick was applied
    Ticked {
        mode: Mode,
        work_elapsed_ms: u64,
        rest_credit_ms: i64,
    },
    /// Rest credit ran out; the alarm should start
    AlarmTriggered,
    /// The user stopped the alarm
    AlarmAcknowledged,
    /// Both accumulators were cleared
    Reset,
    /// The process left the foreground
    Backgrounded {
        /// Mode whose accrual was interrupted
        mode: Mode,
    },
    /// A background gap was accounted for
    CaughtUp {
        mode: Mode,
        accrual: Accrual,
    },
}

// ============================================================================
// AccrualEngine
// ============================================================================

/// Owns the accrual state and enforces transition preconditions.
pub struct AccrualEngine {
    /// Current accrual state
    state: AccrualState,
    /// Pending suspend mark
    catch_up: BackgroundCatchUp,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<EngineEvent>,
}

impl AccrualEngine {
    /// Creates a new engine in `Idle` with empty accumulators.
    pub fn new(event_tx: mpsc::UnboundedSender<EngineEvent>) -> Self {
        Self::with_state(AccrualState::new(), event_tx)
    }

    /// Creates an engine starting from an existing state.
    pub fn with_state(state: AccrualState, event_tx: mpsc::UnboundedSender<EngineEvent>) -> Self {
        Self {
            state,
            catch_up: BackgroundCatchUp::new(),
            event_tx,
        }
    }

    /// Applies a user action.
    ///
    /// # Errors
    ///
    /// Returns a rejection if the action's precondition does not hold, or
    /// `EventChannelClosed` if events can no longer be delivered.
    pub fn apply(&mut self, action: Action) -> Result<(), EngineError> {
        match action {
            Action::StartWorking => self.start_working(),
            Action::StartResting => self.start_resting(),
            Action::Pause => self.pause(),
            Action::Reset => self.reset(),
            Action::AcknowledgeAlarm => self.acknowledge_alarm(),
        }
    }

    /// Switches to working.
    ///
    /// # Errors
    ///
    /// Returns `AlarmPlaying` while the alarm sounds.
    pub fn start_working(&mut self) -> Result<(), EngineError> {
        self.ensure_alarm_silent()?;

        let from = self.state.mode;
        self.state.start_working();
        self.emit_mode_change(from)
    }

    /// Switches to resting and clears the work counter.
    ///
    /// # Errors
    ///
    /// Returns `AlarmPlaying` while the alarm sounds and
    /// `InsufficientRestCredit` below one second of credit.
    pub fn start_resting(&mut self) -> Result<(), EngineError> {
        self.ensure_alarm_silent()?;

        if !self.state.can_rest() {
            return Err(EngineError::InsufficientRestCredit {
                credit_ms: self.state.rest_credit_ms,
                required_ms: MIN_REST_CREDIT_MS,
            });
        }

        let from = self.state.mode;
        self.state.start_resting();
        self.emit_mode_change(from)
    }

    /// Stops counting without clearing anything.
    pub fn pause(&mut self) -> Result<(), EngineError> {
        let from = self.state.mode;
        self.state.pause();
        self.emit_mode_change(from)
    }

    /// Stops counting and clears both accumulators.
    pub fn reset(&mut self) -> Result<(), EngineError> {
        let from = self.state.mode;
        self.state.reset();

        self.emit(EngineEvent::Reset)?;
        self.emit_mode_change(from)
    }

    /// Silences the alarm, returns to idle and forfeits any overdrawn credit.
    ///
    /// # Errors
    ///
    /// Returns `AlarmNotPlaying` if there is nothing to acknowledge.
    pub fn acknowledge_alarm(&mut self) -> Result<(), EngineError> {
        if !self.state.alarm.is_playing() {
            return Err(EngineError::AlarmNotPlaying);
        }

        let from = self.state.mode;
        self.state.acknowledge_alarm();
        info!("alarm acknowledged");

        self.emit(EngineEvent::AlarmAcknowledged)?;
        self.emit_mode_change(from)
    }

    /// Applies one live tick.
    ///
    /// Does nothing in `Idle` or while the alarm plays. Returns true if this
    /// tick exhausted the rest credit and started the alarm.
    pub fn tick(&mut self) -> Result<bool, EngineError> {
        if !self.state.is_ticking() {
            return Ok(false);
        }

        let fired = match self.state.mode {
            Mode::Working => {
                self.state.accrue_work(TICK_MS, REST_CREDIT_PER_TICK_MS);
                false
            }
            Mode::Resting => self.state.spend_rest(TICK_MS as i64),
            Mode::Idle => false,
        };

        self.emit(EngineEvent::Ticked {
            mode: self.state.mode,
            work_elapsed_ms: self.state.work_elapsed_ms,
            rest_credit_ms: self.state.rest_credit_ms,
        })?;

        if fired {
            self.state.alarm = AlarmState::Playing;
            info!("rest credit exhausted, alarm triggered");
            self.emit(EngineEvent::AlarmTriggered)?;
        }

        Ok(fired)
    }

    /// Records that the process is leaving the foreground at `at`.
    pub fn enter_background(&mut self, at: DateTime<Utc>) -> Result<(), EngineError> {
        let mode = if self.state.is_ticking() {
            self.state.mode
        } else {
            Mode::Idle
        };

        self.catch_up.capture(at, mode);
        info!(mode = %mode, "entering background");
        self.emit(EngineEvent::Backgrounded { mode })
    }

    /// Accounts for the time spent in the background.
    ///
    /// Returns the applied accrual, or None if no suspend was recorded.
    pub fn enter_foreground(&mut self, now: DateTime<Utc>) -> Result<Option<Accrual>, EngineError> {
        let Some((mark, accrual)) = self.catch_up.consume(now) else {
            return Ok(None);
        };

        if !accrual.is_empty() {
            self.state.accrue_work(accrual.work_ms, accrual.credit_ms);
        }

        info!(
            mode = %mark.mode,
            elapsed_ms = accrual.elapsed_ms,
            work_ms = accrual.work_ms,
            credit_ms = accrual.credit_ms,
            "caught up after background"
        );

        self.emit(EngineEvent::CaughtUp {
            mode: mark.mode,
            accrual,
        })?;

        Ok(Some(accrual))
    }

    /// Returns true if a suspend is waiting to be caught up.
    pub fn is_backgrounded(&self) -> bool {
        self.catch_up.pending().is_some()
    }

    /// Returns a reference to the current accrual state.
    pub fn get_state(&self) -> &AccrualState {
        &self.state
    }

    /// Returns a mutable reference to the accrual state (for testing).
    #[cfg(test)]
    pub fn get_state_mut(&mut self) -> &mut AccrualState {
        &mut self.state
    }

    fn ensure_alarm_silent(&self) -> Result<(), EngineError> {
        if self.state.alarm.is_playing() {
            return Err(EngineError::AlarmPlaying);
        }
        Ok(())
    }

    fn emit_mode_change(&self, from: Mode) -> Result<(), EngineError> {
        let to = self.state.mode;
        if from == to {
            return Ok(());
        }
        info!(from = %from, to = %to, "mode changed");
        self.emit(EngineEvent::ModeChanged { from, to })
    }

    fn emit(&self, event: EngineEvent) -> Result<(), EngineError> {
        self.event_tx
            .send(event)
            .map_err(|_| EngineError::EventChannelClosed)
    }
}

// ============================================================================
// Tests
// ============================================================================
