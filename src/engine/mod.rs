//! Accrual engine for the Work/Rest timer.
//!
//! This module contains the core state machine and its timing helpers:
//! - `accrual`: mode transitions, live ticks and alarm firing
//! - `catchup`: lump accrual after the process was suspended
//! - `clock`: cancellable periodic tick source

pub mod accrual;
pub mod catchup;
pub mod clock;
mod error;

pub use accrual::{AccrualEngine, EngineEvent};
pub use catchup::{Accrual, BackgroundCatchUp, BackgroundMark};
pub use clock::TickScheduler;
pub use error::EngineError;
