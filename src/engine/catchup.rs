//! Background catch-up calculation.
//!
//! The live timer does not fire while the process is suspended. On suspend
//! we remember the wall-clock time and the mode; on resume the whole gap is
//! applied as one lump accrual using the same ratios as live ticking.
//!
//! Only working time is compensated. Time spent suspended while resting
//! does not spend any rest credit.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::types::{Mode, WORK_TO_REST_RATIO};

/// What was happening when the process left the foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundMark {
    /// Wall-clock time of the suspend
    pub at: DateTime<Utc>,
    /// Mode whose accrual was interrupted (`Idle` if nothing was ticking)
    pub mode: Mode,
}

/// A lump accrual computed from a background gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Accrual {
    /// Wall-clock length of the gap
    pub elapsed_ms: u64,
    /// Work time to add
    pub work_ms: u64,
    /// Rest credit to add
    pub credit_ms: i64,
}

impl Accrual {
    /// Computes the accrual owed for `elapsed_ms` spent in `mode`.
    pub fn for_mode(mode: Mode, elapsed_ms: u64) -> Self {
        match mode {
            Mode::Working => Self {
                elapsed_ms,
                work_ms: elapsed_ms,
                credit_ms: (elapsed_ms / WORK_TO_REST_RATIO) as i64,
            },
            Mode::Resting | Mode::Idle => Self {
                elapsed_ms,
                ..Self::default()
            },
        }
    }

    /// Returns true if nothing needs to be applied.
    pub fn is_empty(&self) -> bool {
        self.work_ms == 0 && self.credit_ms == 0
    }
}

/// Milliseconds between two wall-clock instants, clamped at zero.
pub fn elapsed_ms(since: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let millis = now.signed_duration_since(since).num_milliseconds();
    if millis < 0 {
        warn!(millis, "wall clock moved backwards while suspended");
        return 0;
    }
    millis as u64
}

/// Holds the pending background mark between suspend and resume.
#[derive(Debug, Default)]
pub struct BackgroundCatchUp {
    mark: Option<BackgroundMark>,
}

impl BackgroundCatchUp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a suspend. A mark that is already pending is kept.
    pub fn capture(&mut self, at: DateTime<Utc>, mode: Mode) {
        if self.mark.is_none() {
            self.mark = Some(BackgroundMark { at, mode });
        }
    }

    /// Consumes the pending mark and computes what is owed.
    ///
    /// Returns None if there was no suspend to catch up on.
    pub fn consume(&mut self, now: DateTime<Utc>) -> Option<(BackgroundMark, Accrual)> {
        let mark = self.mark.take()?;
        let accrual = Accrual::for_mode(mark.mode, elapsed_ms(mark.at, now));
        Some((mark, accrual))
    }

    /// Returns the pending mark, if any.
    pub fn pending(&self) -> Option<&BackgroundMark> {
        self.mark.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_working_gap_uses_live_ratio() {
        let accrual = Accrual::for_mode(Mode::Working, 10_000);
        assert_eq!(accrual.work_ms, 10_000);
        assert_eq!(accrual.credit_ms, 2_000);
    }

    #[test]
    fn test_working_gap_floors_credit() {
        let accrual = Accrual::for_mode(Mode::Working, 1_234);
        assert_eq!(accrual.work_ms, 1_234);
        assert_eq!(accrual.credit_ms, 246);
    }

    #[test]
    fn test_resting_gap_is_not_compensated() {
        let accrual = Accrual::for_mode(Mode::Resting, 60_000);
        assert_eq!(accrual.elapsed_ms, 60_000);
        assert!(accrual.is_empty());
    }

    #[test]
    fn test_idle_gap_is_empty() {
        assert!(Accrual::for_mode(Mode::Idle, 60_000).is_empty());
    }

    #[test]
    fn test_elapsed_ms_clamps_backwards_clock() {
        assert_eq!(elapsed_ms(t0(), t0() - Duration::seconds(5)), 0);
        assert_eq!(elapsed_ms(t0(), t0() + Duration::milliseconds(1500)), 1500);
    }

    #[test]
    fn test_consume_without_capture() {
        let mut catch_up = BackgroundCatchUp::new();
        assert!(catch_up.consume(t0()).is_none());
    }

    #[test]
    fn test_capture_then_consume() {
        let mut catch_up = BackgroundCatchUp::new();
        catch_up.capture(t0(), Mode::Working);
        assert!(catch_up.pending().is_some());

        let (mark, accrual) = catch_up.consume(t0() + Duration::seconds(10)).unwrap();
        assert_eq!(mark.mode, Mode::Working);
        assert_eq!(accrual.work_ms, 10_000);
        assert_eq!(accrual.credit_ms, 2_000);

        // consumed marks are cleared
        assert!(catch_up.pending().is_none());
        assert!(catch_up.consume(t0() + Duration::seconds(20)).is_none());
    }

    #[test]
    fn test_repeated_capture_keeps_earliest() {
        let mut catch_up = BackgroundCatchUp::new();
        catch_up.capture(t0(), Mode::Working);
        catch_up.capture(t0() + Duration::seconds(3), Mode::Idle);

        let (mark, accrual) = catch_up.consume(t0() + Duration::seconds(5)).unwrap();
        assert_eq!(mark.at, t0());
        assert_eq!(accrual.work_ms, 5_000);
    }
}
