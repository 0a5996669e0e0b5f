//! Cancellable periodic tick source.

use std::future;

use tokio::time::{interval_at, Duration, Instant, Interval, MissedTickBehavior};
use tracing::debug;

/// A repeating timer that can be cancelled and re-armed.
///
/// Re-arming always creates a fresh interval whose first tick is one full
/// period away, so a timer left over from a previous mode can never fire.
#[derive(Debug)]
pub struct TickScheduler {
    period: Duration,
    interval: Option<Interval>,
}

impl TickScheduler {
    /// Creates a disarmed scheduler.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    /// Cancels any running timer and starts a new one.
    pub fn restart(&mut self) {
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.interval = Some(ticker);
        debug!(period_ms = self.period.as_millis() as u64, "tick scheduler armed");
    }

    /// Stops the timer. Pending ticks are dropped.
    pub fn cancel(&mut self) {
        if self.interval.take().is_some() {
            debug!("tick scheduler cancelled");
        }
    }

    /// Returns true if a timer is running.
    pub fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    /// Waits for the next tick. Never completes while disarmed.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(ticker) => {
                ticker.tick().await;
            }
            None => future::pending::<()>().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    fn assert_near(actual: Duration, expected: Duration) {
        assert!(
            actual >= expected && actual < expected + Duration::from_millis(10),
            "expected ~{:?}, got {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn test_new_is_disarmed() {
        let scheduler = TickScheduler::new(Duration::from_secs(1));
        assert!(!scheduler.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_disarmed_never_ticks() {
        let mut scheduler = TickScheduler::new(Duration::from_secs(1));
        let result = timeout(Duration::from_secs(10), scheduler.tick()).await;
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_after_one_period() {
        let mut scheduler = TickScheduler::new(Duration::from_secs(1));
        scheduler.restart();

        let start = Instant::now();
        scheduler.tick().await;
        assert_near(start.elapsed(), Duration::from_secs(1));

        scheduler.tick().await;
        assert_near(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_ticks() {
        let mut scheduler = TickScheduler::new(Duration::from_secs(1));
        scheduler.restart();
        scheduler.cancel();
        assert!(!scheduler.is_armed());

        let result = timeout(Duration::from_secs(5), scheduler.tick()).await;
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_discards_progress() {
        let mut scheduler = TickScheduler::new(Duration::from_secs(1));
        scheduler.restart();

        tokio::time::sleep(Duration::from_millis(900)).await;
        scheduler.restart();

        let start = Instant::now();
        scheduler.tick().await;
        assert_near(start.elapsed(), Duration::from_secs(1));
    }
}
