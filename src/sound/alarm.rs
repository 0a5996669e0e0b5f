//! Alarm adapter used by the controller.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::debug;

use super::player::RodioAlarmPlayer;

/// Trait for alarm playback implementations.
///
/// Calls are fire-and-forget: nothing in the state machine waits for, or
/// depends on, their outcome.
pub trait AlarmPlayer: Send + Sync {
    /// Returns true once the sound is loaded and can be played.
    fn is_ready(&self) -> bool;

    /// Starts (or restarts) the alarm.
    fn start(&self);

    /// Stops the alarm if it is playing.
    fn stop(&self);
}

impl AlarmPlayer for RodioAlarmPlayer {
    fn is_ready(&self) -> bool {
        RodioAlarmPlayer::is_ready(self)
    }

    fn start(&self) {
        RodioAlarmPlayer::start(self)
    }

    fn stop(&self) {
        RodioAlarmPlayer::stop(self)
    }
}

/// A player that is always ready and never makes a sound (`--mute`).
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAlarmPlayer;

impl AlarmPlayer for SilentAlarmPlayer {
    fn is_ready(&self) -> bool {
        true
    }

    fn start(&self) {
        debug!("alarm muted");
    }

    fn stop(&self) {}
}

/// Mock alarm player for testing.
#[derive(Debug)]
pub struct MockAlarmPlayer {
    ready: AtomicBool,
    start_calls: AtomicUsize,
    stop_calls: AtomicUsize,
}

impl Default for MockAlarmPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAlarmPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ready: AtomicBool::new(true),
            start_calls: AtomicUsize::new(0),
            stop_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    #[must_use]
    pub fn start_count(&self) -> usize {
        self.start_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn stop_count(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }
}

impl AlarmPlayer for MockAlarmPlayer {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn start(&self) {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn stop(&self) {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// The alarm as the controller sees it.
///
/// Checks readiness before every call, so requests that arrive before the
/// sound has finished loading are dropped instead of queued.
#[derive(Clone)]
pub struct Alarm {
    player: Arc<dyn AlarmPlayer>,
}

impl Alarm {
    pub fn new(player: Arc<dyn AlarmPlayer>) -> Self {
        Self { player }
    }

    /// Creates an alarm that never sounds.
    pub fn silent() -> Self {
        Self::new(Arc::new(SilentAlarmPlayer))
    }

    /// Returns true if the underlying sound is loaded.
    pub fn is_ready(&self) -> bool {
        self.player.is_ready()
    }

    /// Starts the alarm, or does nothing if it is not loaded yet.
    pub fn play(&self) {
        if !self.player.is_ready() {
            debug!("alarm not loaded, play request ignored");
            return;
        }
        self.player.start();
    }

    /// Stops the alarm, or does nothing if it is not loaded yet.
    pub fn stop(&self) {
        if !self.player.is_ready() {
            debug!("alarm not loaded, stop request ignored");
            return;
        }
        self.player.stop();
    }
}

impl std::fmt::Debug for Alarm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Alarm")
            .field("ready", &self.is_ready())
            .finish_non_exhaustive()
    }
}
