//! Session controller.
//!
//! Owns the engine and everything with a side effect: the tick scheduler,
//! the alarm, the terminal and process suspension.

use anyhow::Result;
use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::{AccrualEngine, EngineError, EngineEvent, TickScheduler};
use crate::lifecycle::{LifecycleEvent, Suspender};
use crate::sound::Alarm;
use crate::types::{AccrualState, Action, Intent, Mode, TICK_INTERVAL};
use crate::ui::{Renderer, ViewModel};

/// What the run loop should do after handling an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Drives one interactive session.
pub struct Controller {
    engine: AccrualEngine,
    events: mpsc::UnboundedReceiver<EngineEvent>,
    scheduler: TickScheduler,
    /// Mode the scheduler was last armed for
    armed_for: Option<Mode>,
    alarm: Alarm,
    suspender: Box<dyn Suspender>,
}

impl Controller {
    /// Creates a controller in `Idle` with empty accumulators.
    pub fn new(alarm: Alarm, suspender: Box<dyn Suspender>) -> Self {
        Self::with_state(AccrualState::new(), alarm, suspender)
    }

    /// Creates a controller starting from an existing state.
    pub fn with_state(state: AccrualState, alarm: Alarm, suspender: Box<dyn Suspender>) -> Self {
        let (event_tx, events) = mpsc::unbounded_channel();
        Self {
            engine: AccrualEngine::with_state(state, event_tx),
            events,
            scheduler: TickScheduler::new(TICK_INTERVAL),
            armed_for: None,
            alarm,
            suspender,
        }
    }

    /// Returns the current accrual state.
    pub fn state(&self) -> &AccrualState {
        self.engine.get_state()
    }

    /// Returns what the screen should show.
    pub fn view(&self) -> ViewModel {
        ViewModel::from_state(self.engine.get_state())
    }

    /// Returns true if the live timer is armed.
    pub fn is_ticking(&self) -> bool {
        self.scheduler.is_armed()
    }

    /// Handles a user intent.
    ///
    /// Actions whose control is disabled are ignored.
    pub fn handle_intent<R: Renderer>(&mut self, intent: Intent, renderer: &mut R) -> Result<Flow> {
        match intent {
            Intent::Action(action) => self.handle_action(action)?,
            Intent::Suspend => {
                return self.handle_lifecycle(LifecycleEvent::background_now(), renderer);
            }
            Intent::Redraw => {}
            Intent::Quit => {
                info!("quit requested");
                return Ok(Flow::Quit);
            }
        }

        self.settle();
        Ok(Flow::Continue)
    }

    fn handle_action(&mut self, action: Action) -> Result<(), EngineError> {
        if !self.view().is_enabled(action) {
            debug!(action = %action, "control disabled, ignored");
            return Ok(());
        }

        match self.engine.apply(action) {
            Ok(()) => Ok(()),
            Err(e) if e.is_rejection() => {
                debug!(action = %action, "action rejected: {}", e);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Handles a foreground/background transition.
    ///
    /// Going to the background cancels the live timer, hands the terminal
    /// back and stops the process. The matching foreground event applies
    /// the catch-up and re-arms the timer.
    pub fn handle_lifecycle<R: Renderer>(
        &mut self,
        event: LifecycleEvent,
        renderer: &mut R,
    ) -> Result<Flow> {
        let at = event.at();
        match event {
            LifecycleEvent::Background { .. } => {
                self.engine.enter_background(at)?;
                self.settle();

                renderer.suspend()?;
                if let Err(e) = self.suspender.suspend() {
                    warn!("Could not suspend, resuming: {}", e);
                    self.resume(Utc::now(), renderer)?;
                }
            }
            LifecycleEvent::Foreground { .. } => {
                if !self.engine.is_backgrounded() {
                    debug!("foreground without a pending background, ignored");
                    return Ok(Flow::Continue);
                }
                self.resume(at, renderer)?;
            }
        }

        Ok(Flow::Continue)
    }

    fn resume<R: Renderer>(&mut self, at: chrono::DateTime<Utc>, renderer: &mut R) -> Result<()> {
        renderer.resume()?;
        self.engine.enter_foreground(at)?;

        // The old interval may hold a stale deadline from before the stop
        self.armed_for = None;
        self.settle();
        Ok(())
    }

    /// Handles one scheduler tick.
    pub fn handle_tick(&mut self) -> Result<()> {
        self.engine.tick()?;
        self.settle();
        Ok(())
    }

    /// Forwards pending engine events to the alarm.
    pub fn dispatch_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                EngineEvent::AlarmTriggered => self.alarm.play(),
                EngineEvent::AlarmAcknowledged => self.alarm.stop(),
                EngineEvent::Ticked { .. } => {}
                other => debug!(event = ?other, "engine event"),
            }
        }
    }

    /// Arms, re-arms or cancels the live timer to match the state.
    ///
    /// The timer restarts whenever the ticking mode changes, so a tick
    /// scheduled for one mode never lands in another.
    pub fn sync_scheduler(&mut self) {
        let state = self.engine.get_state();
        let wanted = if state.is_ticking() && !self.engine.is_backgrounded() {
            Some(state.mode)
        } else {
            None
        };

        if wanted == self.armed_for && self.scheduler.is_armed() == wanted.is_some() {
            return;
        }

        match wanted {
            Some(_) => self.scheduler.restart(),
            None => self.scheduler.cancel(),
        }
        self.armed_for = wanted;
    }

    fn settle(&mut self) {
        self.dispatch_events();
        self.sync_scheduler();
    }

    /// Runs the session until the user quits or the intent channel closes.
    ///
    /// Lifecycle events take priority over intents, and both over ticks.
    /// Returns the final state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or the engine can no longer
    /// publish events.
    pub async fn run<R: Renderer>(
        mut self,
        renderer: &mut R,
        mut intents: mpsc::UnboundedReceiver<Intent>,
        mut lifecycle: mpsc::UnboundedReceiver<LifecycleEvent>,
    ) -> Result<AccrualState> {
        self.settle();
        renderer.render(&self.view())?;

        let mut lifecycle_open = true;
        let result = loop {
            let step = tokio::select! {
                biased;

                event = lifecycle.recv(), if lifecycle_open => match event {
                    Some(event) => self.handle_lifecycle(event, renderer),
                    None => {
                        lifecycle_open = false;
                        Ok(Flow::Continue)
                    }
                },
                intent = intents.recv() => match intent {
                    Some(intent) => self.handle_intent(intent, renderer),
                    None => Ok(Flow::Quit),
                },
                () = self.scheduler.tick() => self.handle_tick().map(|()| Flow::Continue),
            };

            match step {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break Ok(()),
                Err(e) => break Err(e),
            }

            if let Err(e) = renderer.render(&self.view()) {
                break Err(e);
            }
        };

        self.alarm.stop();
        self.scheduler.cancel();
        result.map(|()| self.engine.get_state().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::{NoopSuspender, UnsupportedSuspender};
    use crate::sound::MockAlarmPlayer;
    use chrono::TimeZone;
    use std::sync::Arc;

    #[derive(Default)]
    struct NullRenderer {
        suspended: usize,
        resumed: usize,
    }

    impl Renderer for NullRenderer {
        fn render(&mut self, _view: &ViewModel) -> Result<()> {
            Ok(())
        }

        fn suspend(&mut self) -> Result<()> {
            self.suspended += 1;
            Ok(())
        }

        fn resume(&mut self) -> Result<()> {
            self.resumed += 1;
            Ok(())
        }
    }

    fn create_controller() -> (Controller, Arc<MockAlarmPlayer>) {
        let player = Arc::new(MockAlarmPlayer::new());
        let controller = Controller::new(Alarm::new(player.clone()), Box::new(NoopSuspender));
        (controller, player)
    }

    fn act(controller: &mut Controller, action: Action) {
        let mut renderer = NullRenderer::default();
        controller.handle_intent(action.into(), &mut renderer).unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduler_follows_mode() {
        let (mut controller, _) = create_controller();
        assert!(!controller.is_ticking());

        act(&mut controller, Action::StartWorking);
        assert!(controller.is_ticking());

        act(&mut controller, Action::Pause);
        assert!(!controller.is_ticking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_action_is_ignored() {
        let (mut controller, _) = create_controller();

        act(&mut controller, Action::StartResting);

        assert_eq!(controller.state().mode, Mode::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_accrue() {
        let (mut controller, _) = create_controller();
        act(&mut controller, Action::StartWorking);

        for _ in 0..5 {
            controller.handle_tick().unwrap();
        }

        assert_eq!(controller.state().work_elapsed_ms, 5000);
        assert_eq!(controller.state().rest_credit_ms, 1000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_alarm_fires_and_is_acknowledged() {
        let (mut controller, player) = create_controller();
        act(&mut controller, Action::StartWorking);
        for _ in 0..5 {
            controller.handle_tick().unwrap();
        }
        act(&mut controller, Action::StartResting);

        controller.handle_tick().unwrap();

        assert_eq!(player.start_count(), 1);
        assert!(controller.state().alarm.is_playing());
        assert!(!controller.is_ticking());
        assert!(controller.view().is_alarm());

        act(&mut controller, Action::AcknowledgeAlarm);

        assert_eq!(player.stop_count(), 1);
        assert_eq!(controller.state().mode, Mode::Idle);
        assert_eq!(controller.state().rest_credit_ms, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_alarm_not_ready_is_silent() {
        let (mut controller, player) = create_controller();
        player.set_ready(false);
        controller.engine.get_state_mut().rest_credit_ms = 1000;
        act(&mut controller, Action::StartResting);

        controller.handle_tick().unwrap();

        assert!(controller.state().alarm.is_playing());
        assert_eq!(player.start_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_foreground_catch_up() {
        let (mut controller, _) = create_controller();
        let mut renderer = NullRenderer::default();
        act(&mut controller, Action::StartWorking);

        let t0 = Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();
        controller
            .handle_lifecycle(LifecycleEvent::Background { at: t0 }, &mut renderer)
            .unwrap();

        assert!(!controller.is_ticking());
        assert_eq!(renderer.suspended, 1);

        controller
            .handle_lifecycle(
                LifecycleEvent::Foreground {
                    at: t0 + chrono::Duration::seconds(10),
                },
                &mut renderer,
            )
            .unwrap();

        assert_eq!(renderer.resumed, 1);
        assert_eq!(controller.state().work_elapsed_ms, 10_000);
        assert_eq!(controller.state().rest_credit_ms, 2000);
        assert!(controller.is_ticking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_foreground_without_background_is_ignored() {
        let (mut controller, _) = create_controller();
        let mut renderer = NullRenderer::default();

        controller
            .handle_lifecycle(LifecycleEvent::foreground_now(), &mut renderer)
            .unwrap();

        assert_eq!(renderer.resumed, 0);
        assert_eq!(*controller.state(), AccrualState::new());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_suspend_resumes_immediately() {
        let player = Arc::new(MockAlarmPlayer::new());
        let mut controller =
            Controller::new(Alarm::new(player), Box::new(UnsupportedSuspender));
        let mut renderer = NullRenderer::default();
        act(&mut controller, Action::StartWorking);

        controller
            .handle_intent(Intent::Suspend, &mut renderer)
            .unwrap();

        assert_eq!(renderer.suspended, 1);
        assert_eq!(renderer.resumed, 1);
        assert!(controller.is_ticking());
        assert_eq!(controller.state().mode, Mode::Working);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit_intent() {
        let (mut controller, _) = create_controller();
        let mut renderer = NullRenderer::default();

        let flow = controller.handle_intent(Intent::Quit, &mut renderer).unwrap();

        assert_eq!(flow, Flow::Quit);
    }
}
