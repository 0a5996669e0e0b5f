//! View model: what the screen shows, derived from the accrual state.

use crate::types::{AccrualState, Action, Mode};

/// Formats milliseconds as zero-padded `HH:MM:SS` (floor division).
///
/// Hours are not wrapped, so 100 hours renders as `100:00:00`.
pub fn format_hms(ms: u64) -> String {
    let total_seconds = ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// One on-screen control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control {
    /// Action forwarded when the control is used
    pub action: Action,
    /// Button text
    pub label: &'static str,
    /// Key that triggers the control
    pub key: &'static str,
    /// Whether the control can be used right now
    pub enabled: bool,
}

/// The controls shown below the readouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Controls {
    /// Work, Pause, Reset, Rest
    Row([Control; 4]),
    /// Only the acknowledge control, while the alarm sounds
    Alarm(Control),
}

/// Everything the renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub mode: Mode,
    pub work_readout: String,
    pub rest_readout: String,
    pub controls: Controls,
}

impl ViewModel {
    /// Builds the view for the given state.
    pub fn from_state(state: &AccrualState) -> Self {
        let controls = if state.alarm.is_playing() {
            Controls::Alarm(Control {
                action: Action::AcknowledgeAlarm,
                label: "Stop Alarm",
                key: "enter",
                enabled: true,
            })
        } else {
            let counting = state.mode.is_active();
            Controls::Row([
                Control {
                    action: Action::StartWorking,
                    label: "Work",
                    key: "w",
                    enabled: state.mode != Mode::Working,
                },
                Control {
                    action: Action::Pause,
                    label: "Pause",
                    key: "p",
                    enabled: counting,
                },
                Control {
                    action: Action::Reset,
                    label: "Reset",
                    key: "r",
                    enabled: counting || state.has_accrued(),
                },
                Control {
                    action: Action::StartResting,
                    label: "Rest",
                    key: "s",
                    enabled: state.can_rest(),
                },
            ])
        };

        Self {
            mode: state.mode,
            work_readout: format_hms(state.work_elapsed_ms),
            rest_readout: format_hms(state.displayed_rest_ms()),
            controls,
        }
    }

    /// Returns true if the alarm screen is showing.
    pub fn is_alarm(&self) -> bool {
        matches!(self.controls, Controls::Alarm(_))
    }

    /// Returns the visible controls.
    pub fn controls(&self) -> &[Control] {
        match &self.controls {
            Controls::Row(row) => row,
            Controls::Alarm(control) => std::slice::from_ref(control),
        }
    }

    /// Returns true if a visible, enabled control maps to `action`.
    pub fn is_enabled(&self, action: Action) -> bool {
        self.controls()
            .iter()
            .any(|control| control.action == action && control.enabled)
    }

    /// Short status text for the current mode.
    pub fn status(&self) -> &'static str {
        if self.is_alarm() {
            return "Rest is over";
        }
        match self.mode {
            Mode::Idle => "Paused",
            Mode::Working => "Working",
            Mode::Resting => "Resting",
        }
    }
}
