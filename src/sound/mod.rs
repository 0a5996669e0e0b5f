//! Alarm sound playback for the Work/Rest timer.
//!
//! This module provides the alarm that sounds when rest credit runs out:
//!
//! - Sound source resolution (file, system sound by name, embedded)
//! - Background loading on a dedicated audio thread
//! - Looping start/stop playback
//! - Graceful degradation to silence when audio is unavailable
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │      Alarm       │ ← readiness check, used by the controller
//! └────────┬─────────┘
//!          │ dyn AlarmPlayer
//!          ▼
//! ┌──────────────────┐  crossbeam  ┌──────────────────┐
//! │ RodioAlarmPlayer │────────────▶│   audio worker   │
//! └──────────────────┘             │ (OutputStream +  │
//!                                  │  looping Sink)   │
//!                                  └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use workrest::sound::{create_alarm, Alarm};
//! use workrest::types::AppConfig;
//!
//! let alarm: Alarm = create_alarm(&AppConfig::default()).expect("alarm");
//! // later, once the sound is loaded:
//! alarm.play();
//! alarm.stop();
//! ```

mod alarm;
mod embedded;
mod error;
mod player;
mod source;

use std::sync::Arc;

use tracing::warn;

pub use alarm::{Alarm, AlarmPlayer, MockAlarmPlayer, SilentAlarmPlayer};
pub use error::SoundError;
pub use player::RodioAlarmPlayer;
pub use source::{
    discover_system_sounds, find_system_sound, is_supported, resolve_alarm, SoundSource,
    EMBEDDED_ALARM_NAME, SUPPORTED_EXTENSIONS,
};

use crate::types::AppConfig;

/// Builds the alarm for a session.
///
/// A muted configuration yields a silent alarm without touching the audio
/// device. Otherwise the sound is resolved and starts loading in the
/// background.
///
/// # Errors
///
/// Returns an error if the configured alarm cannot be resolved (unknown
/// sound name or unsupported file format). Device problems are not errors;
/// they leave the alarm silent.
pub fn create_alarm(config: &AppConfig) -> Result<Alarm, SoundError> {
    if config.muted {
        return Ok(Alarm::silent());
    }

    let source = resolve_alarm(&config.alarm)?;
    match RodioAlarmPlayer::load(source) {
        Ok(player) => Ok(Alarm::new(Arc::new(player))),
        Err(e) => {
            warn!("Audio not available, alarm disabled: {}", e);
            Ok(Alarm::silent())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AlarmChoice;

    #[test]
    fn test_module_exports() {
        let _: fn() -> Vec<SoundSource> = discover_system_sounds;
        let _: fn(&str) -> Result<SoundSource, SoundError> = find_system_sound;
        let _: fn(&AlarmChoice) -> Result<SoundSource, SoundError> = resolve_alarm;
    }

    #[test]
    fn test_create_alarm_muted_is_ready() {
        let config = AppConfig::default().with_muted(true);
        let alarm = create_alarm(&config).unwrap();
        assert!(alarm.is_ready());
    }

    #[test]
    fn test_create_alarm_unknown_name_fails() {
        let config =
            AppConfig::default().with_alarm(AlarmChoice::Named("NoSuchSound12345".to_string()));
        assert!(matches!(
            create_alarm(&config),
            Err(SoundError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_create_alarm_default_no_panic() {
        // May stay not-ready in a container without audio, that's expected
        let _ = create_alarm(&AppConfig::default());
    }
}
