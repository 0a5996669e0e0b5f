//! Alarm player implementation using rodio.
//!
//! rodio's output stream must stay on the thread that created it, so the
//! player owns a dedicated worker thread. The worker opens the device,
//! loads the alarm once and then serves start/stop commands until the
//! player is dropped.

use std::fs;
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{unbounded, Receiver, Sender};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use super::embedded::get_embedded_sound;
use super::error::SoundError;
use super::source::SoundSource;

/// Commands sent to the audio worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AlarmCommand {
    Start,
    Stop,
}

/// An alarm player backed by a rodio sink on a worker thread.
///
/// Loading happens in the background; until it finishes, `is_ready` is
/// false. If no output device exists the player never becomes ready and
/// the alarm stays silent.
pub struct RodioAlarmPlayer {
    /// Command channel to the worker.
    commands: Sender<AlarmCommand>,
    /// Set by the worker once the alarm is loaded.
    ready: Arc<AtomicBool>,
    /// Name of the requested sound.
    source_name: String,
}

impl RodioAlarmPlayer {
    /// Starts loading the alarm in the background.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::PlaybackError` if the worker thread cannot be
    /// spawned.
    pub fn load(source: SoundSource) -> Result<Self, SoundError> {
        let (tx, rx) = unbounded();
        let ready = Arc::new(AtomicBool::new(false));
        let source_name = source.name().to_string();

        let worker_ready = Arc::clone(&ready);
        thread::Builder::new()
            .name("alarm-audio".to_string())
            .spawn(move || run_worker(source, rx, worker_ready))
            .map_err(|e| SoundError::PlaybackError(e.to_string()))?;

        Ok(Self {
            commands: tx,
            ready,
            source_name,
        })
    }

    /// Returns true once the alarm has been loaded onto an output device.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Starts looping the alarm. Fire-and-forget.
    pub fn start(&self) {
        self.send(AlarmCommand::Start);
    }

    /// Stops the alarm. Fire-and-forget.
    pub fn stop(&self) {
        self.send(AlarmCommand::Stop);
    }

    fn send(&self, command: AlarmCommand) {
        if self.commands.send(command).is_err() {
            debug!(?command, "alarm worker gone, command dropped");
        }
    }
}

impl std::fmt::Debug for RodioAlarmPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioAlarmPlayer")
            .field("source", &self.source_name)
            .field("ready", &self.is_ready())
            .finish_non_exhaustive()
    }
}

/// Worker loop: open the device, load the alarm, serve commands.
fn run_worker(source: SoundSource, commands: Receiver<AlarmCommand>, ready: Arc<AtomicBool>) {
    let (_stream, handle) = match OutputStream::try_default() {
        Ok(pair) => pair,
        Err(e) => {
            let err = SoundError::DeviceNotAvailable(e.to_string());
            warn!("{}, alarm will be silent ({})", err, err.suggestion());
            return;
        }
    };

    let data = match load_bytes(&source) {
        Ok(data) => data,
        Err(e) if e.should_fallback_to_embedded() => {
            warn!(
                "Failed to load alarm '{}': {}, falling back to embedded",
                source.name(),
                e
            );
            get_embedded_sound()
        }
        Err(e) => {
            warn!("Failed to load alarm '{}': {}", source.name(), e);
            return;
        }
    };

    ready.store(true, Ordering::Release);
    debug!(source = source.name(), "alarm loaded");

    let mut sink: Option<Sink> = None;
    for command in commands.iter() {
        match command {
            AlarmCommand::Start => {
                if let Some(previous) = sink.take() {
                    previous.stop();
                }
                match start_loop(&handle, Arc::clone(&data)) {
                    Ok(started) => {
                        debug!("alarm playback started");
                        sink = Some(started);
                    }
                    Err(e) if e.is_device_error() => warn!("Alarm device error: {}", e),
                    Err(e) => warn!("Alarm playback failed: {}", e),
                }
            }
            AlarmCommand::Stop => {
                if let Some(playing) = sink.take() {
                    playing.stop();
                    debug!("alarm playback stopped");
                }
            }
        }
    }

    debug!("alarm worker exiting");
}

/// Reads and validates the alarm bytes.
fn load_bytes(source: &SoundSource) -> Result<Arc<[u8]>, SoundError> {
    match source {
        SoundSource::Embedded { .. } => Ok(get_embedded_sound()),
        SoundSource::File { path, .. } => {
            let bytes: Arc<[u8]> = fs::read(path)
                .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?
                .into();

            // Decode once up front so a bad file falls back at load time
            Decoder::new(Cursor::new(Arc::clone(&bytes)))
                .map_err(|e| SoundError::DecodeError(format!("{}: {}", path.display(), e)))?;

            Ok(bytes)
        }
    }
}

/// Appends a looping decoder to a fresh sink.
fn start_loop(handle: &OutputStreamHandle, data: Arc<[u8]>) -> Result<Sink, SoundError> {
    let decoder =
        Decoder::new_looped(Cursor::new(data)).map_err(|e| SoundError::DecodeError(e.to_string()))?;
    let sink = Sink::try_new(handle).map_err(|e| SoundError::StreamError(e.to_string()))?;

    sink.append(decoder);
    Ok(sink)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: these tests may run without audio hardware (e.g., CI containers).
    // The player must never panic in that case; it simply stays not ready.

    #[test]
    fn test_load_bytes_embedded() {
        let data = load_bytes(&SoundSource::embedded("beeps")).unwrap();
        assert_eq!(&data[0..4], b"RIFF");
    }

    #[test]
    fn test_load_bytes_missing_file() {
        let result = load_bytes(&SoundSource::file("missing", "/nonexistent/alarm.wav"));
        match result {
            Err(e @ SoundError::FileNotFound(_)) => assert!(e.should_fallback_to_embedded()),
            other => panic!("Expected FileNotFound, got {:?}", other.map(|d| d.len())),
        }
    }

    #[test]
    fn test_load_bytes_garbage_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.wav");
        std::fs::write(&path, b"definitely not audio").unwrap();

        let result = load_bytes(&SoundSource::file("broken", &path));
        assert!(matches!(result, Err(SoundError::DecodeError(_))));
    }

    #[test]
    fn test_load_bytes_valid_wav_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("beep.wav");
        std::fs::write(&path, get_embedded_sound().as_ref()).unwrap();

        let data = load_bytes(&SoundSource::file("beep", &path)).unwrap();
        assert_eq!(data.len(), get_embedded_sound().len());
    }

    #[test]
    fn test_commands_without_device_do_not_panic() {
        let player = match RodioAlarmPlayer::load(SoundSource::embedded("beeps")) {
            Ok(p) => p,
            Err(_) => return,
        };

        player.start();
        player.stop();
    }

    #[test]
    fn test_debug_impl() {
        let player = match RodioAlarmPlayer::load(SoundSource::embedded("beeps")) {
            Ok(p) => p,
            Err(_) => return,
        };

        let debug_str = format!("{:?}", player);
        assert!(debug_str.contains("RodioAlarmPlayer"));
        assert!(debug_str.contains("beeps"));
    }
}
