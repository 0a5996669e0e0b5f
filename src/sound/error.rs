//! Sound system error types.
//!
//! None of these ever reach the accrual engine: a failing alarm degrades to
//! silence. They surface only while resolving the `--alarm` argument and in
//! log output.

use thiserror::Error;

/// Errors that can occur in the alarm playback system.
#[derive(Debug, Error)]
pub enum SoundError {
    /// Audio device is not available (e.g., no speakers connected).
    #[error("audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// Sound file was not found at the specified path or under that name.
    #[error("sound file not found: {0}")]
    FileNotFound(String),

    /// The file extension is not one we can decode.
    #[error("unsupported sound format: {0}")]
    UnsupportedFormat(String),

    /// Failed to decode the audio file.
    #[error("failed to decode sound: {0}")]
    DecodeError(String),

    /// Failed to create the audio output sink.
    #[error("failed to open audio stream: {0}")]
    StreamError(String),

    /// Generic playback error.
    #[error("sound playback error: {0}")]
    PlaybackError(String),
}

impl SoundError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }

    /// Returns true if the alarm should fall back to the embedded tone.
    #[must_use]
    pub fn should_fallback_to_embedded(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound(_) | Self::DecodeError(_) | Self::UnsupportedFormat(_)
        )
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::DeviceNotAvailable(_) => "connect an audio output device",
            Self::FileNotFound(_) => "run `workrest sounds` to list available alarm sounds",
            Self::UnsupportedFormat(_) => "use a wav, mp3, flac or ogg file",
            Self::DecodeError(_) => "the sound file may be corrupted",
            Self::StreamError(_) => "check your audio settings",
            Self::PlaybackError(_) => "restart the application",
        }
    }
}
