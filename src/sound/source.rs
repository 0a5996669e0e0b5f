//! Alarm sound source resolution.
//!
//! An alarm can come from a user-supplied file, a system sound looked up by
//! name, or the beep pattern compiled into the binary.

use std::path::{Path, PathBuf};

use super::error::SoundError;
use crate::types::AlarmChoice;

/// Represents the source of the alarm sound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundSource {
    /// An audio file on disk.
    File {
        /// Display name (the file stem).
        name: String,
        /// Full path to the file.
        path: PathBuf,
    },
    /// The sound compiled into the binary.
    Embedded {
        /// The name of the embedded sound.
        name: String,
    },
}

impl SoundSource {
    /// Creates a new file sound source.
    #[must_use]
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::File {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Creates a new embedded sound source.
    #[must_use]
    pub fn embedded(name: impl Into<String>) -> Self {
        Self::Embedded { name: name.into() }
    }

    /// Returns the name of the sound source.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::File { name, .. } | Self::Embedded { name } => name,
        }
    }

    /// Returns true if this is the embedded sound.
    #[must_use]
    pub fn is_embedded(&self) -> bool {
        matches!(self, Self::Embedded { .. })
    }

    /// Returns the file path if this is a file sound.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File { path, .. } => Some(path),
            Self::Embedded { .. } => None,
        }
    }
}

/// Directories to search for system sounds, in order of priority.
#[cfg(target_os = "macos")]
const SYSTEM_SOUND_DIRS: &[&str] = &["/System/Library/Sounds", "/Library/Sounds"];

#[cfg(not(target_os = "macos"))]
const SYSTEM_SOUND_DIRS: &[&str] = &[
    "/usr/share/sounds/freedesktop/stereo",
    "/usr/share/sounds/alsa",
    "/usr/share/sounds",
];

/// Supported audio file extensions.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["wav", "mp3", "flac", "ogg", "oga", "aiff"];

/// Name of the embedded alarm.
pub const EMBEDDED_ALARM_NAME: &str = "beeps";

/// Returns true if the file extension is one we can decode.
#[must_use]
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

fn sound_from_path(path: PathBuf) -> Option<SoundSource> {
    if !is_supported(&path) {
        return None;
    }
    let stem = path.file_stem()?.to_string_lossy().into_owned();
    Some(SoundSource::File { name: stem, path })
}

/// Discovers available system sounds.
///
/// Returns an empty vector if no sounds are found. When the same name exists
/// in several directories the first directory wins.
#[must_use]
pub fn discover_system_sounds() -> Vec<SoundSource> {
    discover_in(SYSTEM_SOUND_DIRS.iter().map(PathBuf::from))
}

fn discover_in(dirs: impl IntoIterator<Item = PathBuf>) -> Vec<SoundSource> {
    let mut sounds: Vec<SoundSource> = Vec::new();

    for dir in dirs {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };

        let mut found: Vec<SoundSource> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter_map(sound_from_path)
            .filter(|sound| !sounds.iter().any(|s| s.name() == sound.name()))
            .collect();
        sounds.append(&mut found);
    }

    // Sort by name for consistent ordering
    sounds.sort_by(|a, b| a.name().cmp(b.name()));
    sounds
}

/// Finds a system sound by name (case-insensitive).
///
/// # Errors
///
/// Returns `SoundError::FileNotFound` if no sound with the given name exists.
pub fn find_system_sound(name: &str) -> Result<SoundSource, SoundError> {
    find_in(discover_system_sounds(), name)
}

fn find_in(sounds: Vec<SoundSource>, name: &str) -> Result<SoundSource, SoundError> {
    sounds
        .into_iter()
        .find(|s| s.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| SoundError::FileNotFound(format!("system sound '{}' not found", name)))
}

/// Turns the configured alarm choice into a playable source.
///
/// # Errors
///
/// Returns `FileNotFound` for an unknown sound name and `UnsupportedFormat`
/// for a file we cannot decode.
pub fn resolve_alarm(choice: &AlarmChoice) -> Result<SoundSource, SoundError> {
    match choice {
        AlarmChoice::Embedded => Ok(SoundSource::embedded(EMBEDDED_ALARM_NAME)),
        AlarmChoice::Named(name) => find_system_sound(name),
        AlarmChoice::File(path) => sound_from_path(path.clone())
            .ok_or_else(|| SoundError::UnsupportedFormat(path.display().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sound_source_file() {
        let source = SoundSource::file("alarm", "/tmp/alarm.mp3");
        assert!(!source.is_embedded());
        assert_eq!(source.name(), "alarm");
        assert_eq!(source.path(), Some(Path::new("/tmp/alarm.mp3")));
    }

    #[test]
    fn test_sound_source_embedded() {
        let source = SoundSource::embedded("beeps");
        assert!(source.is_embedded());
        assert_eq!(source.name(), "beeps");
        assert!(source.path().is_none());
    }

    #[test]
    fn test_is_supported() {
        assert!(is_supported(Path::new("alarm.wav")));
        assert!(is_supported(Path::new("ALARM.MP3")));
        assert!(is_supported(Path::new("/a/b/bell.oga")));
        assert!(!is_supported(Path::new("notes.txt")));
        assert!(!is_supported(Path::new("no_extension")));
    }

    #[test]
    fn test_discover_in_temp_dirs() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        std::fs::write(first.path().join("bell.wav"), b"x").unwrap();
        std::fs::write(first.path().join("readme.txt"), b"x").unwrap();
        std::fs::write(second.path().join("bell.ogg"), b"x").unwrap();
        std::fs::write(second.path().join("alarm.mp3"), b"x").unwrap();

        let sounds = discover_in([first.path().to_path_buf(), second.path().to_path_buf()]);

        let names: Vec<&str> = sounds.iter().map(SoundSource::name).collect();
        assert_eq!(names, vec!["alarm", "bell"]);
        // first directory wins for duplicate names
        let bell = sounds.iter().find(|s| s.name() == "bell").unwrap();
        assert_eq!(bell.path(), Some(first.path().join("bell.wav").as_path()));
    }

    #[test]
    fn test_discover_missing_dir_is_empty() {
        let sounds = discover_in([PathBuf::from("/nonexistent/sounds/dir")]);
        assert!(sounds.is_empty());
    }

    #[test]
    fn test_discover_system_sounds_no_panic() {
        let _ = discover_system_sounds();
    }

    #[test]
    fn test_find_in_is_case_insensitive() {
        let sounds = vec![SoundSource::file("Glass", "/x/Glass.aiff")];
        let found = find_in(sounds, "glass").unwrap();
        assert_eq!(found.name(), "Glass");
    }

    #[test]
    fn test_find_system_sound_not_found() {
        let result = find_system_sound("NonExistentSound12345");
        match result {
            Err(SoundError::FileNotFound(msg)) => assert!(msg.contains("NonExistentSound12345")),
            other => panic!("Expected FileNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_embedded() {
        let source = resolve_alarm(&AlarmChoice::Embedded).unwrap();
        assert!(source.is_embedded());
        assert_eq!(source.name(), EMBEDDED_ALARM_NAME);
    }

    #[test]
    fn test_resolve_file() {
        let source =
            resolve_alarm(&AlarmChoice::File(PathBuf::from("/sounds/wake-up.mp3"))).unwrap();
        assert_eq!(source.name(), "wake-up");
    }

    #[test]
    fn test_resolve_unsupported_file() {
        let result = resolve_alarm(&AlarmChoice::File(PathBuf::from("/sounds/alarm.txt")));
        assert!(matches!(result, Err(SoundError::UnsupportedFormat(_))));
    }
}
