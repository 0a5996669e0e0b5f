//! Display utilities for the Work/Rest timer CLI.
//!
//! This module provides plain-text output for:
//! - Error messages
//! - The end-of-session summary
//! - The list of available alarm sounds

use crate::sound::SoundSource;
use crate::types::AccrualState;
use crate::ui::format_hms;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    /// Shows a hint below an error.
    pub fn show_hint(hint: &str) {
        eprintln!("  hint: {}", hint);
    }

    /// Shows the state the session ended in.
    pub fn show_summary(state: &AccrualState) {
        print!("{}", Self::format_summary(state));
    }

    /// Shows the available alarm sounds.
    pub fn show_sounds(sounds: &[SoundSource]) {
        print!("{}", Self::format_sounds(sounds));
    }

    fn format_summary(state: &AccrualState) -> String {
        let mut out = String::new();
        out.push_str(&format!("Worked:       {}\n", format_hms(state.work_elapsed_ms)));
        out.push_str(&format!(
            "Rest earned:  {}\n",
            format_hms(state.displayed_rest_ms())
        ));
        out
    }

    fn format_sounds(sounds: &[SoundSource]) -> String {
        let mut out = String::from("Available alarm sounds:\n");
        for sound in sounds {
            if sound.is_embedded() {
                out.push_str(&format!("  {:<16} (built in, default)\n", sound.name()));
            } else if let Some(path) = sound.path() {
                out.push_str(&format!("  {:<16} {}\n", sound.name(), path.display()));
            }
        }
        out
    }
}

// ============================================================================
// Tests
// ============================================================================
