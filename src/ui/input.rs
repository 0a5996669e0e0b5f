//! Keyboard input.
//!
//! crossterm's event reader blocks, so it runs on its own thread and
//! forwards intents to the controller over a channel.

use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::types::{Action, Intent};

/// Maps a key press to an intent.
pub fn map_key(key: KeyEvent) -> Option<Intent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Intent::Quit),
            KeyCode::Char('z') => Some(Intent::Suspend),
            KeyCode::Char('l') => Some(Intent::Redraw),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('w') | KeyCode::Char('W') => Some(Action::StartWorking.into()),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Action::Pause.into()),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::Reset.into()),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(Action::StartResting.into()),
        KeyCode::Enter | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(Action::AcknowledgeAlarm.into())
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Intent::Quit),
        _ => None,
    }
}

/// Maps any terminal event to an intent.
pub fn map_event(event: Event) -> Option<Intent> {
    match event {
        Event::Key(key) => map_key(key),
        Event::Resize(_, _) => Some(Intent::Redraw),
        _ => None,
    }
}

/// Spawns the blocking input reader.
///
/// The thread exits when the receiving side is dropped (after the next
/// event) or when reading from the terminal fails.
///
/// # Errors
///
/// Returns an error if the thread cannot be spawned.
pub fn spawn_input_reader(tx: mpsc::UnboundedSender<Intent>) -> Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("input".to_string())
        .spawn(move || loop {
            let event = match event::read() {
                Ok(event) => event,
                Err(e) => {
                    warn!("Failed to read terminal input: {}", e);
                    let _ = tx.send(Intent::Quit);
                    break;
                }
            };

            if let Some(intent) = map_event(event) {
                debug!(?intent, "input");
                if tx.send(intent).is_err() {
                    break;
                }
            }
        })
        .context("Failed to spawn input thread")
}
