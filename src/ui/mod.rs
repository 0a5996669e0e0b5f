//! Terminal user interface.
//!
//! The controller renders a [`ViewModel`] through the [`Renderer`] trait;
//! [`TerminalRenderer`] draws it with ratatui on the alternate screen.

mod input;
mod render;
mod view;

use std::io::{self, Stdout};

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::warn;

pub use input::{map_event, map_key, spawn_input_reader};
pub use render::draw;
pub use view::{format_hms, Control, Controls, ViewModel};

/// Something that can show the timer screen.
pub trait Renderer {
    /// Draws the current view.
    fn render(&mut self, view: &ViewModel) -> Result<()>;

    /// Gives the terminal back before the process is suspended.
    fn suspend(&mut self) -> Result<()> {
        Ok(())
    }

    /// Takes the terminal again after the process continues.
    fn resume(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Renders to the real terminal in raw mode on the alternate screen.
pub struct TerminalRenderer {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    active: bool,
}

impl TerminalRenderer {
    /// Enters raw mode and the alternate screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be set up.
    pub fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e).context("Failed to enter the alternate screen");
        }

        let terminal = Terminal::new(CrosstermBackend::new(stdout))
            .context("Failed to create the terminal")?;

        Ok(Self {
            terminal,
            active: true,
        })
    }

    /// Restores the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be restored.
    pub fn leave(mut self) -> Result<()> {
        self.restore()
    }

    fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave the alternate screen")?;
        self.terminal
            .show_cursor()
            .context("Failed to show the cursor")?;
        Ok(())
    }
}

impl Renderer for TerminalRenderer {
    fn render(&mut self, view: &ViewModel) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.terminal
            .draw(|frame| draw(frame, view))
            .context("Failed to draw")?;
        Ok(())
    }

    fn suspend(&mut self) -> Result<()> {
        self.restore()
    }

    fn resume(&mut self) -> Result<()> {
        if self.active {
            return Ok(());
        }

        enable_raw_mode().context("Failed to enable raw mode")?;
        execute!(self.terminal.backend_mut(), EnterAlternateScreen)
            .context("Failed to enter the alternate screen")?;
        self.terminal.clear().context("Failed to clear")?;
        self.active = true;
        Ok(())
    }
}

impl Drop for TerminalRenderer {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!("Failed to restore terminal: {:#}", e);
        }
    }
}
