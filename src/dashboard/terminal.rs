//! Raw-mode terminal session.

use std::io::{stdout, Stdout};

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, size, EnterAlternateScreen, LeaveAlternateScreen,
        SetTitle,
    },
};
use tracing::warn;

/// RAII guard over the full-screen terminal. Entering switches to raw mode
/// and the alternate screen; dropping restores the terminal even on early
/// return or panic.
pub struct TerminalSession {
    out: Stdout,
    active: bool,
}

impl TerminalSession {
    pub fn enter() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut session = Self {
            out: stdout(),
            active: true,
        };
        execute!(session.out, EnterAlternateScreen, Hide, SetTitle("RetroDash"))
            .context("failed to enter the alternate screen")?;
        Ok(session)
    }

    /// The writer frames are drawn to.
    pub fn out(&mut self) -> &mut Stdout {
        &mut self.out
    }

    /// Current width in columns, 80 if it cannot be queried.
    pub fn width(&self) -> u16 {
        size().map(|(cols, _)| cols).unwrap_or(80)
    }

    /// Restores the terminal. Called by `Drop` if not called explicitly.
    pub fn leave(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        execute!(self.out, LeaveAlternateScreen, Show)
            .context("failed to leave the alternate screen")?;
        disable_raw_mode().context("failed to disable raw mode")?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(e) = self.leave() {
            warn!(error = %e, "Terminal not fully restored");
        }
    }
}
