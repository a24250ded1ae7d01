#![forbid(unsafe_code)]

//! Terminal session guard.
//!
//! Enters raw mode and the alternate screen on construction and restores the
//! terminal on drop, including when the demo unwinds from a panic.

use std::io::{self, Write};

use crossterm::{cursor, event, execute, terminal};

/// RAII guard over the terminal modes the demo switches on.
#[derive(Debug)]
pub struct TerminalSession {
    alternate_screen_enabled: bool,
    mouse_enabled: bool,
    cursor_hidden: bool,
}

impl TerminalSession {
    /// Enter raw mode, the alternate screen and optionally mouse capture.
    ///
    /// # Errors
    ///
    /// Returns the first terminal error; modes enabled before it are undone
    /// when the partially built guard drops.
    pub fn enter(mouse: bool) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        tracing::info!("terminal raw mode enabled");

        let mut session = Self {
            alternate_screen_enabled: false,
            mouse_enabled: false,
            cursor_hidden: false,
        };
        let mut stdout = io::stdout();

        execute!(stdout, terminal::EnterAlternateScreen)?;
        session.alternate_screen_enabled = true;

        if mouse {
            execute!(stdout, event::EnableMouseCapture)?;
            session.mouse_enabled = true;
            tracing::info!("mouse capture enabled");
        }

        execute!(stdout, cursor::Hide)?;
        session.cursor_hidden = true;
        Ok(session)
    }

    /// Current terminal size (columns, rows).
    pub fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn cleanup(&mut self) {
        let mut stdout = io::stdout();

        // Reverse order of enabling.
        if self.cursor_hidden {
            let _ = execute!(stdout, cursor::Show);
            self.cursor_hidden = false;
        }
        if self.mouse_enabled {
            let _ = execute!(stdout, event::DisableMouseCapture);
            self.mouse_enabled = false;
        }
        if self.alternate_screen_enabled {
            let _ = execute!(stdout, terminal::LeaveAlternateScreen);
            self.alternate_screen_enabled = false;
        }
        let _ = terminal::disable_raw_mode();
        let _ = stdout.flush();
        tracing::info!("terminal restored");
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.cleanup();
    }
}
