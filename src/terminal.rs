//! Terminal capability probing.
//!
//! Decides whether stdout can host in-place rendering and, if so, where the
//! cursor currently sits.

use crossterm::{
    cursor::MoveTo,
    queue,
    terminal::{Clear, ClearType},
};
use std::io::{self, IsTerminal, Write};

/// Cursor row and screen height captured before rendering starts.
///
/// Rows are zero-based, matching crossterm's `MoveTo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalOrigin {
    pub row: u16,
    pub height: u16,
}

/// The terminal could not tell us where the cursor is.
#[derive(Debug)]
pub enum ProbeError {
    NotATerminal,
    /// The cursor-position query failed or timed out.
    Query(io::Error),
}

impl std::fmt::Display for ProbeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeError::NotATerminal => write!(f, "stdout is not a terminal"),
            ProbeError::Query(e) => write!(f, "cursor position query failed: {}", e),
        }
    }
}

impl std::error::Error for ProbeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProbeError::NotATerminal => None,
            ProbeError::Query(e) => Some(e),
        }
    }
}

pub trait TerminalProbe {
    fn is_interactive(&self) -> bool;

    fn origin(&self) -> Result<TerminalOrigin, ProbeError>;
}

/// Probes the process's real stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stdout;

impl TerminalProbe for Stdout {
    fn is_interactive(&self) -> bool {
        std::io::stdout().is_terminal()
    }

    fn origin(&self) -> Result<TerminalOrigin, ProbeError> {
        if !self.is_interactive() {
            return Err(ProbeError::NotATerminal);
        }
        // crossterm bounds the position query with its own short timeout.
        let (_, row) = crossterm::cursor::position().map_err(ProbeError::Query)?;
        let (_, height) = crossterm::terminal::size().map_err(ProbeError::Query)?;
        Ok(TerminalOrigin { row, height })
    }
}

/// Wipes the screen and homes the cursor, so the next probe reports row 0.
pub fn clear_screen<W: Write>(out: &mut W) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    out.flush()
}

/// A probe with fixed answers, for driving the renderer without a terminal.
#[derive(Debug, Clone, Copy)]
pub struct FixedProbe {
    pub interactive: bool,
    pub origin: Option<TerminalOrigin>,
}

impl TerminalProbe for FixedProbe {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn origin(&self) -> Result<TerminalOrigin, ProbeError> {
        self.origin.ok_or_else(|| {
            ProbeError::Query(io::Error::new(
                io::ErrorKind::TimedOut,
                "no answer",
            ))
        })
    }
}
