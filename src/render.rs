//! Line renderer with in-place and append-only surfaces.
//!
//! Each repository owns one line ("slot"), addressed by its index. In-place
//! mode reserves all slots up front and rewrites any of them at any time using
//! absolute cursor addressing, so results can arrive in any order. Append mode
//! writes plain lines strictly in index order and never emits escape
//! sequences, which is what pipes and files need.
//!
//! The renderer is owned by a single writer. Every escape sequence of one
//! `draw` is queued and flushed together, so two draws can never interleave.

use crossterm::{
    cursor::{MoveTo, RestorePosition, SavePosition},
    queue,
    style::Print,
    terminal::{Clear, ClearType, DisableLineWrap, EnableLineWrap},
};
use std::io::{self, Write};

use crate::terminal::TerminalOrigin;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Surface {
    Append,
    /// `first_row` is only meaningful after `initialize`.
    InPlace {
        origin: TerminalOrigin,
        first_row: u16,
    },
}

pub struct LineRenderer<W: Write> {
    out: W,
    surface: Surface,
    /// Last text drawn (or queued, in append mode) per slot.
    slots: Vec<Option<String>>,
    /// Append mode: index of the next slot to be written.
    next_line: usize,
}

impl<W: Write> LineRenderer<W> {
    /// Renderer that writes each line once, in index order.
    pub fn append(out: W) -> Self {
        Self {
            out,
            surface: Surface::Append,
            slots: Vec::new(),
            next_line: 0,
        }
    }

    /// Renderer that rewrites lines in place below `origin`.
    pub fn in_place(out: W, origin: TerminalOrigin) -> Self {
        Self {
            out,
            surface: Surface::InPlace {
                origin,
                first_row: origin.row,
            },
            slots: Vec::new(),
            next_line: 0,
        }
    }

    #[must_use]
    pub fn is_in_place(&self) -> bool {
        matches!(self.surface, Surface::InPlace { .. })
    }

    /// Current content of every slot; `None` for slots not drawn yet.
    #[must_use]
    pub fn lines(&self) -> &[Option<String>] {
        &self.slots
    }

    /// Fixes the slot count. In-place mode reserves `count` blank lines on screen.
    pub fn initialize(&mut self, count: usize) -> io::Result<()> {
        self.slots = vec![None; count];
        self.next_line = 0;

        let Surface::InPlace { origin, .. } = self.surface else {
            return Ok(());
        };

        // Lines taller than the screen cannot all be addressed.
        let Some(rows) = u16::try_from(count).ok().filter(|&rows| rows < origin.height) else {
            log::debug!(
                "{} lines do not fit a {}-row terminal; appending instead",
                count,
                origin.height
            );
            self.surface = Surface::Append;
            return Ok(());
        };

        for _ in 0..count {
            writeln!(self.out)?;
        }
        self.out.flush()?;

        // Reserving lines near the bottom scrolls the screen; the cursor stops
        // at the last row.
        let cursor_row = origin.row.saturating_add(rows).min(origin.height - 1);
        self.surface = Surface::InPlace {
            origin,
            first_row: cursor_row - rows,
        };
        Ok(())
    }

    /// Sets the text of slot `index`.
    pub fn draw(&mut self, index: usize, text: &str) -> io::Result<()> {
        let Some(slot) = self.slots.get(index) else {
            log::debug!("Ignoring draw for slot {} of {}", index, self.slots.len());
            return Ok(());
        };

        match self.surface {
            Surface::Append => {
                // Each line is written at most once.
                if slot.is_some() {
                    return Ok(());
                }
                self.slots[index] = Some(text.to_string());
                self.write_ready_lines()
            }
            Surface::InPlace { first_row, .. } => {
                if slot.as_deref() == Some(text) {
                    return Ok(());
                }
                // initialize() guarantees every slot index fits in u16.
                let row = first_row + index as u16;
                let written = queue!(
                    self.out,
                    SavePosition,
                    MoveTo(0, row),
                    Clear(ClearType::CurrentLine),
                    DisableLineWrap,
                    Print(text),
                    EnableLineWrap,
                    RestorePosition,
                )
                .and_then(|()| self.out.flush());
                if let Err(e) = written {
                    // Autowrap may have been switched off mid-sequence.
                    let _ = queue!(self.out, EnableLineWrap, RestorePosition)
                        .and_then(|()| self.out.flush());
                    return Err(e);
                }
                self.slots[index] = Some(text.to_string());
                Ok(())
            }
        }
    }

    /// Writes the contiguous run of slots that is ready, starting at `next_line`.
    fn write_ready_lines(&mut self) -> io::Result<()> {
        while let Some(Some(text)) = self.slots.get(self.next_line) {
            writeln!(self.out, "{}", text)?;
            self.next_line += 1;
        }
        self.out.flush()
    }

    /// Leaves the cursor below the last line and hands back the output stream.
    pub fn finalize(mut self) -> io::Result<W> {
        match self.surface {
            Surface::Append => {
                if self.next_line < self.slots.len() {
                    log::debug!(
                        "Finalizing with {} of {} lines written",
                        self.next_line,
                        self.slots.len()
                    );
                }
                // Never leave a result unprinted because an earlier slot is missing.
                for text in self.slots.iter().skip(self.next_line).flatten() {
                    writeln!(self.out, "{}", text)?;
                }
            }
            Surface::InPlace { first_row, .. } => {
                let below = first_row + self.slots.len() as u16;
                queue!(self.out, EnableLineWrap, MoveTo(0, below))?;
            }
        }
        self.out.flush()?;
        Ok(self.out)
    }
}
