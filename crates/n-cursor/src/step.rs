//! Position stepping — one character forward or back, across lines.
//!
//! Unlike cursor motions these functions treat the line terminator as a
//! place of its own: stepping forward from the last character of a line
//! lands on the end-of-line slot (`col == len`), and only the next step
//! crosses to the following line. Searches and operators that walk the
//! buffer byte by byte rely on this.
//!
//! The `_skip` variants never leave a position resting on the terminator of
//! a non-empty line.

use crate::buffer::{LineStore, fetch_line};
use crate::metrics::CharMetrics;
use crate::position::Position;

/// Outcome of [`step_forward`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Forward {
    /// Moved to another character on the same line.
    SameLine,
    /// Moved to column 0 of the next line.
    NextLine,
    /// Moved onto the end-of-line slot of the same line.
    LineEnd,
    /// Already at the end of the last line; the position is unchanged.
    EndOfBuffer,
}

/// Outcome of [`step_backward`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backward {
    /// Moved to another character (or the slot) on the same line.
    SameLine,
    /// Moved to the end-of-line slot of the previous line.
    PreviousLine,
    /// Already at the first byte of the buffer; the position is unchanged.
    StartOfBuffer,
}

impl Forward {
    /// True unless the buffer end stopped the step.
    #[inline]
    #[must_use]
    pub const fn moved(self) -> bool {
        !matches!(self, Self::EndOfBuffer)
    }
}

impl Backward {
    /// True unless the buffer start stopped the step.
    #[inline]
    #[must_use]
    pub const fn moved(self) -> bool {
        !matches!(self, Self::StartOfBuffer)
    }
}

/// Step past the character at `pos`.
///
/// `coladd` is kept while the step stays on the line and cleared when it
/// crosses to the next one.
pub fn step_forward<S: LineStore + ?Sized>(store: &S, pos: &mut Position, metrics: &dyn CharMetrics) -> Forward {
    if !pos.is_line_end() {
        let line = fetch_line(store, pos.line);
        if pos.col < line.len() {
            pos.col += metrics.char_len(&line, pos.col).max(1);
            return if pos.col < line.len() {
                Forward::SameLine
            } else {
                Forward::LineEnd
            };
        }
    }
    if pos.line < store.line_count() {
        pos.line += 1;
        pos.col = 0;
        pos.coladd = 0;
        return Forward::NextLine;
    }
    Forward::EndOfBuffer
}

/// [`step_forward`], stepping once more if it landed on the terminator of
/// a non-empty line.
pub fn step_forward_skip<S: LineStore + ?Sized>(
    store: &S,
    pos: &mut Position,
    metrics: &dyn CharMetrics,
) -> Forward {
    let step = step_forward(store, pos, metrics);
    if matches!(step, Forward::NextLine | Forward::LineEnd) && pos.col != 0 {
        step_forward(store, pos, metrics)
    } else {
        step
    }
}

/// Step back to the previous character. `coladd` is always cleared.
///
/// From column 0 this moves onto the end-of-line slot of the previous line.
/// A `MAXCOL` column resolves to the end-of-line slot of the same line.
pub fn step_backward<S: LineStore + ?Sized>(store: &S, pos: &mut Position, metrics: &dyn CharMetrics) -> Backward {
    pos.coladd = 0;
    if pos.is_line_end() {
        pos.col = fetch_line(store, pos.line).len();
        return Backward::SameLine;
    }
    if pos.col > 0 {
        let line = fetch_line(store, pos.line);
        pos.col = (pos.col - 1).min(line.len());
        pos.col -= metrics.head_offset(&line, pos.col);
        return Backward::SameLine;
    }
    if pos.line > 1 {
        pos.line -= 1;
        pos.col = fetch_line(store, pos.line).len();
        return Backward::PreviousLine;
    }
    Backward::StartOfBuffer
}

/// [`step_backward`], stepping once more if it crossed onto the terminator
/// of a non-empty line.
pub fn step_backward_skip<S: LineStore + ?Sized>(
    store: &S,
    pos: &mut Position,
    metrics: &dyn CharMetrics,
) -> Backward {
    let step = step_backward(store, pos, metrics);
    if step == Backward::PreviousLine && pos.col != 0 {
        step_backward(store, pos, metrics)
    } else {
        step
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
