//! Cursor bounds — pulling a position back onto valid text.
//!
//! Run after anything that may have left a position stale: a line got
//! shorter, lines were deleted, the mode changed from Insert to Normal. The
//! rules mirror where the cursor may rest in each mode:
//!
//! - On an empty line the column is 0.
//! - Past the end, the column is the end-of-line slot if the mode allows
//!   resting there (see [`EditState::past_end_allowed`]), otherwise the
//!   head byte of the last character.
//! - With `virtualedit=all` the screen column is kept by moving the lost
//!   distance into `coladd`.
//!
//! [`EditState::past_end_allowed`]: crate::mode::EditState::past_end_allowed

use tracing::trace;

use crate::buffer::{LineStore, fetch_line};
use crate::context::Context;
use crate::metrics::char_at;
use crate::mode::VirtualEdit;
use crate::position::{MAXCOL, Position};
use crate::vcol::span_in_line;

/// Keep `pos.line` within `1..=line_count`.
pub fn clamp_line<S: LineStore + ?Sized>(store: &S, pos: &mut Position) {
    let count = store.line_count().max(1);
    if pos.line > count {
        trace!(line = pos.line, count, "line clamped to last line");
        pos.line = count;
    } else if pos.line == 0 {
        pos.line = 1;
    }
}

/// Keep `pos.col` on line `pos.line`, recomputing `coladd`.
pub fn clamp_column<S: LineStore + ?Sized>(store: &S, pos: &mut Position, ctx: &Context<'_>) {
    let line = fetch_line(store, pos.line);
    clamp_to_line(&line, pos, ctx);
}

/// Keep the whole position valid: line first, then column.
pub fn clamp_position<S: LineStore + ?Sized>(store: &S, pos: &mut Position, ctx: &Context<'_>) {
    clamp_line(store, pos);
    clamp_column(store, pos, ctx);
}

/// Clamp `pos` to `line`, the text of `pos.line`.
pub fn clamp_to_line(line: &str, pos: &mut Position, ctx: &Context<'_>) {
    let len = line.len();
    let old_col = pos.col;
    let old_vcol = pos.col.saturating_add(pos.coladd);

    if len == 0 {
        pos.col = 0;
    } else if pos.col >= len {
        if ctx.edit.past_end_allowed() {
            pos.col = len;
        } else {
            pos.col = len - 1;
            adjust_head_in_line(line, pos, ctx);
        }
    }

    if old_col == MAXCOL {
        pos.coladd = 0;
    } else if ctx.edit.virtualedit.contains(VirtualEdit::ALL) {
        if old_vcol > pos.col {
            pos.coladd = old_vcol - pos.col;
            // Only the last character may carry more than its own width.
            if pos.col + 1 < len {
                let span = span_in_line(line, *pos, ctx);
                pos.coladd = pos.coladd.min(span.end - span.start);
            }
        } else {
            pos.coladd = 0;
        }
    } else if !ctx.edit.virtual_active() {
        pos.coladd = 0;
    }

    if pos.col != old_col {
        trace!(line = pos.line, from = old_col, to = pos.col, "column clamped");
    }
}

/// Step off the end-of-line slot onto the last character, unless a
/// selection that includes the slot is active.
pub fn leave_line_end<S: LineStore + ?Sized>(store: &S, pos: &mut Position, ctx: &Context<'_>) {
    let line = fetch_line(store, pos.line);
    if pos.col > 0 && !ctx.edit.selection_past_end() && pos.col >= line.len() {
        pos.col = line.len().saturating_sub(1);
    }
    adjust_head_in_line(&line, pos, ctx);
}

/// Move a byte column that points into a character back to its first byte.
///
/// A `coladd` of 1 on a double-width character names its right half, which
/// is drawn as the character itself, so it is reset to 0.
pub fn adjust_to_char_head<S: LineStore + ?Sized>(store: &S, pos: &mut Position, ctx: &Context<'_>) {
    let line = fetch_line(store, pos.line);
    adjust_head_in_line(&line, pos, ctx);
}

pub(crate) fn adjust_head_in_line(line: &str, pos: &mut Position, ctx: &Context<'_>) {
    if pos.col == 0 && pos.coladd <= 1 {
        return;
    }
    let metrics = ctx.metrics;
    if line.is_empty() || line.len() < pos.col {
        pos.col = 0;
    } else {
        pos.col -= metrics.head_offset(line, pos.col);
    }
    let on_wide = char_at(line, pos.col)
        .is_some_and(|ch| ch != '\t' && metrics.is_printable(ch) && metrics.char_cells(ch) > 1);
    if pos.coladd == 1 && on_wide {
        pos.coladd = 0;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
