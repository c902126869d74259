//! Virtual columns — where a byte position is drawn on screen.
//!
//! Every function here scans the line from its first byte, adding up cell
//! widths until it reaches the character at the position. Nothing is cached
//! and nothing is mutated, so the answer only depends on the line text and
//! the [`Context`].
//!
//! Columns are 0-indexed screen cells counted from the start of the line,
//! ignoring horizontal scroll. A position at or past the end of the line
//! measures the one-cell line terminator.

use tracing::trace;

use crate::buffer::{LineStore, fetch_line};
use crate::context::Context;
use crate::metrics::{CellWidth, char_at};
use crate::mode::Selection;
use crate::position::Position;

/// Screen columns covered by the character under a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualSpan {
    /// First cell of the glyph.
    pub start: usize,
    /// Cell where the cursor is drawn. The last cell of a tab in Normal
    /// mode, otherwise `start`.
    pub cursor: usize,
    /// Last cell of the character.
    pub end: usize,
}

/// Where a scan stopped: the column the character starts at, its byte
/// offset and its width.
struct Stop {
    vcol: usize,
    offset: usize,
    cell: CellWidth,
}

/// Scan `line` until the character containing byte `target`, or to the
/// terminator when `target` is `None`.
fn scan(line: &str, target: Option<usize>, ctx: &Context<'_>) -> Stop {
    let metrics = ctx.metrics;
    let mut vcol = 0;
    let mut offset = 0;
    loop {
        if offset >= line.len() {
            return Stop {
                vcol,
                offset: line.len(),
                cell: CellWidth::cells(1),
            };
        }
        let cell = metrics.cell_width(line, offset, vcol, &ctx.display);
        if target.is_some_and(|t| offset >= t) {
            return Stop { vcol, offset, cell };
        }
        vcol = vcol.saturating_add(cell.width);
        offset += metrics.char_len(line, offset).max(1);
    }
}

/// [`visual_span`] over a line that has already been fetched.
#[must_use]
pub fn span_in_line(line: &str, pos: Position, ctx: &Context<'_>) -> VisualSpan {
    let target = if pos.is_line_end() {
        None
    } else {
        Some(pos.col - ctx.metrics.head_offset(line, pos.col))
    };
    let stop = scan(line, target, ctx);
    let start = stop.vcol.saturating_add(stop.cell.head);
    let end = stop.vcol.saturating_add(stop.cell.width - 1);

    let edit = &ctx.edit;
    let before_selection = edit
        .visual_start
        .is_some_and(|v| (pos.line, pos.col) <= (v.line, v.col));
    let on_tab_end = char_at(line, stop.offset) == Some('\t')
        && edit.mode.is_normal_like()
        && !ctx.display.list
        && !edit.virtual_active()
        && !(edit.visual_active()
            && (matches!(edit.selection, Selection::Exclusive) || before_selection));

    VisualSpan {
        start,
        cursor: if on_tab_end { end } else { start },
        end,
    }
}

/// Columns of the character at `pos`, ignoring `coladd`.
///
/// With `pos.col == MAXCOL` this measures the line terminator.
#[must_use]
pub fn visual_span<S: LineStore + ?Sized>(store: &S, pos: Position, ctx: &Context<'_>) -> VisualSpan {
    let line = fetch_line(store, pos.line);
    span_in_line(&line, pos, ctx)
}

/// Like [`visual_span`], but counts `coladd` when virtual editing is active.
///
/// On a printable double-width character `coladd` only moves the cursor
/// when it points past the glyph; a cursor on the right half is drawn on
/// the left half.
#[must_use]
pub fn virtual_span<S: LineStore + ?Sized>(store: &S, pos: Position, ctx: &Context<'_>) -> VisualSpan {
    let line = fetch_line(store, pos.line);
    virtual_span_in_line(&line, pos, ctx)
}

fn virtual_span_in_line(line: &str, pos: Position, ctx: &Context<'_>) -> VisualSpan {
    let span = span_in_line(line, pos, ctx);
    if !ctx.edit.virtual_active() {
        return span;
    }

    let mut coladd = pos.coladd;
    let mut endadd = 0;
    if let Some(ch) = char_at(line, pos.col).filter(|&ch| ch != '\t') {
        if ctx.metrics.is_printable(ch) {
            endadd = ctx.metrics.char_cells(ch) - 1;
            if coladd > endadd {
                endadd = 0;
            } else {
                coladd = 0;
            }
        }
    }

    let col = span.start.saturating_add(coladd);
    let end = if endadd > 0 { col.saturating_add(endadd) } else { span.end.max(col) };
    VisualSpan {
        start: col,
        cursor: col,
        end,
    }
}

/// The screen column of `pos`, `coladd` included.
#[must_use]
pub fn visual_column<S: LineStore + ?Sized>(store: &S, pos: Position, ctx: &Context<'_>) -> usize {
    virtual_span(store, pos, ctx).start
}

/// Leftmost and rightmost screen columns covered by two positions, in any
/// order. With `selection=exclusive` the character at the later position is
/// left out.
#[must_use]
pub fn span_between<S: LineStore + ?Sized>(
    store: &S,
    a: Position,
    b: Position,
    ctx: &Context<'_>,
) -> (usize, usize) {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    let one = virtual_span(store, first, ctx);
    let two = virtual_span(store, second, ctx);

    let left = one.start.min(two.start);
    let right = if two.end > one.end {
        if matches!(ctx.edit.selection, Selection::Exclusive) && two.start > one.end {
            two.start - 1
        } else {
            two.end
        }
    } else {
        one.end
    };
    trace!(%first, %second, left, right, "span between positions");
    (left, right)
}

/// Display width of a whole line.
#[must_use]
pub fn line_width(line: &str, ctx: &Context<'_>) -> usize {
    scan(line, None, ctx).vcol
}

/// The cursor column of `pos` as if `list` were off.
#[must_use]
pub fn cursor_column_nolist<S: LineStore + ?Sized>(store: &S, pos: Position, ctx: &Context<'_>) -> usize {
    let ctx = ctx.nolist();
    if pos.coladd > 0 {
        virtual_span(store, pos, &ctx).cursor
    } else {
        visual_span(store, pos, &ctx).cursor
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::{EditState, Mode, VirtualEdit, VisualKind};
    use crate::options::DisplayConfig;
    use pretty_assertions::assert_eq;

    fn ctx(mode: Mode) -> Context<'static> {
        Context::new(DisplayConfig::default(), EditState::new(mode))
    }

    fn span(start: usize, cursor: usize, end: usize) -> VisualSpan {
        VisualSpan { start, cursor, end }
    }

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(ToString::to_string).collect()
    }

    // -- visual_span --------------------------------------------------------

    #[test]
    fn plain_ascii() {
        let c = ctx(Mode::Normal);
        assert_eq!(span_in_line("hello", Position::new(1, 0), &c), span(0, 0, 0));
        assert_eq!(span_in_line("hello", Position::new(1, 4), &c), span(4, 4, 4));
    }

    #[test]
    fn tab_cursor_sits_on_last_cell_in_normal_mode() {
        let c = ctx(Mode::Normal);
        assert_eq!(span_in_line("a\tb", Position::new(1, 1), &c), span(1, 7, 7));
        assert_eq!(span_in_line("a\tb", Position::new(1, 2), &c), span(8, 8, 8));
    }

    #[test]
    fn tab_cursor_sits_on_first_cell_in_insert_mode() {
        let c = ctx(Mode::Insert);
        assert_eq!(span_in_line("a\tb", Position::new(1, 1), &c), span(1, 1, 7));
    }

    #[test]
    fn tab_in_list_mode_is_two_cells() {
        let mut c = ctx(Mode::Normal);
        c.display.list = true;
        assert_eq!(span_in_line("a\tb", Position::new(1, 1), &c), span(1, 1, 2));
        assert_eq!(span_in_line("a\tb", Position::new(1, 2), &c), span(3, 3, 3));
    }

    #[test]
    fn tab_with_virtual_editing_keeps_cursor_at_start() {
        let mut c = ctx(Mode::Normal);
        c.edit.virtualedit = VirtualEdit::ALL;
        assert_eq!(span_in_line("\tx", Position::new(1, 0), &c), span(0, 0, 7));
    }

    #[test]
    fn tab_at_visual_start_keeps_cursor_at_start() {
        let mut c = ctx(Mode::Visual(VisualKind::Char));
        c.edit.visual_start = Some(Position::new(1, 0));
        assert_eq!(span_in_line("\tx", Position::new(1, 0), &c), span(0, 0, 7));

        c.edit.visual_start = None;
        assert_eq!(span_in_line("\tx", Position::new(1, 0), &c), span(0, 7, 7));

        c.edit.selection = Selection::Exclusive;
        assert_eq!(span_in_line("\tx", Position::new(1, 0), &c), span(0, 0, 7));
    }

    #[test]
    fn multibyte_position_realigned_to_head() {
        let c = ctx(Mode::Normal);
        // "a中b": '中' covers bytes 1..4 and cells 1..=2.
        for col in 1..4 {
            assert_eq!(span_in_line("a中b", Position::new(1, col), &c), span(1, 1, 2));
        }
        assert_eq!(span_in_line("a中b", Position::new(1, 4), &c), span(3, 3, 3));
    }

    #[test]
    fn past_end_measures_terminator() {
        let c = ctx(Mode::Normal);
        assert_eq!(span_in_line("ab", Position::new(1, 2), &c), span(2, 2, 2));
        assert_eq!(span_in_line("ab", Position::new(1, 9), &c), span(2, 2, 2));
        assert_eq!(span_in_line("a\t", Position::line_end(1), &c), span(8, 8, 8));
        assert_eq!(span_in_line("", Position::new(1, 0), &c), span(0, 0, 0));
    }

    #[test]
    fn wide_char_at_border_has_head_cell() {
        let mut c = ctx(Mode::Normal);
        c.display.width = 4;
        // "abc中": '中' would start in the last cell of the first row.
        assert_eq!(span_in_line("abc中", Position::new(1, 3), &c), span(4, 4, 5));
        c.display.wrap = false;
        assert_eq!(span_in_line("abc中", Position::new(1, 3), &c), span(3, 3, 4));
    }

    #[test]
    fn control_chars_are_escaped() {
        let c = ctx(Mode::Normal);
        assert_eq!(span_in_line("\u{1}x", Position::new(1, 1), &c), span(2, 2, 2));
        assert_eq!(span_in_line("\u{85}x", Position::new(1, 2), &c), span(4, 4, 4));
    }

    #[test]
    fn missing_line_reads_as_empty() {
        let store = lines(&["abc"]);
        assert_eq!(visual_span(&store, Position::new(5, 2), &ctx(Mode::Normal)), span(0, 0, 0));
    }

    // -- virtual_span -------------------------------------------------------

    #[test]
    fn virtual_span_ignores_coladd_without_virtualedit() {
        let store = lines(&["ab"]);
        let c = ctx(Mode::Normal);
        assert_eq!(virtual_span(&store, Position::with_coladd(1, 2, 3), &c), span(2, 2, 2));
    }

    #[test]
    fn virtual_span_adds_coladd_past_end() {
        let store = lines(&["ab"]);
        let mut c = ctx(Mode::Normal);
        c.edit.virtualedit = VirtualEdit::ALL;
        assert_eq!(virtual_span(&store, Position::with_coladd(1, 2, 3), &c), span(5, 5, 5));
        assert_eq!(visual_column(&store, Position::with_coladd(1, 2, 3), &c), 5);
    }

    #[test]
    fn virtual_span_inside_tab() {
        let store = lines(&["\tx"]);
        let mut c = ctx(Mode::Normal);
        c.edit.virtualedit = VirtualEdit::ALL;
        assert_eq!(virtual_span(&store, Position::with_coladd(1, 0, 3), &c), span(3, 3, 7));
    }

    #[test]
    fn virtual_span_on_wide_char() {
        let store = lines(&["中x"]);
        let mut c = ctx(Mode::Normal);
        c.edit.virtualedit = VirtualEdit::ALL;
        // Right half collapses onto the glyph.
        assert_eq!(virtual_span(&store, Position::with_coladd(1, 0, 1), &c), span(0, 0, 1));
        // Past the glyph moves the cursor.
        assert_eq!(virtual_span(&store, Position::with_coladd(1, 0, 3), &c), span(3, 3, 3));
    }

    // -- span_between -------------------------------------------------------

    #[test]
    fn span_between_orders_positions() {
        let store = lines(&["a\tbc"]);
        let c = ctx(Mode::Visual(VisualKind::Block));
        let a = Position::new(1, 3);
        let b = Position::new(1, 1);
        assert_eq!(span_between(&store, a, b, &c), (1, 9));
        assert_eq!(span_between(&store, b, a, &c), (1, 9));
    }

    #[test]
    fn span_between_exclusive_drops_last_char() {
        let store = lines(&["abcdef"]);
        let mut c = ctx(Mode::Visual(VisualKind::Block));
        c.edit.selection = Selection::Exclusive;
        assert_eq!(
            span_between(&store, Position::new(1, 1), Position::new(1, 4), &c),
            (1, 3)
        );
    }

    #[test]
    fn span_between_across_lines() {
        let store = lines(&["abcdef", "ab"]);
        let c = ctx(Mode::Visual(VisualKind::Block));
        assert_eq!(
            span_between(&store, Position::new(1, 4), Position::new(2, 1), &c),
            (1, 4)
        );
    }

    // -- line_width / nolist ------------------------------------------------

    #[test]
    fn line_width_expands_tabs_and_wide_chars() {
        let c = ctx(Mode::Normal);
        assert_eq!(line_width("", &c), 0);
        assert_eq!(line_width("ab", &c), 2);
        assert_eq!(line_width("a\tb", &c), 9);
        assert_eq!(line_width("中文", &c), 4);
        assert_eq!(line_width("e\u{301}", &c), 1);
    }

    #[test]
    fn huge_tabstop_saturates() {
        let mut c = ctx(Mode::Insert);
        c.display.tabstop = usize::MAX;
        assert_eq!(line_width("\t\t", &c), usize::MAX);
        assert_eq!(span_in_line("\t\t", Position::new(1, 1), &c), span(usize::MAX, usize::MAX, usize::MAX));
    }

    #[test]
    fn cursor_column_nolist_expands_tabs() {
        let store = lines(&["\tx"]);
        let mut c = ctx(Mode::Normal);
        c.display.list = true;
        assert_eq!(visual_span(&store, Position::new(1, 1), &c).cursor, 2);
        assert_eq!(cursor_column_nolist(&store, Position::new(1, 1), &c), 8);
        assert_eq!(cursor_column_nolist(&store, Position::new(1, 0), &c), 7);
    }
}
