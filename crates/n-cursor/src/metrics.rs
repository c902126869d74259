//! Character metrics — byte lengths and display widths.
//!
//! A "character" here is what the cursor steps over: a base scalar value
//! plus any zero-width combining marks that follow it. `"e\u{301}"` is one
//! character of two scalar values and three bytes.
//!
//! Display widths follow how a terminal editor draws text:
//!
//! | Text                        | Drawn as     | Cells                 |
//! |-----------------------------|--------------|-----------------------|
//! | tab                         | blanks       | to the next tab stop  |
//! | tab with `list`             | `^I`         | 2                     |
//! | ASCII control, DEL          | `^X`, `^?`   | 2                     |
//! | C1 control (U+0080..U+009F) | `<80>`       | 4                     |
//! | wide (CJK, emoji)           | itself       | 2                     |
//! | anything else               | itself       | 1                     |
//!
//! A wide character that would start in the last column of a wrapped screen
//! row is pushed to the next row; the skipped cell counts as a leading
//! `head` cell of that character.

use unicode_width::UnicodeWidthChar;

use crate::options::DisplayConfig;

/// Cells taken by one character at a given screen column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellWidth {
    /// Total cells, including `head`.
    pub width: usize,
    /// Leading cells that are not part of the glyph (wrap padding).
    pub head: usize,
}

impl CellWidth {
    #[inline]
    #[must_use]
    pub const fn cells(width: usize) -> Self {
        Self { width, head: 0 }
    }
}

/// The character width and encoding contract used by the engine.
pub trait CharMetrics {
    /// Byte length of the character starting at `offset`, composing marks
    /// included. Returns 0 at or past the end of the line.
    fn char_len(&self, line: &str, offset: usize) -> usize;

    /// How many bytes `offset` lies past the first byte of its character.
    /// Returns 0 at or past the end of the line.
    fn head_offset(&self, line: &str, offset: usize) -> usize;

    /// Cells taken by `ch` when it is not a tab.
    fn char_cells(&self, ch: char) -> usize;

    /// True when `ch` is drawn as itself rather than as an escape.
    fn is_printable(&self, ch: char) -> bool;

    /// Cells taken by the character at `offset` when it starts at screen
    /// column `vcol`. Past the end of the line this is the single cell of
    /// the line terminator.
    fn cell_width(&self, line: &str, offset: usize, vcol: usize, display: &DisplayConfig) -> CellWidth {
        let Some(ch) = char_at(line, offset) else {
            return CellWidth::cells(1);
        };
        if ch == '\t' {
            if display.list {
                return CellWidth::cells(2);
            }
            let ts = display.tabstop.max(1);
            return CellWidth::cells(ts - vcol % ts);
        }
        let cells = self.char_cells(ch);
        if cells == 2 && !ch.is_ascii() && display.wrap && in_window_border(display.width, vcol) {
            CellWidth { width: 3, head: 1 }
        } else {
            CellWidth::cells(cells)
        }
    }
}

/// The first scalar value at `offset`, if `offset` is a char boundary
/// inside the line.
#[must_use]
pub fn char_at(line: &str, offset: usize) -> Option<char> {
    line.get(offset..).and_then(|rest| rest.chars().next())
}

/// True when a character starting at `vcol` would start in the last cell of
/// a screen row `width` columns wide.
#[must_use]
pub const fn in_window_border(width: usize, vcol: usize) -> bool {
    if width == 0 || vcol.saturating_add(1) < width {
        return false;
    }
    if vcol.saturating_add(1) == width {
        return true;
    }
    (vcol - width) % width == width - 1
}

// ---------------------------------------------------------------------------
// CellMetrics
// ---------------------------------------------------------------------------

/// Metrics for UTF-8 text backed by `unicode-width`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CellMetrics;

/// A zero-width mark that attaches to the preceding character.
fn is_composing(ch: char) -> bool {
    !ch.is_ascii() && !ch.is_control() && ch.width() == Some(0)
}

impl CharMetrics for CellMetrics {
    fn char_len(&self, line: &str, offset: usize) -> usize {
        if offset >= line.len() {
            return 0;
        }
        let Some(rest) = line.get(offset..) else {
            // Not on a char boundary: step a single byte.
            return 1;
        };
        let mut chars = rest.char_indices();
        let Some((_, base)) = chars.next() else {
            return 0;
        };
        let mut len = base.len_utf8();
        for (i, ch) in chars {
            if !is_composing(ch) {
                break;
            }
            len = i + ch.len_utf8();
        }
        len
    }

    fn head_offset(&self, line: &str, offset: usize) -> usize {
        if offset >= line.len() {
            return 0;
        }
        let mut start = floor_char_boundary(line, offset);
        while start > 0 && char_at(line, start).is_some_and(is_composing) {
            start = floor_char_boundary(line, start - 1);
        }
        offset - start
    }

    fn char_cells(&self, ch: char) -> usize {
        match ch {
            '\0'..='\u{1f}' | '\u{7f}' => 2,
            '\u{80}'..='\u{9f}' => 4,
            _ => ch.width().unwrap_or(1).max(1),
        }
    }

    fn is_printable(&self, ch: char) -> bool {
        !matches!(ch, '\0'..='\u{1f}' | '\u{7f}'..='\u{9f}')
    }
}

fn floor_char_boundary(line: &str, offset: usize) -> usize {
    let mut i = offset.min(line.len());
    while !line.is_char_boundary(i) {
        i -= 1;
    }
    i
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const M: CellMetrics = CellMetrics;

    fn cfg(tabstop: usize) -> DisplayConfig {
        DisplayConfig {
            tabstop,
            list: false,
            wrap: false,
            width: 80,
        }
    }

    // -- char_len -----------------------------------------------------------

    #[test]
    fn char_len_ascii_and_multibyte() {
        let line = "aé中";
        assert_eq!(M.char_len(line, 0), 1);
        assert_eq!(M.char_len(line, 1), 2);
        assert_eq!(M.char_len(line, 3), 3);
        assert_eq!(M.char_len(line, 6), 0);
    }

    #[test]
    fn char_len_includes_composing_marks() {
        let line = "e\u{301}\u{302}x";
        assert_eq!(M.char_len(line, 0), 5);
        assert_eq!(M.char_len(line, 5), 1);
    }

    #[test]
    fn char_len_inside_a_character_steps_one_byte() {
        assert_eq!(M.char_len("é", 1), 1);
    }

    // -- head_offset --------------------------------------------------------

    #[test]
    fn head_offset_on_trail_bytes() {
        let line = "a中b";
        assert_eq!(M.head_offset(line, 1), 0);
        assert_eq!(M.head_offset(line, 2), 1);
        assert_eq!(M.head_offset(line, 3), 2);
        assert_eq!(M.head_offset(line, 4), 0);
    }

    #[test]
    fn head_offset_walks_back_over_composing() {
        let line = "xe\u{301}";
        // The combining acute starts at byte 2 and belongs to 'e' at byte 1.
        assert_eq!(M.head_offset(line, 2), 1);
        assert_eq!(M.head_offset(line, 3), 2);
    }

    #[test]
    fn head_offset_at_line_end_is_zero() {
        assert_eq!(M.head_offset("中", 3), 0);
        assert_eq!(M.head_offset("", 0), 0);
    }

    // -- char_cells ---------------------------------------------------------

    #[test]
    fn cells_for_printable_and_escapes() {
        assert_eq!(M.char_cells('a'), 1);
        assert_eq!(M.char_cells('中'), 2);
        assert_eq!(M.char_cells('\u{1}'), 2);
        assert_eq!(M.char_cells('\u{7f}'), 2);
        assert_eq!(M.char_cells('\u{85}'), 4);
        assert!(M.is_printable('中'));
        assert!(!M.is_printable('\u{1b}'));
        assert!(!M.is_printable('\u{90}'));
    }

    // -- cell_width ---------------------------------------------------------

    #[test]
    fn tab_expands_to_next_stop() {
        let line = "\t";
        assert_eq!(M.cell_width(line, 0, 0, &cfg(8)).width, 8);
        assert_eq!(M.cell_width(line, 0, 3, &cfg(8)).width, 5);
        assert_eq!(M.cell_width(line, 0, 8, &cfg(8)).width, 8);
        assert_eq!(M.cell_width(line, 0, 5, &cfg(4)).width, 3);
    }

    #[test]
    fn tab_in_list_mode_is_caret_i() {
        let mut list = cfg(8);
        list.list = true;
        assert_eq!(M.cell_width("\t", 0, 3, &list), CellWidth::cells(2));
    }

    #[test]
    fn line_terminator_is_one_cell() {
        assert_eq!(M.cell_width("ab", 2, 2, &cfg(8)), CellWidth::cells(1));
    }

    #[test]
    fn wide_char_at_wrap_border_gets_head() {
        let display = DisplayConfig {
            tabstop: 8,
            list: false,
            wrap: true,
            width: 10,
        };
        assert_eq!(M.cell_width("中", 0, 8, &display), CellWidth::cells(2));
        assert_eq!(
            M.cell_width("中", 0, 9, &display),
            CellWidth { width: 3, head: 1 }
        );
        let nowrap = DisplayConfig {
            wrap: false,
            ..display
        };
        assert_eq!(M.cell_width("中", 0, 9, &nowrap), CellWidth::cells(2));
    }

    #[test]
    fn window_border_columns() {
        assert!(!in_window_border(0, 9));
        assert!(!in_window_border(10, 8));
        assert!(in_window_border(10, 9));
        assert!(!in_window_border(10, 10));
        assert!(in_window_border(10, 19));
        assert!(in_window_border(10, 29));
    }
}
