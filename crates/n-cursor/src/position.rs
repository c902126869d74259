//! Buffer positions and column targets.
//!
//! Lines are **1-indexed** (line 1 is the first line of the buffer) and
//! columns are **byte offsets** into the line's text, excluding its line
//! ending. A byte offset always points at the first byte of a character once
//! an operation of this crate returns.
//!
//! `coladd` is the number of extra screen columns past the character at
//! `col`. It is only non-zero while virtual editing is active: the cursor
//! then rests beyond the last character (`col == len`, `coladd` = remaining
//! distance) or on a later cell of a tab.

use std::fmt;

/// Byte offset meaning "the end of the line, whatever that resolves to".
///
/// Only ever stored in [`Position::col`] by callers that want the cursor at
/// the line end (`$`). Column targets use [`TargetColumn::EndOfLine`] instead.
pub const MAXCOL: usize = usize::MAX;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A position in a buffer: 1-indexed line, byte column and virtual offset.
///
/// # Ordering
///
/// Positions order by line, then byte column, then `coladd`, so two cursors
/// on the same tab are ordered by the screen cell they occupy.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub col: usize,
    pub coladd: usize,
}

impl Position {
    /// The first byte of the first line.
    pub const START: Self = Self {
        line: 1,
        col: 0,
        coladd: 0,
    };

    /// Create a position without virtual offset.
    #[inline]
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            coladd: 0,
        }
    }

    /// Create a position with a virtual offset.
    #[inline]
    #[must_use]
    pub const fn with_coladd(line: usize, col: usize, coladd: usize) -> Self {
        Self { line, col, coladd }
    }

    /// A position parked at the end of `line` (`col == MAXCOL`).
    #[inline]
    #[must_use]
    pub const fn line_end(line: usize) -> Self {
        Self {
            line,
            col: MAXCOL,
            coladd: 0,
        }
    }

    /// True when the column is the end-of-line marker.
    #[inline]
    #[must_use]
    pub const fn is_line_end(self) -> bool {
        self.col == MAXCOL
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl Ord for Position {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.line
            .cmp(&other.line)
            .then(self.col.cmp(&other.col))
            .then(self.coladd.cmp(&other.coladd))
    }
}

impl PartialOrd for Position {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.col == MAXCOL {
            write!(f, "Pos({}:$)", self.line)
        } else if self.coladd == 0 {
            write!(f, "Pos({}:{})", self.line, self.col)
        } else {
            write!(f, "Pos({}:{}+{})", self.line, self.col, self.coladd)
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Line is already 1-indexed; the byte column is shown 1-indexed too,
        // matching the `line:col` ruler.
        if self.col == MAXCOL {
            write!(f, "{}:$", self.line)
        } else if self.coladd == 0 {
            write!(f, "{}:{}", self.line, self.col + 1)
        } else {
            write!(f, "{}:{}-{}", self.line, self.col + 1, self.col + 1 + self.coladd)
        }
    }
}

// ---------------------------------------------------------------------------
// TargetColumn
// ---------------------------------------------------------------------------

/// A screen column to move the cursor to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetColumn {
    /// A 0-indexed screen column, irrespective of horizontal scroll.
    Column(usize),
    /// The end of the line; where that lands depends on the mode.
    EndOfLine,
}

impl TargetColumn {
    /// The requested column, or `None` for the end of line.
    #[inline]
    #[must_use]
    pub const fn column(self) -> Option<usize> {
        match self {
            Self::Column(col) => Some(col),
            Self::EndOfLine => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_end_of_line(self) -> bool {
        matches!(self, Self::EndOfLine)
    }
}

impl From<usize> for TargetColumn {
    fn from(col: usize) -> Self {
        if col == MAXCOL {
            Self::EndOfLine
        } else {
            Self::Column(col)
        }
    }
}

impl fmt::Display for TargetColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(col) => write!(f, "{col}"),
            Self::EndOfLine => f.write_str("$"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Construction -------------------------------------------------------

    #[test]
    fn start_is_first_line() {
        let p = Position::START;
        assert_eq!(p.line, 1);
        assert_eq!(p.col, 0);
        assert_eq!(p.coladd, 0);
        assert_eq!(Position::default(), p);
    }

    #[test]
    fn line_end_marker() {
        let p = Position::line_end(4);
        assert!(p.is_line_end());
        assert!(!Position::new(4, 3).is_line_end());
    }

    // -- Ordering -----------------------------------------------------------

    #[test]
    fn ordering_line_then_col_then_coladd() {
        let positions = [
            Position::new(1, 0),
            Position::new(1, 3),
            Position::with_coladd(1, 3, 2),
            Position::new(1, 4),
            Position::new(2, 0),
        ];
        for pair in positions.windows(2) {
            assert!(pair[0] < pair[1], "{:?} should be < {:?}", pair[0], pair[1]);
        }
    }

    // -- Formatting ---------------------------------------------------------

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", Position::new(2, 5)), "Pos(2:5)");
        assert_eq!(format!("{:?}", Position::with_coladd(2, 5, 3)), "Pos(2:5+3)");
        assert_eq!(format!("{:?}", Position::line_end(7)), "Pos(7:$)");
    }

    #[test]
    fn display_format() {
        assert_eq!(format!("{}", Position::new(1, 0)), "1:1");
        assert_eq!(format!("{}", Position::with_coladd(3, 4, 2)), "3:5-7");
        assert_eq!(format!("{}", Position::line_end(9)), "9:$");
    }

    // -- TargetColumn -------------------------------------------------------

    #[test]
    fn target_from_maxcol_is_end_of_line() {
        assert_eq!(TargetColumn::from(MAXCOL), TargetColumn::EndOfLine);
        assert_eq!(TargetColumn::from(12), TargetColumn::Column(12));
    }

    #[test]
    fn target_accessors() {
        assert_eq!(TargetColumn::Column(3).column(), Some(3));
        assert_eq!(TargetColumn::EndOfLine.column(), None);
        assert!(TargetColumn::EndOfLine.is_end_of_line());
        assert_eq!(TargetColumn::EndOfLine.to_string(), "$");
        assert_eq!(TargetColumn::Column(8).to_string(), "8");
    }
}
