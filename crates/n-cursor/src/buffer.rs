//! Line storage — the text the cursor moves over.
//!
//! The engine only needs four things from storage, captured by the
//! [`LineStore`] trait: the line count, one line's text, replacing one
//! line's text, and a notification that bytes in a line changed. Lines are
//! 1-indexed and handed out **without** their line ending.
//!
//! [`Buffer`] is the rope-backed implementation used by the binary. A plain
//! `Vec<String>` also implements the trait, which keeps tests small.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ropey::{Rope, RopeSlice};
use tracing::warn;

use crate::error::ColumnError;

// ---------------------------------------------------------------------------
// LineStore
// ---------------------------------------------------------------------------

/// Access to the lines of a buffer.
pub trait LineStore {
    /// Number of lines; at least 1 for any buffer.
    fn line_count(&self) -> usize;

    /// Text of line `lnum` (1-indexed) without its line ending, or `None`
    /// when the line does not exist.
    fn line(&self, lnum: usize) -> Option<Cow<'_, str>>;

    /// Replace the text of line `lnum`. Ownership of `text` moves to the
    /// store; the old text is dropped.
    ///
    /// # Errors
    ///
    /// [`ColumnError::MissingLine`] when `lnum` is out of range.
    fn replace_line(&mut self, lnum: usize, text: String) -> Result<(), ColumnError>;

    /// Bytes of line `lnum` from `col` on have changed. Stores that keep
    /// redraw or undo bookkeeping override this.
    fn changed_bytes(&mut self, _lnum: usize, _col: usize) {}
}

/// Fetch a line, treating a missing one as empty.
pub(crate) fn fetch_line<S: LineStore + ?Sized>(store: &S, lnum: usize) -> Cow<'_, str> {
    store.line(lnum).unwrap_or_else(|| {
        warn!(line = lnum, "position refers to a missing line");
        Cow::Borrowed("")
    })
}

impl LineStore for Vec<String> {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line(&self, lnum: usize) -> Option<Cow<'_, str>> {
        let idx = lnum.checked_sub(1)?;
        self.get(idx).map(|s| Cow::Borrowed(s.as_str()))
    }

    fn replace_line(&mut self, lnum: usize, text: String) -> Result<(), ColumnError> {
        let slot = lnum
            .checked_sub(1)
            .and_then(|idx| self.get_mut(idx))
            .ok_or(ColumnError::MissingLine { line: lnum })?;
        *slot = text;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Buffer
// ---------------------------------------------------------------------------

/// The first changed byte of a line since the last [`Buffer::take_changes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineChange {
    pub line: usize,
    pub col: usize,
}

/// A text buffer backed by a rope.
///
/// A final line ending terminates the last line instead of starting a new
/// empty one: `"a\nb\n"` has two lines. An empty buffer has one empty line.
pub struct Buffer {
    rope: Rope,
    path: Option<PathBuf>,
    modified: bool,
    changes: BTreeMap<usize, usize>,
}

impl Buffer {
    // -- Construction -------------------------------------------------------

    /// An empty buffer with no file path.
    #[must_use]
    pub fn new() -> Self {
        Self::from_text("")
    }

    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            path: None,
            modified: false,
            changes: BTreeMap::new(),
        }
    }

    /// Load a buffer from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid UTF-8.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        let mut buf = Self::from_text(&text);
        buf.path = Some(path.to_path_buf());
        Ok(buf)
    }

    // -- Text access --------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn rope(&self) -> &Rope {
        &self.rope
    }

    /// All text, line endings included.
    #[must_use]
    pub fn contents(&self) -> String {
        self.rope.to_string()
    }

    /// Byte length of line `lnum` without its line ending.
    #[must_use]
    pub fn line_len(&self, lnum: usize) -> Option<usize> {
        self.content_slice(lnum).map(|s| s.len_bytes())
    }

    /// The content of line `lnum` (1-indexed) as a rope slice, line ending
    /// stripped.
    fn content_slice(&self, lnum: usize) -> Option<RopeSlice<'_>> {
        if lnum == 0 || lnum > self.line_count() {
            return None;
        }
        let slice = self.rope.line(lnum - 1);
        Some(slice.slice(..content_chars(slice)))
    }

    // -- Metadata -----------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// True if a line was replaced since the buffer was created or loaded.
    #[inline]
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    /// Drain the per-line change log, ordered by line.
    pub fn take_changes(&mut self) -> Vec<LineChange> {
        std::mem::take(&mut self.changes)
            .into_iter()
            .map(|(line, col)| LineChange { line, col })
            .collect()
    }
}

impl LineStore for Buffer {
    fn line_count(&self) -> usize {
        let lines = self.rope.len_lines();
        let len = self.rope.len_chars();
        if lines > 1 && len > 0 && matches!(self.rope.char(len - 1), '\n' | '\r') {
            lines - 1
        } else {
            lines
        }
    }

    fn line(&self, lnum: usize) -> Option<Cow<'_, str>> {
        self.content_slice(lnum).map(|slice| match slice.as_str() {
            Some(s) => Cow::Borrowed(s),
            None => Cow::Owned(slice.to_string()),
        })
    }

    fn replace_line(&mut self, lnum: usize, text: String) -> Result<(), ColumnError> {
        let Some(slice) = self.content_slice(lnum) else {
            return Err(ColumnError::MissingLine { line: lnum });
        };
        let start = self.rope.line_to_char(lnum - 1);
        let end = start + slice.len_chars();
        self.rope.remove(start..end);
        self.rope.insert(start, &text);
        self.modified = true;
        Ok(())
    }

    fn changed_bytes(&mut self, lnum: usize, col: usize) {
        self.changes
            .entry(lnum)
            .and_modify(|first| *first = (*first).min(col))
            .or_insert(col);
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("lines", &self.line_count())
            .field("bytes", &self.rope.len_bytes())
            .field("modified", &self.modified)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Chars in a rope line excluding a trailing `\n`, `\r\n` or `\r`.
fn content_chars(line: RopeSlice<'_>) -> usize {
    let total = line.len_chars();
    if total == 0 {
        return 0;
    }
    match line.char(total - 1) {
        '\n' if total >= 2 && line.char(total - 2) == '\r' => total - 2,
        '\n' | '\r' => total - 1,
        _ => total,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
