//! Editing modes and the per-call edit state.
//!
//! The engine never reads global flags. Everything that changes where a
//! cursor may rest is collected in one [`EditState`] value:
//!
//! | Field          | Affects                                              |
//! |----------------|------------------------------------------------------|
//! | `mode`         | one-more column in Insert/Replace, tab cursor column |
//! | `selection`    | one-more column while a visual selection is active   |
//! | `virtualedit`  | whether columns without text are reachable           |
//! | `restart_edit` | Insert mode resumes after the current command        |
//! | `visual_start` | anchor of the visual selection                       |
//! | `virtual_op`   | override used while an operator is executing         |

use std::fmt;

use bitflags::bitflags;

use crate::position::{Position, TargetColumn};

// ---------------------------------------------------------------------------
// VisualKind
// ---------------------------------------------------------------------------

/// The sub-mode of visual selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualKind {
    /// `v` — character-wise selection.
    Char,
    /// `V` — line-wise selection.
    Line,
    /// `Ctrl-V` — block (column) selection.
    Block,
}

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// The current editing mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    /// `R` — continuous overwrite. Counts as Insert for cursor limits.
    Replace,
    Visual(VisualKind),
}

impl Mode {
    /// True for Insert and Replace: text is typed at the cursor, so the
    /// cursor may sit after the last character.
    #[inline]
    #[must_use]
    pub const fn is_insert_like(self) -> bool {
        matches!(self, Self::Insert | Self::Replace)
    }

    /// True in Normal mode and while a visual selection is shown. These are
    /// the modes where the cursor is drawn on the last cell of a tab.
    #[inline]
    #[must_use]
    pub const fn is_normal_like(self) -> bool {
        matches!(self, Self::Normal | Self::Visual(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_visual(self) -> bool {
        matches!(self, Self::Visual(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_visual_block(self) -> bool {
        matches!(self, Self::Visual(VisualKind::Block))
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// The `selection` option: how the end of a visual selection is treated.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selection {
    /// The last character is included; the cursor may pass the line end.
    #[default]
    Inclusive,
    /// The last character is excluded.
    Exclusive,
    /// Inclusive, and the cursor may not pass the line end.
    Old,
}

impl Selection {
    /// Parse an option value (`inclusive`, `exclusive`, `old`).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "inclusive" => Some(Self::Inclusive),
            "exclusive" => Some(Self::Exclusive),
            "old" => Some(Self::Old),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inclusive => "inclusive",
            Self::Exclusive => "exclusive",
            Self::Old => "old",
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// VirtualEdit
// ---------------------------------------------------------------------------

bitflags! {
    /// The `virtualedit` option as a set of flags.
    ///
    /// ```
    /// use n_cursor::mode::VirtualEdit;
    ///
    /// let ve = VirtualEdit::parse("block,onemore").unwrap();
    /// assert!(ve.contains(VirtualEdit::BLOCK));
    /// assert!(!ve.contains(VirtualEdit::ALL));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct VirtualEdit: u8 {
        /// Virtual editing in visual block mode.
        const BLOCK   = 1 << 0;
        /// Virtual editing in Insert mode.
        const INSERT  = 1 << 1;
        /// Virtual editing in all modes.
        const ALL     = 1 << 2;
        /// Allow the cursor one column past the end of the line.
        const ONEMORE = 1 << 3;
    }
}

impl VirtualEdit {
    /// Parse a comma-separated option value. `""` and `"none"` clear all
    /// flags. Returns `None` on an unknown item.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let mut flags = Self::empty();
        for item in value.split(',').filter(|item| !item.is_empty()) {
            flags |= match item {
                "block" => Self::BLOCK,
                "insert" => Self::INSERT,
                "all" => Self::ALL,
                "onemore" => Self::ONEMORE,
                "none" => Self::empty(),
                _ => return None,
            };
        }
        Some(flags)
    }
}

impl fmt::Display for VirtualEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Self::BLOCK, "block"),
            (Self::INSERT, "insert"),
            (Self::ALL, "all"),
            (Self::ONEMORE, "onemore"),
        ];
        let mut first = true;
        for (flag, name) in names {
            if self.contains(flag) {
                if !first {
                    f.write_str(",")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// EditState
// ---------------------------------------------------------------------------

/// Snapshot of the mode-related state consulted by every operation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EditState {
    pub mode: Mode,
    pub selection: Selection,
    pub virtualedit: VirtualEdit,
    /// Insert mode will be re-entered when the current command finishes
    /// (e.g. `CTRL-O` from Insert mode).
    pub restart_edit: bool,
    /// Where the visual selection started, while one is active.
    pub visual_start: Option<Position>,
    /// Set while an operator runs: the visual mode has already ended, so
    /// the decision whether virtual editing applies is frozen here.
    pub virtual_op: Option<bool>,
}

impl EditState {
    /// State for `mode` with every other setting at its default.
    #[must_use]
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_virtualedit(mut self, virtualedit: VirtualEdit) -> Self {
        self.virtualedit = virtualedit;
        self
    }

    #[must_use]
    pub const fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    #[inline]
    #[must_use]
    pub const fn visual_active(&self) -> bool {
        self.mode.is_visual()
    }

    /// True when columns without text behind them are reachable.
    #[must_use]
    pub const fn virtual_active(&self) -> bool {
        if let Some(active) = self.virtual_op {
            return active;
        }
        self.virtualedit.contains(VirtualEdit::ALL)
            || (self.virtualedit.contains(VirtualEdit::BLOCK) && self.mode.is_visual_block())
            || (self.virtualedit.contains(VirtualEdit::INSERT) && self.mode.is_insert_like())
    }

    /// True when a visual selection counts its end past the last character.
    #[inline]
    #[must_use]
    pub const fn selection_past_end(&self) -> bool {
        self.visual_active() && !matches!(self.selection, Selection::Old)
    }

    /// Whether the cursor may rest one column past the last character when
    /// moving to `target`. `onemore` never applies to the end-of-line target.
    #[must_use]
    pub const fn one_more(&self, target: TargetColumn) -> bool {
        self.mode.is_insert_like()
            || self.restart_edit
            || self.selection_past_end()
            || (self.virtualedit.contains(VirtualEdit::ONEMORE) && !target.is_end_of_line())
    }

    /// Whether a clamped cursor may occupy the end-of-line slot.
    #[must_use]
    pub const fn past_end_allowed(&self) -> bool {
        self.mode.is_insert_like()
            || self.restart_edit
            || self.selection_past_end()
            || self.virtualedit.contains(VirtualEdit::ONEMORE)
            || self.virtual_active()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
