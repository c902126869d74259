//! Cursor — the active position of a window.
//!
//! The free functions in [`vcol`], [`advance`], [`bounds`] and [`step`]
//! work on any [`Position`]. A `Cursor` owns one and threads two pieces of
//! state those functions return but do not keep:
//!
//! - **want_col** — the column to return to when moving vertically. `$`
//!   records the width of the line so that `j` keeps going to line ends.
//! - **cached vcol** — the screen column of the cursor after a successful
//!   advance to a column, valid until the cursor moves some other way.
//!   A cursor resting on a tab never caches, because where it is drawn
//!   depends on the mode.
//!
//! The cursor does not own or reference the buffer; the line store is
//! passed to each method.
//!
//! [`vcol`]: crate::vcol
//! [`advance`]: crate::advance
//! [`bounds`]: crate::bounds
//! [`step`]: crate::step

use crate::advance::{self, AdvanceOptions, Landing};
use crate::bounds;
use crate::buffer::{LineStore, fetch_line};
use crate::context::Context;
use crate::error::ColumnError;
use crate::metrics::char_at;
use crate::position::{Position, TargetColumn};
use crate::step::{self, Backward, Forward};
use crate::vcol::{self, VisualSpan};

/// A cursor in a text buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor {
    pos: Position,

    /// Remembered column for vertical movement.
    want_col: Option<usize>,

    /// Screen column of `pos`, when known without rescanning the line.
    virtcol: Option<usize>,
}

impl Cursor {
    /// A cursor at the first byte of the buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self::at(Position::START)
    }

    #[must_use]
    pub const fn at(pos: Position) -> Self {
        Self {
            pos,
            want_col: None,
            virtcol: None,
        }
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn position(&self) -> Position {
        self.pos
    }

    #[inline]
    #[must_use]
    pub const fn line(&self) -> usize {
        self.pos.line
    }

    #[inline]
    #[must_use]
    pub const fn col(&self) -> usize {
        self.pos.col
    }

    #[inline]
    #[must_use]
    pub const fn coladd(&self) -> usize {
        self.pos.coladd
    }

    /// The remembered column for vertical movement, if one was recorded.
    #[inline]
    #[must_use]
    pub const fn want_col(&self) -> Option<usize> {
        self.want_col
    }

    pub const fn set_want_col(&mut self, col: Option<usize>) {
        self.want_col = col;
    }

    /// The screen column cached by the last advance, if still valid.
    #[inline]
    #[must_use]
    pub const fn cached_vcol(&self) -> Option<usize> {
        self.virtcol
    }

    /// Put the cursor somewhere else. No clamping is done.
    pub const fn set_position(&mut self, pos: Position) {
        self.pos = pos;
        self.virtcol = None;
    }

    // -- Columns ------------------------------------------------------------

    /// The screen column of the cursor, `coladd` included.
    #[must_use]
    pub fn visual_column<S: LineStore + ?Sized>(&self, store: &S, ctx: &Context<'_>) -> usize {
        vcol::visual_column(store, self.pos, ctx)
    }

    /// The screen column of byte `col` plus `coladd` on the cursor line.
    #[must_use]
    pub fn visual_column_of<S: LineStore + ?Sized>(
        &self,
        store: &S,
        col: usize,
        coladd: usize,
        ctx: &Context<'_>,
    ) -> usize {
        let pos = Position::with_coladd(self.pos.line, col, coladd);
        vcol::visual_column(store, pos, ctx)
    }

    /// Screen columns covered by the character under the cursor.
    #[must_use]
    pub fn span<S: LineStore + ?Sized>(&self, store: &S, ctx: &Context<'_>) -> VisualSpan {
        vcol::virtual_span(store, self.pos, ctx)
    }

    // -- Advancing ----------------------------------------------------------

    /// Move to screen column `target` without changing text.
    ///
    /// # Errors
    ///
    /// [`ColumnError::Unreachable`] when the line is too short; the cursor
    /// still moves as far as it can.
    pub fn advance<S: LineStore + ?Sized>(
        &mut self,
        store: &S,
        target: TargetColumn,
        ctx: &Context<'_>,
    ) -> Result<(), ColumnError> {
        let result = advance::advance_to_column_at(store, &mut self.pos, target, ctx);
        self.land(store, target, result.as_ref().ok());
        result.map(|_| ())
    }

    /// Move to screen column `target` with explicit options.
    ///
    /// # Errors
    ///
    /// See [`advance::advance_to_column`].
    pub fn advance_with<S: LineStore + ?Sized>(
        &mut self,
        store: &mut S,
        target: TargetColumn,
        opts: AdvanceOptions,
        ctx: &Context<'_>,
    ) -> Result<Landing, ColumnError> {
        let result = advance::advance_to_column(store, &mut self.pos, target, opts, ctx);
        self.land(&*store, target, result.as_ref().ok());
        result
    }

    /// Move to screen column `target`, writing spaces into the line where
    /// virtual editing needs text behind the column.
    ///
    /// The requested column is cached even when it could not be reached.
    ///
    /// # Errors
    ///
    /// See [`advance::advance_force`].
    pub fn advance_force<S: LineStore + ?Sized>(
        &mut self,
        store: &mut S,
        target: TargetColumn,
        ctx: &Context<'_>,
    ) -> Result<Landing, ColumnError> {
        let result = advance::advance_force(store, &mut self.pos, target, ctx);
        if let Ok(Landing {
            want_col: Some(want),
            ..
        }) = result
        {
            self.want_col = Some(want);
        }
        self.virtcol = target.column();
        result
    }

    /// Record the side effects of an advance.
    fn land<S: LineStore + ?Sized>(
        &mut self,
        store: &S,
        target: TargetColumn,
        landing: Option<&Landing>,
    ) {
        if let Some(want) = landing.and_then(|l| l.want_col) {
            self.want_col = Some(want);
        }
        self.virtcol = match target {
            TargetColumn::Column(col) if landing.is_some() => {
                let line = fetch_line(store, self.pos.line);
                (char_at(&line, self.pos.col) != Some('\t')).then_some(col)
            }
            _ => None,
        };
    }

    // -- Bounds -------------------------------------------------------------

    /// Make the whole position valid.
    pub fn clamp<S: LineStore + ?Sized>(&mut self, store: &S, ctx: &Context<'_>) {
        let before = self.pos;
        bounds::clamp_position(store, &mut self.pos, ctx);
        self.moved_from(before);
    }

    /// Keep the line number inside the buffer.
    pub fn clamp_line<S: LineStore + ?Sized>(&mut self, store: &S) {
        let before = self.pos;
        bounds::clamp_line(store, &mut self.pos);
        self.moved_from(before);
    }

    /// Keep the column on the cursor line.
    pub fn clamp_column<S: LineStore + ?Sized>(&mut self, store: &S, ctx: &Context<'_>) {
        let before = self.pos;
        bounds::clamp_column(store, &mut self.pos, ctx);
        self.moved_from(before);
    }

    /// Step off the end-of-line slot, as when leaving Insert mode.
    pub fn leave_line_end<S: LineStore + ?Sized>(&mut self, store: &S, ctx: &Context<'_>) {
        let before = self.pos;
        bounds::leave_line_end(store, &mut self.pos, ctx);
        self.moved_from(before);
    }

    fn moved_from(&mut self, before: Position) {
        if self.pos != before {
            self.virtcol = None;
        }
    }

    // -- Stepping -----------------------------------------------------------

    pub fn step_forward<S: LineStore + ?Sized>(&mut self, store: &S, ctx: &Context<'_>) -> Forward {
        self.virtcol = None;
        let step = step::step_forward(store, &mut self.pos, ctx.metrics);
        self.drop_stale_coladd(ctx);
        step
    }

    pub fn step_forward_skip<S: LineStore + ?Sized>(&mut self, store: &S, ctx: &Context<'_>) -> Forward {
        self.virtcol = None;
        let step = step::step_forward_skip(store, &mut self.pos, ctx.metrics);
        self.drop_stale_coladd(ctx);
        step
    }

    /// `coladd` only survives a step while virtual editing is active.
    const fn drop_stale_coladd(&mut self, ctx: &Context<'_>) {
        if !ctx.edit.virtual_active() {
            self.pos.coladd = 0;
        }
    }

    pub fn step_backward<S: LineStore + ?Sized>(&mut self, store: &S, ctx: &Context<'_>) -> Backward {
        self.virtcol = None;
        step::step_backward(store, &mut self.pos, ctx.metrics)
    }

    pub fn step_backward_skip<S: LineStore + ?Sized>(&mut self, store: &S, ctx: &Context<'_>) -> Backward {
        self.virtcol = None;
        step::step_backward_skip(store, &mut self.pos, ctx.metrics)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
