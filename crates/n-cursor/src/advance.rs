//! Column advance — moving a position to a screen column.
//!
//! This is what runs after `|`, `$`, vertical motions and block selections:
//! given a target column, find the byte that is drawn there. When the target
//! lies inside a tab or past the end of the line the outcome depends on the
//! edit state:
//!
//! | Situation                    | Virtual editing off   | Virtual editing on         |
//! |------------------------------|-----------------------|----------------------------|
//! | target inside a tab          | cursor on the tab     | `coladd` into the tab      |
//! | target past the end          | last char (or slot)   | `coladd` past the end      |
//! | ... with `allow_mutation`    | unchanged             | spaces written to the line |
//!
//! Writing spaces ("materializing") replaces the line through
//! [`LineStore::replace_line`], so the store owns the new text and the old
//! text is dropped.

use tracing::{debug, trace};

use crate::bounds::adjust_head_in_line;
use crate::buffer::{LineStore, fetch_line};
use crate::context::Context;
use crate::error::ColumnError;
use crate::position::{Position, TargetColumn};
use crate::vcol::{line_width, span_in_line};

/// Largest `coladd` ever recorded, less twice the window width (itself
/// capped at a quarter of this).
const COLADD_LIMIT: usize = 0x7fff_ffff;

/// How far [`advance_to_column`] may go to reach the target.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceOptions {
    /// Write spaces into the line when virtual editing is active.
    pub allow_mutation: bool,
    /// Record the remaining distance in `coladd` instead of stopping short.
    pub fine_tune: bool,
}

impl AdvanceOptions {
    /// The options used for ordinary cursor motion.
    #[must_use]
    pub const fn motion(ctx: &Context<'_>) -> Self {
        Self {
            allow_mutation: false,
            fine_tune: ctx.edit.virtual_active(),
        }
    }

    /// Mutation allowed, no fine-tuning.
    pub const FORCE: Self = Self {
        allow_mutation: true,
        fine_tune: false,
    };
}

/// What an advance did besides moving the position.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Landing {
    /// Desired column to remember for vertical motion, if one was computed.
    pub want_col: Option<usize>,
    /// The line was rewritten to back the target column with spaces.
    pub materialized: bool,
}

/// A new text for the line and the first byte that differs.
struct Rewrite {
    text: String,
    from: usize,
}

/// The result of measuring the line, before the position is touched.
struct Plan {
    idx: usize,
    col: usize,
    /// Effective target; `None` for the end of line.
    want: Option<usize>,
    one_more: bool,
    want_col: Option<usize>,
    rewrite: Option<Rewrite>,
}

/// Move `pos` to screen column `target` on its line.
///
/// The position is always left at the closest reachable place, even when
/// an error is returned.
///
/// # Errors
///
/// - [`ColumnError::Unreachable`] when the final column is left of `target`.
/// - [`ColumnError::Allocation`], [`ColumnError::InvalidWidthCorrection`]
///   or [`ColumnError::MissingLine`] when the line could not be rewritten;
///   the line and the position are unchanged.
pub fn advance_to_column<S: LineStore + ?Sized>(
    store: &mut S,
    pos: &mut Position,
    target: TargetColumn,
    opts: AdvanceOptions,
    ctx: &Context<'_>,
) -> Result<Landing, ColumnError> {
    let mut plan = {
        let line = fetch_line(store, pos.line);
        plan(&line, pos.line, target, opts, ctx)?
    };

    let materialized = if let Some(rewrite) = plan.rewrite.take() {
        let bytes = rewrite.text.len();
        store.replace_line(pos.line, rewrite.text)?;
        store.changed_bytes(pos.line, rewrite.from);
        debug!(line = pos.line, from = rewrite.from, bytes, "materialized virtual column");
        true
    } else {
        false
    };

    let line = fetch_line(store, pos.line);
    finish(&line, pos, &plan, opts, ctx).map(|want_col| Landing {
        want_col,
        materialized,
    })
}

/// Move `pos` to `target` without changing any text. `coladd` is used
/// when virtual editing is active.
///
/// # Errors
///
/// [`ColumnError::Unreachable`] when the final column is left of `target`.
pub fn advance_to_column_at<S: LineStore + ?Sized>(
    store: &S,
    pos: &mut Position,
    target: TargetColumn,
    ctx: &Context<'_>,
) -> Result<Landing, ColumnError> {
    let opts = AdvanceOptions::motion(ctx);
    let line = fetch_line(store, pos.line);
    let plan = plan(&line, pos.line, target, opts, ctx)?;
    finish(&line, pos, &plan, opts, ctx).map(|want_col| Landing {
        want_col,
        materialized: false,
    })
}

/// Move `pos` to `target`, writing spaces where virtual editing needs them.
///
/// # Errors
///
/// Same as [`advance_to_column`].
pub fn advance_force<S: LineStore + ?Sized>(
    store: &mut S,
    pos: &mut Position,
    target: TargetColumn,
    ctx: &Context<'_>,
) -> Result<Landing, ColumnError> {
    advance_to_column(store, pos, target, AdvanceOptions::FORCE, ctx)
}

// ---------------------------------------------------------------------------
// Measuring
// ---------------------------------------------------------------------------

fn plan(
    line: &str,
    lnum: usize,
    target: TargetColumn,
    opts: AdvanceOptions,
    ctx: &Context<'_>,
) -> Result<Plan, ColumnError> {
    let one_more = ctx.edit.one_more(target);
    match target {
        TargetColumn::EndOfLine => {
            let want_col = ((opts.allow_mutation || opts.fine_tune) && !ctx.edit.visual_active())
                .then(|| line_width(line, ctx).saturating_add(usize::from(one_more)).saturating_sub(1));
            Ok(Plan {
                idx: if one_more { line.len() } else { line.len().saturating_sub(1) },
                col: 0,
                want: None,
                one_more,
                want_col,
                rewrite: None,
            })
        }
        TargetColumn::Column(want) => plan_column(line, lnum, want, one_more, opts, ctx),
    }
}

fn plan_column(
    line: &str,
    lnum: usize,
    mut want: usize,
    one_more: bool,
    opts: AdvanceOptions,
    ctx: &Context<'_>,
) -> Result<Plan, ColumnError> {
    let metrics = ctx.metrics;
    let display = &ctx.display;
    let virtual_active = ctx.edit.virtual_active();

    // On a wrapped line, never go past the right edge of the last row.
    let width = display.width;
    if opts.fine_tune && display.wrap && width > 0 && want >= width {
        let last = line_width(line, ctx).saturating_sub(1);
        if want / width > last / width && (!ctx.edit.mode.is_insert_like() || want > last.saturating_add(1)) {
            want = (last / width + 1).saturating_mul(width) - 1;
        }
    }

    let mut col = 0;
    let mut idx = 0;
    let mut csize = 0;
    let mut head = 0;
    let mut prev = None;
    while col <= want && idx < line.len() {
        let cell = metrics.cell_width(line, idx, col, display);
        csize = cell.width;
        head = cell.head;
        prev = Some(idx);
        idx += metrics.char_len(line, idx).max(1);
        col = col.saturating_add(csize);
    }

    if col > want || (!virtual_active && !one_more) {
        idx = prev.unwrap_or(0);
        if prev.is_some() {
            csize -= head;
            col -= csize;
        }
    }

    let mut rewrite = None;
    if opts.allow_mutation && virtual_active && ((col != want && col != want.saturating_add(1)) || csize > 1) {
        if idx >= line.len() {
            let gap = want.saturating_sub(col);
            if gap > 0 {
                let text = padded(line, lnum, line.len(), 0, gap)?;
                rewrite = Some(Rewrite { text, from: idx });
                idx += gap;
            }
            col = want;
        } else {
            let gap = want.saturating_sub(col);
            if gap >= csize {
                debug_assert!(gap < csize, "gap {gap} does not fit in a {csize}-cell character");
                return Err(ColumnError::InvalidWidthCorrection {
                    line: lnum,
                    gap,
                    width: csize,
                });
            }
            let len = metrics.char_len(line, idx).max(1);
            let text = padded(line, lnum, idx, len, csize)?;
            rewrite = Some(Rewrite { text, from: idx });
            idx += gap;
            col += gap;
        }
    }

    Ok(Plan {
        idx,
        col,
        want: Some(want),
        one_more,
        want_col: None,
        rewrite,
    })
}

/// `line` with the `len` bytes at `at` replaced by `spaces` spaces.
fn padded(line: &str, lnum: usize, at: usize, len: usize, spaces: usize) -> Result<String, ColumnError> {
    let bytes = (line.len() - len).saturating_add(spaces);
    let mut text = String::new();
    text.try_reserve_exact(bytes)
        .map_err(|_| ColumnError::Allocation { line: lnum, bytes })?;
    text.push_str(&line[..at]);
    text.extend(std::iter::repeat_n(' ', spaces));
    text.push_str(&line[at + len..]);
    Ok(text)
}

/// Apply a plan to `pos`. Returns the desired column to remember.
fn finish(
    line: &str,
    pos: &mut Position,
    plan: &Plan,
    opts: AdvanceOptions,
    ctx: &Context<'_>,
) -> Result<Option<usize>, ColumnError> {
    pos.col = plan.idx;
    pos.coladd = 0;
    let mut col = plan.col;

    if opts.fine_tune {
        match plan.want {
            None if !plan.one_more => {
                let span = span_in_line(line, *pos, ctx);
                pos.coladd = span.end.saturating_sub(span.start);
            }
            None => {}
            Some(want) => {
                let extra = want.saturating_sub(col);
                if extra > 0 && extra < COLADD_LIMIT - 2 * ctx.display.width.min(COLADD_LIMIT / 4) {
                    pos.coladd = extra;
                }
                col = want;
            }
        }
    }

    adjust_head_in_line(line, pos, ctx);

    match plan.want {
        Some(want) if col < want => {
            trace!(line = pos.line, want, reached = col, "column not reachable");
            Err(ColumnError::Unreachable {
                line: pos.line,
                target: want,
                reached: col,
            })
        }
        _ => Ok(plan.want_col),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
