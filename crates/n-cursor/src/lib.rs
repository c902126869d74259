//! # n-cursor — Virtual-column cursor positioning
//!
//! Maps between byte positions in a line and the screen columns they are
//! drawn at, and moves cursors between the two:
//!
//! - **[`position`]** — `Position` (1-indexed line, byte column, `coladd`) and `TargetColumn`
//! - **[`mode`]** — editing modes, `selection` and `virtualedit`, collected in `EditState`
//! - **[`options`]** — `:set` parsing and the `DisplayConfig` snapshot
//! - **[`context`]** — the settings bundle every engine call reads
//! - **[`metrics`]** — character byte lengths and display widths
//! - **[`buffer`]** — the `LineStore` contract and a rope-backed `Buffer`
//! - **[`vcol`]** — screen column of a position
//! - **[`advance`]** — move a position to a screen column, materializing spaces if asked
//! - **[`bounds`]** — pull stale positions back onto valid text
//! - **[`step`]** — one character forward or back across lines
//! - **[`cursor`]** — an active cursor with desired-column and cached-column state
//! - **[`error`]** — `ColumnError` and `OptionError`

pub mod advance;
pub mod bounds;
pub mod buffer;
pub mod context;
pub mod cursor;
pub mod error;
pub mod metrics;
pub mod mode;
pub mod options;
pub mod position;
pub mod step;
pub mod vcol;

pub use advance::{AdvanceOptions, Landing};
pub use buffer::{Buffer, LineStore};
pub use context::Context;
pub use cursor::Cursor;
pub use error::{ColumnError, OptionError};
pub use metrics::{CellMetrics, CharMetrics};
pub use mode::{EditState, Mode, Selection, VirtualEdit, VisualKind};
pub use options::{DisplayConfig, Options};
pub use position::{MAXCOL, Position, TargetColumn};
