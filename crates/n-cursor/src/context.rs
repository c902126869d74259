//! The settings every engine call reads.

use std::fmt;

use crate::metrics::{CellMetrics, CharMetrics};
use crate::mode::EditState;
use crate::options::DisplayConfig;

/// Display settings, edit state and character metrics for one call.
///
/// Cheap to copy; build one per command rather than keeping it around, so
/// option changes are always seen.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub display: DisplayConfig,
    pub edit: EditState,
    pub metrics: &'a dyn CharMetrics,
}

impl Context<'static> {
    /// A context using [`CellMetrics`].
    #[must_use]
    pub fn new(display: DisplayConfig, edit: EditState) -> Self {
        Self {
            display,
            edit,
            metrics: &CellMetrics,
        }
    }
}

impl Context<'_> {
    /// Replace the metrics provider.
    #[must_use]
    pub fn with_metrics<'b>(self, metrics: &'b dyn CharMetrics) -> Context<'b> {
        Context {
            display: self.display,
            edit: self.edit,
            metrics,
        }
    }

    /// The same context with list mode turned off.
    #[must_use]
    pub const fn nolist(self) -> Self {
        Self {
            display: self.display.nolist(),
            ..self
        }
    }
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("display", &self.display)
            .field("edit", &self.edit)
            .finish_non_exhaustive()
    }
}
