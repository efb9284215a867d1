//! The `OutputWriter` trait implemented by all backend writers.

use crate::{CycleRow, OutputResult, TransitionRow};

/// Trait implemented by trace backends.
///
/// All methods are infallible from the observer's perspective — errors are
/// stored internally and retrieved with
/// [`TraceObserver::take_error`](crate::TraceObserver::take_error).
pub trait OutputWriter {
    /// Write a batch of transition rows.
    fn write_transitions(&mut self, rows: &[TransitionRow]) -> OutputResult<()>;

    /// Write one cycle summary row.
    fn write_cycle(&mut self, row: &CycleRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
