//! `TraceObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use devs_core::ModelId;
use devs_model::{AtomicState, ModelTree, TransitionKind};
use devs_sim::SimObserver;

use crate::row::{CycleRow, TransitionRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes every transition and a per-cycle summary to
/// any [`OutputWriter`] backend.
///
/// Transition rows are buffered for the duration of a cycle and written in
/// one batch when it ends.  Errors from the writer are stored internally
/// because `SimObserver` methods have no return value; check them with
/// [`take_error`][Self::take_error] after the run.
pub struct TraceObserver<W: OutputWriter> {
    writer:     W,
    pending:    Vec<TransitionRow>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> TraceObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pending:    Vec::new(),
            last_error: None,
        }
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Flush the writer.  Also done by `on_sim_end`; call this when the run
    /// ended without reaching it (e.g. after an aborted run).
    pub fn finish(&mut self) -> OutputResult<()> {
        self.writer.finish()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn push(&mut self, time: f64, model: ModelId, name: &str, kind: Option<TransitionKind>, state: &AtomicState) {
        self.pending.push(TransitionRow {
            time,
            model_id: model.0,
            model:    name.to_owned(),
            kind,
            phase:    state.phase().to_owned(),
            sigma:    state.sigma(),
        });
    }

    fn flush_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let result = self.writer.write_transitions(&self.pending);
        self.pending.clear();
        self.store_err(result);
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for TraceObserver<W> {
    fn on_initialize(&mut self, time: f64, tree: &ModelTree) {
        for &id in tree.atomic_ids() {
            if let Ok(comp) = tree.component(id) {
                if let Some(state) = comp.state() {
                    self.push(time, id, comp.name(), None, state);
                }
            }
        }
        self.flush_pending();
    }

    fn on_transition(
        &mut self,
        time:  f64,
        model: ModelId,
        name:  &str,
        kind:  TransitionKind,
        state: &AtomicState,
    ) {
        self.push(time, model, name, Some(kind), state);
    }

    fn on_cycle_end(&mut self, time: f64, imminent: usize, receivers: usize) {
        self.flush_pending();
        let row = CycleRow {
            time,
            imminent:  imminent as u64,
            receivers: receivers as u64,
        };
        let result = self.writer.write_cycle(&row);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _time: f64) {
        self.flush_pending();
        let result = self.writer.finish();
        self.store_err(result);
    }
}
