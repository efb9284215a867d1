//! Simulation observer trait for progress reporting and data collection.

use devs_core::ModelId;
use devs_model::{AtomicState, ModelTree, TransitionKind};

/// Callbacks invoked by the [`Coordinator`](crate::Coordinator) at key points
/// of the simulation cycle.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — transition counter
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct Confluences(u64);
///
/// impl SimObserver for Confluences {
///     fn on_transition(&mut self, _t: f64, _id: ModelId, _name: &str,
///                      kind: TransitionKind, _state: &AtomicState) {
///         if kind == TransitionKind::Confluent { self.0 += 1; }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called once after every atomic model has been initialized.
    fn on_initialize(&mut self, _time: f64, _tree: &ModelTree) {}

    /// Called at the start of each cycle, after the clock moved to `time`.
    fn on_cycle_start(&mut self, _time: f64) {}

    /// Called after each atomic transition with the model's new state.
    fn on_transition(
        &mut self,
        _time:  f64,
        _model: ModelId,
        _name:  &str,
        _kind:  TransitionKind,
        _state: &AtomicState,
    ) {}

    /// Called at the end of each cycle.
    ///
    /// `imminent` is the number of models whose internal event fell on this
    /// cycle, `receivers` the number of models that got at least one value.
    fn on_cycle_end(&mut self, _time: f64, _imminent: usize, _receivers: usize) {}

    /// Called once when a `simulate_with` call returns successfully.
    fn on_sim_end(&mut self, _time: f64) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call
/// `simulate_with` but don't want callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
