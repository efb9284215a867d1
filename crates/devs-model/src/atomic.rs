//! The `Atomic` trait — the main extension point for user code.

use std::any::Any;

use devs_core::DevsResult;

use crate::{AtomicState, Inputs, Outputs};

/// Object-safe access to the concrete type behind a `dyn Atomic`.
///
/// Blanket-implemented for every `'static` type; models never implement it
/// by hand.  [`ModelTree::atomic`](crate::ModelTree::atomic) uses it to hand
/// a finished model back to the caller for inspection.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ── PortSpec ──────────────────────────────────────────────────────────────────

/// Port names an atomic model declares when it joins a tree.
///
/// Ports are numbered in declaration order per direction, so a model with
/// `PortSpec::new().input("a").input("b").output("out")` reads `a` as
/// `PortId(0)`, `b` as `PortId(1)` and writes `out` as `PortId(0)`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PortSpec {
    pub inputs:  Vec<String>,
    pub outputs: Vec<String>,
}

impl PortSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(mut self, name: impl Into<String>) -> Self {
        self.inputs.push(name.into());
        self
    }

    pub fn output(mut self, name: impl Into<String>) -> Self {
        self.outputs.push(name.into());
        self
    }
}

// ── Atomic ────────────────────────────────────────────────────────────────────

/// A leaf state machine following the DEVS five-function contract.
///
/// The coordinator owns the [`AtomicState`] and passes it to every callback,
/// so a model's own fields hold only domain state.
///
/// # Call protocol per cycle
///
/// 1. [`output`](Self::output) — only when imminent; writes output ports.
/// 2. Exactly one of:
///    - [`internal_transition`](Self::internal_transition) — imminent, no input;
///    - [`external_transition`](Self::external_transition) — input, not imminent;
///    - [`confluent_transition`](Self::confluent_transition) — both.
/// 3. [`time_advance`](Self::time_advance) — reschedules the model.
///
/// # Example
///
/// ```rust,ignore
/// struct Relay;
///
/// impl Atomic for Relay {
///     fn ports(&self) -> PortSpec { PortSpec::new().input("in").output("out") }
///     fn initialize(&mut self, s: &mut AtomicState) { s.passivate_in("idle") }
///     fn output(&self, _s: &AtomicState, out: &mut Outputs<'_>) { out.send(PortId(0), ()) }
///     fn internal_transition(&mut self, s: &mut AtomicState) { s.passivate_in("idle") }
///     fn external_transition(&mut self, s: &mut AtomicState, _e: f64, _x: &Inputs<'_>) -> DevsResult<()> {
///         s.activate();
///         Ok(())
///     }
/// }
/// ```
pub trait Atomic: AsAny + Send + 'static {
    /// Input and output ports, in `PortId` order.
    fn ports(&self) -> PortSpec;

    /// Establish the first `(phase, sigma)`.  Called once before the first cycle.
    fn initialize(&mut self, state: &mut AtomicState);

    /// Called once when the simulation is torn down.
    fn exit(&mut self, _state: &AtomicState) {}

    /// Time until the next internal event.  Defaults to `sigma`.
    fn time_advance(&self, state: &AtomicState) -> f64 {
        state.sigma()
    }

    /// λ: emit values on output ports.  Must not change state.
    fn output(&self, state: &AtomicState, out: &mut Outputs<'_>);

    /// δint: the scheduled internal event fired.
    fn internal_transition(&mut self, state: &mut AtomicState);

    /// δext: input arrived `elapsed` time units after the last transition.
    fn external_transition(
        &mut self,
        state:   &mut AtomicState,
        elapsed: f64,
        input:   &Inputs<'_>,
    ) -> DevsResult<()>;

    /// δcon: input arrived at the instant the internal event fires.
    ///
    /// Default: the internal event happens first, then the input is applied
    /// with zero elapsed time.
    fn confluent_transition(
        &mut self,
        state:    &mut AtomicState,
        _elapsed: f64,
        input:    &Inputs<'_>,
    ) -> DevsResult<()> {
        self.internal_transition(state);
        self.external_transition(state, 0.0, input)
    }
}
