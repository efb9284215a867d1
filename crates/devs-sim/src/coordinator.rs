//! The `Coordinator` and its event loop.

use std::fmt;

use devs_core::{DevsError, Direction, Event, ModelId, PortRef, SimClock, SimRng, is_passive};
use devs_model::{CycleScratch, ModelTree};
use tracing::{debug, info, trace, warn};

use crate::{DispatchOrder, NoopObserver, SimConfig, SimError, SimObserver, SimResult, SimStats};

// ── CoordinatorState ──────────────────────────────────────────────────────────

/// Lifecycle of a [`Coordinator`].
///
/// ```text
/// Idle ──initialize──► Ready ◄──cycle──► Running
///                        │                  │ model error
///                        │                  ▼
///                        └──────exit──── Aborted ──exit──► Terminated
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CoordinatorState {
    /// Built, not yet initialized.
    Idle,
    /// Between cycles.
    Ready,
    /// Inside a cycle.  Only observable from an observer callback or after a
    /// panic unwound out of a model.
    Running,
    /// A model error or broken time invariant ended the run mid-cycle.  The
    /// tree is left as it was; only `exit` is accepted.
    Aborted,
    /// `exit` has run.
    Terminated,
}

impl fmt::Display for CoordinatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CoordinatorState::Idle       => "idle",
            CoordinatorState::Ready      => "ready",
            CoordinatorState::Running    => "running",
            CoordinatorState::Aborted    => "aborted",
            CoordinatorState::Terminated => "terminated",
        })
    }
}

// ── Coordinator ───────────────────────────────────────────────────────────────

/// Drives a [`ModelTree`] through simulated time.
///
/// The coordinator owns the tree for its whole life; models are reachable
/// read-only through [`tree`](Self::tree) between calls.  Every public
/// operation runs whole cycles, so the tree is always consistent (ports
/// empty, `tN` up to date) when control returns to the caller.
///
/// Each operation has a `_with` form taking a [`SimObserver`].
pub struct Coordinator {
    config:  SimConfig,
    tree:    ModelTree,
    clock:   SimClock,
    state:   CoordinatorState,
    stats:   SimStats,
    scratch: CycleScratch,
    /// Imminent ∪ receivers of the current cycle, in dispatch order.
    touched: Vec<ModelId>,
    /// Present only for [`DispatchOrder::Shuffled`].
    rng:     Option<SimRng>,
}

impl Coordinator {
    /// Coordinator with the default [`SimConfig`].
    pub fn new(tree: ModelTree) -> Self {
        Self::build(tree, SimConfig::default())
    }

    pub fn with_config(tree: ModelTree, config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self::build(tree, config))
    }

    fn build(tree: ModelTree, config: SimConfig) -> Self {
        let rng = match config.dispatch_order {
            DispatchOrder::Declaration     => None,
            DispatchOrder::Shuffled { seed } => Some(SimRng::new(seed)),
        };
        Self {
            stats:   SimStats::new(tree.len(), config.track_model_stats),
            config,
            tree,
            clock:   SimClock::new(),
            state:   CoordinatorState::Idle,
            scratch: CycleScratch::new(),
            touched: Vec::new(),
            rng,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// Global simulated time: the time of the last cycle.
    #[inline]
    pub fn time(&self) -> f64 {
        self.clock.time()
    }

    /// Time of the next scheduled internal event, `+∞` when passivated.
    #[inline]
    pub fn next_time(&self) -> f64 {
        self.tree.next_time()
    }

    #[inline]
    pub fn state(&self) -> CoordinatorState {
        self.state
    }

    /// Statistics accumulated since construction.
    #[inline]
    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    #[inline]
    pub fn tree(&self) -> &ModelTree {
        &self.tree
    }

    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    #[inline]
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Give the tree back, e.g. to inspect models after `exit`.
    pub fn into_tree(self) -> ModelTree {
        self.tree
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Initialize every atomic model and schedule the first events.
    pub fn initialize(&mut self) -> SimResult<()> {
        self.initialize_with(&mut NoopObserver)
    }

    pub fn initialize_with<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        self.expect_state("initialize", &[CoordinatorState::Idle])?;
        if let Err(e) = self.tree.initialize(self.clock.time()) {
            warn!(error = %e, "initialization failed");
            self.state = CoordinatorState::Aborted;
            return Err(e.into());
        }
        self.state = CoordinatorState::Ready;
        info!(
            models  = self.tree.len(),
            atomics = self.tree.atomic_ids().len(),
            next    = self.tree.next_time(),
            "coordinator initialized"
        );
        observer.on_initialize(self.clock.time(), &self.tree);
        Ok(())
    }

    /// Run cycles while the next event time is `<= end`.
    ///
    /// `end` may be `+∞`: the run then lasts until every model is passive.
    /// Returns a snapshot of the cumulative statistics.
    pub fn simulate(&mut self, end: f64) -> SimResult<SimStats> {
        self.simulate_with(end, &mut NoopObserver)
    }

    pub fn simulate_with<O: SimObserver>(&mut self, end: f64, observer: &mut O) -> SimResult<SimStats> {
        self.expect_state("simulate", &[CoordinatorState::Ready])?;
        if end.is_nan() {
            return Err(SimError::Config("end time is NaN".into()));
        }
        let (from, cycles) = (self.clock.time(), self.stats.cycles);
        loop {
            let next = self.tree.next_time();
            if is_passive(next) || next > end {
                break;
            }
            self.run_cycle(next, None, observer)?;
        }
        debug!(
            from,
            to     = self.clock.time(),
            cycles = self.stats.cycles - cycles,
            next   = self.tree.next_time(),
            "simulate finished"
        );
        observer.on_sim_end(self.clock.time());
        Ok(self.stats.clone())
    }

    /// Run exactly one cycle.  Returns `Ok(false)` without doing anything when
    /// every model is passive.
    pub fn step(&mut self) -> SimResult<bool> {
        self.step_with(&mut NoopObserver)
    }

    pub fn step_with<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<bool> {
        self.expect_state("step", &[CoordinatorState::Ready])?;
        let next = self.tree.next_time();
        if is_passive(next) {
            return Ok(false);
        }
        self.run_cycle(next, None, observer)?;
        Ok(true)
    }

    /// Deliver `events` on root input port `port`, `elapsed` time units after
    /// the last cycle.
    ///
    /// The injection runs as a cycle of its own: models imminent at that same
    /// instant still produce their output first, and every model reached by
    /// the injected values sees them alongside that output.
    pub fn inject(&mut self, elapsed: f64, port: PortRef, events: &[Event]) -> SimResult<()> {
        self.inject_with(elapsed, port, events, &mut NoopObserver)
    }

    pub fn inject_with<O: SimObserver>(
        &mut self,
        elapsed:  f64,
        port:     PortRef,
        events:   &[Event],
        observer: &mut O,
    ) -> SimResult<()> {
        self.expect_state("inject", &[CoordinatorState::Ready])?;
        if !(elapsed >= 0.0 && elapsed.is_finite()) {
            return Err(SimError::Config(format!("injection delay must be finite and non-negative, got {elapsed}")));
        }
        let time = self.clock.time() + elapsed;
        let next = self.tree.next_time();
        if time > next {
            warn!(time, next, "injection rejected: past next event");
            return Err(SimError::InjectOutOfBounds { time, next });
        }
        let root = self.tree.root();
        if port.model != root || port.direction != Direction::In {
            warn!(%port, "injection rejected: not a root input port");
            return Err(DevsError::NotVisible { parent: root, port }.into());
        }
        self.tree.port(port)?;
        self.run_cycle(time, Some((port, events)), observer)
    }

    /// Call `exit` on every atomic model.  No cycle can run afterwards.
    pub fn exit(&mut self) -> SimResult<()> {
        self.expect_state("exit", &[CoordinatorState::Ready, CoordinatorState::Aborted])?;
        self.tree.exit();
        self.state = CoordinatorState::Terminated;
        info!(
            time        = self.clock.time(),
            cycles      = self.stats.cycles,
            transitions = self.stats.totals.transitions(),
            "coordinator exited"
        );
        Ok(())
    }

    // ── Core cycle ────────────────────────────────────────────────────────

    fn expect_state(&self, op: &'static str, allowed: &[CoordinatorState]) -> SimResult<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(SimError::InvalidState { op, state: self.state })
        }
    }

    fn run_cycle<O: SimObserver>(
        &mut self,
        time:     f64,
        injected: Option<(PortRef, &[Event])>,
        observer: &mut O,
    ) -> SimResult<()> {
        if let Some(limit) = self.config.stall_limit {
            let cycles = self.clock.cycles_at_current_time();
            if time == self.clock.time() && cycles >= limit {
                warn!(time, cycles, "simulation stalled");
                return Err(SimError::Stalled { time, cycles });
            }
        }
        debug_assert!(self.tree.all_ports_empty(), "ports not cleared before cycle at t={time}");

        self.state = CoordinatorState::Running;
        match self.process_cycle(time, injected, observer) {
            Ok(()) => {
                self.state = CoordinatorState::Ready;
                Ok(())
            }
            Err(e) => {
                warn!(time, error = %e, "run aborted");
                self.state = CoordinatorState::Aborted;
                Err(e)
            }
        }
    }

    fn process_cycle<O: SimObserver>(
        &mut self,
        time:     f64,
        injected: Option<(PortRef, &[Event])>,
        observer: &mut O,
    ) -> SimResult<()> {
        self.clock.advance_to(time);
        observer.on_cycle_start(time);

        // ── Phase 1: imminent set ─────────────────────────────────────────
        let scratch = &mut self.scratch;
        scratch.reset();
        self.tree.collect_imminent(time, scratch);
        if let Some(rng) = &mut self.rng {
            rng.shuffle(&mut scratch.imminent);
        }

        // ── Phase 2: every output before any transition ───────────────────
        for i in 0..scratch.imminent.len() {
            self.tree.output(scratch.imminent[i], scratch)?;
        }

        // ── Phase 3: routing ──────────────────────────────────────────────
        for i in 0..scratch.imminent.len() {
            self.tree.route_outputs(scratch.imminent[i], scratch);
        }
        if let Some((port, values)) = injected {
            self.tree.inject(port, values, scratch)?;
        }
        self.tree.finish_routing(scratch);

        // ── Phase 4: transitions ──────────────────────────────────────────
        self.touched.clear();
        self.touched.extend_from_slice(&scratch.imminent);
        self.touched.extend_from_slice(&scratch.receivers);
        self.touched.sort_unstable();
        self.touched.dedup();
        if let Some(rng) = &mut self.rng {
            rng.shuffle(&mut self.touched);
        }

        for i in 0..self.touched.len() {
            let id = self.touched[i];
            let imminent = self.tree.component(id)?.t_next() == time;
            let transition = self
                .tree
                .transition(id, time, imminent)
                .map_err(|source| SimError::Model { model: id, source })?;
            let Some(transition) = transition else { continue };

            self.stats.record(id, &transition);
            let comp = self.tree.component(id)?;
            if let Some(state) = comp.state() {
                observer.on_transition(time, id, comp.name(), transition.kind, state);
            }
        }

        // ── Phase 5: port lifecycle and bottom-up refresh ─────────────────
        let (imminent, receivers) = (scratch.imminent.len(), scratch.receivers.len());
        self.stats.cycles += 1;
        self.stats.end_time = time;
        self.stats.delivered += scratch.delivered;
        self.stats.dropped += scratch.dropped;
        self.tree.clear_ports(scratch);
        self.tree.refresh_ancestors(scratch);

        trace!(time, imminent, receivers, next = self.tree.next_time(), "cycle");
        observer.on_cycle_end(time, imminent, receivers);
        Ok(())
    }
}
