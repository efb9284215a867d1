//! Tree operations the coordinator drives once per cycle.
//!
//! The coordinator decides *when* each step runs; this module knows *how* to
//! walk the arena: descending to imminent leaves, delivering values across
//! coupled boundaries, dispatching the right transition and re-deriving
//! next-event times bottom-up.

use std::fmt;

use devs_core::{DevsError, DevsResult, Direction, Event, INFINITY, ModelId, PortId, PortRef};
use tracing::trace;

use crate::{Component, ComponentKind, Inputs, ModelTree, Outputs};

// ── TransitionKind ────────────────────────────────────────────────────────────

/// Which transition function a cycle applied to an atomic model.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionKind {
    Internal,
    External,
    Confluent,
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransitionKind::Internal  => "internal",
            TransitionKind::External  => "external",
            TransitionKind::Confluent => "confluent",
        })
    }
}

/// Outcome of dispatching one atomic model.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Transition {
    pub kind:    TransitionKind,
    /// Values waiting on the model's input ports when it transitioned.
    pub inputs:  usize,
    /// `t - tL` at the moment of the transition.
    pub elapsed: f64,
}

// ── CycleScratch ──────────────────────────────────────────────────────────────

/// Working sets of one cycle, kept between cycles to reuse allocations.
#[derive(Default, Debug)]
pub struct CycleScratch {
    /// Atomic models whose `tN` equals the cycle time.
    pub imminent:  Vec<ModelId>,
    /// Atomic models that received at least one value (sorted, unique once
    /// routing is finished).
    pub receivers: Vec<ModelId>,
    /// Values discarded at a port with no coupling or leaving through a
    /// root output port.
    pub dropped:   u64,
    /// Values placed on atomic input ports.
    pub delivered: u64,
    dirty:         Vec<PortRef>,
    ancestors:     Vec<ModelId>,
    stack:         Vec<ModelId>,
}

impl CycleScratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous cycle.
    pub fn reset(&mut self) {
        self.imminent.clear();
        self.receivers.clear();
        self.dirty.clear();
        self.ancestors.clear();
        self.stack.clear();
        self.dropped = 0;
        self.delivered = 0;
    }
}

// ── Cycle operations ──────────────────────────────────────────────────────────

impl ModelTree {
    /// Time of the next internal event anywhere in the tree (root `tN`).
    #[inline]
    pub fn next_time(&self) -> f64 {
        self.components[0].t_next
    }

    /// Call `initialize` on every atomic model, schedule it from `t0`, and
    /// derive every coupled `tN` bottom-up.
    pub fn initialize(&mut self, t0: f64) -> DevsResult<()> {
        for i in 0..self.atomics.len() {
            let id = self.atomics[i];
            let Component { t_last, t_next, kind, .. } = self.component_mut(id)?;
            let ComponentKind::Atomic { model, state } = kind else {
                return Err(DevsError::InvariantViolation(format!("{id} listed as atomic")));
            };
            model.initialize(state);
            let sigma = model.time_advance(state);
            check_sigma(id, sigma)?;
            *t_last = t0;
            *t_next = t0 + sigma;
        }
        // Ids are issued parents-first, so reverse order visits children
        // before their parent.
        for i in (0..self.components.len()).rev() {
            if !self.components[i].is_atomic() {
                self.refresh_coupled(ModelId(i as u32));
            }
        }
        Ok(())
    }

    /// Collect the atomic models whose `tN == t` into `scratch.imminent`.
    ///
    /// Descends only into coupled models whose own `tN` equals `t`, in
    /// declaration order.
    pub fn collect_imminent(&self, t: f64, scratch: &mut CycleScratch) {
        scratch.stack.clear();
        if self.components[0].t_next == t {
            scratch.stack.push(ModelId(0));
        }
        while let Some(id) = scratch.stack.pop() {
            let comp = &self.components[id.index()];
            match &comp.kind {
                ComponentKind::Atomic { .. } => scratch.imminent.push(id),
                ComponentKind::Coupled(c) => {
                    for &child in c.children().iter().rev() {
                        if self.components[child.index()].t_next == t {
                            scratch.stack.push(child);
                        }
                    }
                }
            }
        }
    }

    /// Run λ on atomic model `id`, filling its output ports.
    pub fn output(&mut self, id: ModelId, scratch: &mut CycleScratch) -> DevsResult<()> {
        let Component { outputs, kind, .. } = self.component_mut(id)?;
        let ComponentKind::Atomic { model, state } = kind else {
            return Err(DevsError::InvariantViolation(format!("output called on coupled {id}")));
        };
        model.output(state, &mut Outputs::new(outputs));
        for (i, port) in outputs.iter().enumerate() {
            if !port.is_empty() {
                scratch.dirty.push(PortRef::output(id, PortId(i as u16)));
            }
        }
        Ok(())
    }

    /// Deliver everything on `id`'s output ports along the coupling graph.
    pub fn route_outputs(&mut self, id: ModelId, scratch: &mut CycleScratch) {
        for i in 0..self.components[id.index()].outputs.len() {
            let port = &self.components[id.index()].outputs[i];
            if port.is_empty() {
                continue;
            }
            let values = port.values().to_vec();
            self.forward(PortRef::output(id, PortId(i as u16)), &values, scratch);
        }
    }

    /// Place `values` on one of the root's input ports and deliver them.
    pub fn inject(&mut self, port: PortRef, values: &[Event], scratch: &mut CycleScratch) -> DevsResult<()> {
        let root = self.root();
        if port.model != root || port.direction != Direction::In {
            return Err(DevsError::NotVisible { parent: root, port });
        }
        self.port_mut(port)?.add_values(values.iter().cloned());
        scratch.dirty.push(port);
        self.forward(port, values, scratch);
        Ok(())
    }

    /// Sort and deduplicate the receiver set once all routing is done.
    pub fn finish_routing(&self, scratch: &mut CycleScratch) {
        scratch.receivers.sort_unstable();
        scratch.receivers.dedup();
    }

    /// Apply δint, δext or δcon to atomic model `id` at time `t`, then
    /// reschedule it from its time advance.
    ///
    /// Returns `Ok(None)` when the model is neither imminent nor has input.
    ///
    /// # Panics
    /// Panics if `imminent` disagrees with the model's `tN`: that is a
    /// scheduling bug, not a model error.
    pub fn transition(&mut self, id: ModelId, t: f64, imminent: bool) -> DevsResult<Option<Transition>> {
        let Component { inputs, t_last, t_next, kind, .. } = self.component_mut(id)?;
        let ComponentKind::Atomic { model, state } = kind else {
            return Ok(None);
        };
        assert_eq!(imminent, *t_next == t, "{id}: imminent flag disagrees with tN={} at t={t}", *t_next);
        assert!(t >= *t_last, "{id}: transition at t={t} before tL={}", *t_last);

        let input = Inputs::new(inputs);
        let values = input.value_count();
        let elapsed = t - *t_last;
        let kind = match (imminent, values > 0) {
            (true, true) => {
                model.confluent_transition(state, elapsed, &input)?;
                TransitionKind::Confluent
            }
            (false, true) => {
                model.external_transition(state, elapsed, &input)?;
                TransitionKind::External
            }
            (true, false) => {
                model.internal_transition(state);
                TransitionKind::Internal
            }
            (false, false) => return Ok(None),
        };

        let sigma = model.time_advance(state);
        check_sigma(id, sigma)?;
        *t_last = t;
        *t_next = t + sigma;
        Ok(Some(Transition { kind, inputs: values, elapsed }))
    }

    /// Empty every port touched this cycle.
    pub fn clear_ports(&mut self, scratch: &mut CycleScratch) {
        for &port in &scratch.dirty {
            self.components[port.model.index()].ports_mut(port.direction)[port.port.index()].clear();
        }
        scratch.dirty.clear();
    }

    /// Re-derive `tL`/`tN` of every coupled ancestor of a model touched this
    /// cycle, deepest first.
    pub fn refresh_ancestors(&mut self, scratch: &mut CycleScratch) {
        scratch.ancestors.clear();
        for &id in scratch.imminent.iter().chain(&scratch.receivers) {
            let mut cur = self.components[id.index()].parent;
            while let Some(p) = cur {
                scratch.ancestors.push(p);
                cur = self.components[p.index()].parent;
            }
        }
        // Children always carry larger ids than their parent.
        scratch.ancestors.sort_unstable_by(|a, b| b.cmp(a));
        scratch.ancestors.dedup();
        for i in 0..scratch.ancestors.len() {
            self.refresh_coupled(scratch.ancestors[i]);
        }
    }

    /// Call `exit` on every atomic model.
    pub fn exit(&mut self) {
        for i in 0..self.atomics.len() {
            let id = self.atomics[i];
            if let ComponentKind::Atomic { model, state } = &mut self.components[id.index()].kind {
                model.exit(state);
            }
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Append `values` to every port wired to `src`, recursing through
    /// coupled boundary ports until each copy reaches an atomic input port or
    /// a port with no coupling.
    fn forward(&mut self, src: PortRef, values: &[Event], scratch: &mut CycleScratch) {
        let src_comp = &self.components[src.model.index()];
        let owner = match src.direction {
            Direction::Out => src_comp.parent,
            Direction::In if src_comp.is_atomic() => None,
            Direction::In => Some(src.model),
        };
        let Some(owner) = owner else {
            // An output of the root leaves the simulation.
            if src.direction == Direction::Out {
                trace!(port = %src, values = values.len(), "root output, values leave the simulation");
                scratch.dropped += values.len() as u64;
            }
            return;
        };
        let Some(coupled) = self.components[owner.index()].coupled() else { return };

        let dests = coupled.routes_from(&src);
        if dests.is_empty() {
            trace!(port = %src, values = values.len(), "no coupling, values dropped");
            scratch.dropped += values.len() as u64;
            return;
        }
        for dst in dests.to_vec() {
            let comp = &mut self.components[dst.model.index()];
            comp.ports_mut(dst.direction)[dst.port.index()].add_values(values.iter().cloned());
            scratch.dirty.push(dst);
            if comp.is_atomic() {
                scratch.receivers.push(dst.model);
                scratch.delivered += values.len() as u64;
            } else {
                self.forward(dst, values, scratch);
            }
        }
    }

    fn refresh_coupled(&mut self, id: ModelId) {
        let (mut t_next, mut t_last) = (INFINITY, 0.0f64);
        if let Some(c) = self.components[id.index()].coupled() {
            for &child in c.children() {
                let ch = &self.components[child.index()];
                t_next = t_next.min(ch.t_next);
                t_last = t_last.max(ch.t_last);
            }
        }
        let comp = &mut self.components[id.index()];
        comp.t_next = t_next;
        comp.t_last = t_last;
    }
}

fn check_sigma(id: ModelId, sigma: f64) -> DevsResult<()> {
    if sigma >= 0.0 {
        Ok(())
    } else {
        Err(DevsError::InvariantViolation(format!("{id}: time advance returned {sigma}")))
    }
}
