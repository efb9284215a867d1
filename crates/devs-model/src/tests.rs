//! Unit tests for devs-model: construction, routing and dispatch.

use devs_core::{DevsError, DevsResult, Event, INFINITY, ModelId, PortId};

use crate::{Atomic, AtomicState, CouplingKind, CycleScratch, Inputs, ModelTree, Outputs, PortSpec, TransitionKind};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Emits `value` once at `t = fire_at`, then passivates.
struct Source {
    fire_at: f64,
    value:   u32,
}

impl Atomic for Source {
    fn ports(&self) -> PortSpec {
        PortSpec::new().output("out")
    }
    fn initialize(&mut self, s: &mut AtomicState) {
        s.hold_in("armed", self.fire_at);
    }
    fn output(&self, _s: &AtomicState, out: &mut Outputs<'_>) {
        out.send(PortId(0), self.value);
    }
    fn internal_transition(&mut self, s: &mut AtomicState) {
        s.passivate_in("done");
    }
    fn external_transition(&mut self, _s: &mut AtomicState, _e: f64, _x: &Inputs<'_>) -> DevsResult<()> {
        Ok(())
    }
}

/// Records every value it receives; never fires on its own.
#[derive(Default)]
struct Sink {
    seen: Vec<u32>,
}

impl Atomic for Sink {
    fn ports(&self) -> PortSpec {
        PortSpec::new().input("in")
    }
    fn initialize(&mut self, s: &mut AtomicState) {
        s.passivate_in("idle");
    }
    fn output(&self, _s: &AtomicState, _out: &mut Outputs<'_>) {}
    fn internal_transition(&mut self, s: &mut AtomicState) {
        s.passivate();
    }
    fn external_transition(&mut self, s: &mut AtomicState, _e: f64, x: &Inputs<'_>) -> DevsResult<()> {
        self.seen.extend(x.values_of::<u32>(PortId(0)).copied());
        s.passivate_in("got");
        Ok(())
    }
}

/// Busy for `period`, counts received values; used for confluence checks.
#[derive(Clone, Default, PartialEq, Debug)]
struct Counter {
    period:   f64,
    received: u32,
    fired:    u32,
}

impl Atomic for Counter {
    fn ports(&self) -> PortSpec {
        PortSpec::new().input("in").output("out")
    }
    fn initialize(&mut self, s: &mut AtomicState) {
        s.hold_in("busy", self.period);
    }
    fn output(&self, _s: &AtomicState, out: &mut Outputs<'_>) {
        out.send(PortId(0), self.fired);
    }
    fn internal_transition(&mut self, s: &mut AtomicState) {
        self.fired += 1;
        s.passivate_in("idle");
    }
    fn external_transition(&mut self, s: &mut AtomicState, e: f64, x: &Inputs<'_>) -> DevsResult<()> {
        self.received += x.value_count() as u32;
        if s.phase_is("idle") {
            s.hold_in("busy", self.period);
        } else {
            s.continue_for(e);
        }
        Ok(())
    }
}

/// Run one full cycle by hand at the tree's next event time.
fn cycle(tree: &mut ModelTree, scratch: &mut CycleScratch) -> Vec<(ModelId, TransitionKind)> {
    let t = tree.next_time();
    scratch.reset();
    tree.collect_imminent(t, scratch);
    for &id in &scratch.imminent.clone() {
        tree.output(id, scratch).unwrap();
    }
    for &id in &scratch.imminent.clone() {
        tree.route_outputs(id, scratch);
    }
    tree.finish_routing(scratch);
    let mut touched: Vec<ModelId> = scratch.imminent.iter().chain(&scratch.receivers).copied().collect();
    touched.sort_unstable();
    touched.dedup();
    let mut done = Vec::new();
    for id in touched {
        let imminent = scratch.imminent.contains(&id);
        if let Some(tr) = tree.transition(id, t, imminent).unwrap() {
            done.push((id, tr.kind));
        }
    }
    tree.clear_ports(scratch);
    tree.refresh_ancestors(scratch);
    done
}

// ── Construction ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod construction_tests {
    use super::*;

    #[test]
    fn atomic_ports_follow_declaration() {
        let mut tree = ModelTree::new("top");
        let root = tree.root();
        let c = tree.add_atomic(root, "c", Counter::default()).unwrap();
        assert_eq!(tree.in_port(c, "in").unwrap().port, PortId(0));
        assert_eq!(tree.out_port(c, "out").unwrap().port, PortId(0));
        assert_eq!(tree.path(c).unwrap(), "top.c");
        assert_eq!(tree.atomic_ids(), &[c]);
    }

    #[test]
    fn duplicate_port_name_rejected() {
        let mut tree = ModelTree::new("top");
        let root = tree.root();
        tree.add_in_port(root, "in").unwrap();
        let err = tree.add_in_port(root, "in").unwrap_err();
        assert!(matches!(err, DevsError::DuplicatePort { .. }));
        assert!(err.is_configuration());
        // Same name on the other direction is fine.
        tree.add_out_port(root, "in").unwrap();
    }

    #[test]
    fn unknown_port_name_rejected() {
        let mut tree = ModelTree::new("top");
        let root = tree.root();
        let s = tree.add_atomic(root, "s", Sink::default()).unwrap();
        assert!(matches!(tree.in_port(s, "nope"), Err(DevsError::NoSuchPortName { .. })));
        assert!(matches!(tree.component(ModelId(99)), Err(DevsError::UnknownModel(_))));
    }

    #[test]
    fn children_only_under_coupled() {
        let mut tree = ModelTree::new("top");
        let root = tree.root();
        let s = tree.add_atomic(root, "s", Sink::default()).unwrap();
        let err = tree.add_atomic(s, "x", Sink::default()).unwrap_err();
        assert!(matches!(err, DevsError::NotCoupled(id) if id == s));
    }

    #[test]
    fn output_to_output_rejected() {
        let mut tree = ModelTree::new("top");
        let root = tree.root();
        let a = tree.add_atomic(root, "a", Source { fire_at: 1.0, value: 0 }).unwrap();
        let b = tree.add_atomic(root, "b", Counter::default()).unwrap();
        let from = tree.out_port(a, "out").unwrap();
        let to = tree.out_port(b, "out").unwrap();
        assert!(matches!(tree.add_coupling(root, from, to), Err(DevsError::DirectionMismatch { .. })));
    }

    #[test]
    fn grandchild_not_visible() {
        let mut tree = ModelTree::new("top");
        let root = tree.root();
        let sub = tree.add_coupled(root, "sub").unwrap();
        let a = tree.add_atomic(root, "a", Source { fire_at: 1.0, value: 0 }).unwrap();
        let deep = tree.add_atomic(sub, "deep", Sink::default()).unwrap();
        let err = tree.couple(root, a, "out", deep, "in").unwrap_err();
        assert!(matches!(err, DevsError::NotVisible { .. }));
    }

    #[test]
    fn duplicate_and_self_pass_through_rejected() {
        let mut tree = ModelTree::new("top");
        let root = tree.root();
        let sub = tree.add_coupled(root, "sub").unwrap();
        tree.add_in_port(sub, "in").unwrap();
        tree.add_out_port(sub, "out").unwrap();
        let s = tree.add_atomic(sub, "s", Sink::default()).unwrap();
        tree.couple(sub, sub, "in", s, "in").unwrap();
        assert!(matches!(tree.couple(sub, sub, "in", s, "in"), Err(DevsError::DuplicateCoupling { .. })));
        assert!(matches!(tree.couple(sub, sub, "in", sub, "out"), Err(DevsError::SelfPassThrough(_))));
    }

    #[test]
    fn atomic_downcast() {
        let mut tree = ModelTree::new("top");
        let root = tree.root();
        let c = tree.add_atomic(root, "c", Counter { period: 2.0, ..Counter::default() }).unwrap();
        assert_eq!(tree.atomic::<Counter>(c).unwrap().period, 2.0);
        assert!(tree.atomic::<Sink>(c).is_none());
        assert!(tree.atomic::<Counter>(root).is_none());
        tree.atomic_mut::<Counter>(c).unwrap().period = 5.0;
        assert_eq!(tree.atomic::<Counter>(c).unwrap().period, 5.0);
    }

    #[test]
    fn couplings_classified_by_owner() {
        let mut tree = ModelTree::new("top");
        let root = tree.root();
        let sub = tree.add_coupled(root, "sub").unwrap();
        tree.add_in_port(sub, "in").unwrap();
        tree.add_out_port(sub, "out").unwrap();
        let c = tree.add_atomic(sub, "c", Counter::default()).unwrap();
        let s = tree.add_atomic(sub, "s", Sink::default()).unwrap();
        tree.couple(sub, sub, "in", c, "in").unwrap();
        tree.couple(sub, c, "out", s, "in").unwrap();
        tree.couple(sub, c, "out", sub, "out").unwrap();

        let coupled = tree.component(sub).unwrap().coupled().unwrap();
        let kinds: Vec<_> = coupled.couplings().iter().map(|k| k.kind(sub)).collect();
        assert_eq!(kinds, [CouplingKind::Eic, CouplingKind::Ic, CouplingKind::Eoc]);

        assert_eq!(tree.find("s"), Some(s));
        assert_eq!(tree.find("nope"), None);
        assert_eq!(tree.path(s).unwrap(), "top.sub.s");
        assert_eq!(tree.component(root).unwrap().depth(), 0);
        assert_eq!(tree.component(sub).unwrap().depth(), 1);
        assert_eq!(tree.component(c).unwrap().depth(), 2);
    }
}

// ── Routing ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod routing_tests {
    use super::*;

    #[test]
    fn fan_out_reaches_every_destination_once() {
        let mut tree = ModelTree::new("top");
        let root = tree.root();
        let src = tree.add_atomic(root, "src", Source { fire_at: 1.0, value: 7 }).unwrap();
        let sinks: Vec<_> = (0..3)
            .map(|i| tree.add_atomic(root, format!("sink{i}"), Sink::default()).unwrap())
            .collect();
        for &s in &sinks {
            tree.couple(root, src, "out", s, "in").unwrap();
        }
        tree.initialize(0.0).unwrap();

        let mut scratch = CycleScratch::new();
        let done = cycle(&mut tree, &mut scratch);
        assert_eq!(done.len(), 4);
        for &s in &sinks {
            assert_eq!(tree.atomic::<Sink>(s).unwrap().seen, [7]);
            assert!(done.contains(&(s, TransitionKind::External)));
        }
        assert!(done.contains(&(src, TransitionKind::Internal)));
        assert!(tree.all_ports_empty());
        assert_eq!(scratch.delivered, 3);
    }

    #[test]
    fn fan_out_shares_one_event() {
        let mut tree = ModelTree::new("top");
        let root = tree.root();
        tree.add_in_port(root, "in").unwrap();
        let a = tree.add_atomic(root, "a", Sink::default()).unwrap();
        let b = tree.add_atomic(root, "b", Sink::default()).unwrap();
        tree.couple(root, root, "in", a, "in").unwrap();
        tree.couple(root, root, "in", b, "in").unwrap();
        tree.initialize(0.0).unwrap();

        let ev = Event::new(1u32);
        let mut scratch = CycleScratch::new();
        let port = tree.in_port(root, "in").unwrap();
        tree.inject(port, &[ev.clone()], &mut scratch).unwrap();
        let pa = tree.port(tree.in_port(a, "in").unwrap()).unwrap();
        let pb = tree.port(tree.in_port(b, "in").unwrap()).unwrap();
        assert!(pa.values()[0].ptr_eq(&ev));
        assert!(pb.values()[0].ptr_eq(&ev));
        tree.clear_ports(&mut scratch);
        assert!(tree.all_ports_empty());
    }

    #[test]
    fn values_cross_coupled_boundaries() {
        // top ┬ left(src)   left.out ──► right.in
        //     └ right(sink)
        let mut tree = ModelTree::new("top");
        let root = tree.root();
        let left = tree.add_coupled(root, "left").unwrap();
        let right = tree.add_coupled(root, "right").unwrap();
        tree.add_out_port(left, "out").unwrap();
        tree.add_in_port(right, "in").unwrap();
        let inner = tree.add_coupled(right, "inner").unwrap();
        tree.add_in_port(inner, "in").unwrap();

        let src = tree.add_atomic(left, "src", Source { fire_at: 2.5, value: 42 }).unwrap();
        let sink = tree.add_atomic(inner, "sink", Sink::default()).unwrap();
        tree.couple(left, src, "out", left, "out").unwrap();
        tree.couple(root, left, "out", right, "in").unwrap();
        tree.couple(right, right, "in", inner, "in").unwrap();
        tree.couple(inner, inner, "in", sink, "in").unwrap();
        tree.initialize(0.0).unwrap();
        assert_eq!(tree.next_time(), 2.5);
        assert_eq!(tree.component(left).unwrap().t_next(), 2.5);
        assert_eq!(tree.component(right).unwrap().t_next(), INFINITY);

        let mut scratch = CycleScratch::new();
        cycle(&mut tree, &mut scratch);
        assert_eq!(tree.atomic::<Sink>(sink).unwrap().seen, [42]);
        assert_eq!(tree.component(sink).unwrap().t_last(), 2.5);
        assert_eq!(tree.component(inner).unwrap().t_last(), 2.5);
        assert_eq!(tree.next_time(), INFINITY);
        assert!(tree.all_ports_empty());
    }

    #[test]
    fn uncoupled_output_is_dropped() {
        let mut tree = ModelTree::new("top");
        let root = tree.root();
        tree.add_atomic(root, "src", Source { fire_at: 1.0, value: 1 }).unwrap();
        tree.initialize(0.0).unwrap();
        let mut scratch = CycleScratch::new();
        let done = cycle(&mut tree, &mut scratch);
        assert_eq!(done.len(), 1);
        assert_eq!(scratch.dropped, 1);
        assert!(tree.all_ports_empty());
    }

    #[test]
    fn root_output_counts_as_dropped() {
        let mut tree = ModelTree::new("top");
        let root = tree.root();
        tree.add_out_port(root, "out").unwrap();
        let src = tree.add_atomic(root, "src", Source { fire_at: 1.0, value: 1 }).unwrap();
        tree.couple(root, src, "out", root, "out").unwrap();
        tree.initialize(0.0).unwrap();
        let mut scratch = CycleScratch::new();
        cycle(&mut tree, &mut scratch);
        assert_eq!((scratch.dropped, scratch.delivered), (1, 0));
        assert!(tree.all_ports_empty());
    }

    #[test]
    fn inject_only_into_root_inputs() {
        let mut tree = ModelTree::new("top");
        let root = tree.root();
        let s = tree.add_atomic(root, "s", Sink::default()).unwrap();
        let port = tree.in_port(s, "in").unwrap();
        let mut scratch = CycleScratch::new();
        assert!(matches!(
            tree.inject(port, &[Event::unit()], &mut scratch),
            Err(DevsError::NotVisible { .. })
        ));
    }
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod dispatch_tests {
    use super::*;

    #[test]
    fn confluent_when_imminent_and_receiving() {
        // Two counters with the same period feed each other: at t=3 both are
        // imminent and both receive → confluent on each.
        let mut tree = ModelTree::new("top");
        let root = tree.root();
        let a = tree.add_atomic(root, "a", Counter { period: 3.0, ..Counter::default() }).unwrap();
        let b = tree.add_atomic(root, "b", Counter { period: 3.0, ..Counter::default() }).unwrap();
        tree.couple(root, a, "out", b, "in").unwrap();
        tree.couple(root, b, "out", a, "in").unwrap();
        tree.initialize(0.0).unwrap();

        let mut scratch = CycleScratch::new();
        let done = cycle(&mut tree, &mut scratch);
        assert_eq!(done, [(a, TransitionKind::Confluent), (b, TransitionKind::Confluent)]);
        // Default δcon: δint (idle) then δext(0) (busy again for a period).
        let ca = tree.atomic::<Counter>(a).unwrap();
        assert_eq!((ca.fired, ca.received), (1, 1));
        assert_eq!(tree.atomic_state(a).unwrap(), &AtomicState::new("busy", 3.0));
        assert_eq!(tree.next_time(), 6.0);
    }

    #[test]
    fn default_confluence_matches_manual_sequence() {
        let mut port = devs_core::Port::new("in", devs_core::Direction::In);
        port.add_value(Event::new(9u32));
        let ports = [port];
        let input = Inputs::new(&ports);

        for phase in ["busy", "idle"] {
            let mut m1 = Counter { period: 4.0, ..Counter::default() };
            let mut s1 = AtomicState::new(phase, 0.0);
            let mut m2 = m1.clone();
            let mut s2 = s1.clone();

            m1.confluent_transition(&mut s1, 1.5, &input).unwrap();
            m2.internal_transition(&mut s2);
            m2.external_transition(&mut s2, 0.0, &input).unwrap();

            assert_eq!(m1, m2);
            assert_eq!(s1, s2);
        }
    }

    #[test]
    fn input_view_by_name_and_in_order() {
        let mut a = devs_core::Port::new("a", devs_core::Direction::In);
        let b = devs_core::Port::new("b", devs_core::Direction::In);
        a.add_value(Event::new(1u32));
        a.add_value(Event::new(2u32));
        let ports = [a, b];
        let input = Inputs::new(&ports);

        assert_eq!(input.get("a").unwrap().len(), 2);
        assert!(input.get("b").unwrap().is_empty());
        assert!(input.get("c").is_none());
        let names: Vec<_> = input.iter().map(|p| p.name()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(input.value_count(), 2);
        assert_eq!(input.values_of::<u32>(PortId(0)).copied().collect::<Vec<_>>(), [1, 2]);
    }

    #[test]
    fn external_sees_elapsed_time() {
        let mut tree = ModelTree::new("top");
        let root = tree.root();
        let src = tree.add_atomic(root, "src", Source { fire_at: 1.0, value: 0 }).unwrap();
        let c = tree.add_atomic(root, "c", Counter { period: 4.0, ..Counter::default() }).unwrap();
        tree.couple(root, src, "out", c, "in").unwrap();
        tree.initialize(0.0).unwrap();

        let mut scratch = CycleScratch::new();
        let done = cycle(&mut tree, &mut scratch);
        assert!(done.contains(&(c, TransitionKind::External)));
        // Busy with 4.0 total, 1.0 elapsed: still due at t=4.
        assert_eq!(tree.atomic_state(c).unwrap().sigma(), 3.0);
        assert_eq!(tree.component(c).unwrap().t_next(), 4.0);
    }

    #[test]
    fn untouched_models_keep_their_schedule() {
        let mut tree = ModelTree::new("top");
        let root = tree.root();
        tree.add_atomic(root, "early", Source { fire_at: 1.0, value: 0 }).unwrap();
        let late = tree.add_atomic(root, "late", Source { fire_at: 5.0, value: 0 }).unwrap();
        tree.initialize(0.0).unwrap();
        let mut scratch = CycleScratch::new();
        cycle(&mut tree, &mut scratch);
        assert_eq!(tree.component(late).unwrap().t_last(), 0.0);
        assert_eq!(tree.next_time(), 5.0);
        assert_eq!(tree.transition(late, 1.0, false).unwrap(), None);
    }

    #[test]
    fn state_helpers() {
        let mut s = AtomicState::default();
        assert!(s.is_passive());
        assert_eq!(s.phase(), "passive");
        s.hold_in("work", 2.0);
        s.continue_for(0.5);
        assert_eq!(s.sigma(), 1.5);
        s.passivate();
        assert_eq!(s.phase(), "work");
        assert!(s.is_passive());
        s.continue_for(3.0);
        assert!(s.is_passive());
        s.activate();
        assert_eq!((s.phase(), s.sigma()), ("active", 0.0));
    }

    #[test]
    #[should_panic(expected = "sigma must be non-negative")]
    fn negative_sigma_panics() {
        AtomicState::default().hold_in("bad", -1.0);
    }
}
