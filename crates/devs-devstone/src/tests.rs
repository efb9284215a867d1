//! Integration tests for devs-devstone.

#[cfg(test)]
mod params_tests {
    use crate::{BenchError, BenchKind, DevStoneParams};

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("LI".parse::<BenchKind>().unwrap(), BenchKind::Li);
        assert_eq!("hi".parse::<BenchKind>().unwrap(), BenchKind::Hi);
        assert_eq!("HOmod".parse::<BenchKind>().unwrap(), BenchKind::HoMod);
        assert!(matches!("XX".parse::<BenchKind>(), Err(BenchError::InvalidParameter(_))));
    }

    #[test]
    fn kind_display_round_trips() {
        for kind in BenchKind::ALL {
            assert_eq!(kind.to_string().parse::<BenchKind>().unwrap(), kind);
        }
    }

    #[test]
    fn validation_limits() {
        assert!(DevStoneParams::new(BenchKind::Li, 2, 2, 1).validate().is_ok());
        assert!(DevStoneParams::new(BenchKind::Li, 1, 2, 1).validate().is_err());
        assert!(DevStoneParams::new(BenchKind::Li, 2, 1, 1).validate().is_err());
        assert!(DevStoneParams::new(BenchKind::Li, 2, 2, 0).validate().is_err());

        let p = DevStoneParams { period: 0.0, ..DevStoneParams::default() };
        assert!(p.validate().is_err());
        let p = DevStoneParams { preparation_time: -1.0, ..DevStoneParams::default() };
        assert!(p.validate().is_err());
        let p = DevStoneParams { ext_delay_ms: f64::NAN, ..DevStoneParams::default() };
        assert!(p.validate().is_err());
    }
}

#[cfg(test)]
mod formula_tests {
    use crate::{BenchKind, expected_transitions, hi_expected, homod_event_bound, li_expected};

    #[test]
    fn closed_forms() {
        assert_eq!(li_expected(5, 4, 1), 13);
        assert_eq!(li_expected(5, 4, 3), 39);
        assert_eq!(hi_expected(5, 4, 1), 31);
        assert_eq!(hi_expected(2, 10, 1), 10);
        assert_eq!(expected_transitions(BenchKind::Ho, 5, 4, 1), Some(31));
        assert_eq!(expected_transitions(BenchKind::HoMod, 5, 4, 1), None);
    }

    #[test]
    fn homod_bound_values() {
        assert_eq!(homod_event_bound(3, 1), 1);
        assert_eq!(homod_event_bound(2, 2), 4);
        assert_eq!(homod_event_bound(3, 2), 10);
        assert_eq!(homod_event_bound(3, 3), 64);
        assert_eq!(homod_event_bound(5, 4), 12_631);
    }

    #[test]
    fn homod_bound_saturates() {
        assert_eq!(homod_event_bound(1_000, 20), u64::MAX);
    }
}

#[cfg(test)]
mod builder_tests {
    use devs_model::ModelTree;

    use crate::{BenchKind, DevStoneGenerator, DevStoneParams, build_devstone};

    fn children(tree: &ModelTree, id: devs_core::ModelId) -> usize {
        tree.component(id).unwrap().coupled().unwrap().children().len()
    }

    #[test]
    fn li_sizes() {
        let s = build_devstone(&DevStoneParams::new(BenchKind::Li, 3, 3, 1)).unwrap();
        // root, generator, three coupled levels, (w-1)(d-1)+1 atomics
        assert_eq!(s.atomics.len(), 5);
        assert_eq!(s.tree.len(), 10);
        assert_eq!(s.tree.component(s.top).unwrap().name(), "C2");
        assert_eq!(children(&s.tree, s.top), 3);
    }

    #[test]
    fn homod_grid_size() {
        // rows of 2, 2, 1 atomics per level above the innermost
        let s = build_devstone(&DevStoneParams::new(BenchKind::HoMod, 3, 3, 1)).unwrap();
        assert_eq!(s.atomics.len(), 11);
        let s = build_devstone(&DevStoneParams::new(BenchKind::HoMod, 4, 2, 1)).unwrap();
        // 3 + 3 + 2 + 1, plus the innermost atomic
        assert_eq!(s.atomics.len(), 10);
    }

    #[test]
    fn aux_ports_only_where_needed() {
        for kind in BenchKind::ALL {
            let s = build_devstone(&DevStoneParams::new(kind, 2, 2, 1)).unwrap();
            assert_eq!(s.tree.in_port(s.top, "inAux").is_ok(), kind.has_aux_input());
            assert_eq!(s.tree.out_port(s.top, "outAux").is_ok(), kind == BenchKind::Ho);
        }
    }

    #[test]
    fn invalid_params_build_nothing() {
        assert!(build_devstone(&DevStoneParams::new(BenchKind::Hi, 1, 3, 1)).is_err());
    }

    #[test]
    fn generator_is_a_root_child() {
        let s = build_devstone(&DevStoneParams::new(BenchKind::Li, 2, 2, 4)).unwrap();
        assert_eq!(s.tree.component(s.generator).unwrap().parent(), Some(s.tree.root()));
        assert_eq!(s.tree.atomic::<DevStoneGenerator>(s.generator).unwrap().emitted(), 0);
    }
}

#[cfg(test)]
mod run_tests {
    use std::time::Duration;

    use devs_sim::{Coordinator, DispatchOrder, SimConfig};

    use crate::{BenchKind, DevStoneGenerator, DevStoneParams, build_devstone, homod_event_bound, run_benchmark};

    fn run(kind: BenchKind, w: u32, d: u32, m: u64) -> crate::BenchReport {
        run_benchmark(&DevStoneParams::new(kind, w, d, m), SimConfig::default()).unwrap()
    }

    #[test]
    fn li_matches_formula() {
        let r = run(BenchKind::Li, 5, 4, 1);
        assert_eq!((r.internal, r.external, r.events), (13, 13, 13));
        assert!(r.counts_match());

        let r = run(BenchKind::Li, 5, 4, 3);
        assert_eq!((r.internal, r.external), (39, 39));
        assert_eq!(r.end_time, 2.0);
    }

    #[test]
    fn hi_matches_formula() {
        let r = run(BenchKind::Hi, 5, 4, 1);
        assert_eq!((r.internal, r.external, r.events), (31, 31, 31));
        assert!(r.counts_match());

        let r = run(BenchKind::Hi, 4, 4, 1);
        assert_eq!(r.internal, 19);
        let r = run(BenchKind::Hi, 5, 4, 3);
        assert_eq!(r.internal, 93);
    }

    #[test]
    fn ho_matches_hi() {
        let r = run(BenchKind::Ho, 5, 4, 1);
        assert_eq!((r.internal, r.external, r.events), (31, 31, 31));
        assert!(r.counts_match());
    }

    #[test]
    fn homod_hits_bound_at_depth_two() {
        for w in 2..=6 {
            let r = run(BenchKind::HoMod, w, 2, 1);
            assert_eq!(r.events, homod_event_bound(w, 2), "w={w}");
            assert_eq!(r.internal, r.events);
            assert_eq!(r.external, r.events);
        }
    }

    #[test]
    fn homod_deeper_stays_under_bound() {
        let r = run(BenchKind::HoMod, 3, 3, 1);
        assert_eq!((r.internal, r.events), (29, 49));
        assert!(r.counts_match());

        let r = run(BenchKind::HoMod, 4, 3, 1);
        assert_eq!((r.internal, r.events), (64, 139));
        assert!(r.events <= r.event_bound.unwrap());
    }

    #[test]
    fn shuffled_order_same_counts() {
        for kind in BenchKind::ALL {
            let params = DevStoneParams::new(kind, 4, 3, 2);
            let a = run_benchmark(&params, SimConfig::default()).unwrap();
            let shuffled = SimConfig { dispatch_order: DispatchOrder::Shuffled { seed: 11 }, ..SimConfig::default() };
            let b = run_benchmark(&params, shuffled).unwrap();
            assert_eq!((a.internal, a.external, a.events, a.cycles), (b.internal, b.external, b.events, b.cycles));
        }
    }

    #[test]
    fn model_stats_forced_on() {
        let off = SimConfig { track_model_stats: false, ..SimConfig::default() };
        let r = run_benchmark(&DevStoneParams::new(BenchKind::Li, 3, 2, 1), off).unwrap();
        assert_eq!(r.internal, 3);
    }

    #[test]
    fn generator_emits_max_events() {
        let s = build_devstone(&DevStoneParams::new(BenchKind::Li, 2, 2, 5)).unwrap();
        let generator = s.generator;
        let mut coord = Coordinator::new(s.tree);
        coord.initialize().unwrap();
        coord.simulate(f64::INFINITY).unwrap();
        assert_eq!(coord.tree().atomic::<DevStoneGenerator>(generator).unwrap().emitted(), 5);
        assert_eq!(coord.time(), 4.0);
    }

    #[test]
    fn preparation_time_shifts_the_run() {
        let params = DevStoneParams { preparation_time: 0.5, ..DevStoneParams::new(BenchKind::Li, 3, 2, 1) };
        let r = run_benchmark(&params, SimConfig::default()).unwrap();
        assert_eq!(r.internal, 3);
        // first event at 0.5, atomics fire 0.5 later
        assert_eq!(r.end_time, 1.0);
    }

    #[test]
    fn busy_work_takes_wall_time() {
        let params = DevStoneParams {
            int_delay_ms: 0.5,
            ext_delay_ms: 0.5,
            ..DevStoneParams::new(BenchKind::Li, 2, 2, 1)
        };
        let r = run_benchmark(&params, SimConfig::default()).unwrap();
        // two atomics, one internal and one external each
        assert_eq!((r.internal, r.external), (2, 2));
        assert!(r.simulation >= Duration::from_millis(2));
    }

    #[test]
    fn report_prints_counts() {
        let text = run(BenchKind::Li, 5, 4, 1).to_string();
        assert!(text.contains("Benchmark:         LI"));
        assert!(text.contains("Num delta_int:     13, [13]"));
    }
}
