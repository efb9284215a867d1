//! Transition accounting returned by the coordinator.

use devs_core::ModelId;
use devs_model::{Transition, TransitionKind};

/// Transition counters for one atomic model, or summed over a tree.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionCounts {
    pub internal:  u64,
    pub external:  u64,
    pub confluent: u64,
    /// Input values consumed by external and confluent transitions.
    pub received:  u64,
}

impl TransitionCounts {
    /// All transitions of any kind.
    #[inline]
    pub fn transitions(&self) -> u64 {
        self.internal + self.external + self.confluent
    }

    fn record(&mut self, t: &Transition) {
        match t.kind {
            TransitionKind::Internal  => self.internal += 1,
            TransitionKind::External  => self.external += 1,
            TransitionKind::Confluent => self.confluent += 1,
        }
        self.received += t.inputs as u64;
    }
}

impl std::ops::AddAssign<&TransitionCounts> for TransitionCounts {
    fn add_assign(&mut self, rhs: &TransitionCounts) {
        self.internal += rhs.internal;
        self.external += rhs.external;
        self.confluent += rhs.confluent;
        self.received += rhs.received;
    }
}

/// Cumulative statistics of one coordinator, across every `simulate` call.
///
/// Owned by the coordinator rather than kept in process-wide counters, so
/// independent runs in one process never interfere.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimStats {
    /// Cycles executed (injections included).
    pub cycles:    u64,
    /// Simulated time of the last cycle.
    pub end_time:  f64,
    pub totals:    TransitionCounts,
    /// Indexed by `ModelId`; empty when per-model tracking is off.  Entries
    /// for coupled models stay zero.
    pub per_model: Vec<TransitionCounts>,
    /// Values placed on atomic input ports.
    pub delivered: u64,
    /// Values discarded at ports with no coupling, plus values leaving
    /// through root output ports.
    pub dropped:   u64,
}

impl SimStats {
    pub(crate) fn new(models: usize, per_model: bool) -> Self {
        Self {
            per_model: if per_model { vec![TransitionCounts::default(); models] } else { Vec::new() },
            ..Self::default()
        }
    }

    /// Counters of one model, if per-model tracking is on.
    pub fn model(&self, id: ModelId) -> Option<&TransitionCounts> {
        self.per_model.get(id.index())
    }

    /// Sum of the counters of `ids`.
    pub fn sum_over(&self, ids: impl IntoIterator<Item = ModelId>) -> TransitionCounts {
        let mut sum = TransitionCounts::default();
        for id in ids {
            if let Some(c) = self.model(id) {
                sum += c;
            }
        }
        sum
    }

    pub(crate) fn record(&mut self, id: ModelId, t: &Transition) {
        self.totals.record(t);
        if let Some(c) = self.per_model.get_mut(id.index()) {
            c.record(t);
        }
    }
}
