//! Coordinator configuration.

use crate::{SimError, SimResult};

/// Order in which the coordinator visits imminent models and receivers
/// within a cycle.
///
/// Parallel-DEVS semantics make the result independent of this order;
/// `Shuffled` exists to check that claim on real models.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DispatchOrder {
    /// Arena order: imminent models in declaration order, receivers by id.
    #[default]
    Declaration,
    /// Both sets permuted every cycle by a `SimRng` seeded with `seed`.
    Shuffled { seed: u64 },
}

/// Top-level coordinator configuration.
///
/// Typically built in code; with the `serde` feature it can also be loaded
/// from a file by the application crate.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    pub dispatch_order: DispatchOrder,

    /// Maximum consecutive cycles at one simulated instant before `simulate`
    /// gives up with [`SimError::Stalled`].  Catches models that keep
    /// scheduling zero-sigma events.  `None` disables the check.
    pub stall_limit: Option<u64>,

    /// Keep per-model transition counters in [`SimStats`](crate::SimStats).
    /// Totals are always kept.
    pub track_model_stats: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dispatch_order:    DispatchOrder::Declaration,
            stall_limit:       Some(1_000_000),
            track_model_stats: true,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> SimResult<()> {
        if self.stall_limit == Some(0) {
            return Err(SimError::Config("stall_limit must be at least 1".into()));
        }
        Ok(())
    }
}
