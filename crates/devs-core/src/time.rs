//! Simulated time.
//!
//! # Design
//!
//! Time is a plain `f64` in model units.  `+∞` is a legal value everywhere a
//! time or duration is expected and means "never": a model whose `sigma` is
//! infinite is *passive* and has no scheduled internal event.
//!
//! Equality of event times is exact (`==`).  Models that need two events to
//! be simultaneous must compute both times from the same arithmetic.

use std::fmt;

/// Time of a model that will never fire on its own.
pub const INFINITY: f64 = f64::INFINITY;

/// `true` if `t` is the passive sentinel.
#[inline]
pub fn is_passive(t: f64) -> bool {
    t == INFINITY
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Global simulation clock owned by the coordinator.
///
/// Besides the current time it counts how many consecutive cycles ran at that
/// same instant, which is what zero-sigma livelock detection looks at.
#[derive(Clone, Debug, Default)]
pub struct SimClock {
    time:        f64,
    same_time:   u64,
    cycles:      u64,
}

impl SimClock {
    /// A clock at `t = 0` that has not run any cycle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulated time.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Total cycles recorded with [`advance_to`](Self::advance_to).
    #[inline]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Consecutive cycles recorded at the current time.
    #[inline]
    pub fn cycles_at_current_time(&self) -> u64 {
        self.same_time
    }

    /// Move the clock to `t` for a new cycle.
    ///
    /// # Panics
    /// Panics if `t` is earlier than the current time or is NaN.
    pub fn advance_to(&mut self, t: f64) {
        assert!(t >= self.time, "simulated time went backwards: {} -> {}", self.time, t);
        if t == self.time && self.cycles > 0 {
            self.same_time += 1;
        } else {
            self.same_time = 1;
        }
        self.time = t;
        self.cycles += 1;
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={} (cycle {})", self.time, self.cycles)
    }
}
