//! The `(phase, sigma)` pair every atomic model carries.

use std::borrow::Cow;
use std::fmt;

use devs_core::INFINITY;

/// Phase name used by [`AtomicState::default`] and [`AtomicState::passivate_in`] callers.
pub const PHASE_PASSIVE: &str = "passive";

/// Phase name set by [`AtomicState::activate`].
pub const PHASE_ACTIVE: &str = "active";

/// State-machine bookkeeping shared by all atomic models.
///
/// `sigma` is the time left until the next internal event; `+∞` means
/// passive.  Models change both fields together through
/// [`hold_in`](Self::hold_in) and its shorthands.
#[derive(Clone, Debug, PartialEq)]
pub struct AtomicState {
    phase: Cow<'static, str>,
    sigma: f64,
}

impl Default for AtomicState {
    fn default() -> Self {
        Self { phase: Cow::Borrowed(PHASE_PASSIVE), sigma: INFINITY }
    }
}

impl AtomicState {
    pub fn new(phase: impl Into<Cow<'static, str>>, sigma: f64) -> Self {
        let mut s = Self::default();
        s.hold_in(phase, sigma);
        s
    }

    #[inline]
    pub fn phase(&self) -> &str {
        &self.phase
    }

    #[inline]
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    #[inline]
    pub fn phase_is(&self, phase: &str) -> bool {
        self.phase == phase
    }

    #[inline]
    pub fn is_passive(&self) -> bool {
        self.sigma == INFINITY
    }

    /// Set phase and sigma together.
    ///
    /// # Panics
    /// Panics if `sigma` is negative or NaN.
    pub fn hold_in(&mut self, phase: impl Into<Cow<'static, str>>, sigma: f64) {
        assert!(sigma >= 0.0, "sigma must be non-negative, got {sigma}");
        self.phase = phase.into();
        self.sigma = sigma;
    }

    /// Keep the current phase and wait forever.
    #[inline]
    pub fn passivate(&mut self) {
        self.sigma = INFINITY;
    }

    /// Switch to `phase` and wait forever.
    pub fn passivate_in(&mut self, phase: impl Into<Cow<'static, str>>) {
        self.hold_in(phase, INFINITY);
    }

    /// `hold_in("active", 0)`: fire at the current instant.
    pub fn activate(&mut self) {
        self.hold_in(PHASE_ACTIVE, 0.0);
    }

    /// Resume the current activity after `elapsed` time units went by
    /// without an internal event.
    pub fn continue_for(&mut self, elapsed: f64) {
        if self.sigma != INFINITY {
            self.sigma = (self.sigma - elapsed).max(0.0);
        }
    }
}

impl fmt::Display for AtomicState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.phase, self.sigma)
    }
}
