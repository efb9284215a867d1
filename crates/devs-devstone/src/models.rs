//! The two DEVStone atomic models.

use std::time::{Duration, Instant};

use devs_core::{DevsResult, Event, PortId};
use devs_model::{Atomic, AtomicState, Inputs, Outputs, PHASE_ACTIVE, PortSpec};

// ── DevStoneAtomic ────────────────────────────────────────────────────────────

/// Passive until input arrives; then holds for `preparation_time` and emits
/// one value on `out`.
#[derive(Clone, Debug)]
pub struct DevStoneAtomic {
    preparation_time: f64,
    int_delay:        Duration,
    ext_delay:        Duration,
}

impl DevStoneAtomic {
    pub const IN:  PortId = PortId(0);
    pub const OUT: PortId = PortId(0);

    /// Delays are wall-clock busy work in milliseconds; zero skips it.
    pub fn new(preparation_time: f64, int_delay_ms: f64, ext_delay_ms: f64) -> Self {
        Self {
            preparation_time,
            int_delay: millis(int_delay_ms),
            ext_delay: millis(ext_delay_ms),
        }
    }
}

impl Atomic for DevStoneAtomic {
    fn ports(&self) -> PortSpec {
        PortSpec::new().input("in").output("out")
    }

    fn initialize(&mut self, state: &mut AtomicState) {
        state.passivate();
    }

    fn output(&self, _state: &AtomicState, out: &mut Outputs<'_>) {
        out.add_value(Self::OUT, Event::unit());
    }

    fn internal_transition(&mut self, state: &mut AtomicState) {
        burn(self.int_delay);
        state.passivate();
    }

    fn external_transition(&mut self, state: &mut AtomicState, _elapsed: f64, _input: &Inputs<'_>) -> DevsResult<()> {
        burn(self.ext_delay);
        state.hold_in(PHASE_ACTIVE, self.preparation_time);
        Ok(())
    }
}

// ── DevStoneGenerator ─────────────────────────────────────────────────────────

/// Emits the values `1..=max_events` on `out`, the first after
/// `preparation_time` and the rest every `period`.
#[derive(Clone, Debug)]
pub struct DevStoneGenerator {
    preparation_time: f64,
    period:           f64,
    max_events:       u64,
    counter:          u64,
}

impl DevStoneGenerator {
    pub const OUT: PortId = PortId(0);

    pub fn new(preparation_time: f64, period: f64, max_events: u64) -> Self {
        Self { preparation_time, period, max_events, counter: 1 }
    }

    /// Events emitted so far.
    pub fn emitted(&self) -> u64 {
        self.counter - 1
    }
}

impl Atomic for DevStoneGenerator {
    fn ports(&self) -> PortSpec {
        PortSpec::new().output("out")
    }

    fn initialize(&mut self, state: &mut AtomicState) {
        self.counter = 1;
        if self.max_events == 0 {
            state.passivate();
        } else {
            state.hold_in(PHASE_ACTIVE, self.preparation_time);
        }
    }

    fn output(&self, _state: &AtomicState, out: &mut Outputs<'_>) {
        out.send(Self::OUT, self.counter);
    }

    fn internal_transition(&mut self, state: &mut AtomicState) {
        self.counter += 1;
        if self.counter > self.max_events {
            state.passivate();
        } else {
            state.hold_in(PHASE_ACTIVE, self.period);
        }
    }

    fn external_transition(&mut self, state: &mut AtomicState, _elapsed: f64, _input: &Inputs<'_>) -> DevsResult<()> {
        state.passivate();
        Ok(())
    }
}

// ── Busy work ─────────────────────────────────────────────────────────────────

fn millis(ms: f64) -> Duration {
    if ms > 0.0 && ms.is_finite() { Duration::from_secs_f64(ms / 1_000.0) } else { Duration::ZERO }
}

/// Spin the CPU for `delay` of wall time.
fn burn(delay: Duration) {
    if delay.is_zero() {
        return;
    }
    let start = Instant::now();
    let mut acc = 0u64;
    while start.elapsed() < delay {
        acc = std::hint::black_box(acc.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1));
    }
}
