//! Generator, processor and transducer atomic models.

use devs_core::{DevsError, DevsResult, Event, PortId};
use devs_model::{Atomic, AtomicState, Inputs, Outputs, PHASE_ACTIVE, PHASE_PASSIVE, PortSpec};
use tracing::{debug, info};

use crate::Job;

// ── Generator ─────────────────────────────────────────────────────────────────

/// Emits a fresh [`Job`] every `period` until something arrives on `stop`.
#[derive(Clone, Debug)]
pub struct Generator {
    period:  f64,
    next_id: u64,
    /// Time of the last transition.
    clock:   f64,
}

impl Generator {
    pub const IN_STOP: PortId = PortId(0);
    pub const OUT:     PortId = PortId(0);

    pub fn new(period: f64) -> Self {
        Self { period, next_id: 0, clock: 0.0 }
    }

    /// Jobs emitted so far.
    pub fn emitted(&self) -> u64 {
        self.next_id
    }
}

impl Atomic for Generator {
    fn ports(&self) -> PortSpec {
        PortSpec::new().input("stop").output("out")
    }

    fn initialize(&mut self, state: &mut AtomicState) {
        self.next_id = 0;
        self.clock = 0.0;
        state.activate();
    }

    fn output(&self, state: &AtomicState, out: &mut Outputs<'_>) {
        out.send(Self::OUT, Job { id: self.next_id, time: self.clock + state.sigma() });
    }

    fn internal_transition(&mut self, state: &mut AtomicState) {
        self.clock += state.sigma();
        self.next_id += 1;
        state.hold_in(PHASE_ACTIVE, self.period);
    }

    fn external_transition(&mut self, state: &mut AtomicState, elapsed: f64, _input: &Inputs<'_>) -> DevsResult<()> {
        self.clock += elapsed;
        state.passivate_in(PHASE_PASSIVE);
        Ok(())
    }
}

// ── Processor ─────────────────────────────────────────────────────────────────

/// Serves one job at a time for `service_time`; arrivals while busy are lost.
#[derive(Clone, Debug)]
pub struct Processor {
    service_time: f64,
    current:      Option<Job>,
}

impl Processor {
    pub const IN:  PortId = PortId(0);
    pub const OUT: PortId = PortId(0);

    pub fn new(service_time: f64) -> Self {
        Self { service_time, current: None }
    }

    pub fn current(&self) -> Option<&Job> {
        self.current.as_ref()
    }
}

impl Atomic for Processor {
    fn ports(&self) -> PortSpec {
        PortSpec::new().input("in").output("out")
    }

    fn initialize(&mut self, state: &mut AtomicState) {
        self.current = None;
        state.passivate_in(PHASE_PASSIVE);
    }

    fn output(&self, state: &AtomicState, out: &mut Outputs<'_>) {
        if let (true, Some(job)) = (state.phase_is(PHASE_ACTIVE), self.current) {
            out.send(Self::OUT, job);
        }
    }

    fn internal_transition(&mut self, state: &mut AtomicState) {
        self.current = None;
        state.passivate_in(PHASE_PASSIVE);
    }

    fn external_transition(&mut self, state: &mut AtomicState, elapsed: f64, input: &Inputs<'_>) -> DevsResult<()> {
        if state.phase_is(PHASE_PASSIVE) {
            let job = *job_of(input[Self::IN].single_value()?)?;
            debug!(job = job.id, "processor accepted job");
            self.current = Some(job);
            state.hold_in(PHASE_ACTIVE, self.service_time);
        } else {
            state.continue_for(elapsed);
        }
        Ok(())
    }
}

// ── Transducer ────────────────────────────────────────────────────────────────

/// Figures reported by the [`Transducer`] at the end of its observation window.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TransducerReport {
    pub end_time:       f64,
    pub jobs_arrived:   u64,
    pub jobs_solved:    u64,
    /// Mean of `solved time - creation time` over solved jobs.
    pub avg_turnaround: f64,
    /// Solved jobs per time unit.
    pub throughput:     f64,
}

/// Observes arrivals and completions for `observation_time`, then reports
/// and sends `stop`.
#[derive(Clone, Debug)]
pub struct Transducer {
    observation_time: f64,
    jobs_arrived:     u64,
    jobs_solved:      u64,
    total_turnaround: f64,
    clock:            f64,
    report:           Option<TransducerReport>,
}

impl Transducer {
    pub const IN_ARRIVED: PortId = PortId(0);
    pub const IN_SOLVED:  PortId = PortId(1);
    pub const OUT:        PortId = PortId(0);

    pub fn new(observation_time: f64) -> Self {
        Self {
            observation_time,
            jobs_arrived:     0,
            jobs_solved:      0,
            total_turnaround: 0.0,
            clock:            0.0,
            report:           None,
        }
    }

    /// Figures as of the last transition.
    pub fn snapshot(&self) -> TransducerReport {
        let (avg_turnaround, throughput) = if self.jobs_solved > 0 {
            let throughput = if self.clock > 0.0 { self.jobs_solved as f64 / self.clock } else { 0.0 };
            (self.total_turnaround / self.jobs_solved as f64, throughput)
        } else {
            (0.0, 0.0)
        };
        TransducerReport {
            end_time: self.clock,
            jobs_arrived: self.jobs_arrived,
            jobs_solved: self.jobs_solved,
            avg_turnaround,
            throughput,
        }
    }

    /// The report produced when the observation window closed, if it has.
    pub fn report(&self) -> Option<&TransducerReport> {
        self.report.as_ref()
    }
}

impl Atomic for Transducer {
    fn ports(&self) -> PortSpec {
        PortSpec::new().input("arrived").input("solved").output("out")
    }

    fn initialize(&mut self, state: &mut AtomicState) {
        *self = Self::new(self.observation_time);
        state.hold_in(PHASE_ACTIVE, self.observation_time);
    }

    fn output(&self, state: &AtomicState, out: &mut Outputs<'_>) {
        if state.phase_is("done") {
            out.add_value(Self::OUT, Event::unit());
        }
    }

    fn internal_transition(&mut self, state: &mut AtomicState) {
        self.clock += state.sigma();
        if state.phase_is(PHASE_ACTIVE) {
            let report = self.snapshot();
            info!(
                end_time       = report.end_time,
                jobs_arrived   = report.jobs_arrived,
                jobs_solved    = report.jobs_solved,
                avg_turnaround = report.avg_turnaround,
                throughput     = report.throughput,
                "observation window closed"
            );
            self.report = Some(report);
            state.hold_in("done", 0.0);
        } else {
            state.passivate();
        }
    }

    fn external_transition(&mut self, state: &mut AtomicState, elapsed: f64, input: &Inputs<'_>) -> DevsResult<()> {
        self.clock += elapsed;
        state.continue_for(elapsed);
        if !state.phase_is(PHASE_ACTIVE) {
            return Ok(());
        }
        for value in input[Self::IN_ARRIVED].values() {
            let job = job_of(value)?;
            debug!(job = job.id, t = self.clock, "job arrived");
            self.jobs_arrived += 1;
        }
        for value in input[Self::IN_SOLVED].values() {
            let job = job_of(value)?;
            debug!(job = job.id, t = self.clock, "job solved");
            self.total_turnaround += self.clock - job.time;
            self.jobs_solved += 1;
        }
        Ok(())
    }

    /// Inputs first: a job arriving exactly when the window closes is counted.
    fn confluent_transition(&mut self, state: &mut AtomicState, elapsed: f64, input: &Inputs<'_>) -> DevsResult<()> {
        self.external_transition(state, elapsed, input)?;
        self.internal_transition(state);
        Ok(())
    }
}

fn job_of(value: &Event) -> DevsResult<&Job> {
    value
        .downcast_ref::<Job>()
        .ok_or_else(|| DevsError::InvariantViolation("expected a Job payload".into()))
}
