//! `devs-devstone` — the DEVStone synthetic benchmark.
//!
//! DEVStone builds a tower of `depth` nested coupled models, each holding
//! `width - 1` atomic models plus the next level down.  The innermost level
//! holds a single atomic.  A generator at the root feeds `max_events` events
//! into the top of the tower; the number of transitions they trigger is
//! known in closed form for LI and HI, which makes the benchmark a
//! correctness check as well as a throughput test.
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`params`]   | `BenchKind`, `DevStoneParams` and their validation          |
//! | [`models`]   | `DevStoneAtomic`, `DevStoneGenerator`                       |
//! | [`builder`]  | LI / HI / HO / HOmod tree construction                      |
//! | [`formulas`] | expected transition counts and the HOmod event bound        |
//! | [`bench`]    | `run_benchmark` and its `BenchReport`                       |
//!
//! ```text
//!   gen ─► in ┌─────────────── C3 ───────────────┐ out
//!             │  in ┌──── C2 ────┐ out           │
//!             │ ───►│    ...     │───────────────►│
//!             │     └────────────┘                │
//!             │ ───► A3_1   ───► A3_2  ...        │
//!             └───────────────────────────────────┘
//! ```

pub mod bench;
pub mod builder;
pub mod error;
pub mod formulas;
pub mod models;
pub mod params;

#[cfg(test)]
mod tests;

pub use bench::{BenchReport, run_benchmark};
pub use builder::{DevStone, build_devstone};
pub use error::{BenchError, BenchResult};
pub use formulas::{expected_transitions, hi_expected, homod_event_bound, li_expected};
pub use models::{DevStoneAtomic, DevStoneGenerator};
pub use params::{BenchKind, DevStoneParams};
