//! `devs-efp` — the classic experimental-frame / processor scenario.
//!
//! ```text
//!            ┌──────────── stop ◄──────────────┐
//!            ▼                                  │
//!      ┌───────────┐ out ─► in ┌───────────┐    │
//!      │ generator │──────────►│ processor │    │
//!      └───────────┘           └───────────┘    │
//!            │ out                   │ out      │
//!            ▼ arrived               ▼ solved   │
//!      ┌────────────────────────────────────┐   │
//!      │             transducer             │───┘ out
//!      └────────────────────────────────────┘
//! ```
//!
//! The generator emits a [`Job`] every `period`, starting at `t = 0`.  The
//! processor serves one job at a time for `3 × period` and ignores arrivals
//! while busy.  After `observation` time units the transducer reports
//! arrivals, completions, average turnaround and throughput, then stops the
//! generator.

pub mod gpt;
pub mod job;
pub mod models;


pub use gpt::{Gpt, build_gpt};
pub use job::Job;
pub use models::{Generator, Processor, Transducer, TransducerReport};
