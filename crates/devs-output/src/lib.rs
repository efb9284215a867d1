//! `devs-output` — simulation trace writers.
//!
//! | Backend | Files created                       |
//! |---------|-------------------------------------|
//! | CSV     | `transitions.csv`, `cycles.csv`     |
//!
//! Writers implement [`OutputWriter`] and are driven by [`TraceObserver`],
//! which implements `devs_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use devs_output::{CsvWriter, TraceObserver};
//!
//! let writer = CsvWriter::new(Path::new("./trace"))?;
//! let mut obs = TraceObserver::new(writer);
//! coord.initialize_with(&mut obs)?;
//! coord.simulate_with(f64::INFINITY, &mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("trace error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::TraceObserver;
pub use row::{CycleRow, TransitionRow};
pub use writer::OutputWriter;
