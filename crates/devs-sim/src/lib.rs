//! `devs-sim` — the coordinator that drives a model tree through time.
//!
//! # Simulation cycle
//!
//! ```text
//! while tN(root) <= end:
//!   ① Advance   — global time = tN(root); models with tN == time are imminent.
//!   ② Output    — λ on every imminent atomic; nothing transitions yet.
//!   ③ Route     — values follow couplings, crossing coupled boundaries,
//!                 until they land on atomic input ports or are dropped.
//!   ④ Dispatch  — imminent + input  → δcon
//!                 input only        → δext(time - tL)
//!                 imminent only     → δint
//!   ⑤ Clear     — every port touched this cycle is emptied.
//!   ⑥ Refresh   — tL/tN re-derived for touched atomics and their ancestors.
//! ```
//!
//! # Cargo features
//!
//! | Feature   | Effect                                              |
//! |-----------|-----------------------------------------------------|
//! | `fx-hash` | FxHash for the coupling routing index.              |
//! | `serde`   | Serialize/Deserialize on `SimConfig` and `SimStats`. |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use devs_sim::{Coordinator, NoopObserver};
//!
//! let mut coord = Coordinator::new(tree);
//! coord.initialize()?;
//! let stats = coord.simulate(f64::INFINITY)?;
//! coord.exit()?;
//! println!("{} cycles, {} transitions", stats.cycles, stats.totals.transitions());
//! ```

pub mod config;
pub mod coordinator;
pub mod error;
pub mod observer;
pub mod stats;


pub use config::{DispatchOrder, SimConfig};
pub use coordinator::{Coordinator, CoordinatorState};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use stats::{SimStats, TransitionCounts};
