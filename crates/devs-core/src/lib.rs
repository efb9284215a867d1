//! `devs-core` — message-passing substrate for the `devs` simulation kernel.
//!
//! This crate is a dependency of every other `devs-*` crate.  It has no
//! `devs-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `ModelId`, `PortId`                                       |
//! | [`time`]    | `INFINITY`, `is_passive`, `SimClock`                      |
//! | [`event`]   | `Event` — immutable, shared payload                       |
//! | [`port`]    | `Port`, `Direction`, `PortRef`                            |
//! | [`rng`]     | `SimRng` (seeded, used for shuffled dispatch order)       |
//! | [`error`]   | `DevsError`, `DevsResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids, `Direction` and     |
//!           | `PortRef`.                                                 |

pub mod error;
pub mod event;
pub mod ids;
pub mod port;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{DevsError, DevsResult};
pub use event::Event;
pub use ids::{ModelId, PortId};
pub use port::{Direction, Port, PortRef};
pub use rng::SimRng;
pub use time::{INFINITY, SimClock, is_passive};
