//! `devs-model` — atomic models, coupled composition and the model tree.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`state`]   | `AtomicState` — `(phase, sigma)` plus `hold_in`/`passivate`     |
//! | [`atomic`]  | `Atomic` trait (the five DEVS functions), `PortSpec`            |
//! | [`io`]      | `Inputs` / `Outputs` — port views handed to model callbacks     |
//! | [`coupled`] | `Coupled`, `Coupling`, `CouplingKind`                           |
//! | [`tree`]    | `ModelTree` arena — construction and read access                |
//! | [`engine`]  | `ModelTree` operations driven by the coordinator each cycle     |
//!
//! # Ownership model
//!
//! Every component lives in one `Vec` inside [`ModelTree`] and is addressed
//! by a [`ModelId`](devs_core::ModelId).  A coupled component owns its
//! children by id; couplings are pairs of [`PortRef`](devs_core::PortRef)s
//! resolved through the arena.  Dropping the tree drops every model.
//!
//! ```rust,ignore
//! let mut tree = ModelTree::new("gpt");
//! let root = tree.root();
//! let g = tree.add_atomic(root, "generator", Generator::new(1.0))?;
//! let p = tree.add_atomic(root, "processor", Processor::new(3.0))?;
//! tree.couple(root, g, "out", p, "in")?;
//! ```

pub mod atomic;
pub mod coupled;
pub mod engine;
pub mod io;
pub mod state;
pub mod tree;

#[cfg(test)]
mod tests;

pub use atomic::{AsAny, Atomic, PortSpec};
pub use coupled::{Coupled, Coupling, CouplingKind};
pub use engine::{CycleScratch, Transition, TransitionKind};
pub use io::{Inputs, Outputs};
pub use state::{AtomicState, PHASE_ACTIVE, PHASE_PASSIVE};
pub use tree::{Component, ComponentKind, ModelTree};
