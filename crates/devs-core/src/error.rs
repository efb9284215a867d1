//! Kernel error type.
//!
//! Higher crates wrap `DevsError` as one variant of their own enum (see
//! `devs_sim::SimError`) rather than extending it.

use thiserror::Error;

use crate::{Direction, ModelId, PortRef};

/// Errors raised while building a model tree or by a misbehaving model.
#[derive(Debug, Error)]
pub enum DevsError {
    // ── Configuration errors (graph construction) ─────────────────────────
    #[error("model {0} not found")]
    UnknownModel(ModelId),

    #[error("port {0} not found")]
    UnknownPort(PortRef),

    #[error("model {model} has no {direction} port named {name:?}")]
    NoSuchPortName {
        model:     ModelId,
        direction: Direction,
        name:      String,
    },

    #[error("model {model} already has a {direction} port named {name:?}")]
    DuplicatePort {
        model:     ModelId,
        direction: Direction,
        name:      String,
    },

    #[error("model {0} is not a coupled model")]
    NotCoupled(ModelId),

    #[error("coupling {from} -> {to} has incompatible port directions")]
    DirectionMismatch { from: PortRef, to: PortRef },

    #[error("port {port} is not visible from coupled model {parent}")]
    NotVisible { parent: ModelId, port: PortRef },

    #[error("coupling {from} -> {to} already exists")]
    DuplicateCoupling { from: PortRef, to: PortRef },

    #[error("coupled model {0} cannot couple its own input to its own output")]
    SelfPassThrough(ModelId),

    #[error("model {0} has too many ports")]
    TooManyPorts(ModelId),

    // ── Protocol violations ───────────────────────────────────────────────
    #[error("port {name:?} is empty")]
    EmptyPort { name: String },

    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl DevsError {
    /// `true` for errors detected while wiring a tree, before simulation.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, DevsError::EmptyPort { .. } | DevsError::InvariantViolation(_))
    }
}

/// Shorthand result type for all `devs-*` crates.
pub type DevsResult<T> = Result<T, DevsError>;
