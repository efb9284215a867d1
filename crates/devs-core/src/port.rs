//! Ports: named, directional, ordered buffers of [`Event`]s.

use std::fmt;

use crate::{DevsError, DevsResult, Event, ModelId, PortId};

// ── Direction ─────────────────────────────────────────────────────────────────

/// Whether a port receives values (`In`) or emits them (`Out`).
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    In,
    Out,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::In  => f.write_str("in"),
            Direction::Out => f.write_str("out"),
        }
    }
}

// ── PortRef ───────────────────────────────────────────────────────────────────

/// Non-owning address of one port in a model tree.
///
/// Couplings are pairs of `PortRef`s; they are resolved through the arena, so
/// a `PortRef` never dangles as long as the tree that issued it is alive.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortRef {
    pub model:     ModelId,
    pub direction: Direction,
    pub port:      PortId,
}

impl PortRef {
    #[inline]
    pub fn input(model: ModelId, port: PortId) -> Self {
        Self { model, direction: Direction::In, port }
    }

    #[inline]
    pub fn output(model: ModelId, port: PortId) -> Self {
        Self { model, direction: Direction::Out, port }
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}[{}]", self.model, self.direction, self.port.0)
    }
}

// ── Port ──────────────────────────────────────────────────────────────────────

/// A named queue of events owned by exactly one model.
///
/// Values are only ever appended; [`clear`](Port::clear) is the single way
/// to empty the queue, and the coordinator calls it at the end of every cycle.
#[derive(Clone, Debug)]
pub struct Port {
    name:      String,
    direction: Direction,
    values:    Vec<Event>,
}

impl Port {
    pub fn new(name: impl Into<String>, direction: Direction) -> Self {
        Self { name: name.into(), direction, values: Vec::new() }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Append one value.
    #[inline]
    pub fn add_value(&mut self, value: Event) {
        self.values.push(value);
    }

    /// Append several values, preserving their order.
    pub fn add_values<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = Event>,
    {
        self.values.extend(values);
    }

    /// All values in insertion order.
    #[inline]
    pub fn values(&self) -> &[Event] {
        &self.values
    }

    /// The first value, for protocols that deliver exactly one per cycle.
    ///
    /// Fails with [`DevsError::EmptyPort`] when nothing arrived.
    pub fn single_value(&self) -> DevsResult<&Event> {
        self.values
            .first()
            .ok_or_else(|| DevsError::EmptyPort { name: self.name.clone() })
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Drop every queued value.
    #[inline]
    pub fn clear(&mut self) {
        self.values.clear();
    }
}
