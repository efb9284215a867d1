//! Port views handed to model callbacks.

use std::any::Any;
use std::ops::Index;

use devs_core::{Event, Port, PortId};

/// Read-only view of an atomic model's input ports during a transition.
///
/// Indexed by [`PortId`] in declaration order; indexing past the declared
/// ports panics like slice indexing.
#[derive(Clone, Copy)]
pub struct Inputs<'a> {
    ports: &'a [Port],
}

impl<'a> Inputs<'a> {
    pub fn new(ports: &'a [Port]) -> Self {
        Self { ports }
    }

    /// Look a port up by name.
    pub fn get(&self, name: &str) -> Option<&'a Port> {
        self.ports.iter().find(|p| p.name() == name)
    }

    /// `true` if no input port holds a value.
    pub fn is_empty(&self) -> bool {
        self.ports.iter().all(Port::is_empty)
    }

    /// Total number of values across all input ports.
    pub fn value_count(&self) -> usize {
        self.ports.iter().map(Port::len).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'a, Port> {
        self.ports.iter()
    }

    /// Every payload of type `T` arriving on `port`, in order.
    pub fn values_of<T: Any>(&self, port: PortId) -> impl Iterator<Item = &'a T> + 'a {
        self.ports[port.index()]
            .values()
            .iter()
            .filter_map(Event::downcast_ref::<T>)
    }
}

impl Index<PortId> for Inputs<'_> {
    type Output = Port;

    fn index(&self, id: PortId) -> &Port {
        &self.ports[id.index()]
    }
}

/// Writable view of an atomic model's output ports during `output`.
pub struct Outputs<'a> {
    ports: &'a mut [Port],
}

impl<'a> Outputs<'a> {
    pub fn new(ports: &'a mut [Port]) -> Self {
        Self { ports }
    }

    /// Append an already-built event to `port`.
    #[inline]
    pub fn add_value(&mut self, port: PortId, value: Event) {
        self.ports[port.index()].add_value(value);
    }

    /// Wrap `value` in a fresh [`Event`] and append it to `port`.
    #[inline]
    pub fn send<T: Any + Send + Sync>(&mut self, port: PortId, value: T) {
        self.add_value(port, Event::new(value));
    }
}
