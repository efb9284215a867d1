//! Coupled components: children plus the coupling graph between them.

use std::fmt;

use devs_core::{Direction, ModelId, PortRef};

#[cfg(feature = "fx-hash")]
type RouteMap = rustc_hash::FxHashMap<PortRef, Vec<PortRef>>;
#[cfg(not(feature = "fx-hash"))]
type RouteMap = std::collections::HashMap<PortRef, Vec<PortRef>>;

/// Where a coupling sits relative to the coupled model that owns it.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum CouplingKind {
    /// External input coupling: own input port → child input port.
    Eic,
    /// Internal coupling: child output port → child input port.
    Ic,
    /// External output coupling: child output port → own output port.
    Eoc,
}

/// A directed wire from one output-side port to one input-side port.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Coupling {
    pub from: PortRef,
    pub to:   PortRef,
}

impl Coupling {
    /// Classify this coupling as seen from `owner`.
    pub fn kind(&self, owner: ModelId) -> CouplingKind {
        if self.from.model == owner {
            CouplingKind::Eic
        } else if self.to.model == owner {
            CouplingKind::Eoc
        } else {
            CouplingKind::Ic
        }
    }
}

impl fmt::Display for Coupling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// The composition part of a coupled component.
///
/// A coupled model has no transition functions; its next-event time is the
/// minimum over its children and is maintained by the tree.
#[derive(Default)]
pub struct Coupled {
    pub(crate) children:  Vec<ModelId>,
    pub(crate) couplings: Vec<Coupling>,
    routes:               RouteMap,
}

impl Coupled {
    /// Children in insertion order.
    #[inline]
    pub fn children(&self) -> &[ModelId] {
        &self.children
    }

    /// Couplings in insertion order.
    #[inline]
    pub fn couplings(&self) -> &[Coupling] {
        &self.couplings
    }

    /// Destinations wired to `from`, in insertion order.
    #[inline]
    pub fn routes_from(&self, from: &PortRef) -> &[PortRef] {
        self.routes.get(from).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn has_coupling(&self, c: &Coupling) -> bool {
        self.routes_from(&c.from).contains(&c.to)
    }

    pub(crate) fn push_coupling(&mut self, c: Coupling) {
        debug_assert!(
            matches!(
                (c.from.direction, c.to.direction),
                (Direction::In, Direction::In)
                    | (Direction::Out, Direction::In)
                    | (Direction::Out, Direction::Out)
            ),
            "unvalidated coupling {c}"
        );
        self.routes.entry(c.from).or_default().push(c.to);
        self.couplings.push(c);
    }
}
