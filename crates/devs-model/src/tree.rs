//! The model arena: construction and read access.

use devs_core::{DevsError, DevsResult, Direction, INFINITY, ModelId, Port, PortId, PortRef};

use crate::{Atomic, AtomicState, Coupled, Coupling};

// ── Component ─────────────────────────────────────────────────────────────────

/// What a component is, and the data only that kind has.
pub enum ComponentKind {
    Atomic {
        model: Box<dyn Atomic>,
        state: AtomicState,
    },
    Coupled(Coupled),
}

/// One node of the model tree.
pub struct Component {
    pub(crate) name:    String,
    pub(crate) parent:  Option<ModelId>,
    pub(crate) depth:   u32,
    pub(crate) inputs:  Vec<Port>,
    pub(crate) outputs: Vec<Port>,
    /// Time of the last transition (tL).
    pub(crate) t_last:  f64,
    /// Time of the next scheduled internal event (tN).
    pub(crate) t_next:  f64,
    pub(crate) kind:    ComponentKind,
}

impl Component {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn parent(&self) -> Option<ModelId> {
        self.parent
    }

    /// Nesting level; the root is 0.
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn inputs(&self) -> &[Port] {
        &self.inputs
    }

    #[inline]
    pub fn outputs(&self) -> &[Port] {
        &self.outputs
    }

    #[inline]
    pub fn t_last(&self) -> f64 {
        self.t_last
    }

    #[inline]
    pub fn t_next(&self) -> f64 {
        self.t_next
    }

    /// Time left until the next internal event, as seen from `t_last`.
    #[inline]
    pub fn sigma(&self) -> f64 {
        self.t_next - self.t_last
    }

    #[inline]
    pub fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    #[inline]
    pub fn is_atomic(&self) -> bool {
        matches!(self.kind, ComponentKind::Atomic { .. })
    }

    /// The atomic state, or `None` for a coupled component.
    pub fn state(&self) -> Option<&AtomicState> {
        match &self.kind {
            ComponentKind::Atomic { state, .. } => Some(state),
            ComponentKind::Coupled(_) => None,
        }
    }

    /// The composition data, or `None` for an atomic component.
    pub fn coupled(&self) -> Option<&Coupled> {
        match &self.kind {
            ComponentKind::Coupled(c) => Some(c),
            ComponentKind::Atomic { .. } => None,
        }
    }

    pub(crate) fn ports(&self, direction: Direction) -> &[Port] {
        match direction {
            Direction::In  => &self.inputs,
            Direction::Out => &self.outputs,
        }
    }

    pub(crate) fn ports_mut(&mut self, direction: Direction) -> &mut Vec<Port> {
        match direction {
            Direction::In  => &mut self.inputs,
            Direction::Out => &mut self.outputs,
        }
    }
}

// ── ModelTree ─────────────────────────────────────────────────────────────────

/// Arena owning a whole hierarchy of atomic and coupled components.
///
/// The tree is created with a coupled root; every other component is added
/// under an existing coupled parent, so ids are issued parents-first and no
/// component can have two parents.
///
/// # Example
///
/// ```rust,ignore
/// let mut tree = ModelTree::new("top");
/// let root = tree.root();
/// let sub = tree.add_coupled(root, "sub")?;
/// let sub_in = tree.add_in_port(sub, "in")?;
/// let relay = tree.add_atomic(sub, "relay", Relay)?;
/// tree.couple(sub, sub, "in", relay, "in")?;
/// ```
pub struct ModelTree {
    pub(crate) components: Vec<Component>,
    pub(crate) atomics:    Vec<ModelId>,
}

impl ModelTree {
    /// Create a tree whose root is an empty coupled model named `root_name`.
    pub fn new(root_name: impl Into<String>) -> Self {
        let root = Component {
            name:    root_name.into(),
            parent:  None,
            depth:   0,
            inputs:  Vec::new(),
            outputs: Vec::new(),
            t_last:  0.0,
            t_next:  INFINITY,
            kind:    ComponentKind::Coupled(Coupled::default()),
        };
        Self { components: vec![root], atomics: Vec::new() }
    }

    /// The root coupled model.
    #[inline]
    pub fn root(&self) -> ModelId {
        ModelId(0)
    }

    /// Number of components, root included.
    #[inline]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.components.len() == 1
    }

    /// Atomic components in insertion order.
    #[inline]
    pub fn atomic_ids(&self) -> &[ModelId] {
        &self.atomics
    }

    pub fn component(&self, id: ModelId) -> DevsResult<&Component> {
        self.components.get(id.index()).ok_or(DevsError::UnknownModel(id))
    }

    pub(crate) fn component_mut(&mut self, id: ModelId) -> DevsResult<&mut Component> {
        self.components.get_mut(id.index()).ok_or(DevsError::UnknownModel(id))
    }

    /// Id of the first component called `name`, in insertion order.
    pub fn find(&self, name: &str) -> Option<ModelId> {
        self.components
            .iter()
            .position(|c| c.name == name)
            .map(|i| ModelId(i as u32))
    }

    /// Dotted path from the root, e.g. `"top.sub.relay"`.
    pub fn path(&self, id: ModelId) -> DevsResult<String> {
        let mut parts = Vec::new();
        let mut cur = Some(id);
        while let Some(c) = cur {
            let comp = self.component(c)?;
            parts.push(comp.name.as_str());
            cur = comp.parent;
        }
        parts.reverse();
        Ok(parts.join("."))
    }

    /// State of an atomic component; `None` for coupled or unknown ids.
    pub fn atomic_state(&self, id: ModelId) -> Option<&AtomicState> {
        self.components.get(id.index()).and_then(Component::state)
    }

    /// Borrow an atomic model as its concrete type.
    pub fn atomic<A: Atomic>(&self, id: ModelId) -> Option<&A> {
        match &self.components.get(id.index())?.kind {
            ComponentKind::Atomic { model, .. } => {
                let model: &dyn Atomic = model.as_ref();
                model.as_any().downcast_ref::<A>()
            }
            ComponentKind::Coupled(_) => None,
        }
    }

    /// Mutably borrow an atomic model as its concrete type (between runs).
    pub fn atomic_mut<A: Atomic>(&mut self, id: ModelId) -> Option<&mut A> {
        match &mut self.components.get_mut(id.index())?.kind {
            ComponentKind::Atomic { model, .. } => {
                let model: &mut dyn Atomic = model.as_mut();
                model.as_any_mut().downcast_mut::<A>()
            }
            ComponentKind::Coupled(_) => None,
        }
    }

    pub fn port(&self, port: PortRef) -> DevsResult<&Port> {
        self.component(port.model)?
            .ports(port.direction)
            .get(port.port.index())
            .ok_or(DevsError::UnknownPort(port))
    }

    pub(crate) fn port_mut(&mut self, port: PortRef) -> DevsResult<&mut Port> {
        self.component_mut(port.model)?
            .ports_mut(port.direction)
            .get_mut(port.port.index())
            .ok_or(DevsError::UnknownPort(port))
    }

    /// `true` if every port in the tree is empty.
    pub fn all_ports_empty(&self) -> bool {
        self.components
            .iter()
            .all(|c| c.inputs.iter().chain(&c.outputs).all(Port::is_empty))
    }

    // ── Construction ──────────────────────────────────────────────────────

    /// Add an empty coupled child under `parent`.
    pub fn add_coupled(&mut self, parent: ModelId, name: impl Into<String>) -> DevsResult<ModelId> {
        self.push_component(parent, name.into(), ComponentKind::Coupled(Coupled::default()))
    }

    /// Move `model` into the tree as a child of `parent` and create the
    /// ports it declares.
    pub fn add_atomic<A: Atomic>(
        &mut self,
        parent: ModelId,
        name:   impl Into<String>,
        model:  A,
    ) -> DevsResult<ModelId> {
        self.add_boxed_atomic(parent, name, Box::new(model))
    }

    pub fn add_boxed_atomic(
        &mut self,
        parent: ModelId,
        name:   impl Into<String>,
        model:  Box<dyn Atomic>,
    ) -> DevsResult<ModelId> {
        let spec = model.ports();
        // Reject a bad declaration before the component joins the arena.
        let next = ModelId(self.components.len() as u32);
        for (direction, names) in [(Direction::In, &spec.inputs), (Direction::Out, &spec.outputs)] {
            for (i, name) in names.iter().enumerate() {
                if names[..i].contains(name) {
                    return Err(DevsError::DuplicatePort { model: next, direction, name: name.clone() });
                }
            }
            if names.len() > usize::from(u16::MAX) {
                return Err(DevsError::TooManyPorts(next));
            }
        }
        let id = self.push_component(
            parent,
            name.into(),
            ComponentKind::Atomic { model, state: AtomicState::default() },
        )?;
        for name in spec.inputs {
            self.add_port(id, Direction::In, name)?;
        }
        for name in spec.outputs {
            self.add_port(id, Direction::Out, name)?;
        }
        self.atomics.push(id);
        Ok(id)
    }

    /// Declare an input port on `model` (usually a coupled boundary port).
    pub fn add_in_port(&mut self, model: ModelId, name: impl Into<String>) -> DevsResult<PortRef> {
        self.add_port(model, Direction::In, name.into())
    }

    /// Declare an output port on `model` (usually a coupled boundary port).
    pub fn add_out_port(&mut self, model: ModelId, name: impl Into<String>) -> DevsResult<PortRef> {
        self.add_port(model, Direction::Out, name.into())
    }

    pub fn in_port(&self, model: ModelId, name: &str) -> DevsResult<PortRef> {
        self.lookup_port(model, Direction::In, name)
    }

    pub fn out_port(&self, model: ModelId, name: &str) -> DevsResult<PortRef> {
        self.lookup_port(model, Direction::Out, name)
    }

    /// Wire `from` to `to` inside coupled model `parent`.
    ///
    /// `from` must be one of `parent`'s input ports or a child's output
    /// port; `to` must be a child's input port or one of `parent`'s output
    /// ports.
    pub fn add_coupling(&mut self, parent: ModelId, from: PortRef, to: PortRef) -> DevsResult<()> {
        self.coupled(parent)?;
        self.port(from)?;
        self.port(to)?;

        self.check_endpoint(parent, from, Direction::In, Direction::Out, from, to)?;
        self.check_endpoint(parent, to, Direction::Out, Direction::In, from, to)?;
        if from.model == parent && to.model == parent {
            return Err(DevsError::SelfPassThrough(parent));
        }

        let coupling = Coupling { from, to };
        let coupled = self.coupled_mut(parent)?;
        if coupled.has_coupling(&coupling) {
            return Err(DevsError::DuplicateCoupling { from, to });
        }
        coupled.push_coupling(coupling);
        Ok(())
    }

    /// Name-based form of [`add_coupling`](Self::add_coupling).
    ///
    /// Port directions are inferred: a port of `parent` itself is a boundary
    /// port (input on the source side, output on the destination side), a
    /// port of a child is the child's output (source) or input (destination).
    pub fn couple(
        &mut self,
        parent:   ModelId,
        src:      ModelId,
        src_port: &str,
        dst:      ModelId,
        dst_port: &str,
    ) -> DevsResult<()> {
        let from = if src == parent {
            self.in_port(src, src_port)?
        } else {
            self.out_port(src, src_port)?
        };
        let to = if dst == parent {
            self.out_port(dst, dst_port)?
        } else {
            self.in_port(dst, dst_port)?
        };
        self.add_coupling(parent, from, to)
    }

    // ── Internals ─────────────────────────────────────────────────────────

    pub(crate) fn coupled(&self, id: ModelId) -> DevsResult<&Coupled> {
        self.component(id)?.coupled().ok_or(DevsError::NotCoupled(id))
    }

    fn coupled_mut(&mut self, id: ModelId) -> DevsResult<&mut Coupled> {
        match &mut self.component_mut(id)?.kind {
            ComponentKind::Coupled(c) => Ok(c),
            ComponentKind::Atomic { .. } => Err(DevsError::NotCoupled(id)),
        }
    }

    fn push_component(&mut self, parent: ModelId, name: String, kind: ComponentKind) -> DevsResult<ModelId> {
        let depth = self.component(parent)?.depth + 1;
        self.coupled(parent)?;
        let id = ModelId::try_from(self.components.len())
            .map_err(|_| DevsError::InvariantViolation("model arena is full".into()))?;
        self.components.push(Component {
            name,
            parent: Some(parent),
            depth,
            inputs: Vec::new(),
            outputs: Vec::new(),
            t_last: 0.0,
            t_next: INFINITY,
            kind,
        });
        self.coupled_mut(parent)?.children.push(id);
        Ok(id)
    }

    fn add_port(&mut self, model: ModelId, direction: Direction, name: String) -> DevsResult<PortRef> {
        let ports = self.component_mut(model)?.ports_mut(direction);
        if ports.iter().any(|p| p.name() == name) {
            return Err(DevsError::DuplicatePort { model, direction, name });
        }
        let port = PortId::try_from(ports.len()).map_err(|_| DevsError::TooManyPorts(model))?;
        ports.push(Port::new(name, direction));
        Ok(PortRef { model, direction, port })
    }

    fn lookup_port(&self, model: ModelId, direction: Direction, name: &str) -> DevsResult<PortRef> {
        self.component(model)?
            .ports(direction)
            .iter()
            .position(|p| p.name() == name)
            .map(|i| PortRef { model, direction, port: PortId(i as u16) })
            .ok_or_else(|| DevsError::NoSuchPortName { model, direction, name: name.to_owned() })
    }

    /// Check one coupling endpoint: a port of `parent` itself must have
    /// direction `own`, a port of a direct child must have direction `child`.
    fn check_endpoint(
        &self,
        parent:    ModelId,
        endpoint:  PortRef,
        own:       Direction,
        child:     Direction,
        from:      PortRef,
        to:        PortRef,
    ) -> DevsResult<()> {
        let expected = if endpoint.model == parent {
            own
        } else if self.component(endpoint.model)?.parent == Some(parent) {
            child
        } else {
            return Err(DevsError::NotVisible { parent, port: endpoint });
        };
        if endpoint.direction != expected {
            return Err(DevsError::DirectionMismatch { from, to });
        }
        Ok(())
    }
}
