//! [`TypeGraph`]: nodes (types) and labeled edges, deduplicated by
//! identifier, with synchronous listener delivery (`spec.md` §4.A).

use crate::edge::{ConversionMode, Edge, EdgeLabel};
use crate::id::TypeId;
use crate::kind::fixed_parameters::FixedParametersTemplate;
use crate::listener::{GraphCommand, GraphEvent, GraphListener};
use crate::node::{LifecycleState, TypeKind, TypeNode};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use std::collections::VecDeque;
use std::sync::Arc;
use typir_common::{EngineError, EngineLimits, Problem, ProblemKind};

/// Most nodes have only a handful of incident edges; inline a few before
/// spilling to the heap.
type EdgeVec = SmallVec<[Edge; 4]>;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum EdgeLabelKind {
    SubType,
    Conversion,
}

impl EdgeLabel {
    pub fn kind(self) -> EdgeLabelKind {
        match self {
            EdgeLabel::SubType => EdgeLabelKind::SubType,
            EdgeLabel::Conversion(_) => EdgeLabelKind::Conversion,
        }
    }
}

/// The engine's single mutable piece of state: every live type, every
/// explicit edge between them, the overload-group and fixed-parameters
/// template indexes that the relation services consult, and the relation
/// caches themselves (`spec.md` §9 "Caches").
pub struct TypeGraph {
    pub(crate) nodes: Vec<Option<TypeNode>>,
    pub(crate) identifiers: FxHashMap<Arc<str>, TypeId>,
    pub(crate) redirects: FxHashMap<TypeId, TypeId>,
    pub(crate) edges_out: FxHashMap<TypeId, EdgeVec>,
    pub(crate) edges_in: FxHashMap<TypeId, EdgeVec>,
    pub(crate) listeners: Vec<Box<dyn GraphListener>>,
    pub(crate) top: Option<TypeId>,
    pub(crate) bottom: Option<TypeId>,
    pub(crate) function_overloads: FxHashMap<Arc<str>, Vec<TypeId>>,
    pub(crate) fixed_parameters_templates: FxHashMap<Arc<str>, FixedParametersTemplate>,
    /// `referenced type -> set of types whose kind payload mentions it`.
    /// Drives the invalidation cascade on removal (`spec.md` §4.C).
    pub(crate) dependents: FxHashMap<TypeId, FxHashSet<TypeId>>,
    pub(crate) pending: Vec<crate::lifecycle::PendingType>,
    pub(crate) pending_errors: FxHashMap<TypeId, Problem>,
    pub(crate) limits: EngineLimits,
    pub(crate) equality_cache: std::cell::RefCell<FxHashMap<(TypeId, TypeId), bool>>,
    pub(crate) subtype_cache: std::cell::RefCell<FxHashMap<(TypeId, TypeId), bool>>,
    pub(crate) assignability_cache:
        std::cell::RefCell<FxHashMap<(TypeId, TypeId), crate::assignability::AssignabilityOutcome>>,
}

impl TypeGraph {
    pub fn new() -> Self {
        Self::with_limits(EngineLimits::default())
    }

    pub fn with_limits(limits: EngineLimits) -> Self {
        Self {
            nodes: Vec::new(),
            identifiers: FxHashMap::default(),
            redirects: FxHashMap::default(),
            edges_out: FxHashMap::default(),
            edges_in: FxHashMap::default(),
            listeners: Vec::new(),
            top: None,
            bottom: None,
            function_overloads: FxHashMap::default(),
            fixed_parameters_templates: FxHashMap::default(),
            dependents: FxHashMap::default(),
            pending: Vec::new(),
            pending_errors: FxHashMap::default(),
            limits,
            equality_cache: std::cell::RefCell::new(FxHashMap::default()),
            subtype_cache: std::cell::RefCell::new(FxHashMap::default()),
            assignability_cache: std::cell::RefCell::new(FxHashMap::default()),
        }
    }

    pub fn limits(&self) -> EngineLimits {
        self.limits
    }

    /// Follow duplicate-resolution redirects (`spec.md` §4.C) to the
    /// canonical id for a type. Cheap no-op for types that were never
    /// deduplicated away.
    pub fn resolve(&self, mut id: TypeId) -> TypeId {
        let mut guard = 0;
        while let Some(&next) = self.redirects.get(&id) {
            id = next;
            guard += 1;
            if guard > self.nodes.len() + 1 {
                break; // defensive: redirects should never cycle
            }
        }
        id
    }

    pub fn get_type(&self, id: TypeId) -> Option<&TypeNode> {
        let id = self.resolve(id);
        self.nodes.get(id.index()).and_then(|slot| slot.as_ref())
    }

    pub fn get_by_identifier(&self, identifier: &str) -> Option<TypeId> {
        self.identifiers.get(identifier).map(|&id| self.resolve(id))
    }

    pub fn all_types(&self) -> impl Iterator<Item = &TypeNode> {
        self.nodes.iter().filter_map(|slot| slot.as_ref())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn add_listener(&mut self, listener: Box<dyn GraphListener>) {
        self.listeners.push(listener);
    }

    // ------------------------------------------------------------------
    // Node/identifier management
    // ------------------------------------------------------------------

    pub(crate) fn push_node(&mut self, identifier: Arc<str>, kind: TypeKind, state: LifecycleState) -> TypeId {
        let id = TypeId::from_index(self.nodes.len());
        self.nodes.push(Some(TypeNode {
            id,
            identifier,
            kind,
            state,
        }));
        id
    }

    /// Create (or return the existing) type for `identifier`. Per `spec.md`
    /// §4.A: a duplicate identifier returns the existing node and does not
    /// emit an add event.
    pub fn create_type(&mut self, identifier: impl Into<Arc<str>>, kind: TypeKind) -> TypeId {
        let identifier = identifier.into();
        if let Some(&existing) = self.identifiers.get(&identifier) {
            let existing = self.resolve(existing);
            let existing_kind = self.nodes[existing.index()].as_ref().expect("dedup index points at a live node").kind.name();
            let requested_kind = kind.name();
            if existing_kind != requested_kind {
                EngineError::DuplicateIdentifierKindMismatch {
                    identifier,
                    existing_kind,
                    requested_kind,
                }
                .abort();
            }
            return existing;
        }
        let id = self.push_node(identifier.clone(), kind, LifecycleState::Completed);
        self.identifiers.insert(identifier, id);
        self.register_dependents(id);
        self.invalidate_caches();
        self.fire_type_added(id);
        self.advance_pending();
        id
    }

    pub fn remove_node(&mut self, id: TypeId) -> bool {
        let id = self.resolve(id);
        let Some(node) = self.nodes.get(id.index()).and_then(|s| s.as_ref()) else {
            return false;
        };
        let identifier = node.identifier.clone();

        // "Removing a type first emits edge-removal for incident edges,
        // then the type event" (spec.md §4.A).
        let incident: Vec<Edge> = self
            .edges_out
            .get(&id)
            .into_iter()
            .flatten()
            .chain(self.edges_in.get(&id).into_iter().flatten())
            .copied()
            .collect();
        for edge in incident {
            self.remove_edge_quiet(edge);
        }

        self.nodes[id.index()] = None;
        self.identifiers.remove(&identifier);
        self.invalidate_caches();
        self.invalidate_dependents(id);
        self.fire_type_removed(id);
        true
    }

    fn remove_edge_quiet(&mut self, edge: Edge) {
        if let Some(v) = self.edges_out.get_mut(&edge.from) {
            v.retain(|e| *e != edge);
        }
        if let Some(v) = self.edges_in.get_mut(&edge.to) {
            v.retain(|e| *e != edge);
        }
    }

    // ------------------------------------------------------------------
    // Edges
    // ------------------------------------------------------------------

    pub fn outgoing(&self, id: TypeId, label: EdgeLabelKind) -> Vec<Edge> {
        let id = self.resolve(id);
        self.edges_out
            .get(&id)
            .into_iter()
            .flatten()
            .filter(|e| e.label.kind() == label)
            .copied()
            .collect()
    }

    pub fn incoming(&self, id: TypeId, label: EdgeLabelKind) -> Vec<Edge> {
        let id = self.resolve(id);
        self.edges_in
            .get(&id)
            .into_iter()
            .flatten()
            .filter(|e| e.label.kind() == label)
            .copied()
            .collect()
    }

    pub(crate) fn add_edge_raw(&mut self, edge: Edge) {
        self.edges_out.entry(edge.from).or_default().push(edge);
        self.edges_in.entry(edge.to).or_default().push(edge);
        self.invalidate_caches();
    }

    /// `markAsSubType(sub, sup, { checkForCycles? })` (`spec.md` §4.E).
    /// Refuses an edge that would close a cycle unless `check_for_cycles`
    /// is `false`.
    pub fn mark_as_sub_type(&mut self, sub: TypeId, sup: TypeId, check_for_cycles: bool) -> Result<(), Problem> {
        let sub = self.resolve(sub);
        let sup = self.resolve(sup);
        if check_for_cycles && crate::subtype::reaches_via_subtype_edges(self, sup, sub) {
            return Err(Problem::new(
                ProblemKind::Initialization,
                format!("subtype edge {sub} -> {sup} would close a cycle"),
            )
            .with_type(self.identifier_of(sub))
            .with_type(self.identifier_of(sup)));
        }
        self.add_edge_raw(Edge::sub_type(sub, sup));
        tracing::trace!(?sub, ?sup, "markAsSubType: edge added");
        Ok(())
    }

    pub fn mark_as_convertible(&mut self, from: TypeId, to: TypeId, mode: ConversionMode) {
        let from = self.resolve(from);
        let to = self.resolve(to);
        self.add_edge_raw(Edge::conversion(from, to, mode));
        tracing::trace!(?from, ?to, ?mode, "markAsConvertible: edge added");
    }

    pub(crate) fn identifier_of(&self, id: TypeId) -> Arc<str> {
        self.get_type(id)
            .map(|n| n.identifier.clone())
            .unwrap_or_else(|| Arc::from(format!("{id}")))
    }

    // ------------------------------------------------------------------
    // Bottom/Top singletons
    // ------------------------------------------------------------------

    pub fn top(&self) -> Option<TypeId> {
        self.top
    }

    pub fn bottom(&self) -> Option<TypeId> {
        self.bottom
    }

    pub fn get_or_create_top(&mut self) -> TypeId {
        if let Some(id) = self.top {
            return id;
        }
        let id = self.create_type(crate::kind::top_bottom::TOP_IDENTIFIER, TypeKind::Top);
        self.top = Some(id);
        id
    }

    /// `Bottom.get()` (`spec.md` §6). On first construction, registers a
    /// listener that grants every *subsequently* added type a subtype edge
    /// from Bottom. Existing types get their edge added explicitly here,
    /// since they predate the listener.
    pub fn get_or_create_bottom(&mut self) -> TypeId {
        if let Some(id) = self.bottom {
            return id;
        }
        let id = self.create_type(crate::kind::top_bottom::BOTTOM_IDENTIFIER, TypeKind::Bottom);
        self.bottom = Some(id);
        let existing: Vec<TypeId> = self.all_types().map(|n| n.id).filter(|&t| t != id).collect();
        for other in existing {
            self.add_edge_raw(Edge::sub_type(id, other));
        }
        self.add_listener(Box::new(BottomListener { bottom: id }));
        id
    }

    // ------------------------------------------------------------------
    // Function overload groups (spec.md §4.B, §4.I)
    // ------------------------------------------------------------------

    /// Registers `id` under `name`'s overload group (`spec.md` §4.B, §4.I).
    /// Called by a `Functions`/`Operators` factory after `create_type`
    /// succeeds; not invoked automatically by `create_type` itself, since
    /// not every caller of `create_type` is creating a function.
    pub fn register_function(&mut self, name: Arc<str>, id: TypeId) {
        self.function_overloads.entry(name).or_default().push(id);
    }

    pub fn overload_group(&self, name: &str) -> &[TypeId] {
        self.function_overloads.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    // ------------------------------------------------------------------
    // Fixed-parameters templates (spec.md §4.B, §8 S4)
    // ------------------------------------------------------------------

    /// `FixedParameters(baseName, [paramNames], { variance })`: declares or
    /// redeclares a template. Redeclaring changes how *existing*
    /// instantiations subtype, since variance is looked up by base name at
    /// query time rather than baked into each instantiation.
    pub fn declare_fixed_parameters_template(&mut self, template: FixedParametersTemplate) {
        self.invalidate_caches();
        self.fixed_parameters_templates.insert(template.base_name.clone(), template);
    }

    pub fn fixed_parameters_template(&self, base_name: &str) -> Option<&FixedParametersTemplate> {
        self.fixed_parameters_templates.get(base_name)
    }

    // ------------------------------------------------------------------
    // Dependents / invalidation cascade (spec.md §4.C)
    // ------------------------------------------------------------------

    pub(crate) fn register_dependents(&mut self, id: TypeId) {
        let referenced = self.referenced_types(id);
        for r in referenced {
            self.dependents.entry(r).or_default().insert(id);
        }
    }

    fn referenced_types(&self, id: TypeId) -> Vec<TypeId> {
        match self.get_type(id).map(|n| &n.kind) {
            Some(TypeKind::Class(c)) => {
                let mut v: Vec<TypeId> = c.fields.iter().map(|f| f.type_id).collect();
                v.extend(c.super_classes.iter().copied());
                v
            }
            Some(TypeKind::Function(f)) => {
                let mut v: Vec<TypeId> = f.inputs.iter().map(|p| p.type_id).collect();
                v.push(f.output);
                v
            }
            Some(TypeKind::FixedParameters(fp)) => fp.parameter_types.clone(),
            _ => Vec::new(),
        }
    }

    fn invalidate_dependents(&mut self, removed: TypeId) {
        let Some(dependents) = self.dependents.remove(&removed) else {
            return;
        };
        for dep in dependents {
            if let Some(Some(node)) = self.nodes.get_mut(dep.index()) {
                if node.state != LifecycleState::Invalid {
                    node.state = LifecycleState::Invalid;
                    tracing::debug!(?dep, "invalidated: precondition type removed");
                    self.invalidate_dependents(dep);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Caches
    // ------------------------------------------------------------------

    pub(crate) fn invalidate_caches(&mut self) {
        self.equality_cache.borrow_mut().clear();
        self.subtype_cache.borrow_mut().clear();
        self.assignability_cache.borrow_mut().clear();
    }

    // ------------------------------------------------------------------
    // Listener event delivery (spec.md §4.A, §5, §9)
    // ------------------------------------------------------------------

    pub(crate) fn fire_type_added(&mut self, id: TypeId) {
        let mut queue = VecDeque::new();
        queue.push_back(GraphEvent::TypeAdded(id));
        self.drain_events(queue);
    }

    pub(crate) fn fire_type_removed(&mut self, id: TypeId) {
        let mut queue = VecDeque::new();
        queue.push_back(GraphEvent::TypeRemoved(id));
        self.drain_events(queue);
    }

    fn drain_events(&mut self, mut queue: VecDeque<GraphEvent>) {
        while let Some(event) = queue.pop_front() {
            let commands: Vec<GraphCommand> = self
                .listeners
                .iter()
                .flat_map(|l| match event {
                    GraphEvent::TypeAdded(id) => l.on_added_type(id),
                    GraphEvent::TypeRemoved(id) => l.on_removed_type(id),
                    GraphEvent::EdgeAdded(_) | GraphEvent::EdgeRemoved(_) => Vec::new(),
                })
                .collect();
            for command in commands {
                match command {
                    GraphCommand::AddSubTypeEdgeNoCycleCheck { from, to } => {
                        let edge = Edge::sub_type(from, to);
                        self.add_edge_raw(edge);
                        queue.push_back(GraphEvent::EdgeAdded(edge));
                    }
                }
            }
        }
    }
}

impl Default for TypeGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Realizes "Bottom subscribes to all future additions" (`spec.md` §4.B, §9)
/// via the generic listener mechanism.
struct BottomListener {
    bottom: TypeId,
}

impl GraphListener for BottomListener {
    fn on_added_type(&self, id: TypeId) -> Vec<GraphCommand> {
        if id == self.bottom {
            return Vec::new();
        }
        vec![GraphCommand::AddSubTypeEdgeNoCycleCheck {
            from: self.bottom,
            to: id,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::primitive::PrimitiveData;

    #[test]
    fn create_type_dedups_matching_kind() {
        let mut g = TypeGraph::new();
        let a = g.create_type("int", TypeKind::Primitive(PrimitiveData { name: "int".into() }));
        let b = g.create_type("int", TypeKind::Primitive(PrimitiveData { name: "int".into() }));
        assert_eq!(a, b);
    }

    #[test]
    #[should_panic(expected = "already registered as a primitive type")]
    fn create_type_aborts_on_kind_mismatch() {
        let mut g = TypeGraph::new();
        g.create_type("List", TypeKind::Primitive(PrimitiveData { name: "List".into() }));
        g.create_type(
            "List",
            TypeKind::FixedParameters(crate::kind::fixed_parameters::FixedParametersData {
                base_name: "List".into(),
                parameter_types: Vec::new(),
            }),
        );
    }
}
