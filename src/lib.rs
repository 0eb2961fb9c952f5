//! `typir`: the embedder-facing facade over the type-system engine
//! (`spec.md` §6 "External Interfaces").
//!
//! An embedding host depends on this crate alone — [`Engine`] bundles the
//! type graph (`typir-graph`) and the rule-driven inference/overload/
//! validation layer (`typir-infer`) behind the five facets §6 names:
//! Factory, Relation, Inference, Validation, Infrastructure. `typir-graph`
//! and `typir-infer` stay usable standalone for an embedder that only wants
//! the relation services without the rule machinery, but most hosts want
//! this crate.
//!
//! `Engine<N>` is generic over the host's AST node type `N`, since inference
//! and validation rules both operate on host nodes (`spec.md` §1 "given an
//! abstract syntax provided by an embedding host").

pub mod factory;
pub mod inference;
pub mod relations;
pub mod validation;

use typir_common::EngineLimits;
use typir_graph::TypeGraph;
use typir_infer::{InferenceRegistry, ValidationCollector};

pub use typir_common::{EngineError, Problem, ProblemKind};
pub use typir_graph::{
    edge::ConversionMode,
    kind,
    AssignabilityOutcome, Edge, EdgeLabel, PathStep, TypeId, TypeKind, TypeNode,
};
pub use typir_infer::{
    CallInferenceRule, DeclarationInferenceRule, InferenceOutcome, InferenceRule, OverloadOutcome, RuleOutcome, Severity,
    ValidationMessage, ValidationRule,
};

pub use factory::{ClassFieldSpec, Classes, ClassSpec, FixedParametersFactory, FunctionSpec, Functions, Operators, Primitives};
pub use inference::Inference;
pub use relations::{Assignability, Conversion, Equality, Subtype};
pub use validation::Validation;

/// The engine (`spec.md` §6): one instance per embedded document/program.
/// Owns the type graph and the inference/validation registries; every facet
/// method borrows from this single piece of state.
pub struct Engine<N> {
    graph: TypeGraph,
    inference: InferenceRegistry<N>,
    validation: ValidationCollector<N>,
}

impl<N> Default for Engine<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Engine<N> {
    pub fn new() -> Self {
        Self::with_limits(EngineLimits::default())
    }

    pub fn with_limits(limits: EngineLimits) -> Self {
        Self {
            graph: TypeGraph::with_limits(limits),
            inference: InferenceRegistry::new(),
            validation: ValidationCollector::new(),
        }
    }

    /// The read-only Infrastructure facet (`spec.md` §6): enumeration and
    /// listener registration over the live type graph.
    pub fn graph(&self) -> &TypeGraph {
        &self.graph
    }

    /// `Printer` facet (`spec.md` §6, `SPEC_FULL.md` §4.K): a type's
    /// human-readable signature.
    pub fn print_type(&self, id: TypeId) -> String {
        self.graph.print_type(id)
    }

    pub fn print_graph(&self) -> String {
        self.graph.print_graph()
    }

    pub fn limits(&self) -> EngineLimits {
        self.graph.limits()
    }

    // ----------------------------------------------------------------
    // Factory facet
    // ----------------------------------------------------------------

    pub fn primitives(&mut self) -> Primitives<'_, N> {
        Primitives::new(&mut self.graph, &mut self.inference)
    }

    pub fn classes(&mut self) -> Classes<'_> {
        Classes::new(&mut self.graph)
    }

    pub fn functions(&mut self) -> Functions<'_, N> {
        Functions::new(&mut self.graph, &mut self.inference)
    }

    pub fn operators(&mut self) -> Operators<'_, N> {
        Operators::new(&mut self.graph, &mut self.inference)
    }

    pub fn fixed_parameters(&mut self) -> FixedParametersFactory<'_> {
        FixedParametersFactory::new(&mut self.graph)
    }

    pub fn top(&mut self) -> TypeId {
        self.graph.get_or_create_top()
    }

    pub fn bottom(&mut self) -> TypeId {
        self.graph.get_or_create_bottom()
    }

    /// `removeNode` (`spec.md` §4.A), plus evicting any inference rule bound
    /// to this type (`spec.md` §4.H: "bindings are removed automatically
    /// when that type is removed").
    pub fn remove_type(&mut self, id: TypeId) -> bool {
        self.inference.evict_rules_bound_to(self.graph.resolve(id));
        self.graph.remove_node(id)
    }

    // ----------------------------------------------------------------
    // Relation facet
    // ----------------------------------------------------------------

    pub fn equality(&self) -> Equality<'_> {
        Equality::new(&self.graph)
    }

    pub fn subtype(&mut self) -> Subtype<'_> {
        Subtype::new(&mut self.graph)
    }

    pub fn conversion(&mut self) -> Conversion<'_> {
        Conversion::new(&mut self.graph)
    }

    pub fn assignability(&self) -> Assignability<'_> {
        Assignability::new(&self.graph)
    }

    // ----------------------------------------------------------------
    // Inference facet
    // ----------------------------------------------------------------

    pub fn inference(&mut self) -> Inference<'_, N> {
        Inference::new(&self.graph, &mut self.inference)
    }

    // ----------------------------------------------------------------
    // Validation facet
    // ----------------------------------------------------------------

    pub fn validation(&mut self) -> Validation<'_, N> {
        Validation::new(&self.graph, &mut self.validation)
    }
}
