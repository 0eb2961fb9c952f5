//! Relation facet (`spec.md` §6): thin borrow-scoped wrappers over
//! `typir-graph`'s equality/subtype/conversion/assignability queries, split
//! into one struct per relation the way §6 enumerates them.

use typir_common::Problem;
use typir_graph::edge::ConversionMode;
use typir_graph::{AssignabilityOutcome, PathStep, TypeGraph, TypeId};

pub struct Equality<'a> {
    graph: &'a TypeGraph,
}

impl<'a> Equality<'a> {
    pub(crate) fn new(graph: &'a TypeGraph) -> Self {
        Self { graph }
    }

    pub fn are_equal(&self, a: TypeId, b: TypeId) -> bool {
        self.graph.are_equal(a, b)
    }

    pub fn result(&self, a: TypeId, b: TypeId) -> Result<(), Problem> {
        self.graph.equality_result(a, b)
    }
}

/// Subtyping is queried through `&mut` because `markAsSubType` (its only
/// mutator) lives on the same facet, not because the reads themselves need
/// exclusive access (`spec.md` §4.E, §6).
pub struct Subtype<'a> {
    graph: &'a mut TypeGraph,
}

impl<'a> Subtype<'a> {
    pub(crate) fn new(graph: &'a mut TypeGraph) -> Self {
        Self { graph }
    }

    pub fn is_sub_type(&self, sub: TypeId, sup: TypeId) -> bool {
        self.graph.is_sub_type(sub, sup)
    }

    pub fn result(&self, sub: TypeId, sup: TypeId) -> Result<(), Problem> {
        self.graph.subtype_result(sub, sup)
    }

    /// `markAsSubType(sub, sup)` (`spec.md` §4.E): a would-be cycle is a
    /// recoverable `Problem`, not a fatal error, since whether an edge closes
    /// a cycle depends on the live graph's current shape rather than on a
    /// caller's own mistake.
    pub fn mark_as_sub_type(&mut self, sub: TypeId, sup: TypeId) -> Result<(), Problem> {
        self.graph.mark_as_sub_type(sub, sup, true)
    }
}

pub struct Conversion<'a> {
    graph: &'a mut TypeGraph,
}

impl<'a> Conversion<'a> {
    pub(crate) fn new(graph: &'a mut TypeGraph) -> Self {
        Self { graph }
    }

    pub fn is_convertible(&self, from: TypeId, to: TypeId) -> bool {
        self.graph.is_convertible(from, to)
    }

    pub fn mode(&self, from: TypeId, to: TypeId) -> Option<ConversionMode> {
        self.graph.convertible_mode(from, to)
    }

    pub fn result(&self, from: TypeId, to: TypeId) -> Result<ConversionMode, Problem> {
        self.graph.conversion_result(from, to)
    }

    /// `markAsConvertible(from, to, mode)` (`spec.md` §4.F).
    pub fn mark_as_convertible(&mut self, from: TypeId, to: TypeId, mode: ConversionMode) {
        self.graph.mark_as_convertible(from, to, mode);
    }
}

pub struct Assignability<'a> {
    graph: &'a TypeGraph,
}

impl<'a> Assignability<'a> {
    pub(crate) fn new(graph: &'a TypeGraph) -> Self {
        Self { graph }
    }

    pub fn is_assignable(&self, from: TypeId, to: TypeId) -> bool {
        self.graph.is_assignable(from, to)
    }

    pub fn result(&self, from: TypeId, to: TypeId) -> AssignabilityOutcome {
        self.graph.get_assignability_result(from, to)
    }

    pub fn path_or_problem(&self, from: TypeId, to: TypeId) -> Result<Vec<PathStep>, Problem> {
        self.graph.assignable_or_problem(from, to)
    }
}
