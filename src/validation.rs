//! Validation facet (`spec.md` §6): rule registration plus `Constraints`, the
//! node-inferring convenience layer built on top of both the `Inference` and
//! `typir-infer`'s bare `ensure_assignable` constraint.

use typir_common::Problem;
use typir_graph::TypeGraph;
use typir_infer::{InferenceOutcome, ValidationCollector, ValidationMessage, ValidationRule};

use crate::Inference;

pub struct Validation<'a, N> {
    graph: &'a TypeGraph,
    collector: &'a mut ValidationCollector<N>,
}

impl<'a, N> Validation<'a, N> {
    pub(crate) fn new(graph: &'a TypeGraph, collector: &'a mut ValidationCollector<N>) -> Self {
        Self { graph, collector }
    }

    pub fn add_validation_rule(&mut self, rule: Box<dyn ValidationRule<N>>) {
        self.collector.add_validation_rule(rule);
    }

    /// `validate(node)` (`spec.md` §4.J).
    pub fn validate(&self, node: &N) -> Vec<ValidationMessage> {
        self.collector.validate(node, self.graph)
    }
}

/// `Validation.Constraints` (`spec.md` §6): unlike
/// [`typir_infer::validation::constraints::ensure_assignable`], which takes
/// already-resolved `TypeId`s, this variant infers `actual`/`expected` from
/// host nodes first — the shape §6's `ensureNodeIsAssignable(actualNode,
/// expectedNode, messageFn)` actually describes.
pub struct Constraints;

impl Constraints {
    pub fn ensure_node_is_assignable<N: Clone>(
        inference: &Inference<'_, N>,
        actual_node: &N,
        expected_node: &N,
        message: impl FnOnce(&Problem) -> String,
    ) -> Option<ValidationMessage> {
        let actual = match inference.infer_type(actual_node) {
            InferenceOutcome::Resolved(t) => t,
            InferenceOutcome::NotApplicable => {
                return Some(ValidationMessage::error("could not infer a type for the actual operand"));
            }
            InferenceOutcome::Failed(problem) => {
                return Some(ValidationMessage::error(format!("failed to infer the actual operand: {problem}")).with_problem(problem));
            }
        };
        let expected = match inference.infer_type(expected_node) {
            InferenceOutcome::Resolved(t) => t,
            InferenceOutcome::NotApplicable => {
                return Some(ValidationMessage::error("could not infer a type for the expected operand"));
            }
            InferenceOutcome::Failed(problem) => {
                return Some(ValidationMessage::error(format!("failed to infer the expected operand: {problem}")).with_problem(problem));
            }
        };
        typir_infer::constraints::ensure_assignable(inference.graph_ref(), actual, expected, message)
    }
}
