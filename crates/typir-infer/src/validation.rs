//! The validation collector (`spec.md` §4.J): an ordered list of
//! host-supplied rules that run on host nodes and surface typed problems,
//! plus the `Constraints` helper the Validation facet (`spec.md` §6)
//! promises embedders (`ensureNodeIsAssignable`).

use typir_common::Problem;
use typir_graph::{TypeGraph, TypeId};

/// Severity of a [`ValidationMessage`]. `spec.md` §4.J doesn't name severity
/// levels explicitly, but every validation-rule example it gives ("the
/// right-hand side ... must be assignable") is a hard constraint; `Warning`
/// and `Info` are carried for hosts that want softer diagnostics (unused
/// variable, deprecated API) without inventing a second collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// `ProblemMessage` from `spec.md` §4.J: a message plus, when the rule's
/// check was itself a relation query, the `Problem` that explains why it
/// failed.
#[derive(Debug, Clone)]
pub struct ValidationMessage {
    pub severity: Severity,
    pub message: String,
    pub problem: Option<Problem>,
}

impl ValidationMessage {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            problem: None,
        }
    }

    #[must_use]
    pub fn with_problem(mut self, problem: Problem) -> Self {
        self.problem = Some(problem);
        self
    }
}

/// `rule(node) -> [ProblemMessage]` (`spec.md` §4.J). Validation rules never
/// throw — an empty vec means "nothing to report", matching §7's "Validation
/// rules never throw; they return empty lists or problem lists".
pub trait ValidationRule<N> {
    fn validate(&self, node: &N, graph: &TypeGraph) -> Vec<ValidationMessage>;
}

/// `Validation.Collector` (`spec.md` §4.J, §6): an ordered list of rules,
/// run in registration order and concatenated.
#[derive(Default)]
pub struct ValidationCollector<N> {
    rules: Vec<Box<dyn ValidationRule<N>>>,
}

impl<N> ValidationCollector<N> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn add_validation_rule(&mut self, rule: Box<dyn ValidationRule<N>>) {
        self.rules.push(rule);
    }

    /// `validate(node)` (`spec.md` §4.J): runs every rule and concatenates
    /// their messages in registration order.
    pub fn validate(&self, node: &N, graph: &TypeGraph) -> Vec<ValidationMessage> {
        self.rules.iter().flat_map(|rule| rule.validate(node, graph)).collect()
    }
}

/// `Validation.Constraints` (`spec.md` §6): reusable building blocks rules
/// can call directly rather than re-deriving the assignability check.
pub mod constraints {
    use super::{Problem, TypeGraph, TypeId, ValidationMessage};

    /// `ensureNodeIsAssignable(actualNode, expectedNode, messageFn)`
    /// (`spec.md` §6), specialized to operate on already-inferred types —
    /// inferring `actual`/`expected` from host nodes is the caller's job
    /// (typically via the `Inference` facet), since this crate's validation
    /// module has no dependency on any one inference registry's node type.
    pub fn ensure_assignable(
        graph: &TypeGraph,
        actual: TypeId,
        expected: TypeId,
        message: impl FnOnce(&Problem) -> String,
    ) -> Option<ValidationMessage> {
        match graph.assignable_or_problem(actual, expected) {
            Ok(_) => None,
            Err(problem) => {
                let text = message(&problem);
                Some(ValidationMessage::error(text).with_problem(problem))
            }
        }
    }
}
