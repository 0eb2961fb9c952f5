//! Inference facet (`spec.md` §6): `inferType` wired against overload
//! resolution as the two-step call-resolution callback (`spec.md` §4.H,
//! §4.I).

use typir_common::Problem;
use typir_graph::{TypeGraph, TypeId};
use typir_infer::{InferenceOutcome, InferenceRegistry, InferenceRule};

pub struct Inference<'a, N> {
    graph: &'a TypeGraph,
    registry: &'a mut InferenceRegistry<N>,
}

impl<'a, N> Inference<'a, N> {
    pub(crate) fn new(graph: &'a TypeGraph, registry: &'a mut InferenceRegistry<N>) -> Self {
        Self { graph, registry }
    }

    /// `addInferenceRule(rule, boundTo?)` (`spec.md` §4.H, §6).
    pub fn add_inference_rule(&mut self, rule: Box<dyn InferenceRule<N>>, bound_to: Option<TypeId>) -> usize {
        self.registry.add_inference_rule(rule, bound_to)
    }

    pub fn remove_inference_rule(&mut self, handle: usize) {
        self.registry.remove_inference_rule(handle);
    }

    pub(crate) fn graph_ref(&self) -> &TypeGraph {
        self.graph
    }

    /// `inferType(node)` (`spec.md` §4.H): a `Call { name, children }` rule
    /// outcome resolves its children recursively, then hands the name and
    /// their types to overload resolution (`spec.md` §4.I) to find the
    /// call's output type.
    pub fn infer_type(&self, node: &N) -> InferenceOutcome
    where
        N: Clone,
    {
        let limits = self.graph.limits();
        self.registry.infer_type(self.graph, node, |graph, name, arg_types| {
            resolve_call(graph, name, arg_types, &limits)
        })
    }
}

fn resolve_call(graph: &TypeGraph, name: &str, arg_types: &[TypeId], limits: &typir_common::EngineLimits) -> Result<TypeId, Problem> {
    match typir_infer::resolve_overload(graph, name, arg_types, limits)? {
        typir_infer::OverloadOutcome::Best { function, .. } => {
            let typir_graph::TypeNode {
                kind: typir_graph::TypeKind::Function(f),
                ..
            } = graph.get_type(function).expect("overload candidate must exist in the graph")
            else {
                unreachable!("resolve_overload only returns function-kind candidates")
            };
            Ok(f.output)
        }
        typir_infer::OverloadOutcome::Ambiguous { candidates } => Err(Problem::new(
            typir_common::ProblemKind::AmbiguousOverload,
            format!(
                "call to '{name}' is ambiguous between {} candidates",
                candidates.len()
            ),
        )),
    }
}
