//! The inference rule registry (`spec.md` §4.H): an ordered, composite
//! dispatcher over host nodes, including the two-step protocol used by
//! function/operator call inference.

use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;
use typir_common::{Problem, ProblemKind};
use typir_graph::{TypeGraph, TypeId};

/// What a single rule reports for one node, per `spec.md` §4.H's four-way
/// rule shape:
///
/// - `NotApplicable` — `InferenceRuleNotApplicable`.
/// - `Type(t)` — a final answer.
/// - `Call { name, children }` — the two-step protocol: the rule only
///   pattern-matched the node and named its operand subnodes; the engine
///   recurses into `children`, then resolves `name`'s overload group against
///   their inferred types (`spec.md` §4.H, §4.I).
/// - `Applicable(bool)` — the `boolean` case: `true` means "this node has
///   the type this rule is bound to" (only meaningful for a rule registered
///   with `bound_to: Some(_)`), `false` means not applicable.
pub enum RuleOutcome<N> {
    NotApplicable,
    Type(TypeId),
    Call { name: Arc<str>, children: Vec<N> },
    Applicable(bool),
}

/// A single inference rule (`spec.md` §4.H). Rules are tried in registration
/// order by [`InferenceRegistry::infer_type`]; the first final answer wins.
pub trait InferenceRule<N> {
    fn infer(&self, node: &N) -> RuleOutcome<N>;

    /// Used only for `tracing` spans; override for a more useful label than
    /// the type name.
    fn name(&self) -> &str {
        "inference rule"
    }
}

/// The three-way result of `inferType(node)` (`spec.md` §4.H): a resolved
/// type, "no rule matched at all", or a structured failure (a rule matched
/// but its two-step children failed, or an `Applicable(true)` rule wasn't
/// bound to a type).
#[derive(Debug, Clone)]
pub enum InferenceOutcome {
    Resolved(TypeId),
    NotApplicable,
    Failed(Problem),
}

struct Entry<N> {
    rule: Box<dyn InferenceRule<N>>,
    bound_to: Option<TypeId>,
}

/// Ordered registry of inference rules plus the auxiliary `Type -> [rule
/// index]` index `spec.md` §9 calls for, so that removing a bound type
/// evicts its rules in O(k) rather than a full O(n) rescan.
pub struct InferenceRegistry<N> {
    rules: Vec<Option<Entry<N>>>,
    bound_index: FxHashMap<TypeId, Vec<usize>>,
}

impl<N> Default for InferenceRegistry<N> {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            bound_index: FxHashMap::default(),
        }
    }
}

impl<N> fmt::Debug for InferenceRegistry<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceRegistry")
            .field("rule_count", &self.rules.iter().filter(|r| r.is_some()).count())
            .finish()
    }
}

impl<N> InferenceRegistry<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// `addInferenceRule(rule, boundTo?)` (`spec.md` §4.H, §6). Returns a
    /// handle usable with [`Self::remove_inference_rule`].
    pub fn add_inference_rule(&mut self, rule: Box<dyn InferenceRule<N>>, bound_to: Option<TypeId>) -> usize {
        let index = self.rules.len();
        if let Some(type_id) = bound_to {
            self.bound_index.entry(type_id).or_default().push(index);
        }
        self.rules.push(Some(Entry { rule, bound_to }));
        index
    }

    /// `removeInferenceRule(...)` (`spec.md` §6).
    pub fn remove_inference_rule(&mut self, handle: usize) {
        if let Some(Some(entry)) = self.rules.get_mut(handle) {
            if let Some(type_id) = entry.bound_to {
                if let Some(indices) = self.bound_index.get_mut(&type_id) {
                    indices.retain(|&i| i != handle);
                }
            }
        }
        if let Some(slot) = self.rules.get_mut(handle) {
            *slot = None;
        }
    }

    /// "Bindings are removed automatically when that type is removed"
    /// (`spec.md` §4.H). The embedding `typir::Engine` calls this whenever
    /// it removes a type from the graph, ahead of the graph mutation.
    pub fn evict_rules_bound_to(&mut self, type_id: TypeId) {
        if let Some(indices) = self.bound_index.remove(&type_id) {
            for index in indices {
                if let Some(slot) = self.rules.get_mut(index) {
                    *slot = None;
                }
            }
        }
    }

    /// `inferType(node)` (`spec.md` §4.H). `resolve_call` is handed the
    /// overload group + argument types a two-step rule surfaces, since
    /// overload resolution (§4.I) lives in [`crate::overload`] and doesn't
    /// need to know anything about rules.
    pub fn infer_type(
        &self,
        graph: &TypeGraph,
        node: &N,
        resolve_call: impl Fn(&TypeGraph, &str, &[TypeId]) -> Result<TypeId, Problem>,
    ) -> InferenceOutcome
    where
        N: Clone,
    {
        for entry in self.rules.iter().flatten() {
            match entry.rule.infer(node) {
                RuleOutcome::NotApplicable => continue,
                RuleOutcome::Type(t) => {
                    tracing::trace!(rule = entry.rule.name(), "inference rule matched with a final type");
                    return InferenceOutcome::Resolved(t);
                }
                RuleOutcome::Applicable(true) => match entry.bound_to {
                    Some(t) => return InferenceOutcome::Resolved(t),
                    None => {
                        tracing::debug!(
                            rule = entry.rule.name(),
                            "boolean inference rule matched but was not bound to a type"
                        );
                        continue;
                    }
                },
                RuleOutcome::Applicable(false) => continue,
                RuleOutcome::Call { name, children } => {
                    let mut arg_types = Vec::with_capacity(children.len());
                    for child in &children {
                        match self.infer_type(graph, child, &resolve_call) {
                            InferenceOutcome::Resolved(t) => arg_types.push(t),
                            InferenceOutcome::NotApplicable => {
                                return InferenceOutcome::Failed(Problem::new(
                                    ProblemKind::Inference,
                                    format!("no inference rule applicable to an operand of call '{name}'"),
                                ));
                            }
                            InferenceOutcome::Failed(problem) => {
                                return InferenceOutcome::Failed(
                                    Problem::new(
                                        ProblemKind::Inference,
                                        format!("failed to infer an operand of call '{name}'"),
                                    )
                                    .with_nested(problem),
                                );
                            }
                        }
                    }
                    return match resolve_call(graph, &name, &arg_types) {
                        Ok(t) => InferenceOutcome::Resolved(t),
                        Err(problem) => InferenceOutcome::Failed(problem),
                    };
                }
            }
        }
        InferenceOutcome::NotApplicable
    }
}

/// Reusable rule: recognizes a host node as a *call* by name and hands back
/// its operand subnodes for the two-step protocol (`spec.md` §4.H). The
/// building block behind `Functions.create({ inference_rule_for_calls })`
/// and every `Operators.create*` factory (`spec.md` §6).
pub struct CallInferenceRule<N> {
    name: Arc<str>,
    matcher: Box<dyn Fn(&N) -> Option<Vec<N>>>,
}

impl<N> CallInferenceRule<N> {
    pub fn new(name: Arc<str>, matcher: impl Fn(&N) -> Option<Vec<N>> + 'static) -> Self {
        Self {
            name,
            matcher: Box::new(matcher),
        }
    }
}

impl<N> InferenceRule<N> for CallInferenceRule<N> {
    fn infer(&self, node: &N) -> RuleOutcome<N> {
        match (self.matcher)(node) {
            Some(children) => RuleOutcome::Call {
                name: self.name.clone(),
                children,
            },
            None => RuleOutcome::NotApplicable,
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Reusable rule: recognizes a host node as *being* a particular type
/// outright, with no children to recurse into — the building block behind
/// `Primitives.create({ inference_rules })` and
/// `Functions.create({ inference_rule_for_declaration })` (`spec.md` §6).
pub struct DeclarationInferenceRule<N> {
    label: &'static str,
    type_id: TypeId,
    matcher: Box<dyn Fn(&N) -> bool>,
}

impl<N> DeclarationInferenceRule<N> {
    pub fn new(label: &'static str, type_id: TypeId, matcher: impl Fn(&N) -> bool + 'static) -> Self {
        Self {
            label,
            type_id,
            matcher: Box::new(matcher),
        }
    }
}

impl<N> InferenceRule<N> for DeclarationInferenceRule<N> {
    fn infer(&self, node: &N) -> RuleOutcome<N> {
        if (self.matcher)(node) {
            RuleOutcome::Type(self.type_id)
        } else {
            RuleOutcome::NotApplicable
        }
    }

    fn name(&self) -> &str {
        self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typir_graph::kind::primitive::PrimitiveData;
    use typir_graph::TypeKind;

    #[derive(Clone)]
    struct Node(&'static str);

    struct LiteralRule {
        tag: &'static str,
        ty: TypeId,
    }

    impl InferenceRule<Node> for LiteralRule {
        fn infer(&self, node: &Node) -> RuleOutcome<Node> {
            if node.0 == self.tag {
                RuleOutcome::Type(self.ty)
            } else {
                RuleOutcome::NotApplicable
            }
        }
    }

    fn primitive(g: &mut TypeGraph, name: &str) -> TypeId {
        g.create_type(name, TypeKind::Primitive(PrimitiveData { name: name.into() }))
    }

    #[test]
    fn first_matching_rule_wins_in_registration_order() {
        let mut g = TypeGraph::new();
        let int = primitive(&mut g, "int");
        let string = primitive(&mut g, "string");
        let mut registry: InferenceRegistry<Node> = InferenceRegistry::new();
        registry.add_inference_rule(Box::new(LiteralRule { tag: "lit", ty: int }), None);
        registry.add_inference_rule(Box::new(LiteralRule { tag: "lit", ty: string }), None);

        let never_resolve = |_: &TypeGraph, _: &str, _: &[TypeId]| -> Result<TypeId, Problem> { unreachable!() };
        let outcome = registry.infer_type(&g, &Node("lit"), never_resolve);
        assert!(matches!(outcome, InferenceOutcome::Resolved(t) if t == int));
    }

    #[test]
    fn no_rule_matches_is_not_applicable() {
        let g = TypeGraph::new();
        let registry: InferenceRegistry<Node> = InferenceRegistry::new();
        let never_resolve = |_: &TypeGraph, _: &str, _: &[TypeId]| -> Result<TypeId, Problem> { unreachable!() };
        let outcome = registry.infer_type(&g, &Node("nope"), never_resolve);
        assert!(matches!(outcome, InferenceOutcome::NotApplicable));
    }

    #[test]
    fn bound_rule_evicted_when_its_type_is_removed() {
        let mut g = TypeGraph::new();
        let int = primitive(&mut g, "int");
        let mut registry: InferenceRegistry<Node> = InferenceRegistry::new();
        registry.add_inference_rule(Box::new(LiteralRule { tag: "lit", ty: int }), Some(int));
        registry.evict_rules_bound_to(int);
        let never_resolve = |_: &TypeGraph, _: &str, _: &[TypeId]| -> Result<TypeId, Problem> { unreachable!() };
        let outcome = registry.infer_type(&g, &Node("lit"), never_resolve);
        assert!(matches!(outcome, InferenceOutcome::NotApplicable));
    }

    #[test]
    fn two_step_call_rule_infers_children_then_resolves() {
        let mut g = TypeGraph::new();
        let int = primitive(&mut g, "int");
        struct CallRule;
        impl InferenceRule<Node> for CallRule {
            fn infer(&self, node: &Node) -> RuleOutcome<Node> {
                if node.0 == "call" {
                    RuleOutcome::Call {
                        name: Arc::from("f"),
                        children: vec![Node("lit")],
                    }
                } else {
                    RuleOutcome::NotApplicable
                }
            }
        }
        let mut registry: InferenceRegistry<Node> = InferenceRegistry::new();
        registry.add_inference_rule(Box::new(CallRule), None);
        registry.add_inference_rule(Box::new(LiteralRule { tag: "lit", ty: int }), None);

        let resolve_call = |_: &TypeGraph, name: &str, args: &[TypeId]| -> Result<TypeId, Problem> {
            assert_eq!(name, "f");
            assert_eq!(args, &[int]);
            Ok(int)
        };
        let outcome = registry.infer_type(&g, &Node("call"), resolve_call);
        assert!(matches!(outcome, InferenceOutcome::Resolved(t) if t == int));
    }
}
