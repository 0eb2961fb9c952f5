//! Subtyping (`spec.md` §4.E): kind-intrinsic rules for `Top`/`Bottom` plus
//! explicit `markAsSubType` edges, queried by BFS reachability.

use crate::graph::TypeGraph;
use crate::id::TypeId;
use crate::node::TypeKind;
use std::collections::VecDeque;
use typir_common::{Problem, ProblemKind};

/// Plain edge reachability, ignoring the `Top`/`Bottom` kind-intrinsic
/// rules — used only to detect would-be cycles before `markAsSubType`
/// commits an edge (`spec.md` §4.E).
pub(crate) fn reaches_via_subtype_edges(graph: &TypeGraph, from: TypeId, to: TypeId) -> bool {
    if from == to {
        return true;
    }
    let mut seen = rustc_hash::FxHashSet::default();
    let mut queue = VecDeque::new();
    queue.push_back(from);
    seen.insert(from);
    while let Some(current) = queue.pop_front() {
        for edge in graph.outgoing(current, crate::graph::EdgeLabelKind::SubType) {
            if edge.to == to {
                return true;
            }
            if seen.insert(edge.to) {
                queue.push_back(edge.to);
            }
        }
    }
    false
}

impl TypeGraph {
    /// `isSubType(sub, sup)` (`spec.md` §4.E). Reflexive; `Top` is a
    /// supertype of everything and `Bottom` a subtype of everything without
    /// needing materialized edges for `Top`, while `Bottom`'s edges are
    /// materialized explicitly via its self-subscribed listener.
    pub fn is_sub_type(&self, sub: TypeId, sup: TypeId) -> bool {
        let sub = self.resolve(sub);
        let sup = self.resolve(sup);
        if sub == sup {
            return true;
        }
        if matches!(self.get_type(sup).map(|n| &n.kind), Some(TypeKind::Top)) {
            return true;
        }
        if matches!(self.get_type(sub).map(|n| &n.kind), Some(TypeKind::Bottom)) {
            return true;
        }
        let key = (sub, sup);
        if let Some(&cached) = self.subtype_cache.borrow().get(&key) {
            return cached;
        }
        let limit = self.limits().effective_max_path_length(self.node_count());
        let result = self.bfs_subtype(sub, sup, limit) || self.kind_intrinsic_subtype(sub, sup);
        self.subtype_cache.borrow_mut().insert(key, result);
        result
    }

    /// Subtype rules that are properties of the *kind*, not of materialized
    /// edges (`spec.md` §4.B): structural class width/depth subtyping and
    /// fixed-parameters variance. Nominal class inheritance and `Top`/`Bottom`
    /// don't need an entry here — the former is realized as ordinary subtype
    /// edges at class-creation time, the latter is handled above.
    fn kind_intrinsic_subtype(&self, sub: TypeId, sup: TypeId) -> bool {
        match (self.get_type(sub).map(|n| &n.kind), self.get_type(sup).map(|n| &n.kind)) {
            (Some(TypeKind::Class(a)), Some(TypeKind::Class(b))) => {
                crate::kind::class::analyze_subtype(a, b, |x, y| self.are_equal(x, y), |x, y| self.is_sub_type(x, y))
            }
            (Some(TypeKind::FixedParameters(a)), Some(TypeKind::FixedParameters(b))) => {
                let template = self.fixed_parameters_template(&a.base_name);
                crate::kind::fixed_parameters::analyze_subtype(
                    template,
                    a,
                    b,
                    |x, y| self.are_equal(x, y),
                    |x, y| self.is_sub_type(x, y),
                    |x, y| self.is_assignable(x, y),
                )
            }
            _ => false,
        }
    }

    /// `isSubType(sub, sup) -> true | [problem]` (`spec.md` §4.E, §6). Two
    /// distinct, non-identical function types are a `KindConflict` per §4.B
    /// ("subtype is not defined between functions in the core"); any other
    /// kind mismatch (that isn't `Top`/`Bottom`, which intrinsically relate
    /// to everything) is reported the same way.
    pub fn subtype_result(&self, sub: TypeId, sup: TypeId) -> Result<(), Problem> {
        let sub = self.resolve(sub);
        let sup = self.resolve(sup);
        if self.is_sub_type(sub, sup) {
            return Ok(());
        }
        if let (Some(a), Some(b)) = (self.get_type(sub), self.get_type(sup)) {
            let kinds_incomparable = a.kind.name() != b.kind.name()
                && !matches!(a.kind, TypeKind::Bottom)
                && !matches!(b.kind, TypeKind::Top);
            let both_functions = matches!((&a.kind, &b.kind), (TypeKind::Function(_), TypeKind::Function(_)));
            if kinds_incomparable || both_functions {
                return Err(Problem::kind_conflict(
                    a.identifier.clone(),
                    a.kind.name(),
                    b.identifier.clone(),
                    b.kind.name(),
                ));
            }
        }
        Err(Problem::new(
            ProblemKind::SubType,
            format!("'{}' is not a subtype of '{}'", self.identifier_of(sub), self.identifier_of(sup)),
        )
        .with_types([self.identifier_of(sub), self.identifier_of(sup)]))
    }

    fn bfs_subtype(&self, sub: TypeId, sup: TypeId, max_depth: usize) -> bool {
        let mut seen = rustc_hash::FxHashSet::default();
        let mut queue = VecDeque::new();
        queue.push_back((sub, 0usize));
        seen.insert(sub);
        while let Some((current, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }
            for edge in self.outgoing(current, crate::graph::EdgeLabelKind::SubType) {
                if edge.to == sup {
                    return true;
                }
                if seen.insert(edge.to) {
                    queue.push_back((edge.to, depth + 1));
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::primitive::PrimitiveData;
    use std::sync::Arc;

    fn primitive(g: &mut TypeGraph, name: &str) -> TypeId {
        g.create_type(
            name,
            TypeKind::Primitive(PrimitiveData {
                name: Arc::from(name),
            }),
        )
    }

    #[test]
    fn reflexive_and_transitive() {
        let mut g = TypeGraph::new();
        let a = primitive(&mut g, "a");
        let b = primitive(&mut g, "b");
        let c = primitive(&mut g, "c");
        g.mark_as_sub_type(a, b, true).unwrap();
        g.mark_as_sub_type(b, c, true).unwrap();
        assert!(g.is_sub_type(a, a));
        assert!(g.is_sub_type(a, c));
        assert!(!g.is_sub_type(c, a));
    }

    #[test]
    fn refuses_cycle() {
        let mut g = TypeGraph::new();
        let a = primitive(&mut g, "a");
        let b = primitive(&mut g, "b");
        g.mark_as_sub_type(a, b, true).unwrap();
        assert!(g.mark_as_sub_type(b, a, true).is_err());
    }

    #[test]
    fn top_and_bottom_are_intrinsic() {
        let mut g = TypeGraph::new();
        let top = g.get_or_create_top();
        let bottom = g.get_or_create_bottom();
        let a = primitive(&mut g, "a");
        assert!(g.is_sub_type(a, top));
        assert!(g.is_sub_type(bottom, a));
        assert!(g.is_sub_type(bottom, top));
    }

    #[test]
    fn distinct_functions_report_kind_conflict() {
        use crate::kind::function::{FunctionData, FunctionParam};
        let mut g = TypeGraph::new();
        let int = primitive(&mut g, "int");
        let str_ty = primitive(&mut g, "string");
        let f = g.create_type(
            "f(int)->int",
            TypeKind::Function(FunctionData {
                name: Arc::from("f"),
                output: int,
                inputs: vec![FunctionParam {
                    name: Arc::from("x"),
                    type_id: int,
                }],
            }),
        );
        let g2 = g.create_type(
            "f(string)->string",
            TypeKind::Function(FunctionData {
                name: Arc::from("f"),
                output: str_ty,
                inputs: vec![FunctionParam {
                    name: Arc::from("x"),
                    type_id: str_ty,
                }],
            }),
        );
        let err = g.subtype_result(f, g2).unwrap_err();
        assert_eq!(err.kind, typir_common::ProblemKind::KindConflict);
    }

    #[test]
    fn structural_class_width_subtyping() {
        use crate::kind::class::{ClassData, ClassField, ClassIdentity, FieldVariance};
        let mut g = TypeGraph::new();
        let int = primitive(&mut g, "int");
        let point2 = g.create_type(
            "Point2",
            TypeKind::Class(ClassData {
                qualified_name: Arc::from("Point2"),
                fields: vec![
                    ClassField {
                        name: Arc::from("x"),
                        type_id: int,
                    },
                    ClassField {
                        name: Arc::from("y"),
                        type_id: int,
                    },
                ],
                super_classes: vec![],
                identity: ClassIdentity::Structural,
                field_variance: FieldVariance::Invariant,
            }),
        );
        let point3 = g.create_type(
            "Point3",
            TypeKind::Class(ClassData {
                qualified_name: Arc::from("Point3"),
                fields: vec![
                    ClassField {
                        name: Arc::from("x"),
                        type_id: int,
                    },
                    ClassField {
                        name: Arc::from("y"),
                        type_id: int,
                    },
                    ClassField {
                        name: Arc::from("z"),
                        type_id: int,
                    },
                ],
                super_classes: vec![],
                identity: ClassIdentity::Structural,
                field_variance: FieldVariance::Invariant,
            }),
        );
        assert!(g.is_sub_type(point3, point2));
        assert!(!g.is_sub_type(point2, point3));
    }

    #[test]
    fn fixed_parameters_variance_policy() {
        use crate::kind::fixed_parameters::{FixedParametersData, FixedParametersTemplate, ParameterVariance};
        let mut g = TypeGraph::new();
        let i = primitive(&mut g, "int");
        let d = primitive(&mut g, "double");
        g.mark_as_sub_type(i, d, true).unwrap();
        g.declare_fixed_parameters_template(FixedParametersTemplate {
            base_name: Arc::from("List"),
            param_names: vec![Arc::from("T")],
            variance: ParameterVariance::EqualType,
        });
        let list_i = g.create_type(
            "List<int>",
            TypeKind::FixedParameters(FixedParametersData {
                base_name: Arc::from("List"),
                parameter_types: vec![i],
            }),
        );
        let list_d = g.create_type(
            "List<double>",
            TypeKind::FixedParameters(FixedParametersData {
                base_name: Arc::from("List"),
                parameter_types: vec![d],
            }),
        );
        assert!(!g.is_sub_type(list_i, list_d), "invariant: List<int> is not List<double>");

        g.declare_fixed_parameters_template(FixedParametersTemplate {
            base_name: Arc::from("List"),
            param_names: vec![Arc::from("T")],
            variance: ParameterVariance::SubType,
        });
        assert!(g.is_sub_type(list_i, list_d), "covariant: List<int> is now List<double>");
    }
}
