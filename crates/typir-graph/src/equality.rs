//! Equality (`spec.md` §4.D): two types are equal iff they resolve to the
//! same node after deduplication — identifier-based dedup already merges
//! every structurally-equal pair at construction time, so equality never
//! needs to walk kind payloads.

use crate::graph::TypeGraph;
use crate::id::TypeId;
use typir_common::{Problem, ProblemKind};

impl TypeGraph {
    /// `areEqual(a, b)` (`spec.md` §4.D). Cached per pair since repeated
    /// queries are common in overload resolution's applicability checks.
    pub fn are_equal(&self, a: TypeId, b: TypeId) -> bool {
        let a = self.resolve(a);
        let b = self.resolve(b);
        if a == b {
            return true;
        }
        let key = if a.index() < b.index() { (a, b) } else { (b, a) };
        if let Some(&cached) = self.equality_cache.borrow().get(&key) {
            return cached;
        }
        // identifier-based dedup already guarantees distinct ids carry
        // distinct identifiers, so no further comparison is possible here.
        self.equality_cache.borrow_mut().insert(key, false);
        false
    }

    /// `areTypesEqual(a, b) -> true | [problem]` (`spec.md` §4.D, §6):
    /// dispatches to a `KindConflict` when the two types don't even share a
    /// kind, else a plain `TypeEqualityProblem`.
    pub fn equality_result(&self, a: TypeId, b: TypeId) -> Result<(), Problem> {
        let a = self.resolve(a);
        let b = self.resolve(b);
        if self.are_equal(a, b) {
            return Ok(());
        }
        if let (Some(na), Some(nb)) = (self.get_type(a), self.get_type(b)) {
            if na.kind.name() != nb.kind.name() {
                return Err(Problem::kind_conflict(
                    na.identifier.clone(),
                    na.kind.name(),
                    nb.identifier.clone(),
                    nb.kind.name(),
                ));
            }
        }
        Err(Problem::new(
            ProblemKind::TypeEquality,
            format!("'{}' and '{}' are not equal", self.identifier_of(a), self.identifier_of(b)),
        )
        .with_types([self.identifier_of(a), self.identifier_of(b)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::primitive::PrimitiveData;
    use crate::node::TypeKind;
    use std::sync::Arc;

    #[test]
    fn dedup_makes_equal_types_identical() {
        let mut g = TypeGraph::new();
        let a = g.create_type(
            "int",
            TypeKind::Primitive(PrimitiveData {
                name: Arc::from("int"),
            }),
        );
        let b = g.create_type(
            "int",
            TypeKind::Primitive(PrimitiveData {
                name: Arc::from("int"),
            }),
        );
        assert_eq!(a, b);
        assert!(g.are_equal(a, b));
    }

    #[test]
    fn distinct_identifiers_are_not_equal() {
        let mut g = TypeGraph::new();
        let a = g.create_type(
            "int",
            TypeKind::Primitive(PrimitiveData {
                name: Arc::from("int"),
            }),
        );
        let b = g.create_type(
            "string",
            TypeKind::Primitive(PrimitiveData {
                name: Arc::from("string"),
            }),
        );
        assert!(!g.are_equal(a, b));
    }

    #[test]
    fn equality_result_reports_kind_conflict_across_kinds() {
        use crate::kind::function::{FunctionData, FunctionParam};

        let mut g = TypeGraph::new();
        let int = g.create_type(
            "int",
            TypeKind::Primitive(PrimitiveData {
                name: Arc::from("int"),
            }),
        );
        let f = g.create_type(
            "id(int)->int",
            TypeKind::Function(FunctionData {
                name: Arc::from("id"),
                output: int,
                inputs: vec![FunctionParam {
                    name: Arc::from("x"),
                    type_id: int,
                }],
            }),
        );
        let err = g.equality_result(int, f).unwrap_err();
        assert_eq!(err.kind, typir_common::ProblemKind::KindConflict);
    }
}
