//! Conversion (`spec.md` §4.F): a direct, one-step relation declared with
//! `markAsConvertible`. Transitive composition of conversions into paths is
//! assignability's job (§4.G), not this module's.

use crate::edge::ConversionMode;
use crate::graph::{EdgeLabelKind, TypeGraph};
use crate::id::TypeId;
use typir_common::{Problem, ProblemKind};

impl TypeGraph {
    /// `isConvertible(from, to)` (`spec.md` §4.F): is there a direct
    /// conversion edge, of either mode, from `from` to `to`?
    pub fn is_convertible(&self, from: TypeId, to: TypeId) -> bool {
        self.convertible_mode(from, to).is_some()
    }

    /// `isConvertible(from, to) -> mode | problem` variant that surfaces a
    /// `ConversionProblem` instead of `'NONE'` (`spec.md` §4.F, §6) for
    /// callers that want the structured-value form rather than an `Option`.
    pub fn conversion_result(&self, from: TypeId, to: TypeId) -> Result<ConversionMode, Problem> {
        self.convertible_mode(from, to).ok_or_else(|| {
            Problem::new(
                ProblemKind::Conversion,
                format!(
                    "no conversion registered from '{}' to '{}'",
                    self.identifier_of(self.resolve(from)),
                    self.identifier_of(self.resolve(to))
                ),
            )
            .with_types([self.identifier_of(self.resolve(from)), self.identifier_of(self.resolve(to))])
        })
    }

    /// The strongest mode of direct conversion declared from `from` to `to`,
    /// if any. `ImplicitExplicit` wins over `Explicit` when both were
    /// declared, since it implies the weaker one.
    pub fn convertible_mode(&self, from: TypeId, to: TypeId) -> Option<ConversionMode> {
        let from = self.resolve(from);
        let to = self.resolve(to);
        self.outgoing(from, EdgeLabelKind::Conversion)
            .into_iter()
            .filter(|e| e.to == to)
            .filter_map(|e| match e.label {
                crate::edge::EdgeLabel::Conversion(mode) => Some(mode),
                _ => None,
            })
            .max_by_key(|mode| mode.allows_assignability())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::primitive::PrimitiveData;
    use crate::node::TypeKind;
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
    fn direct_conversion_is_visible() {
        let mut g = TypeGraph::new();
        let int = primitive(&mut g, "int");
        let float = primitive(&mut g, "float");
        g.mark_as_convertible(int, float, ConversionMode::ImplicitExplicit);
        assert!(g.is_convertible(int, float));
        assert!(!g.is_convertible(float, int));
        assert_eq!(g.convertible_mode(int, float), Some(ConversionMode::ImplicitExplicit));
    }

    #[test]
    fn explicit_only_does_not_allow_assignability() {
        let mut g = TypeGraph::new();
        let a = primitive(&mut g, "a");
        let b = primitive(&mut g, "b");
        g.mark_as_convertible(a, b, ConversionMode::Explicit);
        assert!(g.is_convertible(a, b));
        assert!(!g.convertible_mode(a, b).unwrap().allows_assignability());
    }
}
