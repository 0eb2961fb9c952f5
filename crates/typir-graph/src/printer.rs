//! Printer facet (`spec.md` §4.K, supplement): human-readable rendering of
//! types and the graph, used by diagnostics and test assertions alike.

use crate::graph::{EdgeLabelKind, TypeGraph};
use crate::id::TypeId;
use std::fmt::Write as _;

impl TypeGraph {
    /// `print(type)`: a type's signature, or a placeholder for an id that
    /// no longer resolves (already removed, or a pending reservation that
    /// never finalized).
    pub fn print_type(&self, id: TypeId) -> String {
        match self.get_type(id) {
            Some(node) => node.kind.signature(),
            None => format!("<unresolved:{id}>"),
        }
    }

    /// Dumps every live type and its outgoing edges, sorted by id for
    /// deterministic output. Intended for test assertions and debug logs,
    /// not for a stable machine-readable format.
    pub fn print_graph(&self) -> String {
        let mut out = String::new();
        let mut nodes: Vec<_> = self.all_types().collect();
        nodes.sort_by_key(|n| n.id.index());
        for node in nodes {
            let _ = writeln!(out, "{} [{}] = {}", node.id, node.kind.name(), node.kind.signature());
            for edge in self.outgoing(node.id, EdgeLabelKind::SubType) {
                let _ = writeln!(out, "  <: {}", self.print_type(edge.to));
            }
            for edge in self.outgoing(node.id, EdgeLabelKind::Conversion) {
                let _ = writeln!(out, "  ~> {}", self.print_type(edge.to));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::primitive::PrimitiveData;
    use crate::node::TypeKind;
    use std::sync::Arc;

    #[test]
    fn prints_primitive_signature() {
        let mut g = TypeGraph::new();
        let int = g.create_type(
            "int",
            TypeKind::Primitive(PrimitiveData {
                name: Arc::from("int"),
            }),
        );
        assert_eq!(g.print_type(int), "int");
    }
}
