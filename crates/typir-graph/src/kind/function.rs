//! The function kind: a named output plus an ordered list of named inputs
//! (`spec.md` §4.B). Functions sharing a name form an *overload group*
//! (`spec.md` §4.I), tracked by [`crate::graph::TypeGraph::overload_group`].

use crate::id::TypeId;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionParam {
    pub name: Arc<str>,
    pub type_id: TypeId,
}

#[derive(Debug, Clone)]
pub struct FunctionData {
    pub name: Arc<str>,
    pub output: TypeId,
    pub inputs: Vec<FunctionParam>,
}

impl FunctionData {
    pub fn input_types(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.inputs.iter().map(|p| p.type_id)
    }

    pub fn signature(&self) -> String {
        let params: Vec<String> = self
            .inputs
            .iter()
            .map(|p| format!("{}:{}", p.name, p.type_id))
            .collect();
        format!("{}({}) -> {}", self.name, params.join(", "), self.output)
    }
}

/// Derive a function's identifier: `name(p1:T1, p2:T2, ...) -> R`
/// (`spec.md` §4.B), using frozen parameter/output identifiers.
pub fn derive_identifier(name: &str, input_identifiers: &[Arc<str>], output_identifier: &str) -> Arc<str> {
    let mut out = format!("{name}(");
    for (i, ident) in input_identifiers.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(ident);
    }
    out.push_str(") -> ");
    out.push_str(output_identifier);
    Arc::from(out)
}
