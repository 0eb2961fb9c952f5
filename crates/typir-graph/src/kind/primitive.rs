//! The primitive kind: identifier = name, equality by identity, no implicit
//! subtyping beyond what the host declares explicitly (`spec.md` §4.B).

use std::sync::Arc;

/// Payload for a primitive type. Primitives carry no structure beyond their
/// name — it *is* their identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveData {
    pub name: Arc<str>,
}

impl PrimitiveData {
    pub fn identifier(name: &str) -> Arc<str> {
        Arc::from(name)
    }

    pub fn signature(&self) -> String {
        self.name.to_string()
    }
}
