//! [`TypeId`]: a small, `Copy` handle into a [`crate::graph::TypeGraph`]'s arena.

use std::fmt;

/// Index of a type node inside a [`crate::graph::TypeGraph`]'s arena.
///
/// Cheap to copy and compare; the graph is the only thing that can turn one
/// back into a [`crate::node::TypeNode`]. A `TypeId` for a removed type
/// still compares equal to itself but resolves to `None` via
/// [`crate::graph::TypeGraph::get_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).expect("type graph exceeded u32::MAX nodes"))
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
