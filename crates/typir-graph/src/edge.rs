//! Directed, labeled [`Edge`]s between types (`spec.md` §3).

use crate::id::TypeId;

/// The strength of a conversion edge (`spec.md` §3 "Conversion modes").
///
/// `ImplicitExplicit` implies `Explicit`: anything implicitly convertible is
/// also explicitly convertible, but not the reverse. Assignability (§4.G)
/// only ever walks `ImplicitExplicit` edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionMode {
    ImplicitExplicit,
    Explicit,
}

impl ConversionMode {
    /// Whether this mode is strong enough for assignability path search.
    pub const fn allows_assignability(self) -> bool {
        matches!(self, ConversionMode::ImplicitExplicit)
    }
}

/// The label on an [`Edge`], distinguishing the relations `spec.md` §3 names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeLabel {
    /// An explicit, user-declared subtype edge (`Subtype::markAsSubType`).
    SubType,
    /// An explicit conversion edge (`Conversion::markAsConvertible`).
    Conversion(ConversionMode),
}

/// A directed edge between two types, first-class so relation queries can
/// return the path that proved a relation (`spec.md` §3: "Edges are
/// first-class so paths can be returned to callers").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub from: TypeId,
    pub to: TypeId,
    pub label: EdgeLabel,
}

impl Edge {
    pub fn sub_type(from: TypeId, to: TypeId) -> Self {
        Self {
            from,
            to,
            label: EdgeLabel::SubType,
        }
    }

    pub fn conversion(from: TypeId, to: TypeId, mode: ConversionMode) -> Self {
        Self {
            from,
            to,
            label: EdgeLabel::Conversion(mode),
        }
    }
}

/// One step of a relation path, as handed back by `getAssignabilityResult`
/// and friends: either an edge that was traversed, or the zero-length
/// identity step (`spec.md` §4.G: "Identity paths have length 0").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStep {
    Identity(TypeId),
    Edge(Edge),
}

impl PathStep {
    pub fn target(self) -> TypeId {
        match self {
            PathStep::Identity(t) => t,
            PathStep::Edge(e) => e.to,
        }
    }
}
