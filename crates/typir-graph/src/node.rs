//! [`TypeNode`]: the shared shell (`spec.md` §3) plus the tagged
//! [`TypeKind`] payload selected per type (`spec.md` §9).

use crate::id::TypeId;
use crate::kind::class::ClassData;
use crate::kind::fixed_parameters::FixedParametersData;
use crate::kind::function::FunctionData;
use crate::kind::primitive::PrimitiveData;
use std::sync::Arc;

/// Lifecycle state of a type (`spec.md` §4.C). Transitions are one-way
/// except for the explicit `invalid` cascade on precondition removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Invalid,
    Identifiable,
    Completed,
}

impl LifecycleState {
    pub fn is_at_least(self, other: LifecycleState) -> bool {
        self.rank() >= other.rank()
    }

    fn rank(self) -> u8 {
        match self {
            LifecycleState::Invalid => 0,
            LifecycleState::Identifiable => 1,
            LifecycleState::Completed => 2,
        }
    }
}

/// The kind-tag plus kind-specific payload for one type (`spec.md` §4.B,
/// §9). A closed enum rather than a `dyn Kind` trait object: the set of
/// kinds this core supports is fixed, so Rust's preferred realization is a
/// tagged variant dispatched with `match`, not dynamic dispatch.
#[derive(Debug, Clone)]
pub enum TypeKind {
    Primitive(PrimitiveData),
    Top,
    Bottom,
    Class(ClassData),
    Function(FunctionData),
    FixedParameters(FixedParametersData),
}

impl TypeKind {
    /// The `$name` a `Kind` descriptor is identified by (`spec.md` §3).
    pub const fn name(&self) -> &'static str {
        match self {
            TypeKind::Primitive(_) => "primitive",
            TypeKind::Top => "top",
            TypeKind::Bottom => "bottom",
            TypeKind::Class(_) => "class",
            TypeKind::Function(_) => "function",
            TypeKind::FixedParameters(_) => "fixed-parameters",
        }
    }

    pub fn signature(&self) -> String {
        match self {
            TypeKind::Primitive(p) => p.signature(),
            TypeKind::Top => "⊤".to_string(),
            TypeKind::Bottom => "⊥".to_string(),
            TypeKind::Class(c) => c.signature(),
            TypeKind::Function(f) => f.signature(),
            TypeKind::FixedParameters(fp) => fp.signature(),
        }
    }
}

/// A live type node: identity, kind, lifecycle state (`spec.md` §3).
///
/// Mutated only by its initializer until `Completed`; immutable afterwards
/// except for removal, per `spec.md` §3's invariants.
#[derive(Debug, Clone)]
pub struct TypeNode {
    pub id: TypeId,
    pub identifier: Arc<str>,
    pub kind: TypeKind,
    pub state: LifecycleState,
}
