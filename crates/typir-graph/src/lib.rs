//! Host-agnostic type graph: nodes, edges, lifecycle, and the four core
//! relation services (equality, subtype, conversion, assignability).
//!
//! This crate has no notion of inference rules or overload resolution
//! (`typir-infer` builds those on top); it only knows how to hold types,
//! dedupe them by identifier, and answer relation queries over them.

pub mod assignability;
pub mod conversion;
pub mod edge;
pub mod equality;
pub mod graph;
pub mod id;
pub mod kind;
pub mod lifecycle;
pub mod listener;
pub mod node;
pub mod printer;
pub mod subtype;

pub use assignability::AssignabilityOutcome;
pub use edge::{ConversionMode, Edge, EdgeLabel, PathStep};
pub use graph::{EdgeLabelKind, TypeGraph};
pub use id::TypeId;
pub use listener::{GraphCommand, GraphEvent, GraphListener};
pub use node::{LifecycleState, TypeKind, TypeNode};
