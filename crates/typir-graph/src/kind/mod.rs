//! Kind payloads (`spec.md` §4.B). Each submodule owns one kind's creation
//! details, identifier derivation and signature rendering; [`crate::node`]
//! assembles them into the tagged [`crate::node::TypeKind`] variant per
//! `spec.md` §9's "represent concrete kinds as a tagged variant" guidance.

pub mod class;
pub mod fixed_parameters;
pub mod function;
pub mod primitive;
pub mod top_bottom;
