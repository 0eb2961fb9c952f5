//! Shared ambient types for the typir type-system engine: the [`Problem`]
//! value family, the fatal [`EngineError`] family, and tunable [`EngineLimits`].
//!
//! This crate has no concept of a type graph or a kind — it is the bottom
//! layer every other `typir-*` crate depends on, the same role `tsz-common`
//! plays under `tsz-solver`/`tsz-checker` in the teacher codebase.

pub mod fatal;
pub mod limits;
pub mod problem;

pub use fatal::EngineError;
pub use limits::EngineLimits;
pub use problem::{Problem, ProblemKind};
