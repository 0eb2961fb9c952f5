//! Rule-driven inference (`spec.md` §4.H), overload resolution (§4.I) and
//! the validation collector (§4.J), built on top of `typir-graph`'s relation
//! services.
//!
//! This crate is generic over a host node type `N` — the embedding parser's
//! AST node — since the engine must stay host-agnostic (`spec.md` §1 "given
//! an abstract syntax provided by an embedding host"). `N` is required to be
//! `Clone` because the two-step call-inference protocol (§4.H) hands child
//! subnodes back to the engine for independent recursive inference.

pub mod overload;
pub mod rule;
pub mod validation;

pub use overload::{resolve_overload, OverloadOutcome};
pub use rule::{CallInferenceRule, DeclarationInferenceRule, InferenceOutcome, InferenceRegistry, InferenceRule, RuleOutcome};
pub use validation::{constraints, Severity, ValidationCollector, ValidationMessage, ValidationRule};
