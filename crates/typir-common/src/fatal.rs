//! [`EngineError`]: the *fatal*, non-recoverable counterpart to [`crate::Problem`].
//!
//! `spec.md` §7 draws a hard line between expected failures (always a
//! `Problem` value) and programmer mistakes, which are fatal: two different
//! kinds claiming the same identifier, or a kind constructed with an
//! impossible arity. Those are bugs in the embedding host, not conditions a
//! caller is expected to branch on, so they abort rather than thread through
//! every `Result`.

use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum EngineError {
    /// Two different kinds tried to register a type under the same identifier.
    DuplicateIdentifierKindMismatch {
        identifier: Arc<str>,
        existing_kind: &'static str,
        requested_kind: &'static str,
    },
    /// A kind was asked to create a type with an arity it cannot represent
    /// (negative, or mismatched against its declared parameter names).
    InvalidArity {
        kind: &'static str,
        identifier: Arc<str>,
        expected: usize,
        actual: usize,
    },
    /// A query referenced a `TypeId` that has been removed from the graph.
    UseAfterRemoval { identifier: Arc<str> },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::DuplicateIdentifierKindMismatch {
                identifier,
                existing_kind,
                requested_kind,
            } => write!(
                f,
                "identifier '{identifier}' is already registered as a {existing_kind} type, \
                 cannot redefine it as a {requested_kind} type"
            ),
            EngineError::InvalidArity {
                kind,
                identifier,
                expected,
                actual,
            } => write!(
                f,
                "{kind} '{identifier}' expects {expected} parameter(s), got {actual}"
            ),
            EngineError::UseAfterRemoval { identifier } => {
                write!(f, "type '{identifier}' was used after being removed from the graph")
            }
        }
    }
}

impl std::error::Error for EngineError {}

impl EngineError {
    /// Programmer mistakes are fatal: this is the one call site in the
    /// engine that is expected to panic.
    #[track_caller]
    pub fn abort(self) -> ! {
        panic!("typir: {self}");
    }
}
