//! The [`Problem`] value type: the engine's only vocabulary for *expected*
//! failures (kind conflicts, rejected subtyping, no assignability path, ...).
//!
//! Problems are plain data, never exceptions. Every relation, inference and
//! validation query that can fail returns one instead of returning `Err` of
//! some throwable type, so embedding hosts can inspect, log, or translate
//! them into their own diagnostics without unwinding.

use std::fmt;
use std::sync::Arc;

/// The tag distinguishing the eight problem families from `spec.md` §3/§7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemKind {
    /// Comparing values of incompatible kinds (e.g. a class vs. a function).
    KindConflict,
    /// Same kind, different structure.
    TypeEquality,
    /// Subtype relation denied.
    SubType,
    /// Requested conversion not registered.
    Conversion,
    /// No assignability path found.
    Assignability,
    /// A rule matched but children inference failed, or no rule applied.
    Inference,
    /// Multiple overload candidates dominate equally.
    AmbiguousOverload,
    /// Preconditions unsatisfiable, or a cyclic subtype declaration refused.
    Initialization,
}

impl ProblemKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ProblemKind::KindConflict => "KindConflict",
            ProblemKind::TypeEquality => "TypeEqualityProblem",
            ProblemKind::SubType => "SubTypeProblem",
            ProblemKind::Conversion => "ConversionProblem",
            ProblemKind::Assignability => "AssignabilityProblem",
            ProblemKind::Inference => "InferenceProblem",
            ProblemKind::AmbiguousOverload => "AmbiguousOverload",
            ProblemKind::Initialization => "InitializationError",
        }
    }
}

/// A structured, recoverable failure: `{ kind, message, nestedProblems,
/// involvedTypes }` per `spec.md` §6's diagnostic output format.
///
/// `involved_types` holds the *identifiers* of the types the problem is
/// about (not `TypeId`s) so this crate stays independent of `typir-graph` —
/// the identifier is the stable, printable handle `spec.md` §3 already
/// mandates every type carry.
#[derive(Debug, Clone)]
pub struct Problem {
    pub kind: ProblemKind,
    pub message: String,
    pub involved_types: Vec<Arc<str>>,
    pub nested: Vec<Problem>,
}

impl Problem {
    pub fn new(kind: ProblemKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            involved_types: Vec::new(),
            nested: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_type(mut self, identifier: Arc<str>) -> Self {
        self.involved_types.push(identifier);
        self
    }

    #[must_use]
    pub fn with_types(mut self, identifiers: impl IntoIterator<Item = Arc<str>>) -> Self {
        self.involved_types.extend(identifiers);
        self
    }

    #[must_use]
    pub fn with_nested(mut self, problem: Problem) -> Self {
        self.nested.push(problem);
        self
    }

    #[must_use]
    pub fn with_nested_all(mut self, problems: impl IntoIterator<Item = Problem>) -> Self {
        self.nested.extend(problems);
        self
    }

    pub fn kind_conflict(a: Arc<str>, a_kind: &'static str, b: Arc<str>, b_kind: &'static str) -> Self {
        Self::new(
            ProblemKind::KindConflict,
            format!("'{a}' is a {a_kind} but '{b}' is a {b_kind}"),
        )
        .with_types([a, b])
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)?;
        if !self.involved_types.is_empty() {
            write!(f, " (")?;
            for (i, t) in self.involved_types.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{t}")?;
            }
            write!(f, ")")?;
        }
        for nested in &self.nested {
            write!(f, "\n  caused by: {nested}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Problem {}
