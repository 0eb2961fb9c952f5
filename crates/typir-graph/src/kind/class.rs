//! The class kind: named fields, nominal or structural identity, and either
//! transitive-only or width/depth subtyping (`spec.md` §4.B).

use crate::id::TypeId;
use std::sync::Arc;

/// Whether a class's identifier (and therefore equality) is derived from its
/// qualified name alone, or also encodes its field shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassIdentity {
    /// Identifier is the qualified name alone. Equality is name equality.
    /// Required for direct self-reference (`spec.md` §8 S5): a field cannot
    /// refer back to its own structural hash before that hash exists.
    Nominal,
    /// Identifier also encodes `(name, type-id)` pairs, sorted by field name.
    /// Equality is field-set equivalence.
    Structural,
}

/// Covariance policy for structural width/depth subtyping (`spec.md` §4.B).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldVariance {
    /// A subclass's field type must equal the superclass field type exactly.
    Invariant,
    /// A subclass's field type may be a subtype of the superclass field type.
    Covariant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassField {
    pub name: Arc<str>,
    pub type_id: TypeId,
}

#[derive(Debug, Clone)]
pub struct ClassData {
    pub qualified_name: Arc<str>,
    pub fields: Vec<ClassField>,
    pub super_classes: Vec<TypeId>,
    pub identity: ClassIdentity,
    pub field_variance: FieldVariance,
}

impl ClassData {
    /// Fields sorted by name, the canonical order `spec.md` §4.B requires
    /// for a stable structural identifier.
    pub fn sorted_fields(&self) -> Vec<&ClassField> {
        let mut fields: Vec<&ClassField> = self.fields.iter().collect();
        fields.sort_by(|a, b| a.name.cmp(&b.name));
        fields
    }

    pub fn field(&self, name: &str) -> Option<&ClassField> {
        self.fields.iter().find(|f| &*f.name == name)
    }

    pub fn signature(&self) -> String {
        let mut fields: Vec<String> = self
            .fields
            .iter()
            .map(|f| format!("{}: {}", f.name, f.type_id))
            .collect();
        fields.sort();
        format!("{} {{ {} }}", self.qualified_name, fields.join(", "))
    }
}

/// Kind-intrinsic subtype analysis for two classes not already connected by
/// an explicit edge (`spec.md` §4.B "structural width/depth subtyping").
/// Only fires under [`ClassIdentity::Structural`] — a nominal class's
/// subtype relation is carried entirely by the edges materialized for its
/// declared `super_classes` at creation time, so there is nothing left for
/// this fallback to contribute for it.
pub fn analyze_subtype(
    sub: &ClassData,
    sup: &ClassData,
    mut field_equal: impl FnMut(TypeId, TypeId) -> bool,
    mut field_subtype: impl FnMut(TypeId, TypeId) -> bool,
) -> bool {
    if sub.identity != ClassIdentity::Structural {
        return false;
    }
    for sup_field in &sup.fields {
        let Some(sub_field) = sub.field(&sup_field.name) else {
            return false;
        };
        let compatible = match sub.field_variance {
            FieldVariance::Invariant => field_equal(sub_field.type_id, sup_field.type_id),
            FieldVariance::Covariant => field_subtype(sub_field.type_id, sup_field.type_id),
        };
        if !compatible {
            return false;
        }
    }
    true
}

/// Derive the identifier for a class given its configured identity policy.
/// Field identifiers must already be frozen (the class's preconditions, in
/// `spec.md` §4.C terms) before this is called.
pub fn derive_identifier(
    qualified_name: &str,
    identity: ClassIdentity,
    sorted_field_identifiers: &[(Arc<str>, Arc<str>)],
) -> Arc<str> {
    match identity {
        ClassIdentity::Nominal => Arc::from(qualified_name),
        ClassIdentity::Structural => {
            let mut out = format!("{qualified_name}{{");
            for (i, (name, ty)) in sorted_field_identifiers.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(name);
                out.push(':');
                out.push_str(ty);
            }
            out.push('}');
            Arc::from(out)
        }
    }
}
