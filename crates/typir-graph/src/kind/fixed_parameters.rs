//! The fixed-parameters kind: a template with fixed arity, e.g. `List<T>` or
//! `Map<K, V>` (`spec.md` §4.B).
//!
//! Variance is a property of the *template* (`FixedParameters(baseName,
//! [paramNames], {variance})`), not of any one instantiation — redeclaring a
//! template's variance changes how every existing instantiation subtypes
//! (`spec.md` §8 S4). Instantiations (`.create({parameterTypes})`) therefore
//! only store their base name and argument types; variance is looked up from
//! the template registry at subtype-query time.

use crate::id::TypeId;
use std::sync::Arc;

/// Per-position parameter comparison policy for subtyping two instantiations
/// of the same template (`spec.md` §4.B).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterVariance {
    /// Parameter types must be equal (invariant).
    EqualType,
    /// Parameter types compare by the subtype relation (covariant).
    SubType,
    /// Parameter types compare by assignability.
    AssignableType,
}

/// The template itself: `FixedParameters(baseName, [paramNames], {variance})`.
#[derive(Debug, Clone)]
pub struct FixedParametersTemplate {
    pub base_name: Arc<str>,
    pub param_names: Vec<Arc<str>>,
    pub variance: ParameterVariance,
}

impl FixedParametersTemplate {
    pub fn arity(&self) -> usize {
        self.param_names.len()
    }
}

/// One instantiation, e.g. `List<Int>`.
#[derive(Debug, Clone)]
pub struct FixedParametersData {
    pub base_name: Arc<str>,
    pub parameter_types: Vec<TypeId>,
}

impl FixedParametersData {
    pub fn signature(&self) -> String {
        let args: Vec<String> = self.parameter_types.iter().map(TypeId::to_string).collect();
        format!("{}<{}>", self.base_name, args.join(", "))
    }
}

/// Kind-intrinsic subtype analysis for two instantiations of (presumably)
/// the same template (`spec.md` §4.B, §8 S4). `template` is looked up by
/// base name at query time rather than stored on the instantiation, since
/// redeclaring a template's variance must retroactively change how every
/// existing instantiation subtypes. A missing template (the host never
/// declared one, or declared it under a different name) falls back to the
/// strictest policy, `EqualType`, rather than silently allowing anything.
pub fn analyze_subtype(
    template: Option<&FixedParametersTemplate>,
    sub: &FixedParametersData,
    sup: &FixedParametersData,
    mut param_equal: impl FnMut(TypeId, TypeId) -> bool,
    mut param_subtype: impl FnMut(TypeId, TypeId) -> bool,
    mut param_assignable: impl FnMut(TypeId, TypeId) -> bool,
) -> bool {
    if sub.base_name != sup.base_name || sub.parameter_types.len() != sup.parameter_types.len() {
        return false;
    }
    let variance = template.map_or(ParameterVariance::EqualType, |t| t.variance);
    sub.parameter_types
        .iter()
        .zip(&sup.parameter_types)
        .all(|(&a, &b)| match variance {
            ParameterVariance::EqualType => param_equal(a, b),
            ParameterVariance::SubType => param_subtype(a, b),
            ParameterVariance::AssignableType => param_assignable(a, b),
        })
}

/// Derive `Name<id1, ..., idn>` (`spec.md` §4.B) from frozen parameter identifiers.
pub fn derive_identifier(base_name: &str, parameter_identifiers: &[Arc<str>]) -> Arc<str> {
    let mut out = format!("{base_name}<");
    for (i, ident) in parameter_identifiers.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(ident);
    }
    out.push('>');
    Arc::from(out)
}
