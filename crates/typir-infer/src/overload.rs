//! Overload resolution (`spec.md` §4.I): best-match picking across function
//! candidates sharing a name, using assignability cost and dominance.
//!
//! This module only needs `TypeId`s and the graph's assignability query — it
//! has no dependency on [`crate::rule`]'s registry, so a validation rule can
//! pre-flight a call's resolvability without going through inference at all
//! (`spec.md` §4.H: "the engine ... finds the overload group ... and selects
//! the best signature").

use typir_common::{EngineLimits, Problem, ProblemKind};
use typir_graph::{TypeGraph, TypeId, TypeKind};

#[derive(Debug, Clone)]
pub enum OverloadOutcome {
    /// The unique dominating candidate and its per-argument assignability cost.
    Best { function: TypeId, costs: Vec<usize> },
    /// Two or more candidates tie for best (`spec.md` §4.I step 4, §9(b)).
    Ambiguous { candidates: Vec<TypeId> },
}

/// Given `name` and ordered argument types, resolve the overload group
/// registered under that name to its unique best match (`spec.md` §4.I).
pub fn resolve_overload(
    graph: &TypeGraph,
    name: &str,
    arg_types: &[TypeId],
    limits: &EngineLimits,
) -> Result<OverloadOutcome, Problem> {
    let group = graph.overload_group(name);
    if group.is_empty() {
        return Err(Problem::new(
            ProblemKind::Inference,
            format!("no function named '{name}' is registered"),
        ));
    }

    let candidates: Vec<TypeId> = group.iter().copied().take(limits.max_overload_candidates).collect();
    if candidates.len() < group.len() {
        tracing::warn!(
            name,
            total = group.len(),
            capped = candidates.len(),
            "overload group exceeds max_overload_candidates, truncating"
        );
    }

    // 1. Applicability: arity must match and every argument assignable to
    //    its parameter position.
    let mut applicable: Vec<(TypeId, Vec<usize>)> = Vec::new();
    for &candidate in &candidates {
        let Some(typir_graph::TypeNode {
            kind: TypeKind::Function(f),
            ..
        }) = graph.get_type(candidate)
        else {
            continue;
        };
        if f.inputs.len() != arg_types.len() {
            continue;
        }
        let mut costs = Vec::with_capacity(arg_types.len());
        let mut all_applicable = true;
        for (&arg, param) in arg_types.iter().zip(&f.inputs) {
            match graph.get_assignability_result(arg, param.type_id).cost() {
                Some(cost) => costs.push(cost),
                None => {
                    all_applicable = false;
                    break;
                }
            }
        }
        if all_applicable {
            applicable.push((candidate, costs));
        }
    }

    if applicable.is_empty() {
        tracing::debug!(name, arity = arg_types.len(), "no overload candidate is applicable");
        return Err(no_applicable_candidate_problem(graph, name, arg_types));
    }

    // 3/4. Dominance: f dominates g iff cost_i(f) <= cost_i(g) everywhere,
    // strictly less somewhere. The unique undominated candidate wins.
    let undominated: Vec<&(TypeId, Vec<usize>)> = applicable
        .iter()
        .filter(|(candidate, costs)| {
            !applicable
                .iter()
                .any(|(other, other_costs)| *other != *candidate && dominates(other_costs, costs))
        })
        .collect();

    match undominated.as_slice() {
        [(function, costs)] => {
            tracing::trace!(name, ?function, ?costs, "overload resolved");
            Ok(OverloadOutcome::Best {
                function: *function,
                costs: costs.clone(),
            })
        }
        _ => Ok(OverloadOutcome::Ambiguous {
            candidates: undominated.iter().map(|(c, _)| *c).collect(),
        }),
    }
}

/// `f` dominates `g` iff it is at least as cheap at every position and
/// strictly cheaper at some position (`spec.md` §4.I step 3).
fn dominates(f: &[usize], g: &[usize]) -> bool {
    f.iter().zip(g).all(|(a, b)| a <= b) && f.iter().zip(g).any(|(a, b)| a < b)
}

fn no_applicable_candidate_problem(graph: &TypeGraph, name: &str, arg_types: &[TypeId]) -> Problem {
    let arg_names: Vec<String> = arg_types.iter().map(|&t| graph.print_type(t)).collect();
    Problem::new(
        ProblemKind::Assignability,
        format!("no overload of '{name}' is applicable to ({})", arg_names.join(", ")),
    )
}
