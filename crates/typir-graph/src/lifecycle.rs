//! Deferred type construction (`spec.md` §4.C).
//!
//! `begin_type` reserves a [`TypeId`] immediately — before its identifier or
//! kind payload is known — so a finalizer closure can capture that id for a
//! self-referential definition (e.g. `class Node { next: Node }`, scenario
//! S5). The reservation is driven toward `Identifiable`/`Completed` by
//! [`TypeGraph::advance_pending`], called reactively after every mutation
//! that might satisfy an outstanding precondition.

use crate::graph::TypeGraph;
use crate::id::TypeId;
use crate::node::{LifecycleState, TypeKind};
use std::sync::Arc;
use typir_common::Problem;

type FinalizeFn = dyn FnOnce(&mut TypeGraph, TypeId) -> Result<(Arc<str>, TypeKind), Problem>;
type ReadyCallback = dyn FnOnce(TypeId);

pub struct PendingType {
    id: TypeId,
    preconditions: Vec<Arc<str>>,
    finalize: Option<Box<FinalizeFn>>,
    on_ready: Vec<Box<ReadyCallback>>,
}

impl TypeGraph {
    /// Reserve a type id whose identifier and kind are not yet known.
    /// `preconditions` lists identifiers that must reach `Identifiable`
    /// before `finalize` is invoked; an empty list finalizes immediately.
    pub fn begin_type(
        &mut self,
        preconditions: Vec<Arc<str>>,
        finalize: impl FnOnce(&mut TypeGraph, TypeId) -> Result<(Arc<str>, TypeKind), Problem> + 'static,
    ) -> TypeId {
        let id = self.push_node(
            Arc::from(format!("$pending#{}", self.nodes.len())),
            TypeKind::Bottom, // placeholder payload, never observed: state stays Invalid
            LifecycleState::Invalid,
        );
        self.pending.push(PendingType {
            id,
            preconditions,
            finalize: Some(Box::new(finalize)),
            on_ready: Vec::new(),
        });
        self.advance_pending();
        id
    }

    /// Register a callback invoked with the canonical id once `pending_id`
    /// (or the duplicate it gets redirected to) reaches `Identifiable`.
    /// Mirrors `spec.md` §4.C's `waitForIdentifiable` listener flag.
    pub fn on_type_ready(&mut self, pending_id: TypeId, callback: impl FnOnce(TypeId) + 'static) {
        if let Some(entry) = self.pending.iter_mut().find(|p| p.id == pending_id) {
            entry.on_ready.push(Box::new(callback));
        } else {
            // already resolved (or never pending) — fire immediately
            callback(self.resolve(pending_id));
        }
    }

    pub fn pending_error(&self, id: TypeId) -> Option<&Problem> {
        self.pending_errors.get(&id)
    }

    /// Re-check every outstanding reservation's preconditions, finalizing
    /// any whose preconditions are now satisfied. Runs to a fixed point:
    /// finalizing one type can satisfy another's preconditions.
    pub(crate) fn advance_pending(&mut self) {
        loop {
            let ready: Vec<usize> = self
                .pending
                .iter()
                .enumerate()
                .filter(|(_, p)| self.preconditions_met(&p.preconditions))
                .map(|(i, _)| i)
                .collect();
            if ready.is_empty() {
                break;
            }
            // Remove back-to-front so earlier indices stay valid.
            for &i in ready.iter().rev() {
                let mut entry = self.pending.remove(i);
                let finalize = entry.finalize.take().expect("finalize taken at most once");
                match finalize(self, entry.id) {
                    Ok((identifier, kind)) => self.complete_pending(entry, identifier, kind),
                    Err(problem) => {
                        tracing::debug!(id = ?entry.id, %problem, "pending type finalization failed");
                        self.pending_errors.insert(entry.id, problem);
                    }
                }
            }
        }
    }

    fn preconditions_met(&self, preconditions: &[Arc<str>]) -> bool {
        preconditions.iter().all(|ident| {
            self.identifiers
                .get(ident)
                .and_then(|&id| self.get_type(id))
                .is_some_and(|n| n.state.is_at_least(LifecycleState::Identifiable))
        })
    }

    fn complete_pending(&mut self, entry: PendingType, identifier: Arc<str>, kind: TypeKind) {
        let reserved = entry.id;
        if let Some(&existing) = self.identifiers.get(&identifier) {
            // Duplicate: the reserved id was never needed as a real node.
            let canonical = self.resolve(existing);
            self.redirects.insert(reserved, canonical);
            self.nodes[reserved.index()] = None;
            tracing::trace!(?reserved, ?canonical, "pending type deduplicated on finalize");
            for cb in entry.on_ready {
                cb(canonical);
            }
            return;
        }

        self.nodes[reserved.index()] = Some(crate::node::TypeNode {
            id: reserved,
            identifier: identifier.clone(),
            kind,
            state: LifecycleState::Identifiable,
        });
        self.identifiers.insert(identifier, reserved);
        for cb in entry.on_ready {
            cb(reserved);
        }

        self.register_dependents(reserved);
        if let Some(Some(node)) = self.nodes.get_mut(reserved.index()) {
            node.state = LifecycleState::Completed;
        }
        self.invalidate_caches();
        self.fire_type_added(reserved);
        tracing::trace!(?reserved, "pending type completed");
    }
}
