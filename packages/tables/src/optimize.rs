//! Repair dispatch over the closed node-kind set.
//!
//! The node set is fixed, so dispatch is an explicit match on the kind tag
//! rather than open subtype polymorphism. Each repair is idempotent once the
//! structural invariants hold: a second invocation performs no mutation.

use crate::table::MergePolicy;
use crate::{cell, row, table};
use tessera_document::{Document, NodeId, NodeKind, TreeError};

/// Repair `node` with the default merge policy. Returns whether the tree
/// changed.
pub fn optimize(doc: &mut Document, node: NodeId) -> Result<bool, TreeError> {
    optimize_with(doc, node, &MergePolicy::default())
}

/// Repair `node` under an explicit merge policy.
pub fn optimize_with(
    doc: &mut Document,
    node: NodeId,
    policy: &MergePolicy,
) -> Result<bool, TreeError> {
    match doc.kind(node) {
        Some(NodeKind::Cell) => cell::optimize(doc, node),
        Some(NodeKind::Row) => row::optimize(doc, node),
        Some(NodeKind::Table) => table::optimize(doc, node, policy),
        // Plain blocks have no table-specific repair; a stale handle is
        // nothing to repair either.
        Some(NodeKind::Block) | None => Ok(false),
    }
}

/// Run repair over the whole subtree under `root` until it reaches a fixed
/// point, the way the hosting framework drains an edit batch: each pass
/// visits a post-order snapshot, and a pass that changes nothing ends the
/// batch. Promotion inserts ancestors and merges delete siblings, so a fresh
/// snapshot is taken per pass.
pub fn optimize_subtree(
    doc: &mut Document,
    root: NodeId,
    policy: &MergePolicy,
) -> Result<(), TreeError> {
    loop {
        let nodes = post_order(doc, root);
        let mut changed = false;
        for node in nodes {
            if doc.contains(node) {
                changed |= optimize_with(doc, node, policy)?;
            }
        }
        if !changed {
            return Ok(());
        }
    }
}

fn post_order(doc: &Document, root: NodeId) -> Vec<NodeId> {
    let mut order = Vec::new();
    let mut stack = vec![(root, false)];
    while let Some((node, visited)) = stack.pop() {
        if visited {
            order.push(node);
            continue;
        }
        stack.push((node, true));
        for &child in doc.children(node).iter().rev() {
            stack.push((child, false));
        }
    }
    order
}
