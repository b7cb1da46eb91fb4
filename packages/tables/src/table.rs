//! Table: ordered container of Rows, normalizing Row membership.
//!
//! Repair is a single merge-with-next step. Two adjacent Tables merge when
//! they share a `table_id`, or, behind [`MergePolicy::merge_equal_shape`],
//! when their first rows have the same column count. The shape rule is
//! deliberately permissive: structurally identical tables that become
//! adjacent after intervening content is deleted merge even when cut/paste
//! lost their shared identity.

use crate::container;
use tessera_document::{Document, Identity, NodeId, NodeKind, TreeError};
use tracing::debug;

/// Policy knob for the merge rules.
///
/// `merge_equal_shape` keeps the merge-by-column-count rule isolated so it
/// can be toggled independently once history semantics settle; merging two
/// content-unrelated tables interacts badly with undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergePolicy {
    pub merge_equal_shape: bool,
}

impl Default for MergePolicy {
    fn default() -> Self {
        MergePolicy {
            merge_equal_shape: true,
        }
    }
}

pub fn create(doc: &mut Document, identity: Identity) -> NodeId {
    doc.create_node(NodeKind::Table, identity)
}

/// Read back `{table_id}`; absent reads as `None`.
pub fn formats(doc: &Document, node: NodeId) -> Identity {
    doc.identity(node)
        .cloned()
        .unwrap_or_default()
        .restricted_to(NodeKind::Table)
}

/// Number of Cell children of the table's first Row; zero for a table with
/// no rows yet.
pub fn column_count(doc: &Document, table: NodeId) -> usize {
    doc.children(table)
        .first()
        .map(|&row| {
            doc.children(row)
                .iter()
                .filter(|&&child| doc.kind(child) == Some(NodeKind::Cell))
                .count()
        })
        .unwrap_or(0)
}

/// Post-mutation repair: generic container repair, then merge-with-next when
/// the following sibling is a Table matching by identity or (policy
/// permitting) by first-row column count. Returns whether the tree changed.
pub fn optimize(
    doc: &mut Document,
    node: NodeId,
    policy: &MergePolicy,
) -> Result<bool, TreeError> {
    let mut changed = container::optimize(doc, node)?;

    let Some(next) = doc.next_sibling(node) else {
        return Ok(changed);
    };
    if doc.kind(next) != Some(NodeKind::Table) {
        return Ok(changed);
    }
    let ours = doc.identity(node).and_then(|identity| identity.table_id.clone());
    let theirs = doc.identity(next).and_then(|identity| identity.table_id.clone());
    let same_identity = ours == theirs;
    let same_shape =
        policy.merge_equal_shape && column_count(doc, node) == column_count(doc, next);
    if same_identity || same_shape {
        debug!(
            table = ?node,
            sibling = ?next,
            by_identity = same_identity,
            "merging adjacent tables"
        );
        doc.move_children(next, node)?;
        doc.remove(next)?;
        changed = true;
    }
    Ok(changed)
}
