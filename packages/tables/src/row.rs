//! Row: ordered container of Cells, normalizing Cell membership.
//!
//! Two repair responsibilities, in order: merge with a split-off next
//! sibling carrying the same `row_id`, then make sure the parent is a Table.

use crate::container;
use tessera_document::{Document, Identity, NodeId, NodeKind, TreeError};
use tracing::debug;

pub fn create(doc: &mut Document, identity: Identity) -> NodeId {
    doc.create_node(NodeKind::Row, identity)
}

/// Read back `{table_id, row_id}`; absent identifiers read as `None`.
pub fn formats(doc: &Document, node: NodeId) -> Identity {
    doc.identity(node)
        .cloned()
        .unwrap_or_default()
        .restricted_to(NodeKind::Row)
}

/// Post-mutation repair: generic container repair, horizontal merge, then
/// vertical promotion. Returns whether the tree changed.
pub fn optimize(doc: &mut Document, node: NodeId) -> Result<bool, TreeError> {
    let mut changed = container::optimize(doc, node)?;
    changed |= merge_next(doc, node)?;

    let parent = doc.parent(node);
    let parent_is_table = parent.map(|p| doc.kind(p) == Some(NodeKind::Table)).unwrap_or(false);
    if parent.is_some() && !parent_is_table {
        let identity = formats(doc, node).restricted_to(NodeKind::Table);
        let table = doc.create_node(NodeKind::Table, identity);
        doc.insert_before(node, table)?;
        doc.append_child(table, node)?;
        debug!(row = ?node, ?table, "promoted row under synthesized table");
        changed = true;
    }
    Ok(changed)
}

/// Single-hop horizontal merge: when the immediately following sibling is a
/// Row with the same `row_id` (two absent ids compare equal), its cells move
/// to the end of this Row and the emptied sibling is removed. Only the next
/// sibling is checked; repair runs after every local mutation, so a chain
/// of splits collapses one hop per pass.
fn merge_next(doc: &mut Document, node: NodeId) -> Result<bool, TreeError> {
    let Some(next) = doc.next_sibling(node) else {
        return Ok(false);
    };
    // Same kind implies the same backing element tag.
    if doc.kind(next) != Some(NodeKind::Row) {
        return Ok(false);
    }
    let ours = doc.identity(node).and_then(|identity| identity.row_id.clone());
    let theirs = doc.identity(next).and_then(|identity| identity.row_id.clone());
    if ours != theirs {
        return Ok(false);
    }
    debug!(row = ?node, sibling = ?next, row_id = ?ours, "merging split row");
    doc.move_children(next, node)?;
    doc.remove(next)?;
    Ok(true)
}
