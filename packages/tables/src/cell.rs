//! Cell: leaf container of the table hierarchy, holding block content.
//!
//! A Cell carries the full `{table_id, row_id, cell_id}` identity and is the
//! node that lets a table self-assemble: repairing a bare Cell synthesizes
//! its Row (and the Row's repair synthesizes the Table).

use crate::container;
use tessera_document::{Document, Identity, NodeId, NodeKind, TreeError};
use tracing::debug;

/// Create a Cell tagged with `identity`. Identifiers that are present but
/// empty are omitted, never written as empty attributes.
pub fn create(doc: &mut Document, identity: Identity) -> NodeId {
    doc.create_node(NodeKind::Cell, identity)
}

/// Read back `{table_id, row_id, cell_id}`. Absent identifiers read as
/// `None`; pure, no side effect.
pub fn formats(doc: &Document, node: NodeId) -> Identity {
    doc.identity(node)
        .cloned()
        .unwrap_or_default()
        .restricted_to(NodeKind::Cell)
}

/// Post-mutation repair. Generic container repair first, then ancestry: a
/// Cell whose parent is not a Row synthesizes one (identity taken from the
/// Cell's own `{table_id, row_id}`) immediately before itself and relocates
/// under it. Returns whether the tree changed.
pub fn optimize(doc: &mut Document, node: NodeId) -> Result<bool, TreeError> {
    let mut changed = container::optimize(doc, node)?;

    let parent = doc.parent(node);
    let parent_is_row = parent.map(|p| doc.kind(p) == Some(NodeKind::Row)).unwrap_or(false);
    if parent.is_some() && !parent_is_row {
        let identity = formats(doc, node).restricted_to(NodeKind::Row);
        let row = doc.create_node(NodeKind::Row, identity);
        doc.insert_before(node, row)?;
        doc.append_child(row, node)?;
        debug!(cell = ?node, ?row, "promoted cell under synthesized row");
        changed = true;
    }
    Ok(changed)
}

/// Replace `target` with this Cell, rehoming content when `target` is not
/// itself a Cell: a default block is created, `target`'s children (and text)
/// move into it, and the block becomes the Cell's child before the Cell takes
/// `target`'s position.
pub fn replace(doc: &mut Document, node: NodeId, target: NodeId) -> Result<(), TreeError> {
    if doc.kind(target) == Some(NodeKind::Cell) {
        return container::replace(doc, node, target);
    }
    let block = doc.create_node(NodeKind::Block, Identity::none());
    doc.move_children(target, block)?;
    doc.set_text(block, doc.text(target).map(str::to_string))?;
    doc.append_child(node, block)?;
    doc.replace(target, node)?;
    doc.remove(target)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_reads_absent_identity_as_none() {
        let mut doc = Document::new();
        let cell = create(&mut doc, Identity::cell("t1", "", ""));
        let identity = formats(&doc, cell);
        assert_eq!(identity.table_id.as_deref(), Some("t1"));
        assert_eq!(identity.row_id, None);
        assert_eq!(identity.cell_id, None);
    }

    #[test]
    fn optimize_synthesizes_missing_row() {
        let mut doc = Document::new();
        let cell = create(&mut doc, Identity::cell("t1", "r1", "c1"));
        doc.append_child(doc.root(), cell).unwrap();

        assert!(optimize(&mut doc, cell).unwrap());

        let row = doc.parent(cell).unwrap();
        assert_eq!(doc.kind(row), Some(NodeKind::Row));
        assert_eq!(doc.identity(row), Some(&Identity::row("t1", "r1")));
    }

    #[test]
    fn optimize_is_a_noop_for_detached_cell() {
        let mut doc = Document::new();
        let cell = create(&mut doc, Identity::cell("t1", "r1", "c1"));
        // Container repair still gives the cell its default block child.
        assert!(optimize(&mut doc, cell).unwrap());
        assert!(!optimize(&mut doc, cell).unwrap());
        assert_eq!(doc.parent(cell), None);
    }
}
