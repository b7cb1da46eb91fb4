//! Edit-pipeline entry points: structural format application (with the
//! enter-key guard), line insertion, and programmatic table insertion.

use crate::optimize::optimize_subtree;
use crate::table::MergePolicy;
use crate::{cell, container, format::BlockFormat};
use serde::{Deserialize, Serialize};
use tessera_document::{Document, Identity, NodeId, NodeKind, TreeError};
use tracing::trace;

/// What a structural format application did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatOutcome {
    /// The addressed range was wrapped into this new node.
    Applied(NodeId),
    /// The call was silently absorbed, either by the guard below or because
    /// the container had no addressable range. Deliberate no-op, not an
    /// error, and not observable by the caller as a failure.
    Absorbed,
}

/// Apply a structural format to the child range `[index, index + len)` of
/// `node`.
///
/// **The enter-key guard**: when `node` is already a table node of the same
/// kind as `format` and the format names the same `table_id`, the call is
/// absorbed. Line insertion is implemented generically as "insert a block,
/// then re-apply the block's structural formats up the chain"; without this
/// guard every Enter keystroke inside a table would re-run the
/// table-creation path and nest a fresh cell→row→table inside the table
/// being edited. The guard is keyed on `table_id` equality because the same
/// keystroke legitimately proceeds when it starts a distinct table (different
/// `table_id`), e.g. pasting one table while inside another.
///
/// Otherwise this is the generic container behavior: the first addressed
/// child is replaced by a new node of the format's kind (rehoming content
/// per the Cell replace rule), and any further addressed children move into
/// that node. Structural formats address whole blocks; the hosting framework
/// translates character offsets before calling in.
pub fn format_at(
    doc: &mut Document,
    node: NodeId,
    index: usize,
    len: usize,
    format: &BlockFormat,
) -> Result<FormatOutcome, TreeError> {
    if doc.kind(node) == Some(format.kind()) {
        let own = doc.identity(node).cloned().unwrap_or_default();
        if own.same_table(format.identity()) {
            trace!(name = format.name(), node = ?node, "format absorbed by guard");
            return Ok(FormatOutcome::Absorbed);
        }
    }

    let children = doc.children(node);
    if children.is_empty() {
        return Ok(FormatOutcome::Absorbed);
    }
    let start = index.min(children.len() - 1);
    let end = (start + len.max(1)).min(children.len());
    let addressed: Vec<NodeId> = children[start..end].to_vec();

    let wrapper = doc.create_node(format.kind(), format.identity().clone());
    let first = addressed[0];
    if format.kind() == NodeKind::Cell {
        cell::replace(doc, wrapper, first)?;
    } else {
        container::replace(doc, wrapper, first)?;
    }
    for &extra in &addressed[1..] {
        doc.append_child(wrapper, extra)?;
    }
    Ok(FormatOutcome::Applied(wrapper))
}

/// Split a line inside `cell`: insert a fresh block at `index`, then re-apply
/// the cell's structural formats up the chain (cell, then row, then table),
/// exactly as the generic edit pipeline does. Inside an existing table each
/// application is absorbed by the matching ancestor's guard and the tree is
/// otherwise untouched.
pub fn insert_line_break(
    doc: &mut Document,
    cell: NodeId,
    index: usize,
) -> Result<NodeId, TreeError> {
    let block = doc.create_node(NodeKind::Block, Identity::none());
    doc.insert_child_at(cell, index, block)?;

    let identity = doc.identity(cell).cloned().unwrap_or_default();
    let mut target = cell;
    let mut target_index = index;
    for kind in [NodeKind::Cell, NodeKind::Row, NodeKind::Table] {
        let Some(format) = BlockFormat::for_kind(kind, identity.clone()) else {
            break;
        };
        match format_at(doc, target, target_index, 1, &format)? {
            FormatOutcome::Absorbed => {
                // Climb one level; the next format is addressed at the
                // ancestor that covers the current target.
                let Some(parent) = doc.parent(target) else {
                    break;
                };
                target_index = doc.index_in_parent(target).unwrap_or(0);
                target = parent;
            }
            FormatOutcome::Applied(_) => {
                // A distinct table started here; repair self-assembles the
                // remaining ancestry.
                optimize_subtree(doc, target, &MergePolicy::default())?;
                break;
            }
        }
    }
    Ok(block)
}

/// Row of a [`TableOutline`]: the caller-assigned row id and one cell id per
/// column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowOutline {
    pub row_id: String,
    pub cell_ids: Vec<String>,
}

/// Shape and identity of a table to insert programmatically. All identifiers
/// are assigned by the caller; this core never generates identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOutline {
    pub table_id: String,
    pub rows: Vec<RowOutline>,
}

/// Build the table described by `outline`, insert it under `parent` at child
/// `index`, and repair the new subtree. Content already at the insertion
/// point is left in place; selection-aware migration is out of scope.
pub fn insert_table(
    doc: &mut Document,
    parent: NodeId,
    index: usize,
    outline: &TableOutline,
) -> Result<NodeId, TreeError> {
    let table_id = outline.table_id.as_str();
    let table = doc.create_node(NodeKind::Table, Identity::table(table_id));
    for row_outline in &outline.rows {
        let row_id = row_outline.row_id.as_str();
        let row = doc.create_node(NodeKind::Row, Identity::row(table_id, row_id));
        doc.append_child(table, row)?;
        for cell_id in &row_outline.cell_ids {
            let cell = doc.create_node(
                NodeKind::Cell,
                Identity::cell(table_id, row_id, cell_id.as_str()),
            );
            doc.append_child(row, cell)?;
            let content = doc.create_node(NodeKind::Block, Identity::none());
            doc.append_child(cell, content)?;
        }
    }
    doc.insert_child_at(parent, index, table)?;
    optimize_subtree(doc, table, &MergePolicy::default())?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_serialization_round_trips() {
        let outline = TableOutline {
            table_id: "t1".to_string(),
            rows: vec![RowOutline {
                row_id: "r1".to_string(),
                cell_ids: vec!["c1".to_string(), "c2".to_string()],
            }],
        };

        let json = serde_json::to_string(&outline).unwrap();
        let deserialized: TableOutline = serde_json::from_str(&json).unwrap();
        assert_eq!(outline, deserialized);
    }

    #[test]
    fn format_on_empty_container_is_absorbed() {
        let mut doc = Document::new();
        let block = doc.create_node(NodeKind::Block, Identity::none());
        doc.append_child(doc.root(), block).unwrap();
        let format = BlockFormat::TableCell {
            identity: Identity::cell("t1", "r1", "c1"),
        };
        let outcome = format_at(&mut doc, block, 0, 1, &format).unwrap();
        assert_eq!(outcome, FormatOutcome::Absorbed);
    }
}
