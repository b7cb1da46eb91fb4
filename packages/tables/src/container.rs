//! Generic container behavior shared by every node kind.

use tessera_document::{Document, NodeId, TreeError};
use tracing::debug;

/// Container-level repair: a container left with no children synthesizes one
/// default child so it never renders (or merges) empty. Returns whether the
/// tree changed.
pub(crate) fn optimize(doc: &mut Document, node: NodeId) -> Result<bool, TreeError> {
    let Some(kind) = doc.kind(node) else {
        return Ok(false);
    };
    if !doc.children(node).is_empty() {
        return Ok(false);
    }
    let Some(child_kind) = kind.default_child() else {
        return Ok(false);
    };
    // The default child inherits whatever identity fields it carries.
    let identity = doc.identity(node).cloned().unwrap_or_default();
    let child = doc.create_node(child_kind, identity.restricted_to(child_kind));
    doc.append_child(node, child)?;
    debug!(?node, ?child_kind, "synthesized default child");
    Ok(true)
}

/// Generic structural replace: `node` absorbs `target`'s children, takes its
/// position among its siblings, and `target` is removed.
pub(crate) fn replace(doc: &mut Document, node: NodeId, target: NodeId) -> Result<(), TreeError> {
    doc.move_children(target, node)?;
    doc.replace(target, node)?;
    doc.remove(target)?;
    Ok(())
}
