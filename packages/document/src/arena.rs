//! Arena-backed document tree and the generic container capability.
//!
//! Nodes live in a flat slot vector and refer to each other by [`NodeId`]
//! index. Relations are weak: removing a node tombstones its slot, and any
//! handle kept by a caller afterwards simply reads as absent. Mutation is
//! strictly local: each operation updates only the slots it names.

use crate::node::{Identity, NodeKind};
use thiserror::Error;
use tracing::trace;

/// Handle to a node slot. Cheap to copy, never owning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

/// Errors from structural container operations.
///
/// Navigation reads never fail (a stale handle reads as absent), but a
/// mutation addressed at a node that is gone or detached is reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("node {0:?} is no longer in the document")]
    NodeGone(NodeId),

    #[error("node {0:?} has no parent to anchor the operation")]
    Detached(NodeId),

    #[error("no node type registered under name `{0}`")]
    UnknownType(String),
}

#[derive(Debug)]
struct Slot {
    kind: NodeKind,
    identity: Identity,
    text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    alive: bool,
}

/// A document tree: one root Block plus whatever the edits hang beneath it.
#[derive(Debug)]
pub struct Document {
    slots: Vec<Slot>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Document {
        let mut doc = Document {
            slots: Vec::new(),
            root: NodeId(0),
        };
        doc.root = doc.create_node(NodeKind::Block, Identity::none());
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create a node. The identity is normalized (empty identifiers omitted)
    /// and restricted to the fields the kind carries.
    pub fn create_node(&mut self, kind: NodeKind, identity: Identity) -> NodeId {
        let id = NodeId(self.slots.len() as u32);
        self.slots.push(Slot {
            kind,
            identity: identity.normalized().restricted_to(kind),
            text: None,
            parent: None,
            children: Vec::new(),
            alive: true,
        });
        id
    }

    /// Node factory keyed by registered type name, used when a repair pass
    /// synthesizes a missing ancestor or default child.
    pub fn create(&mut self, type_name: &str, identity: Identity) -> Result<NodeId, TreeError> {
        let kind = NodeKind::from_type_name(type_name)
            .ok_or_else(|| TreeError::UnknownType(type_name.to_string()))?;
        Ok(self.create_node(kind, identity))
    }

    fn slot(&self, id: NodeId) -> Option<&Slot> {
        self.slots.get(id.0 as usize).filter(|slot| slot.alive)
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut Slot> {
        self.slots.get_mut(id.0 as usize).filter(|slot| slot.alive)
    }

    fn require(&self, id: NodeId) -> Result<(), TreeError> {
        self.slot(id).map(|_| ()).ok_or(TreeError::NodeGone(id))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.slot(id).is_some()
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.slot(id).map(|slot| slot.kind)
    }

    pub fn identity(&self, id: NodeId) -> Option<&Identity> {
        self.slot(id).map(|slot| &slot.identity)
    }

    pub fn set_identity(&mut self, id: NodeId, identity: Identity) -> Result<(), TreeError> {
        let slot = self.slot_mut(id).ok_or(TreeError::NodeGone(id))?;
        slot.identity = identity.normalized().restricted_to(slot.kind);
        Ok(())
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.slot(id).and_then(|slot| slot.text.as_deref())
    }

    pub fn set_text(&mut self, id: NodeId, text: Option<String>) -> Result<(), TreeError> {
        let slot = self.slot_mut(id).ok_or(TreeError::NodeGone(id))?;
        slot.text = text;
        Ok(())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id).and_then(|slot| slot.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.slot(id).map(|slot| slot.children.as_slice()).unwrap_or(&[])
    }

    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&child| child == id)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        self.children(parent).get(index + 1).copied()
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        index.checked_sub(1).and_then(|i| self.children(parent).get(i).copied())
    }

    /// Unhook `id` from its parent, leaving it alive but detached.
    pub fn detach(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.require(id)?;
        self.unlink(id);
        Ok(())
    }

    fn unlink(&mut self, id: NodeId) {
        let Some(parent) = self.slot(id).and_then(|slot| slot.parent) else {
            return;
        };
        if let Some(parent_slot) = self.slot_mut(parent) {
            parent_slot.children.retain(|&child| child != id);
        }
        if let Some(slot) = self.slot_mut(id) {
            slot.parent = None;
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.require(parent)?;
        self.require(child)?;
        self.unlink(child);
        self.slot_mut(parent).expect("checked above").children.push(child);
        self.slot_mut(child).expect("checked above").parent = Some(parent);
        Ok(())
    }

    /// Insert `child` into `parent` at `index`, clamped to the child count.
    pub fn insert_child_at(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), TreeError> {
        self.require(parent)?;
        self.require(child)?;
        self.unlink(child);
        let parent_slot = self.slot_mut(parent).expect("checked above");
        let index = index.min(parent_slot.children.len());
        parent_slot.children.insert(index, child);
        self.slot_mut(child).expect("checked above").parent = Some(parent);
        Ok(())
    }

    /// Insert `node` as the sibling immediately before `anchor`.
    pub fn insert_before(&mut self, anchor: NodeId, node: NodeId) -> Result<(), TreeError> {
        self.require(node)?;
        let parent = self.parent(anchor).ok_or(TreeError::Detached(anchor))?;
        let index = self.index_in_parent(anchor).ok_or(TreeError::Detached(anchor))?;
        self.insert_child_at(parent, index, node)
    }

    /// Move every child of `from`, in order, to the end of `to`'s children.
    pub fn move_children(&mut self, from: NodeId, to: NodeId) -> Result<(), TreeError> {
        self.require(from)?;
        self.require(to)?;
        if from == to {
            return Ok(());
        }
        let moved = std::mem::take(&mut self.slot_mut(from).expect("checked above").children);
        trace!(?from, ?to, count = moved.len(), "moving children");
        for child in &moved {
            if let Some(slot) = self.slot_mut(*child) {
                slot.parent = Some(to);
            }
        }
        self.slot_mut(to).expect("checked above").children.extend(moved);
        Ok(())
    }

    /// Put `new` in `old`'s position among its siblings and detach `old`.
    /// `old` stays alive; the caller decides whether to remove it.
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> Result<(), TreeError> {
        if old == new {
            return Ok(());
        }
        self.require(new)?;
        self.insert_before(old, new)?;
        self.unlink(old);
        Ok(())
    }

    /// Detach `id` and tombstone it together with its remaining subtree.
    pub fn remove(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.require(id)?;
        self.unlink(id);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(slot) = self.slot_mut(current) {
                slot.alive = false;
                slot.parent = None;
                stack.extend(std::mem::take(&mut slot.children));
            }
        }
        Ok(())
    }
}
