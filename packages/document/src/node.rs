use serde::{Deserialize, Serialize};

/// The closed set of node kinds in a document tree.
///
/// Everything that is not part of a table is a [`NodeKind::Block`]: plain
/// paragraphs, embeds, line containers. The table hierarchy is strictly
/// Table → Row → Cell, with Cells holding Block content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Table,
    Row,
    Cell,
    Block,
}

/// Coarse nesting category, used by the hosting framework to decide valid
/// placement at a level above the per-kind allowed-children sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Structural container (table, row).
    Container,
    /// Block-level content (cell, plain block).
    Block,
}

/// Static registration record for a node kind: type name, backing element
/// tag, nesting scope, allowed children, and the child synthesized when the
/// node would otherwise be empty.
#[derive(Debug)]
pub struct NodeSpec {
    pub type_name: &'static str,
    pub tag: &'static str,
    pub scope: Scope,
    pub allowed_children: &'static [NodeKind],
    pub default_child: Option<NodeKind>,
}

const TABLE_SPEC: NodeSpec = NodeSpec {
    type_name: "table",
    tag: "TABLE",
    scope: Scope::Container,
    allowed_children: &[NodeKind::Row],
    default_child: Some(NodeKind::Row),
};

const ROW_SPEC: NodeSpec = NodeSpec {
    type_name: "table-row",
    tag: "TR",
    scope: Scope::Container,
    allowed_children: &[NodeKind::Cell],
    default_child: Some(NodeKind::Cell),
};

const CELL_SPEC: NodeSpec = NodeSpec {
    type_name: "table-cell",
    tag: "TD",
    scope: Scope::Block,
    allowed_children: &[NodeKind::Block],
    default_child: Some(NodeKind::Block),
};

const BLOCK_SPEC: NodeSpec = NodeSpec {
    type_name: "block",
    tag: "DIV",
    scope: Scope::Block,
    allowed_children: &[NodeKind::Block, NodeKind::Table],
    default_child: None,
};

impl NodeKind {
    pub const fn spec(self) -> &'static NodeSpec {
        match self {
            NodeKind::Table => &TABLE_SPEC,
            NodeKind::Row => &ROW_SPEC,
            NodeKind::Cell => &CELL_SPEC,
            NodeKind::Block => &BLOCK_SPEC,
        }
    }

    pub const fn type_name(self) -> &'static str {
        self.spec().type_name
    }

    pub const fn tag(self) -> &'static str {
        self.spec().tag
    }

    pub const fn scope(self) -> Scope {
        self.spec().scope
    }

    pub const fn default_child(self) -> Option<NodeKind> {
        self.spec().default_child
    }

    pub fn is_allowed_child(self, child: NodeKind) -> bool {
        self.spec().allowed_children.contains(&child)
    }

    /// Resolve a registered type name (`"table-cell"`, `"table-row"`,
    /// `"table"`, `"block"`).
    pub fn from_type_name(name: &str) -> Option<NodeKind> {
        match name {
            "table" => Some(NodeKind::Table),
            "table-row" => Some(NodeKind::Row),
            "table-cell" => Some(NodeKind::Cell),
            "block" => Some(NodeKind::Block),
            _ => None,
        }
    }

    /// Resolve a backing element tag, case-insensitively.
    pub fn from_tag(tag: &str) -> Option<NodeKind> {
        [NodeKind::Table, NodeKind::Row, NodeKind::Cell, NodeKind::Block]
            .into_iter()
            .find(|kind| kind.tag().eq_ignore_ascii_case(tag))
    }
}

/// Correlation identity for table nodes.
///
/// A Cell carries all three identifiers, a Row carries table + row, a Table
/// carries table only, a Block carries none; this is enforced by
/// [`Identity::restricted_to`], which constructors and the node factory apply.
///
/// Presence is explicit: an identifier the caller never assigned reads as
/// `None`, and an identifier assigned as the empty string is normalized to
/// `None` rather than stored. Nodes sharing a `row_id` are understood to be
/// the same logical row even while transiently split into two siblings; the
/// repair pass collapses such splits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_id: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|id| !id.is_empty())
}

impl Identity {
    pub fn none() -> Identity {
        Identity::default()
    }

    pub fn table(table_id: impl Into<String>) -> Identity {
        Identity {
            table_id: present(Some(table_id.into())),
            row_id: None,
            cell_id: None,
        }
    }

    pub fn row(table_id: impl Into<String>, row_id: impl Into<String>) -> Identity {
        Identity {
            table_id: present(Some(table_id.into())),
            row_id: present(Some(row_id.into())),
            cell_id: None,
        }
    }

    pub fn cell(
        table_id: impl Into<String>,
        row_id: impl Into<String>,
        cell_id: impl Into<String>,
    ) -> Identity {
        Identity {
            table_id: present(Some(table_id.into())),
            row_id: present(Some(row_id.into())),
            cell_id: present(Some(cell_id.into())),
        }
    }

    /// Map present-but-empty identifiers to absent.
    pub fn normalized(self) -> Identity {
        Identity {
            table_id: present(self.table_id),
            row_id: present(self.row_id),
            cell_id: present(self.cell_id),
        }
    }

    /// Keep only the identifiers a node of `kind` carries.
    pub fn restricted_to(self, kind: NodeKind) -> Identity {
        match kind {
            NodeKind::Table => Identity {
                row_id: None,
                cell_id: None,
                ..self
            },
            NodeKind::Row => Identity {
                cell_id: None,
                ..self
            },
            NodeKind::Cell => self,
            NodeKind::Block => Identity::none(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.table_id.is_none() && self.row_id.is_none() && self.cell_id.is_none()
    }

    /// Whether two identities name the same table. Two absent `table_id`s
    /// compare equal, matching the attribute comparison this replaces.
    pub fn same_table(&self, other: &Identity) -> bool {
        self.table_id == other.table_id
    }
}
