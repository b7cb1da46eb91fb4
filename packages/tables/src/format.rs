use serde::{Deserialize, Serialize};
use tessera_document::{Identity, NodeKind};

/// Structural block format, as re-applied by the generic edit pipeline after
/// a line split or paste.
///
/// Each variant names one level of the table hierarchy together with the
/// identity the caller assigned. Formats are plain values so they can travel
/// through an edit log or over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BlockFormat {
    Table { identity: Identity },
    TableRow { identity: Identity },
    TableCell { identity: Identity },
}

impl BlockFormat {
    /// The node kind this format wraps its target into.
    pub fn kind(&self) -> NodeKind {
        match self {
            BlockFormat::Table { .. } => NodeKind::Table,
            BlockFormat::TableRow { .. } => NodeKind::Row,
            BlockFormat::TableCell { .. } => NodeKind::Cell,
        }
    }

    /// Registered type name, as the hosting framework keys formats.
    pub fn name(&self) -> &'static str {
        self.kind().type_name()
    }

    pub fn identity(&self) -> &Identity {
        match self {
            BlockFormat::Table { identity }
            | BlockFormat::TableRow { identity }
            | BlockFormat::TableCell { identity } => identity,
        }
    }

    /// Build the format for `kind` carrying `identity`; `None` for kinds that
    /// are not structural table formats.
    pub fn for_kind(kind: NodeKind, identity: Identity) -> Option<BlockFormat> {
        match kind {
            NodeKind::Table => Some(BlockFormat::Table {
                identity: identity.restricted_to(kind),
            }),
            NodeKind::Row => Some(BlockFormat::TableRow {
                identity: identity.restricted_to(kind),
            }),
            NodeKind::Cell => Some(BlockFormat::TableCell {
                identity: identity.restricted_to(kind),
            }),
            NodeKind::Block => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_serialization_round_trips() {
        let format = BlockFormat::TableCell {
            identity: Identity::cell("t1", "r1", "c1"),
        };

        let json = serde_json::to_string(&format).unwrap();
        let deserialized: BlockFormat = serde_json::from_str(&json).unwrap();

        assert_eq!(format, deserialized);
        assert_eq!(format.name(), "table-cell");
    }

    #[test]
    fn for_kind_restricts_identity() {
        let identity = Identity::cell("t1", "r1", "c1");
        let row = BlockFormat::for_kind(NodeKind::Row, identity.clone()).unwrap();
        assert_eq!(row.identity(), &Identity::row("t1", "r1"));
        assert!(BlockFormat::for_kind(NodeKind::Block, identity).is_none());
    }
}
