//! # Tessera Document
//!
//! Document-tree integration layer for the Tessera table model.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ document: arena tree + container ops        │
//! │  - Nodes addressed by NodeId handles        │
//! │  - append/insert/move/remove/replace        │
//! │  - Node factory keyed by type name          │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ tables: Cell/Row/Table repair + merge       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The tree is a flat arena: every node is a slot in a `Vec`, and parent,
//! child, and sibling relations are stored as indices. Structural mutation
//! touches only the indices involved, so a repair pass over one node never
//! walks the whole document.
//!
//! Persisted state is limited to per-node identity, serialized as
//! `data-table-id` / `data-row-id` / `data-cell-id` element attributes by the
//! [`markup`] module.

pub mod arena;
pub mod error;
pub mod markup;
pub mod node;
pub mod tokenizer;

pub use arena::{Document, NodeId, TreeError};
pub use error::{ParseError, ParseResult};
pub use markup::{parse, serialize, Parser, Serializer};
pub use node::{Identity, NodeKind, NodeSpec, Scope};
pub use tokenizer::{tokenize, Token};
