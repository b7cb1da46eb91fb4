//! # Tessera Tables
//!
//! Self-normalizing table subtree for a rich-text document model.
//!
//! A table is a three-level tree (Table → Row → Cell) embedded in a larger
//! document of plain blocks. The hard problem is keeping that subtree
//! structurally valid under arbitrary incremental edits without a global
//! re-validation pass: every local mutation is followed by a repair
//! ([`optimize`]) that runs on the touched node only.
//!
//! ## Core Principles
//!
//! 1. **Repair, don't report**: malformed structure is never an error; the
//!    repair pass promotes missing ancestors and merges split siblings.
//! 2. **Identity is advisory**: `table_id`/`row_id`/`cell_id` correlate nodes
//!    that belong to the same logical table; structure is rebuilt from them,
//!    never assumed.
//! 3. **Single-hop locality**: repair touches the node, its immediate next
//!    sibling, and at most one synthesized parent. Chains of damage collapse
//!    one hop at a time across successive repairs.
//!
//! ## Repair responsibilities
//!
//! ```text
//! Cell::optimize   parent not a Row?   → synthesize Row{table,row}, relocate
//! Row::optimize    next Row, same id   → merge cells into self, drop sibling
//!                  parent not a Table? → synthesize Table{table}, relocate
//! Table::optimize  next Table, same id or same column count → merge rows
//! ```
//!
//! The enter-key guard lives in [`edit::format_at`]: re-applying a structural
//! format that names the table a node already belongs to is silently
//! absorbed, so a line split inside a table never nests a fresh table into
//! the one being edited.

pub mod cell;
mod container;
pub mod edit;
pub mod format;
pub mod optimize;
pub mod row;
pub mod table;

pub use edit::{format_at, insert_line_break, insert_table, FormatOutcome, RowOutline, TableOutline};
pub use format::BlockFormat;
pub use optimize::{optimize, optimize_subtree, optimize_with};
pub use table::MergePolicy;

// Re-export the integration-layer types callers need alongside the core.
pub use tessera_document::{Document, Identity, NodeId, NodeKind, TreeError};
