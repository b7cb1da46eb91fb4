//! Persisted-attribute round-trip: serialize → parse → identity must be
//! exact, including partial and missing identity.

use tessera_document::{parse, serialize, Document, Identity, NodeKind, ParseError};

fn build_subtree(doc: &mut Document) -> tessera_document::NodeId {
    let table = doc.create_node(NodeKind::Table, Identity::table("t1"));
    doc.append_child(doc.root(), table).unwrap();
    for r in ["r1", "r2"] {
        let row = doc.create_node(NodeKind::Row, Identity::row("t1", r));
        doc.append_child(table, row).unwrap();
        for c in ["c1", "c2"] {
            let cell = doc.create_node(NodeKind::Cell, Identity::cell("t1", r, format!("{r}-{c}")));
            doc.append_child(row, cell).unwrap();
            let block = doc.create_node(NodeKind::Block, Identity::none());
            doc.set_text(block, Some(format!("content {r}/{c}"))).unwrap();
            doc.append_child(cell, block).unwrap();
        }
    }
    table
}

fn identities(doc: &Document, node: tessera_document::NodeId, out: &mut Vec<(NodeKind, Identity)>) {
    out.push((doc.kind(node).unwrap(), doc.identity(node).unwrap().clone()));
    for &child in doc.children(node) {
        identities(doc, child, out);
    }
}

#[test]
fn identity_attributes_round_trip_exactly() -> anyhow::Result<()> {
    let mut doc = Document::new();
    let table = build_subtree(&mut doc);

    let markup = serialize(&doc, table);
    let reparsed = parse(&markup)?;
    let reparsed_table = reparsed.children(reparsed.root())[0];

    let mut original = Vec::new();
    let mut round_tripped = Vec::new();
    identities(&doc, table, &mut original);
    identities(&reparsed, reparsed_table, &mut round_tripped);
    assert_eq!(original, round_tripped);

    assert_eq!(serialize(&reparsed, reparsed_table), markup);
    Ok(())
}

#[test]
fn partial_identity_survives_round_trip() {
    // Legacy content: a cell with only a table id, a row with nothing.
    let mut doc = Document::new();
    let table = doc.create_node(NodeKind::Table, Identity::none());
    doc.append_child(doc.root(), table).unwrap();
    let row = doc.create_node(NodeKind::Row, Identity::none());
    doc.append_child(table, row).unwrap();
    let cell = doc.create_node(NodeKind::Cell, Identity::cell("t1", "", ""));
    doc.append_child(row, cell).unwrap();

    let markup = serialize(&doc, table);
    let reparsed = parse(&markup).unwrap();
    let reparsed_table = reparsed.children(reparsed.root())[0];
    let reparsed_row = reparsed.children(reparsed_table)[0];
    let reparsed_cell = reparsed.children(reparsed_row)[0];

    assert_eq!(reparsed.identity(reparsed_row), Some(&Identity::none()));
    let identity = reparsed.identity(reparsed_cell).unwrap();
    assert_eq!(identity.table_id.as_deref(), Some("t1"));
    assert_eq!(identity.row_id, None);
    assert_eq!(identity.cell_id, None);
}

#[test]
fn text_content_round_trips_with_escapes() {
    let mut doc = Document::new();
    let block = doc.create_node(NodeKind::Block, Identity::none());
    doc.append_child(doc.root(), block).unwrap();
    doc.set_text(block, Some(r#"she said "hi\there""#.to_string())).unwrap();

    let markup = serialize(&doc, block);
    let reparsed = parse(&markup).unwrap();
    let reparsed_block = reparsed.children(reparsed.root())[0];
    assert_eq!(reparsed.text(reparsed_block), Some(r#"she said "hi\there""#));
}

#[test]
fn truncated_markup_is_an_eof_error() {
    let err = parse(r#"<table data-table-id="t1">"#).unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedEof { .. }));
}
