// Editor HTML round trips: parse(serialize(doc)) keeps types, attributes and text

use crate::ast::{Mark, MarkType, Node, NodeType};
use crate::{parse, serialize, serialize_pretty};

fn newsletter() -> Node {
    Node::doc(vec![
        Node::heading(2, vec![Node::text("Weekly picks")]).with_attr("textAlign", "center"),
        Node::section(vec![
            Node::columns(vec![
                Node::column("col-a", Some(33.33))
                    .with_attr("verticalAlign", "middle")
                    .with_attr("backgroundColor", "#fafafa")
                    .with_attr("paddingLeft", 12),
                Node::column("col-b", Some(33.33)).with_attr("borderRadius", 6),
                Node::column("col-c", Some(33.33)).with_attr("showIfKey", "vip"),
            ]),
        ])
        .with_attr("paddingTop", 24)
        .with_attr("marginBottom", 8)
        .with_attr("align", "center"),
        Node::for_each(
            "products",
            vec![Node::paragraph(vec![
                Node::text("Only ").with_mark(Mark::new(MarkType::Bold)),
                Node::variable("price"),
                Node::text(" today").with_mark(Mark::color("#ff0000")),
            ])],
        ),
    ])
}

#[test]
fn test_round_trip_preserves_structure_and_attributes() {
    let doc = newsletter();
    let html = serialize(&doc).unwrap();
    println!("{}", html);
    let parsed = parse(&html).unwrap();

    assert_eq!(parsed, doc);
}

#[test]
fn test_pretty_round_trip() {
    let doc = newsletter();
    let parsed = parse(&serialize_pretty(&doc).unwrap()).unwrap();

    assert_eq!(parsed, doc);
}

#[test]
fn test_round_trip_keeps_column_ids() {
    let parsed = parse(&serialize(&newsletter()).unwrap()).unwrap();
    let ids: Vec<_> = parsed.content[1].content[0]
        .content
        .iter()
        .map(|column| column.column_id().unwrap_or_default().to_string())
        .collect();

    assert_eq!(ids, vec!["col-a", "col-b", "col-c"]);
}

#[test]
fn test_serialized_doc_is_stable() {
    let once = serialize(&newsletter()).unwrap();
    let twice = serialize(&parse(&once).unwrap()).unwrap();

    assert_eq!(once, twice);
}

#[test]
fn test_parsed_document_satisfies_content_rules() {
    let parsed = parse(&serialize(&newsletter()).unwrap()).unwrap();
    assert!(parsed.validate().is_ok());
    assert_eq!(parsed.content[2].node_type, NodeType::For);
    assert_eq!(parsed.content[2].attr_str("each").as_deref(), Some("products"));
}
