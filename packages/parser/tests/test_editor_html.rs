use maily_parser::schema::{self, render_attrs};
use maily_parser::{parse, serialize, Node, NodeType};

#[test]
fn test_column_width_percentage_both_ways() {
    let doc = parse(r#"<div data-type="columns"><div data-type="column" style="width: 33%"><p>x</p></div></div>"#)
        .unwrap();
    let column = &doc.content[0].content[0];
    assert_eq!(column.attr_number("width"), Some(33.0));

    let style = render_attrs(column).style_string().unwrap();
    assert!(style.contains("width: 33%;max-width:33%"), "{}", style);
}

#[test]
fn test_column_without_id_gets_a_fresh_one() {
    let html = r#"<div data-type="columns"><div data-type="column"><p>a</p></div><div data-type="column"><p>b</p></div></div>"#;
    let doc = parse(html).unwrap();
    let first = doc.content[0].content[0].column_id().unwrap().to_string();
    let second = doc.content[0].content[1].column_id().unwrap().to_string();

    assert!(!first.is_empty());
    assert_ne!(first, second);
}

#[test]
fn test_malformed_values_fall_back_to_defaults() {
    let html = r#"<div data-type="section" style="padding-top: lots; margin-left: ;border-radius: px"><p>x</p></div>"#;
    let doc = parse(html).unwrap();
    let section = &doc.content[0];

    assert_eq!(section.attr_number("paddingTop"), Some(0.0));
    assert_eq!(section.attr_number("marginLeft"), Some(0.0));
    assert_eq!(section.attr_number("borderRadius"), Some(0.0));
    assert_eq!(section.attr_str("backgroundColor").as_deref(), Some("transparent"));
}

#[test]
fn test_transparent_background_serializes_with_white_fallback() {
    let html = serialize(&Node::doc(vec![Node::section(vec![Node::paragraph(vec![])])])).unwrap();
    assert!(html.contains("background-color: transparent;--bg-color: #ffffff"), "{}", html);
}

#[test]
fn test_every_registered_type_has_defaults_for_its_attributes() {
    let types = [
        NodeType::Paragraph,
        NodeType::Heading,
        NodeType::Columns,
        NodeType::Column,
        NodeType::Section,
        NodeType::For,
        NodeType::Variable,
        NodeType::Image,
        NodeType::ListItem,
        NodeType::Spacer,
    ];
    for node_type in types {
        let defaults = schema::default_attrs(&node_type);
        assert_eq!(defaults.len(), schema::attributes(&node_type).len(), "{}", node_type);
        // Defaults render to nothing except the always-on background
        let rendered = render_attrs(&Node::new(node_type.clone()));
        let styles = rendered.style_string().unwrap_or_default();
        assert!(
            styles.is_empty() || styles.starts_with("background-color: transparent"),
            "{}: {}",
            node_type,
            styles
        );
    }
}

#[test]
fn test_lists_round_trip() {
    let html = "<ul><li><p>one</p></li><li><p>two</p><ol><li><p>nested</p></li></ol></li></ul>";
    let doc = parse(html).unwrap();

    assert!(doc.validate().is_ok());
    assert_eq!(doc.content[0].node_type, NodeType::BulletList);
    assert_eq!(serialize(&doc).unwrap(), html);
}
