//! Integration tests for editor crate

use maily_editor::{columns, commands, Command, DocumentEngine, Editor, Node, NodeType, Selection};
use maily_parser::IDGenerator;

#[test]
fn test_document_lifecycle() {
    let json = r#"{
        "type": "doc",
        "content": [
            { "type": "heading", "attrs": { "level": 1 }, "content": [{ "type": "text", "text": "Hi" }] },
            {
                "type": "columns",
                "content": [
                    { "type": "column", "attrs": { "columnId": "a", "width": 50 }, "content": [{ "type": "paragraph" }] },
                    { "type": "column", "attrs": { "columnId": "b", "width": 50 }, "content": [{ "type": "paragraph" }] }
                ]
            }
        ]
    }"#;

    let mut editor = Editor::from_json(json).unwrap();
    assert_eq!(editor.version(), 0);

    // heading 0..4, columns at 4, column a at 5, its paragraph content at 7
    editor.set_selection(Selection::cursor(7)).unwrap();
    assert!(columns::add_column(&mut editor).unwrap());
    assert_eq!(columns::column_count(&editor), 3);

    let reloaded = Editor::from_json(&editor.to_json().unwrap()).unwrap();
    assert_eq!(reloaded.doc(), editor.doc());
}

#[test]
fn test_html_and_json_views_agree() {
    let mut editor = Editor::empty().with_id_generator(IDGenerator::sequential("col"));
    commands::insert_columns(&mut editor, 2).unwrap();

    let from_html = Editor::from_html(&editor.to_html().unwrap()).unwrap();
    assert_eq!(from_html.doc(), editor.doc());
}

#[test]
fn test_unknown_node_type_is_rejected_on_load() {
    let json = r#"{ "type": "doc", "content": [{ "type": "carousel" }] }"#;
    assert!(Editor::from_json(json).is_err());
}

#[test]
fn test_command_script_from_json() {
    let script = r##"[
        { "command": "insertSection" },
        { "command": "updateAttributes", "nodeType": "section", "attrs": { "backgroundColor": "#f5f5f5", "paddingTop": 24 } },
        { "command": "insertColumns", "count": 3 },
        { "command": "goToColumn", "direction": "next" },
        { "command": "removeColumn" }
    ]"##;
    let commands: Vec<Command> = serde_json::from_str(script).unwrap();

    let mut editor = Editor::empty();
    let applied = Command::apply_all(&commands, &mut editor).unwrap();

    assert_eq!(applied, 5);
    let doc = editor.doc();
    assert_eq!(doc.content[1].node_type, NodeType::Section);
    assert_eq!(doc.content[1].attr_str("backgroundColor").as_deref(), Some("#f5f5f5"));
    assert_eq!(doc.content[2].node_type, NodeType::Columns);
    assert_eq!(doc.content[2].child_count(), 2);
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("template.html");
    std::fs::write(&path, "<p>Hello</p>").unwrap();

    let editor = Editor::load(&path).unwrap();
    assert_eq!(editor.doc(), &Node::doc(vec![Node::paragraph(vec![Node::text("Hello")])]));
}
