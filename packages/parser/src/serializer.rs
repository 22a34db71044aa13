use crate::ast::{Mark, Node, NodeType};
use crate::error::ContentError;
use crate::schema::{self, RenderedAttrs};

/// Serializer converts a document back to editor HTML
///
/// The output is what the editor itself renders for a document, so
/// `parse(serialize(doc))` yields the same node types, attributes
/// (including `columnId`) and text. Pretty mode puts every block on its own
/// line; inline content is never reflowed.
pub struct Serializer {
    indent_level: usize,
    indent_string: String,
    pretty: bool,
    /// Child indices from the root to the node being written
    path: Vec<usize>,
}

impl Serializer {
    pub fn new() -> Self {
        Self {
            indent_level: 0,
            indent_string: "  ".to_string(),
            pretty: false,
            path: Vec::new(),
        }
    }

    pub fn with_indent(indent: &str) -> Self {
        Self {
            indent_level: 0,
            indent_string: indent.to_string(),
            pretty: true,
            path: Vec::new(),
        }
    }

    /// Serialize a `doc` (or any block) to editor HTML. Nodes the editor
    /// cannot render fail the whole serialization instead of being dropped.
    pub fn serialize(&mut self, node: &Node) -> Result<String, ContentError> {
        self.path.clear();
        self.indent_level = 0;
        let mut output = String::new();
        if node.node_type == NodeType::Doc {
            self.serialize_children(node, &mut output)?;
        } else {
            self.serialize_block(node, &mut output)?;
        }
        if self.pretty && output.ends_with('\n') {
            output.pop();
        }
        Ok(output)
    }

    fn serialize_children(&mut self, node: &Node, output: &mut String) -> Result<(), ContentError> {
        for (index, child) in node.content.iter().enumerate() {
            self.path.push(index);
            let result = self.serialize_block(child, output);
            self.path.pop();
            result?;
        }
        Ok(())
    }

    fn serialize_block(&mut self, node: &Node, output: &mut String) -> Result<(), ContentError> {
        let (tag, attrs) = match element_attrs(node) {
            Some(spec) if !node.node_type.is_inline() => spec,
            _ => return Err(self.unrenderable(node, "block")),
        };

        self.line_start(output);
        open_tag(&tag, &attrs, output);

        if is_void(&tag) {
            self.line_end(output);
            return Ok(());
        }

        if node.node_type.is_textblock() {
            for (index, child) in node.content.iter().enumerate() {
                self.path.push(index);
                let result = self.serialize_inline(child, output);
                self.path.pop();
                result?;
            }
        } else if !node.content.is_empty() {
            self.line_end(output);
            self.indent_level += 1;
            self.serialize_children(node, output)?;
            self.indent_level -= 1;
            self.line_start(output);
        }

        close_tag(&tag, output);
        self.line_end(output);
        Ok(())
    }

    fn serialize_inline(&self, node: &Node, output: &mut String) -> Result<(), ContentError> {
        match &node.node_type {
            NodeType::Text => {
                let mut marks: Vec<&Mark> = node.marks.iter().collect();
                marks.sort_by_key(|mark| mark.mark_type.rank());
                let specs: Vec<_> = marks.iter().filter_map(|mark| schema::mark_dom_spec(mark)).collect();

                for (tag, attrs) in &specs {
                    open_tag(tag, attrs, output);
                }
                output.push_str(&html_escape::encode_text(node.text.as_deref().unwrap_or_default()));
                for (tag, _) in specs.iter().rev() {
                    close_tag(tag, output);
                }
            }
            NodeType::Variable => {
                let (tag, attrs) = element_attrs(node).ok_or_else(|| self.unrenderable(node, "inline"))?;
                open_tag(&tag, &attrs, output);
                if let Some(id) = node.attr_str("id") {
                    output.push_str("{{");
                    output.push_str(&html_escape::encode_text(&id));
                    output.push_str("}}");
                }
                close_tag(&tag, output);
            }
            NodeType::HardBreak => output.push_str("<br>"),
            _ => return Err(self.unrenderable(node, "inline")),
        }
        Ok(())
    }

    fn unrenderable(&self, node: &Node, position: &str) -> ContentError {
        if node.node_type.is_registered() {
            ContentError::invalid(
                node.node_type.name(),
                &self.path,
                format!("cannot be written in {} position", position),
            )
        } else {
            ContentError::unknown_type(node.node_type.name(), &self.path)
        }
    }

    fn line_start(&self, output: &mut String) {
        if self.pretty {
            for _ in 0..self.indent_level {
                output.push_str(&self.indent_string);
            }
        }
    }

    fn line_end(&self, output: &mut String) {
        if self.pretty {
            output.push('\n');
        }
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize a document to compact editor HTML
pub fn serialize(node: &Node) -> Result<String, ContentError> {
    Serializer::new().serialize(node)
}

/// Serialize a document to editor HTML with one block per line
pub fn serialize_pretty(node: &Node) -> Result<String, ContentError> {
    Serializer::with_indent("  ").serialize(node)
}

fn element_attrs(node: &Node) -> Option<(String, RenderedAttrs)> {
    let (tag, mut attrs) = schema::dom_spec(node)?;
    attrs.merge(schema::render_attrs(node));
    Some((tag, attrs))
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "img" | "hr" | "br")
}

fn open_tag(tag: &str, attrs: &RenderedAttrs, output: &mut String) {
    output.push('<');
    output.push_str(tag);
    for (name, value) in &attrs.attributes {
        push_attr(name, value, output);
    }
    if let Some(style) = attrs.style_string() {
        push_attr("style", &style, output);
    }
    output.push('>');
}

fn push_attr(name: &str, value: &str, output: &mut String) {
    output.push(' ');
    output.push_str(name);
    output.push_str("=\"");
    output.push_str(&html_escape::encode_double_quoted_attribute(value));
    output.push('"');
}

fn close_tag(tag: &str, output: &mut String) {
    output.push_str("</");
    output.push_str(tag);
    output.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Mark;

    #[test]
    fn test_serialize_paragraph_with_marks_in_fixed_order() {
        let text = Node::text("hi")
            .with_mark(Mark::new(crate::ast::MarkType::Italic))
            .with_mark(Mark::link("https://example.com"))
            .with_mark(Mark::new(crate::ast::MarkType::Bold));
        let html = serialize(&Node::doc(vec![Node::paragraph(vec![text])])).unwrap();

        assert_eq!(
            html,
            r#"<p><a href="https://example.com" target="_blank"><strong><em>hi</em></strong></a></p>"#
        );
    }

    #[test]
    fn test_serialize_column_attributes() {
        let column = Node::column("abc", Some(50.0)).with_attr("paddingTop", 8);
        let html = serialize(&Node::doc(vec![Node::columns(vec![column])])).unwrap();

        assert!(html.starts_with(r#"<div data-type="columns">"#), "{}", html);
        assert!(html.contains(r#"data-column-id="abc""#));
        assert!(html.contains(r#"class="hide-scrollbars""#));
        assert!(html.contains("width: 50%;max-width:50%"));
        assert!(html.contains("padding-top: 8px"));
    }

    #[test]
    fn test_serialize_escapes_text() {
        let html = serialize(&Node::doc(vec![Node::paragraph(vec![Node::text("a < b & c")])])).unwrap();
        assert_eq!(html, "<p>a &lt; b &amp; c</p>");
    }

    #[test]
    fn test_serialize_for_and_variable() {
        let doc = Node::doc(vec![Node::for_each(
            "products",
            vec![Node::paragraph(vec![Node::variable("name")])],
        )]);
        let html = serialize(&doc).unwrap();

        assert!(html.starts_with(r#"<div data-type="for" each="products">"#), "{}", html);
        assert!(html.contains(r#"<span data-id="name" data-type="variable">{{name}}</span>"#));
    }

    #[test]
    fn test_pretty_serialization_puts_blocks_on_lines() {
        let doc = Node::doc(vec![Node::section(vec![Node::paragraph(vec![Node::text("x")])])]);
        let html = serialize_pretty(&doc).unwrap();
        let lines: Vec<&str> = html.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "  <p>x</p>");
    }

    #[test]
    fn test_serialize_fails_on_unknown_node_instead_of_dropping_it() {
        let doc = Node::doc(vec![
            Node::paragraph(vec![Node::text("kept")]),
            Node::new(NodeType::Unknown("carousel".to_string()))
                .with_content(vec![Node::paragraph(vec![Node::text("slides")])]),
        ]);

        let err = serialize(&doc).unwrap_err();
        assert_eq!(err, ContentError::unknown_type("carousel", &[1]));
        assert_eq!(err.to_string(), "Unknown node type 'carousel' at root/1");
    }

    #[test]
    fn test_serialize_fails_on_unknown_inline_node() {
        let doc = Node::doc(vec![Node::section(vec![Node::paragraph(vec![
            Node::text("a"),
            Node::new(NodeType::Unknown("emoji".to_string())),
        ])])]);

        assert_eq!(serialize(&doc).unwrap_err(), ContentError::unknown_type("emoji", &[0, 0, 1]));
    }

    #[test]
    fn test_serialize_fails_on_block_in_inline_position() {
        let doc = Node::doc(vec![Node::paragraph(vec![Node::paragraph(vec![Node::text("x")])])]);

        match serialize(&doc) {
            Err(ContentError::InvalidContent { node_type, path, .. }) => {
                assert_eq!(node_type, "paragraph");
                assert_eq!(path, vec![0, 0]);
            }
            other => panic!("expected invalid content, got {:?}", other),
        }
    }
}
