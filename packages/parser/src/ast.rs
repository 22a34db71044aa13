use crate::error::ContentError;
use crate::schema::{self, ContentRule};
use crate::style::{number_value, parse_number};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Node type names of the editor schema.
///
/// Anything the schema does not know deserializes into [`NodeType::Unknown`]
/// so that it is carried through loading and rejected by consumers that
/// cannot render it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
    Doc,
    Paragraph,
    Heading,
    Text,
    Columns,
    Column,
    Section,
    For,
    Variable,
    Image,
    BulletList,
    OrderedList,
    ListItem,
    HorizontalRule,
    HardBreak,
    Spacer,
    Footer,
    Unknown(String),
}

impl NodeType {
    pub fn name(&self) -> &str {
        match self {
            NodeType::Doc => "doc",
            NodeType::Paragraph => "paragraph",
            NodeType::Heading => "heading",
            NodeType::Text => "text",
            NodeType::Columns => "columns",
            NodeType::Column => "column",
            NodeType::Section => "section",
            NodeType::For => "for",
            NodeType::Variable => "variable",
            NodeType::Image => "image",
            NodeType::BulletList => "bulletList",
            NodeType::OrderedList => "orderedList",
            NodeType::ListItem => "listItem",
            NodeType::HorizontalRule => "horizontalRule",
            NodeType::HardBreak => "hardBreak",
            NodeType::Spacer => "spacer",
            NodeType::Footer => "footer",
            NodeType::Unknown(name) => name,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "doc" => NodeType::Doc,
            "paragraph" => NodeType::Paragraph,
            "heading" => NodeType::Heading,
            "text" => NodeType::Text,
            "columns" => NodeType::Columns,
            "column" => NodeType::Column,
            "section" => NodeType::Section,
            "for" => NodeType::For,
            "variable" => NodeType::Variable,
            "image" => NodeType::Image,
            "bulletList" => NodeType::BulletList,
            "orderedList" => NodeType::OrderedList,
            "listItem" => NodeType::ListItem,
            "horizontalRule" => NodeType::HorizontalRule,
            "hardBreak" => NodeType::HardBreak,
            "spacer" => NodeType::Spacer,
            "footer" => NodeType::Footer,
            other => NodeType::Unknown(other.to_string()),
        }
    }

    pub fn is_registered(&self) -> bool {
        !matches!(self, NodeType::Unknown(_))
    }

    /// Members of the `block` content group.
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            NodeType::Paragraph
                | NodeType::Heading
                | NodeType::Section
                | NodeType::For
                | NodeType::Image
                | NodeType::BulletList
                | NodeType::OrderedList
                | NodeType::HorizontalRule
                | NodeType::Spacer
                | NodeType::Footer
        )
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, NodeType::Text | NodeType::Variable | NodeType::HardBreak)
    }

    /// Blocks whose content is inline (where a cursor can rest).
    pub fn is_textblock(&self) -> bool {
        matches!(self, NodeType::Paragraph | NodeType::Heading | NodeType::Footer)
    }

    /// Leaf nodes that occupy a single position.
    pub fn is_atom(&self) -> bool {
        matches!(
            self,
            NodeType::Variable
                | NodeType::Image
                | NodeType::HardBreak
                | NodeType::HorizontalRule
                | NodeType::Spacer
        )
    }
}

impl From<String> for NodeType {
    fn from(name: String) -> Self {
        NodeType::from_name(&name)
    }
}

impl From<NodeType> for String {
    fn from(node_type: NodeType) -> Self {
        node_type.name().to_string()
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inline formatting marks
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MarkType {
    Bold,
    Italic,
    Strike,
    Underline,
    /// Carries `color`
    TextStyle,
    /// Carries `href`
    Link,
    Unknown(String),
}

impl MarkType {
    pub fn name(&self) -> &str {
        match self {
            MarkType::Bold => "bold",
            MarkType::Italic => "italic",
            MarkType::Strike => "strike",
            MarkType::Underline => "underline",
            MarkType::TextStyle => "textStyle",
            MarkType::Link => "link",
            MarkType::Unknown(name) => name,
        }
    }

    /// Position in the fixed composition order (outermost first).
    pub fn rank(&self) -> usize {
        match self {
            MarkType::Link => 0,
            MarkType::Bold => 1,
            MarkType::Italic => 2,
            MarkType::Strike => 3,
            MarkType::Underline => 4,
            MarkType::TextStyle => 5,
            MarkType::Unknown(_) => 6,
        }
    }
}

impl From<String> for MarkType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "bold" => MarkType::Bold,
            "italic" => MarkType::Italic,
            "strike" => MarkType::Strike,
            "underline" => MarkType::Underline,
            "textStyle" => MarkType::TextStyle,
            "link" => MarkType::Link,
            _ => MarkType::Unknown(name),
        }
    }
}

impl From<MarkType> for String {
    fn from(mark_type: MarkType) -> Self {
        mark_type.name().to_string()
    }
}

impl fmt::Display for MarkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    #[serde(rename = "type")]
    pub mark_type: MarkType,
    #[serde(default, skip_serializing_if = "Attrs::is_empty")]
    pub attrs: Attrs,
}

impl Mark {
    pub fn new(mark_type: MarkType) -> Self {
        Self {
            mark_type,
            attrs: Attrs::new(),
        }
    }

    pub fn color(color: impl Into<String>) -> Self {
        Self::new(MarkType::TextStyle).with_attr("color", color.into())
    }

    pub fn link(href: impl Into<String>) -> Self {
        Self::new(MarkType::Link).with_attr("href", href.into())
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.attrs.set(name, value);
        self
    }
}

/// Ordered attribute mapping of a node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attrs(BTreeMap<String, Value>);

impl Attrs {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.0.insert(name.to_string(), value.into());
    }

    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Overwrite with every key present in `other`; other keys keep their value.
    pub fn merge(&mut self, other: &Attrs) {
        for (name, value) in &other.0 {
            self.0.insert(name.clone(), value.clone());
        }
    }

    /// Numeric view; numeric strings such as `"12px"` are accepted.
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.0.get(name)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => parse_number(s),
            _ => None,
        }
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.0.get(name).and_then(Value::as_bool)
    }
}

impl FromIterator<(String, Value)> for Attrs {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Document tree node (the editor's JSON representation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Attrs::is_empty")]
    pub attrs: Attrs,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
}

impl Node {
    /// Create a node with every schema attribute set to its default.
    pub fn new(node_type: NodeType) -> Self {
        let attrs = schema::default_attrs(&node_type);
        Self {
            node_type,
            attrs,
            content: Vec::new(),
            text: None,
            marks: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            node_type: NodeType::Text,
            attrs: Attrs::new(),
            content: Vec::new(),
            text: Some(text.into()),
            marks: Vec::new(),
        }
    }

    pub fn doc(content: Vec<Node>) -> Self {
        Self::new(NodeType::Doc).with_content(content)
    }

    pub fn paragraph(content: Vec<Node>) -> Self {
        Self::new(NodeType::Paragraph).with_content(content)
    }

    pub fn heading(level: u8, content: Vec<Node>) -> Self {
        Self::new(NodeType::Heading)
            .with_attr("level", level)
            .with_content(content)
    }

    pub fn variable(id: impl Into<String>) -> Self {
        Self::new(NodeType::Variable).with_attr("id", id.into())
    }

    /// A column holding a single empty paragraph.
    pub fn column(column_id: impl Into<String>, width: Option<f64>) -> Self {
        let width = width.map(number_value).unwrap_or(Value::Null);
        Self::new(NodeType::Column)
            .with_attr("columnId", column_id.into())
            .with_attr("width", width)
            .with_content(vec![Node::paragraph(vec![])])
    }

    pub fn columns(columns: Vec<Node>) -> Self {
        Self::new(NodeType::Columns).with_content(columns)
    }

    pub fn for_each(each: impl Into<String>, content: Vec<Node>) -> Self {
        Self::new(NodeType::For)
            .with_attr("each", each.into())
            .with_content(content)
    }

    pub fn section(content: Vec<Node>) -> Self {
        Self::new(NodeType::Section).with_content(content)
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.attrs.set(name, value);
        self
    }

    pub fn with_attrs(mut self, attrs: &Attrs) -> Self {
        self.attrs.merge(attrs);
        self
    }

    pub fn with_content(mut self, content: Vec<Node>) -> Self {
        self.content = content;
        self
    }

    pub fn with_mark(mut self, mark: Mark) -> Self {
        self.marks.push(mark);
        self
    }

    /// Copy of this node with different children (attributes and marks kept).
    pub fn copy_with_content(&self, content: Vec<Node>) -> Self {
        Self {
            node_type: self.node_type.clone(),
            attrs: self.attrs.clone(),
            content,
            text: self.text.clone(),
            marks: self.marks.clone(),
        }
    }

    /// Attribute value, falling back to the schema default.
    pub fn attr(&self, name: &str) -> Value {
        match self.attrs.get(name) {
            Some(value) => value.clone(),
            None => schema::default_attr(&self.node_type, name).unwrap_or(Value::Null),
        }
    }

    pub fn attr_str(&self, name: &str) -> Option<String> {
        match self.attr(name) {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn attr_number(&self, name: &str) -> Option<f64> {
        match self.attr(name) {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => parse_number(&s),
            _ => None,
        }
    }

    /// `columnId` of a column node.
    pub fn column_id(&self) -> Option<&str> {
        self.attrs.string("columnId")
    }

    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    pub fn child_count(&self) -> usize {
        self.content.len()
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.content.get(index)
    }

    /// Size of the node in document positions.
    pub fn node_size(&self) -> usize {
        if self.is_text() {
            return self.text.as_deref().map(|t| t.chars().count()).unwrap_or(0);
        }
        if self.node_type.is_atom() {
            return 1;
        }
        self.content_size() + 2
    }

    pub fn content_size(&self) -> usize {
        self.content.iter().map(Node::node_size).sum()
    }

    /// Offset of child `index` relative to the start of this node's content.
    pub fn child_offset(&self, index: usize) -> usize {
        self.content.iter().take(index).map(Node::node_size).sum()
    }

    pub fn node_at_path(&self, path: &[usize]) -> Option<&Node> {
        let mut node = self;
        for &index in path {
            node = node.content.get(index)?;
        }
        Some(node)
    }

    /// Concatenated text of all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in &self.content {
            child.collect_text(out);
        }
    }

    /// Pre-order walk calling `f` with each node and its child-index path.
    pub fn descendants<F: FnMut(&Node, &[usize])>(&self, mut f: F) {
        let mut path = Vec::new();
        self.walk(&mut path, &mut f);
    }

    fn walk<F: FnMut(&Node, &[usize])>(&self, path: &mut Vec<usize>, f: &mut F) {
        f(self, path);
        for (index, child) in self.content.iter().enumerate() {
            path.push(index);
            child.walk(path, f);
            path.pop();
        }
    }

    /// Check content constraints of the whole subtree.
    pub fn validate(&self) -> Result<(), ContentError> {
        let mut path = Vec::new();
        self.validate_at(&mut path)
    }

    fn validate_at(&self, path: &mut Vec<usize>) -> Result<(), ContentError> {
        if !self.node_type.is_registered() {
            return Err(ContentError::unknown_type(self.node_type.name(), path));
        }
        let rule = schema::content_rule(&self.node_type);
        if let Err(message) = rule.check(&self.content) {
            return Err(ContentError::invalid(self.node_type.name(), path, message));
        }
        if self.is_text() && self.text.as_deref().map_or(true, str::is_empty) {
            return Err(ContentError::invalid("text", path, "empty text node"));
        }
        for (index, child) in self.content.iter().enumerate() {
            path.push(index);
            child.validate_at(path)?;
            path.pop();
        }
        Ok(())
    }

    pub fn content_rule(&self) -> ContentRule {
        schema::content_rule(&self.node_type)
    }
}
