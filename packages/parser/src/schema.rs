//! # Node Attribute Schema
//!
//! Declarative attribute definitions per node type. Every attribute has a
//! default, a parse rule reading the serialized editor HTML and a render rule
//! producing HTML attributes or inline style fragments. Dispatch is a single
//! `match` over [`NodeType`] and [`AttrKind`].
//!
//! Render rules return nothing when the value is the default, with two
//! exceptions kept for compatibility with exported templates: background
//! colors always render (together with the `--bg-color` fallback), and plain
//! HTML attributes render whenever they hold a value.

use crate::ast::{Attrs, Mark, MarkType, Node, NodeType};
use crate::dom::HtmlElement;
use crate::id_generator::new_column_id;
use crate::style::{format_number, number_value, parse_number};
use serde_json::Value;
use std::collections::BTreeMap;

pub const DEFAULT_COLOR: &str = "transparent";
pub const BACKGROUND_FALLBACK: &str = "#ffffff";
pub const BACKGROUND_FALLBACK_PROPERTY: &str = "--bg-color";
pub const DEFAULT_VERTICAL_ALIGN: &str = "top";
pub const DEFAULT_TEXT_ALIGN: &str = "left";
pub const DEFAULT_EACH: &str = "items";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttrDefault {
    Null,
    Number(f64),
    Str(&'static str),
    Bool(bool),
}

impl AttrDefault {
    pub fn to_value(self) -> Value {
        match self {
            AttrDefault::Null => Value::Null,
            AttrDefault::Number(n) => number_value(n),
            AttrDefault::Str(s) => Value::from(s),
            AttrDefault::Bool(b) => Value::from(b),
        }
    }
}

/// How an attribute maps to and from serialized HTML
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttrKind {
    /// Number rendered as `property: {n}px`
    Pixels(&'static str),
    /// String rendered as `property: {value}`
    Css(&'static str),
    /// `background-color` plus the opaque `--bg-color` fallback
    Background,
    /// `top | middle | bottom`, rendered as a flex column
    VerticalAlign,
    /// Column percentage, `width: {w}%;max-width:{w}%`
    ColumnWidth,
    /// Stable column identity, `data-column-id`
    ColumnId,
    /// `text-align`
    TextAlign,
    /// Plain HTML attribute
    Html(&'static str),
    /// Heading level, carried by the tag name
    Level,
    /// Edit-time state, never serialized
    Transient,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttrSpec {
    pub name: &'static str,
    pub kind: AttrKind,
    pub default: AttrDefault,
}

const fn spec(name: &'static str, kind: AttrKind, default: AttrDefault) -> AttrSpec {
    AttrSpec {
        name,
        kind,
        default,
    }
}

const fn px(name: &'static str, css: &'static str) -> AttrSpec {
    spec(name, AttrKind::Pixels(css), AttrDefault::Number(0.0))
}

const SHOW_IF: AttrSpec = spec("showIfKey", AttrKind::Html("data-show-if"), AttrDefault::Str(""));
const TEXT_ALIGN: AttrSpec = spec("textAlign", AttrKind::TextAlign, AttrDefault::Str(DEFAULT_TEXT_ALIGN));
const BACKGROUND: AttrSpec = spec("backgroundColor", AttrKind::Background, AttrDefault::Str(DEFAULT_COLOR));
const BORDER_RADIUS: AttrSpec = px("borderRadius", "border-radius");
const BORDER_WIDTH: AttrSpec = px("borderWidth", "border-width");
const BORDER_COLOR: AttrSpec = spec("borderColor", AttrKind::Css("border-color"), AttrDefault::Str(DEFAULT_COLOR));

static PARAGRAPH_ATTRS: &[AttrSpec] = &[TEXT_ALIGN];

static HEADING_ATTRS: &[AttrSpec] = &[
    TEXT_ALIGN,
    spec("level", AttrKind::Level, AttrDefault::Number(1.0)),
];

static COLUMNS_ATTRS: &[AttrSpec] = &[
    spec("width", AttrKind::Css("width"), AttrDefault::Str("100%")),
    SHOW_IF,
];

static COLUMN_ATTRS: &[AttrSpec] = &[
    spec("columnId", AttrKind::ColumnId, AttrDefault::Null),
    spec("width", AttrKind::ColumnWidth, AttrDefault::Null),
    spec("verticalAlign", AttrKind::VerticalAlign, AttrDefault::Str(DEFAULT_VERTICAL_ALIGN)),
    BORDER_RADIUS,
    BACKGROUND,
    BORDER_WIDTH,
    BORDER_COLOR,
    px("paddingTop", "padding-top"),
    px("paddingRight", "padding-right"),
    px("paddingBottom", "padding-bottom"),
    px("paddingLeft", "padding-left"),
    SHOW_IF,
];

static SECTION_ATTRS: &[AttrSpec] = &[
    BORDER_RADIUS,
    BACKGROUND,
    spec("align", AttrKind::Html("data-align"), AttrDefault::Str(DEFAULT_TEXT_ALIGN)),
    BORDER_WIDTH,
    BORDER_COLOR,
    px("paddingTop", "padding-top"),
    px("paddingRight", "padding-right"),
    px("paddingBottom", "padding-bottom"),
    px("paddingLeft", "padding-left"),
    px("marginTop", "margin-top"),
    px("marginRight", "margin-right"),
    px("marginBottom", "margin-bottom"),
    px("marginLeft", "margin-left"),
    SHOW_IF,
];

static FOR_ATTRS: &[AttrSpec] = &[
    spec("each", AttrKind::Html("each"), AttrDefault::Str(DEFAULT_EACH)),
    spec("isUpdatingKey", AttrKind::Transient, AttrDefault::Bool(false)),
];

static VARIABLE_ATTRS: &[AttrSpec] = &[
    spec("id", AttrKind::Html("data-id"), AttrDefault::Null),
    spec("label", AttrKind::Html("data-label"), AttrDefault::Null),
];

static IMAGE_ATTRS: &[AttrSpec] = &[
    spec("src", AttrKind::Html("src"), AttrDefault::Null),
    spec("alt", AttrKind::Html("alt"), AttrDefault::Null),
    spec("title", AttrKind::Html("title"), AttrDefault::Null),
    spec("width", AttrKind::Html("width"), AttrDefault::Null),
    spec("height", AttrKind::Html("height"), AttrDefault::Null),
];

static LIST_ITEM_ATTRS: &[AttrSpec] = &[spec("color", AttrKind::Css("color"), AttrDefault::Null)];

static SPACER_ATTRS: &[AttrSpec] = &[spec("height", AttrKind::Html("data-height"), AttrDefault::Str("md"))];

/// Attribute definitions of a node type, in declaration order.
pub fn attributes(node_type: &NodeType) -> &'static [AttrSpec] {
    match node_type {
        NodeType::Paragraph | NodeType::Footer => PARAGRAPH_ATTRS,
        NodeType::Heading => HEADING_ATTRS,
        NodeType::Columns => COLUMNS_ATTRS,
        NodeType::Column => COLUMN_ATTRS,
        NodeType::Section => SECTION_ATTRS,
        NodeType::For => FOR_ATTRS,
        NodeType::Variable => VARIABLE_ATTRS,
        NodeType::Image => IMAGE_ATTRS,
        NodeType::ListItem => LIST_ITEM_ATTRS,
        NodeType::Spacer => SPACER_ATTRS,
        NodeType::Doc
        | NodeType::Text
        | NodeType::BulletList
        | NodeType::OrderedList
        | NodeType::HorizontalRule
        | NodeType::HardBreak
        | NodeType::Unknown(_) => &[],
    }
}

pub fn attribute(node_type: &NodeType, name: &str) -> Option<&'static AttrSpec> {
    attributes(node_type).iter().find(|spec| spec.name == name)
}

pub fn default_attrs(node_type: &NodeType) -> Attrs {
    attributes(node_type)
        .iter()
        .map(|spec| (spec.name.to_string(), spec.default_value()))
        .collect()
}

pub fn default_attr(node_type: &NodeType, name: &str) -> Option<Value> {
    attribute(node_type, name).map(AttrSpec::default_value)
}

/// Read every attribute of `node_type` from a serialized element.
pub fn parse_attrs(node_type: &NodeType, element: &HtmlElement) -> Attrs {
    attributes(node_type)
        .iter()
        .map(|spec| (spec.name.to_string(), spec.parse(element)))
        .collect()
}

/// Merge the render output of every attribute of `node`.
pub fn render_attrs(node: &Node) -> RenderedAttrs {
    let mut rendered = RenderedAttrs::default();
    for spec in attributes(&node.node_type) {
        rendered.merge(spec.render(&node.attrs));
    }
    rendered
}

impl AttrSpec {
    pub fn default_value(&self) -> Value {
        self.default.to_value()
    }

    fn value<'a>(&self, attrs: &'a Attrs) -> Option<&'a Value> {
        attrs.get(self.name)
    }

    fn number(&self, attrs: &Attrs) -> Option<f64> {
        match self.value(attrs) {
            Some(_) => attrs.number(self.name),
            None => match self.default {
                AttrDefault::Number(n) => Some(n),
                _ => None,
            },
        }
    }

    fn string(&self, attrs: &Attrs) -> String {
        match self.value(attrs) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.as_f64().map(format_number).unwrap_or_default(),
            Some(_) => String::new(),
            None => match self.default {
                AttrDefault::Str(s) => s.to_string(),
                _ => String::new(),
            },
        }
    }

    fn is_default_str(&self, value: &str) -> bool {
        matches!(self.default, AttrDefault::Str(d) if d == value)
    }

    /// Value read from a serialized element; falls back to the default on
    /// missing or malformed markup.
    pub fn parse(&self, element: &HtmlElement) -> Value {
        let style = element.style();
        let parsed = match self.kind {
            AttrKind::Pixels(css) => style.get(css).and_then(parse_number).map(number_value),
            AttrKind::Css(css) => non_empty(style.get(css)),
            AttrKind::Background => non_empty(style.get("background-color")),
            AttrKind::TextAlign => non_empty(style.get("text-align")),
            AttrKind::VerticalAlign => {
                let justify = style.get("justify-content");
                if style.get("display") == Some("flex") && justify == Some("center") {
                    Some(Value::from("middle"))
                } else if style.get("display") == Some("flex") && justify == Some("flex-end") {
                    Some(Value::from("bottom"))
                } else {
                    style
                        .get("vertical-align")
                        .filter(|v| matches!(*v, "top" | "middle" | "bottom"))
                        .map(Value::from)
                }
            }
            AttrKind::ColumnWidth => style
                .get("width")
                .filter(|w| *w != "auto")
                .and_then(parse_number)
                .map(number_value),
            AttrKind::ColumnId => Some(Value::from(
                element
                    .attr("data-column-id")
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(new_column_id),
            )),
            AttrKind::Html(attr) => element.attr(attr).map(|raw| match self.default {
                AttrDefault::Number(_) => parse_number(raw)
                    .map(number_value)
                    .unwrap_or_else(|| self.default_value()),
                AttrDefault::Bool(_) => Value::from(raw == "true"),
                _ => Value::from(raw),
            }),
            AttrKind::Level => element
                .tag
                .strip_prefix('h')
                .and_then(|n| n.parse::<u8>().ok())
                .map(|level| Value::from(level.clamp(1, 3))),
            AttrKind::Transient => None,
        };
        parsed.unwrap_or_else(|| self.default_value())
    }

    /// HTML attributes and style fragments for this attribute of `attrs`.
    pub fn render(&self, attrs: &Attrs) -> RenderedAttrs {
        match self.kind {
            AttrKind::Pixels(css) => match self.number(attrs) {
                Some(n) if n != 0.0 => RenderedAttrs::style(format!("{}: {}px", css, format_number(n))),
                _ => RenderedAttrs::default(),
            },
            AttrKind::Css(css) => {
                let value = self.string(attrs);
                if value.is_empty() || self.is_default_str(&value) {
                    RenderedAttrs::default()
                } else {
                    RenderedAttrs::style(format!("{}: {}", css, value))
                }
            }
            AttrKind::TextAlign => {
                let value = self.string(attrs);
                if value.is_empty() || value == DEFAULT_TEXT_ALIGN {
                    RenderedAttrs::default()
                } else {
                    RenderedAttrs::style(format!("text-align: {}", value))
                }
            }
            AttrKind::Background => {
                let color = self.string(attrs);
                if color.is_empty() {
                    return RenderedAttrs::default();
                }
                RenderedAttrs::style(format!(
                    "background-color: {};{}: {}",
                    color,
                    BACKGROUND_FALLBACK_PROPERTY,
                    background_fallback(&color)
                ))
            }
            AttrKind::VerticalAlign => match self.string(attrs).as_str() {
                "middle" => RenderedAttrs::style(
                    "display: flex;flex-direction: column;justify-content: center;",
                ),
                "bottom" => RenderedAttrs::style(
                    "display: flex;flex-direction: column;justify-content: flex-end;",
                ),
                _ => RenderedAttrs::default(),
            },
            AttrKind::ColumnWidth => match self.number(attrs) {
                Some(width) => {
                    let width = format_number(width);
                    RenderedAttrs::style(format!("width: {}%;max-width:{}%", width, width))
                }
                None => RenderedAttrs::default(),
            },
            AttrKind::ColumnId => match attrs.string(self.name) {
                Some(id) if !id.is_empty() => RenderedAttrs::attr("data-column-id", id),
                _ => RenderedAttrs::default(),
            },
            AttrKind::Html(attr) => match self.value(attrs) {
                Some(Value::Bool(true)) => RenderedAttrs::attr(attr, "true"),
                Some(Value::Bool(false)) | Some(Value::Null) => RenderedAttrs::default(),
                _ => {
                    let value = self.string(attrs);
                    if value.is_empty() {
                        RenderedAttrs::default()
                    } else {
                        RenderedAttrs::attr(attr, value)
                    }
                }
            },
            AttrKind::Level | AttrKind::Transient => RenderedAttrs::default(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<Value> {
    value.filter(|v| !v.is_empty()).map(Value::from)
}

/// Opaque color used where a renderer cannot composite transparency.
pub fn background_fallback(color: &str) -> &str {
    if color == DEFAULT_COLOR {
        BACKGROUND_FALLBACK
    } else {
        color
    }
}

/// Output of attribute render rules: markup attributes plus inline style
/// fragments in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedAttrs {
    pub attributes: BTreeMap<String, String>,
    pub styles: Vec<String>,
}

impl RenderedAttrs {
    pub fn attr(name: &str, value: impl Into<String>) -> Self {
        let mut rendered = Self::default();
        rendered.attributes.insert(name.to_string(), value.into());
        rendered
    }

    pub fn style(fragment: impl Into<String>) -> Self {
        Self {
            attributes: BTreeMap::new(),
            styles: vec![fragment.into()],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.styles.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Later attributes overwrite, styles accumulate.
    pub fn merge(&mut self, other: RenderedAttrs) {
        self.attributes.extend(other.attributes);
        self.styles.extend(other.styles);
    }

    pub fn push_style(&mut self, fragment: impl Into<String>) {
        self.styles.push(fragment.into());
    }

    /// Style fragments joined with `; `.
    pub fn style_string(&self) -> Option<String> {
        let fragments: Vec<&str> = self
            .styles
            .iter()
            .map(|s| s.trim().trim_end_matches(';'))
            .filter(|s| !s.is_empty())
            .collect();
        if fragments.is_empty() {
            None
        } else {
            Some(fragments.join("; "))
        }
    }
}

/// Allowed children of a node type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentRule {
    /// Leaf
    Empty,
    /// `inline*`
    Inline,
    /// `block+`
    Blocks,
    /// `(block|columns)+`
    BlocksOrColumns,
    /// `column+`
    Columns,
    /// `listItem+`
    ListItems,
    /// `paragraph block*`
    ListItem,
}

pub fn content_rule(node_type: &NodeType) -> ContentRule {
    match node_type {
        NodeType::Doc | NodeType::Section | NodeType::For => ContentRule::BlocksOrColumns,
        NodeType::Column => ContentRule::Blocks,
        NodeType::Columns => ContentRule::Columns,
        NodeType::Paragraph | NodeType::Heading | NodeType::Footer => ContentRule::Inline,
        NodeType::BulletList | NodeType::OrderedList => ContentRule::ListItems,
        NodeType::ListItem => ContentRule::ListItem,
        NodeType::Text
        | NodeType::Variable
        | NodeType::Image
        | NodeType::HorizontalRule
        | NodeType::HardBreak
        | NodeType::Spacer
        | NodeType::Unknown(_) => ContentRule::Empty,
    }
}

impl ContentRule {
    /// Whether a child of `node_type` may appear under this rule.
    /// Unregistered types are let through so they are reported by name.
    pub fn allows(&self, node_type: &NodeType) -> bool {
        if !node_type.is_registered() {
            return !matches!(self, ContentRule::Empty);
        }
        match self {
            ContentRule::Empty => false,
            ContentRule::Inline => node_type.is_inline(),
            ContentRule::Blocks | ContentRule::ListItem => node_type.is_block(),
            ContentRule::BlocksOrColumns => node_type.is_block() || *node_type == NodeType::Columns,
            ContentRule::Columns => *node_type == NodeType::Column,
            ContentRule::ListItems => *node_type == NodeType::ListItem,
        }
    }

    pub fn requires_content(&self) -> bool {
        !matches!(self, ContentRule::Empty | ContentRule::Inline)
    }

    pub fn check(&self, content: &[Node]) -> Result<(), String> {
        if self.requires_content() && content.is_empty() {
            return Err("expected at least one child".to_string());
        }
        if *self == ContentRule::ListItem {
            if let Some(first) = content.first() {
                if first.node_type != NodeType::Paragraph && first.node_type.is_registered() {
                    return Err(format!("list item must start with a paragraph, found '{}'", first.node_type));
                }
            }
        }
        match content.iter().find(|child| !self.allows(&child.node_type)) {
            Some(child) => Err(format!("'{}' is not allowed here", child.node_type)),
            None => Ok(()),
        }
    }
}

/// Node type an element parses into, by `data-type` first, then tag name.
pub fn node_type_for_element(element: &HtmlElement) -> Option<NodeType> {
    if let Some(data_type) = element.data_type() {
        let node_type = match data_type {
            "columns" => Some(NodeType::Columns),
            "column" => Some(NodeType::Column),
            "section" => Some(NodeType::Section),
            "for" => Some(NodeType::For),
            "variable" => Some(NodeType::Variable),
            "spacer" => Some(NodeType::Spacer),
            "footer" => Some(NodeType::Footer),
            _ => None,
        };
        if node_type.is_some() {
            return node_type;
        }
    }

    match element.tag.as_str() {
        "p" => Some(NodeType::Paragraph),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Some(NodeType::Heading),
        "ul" => Some(NodeType::BulletList),
        "ol" => Some(NodeType::OrderedList),
        "li" => Some(NodeType::ListItem),
        "img" => Some(NodeType::Image),
        "hr" => Some(NodeType::HorizontalRule),
        "br" => Some(NodeType::HardBreak),
        _ => None,
    }
}

/// Mark an inline element stands for.
pub fn mark_for_element(element: &HtmlElement) -> Option<Mark> {
    match element.tag.as_str() {
        "strong" | "b" => Some(Mark::new(MarkType::Bold)),
        "em" | "i" => Some(Mark::new(MarkType::Italic)),
        "s" | "del" | "strike" => Some(Mark::new(MarkType::Strike)),
        "u" => Some(Mark::new(MarkType::Underline)),
        "a" => element.attr("href").map(Mark::link),
        "span" => element.style_value("color").map(Mark::color),
        _ => None,
    }
}

/// Tag and fixed attributes the editor renders for a node type.
pub fn dom_spec(node: &Node) -> Option<(String, RenderedAttrs)> {
    let data_type = |name: &str| RenderedAttrs::attr("data-type", name);
    let spec = match &node.node_type {
        NodeType::Doc | NodeType::Text | NodeType::Unknown(_) => return None,
        NodeType::Paragraph => ("p".to_string(), RenderedAttrs::default()),
        NodeType::Heading => {
            let level = node.attr_number("level").unwrap_or(1.0).clamp(1.0, 3.0);
            (format!("h{}", level as u8), RenderedAttrs::default())
        }
        NodeType::Columns => ("div".to_string(), data_type("columns")),
        NodeType::Column => {
            let mut attrs = data_type("column");
            attrs.merge(RenderedAttrs::attr("class", "hide-scrollbars"));
            ("div".to_string(), attrs)
        }
        NodeType::Section => ("div".to_string(), data_type("section")),
        NodeType::For => ("div".to_string(), data_type("for")),
        NodeType::Variable => ("span".to_string(), data_type("variable")),
        NodeType::Spacer => ("div".to_string(), data_type("spacer")),
        NodeType::Footer => ("p".to_string(), data_type("footer")),
        NodeType::Image => ("img".to_string(), RenderedAttrs::default()),
        NodeType::BulletList => ("ul".to_string(), RenderedAttrs::default()),
        NodeType::OrderedList => ("ol".to_string(), RenderedAttrs::default()),
        NodeType::ListItem => ("li".to_string(), RenderedAttrs::default()),
        NodeType::HorizontalRule => ("hr".to_string(), RenderedAttrs::default()),
        NodeType::HardBreak => ("br".to_string(), RenderedAttrs::default()),
    };
    Some(spec)
}

/// Tag and attributes the editor renders for a mark.
pub fn mark_dom_spec(mark: &Mark) -> Option<(&'static str, RenderedAttrs)> {
    match &mark.mark_type {
        MarkType::Bold => Some(("strong", RenderedAttrs::default())),
        MarkType::Italic => Some(("em", RenderedAttrs::default())),
        MarkType::Strike => Some(("s", RenderedAttrs::default())),
        MarkType::Underline => Some(("u", RenderedAttrs::default())),
        MarkType::TextStyle => mark
            .attrs
            .string("color")
            .filter(|c| !c.is_empty())
            .map(|color| ("span", RenderedAttrs::style(format!("color: {}", color)))),
        MarkType::Link => mark.attrs.string("href").map(|href| {
            let mut attrs = RenderedAttrs::attr("href", href);
            attrs.merge(RenderedAttrs::attr("target", "_blank"));
            ("a", attrs)
        }),
        MarkType::Unknown(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_with(attrs: Attrs) -> Node {
        Node::new(NodeType::Column).with_attrs(&attrs)
    }

    #[test]
    fn test_column_width_renders_percentage() {
        let node = column_with(Attrs::new().with("width", 33));
        let style = render_attrs(&node).style_string().unwrap();
        assert!(style.contains("width: 33%;max-width:33%"), "{}", style);
    }

    #[test]
    fn test_column_width_parses_percentage() {
        let element = HtmlElement::new("div").with_attr("style", "width: 33%;max-width:33%");
        let spec = attribute(&NodeType::Column, "width").unwrap();
        assert_eq!(spec.parse(&element), Value::from(33));
    }

    #[test]
    fn test_auto_width_renders_nothing() {
        let spec = attribute(&NodeType::Column, "width").unwrap();
        assert!(spec.render(&Attrs::new()).is_empty());
        assert!(spec.render(&Attrs::new().with("width", Value::Null)).is_empty());
    }

    #[test]
    fn test_transparent_background_emits_fallback() {
        let node = Node::new(NodeType::Section);
        let style = render_attrs(&node).style_string().unwrap();
        assert!(style.contains("background-color: transparent"));
        assert!(style.contains("--bg-color: #ffffff"));
    }

    #[test]
    fn test_opaque_background_is_its_own_fallback() {
        let spec = attribute(&NodeType::Section, "backgroundColor").unwrap();
        let rendered = spec.render(&Attrs::new().with("backgroundColor", "#ff0000"));
        assert_eq!(
            rendered.style_string().as_deref(),
            Some("background-color: #ff0000;--bg-color: #ff0000")
        );
    }

    #[test]
    fn test_padding_renders_px_and_omits_default() {
        let spec = attribute(&NodeType::Column, "paddingTop").unwrap();
        assert!(spec.render(&Attrs::new().with("paddingTop", 0)).is_empty());
        assert_eq!(
            spec.render(&Attrs::new().with("paddingTop", 12)).styles,
            vec!["padding-top: 12px".to_string()]
        );
    }

    #[test]
    fn test_malformed_padding_parses_to_default() {
        let element = HtmlElement::new("div").with_attr("style", "padding-top: wide");
        let spec = attribute(&NodeType::Section, "paddingTop").unwrap();
        assert_eq!(spec.parse(&element), Value::from(0));
    }

    #[test]
    fn test_padding_strips_unit_on_parse() {
        let element = HtmlElement::new("div").with_attr("style", "padding-left: '24px'");
        let spec = attribute(&NodeType::Column, "paddingLeft").unwrap();
        assert_eq!(spec.parse(&element), Value::from(24));
    }

    #[test]
    fn test_vertical_align_strategies() {
        let spec = attribute(&NodeType::Column, "verticalAlign").unwrap();
        assert!(spec.render(&Attrs::new().with("verticalAlign", "top")).is_empty());

        let middle = spec.render(&Attrs::new().with("verticalAlign", "middle"));
        assert!(middle.styles[0].contains("justify-content: center"));

        let bottom = spec.render(&Attrs::new().with("verticalAlign", "bottom"));
        assert!(bottom.styles[0].contains("justify-content: flex-end"));
        assert!(bottom.styles[0].contains("flex-direction: column"));
    }

    #[test]
    fn test_vertical_align_round_trips_through_flex_style() {
        let spec = attribute(&NodeType::Column, "verticalAlign").unwrap();
        let rendered = spec.render(&Attrs::new().with("verticalAlign", "bottom"));
        let element = HtmlElement::new("div").with_attr("style", rendered.style_string().unwrap());
        assert_eq!(spec.parse(&element), Value::from("bottom"));
    }

    #[test]
    fn test_column_id_generated_when_missing() {
        let spec = attribute(&NodeType::Column, "columnId").unwrap();
        let parsed = spec.parse(&HtmlElement::new("div"));
        assert!(parsed.as_str().map_or(false, |id| !id.is_empty()));

        let kept = spec.parse(&HtmlElement::new("div").with_attr("data-column-id", "abc"));
        assert_eq!(kept, Value::from("abc"));
    }

    #[test]
    fn test_each_renders_and_transient_flag_does_not() {
        let node = Node::for_each("products", vec![]).with_attr("isUpdatingKey", true);
        let rendered = render_attrs(&node);
        assert_eq!(rendered.get("each"), Some("products"));
        assert!(!rendered.attributes.keys().any(|k| k.contains("updating")));
    }

    #[test]
    fn test_missing_each_parses_to_default() {
        let spec = attribute(&NodeType::For, "each").unwrap();
        assert_eq!(spec.parse(&HtmlElement::new("div")), Value::from("items"));
    }

    #[test]
    fn test_heading_level_from_tag() {
        let spec = attribute(&NodeType::Heading, "level").unwrap();
        assert_eq!(spec.parse(&HtmlElement::new("h2")), Value::from(2u8));
        assert_eq!(spec.parse(&HtmlElement::new("h5")), Value::from(3u8));
    }

    #[test]
    fn test_content_rules() {
        assert!(ContentRule::Columns.allows(&NodeType::Column));
        assert!(!ContentRule::Columns.allows(&NodeType::Paragraph));
        assert!(!ContentRule::Blocks.allows(&NodeType::Columns));
        assert!(ContentRule::BlocksOrColumns.allows(&NodeType::Columns));
        assert!(ContentRule::Blocks.allows(&NodeType::For));
        assert!(ContentRule::Columns.check(&[]).is_err());
    }

    #[test]
    fn test_columns_containers() {
        for container in [NodeType::Doc, NodeType::Section, NodeType::For] {
            assert!(content_rule(&container).allows(&NodeType::Columns), "{}", container);
        }
        assert!(!content_rule(&NodeType::Column).allows(&NodeType::Columns));
        assert!(!NodeType::Columns.is_block());
    }

    #[test]
    fn test_show_if_key_carriers() {
        for carrier in [NodeType::Section, NodeType::Columns, NodeType::Column] {
            assert!(attribute(&carrier, "showIfKey").is_some(), "{}", carrier);
        }
        assert!(attribute(&NodeType::For, "showIfKey").is_none());
    }
}
