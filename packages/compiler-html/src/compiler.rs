use crate::bindings::{scalar_text, Bindings, Scope};
use maily_parser::error::display_path;
use maily_parser::schema::{self, RenderedAttrs, DEFAULT_EACH, DEFAULT_TEXT_ALIGN, DEFAULT_VERTICAL_ALIGN};
use maily_parser::style::format_number;
use maily_parser::{ContentError, MarkType, Node, NodeType};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Errors that can occur during HTML compilation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Unknown node type '{node_type}' at {}", display_path(.path))]
    UnknownNodeType { node_type: String, path: Vec<usize> },

    #[error("Unknown mark '{mark_type}' at {}", display_path(.path))]
    UnknownMark { mark_type: String, path: Vec<usize> },

    #[error("Invalid content for '{node_type}' at {}: {message}", display_path(.path))]
    InvalidContent {
        node_type: String,
        path: Vec<usize>,
        message: String,
    },

    #[error("Invalid bindings: {0}")]
    InvalidBindings(String),
}

impl From<ContentError> for CompileError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::UnknownType { node_type, path } => CompileError::UnknownNodeType { node_type, path },
            ContentError::InvalidContent {
                node_type,
                path,
                message,
            } => CompileError::InvalidContent {
                node_type,
                path,
                message,
            },
        }
    }
}

/// Options for HTML compilation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
    /// Wrap the body in a complete email document
    pub full_document: bool,
    pub title: Option<String>,
    /// Hidden inbox preview line
    pub preview_text: Option<String>,
    /// Container width in pixels for full documents
    pub container_width: u32,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: "  ".to_string(),
            full_document: false,
            title: None,
            preview_text: None,
            container_width: 600,
        }
    }
}

const XHTML_DOCTYPE: &str = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">"#;

const PARAGRAPH_STYLE: &str = "margin: 0 0 20px 0; font-size: 15px; line-height: 24px";
const FOOTER_STYLE: &str = "margin: 0 0 20px 0; font-size: 13px; line-height: 20px; color: #64748b";
const LIST_STYLE: &str = "margin: 0 0 20px 0; padding-left: 26px";
const LIST_ITEM_STYLE: &str = "margin-bottom: 8px; padding-left: 6px";
const IMAGE_STYLE: &str = "display: block; max-width: 100%; outline: none; border: none; text-decoration: none";
const RULE_STYLE: &str = "width: 100%; border: none; border-top: 1px solid #eaeaea; margin: 32px 0";
const LINK_STYLE: &str = "text-decoration: underline";

fn heading_style(level: u8) -> &'static str {
    match level {
        1 => "margin: 0 0 12px 0; font-size: 36px; line-height: 40px; font-weight: 800",
        2 => "margin: 0 0 12px 0; font-size: 30px; line-height: 36px; font-weight: 700",
        _ => "margin: 0 0 12px 0; font-size: 24px; line-height: 38px; font-weight: 600",
    }
}

fn spacer_height(height: &str) -> u32 {
    match height {
        "sm" => 8,
        "md" => 16,
        "lg" => 32,
        "xl" => 64,
        other => other.trim_end_matches("px").parse().unwrap_or(16),
    }
}

struct Context<'a> {
    options: &'a CompileOptions,
    scope: Scope<'a>,
    /// Child indices from the root to the node being compiled
    path: Vec<usize>,
    depth: usize,
    buffer: String,
}

impl<'a> Context<'a> {
    fn new(options: &'a CompileOptions, bindings: &'a Bindings) -> Self {
        Self {
            options,
            scope: Scope::new(bindings),
            path: Vec::new(),
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn unknown_node(&self, node_type: &str) -> CompileError {
        CompileError::UnknownNodeType {
            node_type: node_type.to_string(),
            path: self.path.clone(),
        }
    }

    fn invalid(&self, node_type: &str, message: &str) -> CompileError {
        CompileError::InvalidContent {
            node_type: node_type.to_string(),
            path: self.path.clone(),
            message: message.to_string(),
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Compile a document to a compact HTML fragment
pub fn compile(root: &Node, bindings: &Bindings) -> Result<String, CompileError> {
    compile_with_options(root, bindings, &CompileOptions::default())
}

/// Compile a document to email HTML. The whole tree is validated first, so
/// either the complete output or an error is returned.
#[instrument(skip_all, fields(root = %root.node_type, full_document = options.full_document))]
pub fn compile_with_options(
    root: &Node,
    bindings: &Bindings,
    options: &CompileOptions,
) -> Result<String, CompileError> {
    root.validate()?;

    let mut ctx = Context::new(options, bindings);
    if options.full_document {
        compile_document(root, &mut ctx)?;
    } else {
        compile_body(root, &mut ctx)?;
    }

    let output = ctx.get_output();
    debug!(bytes = output.len(), bindings = bindings.len(), "compiled document");
    Ok(output)
}

fn compile_document(root: &Node, ctx: &mut Context) -> Result<(), CompileError> {
    ctx.add_line(XHTML_DOCTYPE);
    ctx.add_line(r#"<html xmlns="http://www.w3.org/1999/xhtml" lang="en">"#);
    ctx.indent();

    compile_head(ctx);

    ctx.add_line(r#"<body style="margin: 0; padding: 0; background-color: #ffffff">"#);
    ctx.indent();

    if let Some(preview) = ctx.options.preview_text.clone() {
        ctx.add_line(&format!(
            r#"<div style="display: none; max-height: 0; overflow: hidden">{}</div>"#,
            escape_html(&preview)
        ));
    }

    let mut container = presentation_table();
    container.attributes.insert("align".to_string(), "center".to_string());
    container.push_style(format!("max-width: {}px", ctx.options.container_width));
    container.push_style("margin: 0 auto");
    ctx.add_line(&open_tag("table", &container));
    ctx.indent();
    ctx.add_line("<tbody>");
    ctx.indent();
    ctx.add_line("<tr>");
    ctx.indent();
    ctx.add_line(r#"<td style="padding: 20px">"#);
    ctx.indent();

    compile_body(root, ctx)?;

    ctx.dedent();
    ctx.add_line("</td>");
    ctx.dedent();
    ctx.add_line("</tr>");
    ctx.dedent();
    ctx.add_line("</tbody>");
    ctx.dedent();
    ctx.add_line("</table>");

    ctx.dedent();
    ctx.add_line("</body>");
    ctx.dedent();
    ctx.add_line("</html>");
    Ok(())
}

fn compile_head(ctx: &mut Context) {
    ctx.add_line("<head>");
    ctx.indent();
    ctx.add_line(r#"<meta http-equiv="Content-Type" content="text/html; charset=UTF-8" />"#);
    ctx.add_line(r#"<meta name="viewport" content="width=device-width, initial-scale=1.0" />"#);
    if let Some(title) = ctx.options.title.clone() {
        ctx.add_line(&format!("<title>{}</title>", escape_html(&title)));
    }
    ctx.dedent();
    ctx.add_line("</head>");
}

fn compile_body(root: &Node, ctx: &mut Context) -> Result<(), CompileError> {
    if root.node_type == NodeType::Doc {
        compile_children(root, ctx)
    } else {
        compile_node(root, ctx)
    }
}

fn compile_children<'a>(node: &Node, ctx: &mut Context<'a>) -> Result<(), CompileError> {
    for (index, child) in node.content.iter().enumerate() {
        ctx.path.push(index);
        let result = compile_node(child, ctx);
        ctx.path.pop();
        result?;
    }
    Ok(())
}

/// Outcome of a node's `showIfKey`
enum Visibility {
    Render,
    /// Key not bound here; left to whoever fills the template
    Marked(String),
    Skip,
}

/// Only node types whose schema declares `showIfKey` are conditional.
fn visibility(node: &Node, scope: &Scope) -> Visibility {
    if schema::attribute(&node.node_type, "showIfKey").is_none() {
        return Visibility::Render;
    }
    let key = match node.attr_str("showIfKey") {
        Some(key) if !key.is_empty() => key,
        _ => return Visibility::Render,
    };
    match scope.truthy(&key) {
        Some(true) => Visibility::Render,
        Some(false) => Visibility::Skip,
        None => Visibility::Marked(key),
    }
}

fn compile_node<'a>(node: &Node, ctx: &mut Context<'a>) -> Result<(), CompileError> {
    let marker = match visibility(node, &ctx.scope) {
        Visibility::Skip => {
            debug!(node = %node.node_type, path = %display_path(&ctx.path), "hidden by showIfKey");
            return Ok(());
        }
        Visibility::Marked(key) => Some(key),
        Visibility::Render => None,
    };

    match &node.node_type {
        NodeType::Unknown(name) => Err(ctx.unknown_node(name)),
        NodeType::Doc => compile_children(node, ctx),
        NodeType::Paragraph | NodeType::Heading | NodeType::Footer => compile_textblock(node, ctx),
        NodeType::Columns => compile_columns(node, ctx, marker),
        NodeType::Column => compile_column(node, ctx, marker),
        NodeType::Section => compile_section(node, ctx, marker),
        NodeType::For => compile_for(node, ctx),
        NodeType::BulletList | NodeType::OrderedList => compile_list(node, ctx),
        NodeType::ListItem => compile_list_item(node, ctx),
        NodeType::Image => {
            let html = compile_image(node, &ctx.scope);
            ctx.add_line(&html);
            Ok(())
        }
        NodeType::HorizontalRule => {
            ctx.add_line(&open_tag("hr", &RenderedAttrs::style(RULE_STYLE)));
            Ok(())
        }
        NodeType::Spacer => {
            compile_spacer(node, ctx);
            Ok(())
        }
        NodeType::Text | NodeType::Variable | NodeType::HardBreak => {
            let html = compile_inline(node, ctx)?;
            ctx.add_line(&html);
            Ok(())
        }
    }
}

fn compile_textblock(node: &Node, ctx: &mut Context) -> Result<(), CompileError> {
    let (tag, base) = match node.node_type {
        NodeType::Heading => {
            let level = node.attr_number("level").unwrap_or(1.0).clamp(1.0, 3.0) as u8;
            (format!("h{}", level), heading_style(level))
        }
        NodeType::Footer => ("p".to_string(), FOOTER_STYLE),
        _ => ("p".to_string(), PARAGRAPH_STYLE),
    };

    let mut attrs = RenderedAttrs::style(base);
    attrs.styles.extend(schema::render_attrs(node).styles);

    let inner = compile_inline_content(node, ctx)?;
    ctx.add_line(&format!("{}{}</{}>", open_tag(&tag, &attrs), inner, tag));
    Ok(())
}

/// `<table>` attributes shared by every layout table
fn presentation_table() -> RenderedAttrs {
    let mut attrs = RenderedAttrs::attr("role", "presentation");
    attrs.attributes.insert("width".to_string(), "100%".to_string());
    attrs.attributes.insert("border".to_string(), "0".to_string());
    attrs.attributes.insert("cellpadding".to_string(), "0".to_string());
    attrs.attributes.insert("cellspacing".to_string(), "0".to_string());
    attrs
}

fn mark_show_if(attrs: &mut RenderedAttrs, marker: Option<String>) {
    if let Some(key) = marker {
        attrs.attributes.insert("data-show-if".to_string(), key);
    }
}

fn has_border(node: &Node) -> bool {
    node.attr_number("borderWidth").map_or(false, |width| width > 0.0)
}

fn open_table(ctx: &mut Context, table: &RenderedAttrs) {
    ctx.add_line(&open_tag("table", table));
    ctx.indent();
    ctx.add_line("<tbody>");
    ctx.indent();
    ctx.add_line("<tr>");
    ctx.indent();
}

fn close_table(ctx: &mut Context) {
    ctx.dedent();
    ctx.add_line("</tr>");
    ctx.dedent();
    ctx.add_line("</tbody>");
    ctx.dedent();
    ctx.add_line("</table>");
}

fn compile_columns<'a>(node: &Node, ctx: &mut Context<'a>, marker: Option<String>) -> Result<(), CompileError> {
    if let Some(child) = node.content.iter().find(|child| child.node_type != NodeType::Column) {
        return Err(ctx.invalid("columns", &format!("unexpected '{}' inside columns", child.node_type)));
    }

    let mut table = presentation_table();
    let width = node.attr_str("width").unwrap_or_else(|| "100%".to_string());
    table.push_style(format!("width: {}", width));
    table.push_style("table-layout: fixed");
    mark_show_if(&mut table, marker);

    open_table(ctx, &table);
    compile_children(node, ctx)?;
    close_table(ctx);
    Ok(())
}

fn compile_column<'a>(node: &Node, ctx: &mut Context<'a>, marker: Option<String>) -> Result<(), CompileError> {
    let valign = match node.attr_str("verticalAlign").as_deref() {
        Some("middle") => "middle",
        Some("bottom") => "bottom",
        _ => DEFAULT_VERTICAL_ALIGN,
    };

    let mut cell = RenderedAttrs::attr("valign", valign);
    cell.styles = schema::render_attrs(node).styles;
    if has_border(node) {
        cell.push_style("border-style: solid");
    }
    cell.push_style(format!("vertical-align: {}", valign));
    mark_show_if(&mut cell, marker);

    ctx.add_line(&open_tag("td", &cell));
    ctx.indent();
    compile_children(node, ctx)?;
    ctx.dedent();
    ctx.add_line("</td>");
    Ok(())
}

fn compile_section<'a>(node: &Node, ctx: &mut Context<'a>, marker: Option<String>) -> Result<(), CompileError> {
    let (margins, styles): (Vec<String>, Vec<String>) = schema::render_attrs(node)
        .styles
        .into_iter()
        .partition(|style| style.starts_with("margin"));

    let mut table = presentation_table();
    table.styles = margins;
    mark_show_if(&mut table, marker);

    let align = node.attr_str("align").unwrap_or_else(|| DEFAULT_TEXT_ALIGN.to_string());
    let mut cell = RenderedAttrs::attr("align", align.clone());
    cell.styles = styles;
    if has_border(node) {
        cell.push_style("border-style: solid");
    }
    cell.push_style(format!("text-align: {}", align));

    open_table(ctx, &table);
    ctx.add_line(&open_tag("td", &cell));
    ctx.indent();
    compile_children(node, ctx)?;
    ctx.dedent();
    ctx.add_line("</td>");
    close_table(ctx);
    Ok(())
}

fn compile_for<'a>(node: &Node, ctx: &mut Context<'a>) -> Result<(), CompileError> {
    let each = node.attr_str("each").unwrap_or_else(|| DEFAULT_EACH.to_string());

    match ctx.scope.sequence(&each) {
        Some(items) => {
            debug!(each = %each, count = items.len(), depth = ctx.scope.depth(), "expanding for node");
            for item in items {
                ctx.scope.push(item);
                let result = compile_children(node, ctx);
                ctx.scope.pop();
                result?;
            }
            Ok(())
        }
        None => {
            if ctx.scope.lookup(&each).is_some() {
                warn!(each = %each, "binding is not a sequence, rendering the exemplar once");
            }
            compile_children(node, ctx)
        }
    }
}

fn compile_list(node: &Node, ctx: &mut Context) -> Result<(), CompileError> {
    let tag = if node.node_type == NodeType::OrderedList { "ol" } else { "ul" };
    ctx.add_line(&open_tag(tag, &RenderedAttrs::style(LIST_STYLE)));
    ctx.indent();
    compile_children(node, ctx)?;
    ctx.dedent();
    ctx.add_line(&format!("</{}>", tag));
    Ok(())
}

fn compile_list_item(node: &Node, ctx: &mut Context) -> Result<(), CompileError> {
    let mut attrs = RenderedAttrs::style(LIST_ITEM_STYLE);
    attrs.styles.extend(schema::render_attrs(node).styles);
    ctx.add_line(&open_tag("li", &attrs));
    ctx.indent();
    compile_children(node, ctx)?;
    ctx.dedent();
    ctx.add_line("</li>");
    Ok(())
}

/// Attribute as markup text, numbers in their shortest form
fn attr_text(node: &Node, name: &str) -> Option<String> {
    match node.attrs.get(name)? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => n.as_f64().map(format_number),
        _ => None,
    }
}

fn compile_image(node: &Node, scope: &Scope) -> String {
    let mut attrs = RenderedAttrs::style(IMAGE_STYLE);
    for name in ["src", "alt", "title", "width", "height"] {
        if let Some(value) = attr_text(node, name) {
            attrs
                .attributes
                .insert(name.to_string(), substitute_placeholders(&value, scope));
        }
    }
    open_tag("img", &attrs)
}

fn compile_spacer(node: &Node, ctx: &mut Context) {
    let height = spacer_height(&node.attr_str("height").unwrap_or_default());
    let mut cell = RenderedAttrs::default();
    cell.push_style(format!("height: {}px", height));
    cell.push_style(format!("line-height: {}px", height));
    cell.push_style("font-size: 1px");

    open_table(ctx, &presentation_table());
    ctx.add_line(&format!("{}&nbsp;</td>", open_tag("td", &cell)));
    close_table(ctx);
}

fn compile_inline_content(node: &Node, ctx: &mut Context) -> Result<String, CompileError> {
    let mut out = String::new();
    for (index, child) in node.content.iter().enumerate() {
        ctx.path.push(index);
        let result = compile_inline(child, ctx);
        ctx.path.pop();
        out.push_str(&result?);
    }
    Ok(out)
}

fn compile_inline(node: &Node, ctx: &mut Context) -> Result<String, CompileError> {
    match &node.node_type {
        NodeType::Text => compile_text(node, ctx),
        NodeType::Variable => {
            let id = node.attr_str("id").unwrap_or_default();
            let text = ctx
                .scope
                .lookup(&id)
                .and_then(scalar_text)
                .unwrap_or_else(|| format!("{{{{{}}}}}", id));
            Ok(escape_html(&text))
        }
        NodeType::HardBreak => Ok("<br />".to_string()),
        NodeType::Unknown(name) => Err(ctx.unknown_node(name)),
        other => Err(ctx.invalid(other.name(), "block node in inline content")),
    }
}

fn compile_text(node: &Node, ctx: &Context) -> Result<String, CompileError> {
    let text = substitute_placeholders(node.text.as_deref().unwrap_or_default(), &ctx.scope);
    let mut html = escape_html(&text);

    let mut marks: Vec<_> = node.marks.iter().collect();
    marks.sort_by_key(|mark| mark.mark_type.rank());

    // innermost first
    for mark in marks.into_iter().rev() {
        if let MarkType::Unknown(name) = &mark.mark_type {
            return Err(CompileError::UnknownMark {
                mark_type: name.clone(),
                path: ctx.path.clone(),
            });
        }
        if let Some((tag, mut attrs)) = schema::mark_dom_spec(mark) {
            if mark.mark_type == MarkType::Link {
                attrs.push_style(LINK_STYLE);
            }
            html = format!("{}{}</{}>", open_tag(tag, &attrs), html, tag);
        }
    }
    Ok(html)
}

fn placeholder_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\{\{\s*([A-Za-z0-9_.\-]+)\s*\}\}").ok())
        .as_ref()
}

/// Replace `{{name}}` with scope values; unresolved placeholders stay as
/// written.
fn substitute_placeholders(text: &str, scope: &Scope) -> String {
    if !text.contains("{{") {
        return text.to_string();
    }
    let Some(pattern) = placeholder_pattern() else {
        return text.to_string();
    };
    pattern
        .replace_all(text, |caps: &Captures| {
            scope
                .lookup(&caps[1])
                .and_then(scalar_text)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn open_tag(tag: &str, attrs: &RenderedAttrs) -> String {
    let mut out = format!("<{}", tag);
    for (name, value) in &attrs.attributes {
        out.push_str(&format!(" {}=\"{}\"", name, escape_attr(value)));
    }
    if let Some(style) = attrs.style_string() {
        out.push_str(&format!(" style=\"{}\"", escape_attr(&style)));
    }
    out.push_str(if is_self_closing(tag) { " />" } else { ">" });
    out
}

fn escape_html(s: &str) -> String {
    html_escape::encode_text(s).into_owned()
}

fn escape_attr(s: &str) -> String {
    html_escape::encode_double_quoted_attribute(s).into_owned()
}

fn is_self_closing(tag: &str) -> bool {
    matches!(tag, "img" | "br" | "hr" | "meta" | "input" | "link")
}
