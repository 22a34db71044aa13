use crate::ast::{Mark, Node, NodeType};
use crate::dom::{HtmlElement, HtmlNode};
use crate::error::{ParseError, ParseResult, TokenSpan};
use crate::schema;
use crate::tokenizer::{tokenize, Token};
use tracing::debug;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr",
];

const IGNORED_ELEMENTS: &[&str] = &["head", "script", "style", "title", "template", "noscript"];

const INLINE_ELEMENTS: &[&str] = &[
    "a", "abbr", "b", "code", "del", "em", "font", "i", "label", "s", "small", "span", "strike", "strong",
    "sub", "sup", "u",
];

/// Tolerant tree builder over the token stream.
///
/// Void elements never take children, unmatched closing tags are ignored and
/// every element still open at the end of input is closed implicitly.
pub struct Parser<'src> {
    tokens: Vec<(Token<'src>, TokenSpan)>,
    pos: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> ParseResult<Self> {
        Ok(Self {
            tokens: tokenize(source)?,
            pos: 0,
        })
    }

    /// Build the element tree of the whole input.
    pub fn parse_fragment(&mut self) -> ParseResult<Vec<HtmlNode>> {
        let mut stack: Vec<HtmlElement> = vec![HtmlElement::new("#root")];

        while let Some((token, span)) = self.advance() {
            match token {
                Token::TagOpen(name) => {
                    let element = self.parse_start_tag(name, span)?;
                    let self_closed = matches!(self.previous(), Some(Token::SelfClose));
                    if self_closed || VOID_ELEMENTS.contains(&element.tag.as_str()) {
                        push_child(&mut stack, HtmlNode::Element(element));
                    } else {
                        stack.push(element);
                    }
                }
                Token::TagClose(name) => {
                    let name = name.to_ascii_lowercase();
                    let Some(open_at) = stack.iter().rposition(|el| el.tag == name) else {
                        debug!(tag = %name, "ignoring unmatched closing tag");
                        continue;
                    };
                    if open_at == 0 {
                        continue;
                    }
                    while stack.len() > open_at {
                        close_top(&mut stack);
                    }
                }
                Token::Text(text) => {
                    let decoded = html_escape::decode_html_entities(text).into_owned();
                    push_child(&mut stack, HtmlNode::Text(decoded));
                }
                other => {
                    return Err(ParseError::unexpected_token(span, "tag or text", format!("{:?}", other)));
                }
            }
        }

        while stack.len() > 1 {
            close_top(&mut stack);
        }
        Ok(stack.pop().map(|root| root.children).unwrap_or_default())
    }

    fn parse_start_tag(&mut self, name: &str, start: TokenSpan) -> ParseResult<HtmlElement> {
        let mut element = HtmlElement::new(name);
        element.span = start.clone();

        loop {
            let Some((token, span)) = self.advance() else {
                return Err(ParseError::unexpected_eof("'>' to close tag"));
            };
            match token {
                Token::AttrName(attr) => {
                    let value = match self.peek() {
                        Some((Token::AttrValue(value), _)) => {
                            let value = html_escape::decode_html_entities(value).into_owned();
                            self.advance();
                            value
                        }
                        _ => String::new(),
                    };
                    element = element.with_attr(attr, value);
                }
                Token::TagEnd | Token::SelfClose => {
                    element.span = start.start..span.end;
                    return Ok(element);
                }
                other => {
                    return Err(ParseError::unexpected_token(span, "attribute", format!("{:?}", other)));
                }
            }
        }
    }

    fn peek(&self) -> Option<&(Token<'src>, TokenSpan)> {
        self.tokens.get(self.pos)
    }

    fn previous(&self) -> Option<&Token<'src>> {
        self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)).map(|(token, _)| token)
    }

    fn advance(&mut self) -> Option<(Token<'src>, TokenSpan)> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }
}

fn push_child(stack: &mut [HtmlElement], node: HtmlNode) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    }
}

fn close_top(stack: &mut Vec<HtmlElement>) {
    if let Some(element) = stack.pop() {
        push_child(stack, HtmlNode::Element(element));
    }
}

/// Parse editor HTML into a `doc` node.
pub fn parse(source: &str) -> ParseResult<Node> {
    let fragment = Parser::new(source)?.parse_fragment()?;
    let content = non_empty_blocks(parse_blocks(&fragment, true));
    debug!(blocks = content.len(), "parsed editor html");
    Ok(Node::doc(content))
}

/// Parse editor HTML into the element tree only.
pub fn parse_html(source: &str) -> ParseResult<Vec<HtmlNode>> {
    Parser::new(source)?.parse_fragment()
}

fn non_empty_blocks(mut blocks: Vec<Node>) -> Vec<Node> {
    if blocks.is_empty() {
        blocks.push(Node::paragraph(vec![]));
    }
    blocks
}

fn is_inline_element(element: &HtmlElement) -> bool {
    match schema::node_type_for_element(element) {
        Some(node_type) => node_type.is_inline(),
        None => INLINE_ELEMENTS.contains(&element.tag.as_str()),
    }
}

/// Map a sequence of DOM nodes into block content. Loose inline content is
/// gathered into paragraphs; unknown wrappers are unwrapped. With
/// `allow_columns` unset a `columns` element is flattened into the content of
/// its columns.
fn parse_blocks(nodes: &[HtmlNode], allow_columns: bool) -> Vec<Node> {
    let mut blocks = Vec::new();
    let mut pending: Vec<&HtmlNode> = Vec::new();

    for node in nodes {
        let element = match node {
            HtmlNode::Text(_) => {
                pending.push(node);
                continue;
            }
            HtmlNode::Element(element) => element,
        };

        if IGNORED_ELEMENTS.contains(&element.tag.as_str()) {
            continue;
        }
        if is_inline_element(element) {
            pending.push(node);
            continue;
        }

        flush_inline(&mut pending, &mut blocks);

        match schema::node_type_for_element(element) {
            Some(NodeType::Columns) if !allow_columns => {
                for column in element.children.iter().filter_map(column_element) {
                    blocks.extend(parse_blocks(&column.children, false));
                }
            }
            Some(NodeType::Column) => blocks.extend(parse_blocks(&element.children, allow_columns)),
            Some(NodeType::ListItem) => blocks.extend(parse_blocks(&element.children, allow_columns)),
            Some(node_type) => blocks.extend(parse_block(element, node_type)),
            None => blocks.extend(parse_blocks(&element.children, allow_columns)),
        }
    }

    flush_inline(&mut pending, &mut blocks);
    blocks
}

fn flush_inline(pending: &mut Vec<&HtmlNode>, blocks: &mut Vec<Node>) {
    if pending.is_empty() {
        return;
    }
    let mut content = Vec::new();
    for node in pending.drain(..) {
        collect_inline(node, &[], &mut content);
    }
    let content = trim_inline(content);
    if !content.is_empty() {
        blocks.push(Node::paragraph(content));
    }
}

fn column_element(node: &HtmlNode) -> Option<&HtmlElement> {
    match node {
        HtmlNode::Element(element) if schema::node_type_for_element(element) == Some(NodeType::Column) => {
            Some(element)
        }
        _ => None,
    }
}

fn parse_block(element: &HtmlElement, node_type: NodeType) -> Option<Node> {
    let attrs = schema::parse_attrs(&node_type, element);
    let node = Node::new(node_type.clone()).with_attrs(&attrs);

    let node = match node_type {
        NodeType::Paragraph | NodeType::Heading | NodeType::Footer => {
            let mut content = Vec::new();
            for child in &element.children {
                collect_inline(child, &[], &mut content);
            }
            node.with_content(trim_inline(content))
        }
        NodeType::Columns => {
            let columns: Vec<Node> = element
                .children
                .iter()
                .filter_map(column_element)
                .map(|column| {
                    let attrs = schema::parse_attrs(&NodeType::Column, column);
                    Node::new(NodeType::Column)
                        .with_attrs(&attrs)
                        .with_content(non_empty_blocks(parse_blocks(&column.children, false)))
                })
                .collect();
            if columns.is_empty() {
                return None;
            }
            node.with_content(columns)
        }
        NodeType::Section | NodeType::For => {
            node.with_content(non_empty_blocks(parse_blocks(&element.children, true)))
        }
        NodeType::BulletList | NodeType::OrderedList => {
            let items: Vec<Node> = element
                .children
                .iter()
                .filter_map(|child| match child {
                    HtmlNode::Element(li) if li.tag == "li" => Some(parse_list_item(li)),
                    _ => None,
                })
                .collect();
            if items.is_empty() {
                return None;
            }
            node.with_content(items)
        }
        NodeType::Image if element.attr("src").is_none() => return None,
        _ => node,
    };
    Some(node)
}

fn parse_list_item(element: &HtmlElement) -> Node {
    let attrs = schema::parse_attrs(&NodeType::ListItem, element);
    let mut content = parse_blocks(&element.children, false);
    if content.first().map(|n| n.node_type != NodeType::Paragraph).unwrap_or(true) {
        content.insert(0, Node::paragraph(vec![]));
    }
    Node::new(NodeType::ListItem).with_attrs(&attrs).with_content(content)
}

/// Flatten inline markup into text, variable and hard-break nodes carrying
/// the marks of their enclosing elements.
fn collect_inline(node: &HtmlNode, marks: &[Mark], out: &mut Vec<Node>) {
    match node {
        HtmlNode::Text(text) => push_text(out, &collapse_whitespace(text), marks),
        HtmlNode::Element(element) => match schema::node_type_for_element(element) {
            Some(NodeType::Variable) => {
                let attrs = schema::parse_attrs(&NodeType::Variable, element);
                out.push(Node::new(NodeType::Variable).with_attrs(&attrs));
            }
            Some(NodeType::HardBreak) => out.push(Node::new(NodeType::HardBreak)),
            _ if IGNORED_ELEMENTS.contains(&element.tag.as_str()) => {}
            _ => {
                let mut marks = marks.to_vec();
                if let Some(mark) = schema::mark_for_element(element) {
                    if !marks.iter().any(|m| m.mark_type == mark.mark_type) {
                        marks.push(mark);
                        marks.sort_by_key(|m| m.mark_type.rank());
                    }
                }
                for child in &element.children {
                    collect_inline(child, &marks, out);
                }
            }
        },
    }
}

fn push_text(out: &mut Vec<Node>, text: &str, marks: &[Mark]) {
    if text.is_empty() {
        return;
    }
    if let Some(last) = out.last_mut() {
        if last.is_text() && last.marks == marks {
            if let Some(existing) = last.text.as_mut() {
                existing.push_str(text);
                return;
            }
        }
    }
    let mut node = Node::text(text);
    node.marks = marks.to_vec();
    out.push(node);
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Drop leading and trailing whitespace of a textblock and any text node
/// left empty by it.
fn trim_inline(mut content: Vec<Node>) -> Vec<Node> {
    if let Some(first) = content.first_mut() {
        if let Some(text) = first.text.as_mut() {
            *text = text.trim_start().to_string();
        }
    }
    if let Some(last) = content.last_mut() {
        if let Some(text) = last.text.as_mut() {
            *text = text.trim_end().to_string();
        }
    }
    content.retain(|node| !node.is_text() || node.text.as_deref().map_or(false, |t| !t.is_empty()));
    content
}
