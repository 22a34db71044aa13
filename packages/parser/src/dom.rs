//! Lightweight element tree produced by the HTML parser and consumed by the
//! schema's attribute parse rules.

use crate::error::TokenSpan;
use crate::style::StyleDeclarations;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub enum HtmlNode {
    Element(HtmlElement),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HtmlElement {
    /// Lowercased tag name
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<HtmlNode>,
    pub span: TokenSpan,
}

impl HtmlElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// `data-type`, used by the custom node types
    pub fn data_type(&self) -> Option<&str> {
        self.attr("data-type")
    }

    pub fn style(&self) -> StyleDeclarations {
        self.attr("style")
            .map(StyleDeclarations::parse)
            .unwrap_or_default()
    }

    pub fn style_value(&self, property: &str) -> Option<String> {
        self.style().get(property).map(str::to_string)
    }
}
