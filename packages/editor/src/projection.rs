//! Toolbar state projections
//!
//! Pure selectors over the engine state, recomputed by the host whenever the
//! selection or the document changes.

use crate::columns::column_count;
use crate::engine::DocumentEngine;
use maily_parser::schema::{DEFAULT_COLOR, DEFAULT_EACH, DEFAULT_TEXT_ALIGN, DEFAULT_VERTICAL_ALIGN};
use maily_parser::{Node, NodeType};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnsState {
    /// Width of the closest `columns` container
    pub width: String,
    pub is_section_active: bool,
    pub current_vertical_alignment: String,
    pub is_vertical_align_top: bool,
    pub is_vertical_align_middle: bool,
    pub is_vertical_align_bottom: bool,
    pub is_column_active: bool,
    pub columns_count: usize,
}

impl ColumnsState {
    pub fn project<E: DocumentEngine + ?Sized>(engine: &E) -> Self {
        let columns = engine.resolve_closest_ancestor(&NodeType::Columns);
        let column = engine.resolve_closest_ancestor(&NodeType::Column);

        let width = columns
            .and_then(|found| found.node.attr_str("width"))
            .unwrap_or_else(|| "100%".to_string());
        let vertical_align = column
            .as_ref()
            .and_then(|found| found.node.attr_str("verticalAlign"))
            .unwrap_or_else(|| DEFAULT_VERTICAL_ALIGN.to_string());

        Self {
            width,
            is_section_active: engine.is_active(&NodeType::Section),
            is_vertical_align_top: vertical_align == "top",
            is_vertical_align_middle: vertical_align == "middle",
            is_vertical_align_bottom: vertical_align == "bottom",
            current_vertical_alignment: vertical_align,
            is_column_active: column.is_some(),
            columns_count: column_count(engine),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionState {
    pub is_section_active: bool,
    pub current_border_radius: f64,
    pub current_border_width: f64,
    pub current_border_color: String,
    pub current_background_color: String,
    pub current_padding_top: f64,
    pub current_padding_right: f64,
    pub current_padding_bottom: f64,
    pub current_padding_left: f64,
    pub current_margin_top: f64,
    pub current_margin_right: f64,
    pub current_margin_bottom: f64,
    pub current_margin_left: f64,
    pub is_align_left: bool,
    pub is_align_center: bool,
    pub is_align_right: bool,
}

impl SectionState {
    pub fn project<E: DocumentEngine + ?Sized>(engine: &E) -> Self {
        let section = engine.resolve_closest_ancestor(&NodeType::Section);
        let node = section
            .as_ref()
            .map(|found| found.node.clone())
            .unwrap_or_else(|| Node::new(NodeType::Section));

        let number = |name: &str| node.attr_number(name).unwrap_or(0.0);
        let string = |name: &str, default: &str| node.attr_str(name).unwrap_or_else(|| default.to_string());
        let align = string("align", DEFAULT_TEXT_ALIGN);

        Self {
            is_section_active: section.is_some(),
            current_border_radius: number("borderRadius"),
            current_border_width: number("borderWidth"),
            current_border_color: string("borderColor", DEFAULT_COLOR),
            current_background_color: string("backgroundColor", DEFAULT_COLOR),
            current_padding_top: number("paddingTop"),
            current_padding_right: number("paddingRight"),
            current_padding_bottom: number("paddingBottom"),
            current_padding_left: number("paddingLeft"),
            current_margin_top: number("marginTop"),
            current_margin_right: number("marginRight"),
            current_margin_bottom: number("marginBottom"),
            current_margin_left: number("marginLeft"),
            is_align_left: align == "left",
            is_align_center: align == "center",
            is_align_right: align == "right",
        }
    }

    /// Single padding value shown when all sides agree, else 0
    pub fn current_padding(&self) -> f64 {
        let sides = [
            self.current_padding_top,
            self.current_padding_right,
            self.current_padding_bottom,
            self.current_padding_left,
        ];
        if sides.iter().all(|side| *side == sides[0]) {
            sides[0]
        } else {
            0.0
        }
    }

    pub fn current_margin(&self) -> f64 {
        let sides = [
            self.current_margin_top,
            self.current_margin_right,
            self.current_margin_bottom,
            self.current_margin_left,
        ];
        if sides.iter().all(|side| *side == sides[0]) {
            sides[0]
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForState {
    pub is_for_active: bool,
    pub each: String,
    pub is_updating_key: bool,
}

impl ForState {
    pub fn project<E: DocumentEngine + ?Sized>(engine: &E) -> Self {
        let found = engine.resolve_closest_ancestor(&NodeType::For);
        Self {
            is_for_active: found.is_some(),
            each: found
                .as_ref()
                .and_then(|f| f.node.attr_str("each"))
                .unwrap_or_else(|| DEFAULT_EACH.to_string()),
            is_updating_key: found
                .as_ref()
                .and_then(|f| f.node.attrs.bool("isUpdatingKey"))
                .unwrap_or(false),
        }
    }
}
