//! Attribute and insertion commands
//!
//! Attribute updates merge into the closest ancestor of the target type;
//! keys that are not given keep their value. Insertions place the new block
//! after the top-level block that holds the selection.

use crate::columns::equal_width;
use crate::engine::DocumentEngine;
use crate::errors::EditorError;
use crate::state::resolve;
use maily_parser::schema::DEFAULT_EACH;
use maily_parser::style::number_value;
use maily_parser::{Attrs, Node, NodeType};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    Middle,
    Bottom,
}

impl VerticalAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerticalAlign::Top => "top",
            VerticalAlign::Middle => "middle",
            VerticalAlign::Bottom => "bottom",
        }
    }
}

/// Merge `attrs` into the closest ancestor of `node_type`. Returns `false`
/// when there is none.
pub fn update_attributes<E: DocumentEngine + ?Sized>(
    engine: &mut E,
    node_type: &NodeType,
    attrs: &Attrs,
) -> Result<bool, EditorError> {
    let Some(found) = engine.resolve_closest_ancestor(node_type) else {
        return Ok(false);
    };

    debug!(node_type = %node_type, pos = found.pos, keys = attrs.len(), "updating attributes");
    let updated = found.node.clone().with_attrs(attrs);
    let tr = engine.replace_subtree(found.pos, found.end(), updated);
    engine.dispatch(tr)?;
    Ok(true)
}

pub fn update_column<E: DocumentEngine + ?Sized>(engine: &mut E, attrs: &Attrs) -> Result<bool, EditorError> {
    update_attributes(engine, &NodeType::Column, attrs)
}

pub fn update_section<E: DocumentEngine + ?Sized>(engine: &mut E, attrs: &Attrs) -> Result<bool, EditorError> {
    update_attributes(engine, &NodeType::Section, attrs)
}

pub fn update_for<E: DocumentEngine + ?Sized>(engine: &mut E, attrs: &Attrs) -> Result<bool, EditorError> {
    update_attributes(engine, &NodeType::For, attrs)
}

/// Same padding on all four sides of the active section
pub fn set_section_padding<E: DocumentEngine + ?Sized>(engine: &mut E, padding: f64) -> Result<bool, EditorError> {
    update_section(engine, &sides("padding", padding))
}

/// Same margin on all four sides of the active section
pub fn set_section_margin<E: DocumentEngine + ?Sized>(engine: &mut E, margin: f64) -> Result<bool, EditorError> {
    update_section(engine, &sides("margin", margin))
}

fn sides(prefix: &str, value: f64) -> Attrs {
    ["Top", "Right", "Bottom", "Left"]
        .iter()
        .map(|side| (format!("{}{}", prefix, side), number_value(value)))
        .collect()
}

pub fn set_column_vertical_align<E: DocumentEngine + ?Sized>(
    engine: &mut E,
    align: VerticalAlign,
) -> Result<bool, EditorError> {
    update_column(engine, &Attrs::new().with("verticalAlign", align.as_str()))
}

/// Insert a `for` node iterating `items`, holding one empty paragraph
pub fn insert_for<E: DocumentEngine + ?Sized>(engine: &mut E) -> Result<bool, EditorError> {
    insert_block(engine, Node::for_each(DEFAULT_EACH, vec![Node::paragraph(vec![])]))
}

/// Insert a `columns` container of `count` equal columns (at least one)
pub fn insert_columns<E: DocumentEngine + ?Sized>(engine: &mut E, count: usize) -> Result<bool, EditorError> {
    let count = count.max(1);
    let width = equal_width(count);
    let columns = (0..count)
        .map(|_| Node::column(engine.new_column_id(), Some(width)))
        .collect();
    insert_block(engine, Node::columns(columns))
}

pub fn insert_section<E: DocumentEngine + ?Sized>(engine: &mut E) -> Result<bool, EditorError> {
    insert_block(engine, Node::section(vec![Node::paragraph(vec![])]))
}

/// Insert `node` after the top-level block holding the selection and put
/// the cursor inside it.
pub fn insert_block<E: DocumentEngine + ?Sized>(engine: &mut E, node: Node) -> Result<bool, EditorError> {
    let doc = engine.doc();
    let from = engine.selection().from();
    let Some(resolved) = resolve(doc, from) else {
        return Ok(false);
    };

    let pos = match resolved.before(1) {
        Some(before) => resolved.node(1).map(|top| before + top.node_size()).unwrap_or(from),
        None => from,
    };

    debug!(node_type = %node.node_type, pos, "inserting block");
    let tr = engine.replace_subtree(pos, pos, node);
    let tr = engine.set_selection_near(tr, pos);
    engine.dispatch(tr)?;
    Ok(true)
}
