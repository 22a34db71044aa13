//! # Column algorithms
//!
//! Add, remove and navigate `column` nodes of the `columns` container around
//! the selection. Each structural edit rebuilds the whole container (every
//! column gets the new equal width) and replaces it in one transaction, so
//! no intermediate width or identity state is ever observable.

use crate::engine::DocumentEngine;
use crate::errors::EditorError;
use crate::state::FoundNode;
use maily_parser::style::{number_value, round2};
use maily_parser::{Node, NodeType};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Next,
    Previous,
}

/// Equal share of 100% for `count` columns, rounded to two decimals.
pub fn equal_width(count: usize) -> f64 {
    if count == 0 {
        return 100.0;
    }
    round2(100.0 / count as f64)
}

/// The closest `columns` container and the index of the active column in it.
struct ActiveColumn {
    columns: FoundNode,
    index: usize,
}

fn active_column<E: DocumentEngine + ?Sized>(engine: &E) -> Option<ActiveColumn> {
    let columns = engine.resolve_closest_ancestor(&NodeType::Columns)?;
    let column = engine.resolve_closest_ancestor(&NodeType::Column)?;
    if column.depth != columns.depth + 1 {
        return None;
    }

    let by_id = column.node.column_id().and_then(|id| {
        columns
            .node
            .content
            .iter()
            .position(|child| child.column_id() == Some(id))
    });
    let index = match by_id {
        Some(index) => index,
        None => (0..columns.node.child_count()).find(|&i| columns.start() + columns.node.child_offset(i) == column.pos)?,
    };

    Some(ActiveColumn { columns, index })
}

fn with_width(column: &Node, width: f64) -> Node {
    column.clone().with_attr("width", number_value(width))
}

/// Position before child `index` of a container starting at `start`.
fn child_pos(container: &Node, start: usize, index: usize) -> usize {
    start + container.child_offset(index)
}

/// Insert a new column after the active one. Every column, the new one
/// included, gets width `round(100 / (n + 1), 2)` and the cursor moves into
/// the new column. Returns `false` when the selection is not in a column.
pub fn add_column<E: DocumentEngine + ?Sized>(engine: &mut E) -> Result<bool, EditorError> {
    let Some(ActiveColumn { columns, index }) = active_column(engine) else {
        return Ok(false);
    };

    let count = columns.node.child_count() + 1;
    let width = equal_width(count);
    let new_column = Node::column(engine.new_column_id(), Some(width));

    let mut children: Vec<Node> = Vec::with_capacity(count);
    for (i, child) in columns.node.content.iter().enumerate() {
        children.push(with_width(child, width));
        if i == index {
            children.push(new_column.clone());
        }
    }

    let container = columns.node.copy_with_content(children);
    let cursor = child_pos(&container, columns.start(), index + 1);

    debug!(count, width, after = index, "adding column");
    let tr = engine.replace_subtree(columns.pos, columns.end(), container);
    let tr = engine.set_selection_near(tr, cursor);
    engine.dispatch(tr)?;
    Ok(true)
}

/// Remove the active column and rebalance the rest to
/// `round(100 / (n - 1), 2)`. The cursor moves to the column that takes the
/// removed one's place, or to the new last column. A container is never left
/// empty: removing its only column is refused.
pub fn remove_column<E: DocumentEngine + ?Sized>(engine: &mut E) -> Result<bool, EditorError> {
    let Some(ActiveColumn { columns, index }) = active_column(engine) else {
        return Ok(false);
    };

    let count = columns.node.child_count();
    if count <= 1 {
        warn!("refusing to remove the only column");
        return Ok(false);
    }

    let width = equal_width(count - 1);
    let children: Vec<Node> = columns
        .node
        .content
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, child)| with_width(child, width))
        .collect();

    let target = index.min(children.len() - 1);
    let container = columns.node.copy_with_content(children);
    let cursor = child_pos(&container, columns.start(), target);

    debug!(count = count - 1, width, removed = index, "removing column");
    let tr = engine.replace_subtree(columns.pos, columns.end(), container);
    let tr = engine.set_selection_near(tr, cursor);
    engine.dispatch(tr)?;
    Ok(true)
}

/// Move the cursor into the neighbouring column. Returns `false` and
/// dispatches nothing at either end of the container.
pub fn go_to_column<E: DocumentEngine + ?Sized>(engine: &mut E, direction: Direction) -> Result<bool, EditorError> {
    let Some(ActiveColumn { columns, index }) = active_column(engine) else {
        return Ok(false);
    };

    let target = match direction {
        Direction::Previous => index.checked_sub(1),
        Direction::Next => Some(index + 1).filter(|&i| i < columns.node.child_count()),
    };
    let Some(target) = target else {
        return Ok(false);
    };

    let cursor = child_pos(&columns.node, columns.start(), target);
    let tr = engine.set_selection_near(engine.transaction(), cursor);
    engine.dispatch(tr)?;
    Ok(true)
}

/// Number of columns in the closest `columns` container, 0 outside one.
pub fn column_count<E: DocumentEngine + ?Sized>(engine: &E) -> usize {
    engine
        .resolve_closest_ancestor(&NodeType::Columns)
        .map(|columns| columns.node.child_count())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Editor, Selection};
    use maily_parser::IDGenerator;

    fn editor_with_columns(count: usize) -> Editor {
        let width = equal_width(count);
        let columns = (0..count).map(|i| Node::column(format!("c{}", i), Some(width))).collect();
        Editor::new(Node::doc(vec![Node::columns(columns)]))
            .unwrap()
            .with_id_generator(IDGenerator::sequential("new"))
    }

    fn widths(editor: &Editor) -> Vec<f64> {
        editor.doc().content[0]
            .content
            .iter()
            .map(|c| c.attr_number("width").unwrap_or(0.0))
            .collect()
    }

    fn active_id(editor: &Editor) -> Option<String> {
        editor
            .resolve_closest_ancestor(&NodeType::Column)
            .and_then(|c| c.node.column_id().map(str::to_string))
    }

    #[test]
    fn test_add_column_after_active() {
        let mut editor = editor_with_columns(2);
        assert!(add_column(&mut editor).unwrap());

        let ids: Vec<_> = editor.doc().content[0]
            .content
            .iter()
            .map(|c| c.column_id().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["c0", "new-1", "c1"]);
        assert_eq!(widths(&editor), vec![33.33, 33.33, 33.33]);
        assert_eq!(active_id(&editor).as_deref(), Some("new-1"));
    }

    #[test]
    fn test_remove_column_moves_to_successor() {
        let mut editor = editor_with_columns(3);
        // cursor in c1: columns content starts at 1, c1 at 5, its paragraph at 6
        editor.set_selection(Selection::cursor(7)).unwrap();
        assert_eq!(active_id(&editor).as_deref(), Some("c1"));

        assert!(remove_column(&mut editor).unwrap());
        assert_eq!(widths(&editor), vec![50.0, 50.0]);
        assert_eq!(active_id(&editor).as_deref(), Some("c2"));
    }

    #[test]
    fn test_remove_last_column_moves_to_predecessor() {
        let mut editor = editor_with_columns(3);
        editor.set_selection(Selection::cursor(11)).unwrap();
        assert_eq!(active_id(&editor).as_deref(), Some("c2"));

        assert!(remove_column(&mut editor).unwrap());
        assert_eq!(active_id(&editor).as_deref(), Some("c1"));
    }

    #[test]
    fn test_remove_only_column_is_refused() {
        let mut editor = editor_with_columns(1);
        let before = editor.doc().clone();

        assert!(!remove_column(&mut editor).unwrap());
        assert_eq!(editor.doc(), &before);
    }

    #[test]
    fn test_go_to_column_bounds() {
        let mut editor = editor_with_columns(2);
        let version = editor.version();

        assert!(!go_to_column(&mut editor, Direction::Previous).unwrap());
        assert_eq!(editor.version(), version);

        assert!(go_to_column(&mut editor, Direction::Next).unwrap());
        assert_eq!(active_id(&editor).as_deref(), Some("c1"));
        assert!(!go_to_column(&mut editor, Direction::Next).unwrap());
        assert!(go_to_column(&mut editor, Direction::Previous).unwrap());
        assert_eq!(active_id(&editor).as_deref(), Some("c0"));
    }

    #[test]
    fn test_commands_outside_columns_are_noops() {
        let mut editor = Editor::new(Node::doc(vec![Node::paragraph(vec![Node::text("x")])])).unwrap();
        let before = editor.doc().clone();

        assert!(!add_column(&mut editor).unwrap());
        assert!(!remove_column(&mut editor).unwrap());
        assert!(!go_to_column(&mut editor, Direction::Next).unwrap());
        assert_eq!(column_count(&editor), 0);
        assert_eq!(editor.doc(), &before);
        assert_eq!(editor.version(), 0);
    }

    #[test]
    fn test_equal_width() {
        assert_eq!(equal_width(1), 100.0);
        assert_eq!(equal_width(3), 33.33);
        assert_eq!(equal_width(6), 16.67);
    }
}
