//! # Editor state
//!
//! Document positions follow the editing engine's model: positions count
//! the gaps of the document content, a text node spans one position per
//! character, leaf nodes span one and every other node spans its content
//! plus an opening and a closing token.

use maily_parser::{Node, NodeType};
use serde::{Deserialize, Serialize};

/// Text selection between two document positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub fn cursor(pos: usize) -> Self {
        Self { anchor: pos, head: pos }
    }

    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    pub fn from(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn to(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    pub doc: Node,
    pub selection: Selection,
}

impl EditorState {
    /// State with the cursor at the first text position of `doc`.
    pub fn new(doc: Node) -> Self {
        let selection = Selection::cursor(near(&doc, 0));
        Self { doc, selection }
    }
}

/// An ancestor of a resolved position
#[derive(Debug, Clone, PartialEq)]
pub struct FoundNode {
    pub node: Node,
    /// Position directly before the node
    pub pos: usize,
    /// Ancestor depth; the document is depth 0
    pub depth: usize,
}

impl FoundNode {
    /// First position inside the node
    pub fn start(&self) -> usize {
        self.pos + 1
    }

    /// Position directly after the node
    pub fn end(&self) -> usize {
        self.pos + self.node.node_size()
    }
}

/// A position together with the chain of nodes that contain it
#[derive(Debug, Clone)]
pub struct ResolvedPos<'a> {
    pub pos: usize,
    /// `(node, position before node)`, outermost first, without the document
    ancestors: Vec<(&'a Node, usize)>,
    doc: &'a Node,
}

impl<'a> ResolvedPos<'a> {
    /// Depth of the innermost ancestor; 0 when the position lies between
    /// top-level blocks.
    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }

    pub fn node(&self, depth: usize) -> Option<&'a Node> {
        if depth == 0 {
            return Some(self.doc);
        }
        self.ancestors.get(depth - 1).map(|(node, _)| *node)
    }

    /// Position before the ancestor at `depth`
    pub fn before(&self, depth: usize) -> Option<usize> {
        if depth == 0 {
            return None;
        }
        self.ancestors.get(depth - 1).map(|(_, pos)| *pos)
    }

    pub fn parent(&self) -> &'a Node {
        self.ancestors.last().map(|(node, _)| *node).unwrap_or(self.doc)
    }

    pub fn closest(&self, node_type: &NodeType) -> Option<FoundNode> {
        self.ancestors
            .iter()
            .enumerate()
            .rev()
            .find(|(_, (node, _))| &node.node_type == node_type)
            .map(|(index, (node, pos))| FoundNode {
                node: (*node).clone(),
                pos: *pos,
                depth: index + 1,
            })
    }

    pub fn has_ancestor(&self, node_type: &NodeType) -> bool {
        self.ancestors.iter().any(|(node, _)| &node.node_type == node_type)
    }
}

/// Resolve `pos` against `doc`. Returns `None` past the end of the content.
pub fn resolve(doc: &Node, pos: usize) -> Option<ResolvedPos<'_>> {
    if pos > doc.content_size() {
        return None;
    }

    let mut ancestors = Vec::new();
    let mut node = doc;
    let mut start = 0;

    'descend: loop {
        let mut offset = start;
        for child in &node.content {
            let size = child.node_size();
            let has_inside = !child.is_text() && !child.node_type.is_atom();
            if has_inside && pos > offset && pos < offset + size {
                ancestors.push((child, offset));
                node = child;
                start = offset + 1;
                continue 'descend;
            }
            offset += size;
        }
        break;
    }

    Some(ResolvedPos { pos, ancestors, doc })
}

/// Content ranges of every textblock, in document order.
pub fn textblock_ranges(doc: &Node) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    collect_textblocks(doc, 0, &mut ranges);
    ranges
}

fn collect_textblocks(node: &Node, start: usize, out: &mut Vec<(usize, usize)>) {
    let mut offset = start;
    for child in &node.content {
        if child.node_type.is_textblock() {
            out.push((offset + 1, offset + 1 + child.content_size()));
        } else if !child.is_text() && !child.node_type.is_atom() {
            collect_textblocks(child, offset + 1, out);
        }
        offset += child.node_size();
    }
}

/// Nearest valid cursor position to `pos`: `pos` itself when it lies in a
/// textblock, else the start of the first textblock after it, else the end
/// of the last textblock before it, else 0.
pub fn near(doc: &Node, pos: usize) -> usize {
    let ranges = textblock_ranges(doc);

    if ranges.iter().any(|(start, end)| pos >= *start && pos <= *end) {
        return pos;
    }
    if let Some((start, _)) = ranges.iter().find(|(start, _)| *start >= pos) {
        return *start;
    }
    ranges
        .iter()
        .rev()
        .find(|(_, end)| *end <= pos)
        .map(|(_, end)| *end)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_columns() -> Node {
        Node::doc(vec![
            Node::paragraph(vec![Node::text("Hi")]),
            Node::columns(vec![Node::column("a", Some(50.0)), Node::column("b", Some(50.0))]),
        ])
    }

    #[test]
    fn test_resolve_inside_column() {
        let doc = two_columns();
        // paragraph = 0..4, columns opens at 4, column a at 5, its paragraph at 6
        let resolved = resolve(&doc, 7).unwrap();

        assert_eq!(resolved.depth(), 3);
        assert_eq!(resolved.parent().node_type, NodeType::Paragraph);

        let column = resolved.closest(&NodeType::Column).unwrap();
        assert_eq!(column.pos, 5);
        assert_eq!(column.depth, 2);
        assert_eq!(column.node.column_id(), Some("a"));

        let columns = resolved.closest(&NodeType::Columns).unwrap();
        assert_eq!(columns.pos, 4);
        assert_eq!(columns.depth, 1);
    }

    #[test]
    fn test_resolve_second_column() {
        let doc = two_columns();
        // column b opens at 9, its paragraph content at 11
        let column = resolve(&doc, 11).unwrap().closest(&NodeType::Column).unwrap();
        assert_eq!(column.pos, 9);
        assert_eq!(column.node.column_id(), Some("b"));
    }

    #[test]
    fn test_resolve_between_blocks_has_no_ancestor() {
        let doc = two_columns();
        let resolved = resolve(&doc, 4).unwrap();
        assert_eq!(resolved.depth(), 0);
        assert!(resolved.closest(&NodeType::Columns).is_none());
        assert!(resolve(&doc, doc.content_size() + 1).is_none());
    }

    #[test]
    fn test_near_moves_into_next_textblock() {
        let doc = two_columns();
        assert_eq!(near(&doc, 1), 1);
        assert_eq!(near(&doc, 4), 7);
        assert_eq!(near(&doc, 9), 11);
    }

    #[test]
    fn test_near_falls_back_backwards() {
        let doc = Node::doc(vec![
            Node::paragraph(vec![Node::text("end")]),
            Node::new(NodeType::HorizontalRule),
        ]);
        assert_eq!(near(&doc, 6), 4);
    }

    #[test]
    fn test_state_starts_in_first_textblock() {
        let state = EditorState::new(two_columns());
        assert_eq!(state.selection, Selection::cursor(1));
    }
}
