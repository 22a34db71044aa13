//! # Editing engine boundary
//!
//! The column algorithms and attribute commands only talk to the hosting
//! engine through [`DocumentEngine`]. Every edit is one [`Transaction`]:
//! built against the current state, then handed to `dispatch`, which either
//! applies all of it or none of it.

use crate::errors::EditorError;
use crate::state::{resolve, FoundNode, Selection};
use maily_parser::{new_column_id, Node, NodeType};

/// Where the selection goes once a transaction is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionTarget {
    /// Map the current selection through the steps
    Mapped,
    /// Nearest valid cursor position to this position in the new document
    Near(usize),
    Exact(Selection),
}

/// Replace the nodes between two positions with a single node. `from == to`
/// inserts.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaceStep {
    pub from: usize,
    pub to: usize,
    pub node: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub(crate) base_version: u64,
    pub(crate) steps: Vec<ReplaceStep>,
    pub(crate) selection: SelectionTarget,
}

impl Transaction {
    pub fn new(base_version: u64) -> Self {
        Self {
            base_version,
            steps: Vec::new(),
            selection: SelectionTarget::Mapped,
        }
    }

    pub fn replace(mut self, from: usize, to: usize, node: Node) -> Self {
        self.steps.push(ReplaceStep { from, to, node });
        self
    }

    pub fn select_near(mut self, pos: usize) -> Self {
        self.selection = SelectionTarget::Near(pos);
        self
    }

    pub fn select(mut self, selection: Selection) -> Self {
        self.selection = SelectionTarget::Exact(selection);
        self
    }

    pub fn steps(&self) -> &[ReplaceStep] {
        &self.steps
    }

    pub fn selection_target(&self) -> SelectionTarget {
        self.selection
    }

    pub fn base_version(&self) -> u64 {
        self.base_version
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty() && self.selection == SelectionTarget::Mapped
    }
}

/// The hosting editing engine, as seen by the algorithms of this crate
pub trait DocumentEngine {
    fn doc(&self) -> &Node;

    fn selection(&self) -> Selection;

    /// Version the next transaction is built against
    fn version(&self) -> u64;

    /// Closest ancestor of `node_type` around the selection start
    fn resolve_closest_ancestor(&self, node_type: &NodeType) -> Option<FoundNode> {
        resolve(self.doc(), self.selection().from())?.closest(node_type)
    }

    /// Whether the selection start lies inside a node of `node_type`
    fn is_active(&self, node_type: &NodeType) -> bool {
        resolve(self.doc(), self.selection().from())
            .map(|resolved| resolved.has_ancestor(node_type))
            .unwrap_or(false)
    }

    fn transaction(&self) -> Transaction {
        Transaction::new(self.version())
    }

    fn replace_subtree(&self, from: usize, to: usize, node: Node) -> Transaction {
        self.transaction().replace(from, to, node)
    }

    fn set_selection_near(&self, tr: Transaction, pos: usize) -> Transaction {
        tr.select_near(pos)
    }

    fn dispatch(&mut self, tr: Transaction) -> Result<(), EditorError>;

    /// Identifier for a newly created column
    fn new_column_id(&mut self) -> String {
        new_column_id()
    }
}

/// Apply a replace step to `doc`, returning the new document.
///
/// Both positions must be child boundaries of the same parent. The parent's
/// content rule is checked on the result and the inserted subtree is
/// validated.
pub fn replace_range(doc: &Node, step: &ReplaceStep) -> Result<Node, EditorError> {
    let ReplaceStep { from, to, node } = step;
    if from > to || *to > doc.content_size() {
        return Err(EditorError::PositionOutOfRange {
            pos: *to,
            size: doc.content_size(),
        });
    }
    node.validate()?;
    let mut path = Vec::new();
    replace_in(doc, 0, *from, *to, node, &mut path)
}

fn replace_in(
    parent: &Node,
    start: usize,
    from: usize,
    to: usize,
    node: &Node,
    path: &mut Vec<usize>,
) -> Result<Node, EditorError> {
    let mut offset = start;
    let mut from_index = None;
    let mut to_index = None;

    for (index, child) in parent.content.iter().enumerate() {
        if offset == from && from_index.is_none() {
            from_index = Some(index);
        }
        if offset == to {
            to_index = Some(index);
        }
        let size = child.node_size();
        let has_inside = !child.is_text() && !child.node_type.is_atom();
        if has_inside && from > offset && to < offset + size {
            path.push(index);
            let replaced = replace_in(child, offset + 1, from, to, node, path)?;
            path.pop();
            let mut content = parent.content.clone();
            content[index] = replaced;
            return Ok(parent.copy_with_content(content));
        }
        offset += size;
    }
    if offset == from && from_index.is_none() {
        from_index = Some(parent.content.len());
    }
    if offset == to {
        to_index = Some(parent.content.len());
    }

    let (Some(from_index), Some(to_index)) = (from_index, to_index) else {
        return Err(EditorError::InvalidRange { from, to });
    };

    let mut content = Vec::with_capacity(parent.content.len() + 1);
    content.extend_from_slice(&parent.content[..from_index]);
    content.push(node.clone());
    content.extend_from_slice(&parent.content[to_index..]);

    let rule = parent.content_rule();
    if let Err(message) = rule.check(&content) {
        return Err(maily_parser::ContentError::invalid(parent.node_type.name(), path, message).into());
    }
    Ok(parent.copy_with_content(content))
}

/// Map a position across a replace step. Positions inside a range replaced
/// by a node of the same size (an attribute change) are kept.
pub fn map_position(pos: usize, step: &ReplaceStep) -> usize {
    let inserted = step.node.node_size();
    if pos <= step.from || (inserted == step.to - step.from && pos < step.to) {
        pos
    } else if pos >= step.to {
        pos + inserted - (step.to - step.from)
    } else {
        step.from
    }
}
