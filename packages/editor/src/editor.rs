//! # Editor
//!
//! In-memory implementation of [`DocumentEngine`]. Owns the document, the
//! selection and a version counter that increments once per applied
//! transaction.
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Validate → Commands → Transactions → Save
//!   ↓        ↓          ↓           ↓           ↓
//! JSON/    Content   columns,    dispatch     JSON/
//! HTML     rules     attributes  (atomic)     HTML
//! ```

use crate::engine::{map_position, replace_range, DocumentEngine, SelectionTarget, Transaction};
use crate::errors::EditorError;
use crate::state::{near, EditorState, Selection};
use maily_parser::{serialize, IDGenerator, Node, NodeType};
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct Editor {
    state: EditorState,
    /// Increments on each applied transaction
    version: u64,
    ids: IDGenerator,
}

impl Editor {
    /// Create an editor over `doc` with the cursor in its first textblock.
    pub fn new(doc: Node) -> Result<Self, EditorError> {
        if doc.node_type != NodeType::Doc {
            return Err(maily_parser::ContentError::invalid(doc.node_type.name(), &[], "expected a doc node").into());
        }
        doc.validate()?;
        Ok(Self {
            state: EditorState::new(doc),
            version: 0,
            ids: IDGenerator::default(),
        })
    }

    /// Empty document holding one paragraph
    pub fn empty() -> Self {
        Self {
            state: EditorState::new(Node::doc(vec![Node::paragraph(vec![])])),
            version: 0,
            ids: IDGenerator::default(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        let doc: Node = serde_json::from_str(json)?;
        Self::new(doc)
    }

    pub fn from_html(html: &str) -> Result<Self, EditorError> {
        Self::new(maily_parser::parse(html)?)
    }

    /// Load a `.json` document or editor `.html` file
    pub fn load(path: &Path) -> Result<Self, EditorError> {
        let source = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("html") | Some("htm") => Self::from_html(&source),
            _ => Self::from_json(&source),
        }
    }

    /// Use `ids` for new column identifiers.
    pub fn with_id_generator(mut self, ids: IDGenerator) -> Self {
        self.ids = ids;
        self
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn into_doc(self) -> Node {
        self.state.doc
    }

    /// Move the selection. Positions past the end of the document are
    /// rejected.
    pub fn set_selection(&mut self, selection: Selection) -> Result<(), EditorError> {
        let size = self.state.doc.content_size();
        if selection.to() > size {
            return Err(EditorError::PositionOutOfRange { pos: selection.to(), size });
        }
        let tr = self.transaction().select(selection);
        self.dispatch(tr)
    }

    /// Put a cursor at the nearest valid position to `pos`.
    pub fn set_cursor_near(&mut self, pos: usize) -> Result<(), EditorError> {
        let tr = self.transaction().select_near(pos);
        self.dispatch(tr)
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string_pretty(&self.state.doc)?)
    }

    pub fn to_html(&self) -> Result<String, EditorError> {
        Ok(serialize(&self.state.doc)?)
    }

    fn apply(&self, tr: &Transaction) -> Result<EditorState, EditorError> {
        let mut doc = self.state.doc.clone();
        let mut selection = self.state.selection;

        for step in tr.steps() {
            doc = replace_range(&doc, step)?;
            selection = Selection::new(map_position(selection.anchor, step), map_position(selection.head, step));
        }

        let selection = match tr.selection_target() {
            SelectionTarget::Mapped if tr.steps().is_empty() => selection,
            SelectionTarget::Mapped => Selection::new(near(&doc, selection.anchor), near(&doc, selection.head)),
            SelectionTarget::Near(pos) => Selection::cursor(near(&doc, pos)),
            SelectionTarget::Exact(selection) => {
                let size = doc.content_size();
                if selection.to() > size {
                    return Err(EditorError::PositionOutOfRange { pos: selection.to(), size });
                }
                selection
            }
        };

        Ok(EditorState { doc, selection })
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::empty()
    }
}

impl DocumentEngine for Editor {
    fn doc(&self) -> &Node {
        &self.state.doc
    }

    fn selection(&self) -> Selection {
        self.state.selection
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn dispatch(&mut self, tr: Transaction) -> Result<(), EditorError> {
        if tr.base_version() != self.version {
            warn!(expected = tr.base_version(), found = self.version, "rejected stale transaction");
            return Err(EditorError::StaleTransaction {
                expected: tr.base_version(),
                found: self.version,
            });
        }

        let state = self.apply(&tr).map_err(|err| {
            warn!(error = %err, "rejected transaction");
            err
        })?;

        let doc_changed = !tr.steps().is_empty();
        self.state = state;
        self.version += 1;

        if doc_changed {
            info!(version = self.version, steps = tr.steps().len(), "applied transaction");
        } else {
            debug!(version = self.version, anchor = self.state.selection.anchor, "moved selection");
        }
        Ok(())
    }

    fn new_column_id(&mut self) -> String {
        self.ids.new_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor() -> Editor {
        Editor::new(Node::doc(vec![
            Node::paragraph(vec![Node::text("one")]),
            Node::paragraph(vec![Node::text("two")]),
        ]))
        .unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_document() {
        let doc = Node::doc(vec![Node::columns(vec![])]);
        assert!(matches!(Editor::new(doc), Err(EditorError::Content(_))));
    }

    #[test]
    fn test_dispatch_bumps_version_and_maps_selection() {
        let mut editor = editor();
        editor.set_selection(Selection::cursor(7)).unwrap();
        assert_eq!(editor.version(), 1);

        let tr = editor.replace_subtree(0, 5, Node::paragraph(vec![Node::text("first!")]));
        editor.dispatch(tr).unwrap();

        assert_eq!(editor.version(), 2);
        assert_eq!(editor.doc().text_content(), "first!two");
        assert_eq!(editor.selection(), Selection::cursor(10));
    }

    #[test]
    fn test_failed_transaction_leaves_state_untouched() {
        let mut editor = editor();
        let before = editor.state().clone();

        let tr = editor.replace_subtree(2, 7, Node::paragraph(vec![]));
        assert!(editor.dispatch(tr).is_err());

        assert_eq!(editor.state(), &before);
        assert_eq!(editor.version(), 0);
    }

    #[test]
    fn test_stale_transaction_is_rejected() {
        let mut editor = editor();
        let stale = editor.replace_subtree(0, 5, Node::paragraph(vec![]));
        editor.set_cursor_near(6).unwrap();

        assert!(matches!(editor.dispatch(stale), Err(EditorError::StaleTransaction { .. })));
    }

    #[test]
    fn test_selection_past_end_is_rejected() {
        let mut editor = editor();
        assert!(editor.set_selection(Selection::cursor(99)).is_err());
    }
}
