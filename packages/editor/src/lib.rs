//! # Maily Editor
//!
//! Editing core for Maily email templates.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ parser: document tree, schema, editor HTML  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: commands over a DocumentEngine      │
//! │  - Column add / remove / navigate           │
//! │  - Attribute updates, block insertion       │
//! │  - Atomic transactions, versioned state     │
//! │  - Toolbar state projections                │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ compiler-html: document → email HTML        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use maily_editor::{columns, Editor};
//!
//! let mut editor = Editor::from_json(&std::fs::read_to_string("welcome.json")?)?;
//! columns::add_column(&mut editor)?;
//! println!("{}", editor.to_html()?);
//! ```

pub mod columns;
mod command;
pub mod commands;
mod editor;
pub mod engine;
mod errors;
pub mod projection;
pub mod state;

pub use columns::Direction;
pub use command::Command;
pub use commands::VerticalAlign;
pub use editor::Editor;
pub use engine::{DocumentEngine, Transaction};
pub use errors::EditorError;
pub use projection::{ColumnsState, ForState, SectionState};
pub use state::{EditorState, FoundNode, Selection};

// Re-export common types for convenience
pub use maily_parser::{Attrs, Node, NodeType};
