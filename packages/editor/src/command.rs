//! # Serializable commands
//!
//! One JSON-friendly value per editor command, so that edit sessions can be
//! scripted and replayed (`maily edit --commands`).

use crate::columns::{self, Direction};
use crate::commands;
use crate::editor::Editor;
use crate::errors::EditorError;
use maily_parser::{Attrs, NodeType};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Command {
    AddColumn,
    RemoveColumn,
    GoToColumn {
        direction: Direction,
    },
    /// Cursor at the nearest valid position to `pos`
    SetSelection {
        pos: usize,
    },
    #[serde(rename_all = "camelCase")]
    UpdateAttributes {
        node_type: NodeType,
        attrs: Attrs,
    },
    InsertFor,
    InsertColumns {
        count: usize,
    },
    InsertSection,
}

impl Command {
    /// Run the command; `Ok(false)` when it did not apply at the current
    /// selection.
    pub fn apply(&self, editor: &mut Editor) -> Result<bool, EditorError> {
        debug!(command = ?self, "applying command");
        match self {
            Command::AddColumn => columns::add_column(editor),
            Command::RemoveColumn => columns::remove_column(editor),
            Command::GoToColumn { direction } => columns::go_to_column(editor, *direction),
            Command::SetSelection { pos } => {
                editor.set_cursor_near(*pos)?;
                Ok(true)
            }
            Command::UpdateAttributes { node_type, attrs } => commands::update_attributes(editor, node_type, attrs),
            Command::InsertFor => commands::insert_for(editor),
            Command::InsertColumns { count } => commands::insert_columns(editor, *count),
            Command::InsertSection => commands::insert_section(editor),
        }
    }

    /// Apply every command in order, stopping at the first error. Returns how
    /// many commands applied.
    pub fn apply_all(commands: &[Command], editor: &mut Editor) -> Result<usize, EditorError> {
        let mut applied = 0;
        for command in commands {
            if command.apply(editor)? {
                applied += 1;
            }
        }
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_serialization() {
        let command = Command::GoToColumn {
            direction: Direction::Next,
        };
        let json = serde_json::to_string(&command).unwrap();
        assert_eq!(json, r#"{"command":"goToColumn","direction":"next"}"#);

        let parsed: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(command, parsed);
    }

    #[test]
    fn test_go_to_column_directions_are_next_and_previous() {
        let parsed: Command = serde_json::from_str(r#"{"command":"goToColumn","direction":"previous"}"#).unwrap();
        assert_eq!(
            parsed,
            Command::GoToColumn {
                direction: Direction::Previous,
            }
        );

        assert!(serde_json::from_str::<Command>(r#"{"command":"goToColumn","direction":"left"}"#).is_err());
    }

    #[test]
    fn test_update_attributes_from_json() {
        let json = r#"{"command":"updateAttributes","nodeType":"section","attrs":{"paddingTop":12}}"#;
        let command: Command = serde_json::from_str(json).unwrap();

        match command {
            Command::UpdateAttributes { node_type, attrs } => {
                assert_eq!(node_type, NodeType::Section);
                assert_eq!(attrs.number("paddingTop"), Some(12.0));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_apply_all_counts_applied_commands() {
        let mut editor = Editor::empty();
        let script = vec![
            Command::InsertColumns { count: 2 },
            Command::AddColumn,
            Command::GoToColumn {
                direction: Direction::Next,
            },
            Command::GoToColumn {
                direction: Direction::Next,
            },
        ];

        // The last move runs past the final column
        assert_eq!(Command::apply_all(&script, &mut editor).unwrap(), 3);
        assert_eq!(columns::column_count(&editor), 3);
    }
}
