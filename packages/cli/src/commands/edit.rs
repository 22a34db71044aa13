use super::{read_document, resolve, write_output, Format};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use maily_editor::{Command, Editor};
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Template to edit (.json document or editor .html)
    pub input: PathBuf,

    /// JSON array of commands, e.g. [{"command": "addColumn"}]
    #[arg(short, long)]
    pub commands: PathBuf,

    /// Output file (defaults to rewriting the input)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Output to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,
}

pub fn edit(args: EditArgs, cwd: &str) -> Result<()> {
    let input = resolve(cwd, &args.input);
    let commands_path = resolve(cwd, &args.commands);

    let script = fs::read_to_string(&commands_path)
        .with_context(|| format!("Failed to read commands {}", commands_path.display()))?;
    let commands: Vec<Command> = serde_json::from_str(&script)
        .with_context(|| format!("Invalid command list in {}", commands_path.display()))?;

    let mut editor = Editor::new(read_document(&input)?)?;
    let applied = Command::apply_all(&commands, &mut editor)?;
    info!(applied, total = commands.len(), "edit session finished");

    let output_file = args.out.as_ref().map(|out| resolve(cwd, out)).unwrap_or_else(|| input.clone());
    let output = match Format::of(&output_file) {
        Format::Html => editor.to_html()?,
        Format::Json => editor.to_json()?,
    };

    if args.stdout {
        println!("{}", output);
        return Ok(());
    }

    write_output(&output_file, &output)?;
    println!(
        "  {} Applied {}/{} commands → {}",
        "✓".green(),
        applied,
        commands.len(),
        output_file.display()
    );
    if applied < commands.len() {
        println!(
            "  {} {} commands did not apply at the current selection",
            "⚠️".yellow(),
            commands.len() - applied
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use maily_parser::NodeType;

    #[test]
    fn test_edit_applies_command_script() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_str().unwrap();
        fs::write(dir.path().join("welcome.html"), "<p>Intro</p>").unwrap();
        fs::write(
            dir.path().join("commands.json"),
            r#"[{"command": "insertColumns", "count": 2}, {"command": "addColumn"}]"#,
        )
        .unwrap();

        let args = EditArgs {
            input: PathBuf::from("welcome.html"),
            commands: PathBuf::from("commands.json"),
            out: Some(PathBuf::from("welcome.json")),
            stdout: false,
        };
        edit(args, cwd).unwrap();

        let doc = read_document(&dir.path().join("welcome.json")).unwrap();
        assert_eq!(doc.content[1].node_type, NodeType::Columns);
        assert_eq!(doc.content[1].child_count(), 3);
    }
}
