use super::{read_document, resolve, write_output};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use maily_parser::{serialize, serialize_pretty};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct FmtArgs {
    /// Template to format (.json document or editor .html)
    pub input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Indent nested elements
    #[arg(long)]
    pub pretty: bool,
}

pub fn fmt(args: FmtArgs, cwd: &str) -> Result<()> {
    let document = read_document(&resolve(cwd, &args.input))?;
    let html = if args.pretty {
        serialize_pretty(&document)
    } else {
        serialize(&document)
    }
    .with_context(|| format!("Failed to format {}", args.input.display()))?;

    match &args.out {
        Some(out) => {
            let output_file = resolve(cwd, out);
            write_output(&output_file, &html)?;
            println!("  {} {} → {}", "✓".green(), args.input.display(), output_file.display());
        }
        None => println!("{}", html),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn args(input: &str, out: &str) -> FmtArgs {
        FmtArgs {
            input: PathBuf::from(input),
            out: Some(PathBuf::from(out)),
            pretty: false,
        }
    }

    #[test]
    fn test_fmt_writes_editor_html() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_str().unwrap();
        fs::write(
            dir.path().join("welcome.json"),
            r#"{"type": "doc", "content": [{"type": "paragraph", "content": [{"type": "text", "text": "Hi"}]}]}"#,
        )
        .unwrap();

        fmt(args("welcome.json", "welcome.html"), cwd).unwrap();
        let html = fs::read_to_string(dir.path().join("welcome.html")).unwrap();
        assert!(html.contains("Hi</p>"));
    }

    #[test]
    fn test_fmt_refuses_unknown_node_types() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_str().unwrap();
        fs::write(
            dir.path().join("carousel.json"),
            r#"{"type": "doc", "content": [
                {"type": "paragraph", "content": [{"type": "text", "text": "kept"}]},
                {"type": "carousel", "content": [{"type": "paragraph"}]}
            ]}"#,
        )
        .unwrap();

        let err = fmt(args("carousel.json", "carousel.html"), cwd).unwrap_err();
        assert!(format!("{:#}", err).contains("Unknown node type 'carousel' at root/1"));
        assert!(!dir.path().join("carousel.html").exists());
    }
}
