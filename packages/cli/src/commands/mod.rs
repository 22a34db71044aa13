pub mod compile;
pub mod edit;
pub mod fmt;
pub mod init;

pub use compile::{compile, CompileArgs};
pub use edit::{edit, EditArgs};
pub use fmt::{fmt, FmtArgs};
pub use init::{init, InitArgs};

use anyhow::{anyhow, Context, Result};
use maily_parser::{format_error, parse, Node};
use std::fs;
use std::path::{Path, PathBuf};

/// Template file formats, picked by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Html,
}

impl Format {
    pub fn of(path: &Path) -> Format {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("html") | Some("htm") => Format::Html,
            _ => Format::Json,
        }
    }
}

pub fn resolve(cwd: &str, path: &Path) -> PathBuf {
    PathBuf::from(cwd).join(path)
}

/// Read a template as JSON document or editor HTML
pub fn read_document(path: &Path) -> Result<Node> {
    let source = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

    match Format::of(path) {
        Format::Html => parse(&source).map_err(|e| {
            let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("unknown");
            anyhow!("\n{}", format_error(&source, file_name, &e))
        }),
        Format::Json => serde_json::from_str(&source).with_context(|| format!("Invalid document JSON in {}", path.display())),
    }
}

pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}
