use super::{read_document, resolve, write_output};
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use maily_compiler_html::{compile_with_options, Bindings, CompileOptions};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Args)]
pub struct CompileArgs {
    /// Template to compile (.json document or editor .html)
    pub input: PathBuf,

    /// JSON file with bindings for `for` nodes and variables
    #[arg(short, long)]
    pub bindings: Option<PathBuf>,

    /// Output file (defaults to <outDir>/<name>.html)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Output to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,

    /// Pretty print HTML
    #[arg(long)]
    pub pretty: bool,

    /// Wrap the output in a complete email document
    #[arg(long)]
    pub full_document: bool,

    /// Title used by --full-document
    #[arg(long)]
    pub title: Option<String>,
}

pub fn compile(args: CompileArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let input = resolve(cwd, &args.input);
    let document = read_document(&input)?;

    let bindings = load_bindings(&args, &config, cwd)?;
    let options = merge_options(&config.compiler_options, &args);
    debug!(input = %input.display(), bindings = bindings.len(), "compiling template");

    let html = compile_with_options(&document, &bindings, &options)?;

    if args.stdout {
        println!("{}", html);
        return Ok(());
    }

    let output_file = match &args.out {
        Some(out) => resolve(cwd, out),
        None => {
            let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("template");
            config.get_out_dir(cwd).join(stem).with_extension("html")
        }
    };
    write_output(&output_file, &html)?;

    println!(
        "  {} {} → {}",
        "✓".green(),
        args.input.display(),
        output_file.display()
    );
    Ok(())
}

/// Flags override the config file
fn merge_options(base: &CompileOptions, args: &CompileArgs) -> CompileOptions {
    let mut options = base.clone();
    if args.pretty {
        options.pretty = true;
    }
    if args.full_document {
        options.full_document = true;
    }
    if let Some(title) = &args.title {
        options.title = Some(title.clone());
    }
    options
}

fn load_bindings(args: &CompileArgs, config: &Config, cwd: &str) -> Result<Bindings> {
    let path = match &args.bindings {
        Some(path) => resolve(cwd, path),
        None => match config.get_bindings_path(cwd) {
            Some(path) => path,
            None => return Ok(Bindings::new()),
        },
    };
    let json = fs::read_to_string(&path).with_context(|| format!("Failed to read bindings {}", path.display()))?;
    Ok(Bindings::from_json(&json)?)
}
