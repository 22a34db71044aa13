mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{compile, edit, fmt, init, CompileArgs, EditArgs, FmtArgs, InitArgs};

/// Maily CLI - build and compile email templates
#[derive(Parser, Debug)]
#[command(name = "maily")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a maily.config.json and an example template
    Init(InitArgs),

    /// Compile a template to email HTML
    Compile(CompileArgs),

    /// Apply a JSON list of editor commands to a template
    Edit(EditArgs),

    /// Rewrite a template as editor HTML
    Fmt(FmtArgs),
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?.display().to_string();

    match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Compile(args) => compile(args, &cwd),
        Command::Edit(args) => edit(args, &cwd),
        Command::Fmt(args) => fmt(args, &cwd),
    }
}

fn main() {
    // Logs go to stderr so that stdout stays clean for piped HTML
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
