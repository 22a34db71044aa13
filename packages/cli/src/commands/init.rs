use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

const EXAMPLE_TEMPLATE: &str = r#"<h1 style="text-align: center">Welcome, <span data-type="variable" data-id="name"></span></h1>
<div data-type="section" style="background-color: #f8fafc;--bg-color: #f8fafc; border-radius: 8px; padding-top: 16px; padding-right: 16px; padding-bottom: 16px; padding-left: 16px">
  <div data-type="columns" style="width: 100%">
    <div data-type="column" class="hide-scrollbars" style="width: 50%;max-width:50%"><p>Left column</p></div>
    <div data-type="column" class="hide-scrollbars" style="width: 50%;max-width:50%"><p>Right column</p></div>
  </div>
</div>
<div data-type="for" each="products">
  <p><strong>Product:</strong> <span data-type="variable" data-id="title"></span></p>
</div>
<p data-type="footer">You are receiving this email because you signed up.</p>
"#;

const EXAMPLE_BINDINGS: &str = r#"{
  "name": "Ada",
  "products": [
    { "title": "Notebook" },
    { "title": "Fountain pen" }
  ]
}
"#;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory for the example template
    #[arg(short, long, default_value = "templates")]
    pub templates_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Maily project...".bright_blue().bold());

    let templates_dir = PathBuf::from(cwd).join(&args.templates_dir);
    if !templates_dir.exists() {
        fs::create_dir_all(&templates_dir)?;
        println!("  {} Created {}/", "✓".green(), args.templates_dir);
    }

    let example_file = templates_dir.join("welcome.html");
    if !example_file.exists() {
        fs::write(&example_file, EXAMPLE_TEMPLATE)?;
        println!("  {} Created welcome.html", "✓".green());
    }

    let bindings_file = templates_dir.join("bindings.json");
    if !bindings_file.exists() {
        fs::write(&bindings_file, EXAMPLE_BINDINGS)?;
        println!("  {} Created bindings.json", "✓".green());
    }

    let config = Config {
        bindings: Some(format!("{}/bindings.json", args.templates_dir)),
        ..Config::default()
    };
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}/welcome.html", args.templates_dir);
    println!("  2. Run: maily compile {}/welcome.html", args.templates_dir);
    println!("  3. Check output in {}/", config.out_dir);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::read_document;
    use maily_compiler_html::{compile, Bindings};

    #[test]
    fn test_init_writes_config_and_compilable_example() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_str().unwrap();
        init(
            InitArgs {
                templates_dir: "templates".to_string(),
                force: false,
            },
            cwd,
        )
        .unwrap();

        let config = Config::load(cwd).unwrap();
        assert_eq!(config.bindings.as_deref(), Some("templates/bindings.json"));

        let doc = read_document(&dir.path().join("templates/welcome.html")).unwrap();
        let bindings = Bindings::from_json(EXAMPLE_BINDINGS).unwrap();
        let html = compile(&doc, &bindings).unwrap();
        assert!(html.contains("Notebook"));
        assert!(html.contains("Fountain pen"));
        assert!(html.contains("Welcome, Ada"));
    }
}
