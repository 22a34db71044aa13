use maily_compiler_html::CompileOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "maily.config.json";

/// Maily configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Options passed to the HTML compiler
    #[serde(default)]
    pub compiler_options: CompileOptions,

    /// Output directory for compiled HTML
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    /// JSON file with bindings used when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bindings: Option<String>,
}

fn default_out_dir() -> String {
    "dist".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to the output directory
    pub fn get_out_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.out_dir)
    }

    pub fn get_bindings_path(&self, cwd: &str) -> Option<PathBuf> {
        self.bindings.as_ref().map(|path| PathBuf::from(cwd).join(path))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            compiler_options: CompileOptions::default(),
            out_dir: default_out_dir(),
            bindings: None,
        }
    }
}
