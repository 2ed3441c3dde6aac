// crates/thkx-cli/src/config.rs
//
// CLI configuration: data directory, default identities, and the ledger
// policy used at genesis. Loaded from a TOML file or populated with
// sensible defaults.

use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use thkx_ledger::LedgerConfig;

/// CLI/adapter configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Directory holding the ledger snapshot and journal.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Default caller address (hex) when `--as` is not given.
    #[serde(default)]
    pub caller: Option<String>,

    /// Ledger policy applied at `thkx init`.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

fn default_data_dir() -> String {
    "~/.thkx/data".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            caller: None,
            ledger: LedgerConfig::default(),
        }
    }
}

impl CliConfig {
    /// Load configuration from a TOML file, or fall back to defaults when
    /// the file does not exist.
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let expanded = expand_home(path);
        if !expanded.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(expanded)?;
        let config: CliConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// The data directory with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        expand_home(&self.data_dir)
    }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
