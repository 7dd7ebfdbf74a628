//! Shell configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! changes.
//!
//! # Example YAML
//!
//! ```yaml
//! name: ops
//! description: Operations console
//! prompt: "ops> "
//! history_file: /home/me/.ops_history
//! history_limit: 1000
//! log_level: info
//! help_groups: true
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Application name, shown in help and the default prompt.
    pub name: String,
    /// Shown at the top of `help`.
    pub description: String,
    /// Prompt string. Defaults to `<name> » `.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// History is loaded from and saved to this file when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_file: Option<PathBuf>,
    /// Maximum number of history entries kept.
    pub history_limit: usize,
    /// Default tracing filter, overridden by `RUST_LOG`.
    pub log_level: String,
    /// Group commands by their help group in `help` output.
    pub help_groups: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            name: "cmdsh".to_string(),
            description: String::new(),
            prompt: None,
            history_file: None,
            history_limit: 500,
            log_level: "warn".to_string(),
            help_groups: true,
        }
    }
}

impl ShellConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::error::ShellError::Io) if the file cannot be
    /// read, or [`Yaml`](crate::error::ShellError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    pub fn prompt(&self) -> String {
        self.prompt
            .clone()
            .unwrap_or_else(|| format!("{} » ", self.name))
    }
}
