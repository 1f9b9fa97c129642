use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from tasklane.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// File that newly created tasks are written to
    #[serde(default = "default_file")]
    pub default_file: String,
    /// File that completed tasks are archived into
    #[serde(default = "default_archive_file")]
    pub archive_file: String,
    /// Kanban board paths offered by "move to board"
    #[serde(default)]
    pub boards: Vec<String>,
    #[serde(default)]
    pub ui: UiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_file: default_file(),
            archive_file: default_archive_file(),
            boards: Vec::new(),
            ui: UiConfig::default(),
        }
    }
}

fn default_file() -> String {
    "todo.txt".to_string()
}

fn default_archive_file() -> String {
    "done.txt".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// Hex color overrides keyed by theme slot name (e.g. `highlight = "#FB4196"`)
    #[serde(default)]
    pub colors: HashMap<String, String>,
}
