use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use strum_macros::Display;

use crate::internal::ui::app::Action;

const CONFIG_FILE_NAME: &str = "config.ron";
const APP_DIR_NAME: &str = "text-layout-harness";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub keybindings: KeyBindingConfig,
    pub stage: StageConfig,
    pub automation: AutomationConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    /// Directory for the rolling log file used while the TUI owns the terminal.
    /// Defaults to "logs".
    pub log_directory: Option<String>,
    /// Per-module overrides, e.g. `{"text_layout_harness::harness": "debug"}`.
    pub module_levels: HashMap<String, LogLevel>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            log_directory: None,
            module_levels: HashMap::new(),
        }
    }
}

impl LoggingConfig {
    /// `EnvFilter` directive string built from the level and module overrides.
    pub fn filter_directives(&self) -> String {
        let mut filter_str = self.level.to_string();
        let mut modules: Vec<_> = self.module_levels.iter().collect();
        modules.sort_by(|a, b| a.0.cmp(b.0));
        for (module, level) in modules {
            filter_str.push_str(&format!(",{}={}", module, level));
        }
        filter_str
    }
}

/// Key strings (see `parse_key_str`) mapped to actions, applied over the defaults.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct KeyBindingConfig {
    pub bindings: HashMap<String, Action>,
}

/// Stage size in terminal cells.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct StageConfig {
    pub width: u16,
    pub height: u16,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            width: 60,
            height: 20,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct AutomationConfig {
    /// Print every captured frame to stdout after a headless run.
    pub print_frames: bool,
}

impl AppConfig {
    /// Load from an explicit path, failing loudly when it cannot be read.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = ron::from_str::<AppConfig>(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Look for `config.ron` in the usual places and fall back to defaults.
    pub fn load() -> Self {
        for path in Self::candidates() {
            if !path.exists() {
                continue;
            }
            match Self::load_from(&path) {
                Ok(config) => return config,
                Err(e) => tracing::error!("{:#}", e),
            }
        }

        tracing::info!("No config file found, using defaults");
        Self::default()
    }

    fn candidates() -> Vec<PathBuf> {
        let mut candidates = vec![PathBuf::from(CONFIG_FILE_NAME)];

        if let Ok(exe) = std::env::current_exe()
            && let Some(dir) = exe.parent()
        {
            candidates.push(dir.join(CONFIG_FILE_NAME));
        }

        if let Some(dir) = dirs::config_dir() {
            candidates.push(dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME));
        }

        candidates
    }
}
