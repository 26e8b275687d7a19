use crate::error::{FlowError, Result};
use crate::surface::CommandId;
use codeprompt_context::ExtensionTable;
use codeprompt_editor::Border;
use codeprompt_invoke::{ContentDelivery, InvokerConfig};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides [`Config::command`]
pub const COMMAND_ENV: &str = "CODEPROMPT_COMMAND";

/// User configuration, read from `config.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Assistant executable
    pub command: String,

    /// Extra arguments placed before the prompt flag
    pub args: Vec<String>,

    pub prompt_flag: String,

    pub content_delivery: ContentDelivery,

    pub window: WindowConfig,

    /// Scratch file extension for unknown filetypes
    pub default_extension: String,

    /// Filetype label -> extension overrides
    pub extensions: HashMap<String, String>,

    /// Directory for scratch files (OS temp dir when unset)
    pub temp_dir: Option<PathBuf>,

    /// Upper bound on a scratch file's lifetime, in milliseconds
    pub temp_release_ms: u64,

    /// Prefix of every panel title
    pub title_prefix: String,

    /// Command name -> keychord overrides
    pub keymaps: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            command: "claude".to_string(),
            args: Vec::new(),
            prompt_flag: "-p".to_string(),
            content_delivery: ContentDelivery::Stdin,
            window: WindowConfig::default(),
            default_extension: "txt".to_string(),
            extensions: HashMap::new(),
            temp_dir: None,
            temp_release_ms: 5000,
            title_prefix: "Claude Code".to_string(),
            keymaps: BTreeMap::new(),
        }
    }
}

/// Size and border of floating panels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Fraction of the screen width, in (0, 1]
    pub width: f64,
    /// Fraction of the screen height, in (0, 1]
    pub height: f64,
    pub border: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 0.8,
            height: 0.8,
            border: "rounded".to_string(),
        }
    }
}

impl WindowConfig {
    /// Parsed border; unknown names were rejected by [`Config::validate`]
    pub fn border(&self) -> Border {
        Border::from_name(&self.border).unwrap_or_default()
    }
}

impl Config {
    /// `$XDG_CONFIG_HOME/codeprompt/config.toml`, or the platform equivalent
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("codeprompt").join("config.toml"))
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(text).map_err(|e| FlowError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read `path`. A missing file is an error; use [`Config::load_or_default`]
    /// for the implicit location.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| FlowError::Config(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml_str(&text).map_err(|e| match e {
            FlowError::Config(msg) => FlowError::Config(format!("{}: {msg}", path.display())),
            other => other,
        })?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Read `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Apply environment overrides
    pub fn with_env(mut self) -> Self {
        if let Ok(command) = std::env::var(COMMAND_ENV) {
            if !command.trim().is_empty() {
                log::debug!("{COMMAND_ENV} overrides command with `{command}`");
                self.command = command;
            }
        }
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.command.trim().is_empty() {
            return Err(FlowError::Config("command must not be empty".to_string()));
        }

        for (name, value) in [("width", self.window.width), ("height", self.window.height)] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(FlowError::Config(format!(
                    "window.{name} must be in (0, 1], got {value}"
                )));
            }
        }

        if Border::from_name(&self.window.border).is_none() {
            return Err(FlowError::Config(format!(
                "unknown window.border `{}` (expected none, single, double or rounded)",
                self.window.border
            )));
        }

        if let Some(name) = self
            .keymaps
            .keys()
            .find(|name| CommandId::from_name(name).is_none())
        {
            return Err(FlowError::Config(format!("keymap for unknown command `{name}`")));
        }

        if self.default_extension.trim_start_matches('.').is_empty() {
            return Err(FlowError::Config(
                "default_extension must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn invoker_config(&self) -> InvokerConfig {
        InvokerConfig {
            program: self.command.clone(),
            args: self.args.clone(),
            prompt_flag: self.prompt_flag.clone(),
            delivery: self.content_delivery,
        }
    }

    pub fn extension_table(&self) -> ExtensionTable {
        ExtensionTable::new(self.default_extension.clone(), self.extensions.clone())
    }

    pub fn temp_release(&self) -> Duration {
        Duration::from_millis(self.temp_release_ms)
    }
}
