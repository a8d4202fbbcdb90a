//! Configuration management for md2sf.
//!
//! Parses `md2sf.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! Command configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `lint.command`, `lint.args`
//! - `spellcheck.command`, `spellcheck.args`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the quality gate enabled flag.
    pub lint_enabled: Option<bool>,
    /// Override the spellcheck enabled flag.
    pub spellcheck_enabled: Option<bool>,
    /// Override raw HTML passthrough.
    pub raw_html: Option<bool>,
    /// Override local image embedding.
    pub embed_images: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "md2sf.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rendering options.
    pub render: RenderConfig,
    /// Quality gate.
    pub lint: LintConfig,
    /// Spellcheck stage.
    pub spellcheck: SpellcheckConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Enable tables, strikethrough and task lists.
    pub gfm: bool,
    /// Pass raw HTML through instead of escaping it.
    pub raw_html: bool,
    /// Embed local images as `data:` URIs.
    pub embed_images: bool,
    /// Strip a leading `---` YAML front matter block instead of rendering it.
    pub front_matter: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            gfm: true,
            raw_html: false,
            embed_images: true,
            front_matter: false,
        }
    }
}

/// Prose linter configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Whether the quality gate runs.
    pub enabled: bool,
    /// Linter program.
    pub command: String,
    /// Arguments passed before the document path.
    pub args: Vec<String>,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            command: "proselint".to_owned(),
            args: Vec::new(),
        }
    }
}

/// Spellcheck configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SpellcheckConfig {
    /// Whether the spellcheck stage runs.
    pub enabled: bool,
    /// Word lister program, fed one line on stdin.
    pub command: String,
    pub args: Vec<String>,
    /// Words never reported.
    pub allowlist: Vec<String>,
}

impl Default for SpellcheckConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            command: "aspell".to_owned(),
            args: vec!["list".to_owned()],
            allowlist: Vec::new(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`lint.command`").
        field: String,
        /// Error message (e.g., "${`VALE_BIN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `md2sf.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(enabled) = settings.lint_enabled {
            self.lint.enabled = enabled;
        }
        if let Some(enabled) = settings.spellcheck_enabled {
            self.spellcheck.enabled = enabled;
        }
        if let Some(raw_html) = settings.raw_html {
            self.render.raw_html = raw_html;
        }
        if let Some(embed_images) = settings.embed_images {
            self.render.embed_images = embed_images;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let start = std::env::current_dir().ok()?;
        Self::discover_from(&start)
    }

    fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.lint.command, "lint.command")?;
        require_non_empty(&self.spellcheck.command, "spellcheck.command")?;
        Ok(())
    }

    /// Expand environment variable references in command settings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.lint.command = expand::expand_env(&self.lint.command, "lint.command")?;
        expand::expand_all(&mut self.lint.args, "lint.args")?;

        self.spellcheck.command =
            expand::expand_env(&self.spellcheck.command, "spellcheck.command")?;
        expand::expand_all(&mut self.spellcheck.args, "spellcheck.args")?;

        Ok(())
    }
}
