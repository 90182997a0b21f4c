//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `GOJEN_` prefix, `__` between sections,
//!    e.g. `GOJEN_STORE__STATE_DIR=/tmp/gojen`
//! 3. The file passed with `--config` (must exist)
//! 4. `.gojen.toml` in the current directory (optional)
//! 5. The user config file, see [`AppConfig::config_path`] (optional)
//! 6. Built-in defaults (always present)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File};
use gojen_adapters::Inflections;
use gojen_core::error::GojenResult;
use serde::{Deserialize, Serialize};

/// File name of the per-project config.
pub const LOCAL_CONFIG_FILE: &str = ".gojen.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Audit state settings.
    pub store: StoreConfig,
    /// Where declarations are loaded from.
    pub declarations: DeclarationsConfig,
    /// Apply engine settings.
    pub apply: ApplyConfig,
    /// Template filter settings.
    pub render: RenderConfig,
    /// Output settings.
    pub output: OutputConfig,
    /// Log file settings.
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub state_dir: PathBuf,
    pub record_states: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::from(".gojen"),
            record_states: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeclarationsConfig {
    pub dir: PathBuf,
}

impl Default for DeclarationsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("declarations"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplyConfig {
    /// Prefix of `<prefix> +gojen:append=<alias>` marker lines.
    pub comment_prefix: String,
}

impl Default for ApplyConfig {
    fn default() -> Self {
        Self {
            comment_prefix: gojen_core::application::DEFAULT_COMMENT_PREFIX.to_string(),
        }
    }
}

/// Extra inflection rules for the `plural`, `singular`, `camel` and
/// `lower_camel` filters.
///
/// ```toml
/// [render]
/// plural = [["(\\w*)x$", "${1}xen"]]
///
/// [render.irregular]
/// person = "people"
///
/// [render.acronyms]
/// id = "ID"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// `[pattern, replacement]` pairs; later entries are tried first.
    pub plural: Vec<(String, String)>,
    pub singular: Vec<(String, String)>,
    /// Singular -> plural.
    pub irregular: BTreeMap<String, String>,
    /// Word -> form written by the camel filters.
    pub acronyms: BTreeMap<String, String>,
}

impl RenderConfig {
    /// # Errors
    ///
    /// `Configuration` when a rule pattern is not a valid regex.
    pub fn inflections(&self) -> GojenResult<Inflections> {
        let mut inflections = Inflections::new();
        for (pattern, replacement) in &self.plural {
            inflections.add_plural_rule(pattern, replacement)?;
        }
        for (pattern, replacement) in &self.singular {
            inflections.add_singular_rule(pattern, replacement)?;
        }
        for (singular, plural) in &self.irregular {
            inflections.add_irregular(singular, plural);
        }
        for (word, form) in &self.acronyms {
            inflections.add_acronym(word, form);
        }
        Ok(inflections)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Also write logs to this file (no ANSI).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from every layer.
    ///
    /// `config_file` is the path the user passed via `--config`; it must
    /// exist.  The default locations are optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path(), Path::new(LOCAL_CONFIG_FILE), config_file)
    }

    fn load_from(
        user_file: &Path,
        local_file: &Path,
        config_file: Option<&PathBuf>,
    ) -> anyhow::Result<Self> {
        let defaults = Config::try_from(&Self::default()).context("invalid built-in defaults")?;

        let mut builder = Config::builder()
            .add_source(defaults)
            .add_source(File::from(user_file).required(false))
            .add_source(File::from(local_file).required(false));

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path.as_path()).required(true));
        }

        builder
            .add_source(
                Environment::with_prefix("GOJEN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("invalid configuration")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.gojen.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "gojen", "gojen")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// Render as TOML, for `gojen init` and `gojen config list`.
    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("failed to serialise config")
    }
}
