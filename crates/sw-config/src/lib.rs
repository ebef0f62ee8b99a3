//! Configuration management for slotweave.
//!
//! Parses `slotweave.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [compose]
//! slot_tag = "slot"
//! render_timeout_ms = 5000
//!
//! [components.app-example]
//! fragment = "<button><slot></slot> 1</button>"
//!
//! [components.site-footer]
//! file = "components/footer.html"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `components.<tag>.file` supports environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use sw_compose::{DEFAULT_SLOT_TAG, GHOST_ROOT_TAG};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the insertion-point tag.
    pub slot_tag: Option<String>,
    /// Override the per-render timeout.
    pub render_timeout_ms: Option<u64>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "slotweave.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Composition settings.
    pub compose: ComposeConfig,
    /// Component definitions keyed by tag, as written in TOML.
    components: BTreeMap<String, ComponentConfigRaw>,

    /// Resolved components, sorted by tag (set after loading).
    #[serde(skip)]
    pub components_resolved: Vec<ComponentConfig>,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Composition configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ComposeConfig {
    /// Insertion-point tag recognised inside rendered fragments.
    pub slot_tag: String,
    /// Timeout for a single render call, in milliseconds.
    pub render_timeout_ms: Option<u64>,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            slot_tag: DEFAULT_SLOT_TAG.to_owned(),
            render_timeout_ms: None,
        }
    }
}

/// Raw component configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ComponentConfigRaw {
    fragment: Option<String>,
    file: Option<String>,
}

/// Resolved component definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentConfig {
    /// Lowercase component tag.
    pub tag: String,
    /// Where the rendered fragment comes from.
    pub source: ComponentSource,
}

/// Fragment source of a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentSource {
    /// Fragment markup written inline in the config.
    Inline(String),
    /// Fragment markup read from a file on every render.
    File(PathBuf),
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
        /// Config field path (e.g., "`components.app-example.file`").
        field: String,
        /// Error message (e.g., "${`FRAGMENT_DIR`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a tag name without whitespace or markup delimiters.
fn require_tag_name(value: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(value, field)?;
    if value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '/' | '"' | '\'' | '='))
    {
        return Err(ConfigError::Validation(format!(
            "{field} is not a valid tag name: {value:?}"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `slotweave.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
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

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(slot_tag) = &settings.slot_tag {
            self.compose.slot_tag.clone_from(slot_tag);
        }
        if let Some(timeout) = settings.render_timeout_ms {
            self.compose.render_timeout_ms = Some(timeout);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
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

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_components(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically at the end of [`Config::load`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_compose()?;
        self.validate_components()?;
        Ok(())
    }

    /// Validate compose configuration.
    fn validate_compose(&self) -> Result<(), ConfigError> {
        require_tag_name(&self.compose.slot_tag, "compose.slot_tag")?;

        if self.compose.render_timeout_ms == Some(0) {
            return Err(ConfigError::Validation(
                "compose.render_timeout_ms must be greater than 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate resolved component definitions.
    fn validate_components(&self) -> Result<(), ConfigError> {
        for component in &self.components_resolved {
            let field = format!("components.{}", component.tag);
            require_tag_name(&component.tag, &field)?;
            if component.tag == GHOST_ROOT_TAG {
                return Err(ConfigError::Validation(format!(
                    "{field}: <{GHOST_ROOT_TAG}> is reserved"
                )));
            }
            if component.tag == self.compose.slot_tag.to_lowercase() {
                return Err(ConfigError::Validation(format!(
                    "{field}: the insertion-point tag cannot be a component"
                )));
            }
        }
        Ok(())
    }

    /// Resolve raw component tables into [`ComponentConfig`] values.
    ///
    /// Expands environment variables in `file` and resolves it relative to
    /// the config directory. Each component needs exactly one of `fragment`
    /// or `file`.
    fn resolve_components(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        let mut resolved = Vec::with_capacity(self.components.len());

        for (tag, raw) in &self.components {
            let field = format!("components.{tag}");
            let source = match (&raw.fragment, &raw.file) {
                (Some(fragment), None) => ComponentSource::Inline(fragment.clone()),
                (None, Some(file)) => {
                    let file = expand::expand_env(file, &format!("{field}.file"))?;
                    require_non_empty(&file, &format!("{field}.file"))?;
                    ComponentSource::File(config_dir.join(file))
                }
                (Some(_), Some(_)) => {
                    return Err(ConfigError::Validation(format!(
                        "{field} sets both fragment and file"
                    )));
                }
                (None, None) => {
                    return Err(ConfigError::Validation(format!(
                        "{field} requires fragment or file"
                    )));
                }
            };
            resolved.push(ComponentConfig {
                tag: tag.trim().to_lowercase(),
                source,
            });
        }

        resolved.sort_by(|a, b| a.tag.cmp(&b.tag));
        if let Some(pair) = resolved.windows(2).find(|pair| pair[0].tag == pair[1].tag) {
            return Err(ConfigError::Validation(format!(
                "components.{} is defined more than once",
                pair[0].tag
            )));
        }

        self.components_resolved = resolved;
        Ok(())
    }
}
