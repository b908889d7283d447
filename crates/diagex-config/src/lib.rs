//! Configuration management for diagex.
//!
//! Parses `diagex.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `docs.source`
//! - `renderer.command`
//! - `renderer.theme`
//! - `renderer.background`

mod expand;

use diagex_diagrams::{
    DEFAULT_BACKGROUND, DEFAULT_COMMAND, DEFAULT_FENCE, DEFAULT_THEME, DiagramFormat,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override input document path.
    pub source: Option<PathBuf>,
    /// Override fence label.
    pub fence: Option<String>,
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Override output format.
    pub format: Option<DiagramFormat>,
    /// Override renderer command.
    pub command: Option<String>,
    /// Override renderer theme.
    pub theme: Option<String>,
    /// Override renderer background.
    pub background: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "diagex.toml";

const DEFAULT_SOURCE: &str = "docs/UML.md";
const DEFAULT_OUTPUT_DIR: &str = "uml-diagrams-svg";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input document configuration (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Output configuration (paths are relative strings from TOML).
    output: OutputConfigRaw,
    /// External renderer configuration.
    renderer: RendererConfigRaw,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Resolved output configuration (set after loading).
    #[serde(skip)]
    pub output_resolved: OutputConfig,
    /// Resolved renderer configuration (set after loading).
    #[serde(skip)]
    pub renderer_resolved: RendererConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw docs configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source: Option<String>,
    fence: Option<String>,
}

/// Resolved input document configuration.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Document to extract diagrams from.
    pub source: PathBuf,
    /// Code fence label marking diagram blocks.
    pub fence: String,
}

/// Raw output configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    dir: Option<String>,
    format: Option<DiagramFormat>,
}

/// Resolved output configuration.
#[derive(Debug, Default)]
pub struct OutputConfig {
    /// Directory receiving rendered diagrams.
    pub dir: PathBuf,
    /// Output format.
    pub format: DiagramFormat,
}

/// Raw renderer configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RendererConfigRaw {
    command: Option<String>,
    theme: Option<String>,
    background: Option<String>,
    args: Option<Vec<String>>,
    staging_dir: Option<String>,
}

/// Resolved external renderer configuration.
#[derive(Debug)]
pub struct RendererConfig {
    /// Renderer executable (default: `mmdc`).
    pub command: String,
    /// Visual theme passed to the renderer.
    pub theme: String,
    /// Background color passed to the renderer.
    pub background: String,
    /// Extra arguments appended to every invocation.
    pub args: Vec<String>,
    /// Directory for staging files. `None` uses the system temp directory.
    pub staging_dir: Option<PathBuf>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_COMMAND.to_owned(),
            theme: DEFAULT_THEME.to_owned(),
            background: DEFAULT_BACKGROUND.to_owned(),
            args: Vec::new(),
            staging_dir: None,
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
        /// Config field path (e.g., "`renderer.command`").
        field: String,
        /// Error message (e.g., "${`MMDC`} not set").
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

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `diagex.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the final configuration is invalid.
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
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source) = &settings.source {
            self.docs_resolved.source.clone_from(source);
        }
        if let Some(fence) = &settings.fence {
            self.docs_resolved.fence.clone_from(fence);
        }
        if let Some(dir) = &settings.output_dir {
            self.output_resolved.dir.clone_from(dir);
        }
        if let Some(format) = settings.format {
            self.output_resolved.format = format;
        }
        if let Some(command) = &settings.command {
            self.renderer_resolved.command.clone_from(command);
        }
        if let Some(theme) = &settings.theme {
            self.renderer_resolved.theme.clone_from(theme);
        }
        if let Some(background) = &settings.background {
            self.renderer_resolved.background.clone_from(background);
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

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            docs: DocsConfigRaw::default(),
            output: OutputConfigRaw::default(),
            renderer: RendererConfigRaw::default(),
            docs_resolved: DocsConfig {
                source: base.join(DEFAULT_SOURCE),
                fence: DEFAULT_FENCE.to_owned(),
            },
            output_resolved: OutputConfig {
                dir: base.join(DEFAULT_OUTPUT_DIR),
                format: DiagramFormat::default(),
            },
            renderer_resolved: RendererConfig::default(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are properly set and contain valid values.
    /// Called automatically by [`load`](Self::load).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_docs()?;
        self.validate_renderer()?;
        Ok(())
    }

    fn validate_docs(&self) -> Result<(), ConfigError> {
        let fence = &self.docs_resolved.fence;
        require_non_empty(fence, "docs.fence")?;
        if fence.chars().any(|c| c.is_whitespace() || c == '`') {
            return Err(ConfigError::Validation(format!(
                "docs.fence must be a single word without backticks, got '{fence}'"
            )));
        }
        Ok(())
    }

    fn validate_renderer(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.renderer_resolved.command, "renderer.command")?;
        require_non_empty(&self.renderer_resolved.theme, "renderer.theme")?;
        require_non_empty(&self.renderer_resolved.background, "renderer.background")?;
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref source) = self.docs.source {
            self.docs.source = Some(expand::expand_env(source, "docs.source")?);
        }
        if let Some(ref command) = self.renderer.command {
            self.renderer.command = Some(expand::expand_env(command, "renderer.command")?);
        }
        if let Some(ref theme) = self.renderer.theme {
            self.renderer.theme = Some(expand::expand_env(theme, "renderer.theme")?);
        }
        if let Some(ref background) = self.renderer.background {
            self.renderer.background =
                Some(expand::expand_env(background, "renderer.background")?);
        }
        Ok(())
    }

    /// Resolve raw TOML values against the config directory.
    fn resolve(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.docs_resolved = DocsConfig {
            source: resolve(self.docs.source.as_deref(), DEFAULT_SOURCE),
            fence: self
                .docs
                .fence
                .clone()
                .unwrap_or_else(|| DEFAULT_FENCE.to_owned()),
        };

        self.output_resolved = OutputConfig {
            dir: resolve(self.output.dir.as_deref(), DEFAULT_OUTPUT_DIR),
            format: self.output.format.unwrap_or_default(),
        };

        let defaults = RendererConfig::default();
        self.renderer_resolved = RendererConfig {
            command: self.renderer.command.clone().unwrap_or(defaults.command),
            theme: self.renderer.theme.clone().unwrap_or(defaults.theme),
            background: self
                .renderer
                .background
                .clone()
                .unwrap_or(defaults.background),
            args: self.renderer.args.clone().unwrap_or_default(),
            staging_dir: self.renderer.staging_dir.as_deref().map(|d| config_dir.join(d)),
        };
    }
}
