//! Configuration management for tfdocs.
//!
//! Parses `tfdocs.toml` configuration files with serde and provides
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
//! - `server.host`
//! - `preview.origin`
//! - `preview.provider_name`

mod expand;

use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override the project directory containing the documentation root.
    pub project_dir: Option<PathBuf>,
    /// Override the remote registry origin.
    pub origin: Option<String>,
    /// Override the provider name shown in served pages.
    pub provider_name: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "tfdocs.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Documentation layout (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Remote preview configuration.
    pub preview: PreviewConfig,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_owned(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    project_dir: Option<String>,
    root: Option<String>,
    index: Option<String>,
}

/// Resolved documentation layout.
///
/// `root` and `index` stay relative to `project_dir`: they double as the
/// addressing keys the preview client sends back in content requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsConfig {
    /// Directory the documentation root lives in.
    pub project_dir: PathBuf,
    /// Documentation root, relative to `project_dir`.
    pub root: PathBuf,
    /// Designated index page, relative to `project_dir`.
    pub index: PathBuf,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self::with_project_dir(PathBuf::from("."))
    }
}

impl DocsConfig {
    fn with_project_dir(project_dir: PathBuf) -> Self {
        Self {
            project_dir,
            root: PathBuf::from(DEFAULT_DOCS_ROOT),
            index: PathBuf::from(DEFAULT_DOCS_ROOT).join("index.md"),
        }
    }
}

const DEFAULT_DOCS_ROOT: &str = "docs";

/// Local path prefix served from the documentation tree.
const RESERVED_PREFIX: &str = "/markdown";

/// Remote registry preview configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Origin every unmatched request is proxied to.
    pub origin: String,
    /// Path of the preview shell page on the origin (also served locally).
    pub shell_path: String,
    /// Provider name annotated on served pages.
    ///
    /// Use [`Config::provider_name`] for the effective value.
    pub provider_name: Option<String>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            origin: "https://registry.terraform.io".to_owned(),
            shell_path: "/tools/doc-preview".to_owned(),
            provider_name: None,
        }
    }
}

impl PreviewConfig {
    /// Absolute URL of the remote preview shell.
    #[must_use]
    pub fn shell_url(&self) -> String {
        format!("{}{}", self.origin.trim_end_matches('/'), self.shell_path)
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
        /// Config field path (e.g., "`preview.origin`").
        field: String,
        /// Error message (e.g., "${`REGISTRY`} not set").
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

/// Require a path to be relative and free of `..` segments.
fn require_plain_relative(path: &Path, field: &str) -> Result<(), ConfigError> {
    let plain = path
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !plain || path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(format!(
            "{field} must be a relative path without '..' segments"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `tfdocs.toml` in current directory and parents.
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
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(project_dir) = &settings.project_dir {
            self.docs_resolved.project_dir.clone_from(project_dir);
        }
        if let Some(origin) = &settings.origin {
            self.preview.origin.clone_from(origin);
        }
        if let Some(provider_name) = &settings.provider_name {
            self.preview.provider_name = Some(provider_name.clone());
        }
    }

    /// Effective provider name.
    ///
    /// Falls back to the base name of the project directory, which is the
    /// current working directory unless configured otherwise.
    #[must_use]
    pub fn provider_name(&self) -> String {
        if let Some(name) = self.preview.provider_name.as_deref()
            && !name.is_empty()
        {
            return name.to_owned();
        }

        let dir = std::path::absolute(&self.docs_resolved.project_dir)
            .unwrap_or_else(|_| self.docs_resolved.project_dir.clone());
        dir.components()
            .rev()
            .find_map(|c| match c {
                Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                _ => None,
            })
            .unwrap_or_default()
    }

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

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            docs: DocsConfigRaw::default(),
            preview: PreviewConfig::default(),
            docs_resolved: DocsConfig::with_project_dir(base.to_path_buf()),
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after applying
    /// CLI settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_docs()?;
        self.validate_preview()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    fn validate_docs(&self) -> Result<(), ConfigError> {
        let docs = &self.docs_resolved;
        require_plain_relative(&docs.root, "docs.root")?;
        require_plain_relative(&docs.index, "docs.index")?;

        if !docs.index.starts_with(&docs.root) {
            return Err(ConfigError::Validation(format!(
                "docs.index must be inside docs.root ({})",
                docs.root.display()
            )));
        }
        if docs.index.extension().is_none_or(|ext| ext != "md") {
            return Err(ConfigError::Validation(
                "docs.index must be a markdown (.md) file".to_owned(),
            ));
        }

        Ok(())
    }

    fn validate_preview(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.preview.origin, "preview.origin")?;
        require_http_url(&self.preview.origin, "preview.origin")?;

        let shell_path = self.preview.shell_path.as_str();
        if !shell_path.starts_with('/') {
            return Err(ConfigError::Validation(
                "preview.shell_path must start with '/'".to_owned(),
            ));
        }
        if shell_path.contains(['{', '}', '*', '?', '#']) {
            return Err(ConfigError::Validation(
                "preview.shell_path must be a plain path without wildcards or query".to_owned(),
            ));
        }
        if shell_path == RESERVED_PREFIX || shell_path.starts_with(&format!("{RESERVED_PREFIX}/"))
        {
            return Err(ConfigError::Validation(format!(
                "preview.shell_path cannot be under {RESERVED_PREFIX}"
            )));
        }

        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        self.preview.origin = expand::expand_env(&self.preview.origin, "preview.origin")?;

        if let Some(ref name) = self.preview.provider_name {
            self.preview.provider_name =
                Some(expand::expand_env(name, "preview.provider_name")?);
        }

        Ok(())
    }

    /// Resolve the project directory against the config file's directory.
    ///
    /// `root` and `index` are kept relative; see [`DocsConfig`].
    fn resolve_paths(&mut self, config_dir: &Path) {
        let project_dir = match self.docs.project_dir.as_deref() {
            Some(dir) => config_dir.join(dir),
            None => config_dir.to_path_buf(),
        };
        let root = PathBuf::from(self.docs.root.as_deref().unwrap_or(DEFAULT_DOCS_ROOT));
        let index = self
            .docs
            .index
            .as_deref()
            .map_or_else(|| root.join("index.md"), PathBuf::from);

        self.docs_resolved = DocsConfig {
            project_dir,
            root,
            index,
        };
    }
}
