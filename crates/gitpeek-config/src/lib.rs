//! Configuration management for gitpeek.
//!
//! Parses `gitpeek.toml` configuration files with serde and provides
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
//! - `github.user`, `github.token`
//! - `gitlab.user`, `gitlab.token`
//! - `markdown.service_url`, `markdown.user`, `markdown.token`
//! - `notebook.viewer_url`
//!
//! ## Example
//!
//! ```toml
//! [github]
//! user = "octocat"
//! token = "${GITHUB_TOKEN}"
//!
//! [history]
//! limit = 10
//!
//! [markdown]
//! renderer = "local"
//! ```

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the global history limit.
    pub history_limit: Option<usize>,
    /// Override the Markdown renderer.
    pub markdown_renderer: Option<MarkdownRenderer>,
    /// Override the HTTP timeout.
    pub timeout_secs: Option<u64>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "gitpeek.toml";

/// Default number of commits shown by history shortcodes.
pub const DEFAULT_HISTORY_LIMIT: usize = 5;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default credentials for GitHub shortcodes.
    pub github: ProviderConfig,
    /// Default credentials for GitLab shortcodes.
    pub gitlab: ProviderConfig,
    /// History rendering configuration.
    pub history: HistoryConfig,
    /// Markdown conversion configuration.
    pub markdown: MarkdownConfig,
    /// Notebook viewer configuration.
    pub notebook: NotebookConfig,
    /// HTTP transport configuration.
    pub http: HttpConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Provider-level default credentials.
///
/// Used whenever a shortcode does not carry its own `user`/`token`.
/// An empty token means requests are sent without authentication.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProviderConfig {
    /// Account name (used for Basic auth and in error messages).
    pub user: String,
    /// Personal access token.
    pub token: String,
}

/// History rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of commits rendered when a shortcode gives no limit.
    pub limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// How fetched Markdown is turned into HTML.
#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MarkdownRenderer {
    /// POST the text to the external Markdown service.
    #[default]
    Service,
    /// Convert in-process with pulldown-cmark.
    Local,
}

/// Markdown conversion configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Renderer selection.
    pub renderer: MarkdownRenderer,
    /// Endpoint accepting `{"text": ...}` and returning HTML.
    pub service_url: String,
    /// Basic auth user for the service (independent of provider credentials).
    pub user: String,
    /// Basic auth token for the service.
    pub token: String,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            renderer: MarkdownRenderer::Service,
            service_url: "https://api.github.com/markdown".to_owned(),
            user: String::new(),
            token: String::new(),
        }
    }
}

/// Notebook viewer configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct NotebookConfig {
    /// Base URL of the nbviewer instance.
    pub viewer_url: String,
}

impl Default for NotebookConfig {
    fn default() -> Self {
        Self {
            viewer_url: "https://nbviewer.jupyter.org".to_owned(),
        }
    }
}

/// HTTP transport configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Global timeout for a single request, in seconds.
    pub timeout_secs: u64,
    /// `User-Agent` header; defaults to `gitpeek/<version>` when unset.
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: None,
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
        /// Config field path (e.g., "`github.token`").
        field: String,
        /// Error message (e.g., "${`GITHUB_TOKEN`} not set").
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

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `gitpeek.toml` in current directory and parents,
    /// falling back to defaults when none is found.
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
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(limit) = settings.history_limit {
            self.history.limit = limit;
        }
        if let Some(renderer) = settings.markdown_renderer {
            self.markdown.renderer = renderer;
        }
        if let Some(timeout) = settings.timeout_secs {
            self.http.timeout_secs = timeout;
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

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Credentials are not required: an empty token means anonymous access.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.markdown.renderer == MarkdownRenderer::Service {
            require_non_empty(&self.markdown.service_url, "markdown.service_url")?;
            require_http_url(&self.markdown.service_url, "markdown.service_url")?;
        }

        require_non_empty(&self.notebook.viewer_url, "notebook.viewer_url")?;
        require_http_url(&self.notebook.viewer_url, "notebook.viewer_url")?;

        if self.http.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "http.timeout_secs must be greater than 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        expand::expand_in_place(&mut self.github.user, "github.user")?;
        expand::expand_in_place(&mut self.github.token, "github.token")?;
        expand::expand_in_place(&mut self.gitlab.user, "gitlab.user")?;
        expand::expand_in_place(&mut self.gitlab.token, "gitlab.token")?;

        expand::expand_in_place(&mut self.markdown.service_url, "markdown.service_url")?;
        expand::expand_in_place(&mut self.markdown.user, "markdown.user")?;
        expand::expand_in_place(&mut self.markdown.token, "markdown.token")?;

        expand::expand_in_place(&mut self.notebook.viewer_url, "notebook.viewer_url")?;

        Ok(())
    }
}
