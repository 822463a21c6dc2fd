mod env_manager;

use crate::error::{AnalystError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use env_manager::{get_env_value, ApiKeys};

/// Main configuration struct for the application
///
/// Loaded once at startup and treated as read-only afterwards. Every fetcher
/// and narrative generator takes it by reference in its constructor, so tests
/// can point the clients at mock servers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Forge API settings
    pub github: GitHubSettings,
    /// External text-generation settings
    pub llm: LlmSettings,
    /// Classification thresholds for the rule-based narrative
    pub thresholds: NarrativeThresholds,
    /// Web service settings
    pub server: ServerSettings,
    /// Directory where exported documents are written
    pub export_dir: PathBuf,
    /// Credentials, never read from or written to the config file
    #[serde(skip)]
    pub api_keys: ApiKeys,
}

/// Settings for the GitHub REST API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubSettings {
    /// Base URL of the REST API
    pub api_base: String,
    /// Web prefix every accepted repository URL must start with
    pub web_prefix: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// Settings for the optional OpenAI-compatible chat-completion service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Base URL, `/chat/completions` is appended
    pub api_base: String,
    /// Model name sent with each request
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Nucleus sampling mass
    pub top_p: f32,
    /// How many README characters go into the prompt
    pub readme_excerpt_chars: usize,
    /// Use the rule-based narrative when the service fails
    pub fallback_to_rules: bool,
}

/// Web service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Address the HTTP listener binds to
    pub bind_addr: String,
}

/// Business thresholds used by the rule-based narrative
///
/// Every comparison is strict (`>`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeThresholds {
    /// Stars above which popularity is "extremely high"
    pub popularity_extreme: u64,
    /// Stars above which popularity is "very high"
    pub popularity_very_high: u64,
    /// Stars above which popularity is "moderate"
    pub popularity_moderate: u64,
    /// Forks above which activity is "very active"
    pub activity_very_active: u64,
    /// Forks above which activity is "active"
    pub activity_active: u64,
    /// Forks above which activity is "moderate"
    pub activity_moderate: u64,
    /// Stars needed (together with `learning_extreme_forks`) for the top learning tier
    pub learning_extreme_stars: u64,
    /// Forks needed (together with `learning_extreme_stars`) for the top learning tier
    pub learning_extreme_forks: u64,
    /// Stars above which learning value is "very high value"
    pub learning_very_high_stars: u64,
    /// Stars above which learning value is "moderate value"
    pub learning_moderate_stars: u64,
    /// Stars-per-fork ratio above which few contributors is reported
    pub star_fork_ratio: u64,
    /// Open issues above which the backlog is reported as a maintenance risk
    pub issue_backlog: u64,
    /// Stars above which the architecture-study recommendation is given
    pub flagship_stars: u64,
    /// Forks above which the contribution recommendation is given
    pub collaboration_forks: u64,
    /// Languages that trigger the front-end recommendation
    pub frontend_languages: Vec<String>,
}

impl Config {
    /// Loads configuration: defaults, then the optional TOML file, then the environment
    ///
    /// The file is `$REPO_ANALYST_CONFIG` when set, otherwise
    /// `<config dir>/repo-analyst/config.toml`. A missing file is not an error.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let path = get_env_value("REPO_ANALYST_CONFIG")
            .map(PathBuf::from)
            .or_else(|| dirs::config_dir().map(|dir| dir.join("repo-analyst").join("config.toml")));

        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env_overrides();
        config.ensure_tokens()?;
        Ok(config)
    }

    /// Parses a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| AnalystError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text; absent keys keep their defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| AnalystError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Applies environment variables on top of the current values
    pub fn apply_env_overrides(&mut self) {
        self.api_keys = ApiKeys::from_env();
        if let Some(base) = get_env_value("GITHUB_API_BASE_URL") {
            self.github.api_base = base;
        }
        if let Some(base) = get_env_value("OPENAI_API_BASE") {
            self.llm.api_base = base;
        }
        if let Some(model) = get_env_value("OPENAI_MODEL") {
            self.llm.model = model;
        }
        if let Some(addr) = get_env_value("REPO_ANALYST_BIND") {
            self.server.bind_addr = addr;
        }
        if let Some(dir) = get_env_value("REPO_ANALYST_EXPORT_DIR") {
            self.export_dir = PathBuf::from(dir);
        }
    }

    /// Validates that configured tokens are not blank
    pub fn ensure_tokens(&self) -> Result<()> {
        if let Some(token) = &self.api_keys.github_token {
            if token.trim().is_empty() {
                return Err(AnalystError::Config("GitHub token is empty".into()));
            }
        }
        if let Some(key) = &self.api_keys.llm_api_key {
            if key.trim().is_empty() {
                return Err(AnalystError::Config("LLM API key is empty".into()));
            }
        }
        Ok(())
    }

    /// Whether the model-backed narrative strategy can be used
    pub fn llm_enabled(&self) -> bool {
        self.api_keys.llm_api_key.is_some()
    }

    /// Timeout applied to forge requests
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.github.timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github: GitHubSettings::default(),
            llm: LlmSettings::default(),
            thresholds: NarrativeThresholds::default(),
            server: ServerSettings::default(),
            export_dir: std::env::temp_dir(),
            api_keys: ApiKeys::default(),
        }
    }
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            web_prefix: "https://github.com/".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.9,
            top_p: 0.7,
            readme_excerpt_chars: 1000,
            fallback_to_rules: true,
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".to_string(),
        }
    }
}

impl Default for NarrativeThresholds {
    fn default() -> Self {
        Self {
            popularity_extreme: 10_000,
            popularity_very_high: 1_000,
            popularity_moderate: 100,
            activity_very_active: 500,
            activity_active: 100,
            activity_moderate: 10,
            learning_extreme_stars: 5_000,
            learning_extreme_forks: 1_000,
            learning_very_high_stars: 1_000,
            learning_moderate_stars: 100,
            star_fork_ratio: 10,
            issue_backlog: 100,
            flagship_stars: 10_000,
            collaboration_forks: 500,
            frontend_languages: vec!["JavaScript".to_string(), "TypeScript".to_string()],
        }
    }
}
