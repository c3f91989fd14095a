//! Configuration loading from ferry.toml.

use ferry_runtime::{HostCommands, SessionConfig};
use serde::Deserialize;
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Backend configuration.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Session tunables.
    #[serde(default)]
    pub session: SessionConfig,

    /// Interpreters used to launch host scripts.
    #[serde(default)]
    pub host: HostCommands,
}

/// Model backend configuration.
#[derive(Debug, Deserialize)]
pub struct BackendConfig {
    /// Model to use.
    #[serde(default = "default_model")]
    pub model: String,

    /// Token limit per model response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Anthropic API key. Falls back to `ANTHROPIC_API_KEY`.
    pub api_key: Option<String>,

    /// API root. Falls back to `ANTHROPIC_BASE_URL`.
    pub base_url: Option<String>,

    /// Optional system prompt.
    pub system: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            api_key: None,
            base_url: None,
            system: None,
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Resolve the API key from config, then the environment.
    pub fn api_key(&self, env: Option<String>) -> Result<String, ConfigError> {
        self.backend
            .api_key
            .clone()
            .or(env)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("API key not configured: set backend.api_key or ANTHROPIC_API_KEY")]
    MissingApiKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.backend.model, "claude-sonnet-4-20250514");
        assert_eq!(config.backend.max_tokens, 4096);
        assert_eq!(config.session, SessionConfig::default());
        assert_eq!(config.host, HostCommands::default());
    }

    #[test]
    fn sections_override_defaults() {
        let config = Config::parse(
            r#"
            [backend]
            model = "claude-haiku"
            max_tokens = 1000
            system = "Be brief."

            [session]
            max_tool_rounds = 3
            exit_keyword = "bye"

            [host]
            python = "python3"
            "#,
        )
        .unwrap();

        assert_eq!(config.backend.model, "claude-haiku");
        assert_eq!(config.backend.max_tokens, 1000);
        assert_eq!(config.backend.system.as_deref(), Some("Be brief."));
        assert_eq!(config.session.max_tool_rounds, 3);
        assert_eq!(config.session.exit_keyword, "bye");
        assert_eq!(config.host.python, "python3");
        assert_eq!(config.host.node, "node");
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = Config::parse("[backend\nmodel = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn api_key_prefers_config_over_env() {
        let mut config = Config::default();
        assert_eq!(config.api_key(Some("from-env".into())).unwrap(), "from-env");
        assert!(matches!(config.api_key(None), Err(ConfigError::MissingApiKey)));
        assert!(matches!(config.api_key(Some(String::new())), Err(ConfigError::MissingApiKey)));

        config.backend.api_key = Some("from-file".into());
        assert_eq!(config.api_key(Some("from-env".into())).unwrap(), "from-file");
    }
}
