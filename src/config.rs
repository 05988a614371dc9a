//! Configuration management for genmedia.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ToolError;
use crate::tools::BUILTIN_TOOLS;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_api_base() -> String {
    "https://fal.run".to_string()
}

fn default_api_key_env() -> String {
    "FAL_KEY".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_enabled")]
    pub enabled: Vec<String>,
}

fn default_enabled() -> Vec<String> {
    BUILTIN_TOOLS.iter().map(|s| s.to_string()).collect()
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key: None,
            api_key_env: default_api_key_env(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

/// The provider secret. Never printed.
#[derive(Clone, PartialEq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl AppConfig {
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".genmedia").join("config.toml"))
    }

    /// Load from the default location and apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from `path`, or defaults when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(api_base) = std::env::var("GENMEDIA_API_BASE") {
            if !api_base.is_empty() {
                self.provider.api_base = api_base;
            }
        }
    }

    /// Resolve the provider credential.
    ///
    /// An inline `api_key` wins; otherwise the environment variable named by
    /// `api_key_env` is read. Empty values count as missing.
    pub fn credential(&self) -> Result<Credential, ToolError> {
        if let Some(key) = &self.provider.api_key {
            if !key.is_empty() {
                return Ok(Credential::new(key.clone()));
            }
        }
        match std::env::var(&self.provider.api_key_env) {
            Ok(key) if !key.is_empty() => Ok(Credential::new(key)),
            _ => Err(ToolError::Configuration(format!(
                "{} is not configured",
                self.provider.api_key_env
            ))),
        }
    }

    /// Full endpoint URL for a provider route such as `fal-ai/fast-svd-lcm`.
    pub fn endpoint(&self, route: &str) -> String {
        format!(
            "{}/{}",
            self.provider.api_base.trim_end_matches('/'),
            route.trim_start_matches('/')
        )
    }

    pub fn is_enabled(&self, tool: &str) -> bool {
        self.tools.enabled.iter().any(|t| t == tool)
    }

    pub fn save_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content =
            toml::to_string_pretty(&Self::default()).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn without_key() -> AppConfig {
        let mut config = AppConfig::default();
        config.provider.api_key_env = "GENMEDIA_TEST_UNSET_KEY".to_string();
        config
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.provider.api_base, "https://fal.run");
        assert_eq!(config.provider.api_key_env, "FAL_KEY");
        assert!(config.is_enabled("briaBackgroundRemove"));
        assert!(config.is_enabled("recraftV3TextToImage"));
    }

    #[test]
    fn test_missing_credential() {
        let err = without_key().credential().unwrap_err();
        assert!(matches!(err, ToolError::Configuration(_)));
        assert_eq!(err.to_string(), "GENMEDIA_TEST_UNSET_KEY is not configured");
    }

    #[test]
    fn test_inline_credential_wins() {
        let mut config = without_key();
        config.provider.api_key = Some("secret".to_string());
        assert_eq!(config.credential().unwrap().expose(), "secret");

        config.provider.api_key = Some(String::new());
        assert!(config.credential().is_err());
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let debug = format!("{:?}", Credential::new("super-secret"));
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_endpoint_joining() {
        let mut config = AppConfig::default();
        assert_eq!(
            config.endpoint("fal-ai/fast-svd-lcm"),
            "https://fal.run/fal-ai/fast-svd-lcm"
        );
        config.provider.api_base = "http://localhost:8080/".to_string();
        assert_eq!(
            config.endpoint("/fal-ai/nano-banana/edit"),
            "http://localhost:8080/fal-ai/nano-banana/edit"
        );
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.provider.api_base, "https://fal.run");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        AppConfig::save_default(&path).unwrap();
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.tools.enabled.len(), BUILTIN_TOOLS.len());
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[provider]\napi_base = \"http://127.0.0.1:9000\"\n\n[tools]\nenabled = [\"falAI\"]\n",
        )
        .unwrap();
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.provider.api_base, "http://127.0.0.1:9000");
        assert_eq!(config.provider.api_key_env, "FAL_KEY");
        assert!(config.is_enabled("falAI"));
        assert!(!config.is_enabled("fastSvdLcm"));
    }

    #[test]
    fn test_tools_only_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[tools]\nenabled = [\"falAI\"]\n").unwrap();
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.provider.api_base, "https://fal.run");
        assert_eq!(config.provider.api_key_env, "FAL_KEY");
        assert!(config.provider.api_key.is_none());
        assert!(config.is_enabled("falAI"));
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "provider = 3").unwrap();
        assert!(AppConfig::load_from(&path).is_err());
    }
}
