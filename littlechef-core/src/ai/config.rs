//! Generation client configuration from environment variables.

use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default Gemini REST base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model for structured recipe generation.
pub const DEFAULT_RECIPE_MODEL: &str = "gemini-3-flash-preview";

/// Default model for image generation.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },

    #[error("Unknown generation provider: {0}")]
    UnknownProvider(String),
}

/// Which backend answers generation requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
    Fake,
}

impl Provider {
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(Provider::Gemini),
            "fake" => Ok(Provider::Fake),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

/// Generation client configuration.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub provider: Provider,
    /// API key for Gemini. Empty when the fake provider is selected.
    pub api_key: String,
    /// Model used for recipe generation.
    pub recipe_model: String,
    /// Model used for image generation.
    pub image_model: String,
    /// Base URL for the API.
    pub base_url: String,
    pub timeout: Duration,
}

impl AiConfig {
    /// Load configuration from environment variables.
    ///
    /// - `CHEF_AI_PROVIDER`: "gemini" (default) or "fake"
    /// - `GEMINI_API_KEY`: required for gemini
    /// - `CHEF_AI_RECIPE_MODEL`: default "gemini-3-flash-preview"
    /// - `CHEF_AI_IMAGE_MODEL`: default "gemini-2.5-flash-image"
    /// - `CHEF_AI_BASE_URL`: default "https://generativelanguage.googleapis.com/v1beta"
    /// - `CHEF_AI_TIMEOUT_SECS`: default 60
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = match lookup("CHEF_AI_PROVIDER") {
            Some(value) => Provider::from_str(&value)?,
            None => Provider::Gemini,
        };

        let api_key = match provider {
            Provider::Gemini => lookup("GEMINI_API_KEY")
                .filter(|key| !key.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar("GEMINI_API_KEY".to_string()))?,
            Provider::Fake => String::new(),
        };

        let recipe_model =
            lookup("CHEF_AI_RECIPE_MODEL").unwrap_or_else(|| DEFAULT_RECIPE_MODEL.to_string());

        let image_model =
            lookup("CHEF_AI_IMAGE_MODEL").unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string());

        let base_url = lookup("CHEF_AI_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = match lookup("CHEF_AI_TIMEOUT_SECS") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                name: "CHEF_AI_TIMEOUT_SECS".to_string(),
                value,
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            provider,
            api_key,
            recipe_model,
            image_model,
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_with_api_key() {
        let config = AiConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "secret")])).unwrap();
        assert_eq!(config.provider, Provider::Gemini);
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.recipe_model, DEFAULT_RECIPE_MODEL);
        assert_eq!(config.image_model, DEFAULT_IMAGE_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_gemini_requires_api_key() {
        let err = AiConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::MissingEnvVar("GEMINI_API_KEY".to_string()));
    }

    #[test]
    fn test_fake_provider_needs_no_key() {
        let config = AiConfig::from_lookup(lookup(&[("CHEF_AI_PROVIDER", "Fake")])).unwrap();
        assert_eq!(config.provider, Provider::Fake);
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_overrides_and_invalid_timeout() {
        let config = AiConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("CHEF_AI_BASE_URL", "http://localhost:8080/"),
            ("CHEF_AI_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout, Duration::from_secs(5));

        let err = AiConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("CHEF_AI_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_unknown_provider() {
        let err = AiConfig::from_lookup(lookup(&[("CHEF_AI_PROVIDER", "openai")])).unwrap_err();
        assert_eq!(err, ConfigError::UnknownProvider("openai".to_string()));
    }
}
