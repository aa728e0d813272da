//! Generation client: recipe and image requests to a generative model.
//!
//! This module provides:
//! - `GenerationClient` trait abstracting the model provider
//! - `GeminiClient` talking to the Gemini REST API
//! - `FakeGenerationClient` with canned results for tests and offline use
//! - Configuration via environment variables
//! - Prompt templates and the recipe response schema
//!
//! # Configuration
//!
//! - `CHEF_AI_PROVIDER` (optional): "gemini" (default) or "fake"
//! - `GEMINI_API_KEY` (required for gemini): API key
//! - `CHEF_AI_RECIPE_MODEL` / `CHEF_AI_IMAGE_MODEL` (optional): model names
//! - `CHEF_AI_BASE_URL` (optional): API base URL
//! - `CHEF_AI_TIMEOUT_SECS` (optional): request timeout

mod config;
mod fake;
mod gemini;
pub mod prompts;
pub mod types;

pub use config::{AiConfig, ConfigError, Provider};
pub use fake::{sample_image_uri, sample_recipe, FakeGenerationClient};
pub use gemini::{parse_image_response, parse_recipe_response, GeminiClient};

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::GenerationError;
use crate::types::{CookingTime, Recipe};

/// Inputs for one recipe request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeRequest {
    pub ingredients: Vec<String>,
    pub restrictions: Vec<String>,
    pub cooking_time: CookingTime,
}

/// A client for the external generative model.
///
/// Each call is a single request/response cycle. Implementations never retry.
#[async_trait]
pub trait GenerationClient: Send + Sync + fmt::Debug {
    /// Generate a structured recipe. No partial recipe is ever returned.
    async fn request_recipe(&self, request: &RecipeRequest) -> Result<Recipe, GenerationError>;

    /// Generate an illustrative image and return it as a `data:` URI.
    async fn request_image(&self, title: &str, description: &str)
        -> Result<String, GenerationError>;

    /// Get the provider name (e.g., "gemini", "fake").
    fn provider_name(&self) -> &'static str;

    /// Get the recipe model name.
    fn model_name(&self) -> &str;
}

/// Build the client selected by the environment.
pub fn create_client_from_env() -> Result<Arc<dyn GenerationClient>, GenerationClientError> {
    let config = AiConfig::from_env()?;
    create_client(config)
}

/// Build the client for an explicit configuration.
pub fn create_client(config: AiConfig) -> Result<Arc<dyn GenerationClient>, GenerationClientError> {
    match config.provider {
        Provider::Fake => Ok(Arc::new(FakeGenerationClient::with_sample_recipe())),
        Provider::Gemini => Ok(Arc::new(GeminiClient::new(config)?)),
    }
}

/// Failure to construct a generation client.
#[derive(Debug, thiserror::Error)]
pub enum GenerationClientError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_fake_client() {
        let config = AiConfig::from_lookup(|name| {
            (name == "CHEF_AI_PROVIDER").then(|| "fake".to_string())
        })
        .unwrap();

        let client = create_client(config).unwrap();
        assert_eq!(client.provider_name(), "fake");

        let recipe = client
            .request_recipe(&RecipeRequest {
                ingredients: vec!["egg".to_string()],
                restrictions: vec![],
                cooking_time: CookingTime::default(),
            })
            .await
            .unwrap();
        assert!(!recipe.ingredients.is_empty());
    }

    #[test]
    fn test_create_gemini_client() {
        let config = AiConfig::from_lookup(|name| {
            (name == "GEMINI_API_KEY").then(|| "secret".to_string())
        })
        .unwrap();

        let client = create_client(config).unwrap();
        assert_eq!(client.provider_name(), "gemini");
        assert_eq!(client.model_name(), config::DEFAULT_RECIPE_MODEL);
    }
}
