//! Fake generation client for testing.
//!
//! Returns canned results without network access, and counts calls so tests can
//! assert whether a request was issued at all.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};

use super::{GenerationClient, RecipeRequest};
use crate::error::GenerationError;
use crate::types::{Difficulty, Ingredient, NutritionalInfo, Recipe, Step};

/// 1x1 transparent PNG, served as the fake image.
const SAMPLE_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// A fake generation client.
///
/// Recipe requests return the configured recipe (or error); image requests return
/// the configured data URI (or error).
#[derive(Debug)]
pub struct FakeGenerationClient {
    recipe: RwLock<Result<Recipe, GenerationError>>,
    image: RwLock<Result<String, GenerationError>>,
    /// Artificial latency applied to every request.
    delay: Option<Duration>,
    recipe_calls: AtomicUsize,
    image_calls: AtomicUsize,
    last_request: RwLock<Option<RecipeRequest>>,
}

impl Default for FakeGenerationClient {
    fn default() -> Self {
        Self::with_sample_recipe()
    }
}

impl FakeGenerationClient {
    /// Create a client that answers with the given results.
    pub fn new(
        recipe: Result<Recipe, GenerationError>,
        image: Result<String, GenerationError>,
    ) -> Self {
        Self {
            recipe: RwLock::new(recipe),
            image: RwLock::new(image),
            delay: None,
            recipe_calls: AtomicUsize::new(0),
            image_calls: AtomicUsize::new(0),
            last_request: RwLock::new(None),
        }
    }

    /// A client that produces a crêpe recipe and a tiny PNG.
    pub fn with_sample_recipe() -> Self {
        Self::new(Ok(sample_recipe()), Ok(sample_image_uri()))
    }

    /// Delay every response, so tests can observe in-flight states.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replace the recipe result for subsequent calls.
    pub fn set_recipe_result(&self, result: Result<Recipe, GenerationError>) {
        if let Ok(mut recipe) = self.recipe.write() {
            *recipe = result;
        }
    }

    /// Replace the image result for subsequent calls.
    pub fn set_image_result(&self, result: Result<String, GenerationError>) {
        if let Ok(mut image) = self.image.write() {
            *image = result;
        }
    }

    pub fn recipe_calls(&self) -> usize {
        self.recipe_calls.load(Ordering::SeqCst)
    }

    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }

    /// The inputs of the most recent recipe request.
    pub fn last_request(&self) -> Option<RecipeRequest> {
        self.last_request.read().ok().and_then(|r| r.clone())
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl GenerationClient for FakeGenerationClient {
    async fn request_recipe(&self, request: &RecipeRequest) -> Result<Recipe, GenerationError> {
        self.recipe_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.write() {
            *last = Some(request.clone());
        }
        self.pause().await;

        self.recipe
            .read()
            .map_err(|_| GenerationError::Transport("FakeGenerationClient: poisoned".to_string()))?
            .clone()
    }

    async fn request_image(
        &self,
        _title: &str,
        _description: &str,
    ) -> Result<String, GenerationError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;

        self.image
            .read()
            .map_err(|_| GenerationError::Transport("FakeGenerationClient: poisoned".to_string()))?
            .clone()
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}

/// The canned recipe served by the fake client.
pub fn sample_recipe() -> Recipe {
    Recipe {
        title: "Crêpes Fines - Delicate French Crêpes".to_string(),
        description: "Paper-thin crêpes with a golden, lacy edge.".to_string(),
        prep_time: "10 mins".to_string(),
        cook_time: "20 mins".to_string(),
        difficulty: Difficulty::Easy,
        servings: 4,
        ingredients: vec![
            Ingredient {
                item: "egg".to_string(),
                amount: "2 large".to_string(),
            },
            Ingredient {
                item: "flour".to_string(),
                amount: "125 g".to_string(),
            },
            Ingredient {
                item: "milk".to_string(),
                amount: "300 ml".to_string(),
            },
            Ingredient {
                item: "butter".to_string(),
                amount: "1 tbsp, melted".to_string(),
            },
        ],
        instructions: vec![
            Step {
                step_number: 1,
                instruction: "Whisk the flour and eggs, then add the milk gradually.".to_string(),
                tip: Some("Rest the batter for 30 minutes for tender crêpes.".to_string()),
            },
            Step {
                step_number: 2,
                instruction: "Stir in the melted butter.".to_string(),
                tip: None,
            },
            Step {
                step_number: 3,
                instruction: "Cook thin ladlefuls in a hot pan, one minute per side."
                    .to_string(),
                tip: None,
            },
        ],
        nutritional_info: NutritionalInfo {
            calories: 210.0,
            protein: "8g".to_string(),
            carbs: "28g".to_string(),
            fat: "7g".to_string(),
        },
    }
}

/// The canned image served by the fake client.
pub fn sample_image_uri() -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(SAMPLE_PNG))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CookingTime;

    fn request() -> RecipeRequest {
        RecipeRequest {
            ingredients: vec!["egg".to_string(), "flour".to_string()],
            restrictions: vec![],
            cooking_time: CookingTime::ThirtyMinutes,
        }
    }

    #[tokio::test]
    async fn test_fake_client_sample() {
        let client = FakeGenerationClient::with_sample_recipe();
        let recipe = client.request_recipe(&request()).await.unwrap();
        assert_eq!(recipe.instructions[0].step_number, 1);
        assert_eq!(client.recipe_calls(), 1);
        assert_eq!(client.last_request(), Some(request()));

        let uri = client.request_image(&recipe.title, &recipe.description).await.unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
        assert_eq!(client.image_calls(), 1);
    }

    #[tokio::test]
    async fn test_fake_client_configured_errors() {
        let client = FakeGenerationClient::new(
            Err(GenerationError::Transport("offline".to_string())),
            Err(GenerationError::Empty),
        );
        assert!(client.request_recipe(&request()).await.is_err());
        assert_eq!(
            client.request_image("a", "b").await.unwrap_err(),
            GenerationError::Empty
        );

        client.set_recipe_result(Ok(sample_recipe()));
        assert!(client.request_recipe(&request()).await.is_ok());
        assert_eq!(client.recipe_calls(), 2);
    }

    #[test]
    fn test_sample_image_is_valid_png() {
        assert_eq!(crate::image::validate_image(SAMPLE_PNG).unwrap(), "image/png");
    }
}
