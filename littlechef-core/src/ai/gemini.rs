//! Gemini (Google) generation client.

use async_trait::async_trait;

use super::config::AiConfig;
use super::prompts::{
    recipe_response_schema, render_image_prompt, render_recipe_prompt, IMAGE_ASPECT_RATIO,
};
use super::types::{
    ApiErrorResponse, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    ImageConfig,
};
use super::{GenerationClient, RecipeRequest};
use crate::error::GenerationError;
use crate::image::inline_data_to_uri;
use crate::types::Recipe;

/// Gemini API client.
#[derive(Debug)]
pub struct GeminiClient {
    config: AiConfig,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a new GeminiClient from configuration.
    pub fn new(config: AiConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, client })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.config.base_url, model)
    }

    /// Send one request and decode the response body.
    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenerationError> {
        tracing::debug!(model = model, "Calling Gemini API");

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.config.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(GenerationError::Transport(format!(
                "API returned {}: {}",
                status.as_u16(),
                message
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| GenerationError::Failed(format!("Malformed API response: {}", e)))
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn request_recipe(&self, request: &RecipeRequest) -> Result<Recipe, GenerationError> {
        let prompt = render_recipe_prompt(
            &request.ingredients,
            &request.restrictions,
            request.cooking_time,
        );
        let body = GenerateContentRequest::text(prompt).with_config(GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(recipe_response_schema()),
            ..Default::default()
        });

        let response = self.generate(&self.config.recipe_model, &body).await?;
        parse_recipe_response(&response)
    }

    async fn request_image(
        &self,
        title: &str,
        description: &str,
    ) -> Result<String, GenerationError> {
        let prompt = render_image_prompt(title, description);
        let body = GenerateContentRequest::text(prompt).with_config(GenerationConfig {
            response_modalities: Some(vec!["TEXT".to_string(), "IMAGE".to_string()]),
            image_config: Some(ImageConfig {
                aspect_ratio: IMAGE_ASPECT_RATIO.to_string(),
            }),
            ..Default::default()
        });

        let response = self.generate(&self.config.image_model, &body).await?;
        parse_image_response(&response)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.config.recipe_model
    }
}

fn block_reason(response: &GenerateContentResponse) -> Option<String> {
    response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.clone())
}

/// Parse the schema-typed recipe out of a model response.
///
/// Any response that does not yield a valid recipe, including a blocked
/// prompt, is `GenerationError::Failed`.
pub fn parse_recipe_response(
    response: &GenerateContentResponse,
) -> Result<Recipe, GenerationError> {
    let Some(text) = response.text() else {
        if let Some(reason) = block_reason(response) {
            return Err(GenerationError::Failed(format!("Prompt blocked: {}", reason)));
        }
        return Err(GenerationError::Failed("Model returned no recipe text".to_string()));
    };

    let recipe: Recipe = serde_json::from_str(&text)
        .map_err(|e| GenerationError::Failed(format!("Recipe did not match schema: {}", e)))?;

    recipe.validate().map_err(GenerationError::Failed)?;

    Ok(recipe)
}

/// Find the first inline image in a model response and encode it as a `data:` URI.
///
/// Text without any image means the model declined to render.
pub fn parse_image_response(response: &GenerateContentResponse) -> Result<String, GenerationError> {
    let parts = response.parts();

    if let Some(inline) = parts.iter().find_map(|p| p.inline_data.as_ref()) {
        return inline_data_to_uri(&inline.data, inline.mime_type.as_deref())
            .map_err(GenerationError::Failed);
    }

    if let Some(text) = response.text() {
        return Err(GenerationError::Refused(text.trim().to_string()));
    }

    if let Some(reason) = block_reason(response) {
        return Err(GenerationError::Refused(format!("Prompt blocked: {}", reason)));
    }

    Err(GenerationError::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde_json::json;

    fn response(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    fn text_response(text: &str) -> GenerateContentResponse {
        response(json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
        }))
    }

    fn recipe_json() -> serde_json::Value {
        serde_json::to_value(crate::types::fixtures::recipe("Crêpes - Pancakes")).unwrap()
    }

    #[test]
    fn test_parse_recipe() {
        let parsed = parse_recipe_response(&text_response(&recipe_json().to_string())).unwrap();
        assert_eq!(parsed.title, "Crêpes - Pancakes");
        assert_eq!(parsed.instructions[0].step_number, 1);
    }

    #[test]
    fn test_parse_recipe_missing_field_fails() {
        let mut value = recipe_json();
        value.as_object_mut().unwrap().remove("nutritionalInfo");
        let err = parse_recipe_response(&text_response(&value.to_string())).unwrap_err();
        assert!(matches!(err, GenerationError::Failed(_)));
    }

    #[test]
    fn test_parse_recipe_zero_servings_fails() {
        let mut value = recipe_json();
        value["servings"] = json!(0);
        let err = parse_recipe_response(&text_response(&value.to_string())).unwrap_err();
        assert!(matches!(err, GenerationError::Failed(_)));
    }

    #[test]
    fn test_parse_recipe_not_json_fails() {
        let err = parse_recipe_response(&text_response("Bonjour!")).unwrap_err();
        assert!(matches!(err, GenerationError::Failed(_)));
    }

    #[test]
    fn test_parse_recipe_empty_and_blocked_fail() {
        let err = parse_recipe_response(&response(json!({ "candidates": [] }))).unwrap_err();
        assert_eq!(err, GenerationError::Failed("Model returned no recipe text".to_string()));

        let err = parse_recipe_response(&response(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .unwrap_err();
        assert_eq!(err, GenerationError::Failed("Prompt blocked: SAFETY".to_string()));
    }

    #[test]
    fn test_parse_image_first_inline_part_wins() {
        let png = STANDARD.encode(crate::image::tiny_png());
        let uri = parse_image_response(&response(json!({
            "candidates": [{ "content": { "parts": [
                { "text": "Here is your dish" },
                { "inlineData": { "mimeType": "image/png", "data": png } }
            ] } }]
        })))
        .unwrap();
        assert_eq!(uri, format!("data:image/png;base64,{}", png));
    }

    #[test]
    fn test_parse_image_text_only_is_refusal() {
        let err = parse_image_response(&text_response("I can't draw that.")).unwrap_err();
        assert_eq!(err, GenerationError::Refused("I can't draw that.".to_string()));
    }

    #[test]
    fn test_parse_image_nothing_is_empty() {
        let err = parse_image_response(&response(json!({
            "candidates": [{ "content": { "parts": [] } }]
        })))
        .unwrap_err();
        assert_eq!(err, GenerationError::Empty);
    }

    #[test]
    fn test_parse_image_bad_bytes_fail() {
        let err = parse_image_response(&response(json!({
            "candidates": [{ "content": { "parts": [
                { "inlineData": { "mimeType": "image/png", "data": STANDARD.encode(b"nope") } }
            ] } }]
        })))
        .unwrap_err();
        assert!(matches!(err, GenerationError::Failed(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let config = AiConfig::from_lookup(|name| match name {
            "GEMINI_API_KEY" => Some("secret".to_string()),
            "CHEF_AI_BASE_URL" => Some("http://127.0.0.1:9".to_string()),
            "CHEF_AI_TIMEOUT_SECS" => Some("2".to_string()),
            _ => None,
        })
        .unwrap();
        let client = GeminiClient::new(config).unwrap();

        let err = client.request_image("Soup", "Hot").await.unwrap_err();
        assert!(matches!(err, GenerationError::Transport(_)));
    }
}
