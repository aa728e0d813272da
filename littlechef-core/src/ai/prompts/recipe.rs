//! Recipe generation prompt and the structured output schema sent with it.

use serde_json::{json, Value as JsonValue};

use crate::types::{CookingTime, Difficulty};

/// Render the recipe prompt from the pantry, dietary tags and time bucket.
pub fn render_recipe_prompt(
    ingredients: &[String],
    restrictions: &[String],
    cooking_time: CookingTime,
) -> String {
    let preferences = if restrictions.is_empty() {
        "none".to_string()
    } else {
        restrictions.join(". ")
    };

    format!(
        r#"Generate a high-quality, creative recipe in English using some or all of these ingredients: {ingredients}.
Context: Dietary preferences are {preferences}. Time limit is {time}.
The recipe should sound like it's from a high-end Parisian bistro like Gusteau's from Ratatouille.
Provide a detailed response with clear steps and nutritional estimation. Use professional but encouraging culinary language."#,
        ingredients = ingredients.join(", "),
        preferences = preferences,
        time = cooking_time.as_str(),
    )
}

/// The response schema the model must follow for recipe requests.
///
/// Every field is required except `tip` on a step.
pub fn recipe_response_schema() -> JsonValue {
    let difficulties: Vec<&str> = Difficulty::ALL.iter().map(Difficulty::as_str).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "title": {
                "type": "STRING",
                "description": "The name of the dish in the format: 'French Name - English Name'."
            },
            "description": { "type": "STRING" },
            "prepTime": { "type": "STRING" },
            "cookTime": { "type": "STRING" },
            "difficulty": { "type": "STRING", "enum": difficulties },
            "servings": { "type": "NUMBER" },
            "ingredients": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "item": { "type": "STRING" },
                        "amount": { "type": "STRING" }
                    },
                    "required": ["item", "amount"]
                }
            },
            "instructions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "stepNumber": { "type": "NUMBER" },
                        "instruction": { "type": "STRING" },
                        "tip": { "type": "STRING" }
                    },
                    "required": ["stepNumber", "instruction"]
                }
            },
            "nutritionalInfo": {
                "type": "OBJECT",
                "properties": {
                    "calories": { "type": "NUMBER" },
                    "protein": { "type": "STRING" },
                    "carbs": { "type": "STRING" },
                    "fat": { "type": "STRING" }
                },
                "required": ["calories", "protein", "carbs", "fat"]
            }
        },
        "required": [
            "title", "description", "prepTime", "cookTime", "difficulty",
            "servings", "ingredients", "instructions", "nutritionalInfo"
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_prompt() {
        let prompt = render_recipe_prompt(
            &["egg".to_string(), "flour".to_string()],
            &["Vegetarian".to_string(), "Keto".to_string()],
            CookingTime::OneHour,
        );

        assert!(prompt.contains("ingredients: egg, flour."));
        assert!(prompt.contains("Dietary preferences are Vegetarian. Keto."));
        assert!(prompt.contains("Time limit is 1 Hour."));
        assert!(prompt.contains("Parisian bistro"));
    }

    #[test]
    fn test_render_prompt_without_restrictions() {
        let prompt = render_recipe_prompt(&["egg".to_string()], &[], CookingTime::default());
        assert!(prompt.contains("Dietary preferences are none."));
        assert!(prompt.contains("Time limit is 30 mins."));
    }

    #[test]
    fn test_schema_requires_everything_but_tip() {
        let schema = recipe_response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert_eq!(required.len(), 9);
        assert!(required.contains(&"nutritionalInfo"));

        let step_required = &schema["properties"]["instructions"]["items"]["required"];
        assert_eq!(step_required, &json!(["stepNumber", "instruction"]));
        assert_eq!(
            schema["properties"]["difficulty"]["enum"],
            json!(["Easy", "Medium", "Advanced"])
        );
    }
}
