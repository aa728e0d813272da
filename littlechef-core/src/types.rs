use std::fmt;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Dietary tags offered by the front end. Any non-empty tag may still be toggled.
pub const DIETARY_OPTIONS: &[&str] = &["Vegan", "Vegetarian", "Gluten-Free", "Keto", "Dairy-Free"];

/// How hard a recipe is to cook, as reported by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Advanced,
}

impl Difficulty {
    pub const ALL: &'static [Difficulty] =
        &[Difficulty::Easy, Difficulty::Medium, Difficulty::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub item: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    #[serde(deserialize_with = "whole_number")]
    pub step_number: u32,
    pub instruction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionalInfo {
    pub calories: f64,
    pub protein: String,
    pub carbs: String,
    pub fat: String,
}

/// A generated recipe. Immutable once it leaves the generation client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub title: String,
    pub description: String,
    pub prep_time: String,
    pub cook_time: String,
    pub difficulty: Difficulty,
    #[serde(deserialize_with = "whole_number")]
    pub servings: u32,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<Step>,
    pub nutritional_info: NutritionalInfo,
}

impl Recipe {
    /// Check the numeric constraints serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.servings == 0 {
            return Err("servings must be a positive integer".to_string());
        }
        if !self.nutritional_info.calories.is_finite() || self.nutritional_info.calories < 0.0 {
            return Err(format!(
                "calories must be a non-negative number, got {}",
                self.nutritional_info.calories
            ));
        }
        Ok(())
    }
}

/// A recipe kept in the cookbook, together with the image shown when it was saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRecipe {
    pub id: Uuid,
    pub recipe: Recipe,
    pub image_url: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl SavedRecipe {
    pub fn new(recipe: Recipe, image_url: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipe,
            image_url,
            // Stored with millisecond precision.
            timestamp: Utc::now().trunc_subsecs(3),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub id: Uuid,
    pub name: String,
    /// Empty when the user added the item by hand.
    #[serde(default)]
    pub amount: String,
    pub checked: bool,
}

impl ShoppingItem {
    pub fn new(name: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount: amount.into(),
            checked: false,
        }
    }
}

impl From<&Ingredient> for ShoppingItem {
    fn from(ingredient: &Ingredient) -> Self {
        ShoppingItem::new(ingredient.item.clone(), ingredient.amount.clone())
    }
}

/// The fixed cooking-time buckets a user can choose from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CookingTime {
    #[serde(rename = "Quick (15 min)")]
    Quick,
    #[default]
    #[serde(rename = "30 mins")]
    ThirtyMinutes,
    #[serde(rename = "1 Hour")]
    OneHour,
    #[serde(rename = "Show-stopper")]
    ShowStopper,
}

impl CookingTime {
    pub const ALL: &'static [CookingTime] = &[
        CookingTime::Quick,
        CookingTime::ThirtyMinutes,
        CookingTime::OneHour,
        CookingTime::ShowStopper,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CookingTime::Quick => "Quick (15 min)",
            CookingTime::ThirtyMinutes => "30 mins",
            CookingTime::OneHour => "1 Hour",
            CookingTime::ShowStopper => "Show-stopper",
        }
    }

    /// Parse a bucket label, ignoring case and surrounding whitespace.
    pub fn from_label(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|bucket| bucket.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for CookingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which screen the front end is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Home,
    Saved,
    Shopping,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Home => "home",
            View::Saved => "saved",
            View::Shopping => "shopping",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "home" => Some(View::Home),
            "saved" | "cookbook" => Some(View::Saved),
            "shopping" | "list" => Some(View::Shopping),
            _ => None,
        }
    }
}

/// The model encodes numbers as JSON floats, so `4.0` must be accepted where an
/// integer is expected.
fn whole_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = f64::deserialize(deserializer)?;
    if value.fract() != 0.0 || value < 0.0 || value > f64::from(u32::MAX) {
        return Err(D::Error::custom(format!(
            "expected a non-negative whole number, got {}",
            value
        )));
    }
    Ok(value as u32)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn recipe(title: &str) -> Recipe {
        Recipe {
            title: title.to_string(),
            description: "Thin French pancakes".to_string(),
            prep_time: "10 mins".to_string(),
            cook_time: "20 mins".to_string(),
            difficulty: Difficulty::Easy,
            servings: 4,
            ingredients: vec![
                Ingredient {
                    item: "egg".to_string(),
                    amount: "2".to_string(),
                },
                Ingredient {
                    item: "flour".to_string(),
                    amount: "1 cup".to_string(),
                },
                Ingredient {
                    item: "milk".to_string(),
                    amount: "300 ml".to_string(),
                },
            ],
            instructions: vec![
                Step {
                    step_number: 1,
                    instruction: "Whisk everything together.".to_string(),
                    tip: Some("Rest the batter for 30 minutes.".to_string()),
                },
                Step {
                    step_number: 2,
                    instruction: "Cook in a hot buttered pan.".to_string(),
                    tip: None,
                },
            ],
            nutritional_info: NutritionalInfo {
                calories: 220.0,
                protein: "9g".to_string(),
                carbs: "30g".to_string(),
                fat: "7g".to_string(),
            },
        }
    }
}
