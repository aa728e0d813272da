//! Plain-text rendering of application state.

use littlechef_core::{AppState, Phase, Recipe, SavedRecipe, ShoppingItem, View, DIETARY_OPTIONS};

/// Describe a `data:` image URI without printing its payload.
pub fn image_summary(uri: &str) -> String {
    let Some(rest) = uri.strip_prefix("data:") else {
        return "image".to_string();
    };
    let (mime, payload) = rest.split_once(";base64,").unwrap_or((rest, ""));
    let bytes = payload.len() / 4 * 3;
    format!("{} image, {:.1} KB", mime, bytes as f64 / 1024.0)
}

pub fn recipe(recipe: &Recipe, image_url: Option<&str>) -> String {
    let mut lines = vec![
        recipe.title.clone(),
        "=".repeat(recipe.title.chars().count()),
        recipe.description.clone(),
        String::new(),
        format!(
            "Prep {} | Cook {} | {} | Serves {}",
            recipe.prep_time, recipe.cook_time, recipe.difficulty, recipe.servings
        ),
    ];
    if let Some(uri) = image_url {
        lines.push(format!("Photo: {}", image_summary(uri)));
    }

    lines.push(String::new());
    lines.push("Ingredients".to_string());
    for ingredient in &recipe.ingredients {
        lines.push(format!("  - {} ({})", ingredient.item, ingredient.amount));
    }

    lines.push(String::new());
    lines.push("Instructions".to_string());
    for step in &recipe.instructions {
        lines.push(format!("  {}. {}", step.step_number, step.instruction));
        if let Some(tip) = &step.tip {
            lines.push(format!("     Chef's tip: {}", tip));
        }
    }

    let nutrition = &recipe.nutritional_info;
    lines.push(String::new());
    lines.push(format!(
        "Per serving: {} kcal | protein {} | carbs {} | fat {}",
        nutrition.calories, nutrition.protein, nutrition.carbs, nutrition.fat
    ));
    lines.join("\n")
}

pub fn cookbook(saved: &[SavedRecipe]) -> String {
    if saved.is_empty() {
        return "Your cookbook is empty.".to_string();
    }
    saved
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            format!(
                "{:>3}. {} ({}, saved {})",
                i + 1,
                entry.recipe.title,
                entry.recipe.difficulty,
                entry.timestamp.format("%Y-%m-%d")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn shopping_list(items: &[ShoppingItem]) -> String {
    if items.is_empty() {
        return "Your shopping list is empty.".to_string();
    }
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let mark = if item.checked { "x" } else { " " };
            if item.amount.is_empty() {
                format!("{:>3}. [{}] {}", i + 1, mark, item.name)
            } else {
                format!("{:>3}. [{}] {} ({})", i + 1, mark, item.name, item.amount)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pantry, filters and generation progress.
pub fn kitchen_bar(state: &AppState) -> String {
    let pantry = if state.pantry.is_empty() {
        "(empty)".to_string()
    } else {
        state.pantry.join(", ")
    };
    let diet = if state.dietary_restrictions.is_empty() {
        "none".to_string()
    } else {
        state.dietary_restrictions.join(", ")
    };

    let mut lines = vec![
        format!("Pantry: {}", pantry),
        format!("Diet: {} | Time: {}", diet, state.cooking_time),
    ];
    match state.phase {
        Phase::RecipePending(_) => lines.push("The chef is writing your recipe...".to_string()),
        Phase::ImagePending(_) => lines.push("Plating up a photo...".to_string()),
        _ => {}
    }
    if let Some(error) = &state.error {
        lines.push(format!("! {}", error));
    }
    lines.join("\n")
}

/// Full screen for the current view.
pub fn view(state: &AppState) -> String {
    match state.view {
        View::Home => {
            let mut out = kitchen_bar(state);
            if let Some(current) = &state.recipe {
                out.push_str("\n\n");
                out.push_str(&recipe(current, state.image_url.as_deref()));
                if state.is_current_recipe_saved() {
                    out.push_str("\n\n(saved in your cookbook)");
                }
            }
            out
        }
        View::Saved => format!("Cookbook\n\n{}", cookbook(&state.saved_recipes)),
        View::Shopping => format!("Shopping list\n\n{}", shopping_list(&state.shopping_list)),
    }
}

pub fn help() -> String {
    [
        "Commands:",
        "  add <ingredient>[, <ingredient>...]   add to the pantry",
        "  remove <ingredient>                   remove from the pantry",
        "  diet <tag>                            toggle a dietary restriction",
        "  time <bucket>                         quick | 30 | 60 | show-stopper",
        "  generate                              ask the chef for a recipe",
        "  save                                  save the recipe to your cookbook",
        "  shop-all                              add its ingredients to the shopping list",
        "  view <home|saved|shopping>            switch screens",
        "  open <n> / delete <n>                 open or delete a cookbook entry",
        "  item <name>                           add a shopping list item",
        "  check <n> / drop <n>                  tick or remove a shopping list item",
        "  clear                                 empty the shopping list",
        "  dismiss                               hide the error message",
        "  help | quit",
    ]
    .join("\n")
        + &format!("\nDietary tags: {}", DIETARY_OPTIONS.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use littlechef_core::ai::{sample_image_uri, sample_recipe};

    #[test]
    fn test_recipe_lists_steps_in_order() {
        let text = recipe(&sample_recipe(), None);
        let first = text.find("  1. ").unwrap();
        let second = text.find("  2. ").unwrap();
        assert!(first < second);
        assert!(text.contains("Chef's tip: Rest the batter"));
        assert!(!text.contains("Photo:"));
    }

    #[test]
    fn test_image_summary_hides_payload() {
        let summary = image_summary(&sample_image_uri());
        assert!(summary.starts_with("image/png image"));
        assert!(!summary.contains("base64"));
    }

    #[test]
    fn test_shopping_list_marks_checked() {
        let mut items = vec![ShoppingItem::new("milk", ""), ShoppingItem::new("egg", "2")];
        items[1].checked = true;
        assert_eq!(shopping_list(&items), "  1. [ ] milk\n  2. [x] egg (2)");
        assert_eq!(shopping_list(&[]), "Your shopping list is empty.");
    }

    #[test]
    fn test_kitchen_bar_shows_error() {
        let state = AppState {
            pantry: vec!["egg".to_string()],
            error: Some("Please add at least one ingredient!".to_string()),
            ..Default::default()
        };
        let bar = kitchen_bar(&state);
        assert!(bar.contains("Pantry: egg"));
        assert!(bar.contains("Time: 30 mins"));
        assert!(bar.contains("! Please add"));
    }
}
