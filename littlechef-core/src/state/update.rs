use uuid::Uuid;

use super::{AppState, Confirmation, CycleToken, Effect, Msg, Notice, Phase};
use crate::ai::RecipeRequest;
use crate::error::{GenerationError, ValidationError};
use crate::store::Slot;
use crate::types::{Recipe, SavedRecipe, ShoppingItem, View};

/// Shown whenever recipe generation fails; the cause is only logged.
pub const RECIPE_FAILURE_MESSAGE: &str = "The chef is busy... please try again in a moment.";

/// Apply one message to the state.
///
/// Returns the next state and the effects the runtime must perform. The input
/// state is consumed, so no caller can observe a half-applied transition.
pub fn update(state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let mut state = state;
    let mut effects = Vec::new();

    match msg {
        Msg::AddIngredient(raw) => add_ingredient(&mut state, &raw),
        Msg::RemoveIngredient(name) => state.pantry.retain(|i| *i != name),
        Msg::ToggleDietary(tag) => toggle_dietary(&mut state, &tag),
        Msg::SetCookingTime(bucket) => state.cooking_time = bucket,
        Msg::Generate => generate(&mut state, &mut effects),
        Msg::SaveCurrentRecipe => save_current_recipe(&mut state, &mut effects),
        Msg::AddAllToShoppingList => add_all_to_shopping_list(&mut state, &mut effects),
        Msg::AddManualShoppingItem(name) => add_manual_item(&mut state, &name, &mut effects),
        Msg::ToggleShoppingItem(id) => toggle_shopping_item(&mut state, id, &mut effects),
        Msg::RemoveShoppingItem(id) => remove_shopping_item(&mut state, id, &mut effects),
        Msg::ClearShoppingList => {
            effects.push(Effect::Confirm(Confirmation::ClearShoppingList));
        }
        Msg::ConfirmClearShoppingList => {
            if !state.shopping_list.is_empty() {
                state.shopping_list.clear();
                effects.push(Effect::Persist(Slot::ShoppingList));
            }
        }
        Msg::DeleteSavedRecipe(id) => {
            let before = state.saved_recipes.len();
            state.saved_recipes.retain(|s| s.id != id);
            if state.saved_recipes.len() != before {
                effects.push(Effect::Persist(Slot::Cookbook));
            }
        }
        Msg::LoadSavedRecipe(id) => load_saved_recipe(&mut state, id),
        Msg::SetView(view) => state.view = view,
        Msg::DismissError => state.error = None,
        Msg::RecipeGenerated { token, result } => {
            recipe_generated(&mut state, token, result, &mut effects)
        }
        Msg::ImageGenerated { token, result } => image_generated(&mut state, token, result),
    }

    (state, effects)
}

fn add_ingredient(state: &mut AppState, raw: &str) {
    let normalized = raw.trim().to_lowercase();
    if normalized.is_empty() || state.pantry.contains(&normalized) {
        return;
    }
    state.pantry.push(normalized);
}

fn toggle_dietary(state: &mut AppState, tag: &str) {
    let tag = tag.trim();
    if tag.is_empty() {
        return;
    }
    if let Some(pos) = state.dietary_restrictions.iter().position(|t| t == tag) {
        state.dietary_restrictions.remove(pos);
    } else {
        state.dietary_restrictions.push(tag.to_string());
    }
}

fn generate(state: &mut AppState, effects: &mut Vec<Effect>) {
    if state.pantry.is_empty() {
        state.error = Some(ValidationError::EmptyPantry.to_string());
        return;
    }

    let token = state.last_token.next();
    state.last_token = token;
    state.phase = Phase::RecipePending(token);
    state.error = None;
    state.recipe = None;
    state.image_url = None;
    state.view = View::Home;

    tracing::info!(
        token = %token,
        ingredients = state.pantry.len(),
        restrictions = state.dietary_restrictions.len(),
        cooking_time = %state.cooking_time,
        "Starting generation cycle"
    );

    effects.push(Effect::RequestRecipe {
        token,
        request: RecipeRequest {
            ingredients: state.pantry.clone(),
            restrictions: state.dietary_restrictions.clone(),
            cooking_time: state.cooking_time,
        },
    });
}

fn recipe_generated(
    state: &mut AppState,
    token: CycleToken,
    result: Result<Recipe, GenerationError>,
    effects: &mut Vec<Effect>,
) {
    if state.phase != Phase::RecipePending(token) {
        tracing::debug!(token = %token, phase = ?state.phase, "Discarding stale recipe result");
        return;
    }

    match result {
        Ok(recipe) => {
            tracing::info!(token = %token, title = %recipe.title, "Recipe generated");
            effects.push(Effect::RequestImage {
                token,
                title: recipe.title.clone(),
                description: recipe.description.clone(),
            });
            state.recipe = Some(recipe);
            state.phase = Phase::ImagePending(token);
        }
        Err(e) => {
            tracing::warn!(token = %token, error = %e, "Recipe generation failed");
            state.phase = Phase::RecipeFailed(token);
            state.error = Some(RECIPE_FAILURE_MESSAGE.to_string());
        }
    }
}

fn image_generated(
    state: &mut AppState,
    token: CycleToken,
    result: Result<String, GenerationError>,
) {
    if state.phase != Phase::ImagePending(token) {
        tracing::debug!(token = %token, phase = ?state.phase, "Discarding stale image result");
        return;
    }

    match result {
        Ok(image_url) => {
            tracing::info!(token = %token, bytes = image_url.len(), "Image generated");
            state.image_url = Some(image_url);
            state.phase = Phase::Ready(token);
        }
        Err(e) => {
            tracing::warn!(
                token = %token,
                error = %e,
                "Image generation failed, keeping recipe without image"
            );
            state.phase = Phase::ImageFailed(token);
        }
    }
}

fn save_current_recipe(state: &mut AppState, effects: &mut Vec<Effect>) {
    let Some(recipe) = state.recipe.as_ref() else {
        return;
    };
    if state.is_title_saved(&recipe.title) {
        return;
    }

    let saved = SavedRecipe::new(recipe.clone(), state.image_url.clone());
    state.saved_recipes.insert(0, saved);
    effects.push(Effect::Persist(Slot::Cookbook));
}

fn add_all_to_shopping_list(state: &mut AppState, effects: &mut Vec<Effect>) {
    let Some(recipe) = state.recipe.as_ref() else {
        return;
    };

    let items: Vec<ShoppingItem> = recipe.ingredients.iter().map(ShoppingItem::from).collect();
    let count = items.len();
    state.shopping_list.extend(items);

    if count > 0 {
        effects.push(Effect::Persist(Slot::ShoppingList));
    }
    effects.push(Effect::Notify(Notice::IngredientsAdded { count }));
}

fn add_manual_item(state: &mut AppState, name: &str, effects: &mut Vec<Effect>) {
    let name = name.trim();
    if name.is_empty() {
        tracing::debug!("{}", ValidationError::EmptyItemName);
        return;
    }

    state.shopping_list.insert(0, ShoppingItem::new(name, ""));
    effects.push(Effect::Persist(Slot::ShoppingList));
}

fn toggle_shopping_item(state: &mut AppState, id: Uuid, effects: &mut Vec<Effect>) {
    if let Some(item) = state.shopping_list.iter_mut().find(|i| i.id == id) {
        item.checked = !item.checked;
        effects.push(Effect::Persist(Slot::ShoppingList));
    }
}

fn remove_shopping_item(state: &mut AppState, id: Uuid, effects: &mut Vec<Effect>) {
    let before = state.shopping_list.len();
    state.shopping_list.retain(|i| i.id != id);
    if state.shopping_list.len() != before {
        effects.push(Effect::Persist(Slot::ShoppingList));
    }
}

fn load_saved_recipe(state: &mut AppState, id: Uuid) {
    let Some(saved) = state.saved_recipes.iter().find(|s| s.id == id) else {
        return;
    };

    state.recipe = Some(saved.recipe.clone());
    state.image_url = saved.image_url.clone();
    state.view = View::Home;

    // Results of an in-flight cycle must not overwrite the loaded pair.
    if state.phase.is_in_flight() {
        tracing::debug!(phase = ?state.phase, "Loading saved recipe supersedes generation cycle");
        state.last_token = state.last_token.next();
        state.phase = Phase::Idle;
    }
}
