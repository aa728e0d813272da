use uuid::Uuid;

use super::CycleToken;
use crate::error::GenerationError;
use crate::types::{CookingTime, Recipe, View};

/// Everything that can change the application state.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User typed an ingredient into the pantry box.
    AddIngredient(String),
    /// User removed an ingredient chip.
    RemoveIngredient(String),
    /// User toggled a dietary tag.
    ToggleDietary(String),
    SetCookingTime(CookingTime),
    /// User asked for a new recipe.
    Generate,
    SaveCurrentRecipe,
    /// Copy every ingredient of the displayed recipe into the shopping list.
    AddAllToShoppingList,
    AddManualShoppingItem(String),
    ToggleShoppingItem(Uuid),
    RemoveShoppingItem(Uuid),
    /// User asked to empty the shopping list; answered with a confirmation request.
    ClearShoppingList,
    /// User confirmed emptying the shopping list.
    ConfirmClearShoppingList,
    DeleteSavedRecipe(Uuid),
    LoadSavedRecipe(Uuid),
    SetView(View),
    /// User closed the error banner.
    DismissError,
    /// The recipe request of a cycle finished.
    RecipeGenerated {
        token: CycleToken,
        result: Result<Recipe, GenerationError>,
    },
    /// The image request of a cycle finished.
    ImageGenerated {
        token: CycleToken,
        result: Result<String, GenerationError>,
    },
}
