//! Application state machine.
//!
//! All state lives in one [`AppState`] value. Front-end intents and generation
//! results arrive as [`Msg`]s, and [`update`] turns `(state, msg)` into the next
//! state plus a list of [`Effect`]s for the runtime to carry out. `update` does
//! no I/O, so every transition can be tested without a network or a terminal.

mod effect;
mod msg;
mod update;

pub use effect::{Confirmation, Effect, Notice};
pub use msg::Msg;
pub use update::{update, RECIPE_FAILURE_MESSAGE};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{CookingTime, Recipe, SavedRecipe, ShoppingItem, View};

/// Identifies one generation cycle. Completions carrying an older token are stale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CycleToken(pub u64);

impl CycleToken {
    pub fn next(self) -> Self {
        CycleToken(self.0 + 1)
    }
}

impl fmt::Display for CycleToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where the current generation cycle stands.
///
/// ```text
/// Idle -> RecipePending -> ImagePending -> Ready
///                       \              \-> ImageFailed
///                        \-> RecipeFailed
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    RecipePending(CycleToken),
    ImagePending(CycleToken),
    Ready(CycleToken),
    RecipeFailed(CycleToken),
    ImageFailed(CycleToken),
}

impl Phase {
    pub fn token(&self) -> Option<CycleToken> {
        match *self {
            Phase::Idle => None,
            Phase::RecipePending(t)
            | Phase::ImagePending(t)
            | Phase::Ready(t)
            | Phase::RecipeFailed(t)
            | Phase::ImageFailed(t) => Some(t),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, Phase::RecipePending(_) | Phase::ImagePending(_))
    }
}

/// Everything the application knows at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    /// Distinct, trimmed, lowercase ingredient names in insertion order.
    pub pantry: Vec<String>,
    pub dietary_restrictions: Vec<String>,
    pub cooking_time: CookingTime,
    pub recipe: Option<Recipe>,
    /// `data:` URI of the image for `recipe`.
    pub image_url: Option<String>,
    pub phase: Phase,
    /// Last token handed out; the next cycle gets `last_token.next()`.
    pub last_token: CycleToken,
    pub error: Option<String>,
    /// Most recent first.
    pub saved_recipes: Vec<SavedRecipe>,
    pub shopping_list: Vec<ShoppingItem>,
    pub view: View,
}

impl AppState {
    /// Fresh state around previously persisted collections.
    pub fn with_collections(
        saved_recipes: Vec<SavedRecipe>,
        shopping_list: Vec<ShoppingItem>,
    ) -> Self {
        Self {
            saved_recipes,
            shopping_list,
            ..Default::default()
        }
    }

    /// Recipe-busy flag.
    pub fn is_generating_recipe(&self) -> bool {
        matches!(self.phase, Phase::RecipePending(_))
    }

    /// Image-busy flag.
    pub fn is_generating_image(&self) -> bool {
        matches!(self.phase, Phase::ImagePending(_))
    }

    /// Whether the displayed recipe already has a cookbook entry with its title.
    pub fn is_current_recipe_saved(&self) -> bool {
        self.recipe
            .as_ref()
            .is_some_and(|recipe| self.is_title_saved(&recipe.title))
    }

    pub fn is_title_saved(&self, title: &str) -> bool {
        self.saved_recipes.iter().any(|s| s.recipe.title == title)
    }

    /// Token of the cycle whose results are still wanted.
    pub fn current_token(&self) -> Option<CycleToken> {
        self.phase.token()
    }
}
