use std::fmt;

use super::CycleToken;
use crate::ai::RecipeRequest;
use crate::store::Slot;

/// Work requested by a transition. The runtime performs it; `update` never does.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    RequestRecipe {
        token: CycleToken,
        request: RecipeRequest,
    },
    RequestImage {
        token: CycleToken,
        title: String,
        description: String,
    },
    /// The collection behind this slot changed and must be written out.
    Persist(Slot),
    /// The front end must ask the user before going on.
    Confirm(Confirmation),
    /// The front end should tell the user something happened.
    Notify(Notice),
}

impl Effect {
    /// Whether the front end, rather than the runtime, handles this effect.
    pub fn is_for_front_end(&self) -> bool {
        matches!(self, Effect::Confirm(_) | Effect::Notify(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// Answer with `Msg::ConfirmClearShoppingList`.
    ClearShoppingList,
}

impl Confirmation {
    pub fn question(&self) -> &'static str {
        match self {
            Confirmation::ClearShoppingList => "Are you sure you want to clear your entire list?",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    IngredientsAdded { count: usize },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::IngredientsAdded { count } => {
                write!(f, "Ingredients added to your shopping list! ({} items)", count)
            }
        }
    }
}
