pub mod ai;
pub mod error;
pub mod image;
pub mod kitchen;
pub mod state;
pub mod store;
pub mod types;

pub use ai::{
    create_client, create_client_from_env, AiConfig, FakeGenerationClient, GeminiClient,
    GenerationClient, GenerationClientError, RecipeRequest,
};
pub use error::{GenerationError, StoreError, ValidationError};
pub use image::{inline_data_to_uri, validate_image, MAX_FILE_SIZE};
pub use kitchen::Kitchen;
pub use state::{update, AppState, Confirmation, CycleToken, Effect, Msg, Notice, Phase};
pub use store::{FileStore, KeyValueStore, MemoryStore, Slot, StoreConfig};
pub use types::{
    CookingTime, Difficulty, Ingredient, NutritionalInfo, Recipe, SavedRecipe, ShoppingItem, Step,
    View, DIETARY_OPTIONS,
};
