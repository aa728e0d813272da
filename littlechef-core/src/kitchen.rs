//! Runtime driver around the state machine.
//!
//! The [`Kitchen`] owns the [`AppState`], the generation client and the store.
//! It is the only writer of the state: messages go through [`update`], and the
//! returned effects are carried out here. Generation requests run as tokio
//! tasks and report back over a channel, so their completions are applied one
//! at a time in arrival order.

use std::future::Future;
use std::mem;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::Instrument;

use crate::ai::GenerationClient;
use crate::error::GenerationError;
use crate::state::{update, AppState, Effect, Msg};
use crate::store::{self, KeyValueStore, Slot};
use crate::types::{SavedRecipe, ShoppingItem};

pub struct Kitchen {
    state: AppState,
    client: Arc<dyn GenerationClient>,
    store: Arc<dyn KeyValueStore>,
    tx: mpsc::UnboundedSender<Msg>,
    rx: mpsc::UnboundedReceiver<Msg>,
    in_flight: usize,
}

impl Kitchen {
    /// Start a kitchen, loading the cookbook and shopping list from `store`.
    pub fn open(client: Arc<dyn GenerationClient>, store: Arc<dyn KeyValueStore>) -> Self {
        let saved_recipes: Vec<SavedRecipe> = store::load(store.as_ref(), Slot::Cookbook);
        let shopping_list: Vec<ShoppingItem> = store::load(store.as_ref(), Slot::ShoppingList);

        tracing::debug!(
            provider = client.provider_name(),
            model = client.model_name(),
            saved = saved_recipes.len(),
            shopping = shopping_list.len(),
            "Kitchen opened"
        );

        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state: AppState::with_collections(saved_recipes, shopping_list),
            client,
            store,
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn client(&self) -> &Arc<dyn GenerationClient> {
        &self.client
    }

    /// Number of generation requests whose completion has not been applied yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Apply a message and carry out its effects.
    ///
    /// Returns the effects only the front end can handle (confirmations and
    /// notices), in the order they were produced.
    pub fn dispatch(&mut self, msg: Msg) -> Vec<Effect> {
        let (next, effects) = update(mem::take(&mut self.state), msg);
        self.state = next;

        let mut front_end = Vec::new();
        for effect in effects {
            if effect.is_for_front_end() {
                front_end.push(effect);
            } else {
                self.run(effect);
            }
        }
        front_end
    }

    /// Wait for one generation request to finish and apply its result.
    ///
    /// Returns `false` immediately when nothing is in flight.
    pub async fn next_completion(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.rx.recv().await {
            Some(msg) => {
                self.complete(msg);
                true
            }
            None => false,
        }
    }

    /// Apply every completion that has already arrived, without waiting.
    ///
    /// Returns how many were applied.
    pub fn drain_ready(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(msg) = self.rx.try_recv() {
            self.complete(msg);
            applied += 1;
        }
        applied
    }

    /// Apply completions until no request is left in flight.
    ///
    /// A recipe completion may start an image request, so this waits for the
    /// whole cycle.
    pub async fn settle(&mut self) {
        while self.next_completion().await {}
    }

    fn complete(&mut self, msg: Msg) {
        self.in_flight = self.in_flight.saturating_sub(1);
        // Completions only ever yield runtime effects.
        let front_end = self.dispatch(msg);
        debug_assert!(front_end.is_empty());
    }

    fn run(&mut self, effect: Effect) {
        match effect {
            Effect::RequestRecipe { token, request } => {
                let client = Arc::clone(&self.client);
                let span = tracing::debug_span!("recipe_request", token = %token);
                self.spawn_request(
                    span,
                    async move {
                        tracing::debug!(ingredients = ?request.ingredients, "Requesting recipe");
                        client.request_recipe(&request).await
                    },
                    move |result| Msg::RecipeGenerated { token, result },
                );
            }
            Effect::RequestImage {
                token,
                title,
                description,
            } => {
                let client = Arc::clone(&self.client);
                let span = tracing::debug_span!("image_request", token = %token);
                self.spawn_request(
                    span,
                    async move {
                        tracing::debug!(title = %title, "Requesting image");
                        client.request_image(&title, &description).await
                    },
                    move |result| Msg::ImageGenerated { token, result },
                );
            }
            Effect::Persist(slot) => self.persist(slot),
            Effect::Confirm(_) | Effect::Notify(_) => {}
        }
    }

    /// Run one generation request on its own task and report its result.
    ///
    /// Every request reports exactly once: a request task that panics or is
    /// cancelled comes back as `GenerationError::Failed`.
    fn spawn_request<T, F, M>(&mut self, span: tracing::Span, request: F, into_msg: M)
    where
        T: Send + 'static,
        F: Future<Output = Result<T, GenerationError>> + Send + 'static,
        M: FnOnce(Result<T, GenerationError>) -> Msg + Send + 'static,
    {
        let tx = self.tx.clone();
        self.in_flight += 1;

        let handle = tokio::spawn(request.instrument(span.clone()));
        tokio::spawn(
            async move {
                let result = match handle.await {
                    Ok(result) => result,
                    Err(e) => {
                        tracing::error!(error = %e, "Generation request task failed");
                        Err(GenerationError::Failed(format!("Request task failed: {}", e)))
                    }
                };
                let _ = tx.send(into_msg(result));
            }
            .instrument(span),
        );
    }

    fn persist(&self, slot: Slot) {
        let result = match slot {
            Slot::Cookbook => store::save(self.store.as_ref(), slot, &self.state.saved_recipes),
            Slot::ShoppingList => store::save(self.store.as_ref(), slot, &self.state.shopping_list),
        };
        if let Err(e) = result {
            tracing::warn!(slot = %slot, error = %e, "Failed to save collection");
        }
    }
}

impl std::fmt::Debug for Kitchen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kitchen")
            .field("phase", &self.state.phase)
            .field("client", &self.client)
            .field("store", &self.store)
            .field("in_flight", &self.in_flight)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::ai::{sample_recipe, FakeGenerationClient, RecipeRequest};
    use crate::state::{Confirmation, Notice, Phase, RECIPE_FAILURE_MESSAGE};
    use crate::store::MemoryStore;
    use crate::types::Recipe;

    /// Client whose request tasks die instead of answering.
    #[derive(Debug)]
    struct PanickingClient {
        panic_on_recipe: bool,
    }

    #[async_trait]
    impl GenerationClient for PanickingClient {
        async fn request_recipe(
            &self,
            _request: &RecipeRequest,
        ) -> Result<Recipe, GenerationError> {
            if self.panic_on_recipe {
                panic!("recipe request blew up");
            }
            Ok(sample_recipe())
        }

        async fn request_image(
            &self,
            _title: &str,
            _description: &str,
        ) -> Result<String, GenerationError> {
            panic!("image request blew up");
        }

        fn provider_name(&self) -> &'static str {
            "panicking"
        }

        fn model_name(&self) -> &str {
            "none"
        }
    }

    async fn settle_within(kitchen: &mut Kitchen) {
        tokio::time::timeout(Duration::from_secs(5), kitchen.settle())
            .await
            .expect("kitchen did not settle");
    }

    fn kitchen() -> (Kitchen, Arc<FakeGenerationClient>, Arc<MemoryStore>) {
        let client = Arc::new(FakeGenerationClient::with_sample_recipe());
        let store = Arc::new(MemoryStore::new());
        let kitchen = Kitchen::open(client.clone(), store.clone());
        (kitchen, client, store)
    }

    #[tokio::test]
    async fn test_settle_runs_full_cycle() {
        let (mut kitchen, client, _) = kitchen();
        kitchen.dispatch(Msg::AddIngredient("egg".to_string()));
        kitchen.dispatch(Msg::Generate);
        assert_eq!(kitchen.in_flight(), 1);
        assert!(kitchen.state().is_generating_recipe());

        kitchen.settle().await;

        assert_eq!(kitchen.in_flight(), 0);
        assert!(kitchen.state().recipe.is_some());
        assert!(kitchen.state().image_url.is_some());
        assert_eq!(client.recipe_calls(), 1);
        assert_eq!(client.image_calls(), 1);
    }

    #[tokio::test]
    async fn test_next_completion_without_work() {
        let (mut kitchen, _, _) = kitchen();
        assert!(!kitchen.next_completion().await);
        assert_eq!(kitchen.drain_ready(), 0);
    }

    #[tokio::test]
    async fn test_front_end_effects_are_returned() {
        let (mut kitchen, _, store) = kitchen();
        kitchen.dispatch(Msg::AddManualShoppingItem("milk".to_string()));
        assert!(!store.is_empty());

        let effects = kitchen.dispatch(Msg::ClearShoppingList);
        assert_eq!(effects, vec![Effect::Confirm(Confirmation::ClearShoppingList)]);
        assert_eq!(kitchen.state().shopping_list.len(), 1);

        kitchen.dispatch(Msg::AddIngredient("egg".to_string()));
        kitchen.dispatch(Msg::Generate);
        kitchen.settle().await;
        let effects = kitchen.dispatch(Msg::AddAllToShoppingList);
        assert_eq!(
            effects,
            vec![Effect::Notify(Notice::IngredientsAdded { count: 4 })]
        );
    }

    #[tokio::test]
    async fn test_panicking_recipe_request_still_completes() {
        let client = Arc::new(PanickingClient {
            panic_on_recipe: true,
        });
        let mut kitchen = Kitchen::open(client, Arc::new(MemoryStore::new()));
        kitchen.dispatch(Msg::AddIngredient("egg".to_string()));
        kitchen.dispatch(Msg::Generate);
        let token = kitchen.state().current_token().unwrap();

        settle_within(&mut kitchen).await;

        assert_eq!(kitchen.in_flight(), 0);
        assert!(!kitchen.state().is_generating_recipe());
        assert_eq!(kitchen.state().phase, Phase::RecipeFailed(token));
        assert_eq!(kitchen.state().error.as_deref(), Some(RECIPE_FAILURE_MESSAGE));
    }

    #[tokio::test]
    async fn test_panicking_image_request_keeps_recipe() {
        let client = Arc::new(PanickingClient {
            panic_on_recipe: false,
        });
        let mut kitchen = Kitchen::open(client, Arc::new(MemoryStore::new()));
        kitchen.dispatch(Msg::AddIngredient("egg".to_string()));
        kitchen.dispatch(Msg::Generate);
        let token = kitchen.state().current_token().unwrap();

        settle_within(&mut kitchen).await;

        assert_eq!(kitchen.in_flight(), 0);
        assert_eq!(kitchen.state().phase, Phase::ImageFailed(token));
        assert_eq!(kitchen.state().recipe, Some(sample_recipe()));
        assert!(kitchen.state().image_url.is_none());
        assert!(kitchen.state().error.is_none());
    }
}
