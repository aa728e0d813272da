mod render;
mod session;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use littlechef_core::{
    create_client_from_env, CookingTime, Effect, FakeGenerationClient, FileStore, Kitchen,
    KeyValueStore, Msg, StoreConfig,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "littlechef")]
#[command(about = "Turn what's in your pantry into a recipe", long_about = None)]
struct Cli {
    /// Directory holding the cookbook and shopping list (default: ~/.littlechef)
    #[arg(long, global = true, env = "CHEF_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session (the default)
    Session,
    /// Generate one recipe and print it
    Generate {
        /// Ingredient on hand (repeatable)
        #[arg(short, long = "ingredient", required = true)]
        ingredients: Vec<String>,
        /// Dietary restriction, e.g. Vegan (repeatable)
        #[arg(long = "diet", value_parser = parse_diet)]
        diets: Vec<String>,
        /// Cooking time: quick, 30, 60 or show-stopper
        #[arg(long, value_parser = parse_time, default_value = "30")]
        time: CookingTime,
        /// Save the recipe to the cookbook
        #[arg(long)]
        save: bool,
        /// Add the ingredients to the shopping list
        #[arg(long)]
        shop: bool,
    },
    /// Browse saved recipes
    Cookbook {
        #[command(subcommand)]
        action: Option<CookbookAction>,
    },
    /// Manage the shopping list
    Shopping {
        #[command(subcommand)]
        action: Option<ShoppingAction>,
    },
}

#[derive(Subcommand)]
enum CookbookAction {
    /// List saved recipes, most recent first
    List,
    /// Print a saved recipe
    Show { n: usize },
    /// Delete a saved recipe
    Delete { n: usize },
}

#[derive(Subcommand)]
enum ShoppingAction {
    /// List items
    List,
    /// Add an item by hand
    Add { name: Vec<String> },
    /// Tick or untick an item
    Check { n: usize },
    /// Remove an item
    Remove { n: usize },
    /// Remove every item
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

fn parse_diet(s: &str) -> Result<String, String> {
    session::parse_dietary(s)
        .map(str::to_string)
        .ok_or_else(|| format!("unknown dietary tag '{}'", s))
}

fn parse_time(s: &str) -> Result<CookingTime, String> {
    session::parse_cooking_time(s).ok_or_else(|| format!("unknown cooking time '{}'", s))
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn open_store(data_dir: Option<PathBuf>) -> Arc<dyn KeyValueStore> {
    let config = match data_dir {
        Some(data_dir) => StoreConfig { data_dir },
        None => StoreConfig::from_env(),
    };
    tracing::debug!(data_dir = %config.data_dir.display(), "Opening store");
    Arc::new(FileStore::from_config(&config))
}

fn open_kitchen(store: Arc<dyn KeyValueStore>) -> Result<Kitchen> {
    let client = create_client_from_env().context("Failed to set up the generation client")?;
    Ok(Kitchen::open(client, store))
}

/// Kitchen for commands that only touch the stored collections.
fn open_offline_kitchen(store: Arc<dyn KeyValueStore>) -> Kitchen {
    Kitchen::open(Arc::new(FakeGenerationClient::default()), store)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let store = open_store(cli.data_dir);

    match cli.command.unwrap_or(Commands::Session) {
        Commands::Session => {
            session::run(open_kitchen(store)?).await?;
        }
        Commands::Generate {
            ingredients,
            diets,
            time,
            save,
            shop,
        } => {
            let kitchen = open_kitchen(store)?;
            generate(kitchen, ingredients, diets, time, save, shop).await?;
        }
        Commands::Cookbook { action } => {
            cookbook(open_offline_kitchen(store), action.unwrap_or(CookbookAction::List))?;
        }
        Commands::Shopping { action } => {
            shopping(open_offline_kitchen(store), action.unwrap_or(ShoppingAction::List))?;
        }
    }

    Ok(())
}

async fn generate(
    mut kitchen: Kitchen,
    ingredients: Vec<String>,
    diets: Vec<String>,
    time: CookingTime,
    save: bool,
    shop: bool,
) -> Result<()> {
    for ingredient in ingredients {
        kitchen.dispatch(Msg::AddIngredient(ingredient));
    }
    for diet in diets {
        if !kitchen.state().dietary_restrictions.contains(&diet) {
            kitchen.dispatch(Msg::ToggleDietary(diet));
        }
    }
    kitchen.dispatch(Msg::SetCookingTime(time));

    eprintln!("The chef is cooking...");
    kitchen.dispatch(Msg::Generate);
    kitchen.settle().await;

    let state = kitchen.state();
    if let Some(error) = &state.error {
        bail!("{}", error);
    }
    let recipe = state.recipe.as_ref().context("No recipe was generated")?;
    println!("{}", render::recipe(recipe, state.image_url.as_deref()));

    if save {
        println!();
        println!("{}", save_current(&mut kitchen));
    }
    if shop {
        for effect in kitchen.dispatch(Msg::AddAllToShoppingList) {
            if let Effect::Notify(notice) = effect {
                println!("{}", notice);
            }
        }
    }
    Ok(())
}

/// Save the displayed recipe and describe what happened.
fn save_current(kitchen: &mut Kitchen) -> &'static str {
    if kitchen.state().is_current_recipe_saved() {
        return "Already in your cookbook.";
    }
    kitchen.dispatch(Msg::SaveCurrentRecipe);
    if kitchen.state().is_current_recipe_saved() {
        "Saved to your cookbook."
    } else {
        "Nothing to save."
    }
}

fn saved_id(kitchen: &Kitchen, n: usize) -> Result<Uuid> {
    kitchen
        .state()
        .saved_recipes
        .get(n.wrapping_sub(1))
        .map(|s| s.id)
        .with_context(|| format!("No cookbook entry {}", n))
}

fn item_id(kitchen: &Kitchen, n: usize) -> Result<Uuid> {
    kitchen
        .state()
        .shopping_list
        .get(n.wrapping_sub(1))
        .map(|i| i.id)
        .with_context(|| format!("No shopping list item {}", n))
}

fn cookbook(mut kitchen: Kitchen, action: CookbookAction) -> Result<()> {
    match action {
        CookbookAction::List => println!("{}", render::cookbook(&kitchen.state().saved_recipes)),
        CookbookAction::Show { n } => {
            let id = saved_id(&kitchen, n)?;
            kitchen.dispatch(Msg::LoadSavedRecipe(id));
            let state = kitchen.state();
            let recipe = state.recipe.as_ref().context("Saved recipe could not be loaded")?;
            println!("{}", render::recipe(recipe, state.image_url.as_deref()));
        }
        CookbookAction::Delete { n } => {
            let id = saved_id(&kitchen, n)?;
            kitchen.dispatch(Msg::DeleteSavedRecipe(id));
            println!("{}", render::cookbook(&kitchen.state().saved_recipes));
        }
    }
    Ok(())
}

fn shopping(mut kitchen: Kitchen, action: ShoppingAction) -> Result<()> {
    match action {
        ShoppingAction::List => {}
        ShoppingAction::Add { name } => {
            let name = name.join(" ");
            if name.trim().is_empty() {
                bail!("Item name cannot be empty");
            }
            kitchen.dispatch(Msg::AddManualShoppingItem(name));
        }
        ShoppingAction::Check { n } => {
            let id = item_id(&kitchen, n)?;
            kitchen.dispatch(Msg::ToggleShoppingItem(id));
        }
        ShoppingAction::Remove { n } => {
            let id = item_id(&kitchen, n)?;
            kitchen.dispatch(Msg::RemoveShoppingItem(id));
        }
        ShoppingAction::Clear { yes } => {
            for effect in kitchen.dispatch(Msg::ClearShoppingList) {
                if let Effect::Confirm(confirmation) = effect {
                    if yes || confirm(confirmation.question())? {
                        kitchen.dispatch(Msg::ConfirmClearShoppingList);
                    }
                }
            }
        }
    }
    println!("{}", render::shopping_list(&kitchen.state().shopping_list));
    Ok(())
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use littlechef_core::MemoryStore;

    #[tokio::test]
    async fn test_save_current_reports_duplicates() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut kitchen = open_offline_kitchen(store);
        assert_eq!(save_current(&mut kitchen), "Nothing to save.");

        kitchen.dispatch(Msg::AddIngredient("egg".to_string()));
        kitchen.dispatch(Msg::Generate);
        kitchen.settle().await;

        assert_eq!(save_current(&mut kitchen), "Saved to your cookbook.");
        assert_eq!(save_current(&mut kitchen), "Already in your cookbook.");
        assert_eq!(kitchen.state().saved_recipes.len(), 1);
    }
}
