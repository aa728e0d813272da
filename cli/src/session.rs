//! Interactive terminal session.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use littlechef_core::{
    Confirmation, CookingTime, Effect, Kitchen, Msg, Phase, View, DIETARY_OPTIONS,
};
use tokio::sync::mpsc;

use crate::render;

/// One line of user input, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(Vec<String>),
    Remove(String),
    Diet(String),
    Time(CookingTime),
    Generate,
    Save,
    ShopAll,
    View(View),
    Open(usize),
    Delete(usize),
    Item(String),
    Check(usize),
    Drop(usize),
    Clear,
    Dismiss,
    Help,
    Quit,
}

/// Parse a cooking-time bucket from its label or a short alias.
pub fn parse_cooking_time(s: &str) -> Option<CookingTime> {
    match s.trim().to_lowercase().as_str() {
        "quick" | "15" => Some(CookingTime::Quick),
        "30" => Some(CookingTime::ThirtyMinutes),
        "60" | "1h" | "hour" => Some(CookingTime::OneHour),
        "show" | "show-stopper" | "showstopper" => Some(CookingTime::ShowStopper),
        other => CookingTime::from_label(other),
    }
}

/// Resolve a dietary tag to its canonical spelling.
pub fn parse_dietary(s: &str) -> Option<&'static str> {
    let s = s.trim();
    DIETARY_OPTIONS
        .iter()
        .copied()
        .find(|tag| tag.eq_ignore_ascii_case(s))
}

fn parse_index(arg: &str) -> Result<usize, String> {
    match arg.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("Expected a list number, got '{}'", arg.trim())),
    }
}

fn require(arg: &str, usage: &str) -> Result<String, String> {
    let arg = arg.trim();
    if arg.is_empty() {
        Err(format!("Usage: {}", usage))
    } else {
        Ok(arg.to_string())
    }
}

impl Command {
    pub fn parse(line: &str) -> Result<Command, String> {
        let line = line.trim();
        let (word, arg) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

        match word.to_lowercase().as_str() {
            "add" => {
                let items: Vec<String> = arg
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
                if items.is_empty() {
                    return Err("Usage: add <ingredient>[, <ingredient>...]".to_string());
                }
                Ok(Command::Add(items))
            }
            "remove" => require(arg, "remove <ingredient>").map(Command::Remove),
            "diet" => {
                let tag = require(arg, "diet <tag>")?;
                parse_dietary(&tag)
                    .map(|t| Command::Diet(t.to_string()))
                    .ok_or_else(|| {
                        format!(
                            "Unknown tag '{}'. Choose from: {}",
                            tag,
                            DIETARY_OPTIONS.join(", ")
                        )
                    })
            }
            "time" => {
                let bucket = require(arg, "time <bucket>")?;
                parse_cooking_time(&bucket)
                    .map(Command::Time)
                    .ok_or_else(|| format!("Unknown cooking time '{}'", bucket))
            }
            "generate" | "go" => Ok(Command::Generate),
            "save" => Ok(Command::Save),
            "shop-all" => Ok(Command::ShopAll),
            "view" => {
                let name = require(arg, "view <home|saved|shopping>")?;
                View::from_str(&name)
                    .map(Command::View)
                    .ok_or_else(|| format!("Unknown view '{}'", name))
            }
            "open" => parse_index(arg).map(Command::Open),
            "delete" => parse_index(arg).map(Command::Delete),
            "item" => require(arg, "item <name>").map(Command::Item),
            "check" => parse_index(arg).map(Command::Check),
            "drop" => parse_index(arg).map(Command::Drop),
            "clear" => Ok(Command::Clear),
            "dismiss" => Ok(Command::Dismiss),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            "" => Err(String::new()),
            other => Err(format!("Unknown command '{}'. Type 'help' for a list.", other)),
        }
    }
}

/// Turn a command into the messages it stands for, resolving list numbers
/// against the current state.
fn messages(kitchen: &Kitchen, command: Command) -> Result<Vec<Msg>, String> {
    let state = kitchen.state();
    let saved_id = |n: usize| {
        state
            .saved_recipes
            .get(n - 1)
            .map(|s| s.id)
            .ok_or_else(|| format!("No cookbook entry {}", n))
    };
    let item_id = |n: usize| {
        state
            .shopping_list
            .get(n - 1)
            .map(|i| i.id)
            .ok_or_else(|| format!("No shopping list item {}", n))
    };

    let msgs = match command {
        Command::Add(items) => items.into_iter().map(Msg::AddIngredient).collect(),
        Command::Remove(name) => vec![Msg::RemoveIngredient(name.to_lowercase())],
        Command::Diet(tag) => vec![Msg::ToggleDietary(tag)],
        Command::Time(bucket) => vec![Msg::SetCookingTime(bucket)],
        Command::Generate => vec![Msg::Generate],
        Command::Save => vec![Msg::SaveCurrentRecipe],
        Command::ShopAll => vec![Msg::AddAllToShoppingList],
        Command::View(view) => vec![Msg::SetView(view)],
        Command::Open(n) => vec![Msg::LoadSavedRecipe(saved_id(n)?)],
        Command::Delete(n) => vec![Msg::DeleteSavedRecipe(saved_id(n)?)],
        Command::Item(name) => vec![Msg::AddManualShoppingItem(name)],
        Command::Check(n) => vec![Msg::ToggleShoppingItem(item_id(n)?)],
        Command::Drop(n) => vec![Msg::RemoveShoppingItem(item_id(n)?)],
        Command::Clear => vec![Msg::ClearShoppingList],
        Command::Dismiss => vec![Msg::DismissError],
        Command::Help | Command::Quit => vec![],
    };
    Ok(msgs)
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn prompt() -> Result<()> {
    print!("chef> ");
    io::stdout().flush()?;
    Ok(())
}

/// Read stdin on a blocking thread and forward lines until EOF.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel::<String>(1);
    tokio::task::spawn_blocking(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

pub async fn run(mut kitchen: Kitchen) -> Result<()> {
    println!("Welcome to LittleChef! Type 'help' for commands.");
    println!();
    println!("{}", render::view(kitchen.state()));
    prompt()?;

    let mut lines = spawn_stdin_reader();

    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else { break };
                match Command::parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(Command::Help) => println!("{}", render::help()),
                    Ok(command) => {
                        if let Err(message) = apply(&mut kitchen, command, &mut lines).await {
                            println!("{}", message);
                        }
                    }
                    Err(message) if message.is_empty() => {}
                    Err(message) => println!("{}", message),
                }
                prompt()?;
            }
            progressed = kitchen.next_completion(), if kitchen.in_flight() > 0 => {
                if progressed {
                    println!();
                    announce(&kitchen);
                    prompt()?;
                }
            }
        }
    }

    tracing::debug!(in_flight = kitchen.in_flight(), "Session ended");
    Ok(())
}

async fn apply(
    kitchen: &mut Kitchen,
    command: Command,
    lines: &mut mpsc::Receiver<String>,
) -> Result<(), String> {
    let show_view = matches!(
        command,
        Command::View(_)
            | Command::Open(_)
            | Command::Delete(_)
            | Command::Check(_)
            | Command::Drop(_)
    );

    for msg in messages(kitchen, command)? {
        for effect in kitchen.dispatch(msg) {
            match effect {
                Effect::Confirm(confirmation) => {
                    print!("{} [y/N] ", confirmation.question());
                    let _ = io::stdout().flush();
                    let answer = lines.recv().await.unwrap_or_default();
                    if is_yes(&answer) {
                        match confirmation {
                            Confirmation::ClearShoppingList => {
                                kitchen.dispatch(Msg::ConfirmClearShoppingList);
                            }
                        }
                        println!("Shopping list cleared.");
                    }
                }
                Effect::Notify(notice) => println!("{}", notice),
                _ => {}
            }
        }
    }

    let state = kitchen.state();
    if show_view {
        println!("{}", render::view(state));
    } else if state.view == View::Home {
        println!("{}", render::kitchen_bar(state));
    }
    Ok(())
}

/// Print what changed after a generation request finished.
fn announce(kitchen: &Kitchen) {
    let state = kitchen.state();
    match state.phase {
        Phase::ImagePending(_) | Phase::ImageFailed(_) | Phase::Ready(_) => {
            if let Some(recipe) = &state.recipe {
                if matches!(state.phase, Phase::ImagePending(_)) {
                    println!("{}", render::recipe(recipe, None));
                    println!();
                    println!("Plating up a photo...");
                } else if let Some(uri) = &state.image_url {
                    println!("Photo ready: {}", render::image_summary(uri));
                } else {
                    println!("No photo this time, but the recipe is ready.");
                }
            }
        }
        Phase::RecipeFailed(_) => println!("{}", render::kitchen_bar(state)),
        Phase::Idle | Phase::RecipePending(_) => {}
    }
}
