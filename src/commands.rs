use std::fmt;

use blockstack_assets::{BlockCatalog, Geometry};
use blockstack_client::Session;
use blockstack_core::Millis;
use blockstack_render::{RenderSurface, TextSurface};
use blockstack_world::KvStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandError {
    message: String,
}

impl CommandError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CommandError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackCommand {
    Help,
    /// Tap a catalog entry; two taps inside the window place it.
    Tap(String),
    /// Select a catalog entry without tap timing.
    Select(String),
    Add,
    Clear,
    /// Render the current stack.
    List,
    /// Print the catalog with 1-based indices.
    Catalog,
}

/// Parse one command line.
///
/// Block arguments are either the full entry name (spaces allowed) or `#N`,
/// the 1-based catalog index.
pub fn parse_command<G: Geometry>(
    input: &str,
    catalog: &BlockCatalog<G>,
) -> Result<StackCommand, CommandError> {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Err(CommandError::new("Empty command"));
    }

    let (head, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (trimmed, ""),
    };

    let no_args = |command: StackCommand, usage: &str| {
        if rest.is_empty() {
            Ok(command)
        } else {
            Err(CommandError::new(format!("Usage: {usage}")))
        }
    };

    match head.to_ascii_lowercase().as_str() {
        "help" | "?" => no_args(StackCommand::Help, "help"),
        "tap" => resolve_block(rest, catalog, "tap <name|#index>").map(StackCommand::Tap),
        "select" => {
            resolve_block(rest, catalog, "select <name|#index>").map(StackCommand::Select)
        }
        "add" => no_args(StackCommand::Add, "add"),
        "clear" => no_args(StackCommand::Clear, "clear"),
        "list" => no_args(StackCommand::List, "list"),
        "catalog" => no_args(StackCommand::Catalog, "catalog"),
        other => Err(CommandError::new(format!(
            "Unknown command '{other}'. Try 'help'"
        ))),
    }
}

fn resolve_block<G: Geometry>(
    arg: &str,
    catalog: &BlockCatalog<G>,
    usage: &str,
) -> Result<String, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::new(format!("Usage: {usage}")));
    }
    let Some(index) = arg.strip_prefix('#') else {
        // Unknown names are passed through; the session ignores them.
        return Ok(arg.to_string());
    };
    let index: usize = index
        .parse()
        .map_err(|_| CommandError::new(format!("Invalid catalog index '{arg}'")))?;
    index
        .checked_sub(1)
        .and_then(|i| catalog.entries().get(i))
        .map(|entry| entry.name.clone())
        .ok_or_else(|| {
            CommandError::new(format!(
                "Catalog index {index} out of range (1..={})",
                catalog.len()
            ))
        })
}

/// Apply `command` to the session and return the lines to print.
pub fn execute_command<G: Geometry, S: KvStore>(
    session: &mut Session<G, S>,
    surface: &mut TextSurface,
    command: &StackCommand,
    now: Millis,
) -> Vec<String> {
    match command {
        StackCommand::Help => vec![
            "Commands: tap <block>, select <block>, add, clear, list, catalog, help".to_string(),
            "Blocks are full entry names or #N catalog indices".to_string(),
        ],
        StackCommand::Tap(name) => match session.tap(name, now) {
            Some(outcome) if outcome.is_double_tap() => {
                let count = session.blocks().len();
                vec![format!("Double-tap on {name}; stack has {count}")]
            }
            Some(_) => vec![format!("Selected {name}")],
            None => vec![format!("Ignored tap on {name}")],
        },
        StackCommand::Select(name) => {
            if session.select(name, now) {
                vec![format!("Selected {name}")]
            } else {
                vec![format!("Ignored selection of {name}")]
            }
        }
        StackCommand::Add => match session.add_block(now) {
            Some(id) => vec![format!("Placed block #{id}")],
            None => vec!["Nothing selected".to_string()],
        },
        StackCommand::Clear => {
            let removed = session.clear_blocks(now);
            vec![format!("Cleared {removed} block(s)")]
        }
        StackCommand::List => {
            surface.draw(session.blocks());
            surface.frame().lines().map(str::to_string).collect()
        }
        StackCommand::Catalog => {
            let selected = session.selection().name();
            session
                .catalog()
                .names()
                .enumerate()
                .map(|(i, name)| {
                    let marker = if selected == Some(name) { '*' } else { ' ' };
                    format!("{marker}{:>3} {name}", i + 1)
                })
                .collect()
        }
    }
}
