use std::fmt;

use serde::Serialize;

use crate::cli::config::Bindings;
use crate::page::page_model::OpenMode;

/// Which targets a flow labels and how it matches input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    /// Every link, matched by label
    Links,
    /// Comment links only, matched by label
    Comments,
    /// Every link, matched by its text
    Search,
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flow::Links => write!(f, "links"),
            Flow::Comments => write!(f, "comments"),
            Flow::Search => write!(f, "search"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandAction {
    Start { flow: Flow, open_mode: OpenMode },
    /// Remove the root listener from this page
    Disable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    pub trigger: char,
    pub description: String,
    pub action: CommandAction,
}

impl Command {
    fn start(trigger: char, description: &str, flow: Flow, open_mode: OpenMode) -> Self {
        Self {
            trigger,
            description: description.to_string(),
            action: CommandAction::Start { flow, open_mode },
        }
    }
}

/// The fixed command list for one page session, in palette order.
pub fn build_commands(bindings: &Bindings) -> Vec<Command> {
    vec![
        Command::start(bindings.jump, "Jump to a link", Flow::Links, OpenMode::SameTab),
        Command::start(
            bindings.jump_new_tab,
            "Jump to a link in a new tab",
            Flow::Links,
            OpenMode::NewTab,
        ),
        Command::start(
            bindings.comments,
            "Jump to a comment thread",
            Flow::Comments,
            OpenMode::SameTab,
        ),
        Command::start(
            bindings.comments_new_tab,
            "Jump to a comment thread in a new tab",
            Flow::Comments,
            OpenMode::NewTab,
        ),
        Command::start(bindings.search, "Search link text", Flow::Search, OpenMode::SameTab),
        Command::start(
            bindings.search_new_tab,
            "Search link text, open in a new tab",
            Flow::Search,
            OpenMode::NewTab,
        ),
        Command {
            trigger: bindings.disable,
            description: "Disable jump-to on this page".to_string(),
            action: CommandAction::Disable,
        },
    ]
}

pub fn find_command(commands: &[Command], trigger: char) -> Option<&Command> {
    commands.iter().find(|c| c.trigger == trigger)
}
