use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::discovery::discovery::Target;
use crate::labels::label::Label;
use crate::page::page_model::Activation;

/// Matching discipline of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchMode {
    /// Type a fixed-length label. `candidates` restricts matching to the
    /// labels handed over from a search; `None` means every label.
    Prefix { candidates: Option<HashSet<Label>> },
    /// Type free text contained in the target's display text.
    Search,
}

impl MatchMode {
    pub fn prefix() -> Self {
        MatchMode::Prefix { candidates: None }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MatchMode::Prefix { .. } => "prefix",
            MatchMode::Search => "search",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    Escape,
    BackspaceOnEmpty,
    /// Prefix input matches no label
    Miss,
    /// Search text matches no target
    NoMatch,
    /// The root listener was removed mid-session
    Uninstalled,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CancelReason::Escape => "escape",
            CancelReason::BackspaceOnEmpty => "backspace on empty input",
            CancelReason::Miss => "no label matches",
            CancelReason::NoMatch => "no text matches",
            CancelReason::Uninstalled => "uninstalled",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionPhase {
    Collecting,
    Resolved(Label),
    Cancelled(CancelReason),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub label: Label,
    pub target: Target,
    /// `None` when the target was gone by the time it was clicked
    pub activation: Option<Activation>,
}

/// What a keystroke did to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchStep {
    /// Input accepted, `visible` badges remain
    Narrowed { visible: usize },
    /// Search handed over to prefix matching on the visible badges
    SwitchedToPrefix { visible: usize },
    /// Ctrl chord: not consumed, badges need a delayed reposition
    PassThrough,
    /// Consumed without effect
    Ignored,
    Resolved(Resolution),
    Cancelled(CancelReason),
}

impl MatchStep {
    pub fn ends_session(&self) -> bool {
        matches!(self, MatchStep::Resolved(_) | MatchStep::Cancelled(_))
    }
}

/// Characters typed since the session (or the current mode) began.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    chars: Vec<char>,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, c: char) {
        self.chars.push(c);
    }

    pub fn pop(&mut self) -> Option<char> {
        self.chars.pop()
    }

    pub fn clear(&mut self) {
        self.chars.clear();
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn as_string(&self) -> String {
        self.chars.iter().collect()
    }
}

/// Keyboard and scroll handlers installed for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Listeners {
    pub keydown: bool,
    pub scroll: bool,
}

impl Listeners {
    pub fn attach(&mut self) {
        self.keydown = true;
        self.scroll = true;
    }

    pub fn detach(&mut self) {
        self.keydown = false;
        self.scroll = false;
    }

    pub fn count(&self) -> usize {
        usize::from(self.keydown) + usize::from(self.scroll)
    }
}
