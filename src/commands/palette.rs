use tracing::debug;

use crate::commands::command::Command;
use crate::input::key::{Key, KeyEvent};

#[derive(Debug, Clone, PartialEq)]
pub enum PaletteStep {
    Filtered { visible: usize },
    Moved { selected: usize },
    /// Palette closed; run the command at this index
    Execute(usize),
    Closed,
    PassThrough,
    Ignored,
}

/// Filterable list of commands with a single selected row.
///
/// The selection is an index into the command list and always names a
/// visible command; it is `None` only when the filter hides everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    filter: String,
    visible: Vec<usize>,
    selected: Option<usize>,
}

impl Palette {
    pub fn open(commands: &[Command]) -> Self {
        let mut palette = Self {
            filter: String::new(),
            visible: Vec::new(),
            selected: None,
        };
        palette.refilter(commands);
        palette
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Indices of the commands currently listed.
    pub fn visible(&self) -> &[usize] {
        &self.visible
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Position of the selection within the visible rows.
    pub fn selected_row(&self) -> Option<usize> {
        let selected = self.selected?;
        self.visible.iter().position(|&i| i == selected)
    }

    pub fn handle_key(&mut self, event: &KeyEvent, commands: &[Command]) -> PaletteStep {
        if event.ctrl || event.meta {
            return PaletteStep::PassThrough;
        }

        match &event.key {
            Key::Escape => PaletteStep::Closed,
            Key::Enter => match self.selected {
                Some(index) => PaletteStep::Execute(index),
                None => PaletteStep::Closed,
            },
            Key::ArrowDown => self.move_by(1),
            Key::ArrowUp => self.move_by(-1),
            Key::Backspace => {
                self.filter.pop();
                self.refilter(commands)
            }
            Key::Char(c) => {
                self.filter.push(*c);
                self.refilter(commands)
            }
            Key::Named(_) => PaletteStep::Ignored,
        }
    }

    fn move_by(&mut self, delta: isize) -> PaletteStep {
        let Some(row) = self.selected_row() else {
            return PaletteStep::Ignored;
        };
        let last = self.visible.len().saturating_sub(1) as isize;
        let next = (row as isize + delta).clamp(0, last) as usize;
        self.selected = Some(self.visible[next]);
        PaletteStep::Moved { selected: next }
    }

    fn refilter(&mut self, commands: &[Command]) -> PaletteStep {
        self.visible = commands
            .iter()
            .enumerate()
            .filter(|(_, c)| c.trigger.to_string().contains(self.filter.as_str()))
            .map(|(i, _)| i)
            .collect();

        let still_visible = self
            .selected
            .map(|i| self.visible.contains(&i))
            .unwrap_or(false);
        if !still_visible {
            self.selected = self.visible.first().copied();
        }

        debug!(filter = %self.filter, visible = self.visible.len(), "palette filtered");
        PaletteStep::Filtered {
            visible: self.visible.len(),
        }
    }
}
