use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{JumpError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Char(char),
    Escape,
    Backspace,
    Enter,
    ArrowUp,
    ArrowDown,
    /// Any other named key (`Tab`, `Shift`, `F5`, ...)
    Named(String),
}

/// A keydown as delivered by the host, with its modifier flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub meta: bool,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            shift: false,
            meta: false,
        }
    }

    /// A printable character; upper-case letters imply Shift.
    pub fn char(c: char) -> Self {
        Self {
            shift: c.is_uppercase(),
            ..Self::new(Key::Char(c))
        }
    }

    pub fn escape() -> Self {
        Self::new(Key::Escape)
    }

    pub fn backspace() -> Self {
        Self::new(Key::Backspace)
    }

    pub fn enter() -> Self {
        Self::new(Key::Enter)
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn as_char(&self) -> Option<char> {
        match self.key {
            Key::Char(c) => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match &self.key {
            Key::Char(' ') => "Space".to_string(),
            Key::Char(c) => c.to_string(),
            Key::Escape => "Esc".to_string(),
            Key::Backspace => "BS".to_string(),
            Key::Enter => "Enter".to_string(),
            Key::ArrowUp => "Up".to_string(),
            Key::ArrowDown => "Down".to_string(),
            Key::Named(name) => name.clone(),
        };
        let plain = matches!(self.key, Key::Char(c) if c != ' ');
        match (self.ctrl, self.meta) {
            (true, _) => write!(f, "<C-{}>", name),
            (_, true) => write!(f, "<M-{}>", name),
            _ if plain => write!(f, "{}", name),
            _ => write!(f, "<{}>", name),
        }
    }
}

/// Parse key notation: plain characters are one keystroke each, whitespace
/// is skipped, and `<...>` names a special key or a modified chord
/// (`<Esc>`, `<BS>`, `<Enter>`, `<Up>`, `<Down>`, `<Space>`, `<C-h>`, `<M-k>`,
/// `<S-a>`).
pub fn parse_keys(notation: &str) -> Result<Vec<KeyEvent>> {
    let mut events = Vec::new();
    let mut chars = notation.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        if c.is_whitespace() {
            continue;
        }
        if c != '<' {
            events.push(KeyEvent::char(c));
            continue;
        }

        // "<" followed by whitespace or end of input is a literal "<"
        match chars.peek() {
            None => {
                events.push(KeyEvent::char('<'));
                continue;
            }
            Some((_, next)) if next.is_whitespace() => {
                events.push(KeyEvent::char('<'));
                continue;
            }
            _ => {}
        }

        let mut body = String::new();
        let mut closed = false;
        for (_, c) in chars.by_ref() {
            if c == '>' {
                closed = true;
                break;
            }
            body.push(c);
        }
        if !closed {
            return Err(JumpError::KeyNotation {
                offset,
                message: format!("unterminated '<{}'", body),
            });
        }
        events.push(parse_chord(&body, offset)?);
    }

    Ok(events)
}

fn parse_chord(body: &str, offset: usize) -> Result<KeyEvent> {
    let mut ctrl = false;
    let mut meta = false;
    let mut shift = false;
    let mut rest = body;

    loop {
        if let Some(tail) = rest.strip_prefix("C-") {
            ctrl = true;
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("M-") {
            meta = true;
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("S-") {
            shift = true;
            rest = tail;
        } else {
            break;
        }
    }

    if rest.is_empty() {
        return Err(JumpError::KeyNotation {
            offset,
            message: format!("missing key in '<{}>'", body),
        });
    }

    let key = match rest {
        "Esc" | "Escape" => Key::Escape,
        "BS" | "Backspace" => Key::Backspace,
        "Enter" | "CR" => Key::Enter,
        "Up" | "ArrowUp" => Key::ArrowUp,
        "Down" | "ArrowDown" => Key::ArrowDown,
        "Space" => Key::Char(' '),
        "lt" => Key::Char('<'),
        other => {
            let mut it = other.chars();
            match (it.next(), it.next()) {
                (Some(c), None) => {
                    if shift {
                        Key::Char(c.to_ascii_uppercase())
                    } else {
                        Key::Char(c)
                    }
                }
                _ => Key::Named(other.to_string()),
            }
        }
    };

    let shift = shift || matches!(key, Key::Char(c) if c.is_uppercase());
    Ok(KeyEvent {
        key,
        ctrl,
        shift,
        meta,
    })
}
