use std::fmt;

use serde::{Deserialize, Serialize};

pub const ALPHABET_START: u8 = b'a';
pub const ALPHABET_SIZE: u8 = 26;
/// Characters per label.
pub const LABEL_LEN: usize = 2;
/// `aa`..`zz`; targets past this stay unlabeled.
pub const LABEL_CAPACITY: usize = ALPHABET_SIZE as usize * ALPHABET_SIZE as usize;

/// A short typeable code, unique within one session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    pub fn new(code: impl Into<String>) -> Self {
        Label(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    /// Label for the `index`-th target: the first character cycles fastest.
    pub fn at(index: usize) -> Option<Label> {
        if index >= LABEL_CAPACITY {
            return None;
        }
        let size = ALPHABET_SIZE as usize;
        let first = ALPHABET_START + (index % size) as u8;
        let second = ALPHABET_START + (index / size) as u8;
        Some(Label(
            [first as char, second as char].iter().collect::<String>(),
        ))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Two-digit odometer over `a..z`: `aa, ba, ca, .., za, ab, bb, .., zz`.
///
/// Targets near the top of the page share a second digit, so the first
/// typed character narrows to a visually coherent group.
#[derive(Debug, Clone)]
pub struct LabelSequence {
    first: u8,
    second: u8,
    exhausted: bool,
}

impl LabelSequence {
    pub fn new() -> Self {
        Self {
            first: ALPHABET_START,
            second: ALPHABET_START,
            exhausted: false,
        }
    }
}

impl Default for LabelSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for LabelSequence {
    type Item = Label;

    fn next(&mut self) -> Option<Label> {
        if self.exhausted {
            return None;
        }

        let label = Label(
            [self.first as char, self.second as char]
                .iter()
                .collect::<String>(),
        );

        self.first += 1;
        if self.first == ALPHABET_START + ALPHABET_SIZE {
            self.first = ALPHABET_START;
            self.second += 1;
        }
        if self.second == ALPHABET_START + ALPHABET_SIZE {
            self.exhausted = true;
        }

        Some(label)
    }
}
