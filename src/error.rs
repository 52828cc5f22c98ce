use thiserror::Error;

use crate::page::page_model::ElementId;

pub type Result<T> = std::result::Result<T, JumpError>;

#[derive(Debug, Error)]
pub enum JumpError {
    /// Reading a page snapshot, scenario or trace file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Page snapshot JSON did not match the expected structure
    #[error("invalid page snapshot ({context}): {source}")]
    PageParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Scenario YAML could not be parsed
    #[error("invalid scenario ({context}): {source}")]
    ScenarioParse {
        context: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// Key notation such as `<C-h>` was malformed
    #[error("bad key notation at offset {offset}: {message}")]
    KeyNotation { offset: usize, message: String },

    /// A flow was started while another session still owns the keyboard
    #[error("a labeling session is already active (session #{0})")]
    SessionActive(u64),

    /// The root listener is not installed on this page
    #[error("jump-to is not installed on this page")]
    NotInstalled,

    /// The target element is no longer attached to the page
    #[error("element {0} is detached from the page")]
    DetachedTarget(ElementId),
}

impl JumpError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        JumpError::Io {
            path: path.into(),
            source,
        }
    }
}
