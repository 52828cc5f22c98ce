use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::input::key::KeyEvent;
use crate::labels::label::Label;
use crate::matcher::matcher_model::CancelReason;

/// One line of the session trace.
#[derive(Debug, Clone, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub session: u64,

    pub event: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buffer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// SHA-1 of the resolved target's text; page text itself is never logged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_fingerprint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl TraceEvent {
    pub fn now(session: u64, event: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            session,
            event: event.to_string(),
            mode: None,
            key: None,
            buffer: None,
            visible: None,
            label: None,
            target_fingerprint: None,
            reason: None,
        }
    }

    pub fn with_mode(mut self, mode: impl ToString) -> Self {
        self.mode = Some(mode.to_string());
        self
    }

    pub fn with_key(mut self, key: &KeyEvent) -> Self {
        self.key = Some(key.to_string());
        self
    }

    pub fn with_buffer(mut self, buffer: impl ToString) -> Self {
        self.buffer = Some(buffer.to_string());
        self
    }

    pub fn with_visible(mut self, visible: usize) -> Self {
        self.visible = Some(visible);
        self
    }

    pub fn with_label(mut self, label: &Label) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn with_target_text(mut self, text: &str) -> Self {
        self.target_fingerprint = Some(text_fingerprint(text));
        self
    }

    pub fn with_reason(mut self, reason: CancelReason) -> Self {
        self.reason = Some(reason.to_string());
        self
    }
}

pub fn text_fingerprint(text: &str) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
