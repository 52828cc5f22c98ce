use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::input::key::{Key, KeyEvent};
use crate::labels::allocator::{LabelEntry, LabelMap, apply_visibility, remove_all, reposition_all};
use crate::labels::label::{LABEL_LEN, Label};
use crate::labels::overlay::OverlaySurface;
use crate::matcher::matcher_model::{
    CancelReason, InputBuffer, Listeners, MatchMode, MatchStep, Resolution, SessionPhase,
};
use crate::matcher::text::text_matches;
use crate::page::host::Page;
use crate::page::page_model::OpenMode;

/// One labeling session: from the trigger key until resolution or cancellation.
///
/// Visibility is always recomputed from the whole buffer, never patched
/// incrementally, so backspace restores exactly the state the shorter input
/// produced.
#[derive(Debug)]
pub struct Session {
    id: u64,
    labels: LabelMap,
    buffer: InputBuffer,
    mode: MatchMode,
    open_mode: OpenMode,
    phase: SessionPhase,
    listeners: Listeners,
}

impl Session {
    /// Take ownership of freshly allocated labels and start collecting input.
    pub fn begin(id: u64, labels: LabelMap, mode: MatchMode, open_mode: OpenMode) -> Self {
        let mut listeners = Listeners::default();
        listeners.attach();

        info!(
            session = id,
            mode = mode.name(),
            %open_mode,
            labels = labels.len(),
            "session started"
        );

        Self {
            id,
            labels,
            buffer: InputBuffer::new(),
            mode,
            open_mode,
            phase: SessionPhase::Collecting,
            listeners,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn mode(&self) -> &MatchMode {
        &self.mode
    }

    pub fn open_mode(&self) -> OpenMode {
        self.open_mode
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn is_collecting(&self) -> bool {
        self.phase == SessionPhase::Collecting
    }

    pub fn buffer(&self) -> String {
        self.buffer.as_string()
    }

    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }

    pub fn listeners(&self) -> Listeners {
        self.listeners
    }

    pub fn visible_labels(&self) -> Vec<Label> {
        self.labels.visible_labels()
    }

    pub fn visible_count(&self) -> usize {
        self.labels.visible_count()
    }

    pub fn handle_key(
        &mut self,
        event: &KeyEvent,
        page: &mut dyn Page,
        surface: &mut dyn OverlaySurface,
    ) -> MatchStep {
        if !self.is_collecting() {
            return MatchStep::Ignored;
        }

        // Ctrl chords belong to the browser; badges are refreshed after it
        // has finished reacting.
        if event.ctrl {
            return MatchStep::PassThrough;
        }

        debug!(session = self.id, key = %event, buffer = %self.buffer.as_string(), "key");

        match &event.key {
            Key::Escape => self.cancel(CancelReason::Escape, surface),
            Key::Backspace => self.backspace(page, surface),
            Key::Enter => match self.mode {
                MatchMode::Search => self.switch_to_prefix(),
                MatchMode::Prefix { .. } => MatchStep::Ignored,
            },
            Key::Char(c) if !event.meta => match self.mode {
                MatchMode::Prefix { .. } => self.prefix_char(*c, event.shift, page, surface),
                MatchMode::Search => self.search_char(*c, page, surface),
            },
            _ => MatchStep::Ignored,
        }
    }

    /// Re-render every allocated badge at its target's current rect.
    pub fn reposition(&mut self, page: &dyn Page, surface: &mut dyn OverlaySurface) {
        if !self.listeners.scroll {
            return;
        }
        reposition_all(&mut self.labels, page, surface);
    }

    /// Tear the session down without activating anything.
    pub fn cancel(&mut self, reason: CancelReason, surface: &mut dyn OverlaySurface) -> MatchStep {
        info!(session = self.id, %reason, buffer = %self.buffer.as_string(), "session cancelled");
        self.teardown(surface);
        self.phase = SessionPhase::Cancelled(reason);
        MatchStep::Cancelled(reason)
    }

    fn backspace(&mut self, page: &dyn Page, surface: &mut dyn OverlaySurface) -> MatchStep {
        if self.buffer.pop().is_none() {
            return self.cancel(CancelReason::BackspaceOnEmpty, surface);
        }
        let visible = self.recompute(page, surface);
        MatchStep::Narrowed { visible }
    }

    fn prefix_char(
        &mut self,
        c: char,
        shift: bool,
        page: &mut dyn Page,
        surface: &mut dyn OverlaySurface,
    ) -> MatchStep {
        if !(c.is_alphanumeric() || c == '_' || c.is_whitespace()) {
            return MatchStep::Ignored;
        }
        let c = if shift {
            c.to_ascii_uppercase()
        } else {
            c.to_ascii_lowercase()
        };
        self.buffer.push(c);

        let visible = self.recompute(page, surface);
        if visible == 0 {
            return self.cancel(CancelReason::Miss, surface);
        }
        if self.buffer.len() < LABEL_LEN {
            return MatchStep::Narrowed { visible };
        }

        let typed = Label::new(self.buffer.as_string());
        let exact = self
            .labels
            .find(typed.as_str())
            .map(|entry| self.is_candidate(&entry.label))
            .unwrap_or(false);
        if exact {
            self.resolve(typed, page, surface)
        } else {
            self.cancel(CancelReason::Miss, surface)
        }
    }

    fn search_char(
        &mut self,
        c: char,
        page: &mut dyn Page,
        surface: &mut dyn OverlaySurface,
    ) -> MatchStep {
        for lower in c.to_lowercase() {
            self.buffer.push(lower);
        }

        let visible = self.recompute(page, surface);
        match visible {
            0 => self.cancel(CancelReason::NoMatch, surface),
            1 => match self.visible_labels().into_iter().next() {
                Some(label) => self.resolve(label, page, surface),
                None => self.cancel(CancelReason::NoMatch, surface),
            },
            _ => MatchStep::Narrowed { visible },
        }
    }

    /// Keep the labels and their visibility, drop the search text, and
    /// continue with two-key label input restricted to what is visible.
    fn switch_to_prefix(&mut self) -> MatchStep {
        let candidates: HashSet<Label> = self.visible_labels().into_iter().collect();
        let visible = candidates.len();
        info!(session = self.id, visible, "search handed over to label input");

        self.buffer.clear();
        self.mode = MatchMode::Prefix {
            candidates: Some(candidates),
        };
        MatchStep::SwitchedToPrefix { visible }
    }

    fn is_candidate(&self, label: &Label) -> bool {
        match &self.mode {
            MatchMode::Prefix {
                candidates: Some(set),
            } => set.contains(label),
            _ => true,
        }
    }

    /// Visibility as a pure function of the current buffer.
    fn recompute(&mut self, page: &dyn Page, surface: &mut dyn OverlaySurface) -> usize {
        let typed = self.buffer.as_string();
        let visible = match &self.mode {
            MatchMode::Prefix { candidates } => {
                apply_visibility(&mut self.labels, surface, |entry: &LabelEntry| {
                    let allowed = candidates
                        .as_ref()
                        .map(|set| set.contains(&entry.label))
                        .unwrap_or(true);
                    allowed && entry.label.starts_with(&typed)
                })
            }
            MatchMode::Search => apply_visibility(&mut self.labels, surface, |entry: &LabelEntry| {
                page.text(entry.target.id)
                    .map(|text| text_matches(text, &typed))
                    .unwrap_or(false)
            }),
        };
        debug!(session = self.id, buffer = %typed, visible, "visibility recomputed");
        visible
    }

    fn resolve(
        &mut self,
        label: Label,
        page: &mut dyn Page,
        surface: &mut dyn OverlaySurface,
    ) -> MatchStep {
        let Some(target) = self.labels.get(&label) else {
            return self.cancel(CancelReason::Miss, surface);
        };

        let activation = match page.activate(target.id, self.open_mode) {
            Ok(activation) => Some(activation),
            Err(e) => {
                warn!(session = self.id, %label, error = %e, "activation skipped");
                None
            }
        };

        info!(session = self.id, %label, element = %target.id, open_mode = %self.open_mode, "resolved");
        self.teardown(surface);
        self.phase = SessionPhase::Resolved(label.clone());
        MatchStep::Resolved(Resolution {
            label,
            target,
            activation,
        })
    }

    /// Detach listeners first so nothing touches the nodes being removed.
    fn teardown(&mut self, surface: &mut dyn OverlaySurface) {
        self.listeners.detach();
        remove_all(&mut self.labels, surface);
        self.buffer.clear();
    }
}
