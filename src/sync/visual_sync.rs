use tracing::debug;

use crate::labels::overlay::OverlaySurface;
use crate::matcher::session::Session;
use crate::page::host::Page;

/// A delayed reposition requested after a Ctrl chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositionTimer {
    pub due_ms: u64,
    /// Session that was active when the timer was set
    pub session: u64,
}

/// Fire-and-forget timers on a millisecond clock driven by the host.
///
/// Timers are never cancelled. A timer that fires after its session ended
/// repositions whatever session is current, or nothing at all.
#[derive(Debug, Clone)]
pub struct TimerQueue {
    now_ms: u64,
    delay_ms: u64,
    pending: Vec<RepositionTimer>,
}

impl TimerQueue {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            now_ms: 0,
            delay_ms,
            pending: Vec::new(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn schedule(&mut self, session: u64) {
        let timer = RepositionTimer {
            due_ms: self.now_ms + self.delay_ms,
            session,
        };
        debug!(due_ms = timer.due_ms, session, "reposition scheduled");
        self.pending.push(timer);
    }

    /// Move the clock forward and return the timers that came due, oldest first.
    pub fn advance(&mut self, elapsed_ms: u64) -> Vec<RepositionTimer> {
        self.now_ms += elapsed_ms;
        let now = self.now_ms;

        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|t| t.due_ms <= now);
        self.pending = rest;
        due.sort_by_key(|t| t.due_ms);
        due
    }
}

/// Scroll/resize/timer refresh: re-render every allocated badge.
///
/// Returns whether anything was repositioned. Matcher state is untouched.
pub fn refresh(session: Option<&mut Session>, page: &dyn Page, surface: &mut dyn OverlaySurface) -> bool {
    match session {
        Some(session) if session.is_collecting() => {
            session.reposition(page, surface);
            true
        }
        _ => false,
    }
}
