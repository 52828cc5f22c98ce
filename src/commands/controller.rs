use tracing::{debug, info, warn};

use crate::cli::config::AppConfig;
use crate::commands::command::{Command, CommandAction, Flow, build_commands};
use crate::commands::palette::{Palette, PaletteStep};
use crate::discovery::discovery::{Scope, discover};
use crate::error::{JumpError, Result};
use crate::input::key::KeyEvent;
use crate::labels::allocator::allocate;
use crate::labels::overlay::OverlaySurface;
use crate::matcher::matcher_model::{CancelReason, MatchMode, MatchStep, SessionPhase};
use crate::matcher::session::Session;
use crate::page::host::Page;
use crate::page::page_model::OpenMode;
use crate::sync::visual_sync::{TimerQueue, refresh};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::TraceEvent;

/// What the host should do with a keydown after the controller saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// Handled here; suppress the default action
    Consumed,
    /// Let the browser act on it
    PassThrough,
    /// Not ours
    Ignored,
}

/// Owner of the page-wide root listener and of the single active session.
///
/// At most one session or palette exists at a time; every keystroke goes
/// through [`Controller::handle_key`].
pub struct Controller<P: Page, S: OverlaySurface> {
    page: P,
    surface: S,
    commands: Vec<Command>,
    palette_trigger: char,
    comment_marker: String,

    installed: bool,
    listener_count: u32,

    session: Option<Session>,
    palette: Option<Palette>,
    last_phase: Option<SessionPhase>,
    sessions_started: u64,

    timers: TimerQueue,
    tracer: TraceLogger,
}

impl<P: Page, S: OverlaySurface> Controller<P, S> {
    pub fn new(page: P, surface: S, config: &AppConfig) -> Self {
        Self {
            page,
            surface,
            commands: build_commands(&config.bindings),
            palette_trigger: config.bindings.palette,
            comment_marker: config.comment_marker.clone(),
            installed: false,
            listener_count: 0,
            session: None,
            palette: None,
            last_phase: None,
            sessions_started: 0,
            timers: TimerQueue::new(config.reposition_delay_ms),
            tracer: TraceLogger::disabled(),
        }
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    // ------------------------------------------------------------------
    // Root listener lifecycle
    // ------------------------------------------------------------------

    /// Attach the root listener; a second install is a no-op.
    pub fn install(&mut self) -> bool {
        if self.installed {
            debug!("root listener already installed");
            return false;
        }
        self.installed = true;
        self.listener_count += 1;
        self.surface.set_listener_count(self.listener_count);
        info!(listeners = self.listener_count, "root listener installed");
        true
    }

    /// Detach the root listener, tearing down any open session or palette.
    pub fn uninstall(&mut self) -> bool {
        if !self.installed {
            return false;
        }
        if let Some(mut session) = self.session.take() {
            session.cancel(CancelReason::Uninstalled, &mut self.surface);
            self.trace(
                TraceEvent::now(session.id(), "cancelled").with_reason(CancelReason::Uninstalled),
            );
            self.last_phase = Some(session.phase().clone());
        }
        self.palette = None;
        self.installed = false;
        self.listener_count = self.listener_count.saturating_sub(1);
        self.surface.set_listener_count(self.listener_count);
        info!(listeners = self.listener_count, "root listener removed");
        true
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }

    pub fn listener_count(&self) -> u32 {
        self.listener_count
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Whether a session currently owns the keyboard.
    pub fn is_active(&self) -> bool {
        self.session
            .as_ref()
            .map(Session::is_collecting)
            .unwrap_or(false)
    }

    /// Sessions started since the controller was created.
    pub fn session_count(&self) -> u64 {
        self.sessions_started
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// How the most recent session ended.
    pub fn last_phase(&self) -> Option<&SessionPhase> {
        self.last_phase.as_ref()
    }

    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    // ------------------------------------------------------------------
    // Keyboard
    // ------------------------------------------------------------------

    pub fn handle_key(&mut self, event: &KeyEvent) -> KeyDisposition {
        if !self.installed {
            return KeyDisposition::Ignored;
        }

        if self.session.is_some() {
            return self.session_key(event);
        }

        if self.palette.is_some() {
            return self.palette_key(event);
        }

        if self.page.focus_is_editable() || event.ctrl || event.meta {
            return KeyDisposition::Ignored;
        }

        let Some(c) = event.as_char() else {
            return KeyDisposition::Ignored;
        };

        if c == self.palette_trigger {
            if let Err(e) = self.open_palette() {
                warn!(error = %e, "could not open palette");
            }
            return KeyDisposition::Consumed;
        }

        match self.commands.iter().position(|cmd| cmd.trigger == c) {
            Some(index) => {
                if let Err(e) = self.run_command(index) {
                    warn!(error = %e, trigger = %c, "command failed");
                }
                KeyDisposition::Consumed
            }
            None => KeyDisposition::Ignored,
        }
    }

    fn session_key(&mut self, event: &KeyEvent) -> KeyDisposition {
        let Some(session) = self.session.as_mut() else {
            return KeyDisposition::Ignored;
        };
        let id = session.id();
        let step = session.handle_key(event, &mut self.page, &mut self.surface);
        let buffer = session.buffer();
        let mode = session.mode().name();

        let disposition = match &step {
            MatchStep::PassThrough => {
                self.timers.schedule(id);
                KeyDisposition::PassThrough
            }
            _ => KeyDisposition::Consumed,
        };

        let event = TraceEvent::now(id, "key").with_key(event).with_mode(mode);
        match &step {
            MatchStep::Narrowed { visible } => {
                self.trace(event.with_buffer(&buffer).with_visible(*visible));
            }
            MatchStep::SwitchedToPrefix { visible } => {
                self.trace(event.with_visible(*visible));
                self.trace(TraceEvent::now(id, "mode_switch").with_mode("prefix"));
            }
            MatchStep::Resolved(resolution) => {
                let mut resolved = TraceEvent::now(id, "resolved").with_label(&resolution.label);
                if let Some(text) = self.page.text(resolution.target.id) {
                    resolved = resolved.with_target_text(text);
                }
                self.trace(event);
                self.trace(resolved);
            }
            MatchStep::Cancelled(reason) => {
                self.trace(event);
                self.trace(TraceEvent::now(id, "cancelled").with_reason(*reason));
            }
            MatchStep::PassThrough | MatchStep::Ignored => {}
        }

        if step.ends_session() {
            if let Some(session) = self.session.take() {
                self.last_phase = Some(session.phase().clone());
            }
        }

        disposition
    }

    fn palette_key(&mut self, event: &KeyEvent) -> KeyDisposition {
        let Some(palette) = self.palette.as_mut() else {
            return KeyDisposition::Ignored;
        };

        match palette.handle_key(event, &self.commands) {
            PaletteStep::Execute(index) => {
                self.palette = None;
                if let Err(e) = self.run_command(index) {
                    warn!(error = %e, "palette command failed");
                }
                KeyDisposition::Consumed
            }
            PaletteStep::Closed => {
                self.palette = None;
                KeyDisposition::Consumed
            }
            PaletteStep::PassThrough => KeyDisposition::PassThrough,
            PaletteStep::Filtered { .. } | PaletteStep::Moved { .. } | PaletteStep::Ignored => {
                KeyDisposition::Consumed
            }
        }
    }

    // ------------------------------------------------------------------
    // Commands and flows
    // ------------------------------------------------------------------

    pub fn run_command(&mut self, index: usize) -> Result<()> {
        let Some(command) = self.commands.get(index) else {
            return Ok(());
        };
        debug!(trigger = %command.trigger, description = %command.description, "running command");

        match command.action {
            CommandAction::Start { flow, open_mode } => self.start_flow(flow, open_mode).map(|_| ()),
            CommandAction::Disable => {
                self.uninstall();
                Ok(())
            }
        }
    }

    pub fn open_palette(&mut self) -> Result<()> {
        if !self.installed {
            return Err(JumpError::NotInstalled);
        }
        if let Some(session) = &self.session {
            return Err(JumpError::SessionActive(session.id()));
        }
        self.palette = Some(Palette::open(&self.commands));
        Ok(())
    }

    /// Discover targets, allocate labels, and hand the keyboard to a new session.
    ///
    /// Returns the number of labels allocated.
    pub fn start_flow(&mut self, flow: Flow, open_mode: OpenMode) -> Result<usize> {
        if !self.installed {
            return Err(JumpError::NotInstalled);
        }
        if let Some(session) = &self.session {
            return Err(JumpError::SessionActive(session.id()));
        }

        let scope = match flow {
            Flow::Comments => Scope::comments(&self.comment_marker),
            Flow::Links | Flow::Search => Scope::Page,
        };
        let mode = match flow {
            Flow::Search => MatchMode::Search,
            Flow::Links | Flow::Comments => MatchMode::prefix(),
        };

        let targets = discover(&self.page, &scope);
        let labels = allocate(&targets, &self.page, &mut self.surface);
        let count = labels.len();

        self.sessions_started += 1;
        let id = self.sessions_started;
        self.session = Some(Session::begin(id, labels, mode, open_mode));
        self.trace(
            TraceEvent::now(id, "started")
                .with_mode(flow)
                .with_visible(count),
        );
        Ok(count)
    }

    // ------------------------------------------------------------------
    // Visual sync
    // ------------------------------------------------------------------

    pub fn on_scroll(&mut self) -> bool {
        refresh(self.session.as_mut(), &self.page, &mut self.surface)
    }

    pub fn on_resize(&mut self) -> bool {
        refresh(self.session.as_mut(), &self.page, &mut self.surface)
    }

    /// Advance the timer clock; returns how many delayed repositions ran.
    pub fn advance(&mut self, elapsed_ms: u64) -> usize {
        let mut ran = 0;
        for timer in self.timers.advance(elapsed_ms) {
            if refresh(self.session.as_mut(), &self.page, &mut self.surface) {
                debug!(due_ms = timer.due_ms, session = timer.session, "delayed reposition");
                ran += 1;
            }
        }
        ran
    }

    fn trace(&self, event: TraceEvent) {
        self.tracer.log(&event);
    }
}
