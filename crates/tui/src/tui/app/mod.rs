use std::sync::Arc;
use std::time::Instant;

use ratatui::style::{Color, Style};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use super::buffer::TextBuffer;
use super::constants::{HELP_TOKEN, SPINNER_FRAMES, STATUS_TTL};
use super::refresh::{RefreshOutcome, Refresher};
use super::view::View;
use crate::api::TaskApi;
use crate::cache::{Clock, ProjectCache, PROJECT_CACHE_TTL};
use crate::model::{ProjectMap, Task};

mod commands;
mod input;
mod render;

use commands::{CommandContext, CommandEffects, Registry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StatusMessage {
    text: String,
    kind: StatusKind,
    created_at: Instant,
}

impl StatusMessage {
    pub(crate) fn new<T: Into<String>>(text: T, kind: StatusKind) -> Self {
        Self {
            text: text.into(),
            kind,
            created_at: Instant::now(),
        }
    }

    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    fn style(&self) -> Style {
        match self.kind {
            StatusKind::Info => Style::default().fg(Color::Yellow),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusKind {
    Info,
    Error,
}

/// Owns all UI state. Mutated only from the event loop: by key handling, command
/// effects, and accepted refresh outcomes.
pub(crate) struct App {
    api: Arc<dyn TaskApi>,
    home_filter: String,
    view: View,
    tasks: Vec<Task>,
    project_cache: ProjectCache,
    refresher: Refresher,
    registry: Registry,
    input: TextBuffer,
    status: Option<StatusMessage>,
    after_refresh: Option<String>,
    spinner_frame: usize,
    should_quit: bool,
}

impl App {
    pub(crate) fn new(
        api: Arc<dyn TaskApi>,
        home_filter: String,
        clock: Arc<dyn Clock>,
        refresh_tx: UnboundedSender<RefreshOutcome>,
    ) -> Self {
        let refresher = Refresher::new(Arc::clone(&api), refresh_tx);
        let mut app = Self {
            api,
            view: View::filter(home_filter.clone()),
            home_filter,
            tasks: Vec::new(),
            project_cache: ProjectCache::new(PROJECT_CACHE_TTL, clock),
            refresher,
            registry: Registry::default(),
            input: TextBuffer::new(),
            status: None,
            after_refresh: None,
            spinner_frame: 0,
            should_quit: false,
        };
        app.start_refresh();
        app
    }

    pub(crate) fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.refresher.is_loading()
    }

    pub(crate) fn view(&self) -> &View {
        &self.view
    }

    pub(crate) fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub(crate) fn projects(&self) -> &ProjectMap {
        self.project_cache.projects()
    }

    pub(crate) fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(StatusMessage::text)
    }

    pub(crate) fn on_tick(&mut self) {
        if self.is_loading() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        }
        if let Some(status) = &self.status {
            if status.created_at.elapsed() > STATUS_TTL {
                self.status = None;
            }
        }
    }

    /// Switches the active view. Entering a list view triggers a refresh; entering
    /// Edit drops any refresh still in flight.
    pub(crate) fn set_view(&mut self, view: View) {
        self.view = view;
        match self.view {
            View::Filter { .. } | View::Project { .. } => self.start_refresh(),
            View::Edit(_) => {
                self.refresher.invalidate();
                self.after_refresh = None;
            }
        }
    }

    /// Leaving Edit always returns to the home filter.
    pub(crate) fn leave_edit(&mut self) {
        self.set_view(View::filter(self.home_filter.clone()));
    }

    pub(crate) fn start_refresh(&mut self) {
        match self.view.task_source() {
            Some(source) => {
                let with_projects = self.project_cache.is_stale();
                self.refresher.start(source, with_projects);
            }
            None => debug!("refresh suppressed while editing"),
        }
    }

    pub(crate) fn apply_refresh(&mut self, outcome: RefreshOutcome) {
        let Some(result) = self.refresher.accept(outcome) else {
            return;
        };
        match result {
            Ok(data) => {
                if let Some(projects) = data.projects {
                    self.project_cache.store(projects.into_iter().collect());
                }
                debug!(count = data.tasks.len(), "refresh applied");
                self.tasks = data.tasks;
                if let Some(text) = self.after_refresh.take() {
                    self.status = Some(StatusMessage::new(text, StatusKind::Info));
                }
            }
            Err(err) => {
                warn!(error = %err, "refresh failed");
                self.after_refresh = None;
                self.set_status_error(format!("Refresh failed: {}", err));
            }
        }
    }

    /// Submits the command line. Input is cleared before dispatch.
    pub(crate) async fn submit_input(&mut self) {
        let line = self.input.as_str().trim().to_string();
        self.input.clear();
        self.status = None;

        if line.is_empty() || line == HELP_TOKEN {
            return;
        }
        self.dispatch(&line).await;
    }

    async fn dispatch(&mut self, line: &str) {
        let Some(command) = self.registry.find(line) else {
            self.set_status_error(format!("Unknown command: {}. Type ? for help", line));
            return;
        };
        let args = &line[command.prefix.len()..];
        info!(command = command.prefix.trim_end(), "dispatching command");

        let mut ctx = CommandContext::new(
            self.api.as_ref(),
            &self.tasks,
            self.project_cache.projects(),
            &self.home_filter,
        );
        let result = command.run(args, &mut ctx).await;
        let effects = ctx.into_effects();

        match result {
            Ok(()) => self.commit(effects),
            Err(err) => {
                warn!(error = %format!("{:#}", err), "command failed");
                self.set_status_error(format!("Error: {:#}", err));
            }
        }
    }

    fn commit(&mut self, effects: CommandEffects) {
        // A fetch already in flight may predate this local change.
        let refresh = effects.refresh || (effects.tasks.is_some() && self.is_loading());
        if let Some(tasks) = effects.tasks {
            self.tasks = tasks;
        }
        self.after_refresh = effects.after_refresh;
        if effects.status.is_some() {
            self.status = effects.status;
        }
        if effects.quit {
            self.should_quit = true;
        }
        match effects.view {
            Some(view) => self.set_view(view),
            None if refresh => self.start_refresh(),
            None => {}
        }
    }

    /// Saves the field being edited. On failure the edit stays open.
    pub(crate) async fn submit_field(&mut self) {
        let Some(editor) = self.view.editor() else {
            return;
        };
        let Some((field, value)) = editor.pending() else {
            return;
        };
        let task_id = editor.task().id.clone();
        let update = field.update(&value);
        let api = Arc::clone(&self.api);

        match api.update_task(&task_id, &update).await {
            Ok(_) => {
                if let Some(editor) = self.view.editor_mut() {
                    editor.commit(field, value);
                }
                self.status = None;
            }
            Err(err) => {
                warn!(error = %err, field = field.label(), "field update failed");
                self.set_status_error(format!("Update failed: {}", err));
            }
        }
    }

    pub(crate) fn set_status_error<T: Into<String>>(&mut self, message: T) {
        self.status = Some(StatusMessage::new(message, StatusKind::Error));
    }
}
