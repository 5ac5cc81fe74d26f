use anyhow::{Context, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::api::TaskApi;
use crate::model::{stored_priority, ProjectMap, Task, TaskUpdate};
use crate::tui::constants::EDIT_FIELDS_USAGE;
use crate::tui::editor::{EditableField, FieldEditor};
use crate::tui::view::View;

use super::{StatusKind, StatusMessage};

static PRIORITY_FIELD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^p([1-4])$").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CommandGroup {
    Tasks,
    Views,
    App,
}

#[async_trait]
pub(crate) trait CommandHandler: Send + Sync {
    async fn run(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<()>;
}

pub(crate) struct Command {
    pub(crate) prefix: &'static str,
    pub(crate) hint: &'static str,
    pub(crate) description: &'static str,
    pub(crate) group: CommandGroup,
    handler: Box<dyn CommandHandler>,
}

impl Command {
    pub(crate) fn new(
        prefix: &'static str,
        hint: &'static str,
        description: &'static str,
        group: CommandGroup,
        handler: impl CommandHandler + 'static,
    ) -> Self {
        Self {
            prefix,
            hint,
            description,
            group,
            handler: Box::new(handler),
        }
    }

    pub(crate) async fn run(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<()> {
        self.handler.run(args, ctx).await
    }
}

/// Commands in registration order; the first literal prefix match wins.
pub(crate) struct Registry {
    commands: Vec<Command>,
}

impl Registry {
    pub(crate) fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    pub(crate) fn find(&self, input: &str) -> Option<&Command> {
        self.commands
            .iter()
            .find(|command| input.starts_with(command.prefix))
    }

    /// Commands whose prefix extends what has been typed so far.
    pub(crate) fn suggestions<'a>(&'a self, partial: &'a str) -> impl Iterator<Item = &'a Command> {
        self.commands
            .iter()
            .filter(move |command| command.prefix.starts_with(partial))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(vec![
            Command::new(
                "done ",
                "done <number>",
                "Complete a task",
                CommandGroup::Tasks,
                Done,
            ),
            Command::new(
                "add ",
                "add <task>",
                "Quick-add a task",
                CommandGroup::Tasks,
                Add,
            ),
            Command::new(
                "edit ",
                "edit <number> [field value]",
                "Edit a task or one of its fields",
                CommandGroup::Tasks,
                Edit,
            ),
            Command::new(
                "filter ",
                "filter <query>",
                "Show tasks matching a filter",
                CommandGroup::Views,
                Filter,
            ),
            Command::new(
                "project ",
                "project <project>",
                "Show tasks in a project",
                CommandGroup::Views,
                ProjectView,
            ),
            Command::new(
                "refresh",
                "refresh",
                "Reload the current view",
                CommandGroup::Views,
                Refresh,
            ),
            Command::new("today", "today", "Show today's tasks", CommandGroup::Views, Today),
            Command::new("home", "home", "Show the home filter", CommandGroup::Views, Home),
            Command::new("quit", "quit", "Exit dewy", CommandGroup::App, Quit),
        ])
    }
}

/// Everything a handler may change. Applied by the app only when the handler succeeds.
#[derive(Debug, Default)]
pub(crate) struct CommandEffects {
    pub(crate) status: Option<StatusMessage>,
    pub(crate) tasks: Option<Vec<Task>>,
    pub(crate) view: Option<View>,
    pub(crate) refresh: bool,
    /// Shown once the requested refresh has been applied.
    pub(crate) after_refresh: Option<String>,
    pub(crate) quit: bool,
}

pub(crate) struct CommandContext<'a> {
    pub(crate) api: &'a dyn TaskApi,
    pub(crate) tasks: &'a [Task],
    pub(crate) projects: &'a ProjectMap,
    pub(crate) home_filter: &'a str,
    effects: CommandEffects,
}

impl<'a> CommandContext<'a> {
    pub(crate) fn new(
        api: &'a dyn TaskApi,
        tasks: &'a [Task],
        projects: &'a ProjectMap,
        home_filter: &'a str,
    ) -> Self {
        Self {
            api,
            tasks,
            projects,
            home_filter,
            effects: CommandEffects::default(),
        }
    }

    pub(crate) fn set_message(&mut self, text: impl Into<String>) {
        self.effects.status = Some(StatusMessage::new(text, StatusKind::Info));
    }

    pub(crate) fn set_error(&mut self, text: impl Into<String>) {
        self.effects.status = Some(StatusMessage::new(text, StatusKind::Error));
    }

    pub(crate) fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.effects.tasks = Some(tasks);
    }

    pub(crate) fn set_view(&mut self, view: View) {
        self.effects.view = Some(view);
    }

    pub(crate) fn refresh(&mut self) {
        self.effects.refresh = true;
    }

    /// Requests a refresh and reports `text` only when it lands.
    pub(crate) fn refresh_then(&mut self, text: impl Into<String>) {
        self.effects.refresh = true;
        self.effects.after_refresh = Some(text.into());
    }

    pub(crate) fn exit(&mut self) {
        self.effects.quit = true;
    }

    pub(crate) fn into_effects(self) -> CommandEffects {
        self.effects
    }

    /// Looks up a 1-indexed task number from the displayed list.
    fn task_at(&self, raw: &str) -> Option<&'a Task> {
        let number = raw.trim().parse::<usize>().ok()?;
        number.checked_sub(1).and_then(|idx| self.tasks.get(idx))
    }

    fn tasks_replacing(&self, updated: Task) -> Vec<Task> {
        self.tasks
            .iter()
            .map(|task| {
                if task.id == updated.id {
                    updated.clone()
                } else {
                    task.clone()
                }
            })
            .collect()
    }
}

struct Done;

#[async_trait]
impl CommandHandler for Done {
    async fn run(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<()> {
        let Some(task) = ctx.task_at(args) else {
            ctx.set_error(format!("No task #{}", args.trim()));
            return Ok(());
        };
        ctx.api
            .close_task(&task.id)
            .await
            .with_context(|| format!("could not complete \"{}\"", task.content))?;

        let remaining = ctx
            .tasks
            .iter()
            .filter(|candidate| candidate.id != task.id)
            .cloned()
            .collect();
        ctx.set_tasks(remaining);
        ctx.set_message(format!("✓ {}", task.content));
        Ok(())
    }
}

struct Add;

#[async_trait]
impl CommandHandler for Add {
    async fn run(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<()> {
        let text = args.trim();
        if text.is_empty() {
            ctx.set_error("Usage: add <task>");
            return Ok(());
        }
        ctx.api
            .quick_add(text)
            .await
            .context("could not add task")?;
        ctx.set_message(format!("+ {}", text));
        ctx.refresh();
        Ok(())
    }
}

struct Edit;

#[async_trait]
impl CommandHandler for Edit {
    async fn run(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<()> {
        let args = args.trim_start();
        let (number, rest) = args.split_once(' ').unwrap_or((args, ""));
        let Some(task) = ctx.task_at(number) else {
            ctx.set_error(format!("No task #{}", number.trim()));
            return Ok(());
        };

        let rest = rest.trim_start();
        if rest.is_empty() {
            ctx.set_view(View::Edit(Box::new(FieldEditor::new(task.clone()))));
            return Ok(());
        }

        let (field, value) = rest.split_once(' ').unwrap_or((rest, ""));
        let value = value.trim();
        let update = match field {
            "due" => EditableField::Due.update(value),
            "labels" => TaskUpdate::labels(
                value
                    .split_whitespace()
                    .map(|label| label.strip_prefix('@').unwrap_or(label))
                    .filter(|label| !label.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            "desc" => EditableField::Description.update(value),
            "title" => {
                if value.is_empty() {
                    ctx.set_error("Usage: edit <number> title <text>");
                    return Ok(());
                }
                EditableField::Title.update(value)
            }
            "project" => return move_to_project(ctx, task, value).await,
            other => match PRIORITY_FIELD
                .captures(other)
                .and_then(|caps| caps.get(1))
                .and_then(|display| display.as_str().parse::<u8>().ok())
            {
                Some(display) => TaskUpdate::priority(stored_priority(display)),
                None => {
                    ctx.set_error(format!(
                        "Unknown field: {}. Use {}",
                        other, EDIT_FIELDS_USAGE
                    ));
                    return Ok(());
                }
            },
        };

        let updated = ctx
            .api
            .update_task(&task.id, &update)
            .await
            .with_context(|| format!("could not update \"{}\"", task.content))?;
        ctx.set_message(format!("✎ {}", updated.content));
        let tasks = ctx.tasks_replacing(updated);
        ctx.set_tasks(tasks);
        Ok(())
    }
}

async fn move_to_project(ctx: &mut CommandContext<'_>, task: &Task, name: &str) -> Result<()> {
    let Some(project_id) = ctx.projects.find_by_name(name).map(str::to_string) else {
        ctx.set_error(format!("Not found: project {}", name));
        return Ok(());
    };
    ctx.api
        .move_task(&task.id, &project_id)
        .await
        .with_context(|| format!("could not move \"{}\"", task.content))?;

    let mut moved = task.clone();
    moved.project_id = project_id;
    let tasks = ctx.tasks_replacing(moved);
    ctx.set_tasks(tasks);
    ctx.set_message(format!("→ #{} {}", name, task.content));
    Ok(())
}

struct Filter;

#[async_trait]
impl CommandHandler for Filter {
    async fn run(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<()> {
        ctx.set_view(View::filter(args.trim()));
        ctx.set_message("⊳ filtered");
        Ok(())
    }
}

struct ProjectView;

#[async_trait]
impl CommandHandler for ProjectView {
    async fn run(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<()> {
        let name = args.trim();
        match ctx.projects.find_by_name(name).map(str::to_string) {
            Some(project_id) => {
                ctx.set_view(View::Project { project_id });
                ctx.set_message(format!("→ #{}", name));
            }
            None => ctx.set_error(format!("Project not found: {}", name)),
        }
        Ok(())
    }
}

struct Refresh;

#[async_trait]
impl CommandHandler for Refresh {
    async fn run(&self, _args: &str, ctx: &mut CommandContext<'_>) -> Result<()> {
        ctx.refresh_then("↻ refreshed");
        Ok(())
    }
}

struct Today;

#[async_trait]
impl CommandHandler for Today {
    async fn run(&self, _args: &str, ctx: &mut CommandContext<'_>) -> Result<()> {
        ctx.set_view(View::filter("today"));
        ctx.set_message("→ today");
        Ok(())
    }
}

struct Home;

#[async_trait]
impl CommandHandler for Home {
    async fn run(&self, _args: &str, ctx: &mut CommandContext<'_>) -> Result<()> {
        let home = ctx.home_filter.to_string();
        ctx.set_view(View::filter(home));
        ctx.set_message("→ home");
        Ok(())
    }
}

struct Quit;

#[async_trait]
impl CommandHandler for Quit {
    async fn run(&self, _args: &str, ctx: &mut CommandContext<'_>) -> Result<()> {
        ctx.exit();
        Ok(())
    }
}
