use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::model::Task;
use crate::tui::constants::{
    APP_NAME, FIELD_LABEL_PAD, HELP_TOKEN, HINT_EDITING, HINT_IDLE, HINT_NAVIGATE, HINT_PAD,
    SPINNER_FRAMES,
};
use crate::tui::editor::{EditableField, FieldEditor};
use crate::tui::helpers::{
    content_spans, join_prefixed, pad_right, pluralize_items, priority_color, view_label,
};
use crate::tui::view::View;

use super::commands::{Command, CommandGroup};
use super::App;

const PROMPT: &str = "> ";

impl App {
    pub(crate) fn draw(&mut self, f: &mut Frame<'_>) {
        let size = f.size();
        f.render_widget(Clear, size);

        let hints = self.hint_lines();
        let input_height = if self.view.editor().is_some() { 0 } else { 1 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(input_height),
                Constraint::Length(to_u16(hints.len())),
            ])
            .split(size);

        self.draw_header(f, chunks[0]);
        match self.view() {
            View::Edit(editor) => draw_editor(f, chunks[1], editor),
            View::Filter { .. } | View::Project { .. } => self.draw_tasks(f, chunks[1]),
        }
        self.draw_status(f, chunks[2]);
        if input_height > 0 {
            self.draw_input(f, chunks[3]);
        }
        f.render_widget(Paragraph::new(hints), chunks[4]);
    }

    fn draw_header(&self, f: &mut Frame<'_>, area: Rect) {
        let label = view_label(&self.view, &self.home_filter, self.projects());
        let mut spans = vec![Span::styled(
            format!(
                "{} ∙ {} ∙ {}",
                APP_NAME,
                label,
                pluralize_items(self.tasks.len())
            ),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )];
        if self.is_loading() {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()],
                Style::default().fg(Color::Cyan),
            ));
        }
        f.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn draw_tasks(&self, f: &mut Frame<'_>, area: Rect) {
        let block = body_block();
        let lines: Vec<Line> = if self.tasks.is_empty() && !self.is_loading() {
            vec![Line::from(Span::styled(
                "Nothing here.",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            self.tasks
                .iter()
                .enumerate()
                .map(|(idx, task)| self.task_line(idx + 1, task))
                .collect()
        };
        f.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn task_line(&self, number: usize, task: &Task) -> Line<'static> {
        let mut spans = vec![Span::styled(
            format!("{}. ", number),
            Style::default().fg(Color::DarkGray),
        )];
        spans.extend(content_spans(&task.content, Style::default()));

        if let Some(name) = self.projects().name(&task.project_id) {
            spans.push(Span::styled(
                format!(" #{}", name),
                Style::default().fg(Color::Blue),
            ));
        }
        if !task.labels.is_empty() {
            spans.push(Span::styled(
                format!(" {}", join_prefixed(&task.labels, "@")),
                Style::default().fg(Color::Yellow),
            ));
        }
        if let Some(date) = task.due_date() {
            spans.push(Span::styled(
                format!(" {}", date),
                Style::default().fg(Color::Magenta),
            ));
        }
        let display = task.display_priority();
        if let Some(color) = priority_color(display) {
            spans.push(Span::styled(
                format!(" p{}", display),
                Style::default().fg(color),
            ));
        }
        Line::from(spans)
    }

    fn draw_status(&self, f: &mut Frame<'_>, area: Rect) {
        let line = match &self.status {
            Some(status) => Line::from(Span::styled(status.text().to_string(), status.style())),
            None => Line::default(),
        };
        f.render_widget(Paragraph::new(line), area);
    }

    fn draw_input(&self, f: &mut Frame<'_>, area: Rect) {
        let line = Line::from(vec![
            Span::styled(PROMPT, Style::default().fg(Color::Cyan)),
            Span::raw(self.input.as_str().to_string()),
        ]);
        f.render_widget(Paragraph::new(line), area);

        let x = area.x + to_u16(PROMPT.chars().count() + self.input.cursor_col());
        f.set_cursor(x.min(area.right().saturating_sub(1)), area.y);
    }

    fn hint_lines(&self) -> Vec<Line<'static>> {
        if let Some(editor) = self.view.editor() {
            let hint = if editor.is_editing() {
                HINT_EDITING
            } else {
                HINT_NAVIGATE
            };
            return vec![dim_line(hint.to_string())];
        }

        let typed = self.input.as_str().trim_start();
        if typed.is_empty() {
            return vec![dim_line(HINT_IDLE.to_string())];
        }
        if typed == HELP_TOKEN {
            return self.help_lines();
        }
        self.registry.suggestions(typed).map(hint_line).collect()
    }

    /// Every command, grouped, with a blank line between groups.
    fn help_lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for group in [CommandGroup::Tasks, CommandGroup::Views, CommandGroup::App] {
            let commands: Vec<&Command> = self
                .registry
                .iter()
                .filter(|command| command.group == group)
                .collect();
            if commands.is_empty() {
                continue;
            }
            if !lines.is_empty() {
                lines.push(Line::default());
            }
            lines.extend(commands.into_iter().map(hint_line));
        }
        lines
    }
}

fn draw_editor(f: &mut Frame<'_>, area: Rect, editor: &FieldEditor) {
    let block = body_block();
    let inner = block.inner(area);

    let lines: Vec<Line> = EditableField::ALL
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let selected = idx == editor.cursor();
            let marker = if selected { PROMPT } else { "  " };
            let label_style = if selected {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            let value_span = match editor.buffer().filter(|_| selected) {
                Some(buffer) => Span::styled(
                    buffer.as_str().to_string(),
                    Style::default().add_modifier(Modifier::UNDERLINED),
                ),
                None => {
                    let value = editor.value(*field);
                    let style = field
                        .color(value)
                        .map(|color| Style::default().fg(color))
                        .unwrap_or_default();
                    Span::styled(value.to_string(), style)
                }
            };

            Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Cyan)),
                Span::styled(pad_right(field.label(), FIELD_LABEL_PAD), label_style),
                value_span,
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);

    if let Some(buffer) = editor.buffer() {
        let col = PROMPT.chars().count() + FIELD_LABEL_PAD + buffer.cursor_col();
        let x = inner.x + to_u16(col);
        let y = inner.y + to_u16(editor.cursor());
        if x < inner.right() && y < inner.bottom() {
            f.set_cursor(x, y);
        }
    }
}

fn body_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
}

fn hint_line(command: &Command) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {}", pad_right(command.hint, HINT_PAD)),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(command.description, Style::default().fg(Color::DarkGray)),
    ])
}

fn dim_line(text: String) -> Line<'static> {
    Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}

fn to_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}
