use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

use crate::format::{parse_links, Segment};
use crate::model::ProjectMap;
use crate::tui::view::View;

/// Color for a display priority (1 = most urgent); p4 is unstyled.
pub fn priority_color(display: u8) -> Option<Color> {
    match display {
        1 => Some(Color::Red),
        2 => Some(Color::Yellow),
        3 => Some(Color::Blue),
        _ => None,
    }
}

pub fn join_prefixed(values: &[String], prefix: &str) -> String {
    values
        .iter()
        .map(|v| format!("{}{}", prefix, v))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn pluralize_items(count: usize) -> String {
    format!("{} {}", count, if count == 1 { "item" } else { "items" })
}

/// Title label for the header: `home` for the home filter, the project name for project views.
pub(crate) fn view_label(view: &View, home_filter: &str, projects: &ProjectMap) -> String {
    match view {
        View::Filter { query } if query == home_filter => String::from("home"),
        View::Filter { query } => query.clone(),
        View::Project { project_id } => match projects.name(project_id) {
            Some(name) => format!("#{}", name),
            None => format!("#{}", project_id),
        },
        View::Edit(editor) => format!("edit ∙ {}", editor.task().content),
    }
}

/// Renders task text with links shown as `↗ label` in cyan.
pub fn content_spans(text: &str, style: Style) -> Vec<Span<'static>> {
    parse_links(text)
        .into_iter()
        .map(|segment| match segment {
            Segment::Text(text) => Span::styled(text, style),
            Segment::Link { text, .. } => Span::styled(
                format!("↗ {}", text),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::UNDERLINED),
            ),
        })
        .collect()
}

pub fn pad_right(text: &str, width: usize) -> String {
    format!("{:<width$}", text, width = width)
}
