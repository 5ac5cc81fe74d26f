use ratatui::style::Color;

use crate::model::{stored_priority, Task, TaskUpdate, MAX_PRIORITY};
use crate::tui::buffer::TextBuffer;
use crate::tui::helpers::priority_color;

const NO_DATE: &str = "no date";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EditableField {
    Title,
    Description,
    Due,
    Priority,
    Labels,
}

impl EditableField {
    pub(crate) const ALL: [EditableField; 5] = [
        EditableField::Title,
        EditableField::Description,
        EditableField::Due,
        EditableField::Priority,
        EditableField::Labels,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            EditableField::Title => "Title",
            EditableField::Description => "Description",
            EditableField::Due => "Due",
            EditableField::Priority => "Priority",
            EditableField::Labels => "Labels",
        }
    }

    /// Current value as shown in the editor.
    pub(crate) fn value(self, task: &Task) -> String {
        match self {
            EditableField::Title => task.content.clone(),
            EditableField::Description => task.description.clone(),
            EditableField::Due => task.due_string().to_string(),
            EditableField::Priority => task.display_priority().to_string(),
            EditableField::Labels => task.labels.join(", "),
        }
    }

    /// Builds the remote update for a raw value typed into the editor.
    pub(crate) fn update(self, raw: &str) -> TaskUpdate {
        match self {
            EditableField::Title => TaskUpdate::content(raw),
            EditableField::Description => TaskUpdate::description(raw),
            EditableField::Due => {
                if raw.trim().is_empty() {
                    TaskUpdate::due_string(NO_DATE)
                } else {
                    TaskUpdate::due_string(raw)
                }
            }
            EditableField::Priority => {
                let display = raw
                    .trim()
                    .parse::<u8>()
                    .ok()
                    .filter(|display| *display != 0)
                    .unwrap_or(MAX_PRIORITY);
                TaskUpdate::priority(stored_priority(display))
            }
            EditableField::Labels => TaskUpdate::labels(
                raw.split(',')
                    .map(str::trim)
                    .filter(|label| !label.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
        }
    }

    pub(crate) fn color(self, value: &str) -> Option<Color> {
        match self {
            EditableField::Title => None,
            EditableField::Description => Some(Color::Gray),
            EditableField::Due => Some(Color::Magenta),
            EditableField::Priority => value.trim().parse().ok().and_then(priority_color),
            EditableField::Labels => Some(Color::Yellow),
        }
    }
}

/// Cursor-driven editing of one task's fields. Either navigating or editing a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FieldEditor {
    task: Task,
    cursor: usize,
    values: Vec<String>,
    editing: Option<TextBuffer>,
}

impl FieldEditor {
    pub(crate) fn new(task: Task) -> Self {
        let values = EditableField::ALL
            .iter()
            .map(|field| field.value(&task))
            .collect();
        Self {
            task,
            cursor: 0,
            values,
            editing: None,
        }
    }

    pub(crate) fn task(&self) -> &Task {
        &self.task
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn current_field(&self) -> EditableField {
        EditableField::ALL[self.cursor]
    }

    pub(crate) fn value(&self, field: EditableField) -> &str {
        EditableField::ALL
            .iter()
            .position(|candidate| *candidate == field)
            .and_then(|idx| self.values.get(idx))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub(crate) fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub(crate) fn buffer(&self) -> Option<&TextBuffer> {
        self.editing.as_ref()
    }

    pub(crate) fn buffer_mut(&mut self) -> Option<&mut TextBuffer> {
        self.editing.as_mut()
    }

    pub(crate) fn move_up(&mut self) {
        if self.editing.is_none() {
            self.cursor = self.cursor.saturating_sub(1);
        }
    }

    pub(crate) fn move_down(&mut self) {
        if self.editing.is_none() {
            self.cursor = (self.cursor + 1).min(EditableField::ALL.len() - 1);
        }
    }

    /// Enters edit mode on the field under the cursor, seeded with its displayed value.
    pub(crate) fn begin_edit(&mut self) {
        if self.editing.is_some() {
            return;
        }
        let mut buffer = TextBuffer::new();
        buffer.set(self.values[self.cursor].clone());
        self.editing = Some(buffer);
    }

    pub(crate) fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// The field being edited and its raw value, if in edit mode.
    pub(crate) fn pending(&self) -> Option<(EditableField, String)> {
        self.editing
            .as_ref()
            .map(|buffer| (self.current_field(), buffer.as_str().to_string()))
    }

    /// Records a saved value for display and returns to navigation.
    pub(crate) fn commit(&mut self, field: EditableField, value: String) {
        if let Some(idx) = EditableField::ALL.iter().position(|f| *f == field) {
            self.values[idx] = value;
        }
        self.editing = None;
    }
}
