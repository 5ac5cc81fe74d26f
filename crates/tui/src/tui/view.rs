use crate::tui::editor::FieldEditor;
use crate::tui::refresh::TaskSource;

/// The active screen. Switching views is the only way to change what is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum View {
    Filter { query: String },
    Project { project_id: String },
    Edit(Box<FieldEditor>),
}

impl View {
    pub(crate) fn filter(query: impl Into<String>) -> Self {
        View::Filter {
            query: query.into(),
        }
    }

    /// What a refresh of this view fetches; `None` while editing, where refresh is suppressed.
    pub(crate) fn task_source(&self) -> Option<TaskSource> {
        match self {
            View::Filter { query } => Some(TaskSource::Filter(query.clone())),
            View::Project { project_id } => Some(TaskSource::Project(project_id.clone())),
            View::Edit(_) => None,
        }
    }

    pub(crate) fn editor(&self) -> Option<&FieldEditor> {
        match self {
            View::Edit(editor) => Some(editor),
            View::Filter { .. } | View::Project { .. } => None,
        }
    }

    pub(crate) fn editor_mut(&mut self) -> Option<&mut FieldEditor> {
        match self {
            View::Edit(editor) => Some(editor),
            View::Filter { .. } | View::Project { .. } => None,
        }
    }
}
