use serde::{Deserialize, Serialize};

/// Lowest priority on the stored scale (shown to users as `p4`).
pub const MIN_PRIORITY: u8 = 1;
/// Highest priority on the stored scale (shown to users as `p1`).
pub const MAX_PRIORITY: u8 = 4;

/// Converts a stored priority (4 = most urgent) into the display scale (1 = most urgent).
pub fn display_priority(stored: u8) -> u8 {
    5 - stored.clamp(MIN_PRIORITY, MAX_PRIORITY)
}

/// Converts a display priority back to the stored scale, clamped to `[1, 4]`.
pub fn stored_priority(display: u8) -> u8 {
    5u8.saturating_sub(display).clamp(MIN_PRIORITY, MAX_PRIORITY)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Due {
    #[serde(default)]
    pub string: String,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due: Option<Due>,
    #[serde(default = "default_priority")]
    pub priority: u8,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub project_id: String,
}

fn default_priority() -> u8 {
    MIN_PRIORITY
}

impl Task {
    pub fn display_priority(&self) -> u8 {
        display_priority(self.priority)
    }

    pub fn due_string(&self) -> &str {
        self.due.as_ref().map(|due| due.string.as_str()).unwrap_or("")
    }

    pub fn due_date(&self) -> Option<&str> {
        self.due.as_ref().and_then(|due| due.date.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
}

/// Project id to display name lookup, kept in the order the service listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectMap {
    projects: Vec<Project>,
}

impl ProjectMap {
    pub fn name(&self, id: &str) -> Option<&str> {
        self.projects
            .iter()
            .find(|project| project.id == id)
            .map(|project| project.name.as_str())
    }

    /// Resolves a project name, ignoring case, to its id. On a tie the first listed project wins.
    pub fn find_by_name(&self, name: &str) -> Option<&str> {
        let wanted = name.trim().to_lowercase();
        self.projects
            .iter()
            .find(|project| project.name.to_lowercase() == wanted)
            .map(|project| project.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

impl FromIterator<Project> for ProjectMap {
    fn from_iter<I: IntoIterator<Item = Project>>(iter: I) -> Self {
        Self {
            projects: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(1, 4)]
    #[case(2, 3)]
    #[case(3, 2)]
    #[case(4, 1)]
    fn display_and_stored_scales_are_inverse(#[case] display: u8, #[case] stored: u8) {
        assert_eq!(stored_priority(display), stored);
        assert_eq!(display_priority(stored), display);
    }

    #[test]
    fn stored_priority_clamps_out_of_range_values() {
        assert_eq!(stored_priority(0), MAX_PRIORITY);
        assert_eq!(stored_priority(9), MIN_PRIORITY);
    }

    #[test]
    fn task_deserializes_from_api_payload() {
        let raw = r#"{
            "id": "6X7rM8997g3RQmvh",
            "content": "Buy milk",
            "description": "",
            "due": {"string": "every day", "date": "2026-10-18", "is_recurring": true},
            "priority": 4,
            "labels": ["errands"],
            "project_id": "6Jf8VQXxpwv56VQ7",
            "checked": false
        }"#;

        let task: Task = serde_json::from_str(raw).expect("task json");

        assert_eq!(task.content, "Buy milk");
        assert_eq!(task.due_string(), "every day");
        assert_eq!(task.due_date(), Some("2026-10-18"));
        assert_eq!(task.display_priority(), 1);
        assert_eq!(task.labels, vec!["errands".to_string()]);
    }

    #[test]
    fn project_lookup_ignores_case() {
        let projects: ProjectMap = vec![
            Project {
                id: "p1".into(),
                name: "Inbox".into(),
            },
            Project {
                id: "p2".into(),
                name: "Side Quests".into(),
            },
        ]
        .into_iter()
        .collect();

        assert_eq!(projects.find_by_name("side quests"), Some("p2"));
        assert_eq!(projects.name("p1"), Some("Inbox"));
        assert_eq!(projects.find_by_name("Work"), None);
    }

    #[test]
    fn project_lookup_prefers_first_listed_on_case_tie() {
        let projects: ProjectMap = vec![
            Project {
                id: "p7".into(),
                name: "work".into(),
            },
            Project {
                id: "p3".into(),
                name: "Work".into(),
            },
        ]
        .into_iter()
        .collect();

        assert_eq!(projects.find_by_name("WORK"), Some("p7"));
        assert_eq!(projects.len(), 2);
    }

    #[test]
    fn update_serializes_only_present_fields() {
        let update = TaskUpdate::due_string("tomorrow");
        let json = serde_json::to_value(&update).expect("serialize");
        assert_eq!(json, serde_json::json!({ "due_string": "tomorrow" }));
    }
}
