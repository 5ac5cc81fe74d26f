use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Project, Task, TaskUpdate};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Operations consumed from the hosted task service. Every call is fallible.
#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn tasks_by_filter(&self, query: &str) -> Result<Vec<Task>, ApiError>;

    async fn tasks_by_project(&self, project_id: &str) -> Result<Vec<Task>, ApiError>;

    async fn projects(&self) -> Result<Vec<Project>, ApiError>;

    /// Creates a task from free text; the service parses dates, projects and labels.
    async fn quick_add(&self, text: &str) -> Result<Task, ApiError>;

    async fn close_task(&self, id: &str) -> Result<(), ApiError>;

    async fn update_task(&self, id: &str, update: &TaskUpdate) -> Result<Task, ApiError>;

    async fn move_task(&self, id: &str, project_id: &str) -> Result<(), ApiError>;
}
