use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::{ApiError, TaskApi};
use crate::model::{Project, Task, TaskUpdate};

pub const DEFAULT_BASE_URL: &str = "https://api.todoist.com/api/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct Page<T> {
    results: Vec<T>,
}

#[derive(Debug, Serialize)]
struct QuickAdd<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct MoveTask<'a> {
    project_id: &'a str,
}

/// HTTP client for the Todoist REST API.
#[derive(Debug, Clone)]
pub struct TodoistClient {
    http: Client,
    base_url: String,
    token: String,
}

impl TodoistClient {
    pub fn new(token: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(concat!("dewy/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        debug!(path, "GET");
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await?;
        decode(response).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(path, "POST");
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        decode(response).await
    }

    async fn post_discarding<B>(&self, path: &str, body: Option<&B>) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        debug!(path, "POST");
        let mut request = self.http.post(self.url(path)).bearer_auth(&self.token);
        if let Some(body) = body {
            request = request.json(body);
        }
        check_status(request.send().await?).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = check_status(response).await?.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl TaskApi for TodoistClient {
    async fn tasks_by_filter(&self, query: &str) -> Result<Vec<Task>, ApiError> {
        let page: Page<Task> = self.get("tasks/filter", &[("query", query)]).await?;
        Ok(page.results)
    }

    async fn tasks_by_project(&self, project_id: &str) -> Result<Vec<Task>, ApiError> {
        let page: Page<Task> = self.get("tasks", &[("project_id", project_id)]).await?;
        Ok(page.results)
    }

    async fn projects(&self) -> Result<Vec<Project>, ApiError> {
        let page: Page<Project> = self.get("projects", &[]).await?;
        Ok(page.results)
    }

    async fn quick_add(&self, text: &str) -> Result<Task, ApiError> {
        self.post("tasks/quick", &QuickAdd { text }).await
    }

    async fn close_task(&self, id: &str) -> Result<(), ApiError> {
        self.post_discarding::<()>(&format!("tasks/{id}/close"), None)
            .await
    }

    async fn update_task(&self, id: &str, update: &TaskUpdate) -> Result<Task, ApiError> {
        self.post(&format!("tasks/{id}"), update).await
    }

    async fn move_task(&self, id: &str, project_id: &str) -> Result<(), ApiError> {
        self.post_discarding(&format!("tasks/{id}/move"), Some(&MoveTask { project_id }))
            .await
    }
}
