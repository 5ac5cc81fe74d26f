use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::api::{ApiError, TaskApi};
use crate::model::{Project, Task};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TaskSource {
    Filter(String),
    Project(String),
}

#[derive(Debug)]
pub(crate) struct RefreshData {
    pub(crate) tasks: Vec<Task>,
    pub(crate) projects: Option<Vec<Project>>,
}

#[derive(Debug)]
pub(crate) struct RefreshOutcome {
    pub(crate) generation: u64,
    pub(crate) result: Result<RefreshData, ApiError>,
}

/// Starts background fetches and decides which completed fetch is current.
///
/// Every start bumps the generation; only the outcome of the latest generation is
/// accepted, so a slow earlier fetch can never overwrite newer state.
pub(crate) struct Refresher {
    api: Arc<dyn TaskApi>,
    tx: UnboundedSender<RefreshOutcome>,
    generation: u64,
    pending: bool,
}

impl Refresher {
    pub(crate) fn new(api: Arc<dyn TaskApi>, tx: UnboundedSender<RefreshOutcome>) -> Self {
        Self {
            api,
            tx,
            generation: 0,
            pending: false,
        }
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.pending
    }

    pub(crate) fn start(&mut self, source: TaskSource, with_projects: bool) -> u64 {
        self.generation += 1;
        self.pending = true;
        let generation = self.generation;
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        debug!(generation, ?source, with_projects, "refresh started");

        tokio::spawn(async move {
            let (tasks, projects) = tokio::join!(fetch_tasks(api.as_ref(), &source), async {
                if with_projects {
                    Some(api.projects().await)
                } else {
                    None
                }
            });
            let result = match (tasks, projects.transpose()) {
                (Ok(tasks), Ok(projects)) => Ok(RefreshData { tasks, projects }),
                (Err(err), _) | (_, Err(err)) => Err(err),
            };
            // The receiver is gone once the UI has shut down.
            let _ = tx.send(RefreshOutcome { generation, result });
        });

        generation
    }

    /// Drops any in-flight refresh so its outcome is ignored.
    pub(crate) fn invalidate(&mut self) {
        self.generation += 1;
        self.pending = false;
    }

    /// Returns the outcome's result if it belongs to the latest refresh.
    pub(crate) fn accept(&mut self, outcome: RefreshOutcome) -> Option<Result<RefreshData, ApiError>> {
        if !self.pending || outcome.generation != self.generation {
            debug!(
                generation = outcome.generation,
                latest = self.generation,
                "discarding stale refresh"
            );
            return None;
        }
        self.pending = false;
        Some(outcome.result)
    }
}

async fn fetch_tasks(api: &dyn TaskApi, source: &TaskSource) -> Result<Vec<Task>, ApiError> {
    match source {
        TaskSource::Filter(query) => api.tasks_by_filter(query).await,
        TaskSource::Project(project_id) => api.tasks_by_project(project_id).await,
    }
}
