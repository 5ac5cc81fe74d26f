pub mod api;
pub mod cache;
pub mod config;
pub mod format;
pub mod model;
pub mod todoist;

pub use api::{ApiError, TaskApi};
pub use cache::{Clock, ManualClock, ProjectCache, SystemClock, PROJECT_CACHE_TTL};
pub use config::{AppConfig, ConfigError};
pub use format::{parse_links, Segment};
pub use model::*;
pub use todoist::TodoistClient;
