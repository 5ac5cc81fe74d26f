use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::model::ProjectMap;

pub const PROJECT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}

/// Project names kept between refreshes, refetched once older than the TTL.
pub struct ProjectCache {
    projects: ProjectMap,
    fetched_at: Option<Instant>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl ProjectCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            projects: ProjectMap::default(),
            fetched_at: None,
            ttl,
            clock,
        }
    }

    pub fn is_stale(&self) -> bool {
        match self.fetched_at {
            None => true,
            Some(at) => self.clock.now().saturating_duration_since(at) > self.ttl,
        }
    }

    pub fn store(&mut self, projects: ProjectMap) {
        self.projects = projects;
        self.fetched_at = Some(self.clock.now());
    }

    pub fn projects(&self) -> &ProjectMap {
        &self.projects
    }
}

impl std::fmt::Debug for ProjectCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectCache")
            .field("projects", &self.projects.len())
            .field("fetched_at", &self.fetched_at)
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Project;

    fn cache() -> (ProjectCache, ManualClock) {
        let clock = ManualClock::new();
        let cache = ProjectCache::new(PROJECT_CACHE_TTL, Arc::new(clock.clone()));
        (cache, clock)
    }

    fn sample() -> ProjectMap {
        vec![Project {
            id: "1".into(),
            name: "Inbox".into(),
        }]
        .into_iter()
        .collect()
    }

    #[test]
    fn empty_cache_is_stale() {
        let (cache, _clock) = cache();
        assert!(cache.is_stale());
        assert!(cache.projects().is_empty());
    }

    #[test]
    fn stored_projects_stay_fresh_within_ttl() {
        let (mut cache, clock) = cache();
        cache.store(sample());
        clock.advance(Duration::from_secs(299));
        assert!(!cache.is_stale());
        clock.advance(PROJECT_CACHE_TTL);
        assert!(cache.is_stale());
        assert_eq!(cache.projects().name("1"), Some("Inbox"));
    }

    #[test]
    fn exactly_ttl_old_is_not_stale() {
        let (mut cache, clock) = cache();
        cache.store(sample());
        clock.advance(PROJECT_CACHE_TTL);
        assert!(!cache.is_stale());
    }
}
