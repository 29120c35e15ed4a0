use crate::backend::{MetricsBackend, TimeRange, name_matcher};
use crate::cache::ExistenceCache;
use crate::error::{LintError, Result};

/// Answers "has this metric ever had samples?" with at most one backend
/// lookup per metric name.
#[derive(Debug)]
pub struct ExistenceChecker<B> {
    backend: B,
    cache: ExistenceCache,
    backend_calls: usize,
    cache_hits: usize,
}

impl<B: MetricsBackend> ExistenceChecker<B> {
    pub fn new(backend: B) -> Self {
        Self::with_cache(backend, ExistenceCache::new())
    }

    pub fn with_cache(backend: B, cache: ExistenceCache) -> Self {
        Self {
            backend,
            cache,
            backend_calls: 0,
            cache_hits: 0,
        }
    }

    /// Failed lookups are not cached, so the next call for the same name
    /// asks the backend again.
    pub fn exists(&mut self, metric: &str) -> Result<bool> {
        if let Some(exists) = self.cache.get(metric) {
            self.cache_hits += 1;
            log::debug!("cache hit for {metric:?}: exists={exists}");
            return Ok(exists);
        }

        self.backend_calls += 1;
        let range = TimeRange::lifetime_until_now();
        let series = self
            .backend
            .series(&name_matcher(metric), &range)
            .map_err(|err| LintError::metric_lookup(metric, err))?;
        let exists = !series.is_empty();
        log::debug!("{metric:?} matched {} series", series.len());
        self.cache.put(metric, exists);
        Ok(exists)
    }

    pub fn cache(&self) -> &ExistenceCache {
        &self.cache
    }

    pub fn into_cache(self) -> ExistenceCache {
        self.cache
    }

    pub const fn backend_calls(&self) -> usize {
        self.backend_calls
    }

    pub const fn cache_hits(&self) -> usize {
        self.cache_hits
    }
}
