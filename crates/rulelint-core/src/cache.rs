use std::collections::HashMap;

/// Per-run memo of metric existence verdicts. Entries are never evicted.
#[derive(Debug, Clone, Default)]
pub struct ExistenceCache {
    verdicts: HashMap<String, bool>,
}

impl ExistenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, metric: &str) -> Option<bool> {
        self.verdicts.get(metric).copied()
    }

    pub fn put(&mut self, metric: impl Into<String>, exists: bool) {
        self.verdicts.insert(metric.into(), exists);
    }

    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }
}
