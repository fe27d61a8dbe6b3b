use dashmap::DashMap;
use std::collections::BTreeMap;

/// Named job counters shared by every task of a run.
#[derive(Debug, Default)]
pub struct Counters {
    inner: DashMap<String, u64>,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, name: &str, n: u64) {
        *self.inner.entry(name.to_owned()).or_insert(0) += n;
    }

    pub fn get(&self, name: &str) -> u64 {
        self.inner.get(name).map(|count| *count).unwrap_or(0)
    }

    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        self.inner
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }
}
