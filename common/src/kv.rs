use crate::{App, Result};
use itertools::Itertools;
use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

pub type KeyValue = (String, String);

/// The reduce partition owning `key`. Stable across workers of the same build.
pub fn partition(key: &str, n_reduce: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish() % n_reduce
}

pub fn format_kv(k: &str, v: &str) -> String {
    format!("{}\t{}\n", k, v)
}

/// Sorts by key and reduces each group, one output pair per distinct key.
pub fn reduce_groups(app: &dyn App, mut kvs: Vec<KeyValue>) -> Result<Vec<KeyValue>> {
    kvs.sort();

    let mut output = Vec::new();
    for (k, group) in &kvs.into_iter().group_by(|kv| kv.0.clone()) {
        let values = group.map(|kv| kv.1).collect_vec();
        let reduced = app.reduce(k.clone(), values)?;
        output.push((k, reduced));
    }
    Ok(output)
}

/// Map-side pre-aggregation. A no-op for apps without a combiner.
pub fn combine(app: &dyn App, kvs: Vec<KeyValue>) -> Result<Vec<KeyValue>> {
    if app.combines() {
        reduce_groups(app, kvs)
    } else {
        Ok(kvs)
    }
}
