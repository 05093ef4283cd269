//! In-process store. Stands in for the real backend in tests and local runs.

use super::{value_text, Columns, Query, Record, RowStore};
use crate::error::StoreError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

#[derive(Default)]
pub struct MemoryStore {
    resources: RwLock<HashMap<String, Vec<Record>>>,
    unreachable: AtomicBool,
    selects: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`MemoryStore::set_resource`].
    pub fn with_resource(self, name: &str, rows: Vec<Record>) -> Self {
        self.set_resource(name, rows);
        self
    }

    /// Replace all rows of `name`, creating the resource if needed.
    pub fn set_resource(&self, name: &str, rows: Vec<Record>) {
        let mut guard = self.resources.write().unwrap_or_else(PoisonError::into_inner);
        guard.insert(name.to_string(), rows);
    }

    /// When set, every call fails as if the network were down.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Number of `select` calls served so far, failed ones included.
    pub fn select_count(&self) -> usize {
        self.selects.load(Ordering::SeqCst)
    }

    fn check_reachable(&self) -> Result<(), StoreError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(StoreError::Transport("connection refused".into()));
        }
        Ok(())
    }
}

fn project(row: &Record, columns: &Columns) -> Record {
    match columns {
        Columns::All => row.clone(),
        Columns::Only(cols) => cols
            .iter()
            .filter_map(|c| row.get(c).map(|v| (c.clone(), v.clone())))
            .collect(),
        Columns::Text(cols) => cols
            .iter()
            .filter_map(|c| {
                let text = row.get(c)?;
                Some((c.clone(), value_text(text).map(Value::String).unwrap_or(Value::Null)))
            })
            .collect(),
    }
}

#[async_trait]
impl RowStore for MemoryStore {
    async fn select(&self, query: &Query) -> Result<Vec<Record>, StoreError> {
        self.selects.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        let guard = self.resources.read().unwrap_or_else(PoisonError::into_inner);
        let rows = guard.get(&query.resource).ok_or_else(|| StoreError::Status {
            status: 404,
            message: format!("relation \"public.{}\" does not exist", query.resource),
        })?;
        let limit = query.limit.map(|n| n as usize).unwrap_or(usize::MAX);
        Ok(rows
            .iter()
            .filter(|row| match &query.filter {
                Some(f) => row.get(&f.field).and_then(value_text).as_deref() == Some(f.value.as_str()),
                None => true,
            })
            .take(limit)
            .map(|row| project(row, &query.columns))
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_reachable()
    }

    fn describe(&self) -> &'static str {
        "memory"
    }
}
