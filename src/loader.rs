//! Row loader: the data-loading contract between a page route and the store.
//!
//! Every call is one store round trip. Failures never propagate: collections degrade to empty,
//! single-row lookups to a [`Lookup`] that renders as an absent record. Each failure path logs
//! exactly one entry.

use crate::error::StoreError;
use crate::store::{value_text, Query, Record, RowStore};
use std::sync::Arc;

/// Outcome of a single-row lookup by slug.
#[derive(Debug)]
pub enum Lookup {
    Found(Record),
    NotFound,
    /// More than one row matched; `rows` is how many came back under the lookup limit.
    Ambiguous { rows: usize },
    Failed(StoreError),
}

impl Lookup {
    /// The record handed to the page. Every outcome except `Found` renders as absent.
    pub fn into_record(self) -> Option<Record> {
        match self {
            Lookup::Found(record) => Some(record),
            Lookup::NotFound | Lookup::Ambiguous { .. } | Lookup::Failed(_) => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}

#[derive(Clone)]
pub struct RowLoader {
    store: Arc<dyn RowStore>,
}

impl RowLoader {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        RowLoader { store }
    }

    pub fn store(&self) -> &dyn RowStore {
        self.store.as_ref()
    }

    /// All rows of `resource` in store order, or empty on failure.
    pub async fn load_collection(&self, resource: &str) -> Vec<Record> {
        match self.store.select(&Query::all(resource)).await {
            Ok(rows) => {
                tracing::debug!(resource, rows = rows.len(), "loaded collection");
                rows
            }
            Err(e) => {
                tracing::error!(resource, backend = self.store.describe(), error = %e, "store error loading collection");
                Vec::new()
            }
        }
    }

    /// The one row of `resource` whose `field` equals `value`.
    pub async fn load_one(&self, resource: &str, field: &str, value: &str) -> Lookup {
        let query = Query::all(resource).eq(field, value).limit(2);
        let mut rows = match self.store.select(&query).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!(resource, field, value, backend = self.store.describe(), error = %e, "store error loading record");
                return Lookup::Failed(e);
            }
        };
        match rows.len() {
            1 => Lookup::Found(rows.remove(0)),
            0 => {
                tracing::warn!(resource, field, value, "no record matches");
                Lookup::NotFound
            }
            n => {
                tracing::warn!(resource, field, value, rows = n, "more than one record matches");
                Lookup::Ambiguous { rows: n }
            }
        }
    }

    /// Every value of `key_field` across `resource`, for addressing detail pages ahead of time.
    /// Keys come back in the store's text form, the same form `load_one` matches against.
    /// Rows with a missing or null key are skipped.
    pub async fn enumerate_keys(&self, resource: &str, key_field: &str) -> Vec<String> {
        let query = Query::all(resource).text_columns(&[key_field]);
        match self.store.select(&query).await {
            Ok(rows) => rows
                .iter()
                .filter_map(|row| row.get(key_field).and_then(value_text))
                .collect(),
            Err(e) => {
                tracing::error!(resource, key_field, backend = self.store.describe(), error = %e, "store error enumerating keys");
                Vec::new()
            }
        }
    }
}
