//! Backing store seam: one query in, rows or a tagged failure out.
//!
//! Backends: [`RestStore`] (PostgREST / Supabase data API), [`PgStore`] (PostgreSQL
//! directly) and [`MemoryStore`] (in-process, for tests and local runs).

mod memory;
mod postgres;
mod rest;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use rest::RestStore;

use crate::error::StoreError;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// One row as returned by the store. Schema is opaque to this crate.
pub type Record = Map<String, Value>;

/// Column selection for a query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Columns {
    All,
    Only(Vec<String>),
    /// Named columns in the store's own text form (`::text`), the form equality filters compare
    /// against. Key enumeration uses this so every listed key matches its row again.
    Text(Vec<String>),
}

/// Equality predicate on one field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub value: String,
}

/// A single read against one resource. One query is one store round trip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    pub resource: String,
    pub columns: Columns,
    pub filter: Option<Filter>,
    pub limit: Option<u32>,
}

impl Query {
    /// `select *` from `resource`.
    pub fn all(resource: &str) -> Self {
        Query {
            resource: resource.to_string(),
            columns: Columns::All,
            filter: None,
            limit: None,
        }
    }

    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns = Columns::Only(columns.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn text_columns(mut self, columns: &[&str]) -> Self {
        self.columns = Columns::Text(columns.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn eq(mut self, field: &str, value: &str) -> Self {
        self.filter = Some(Filter {
            field: field.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn limit(mut self, n: u32) -> Self {
        self.limit = Some(n);
        self
    }
}

#[async_trait]
pub trait RowStore: Send + Sync {
    /// Run one select. Rows come back in store order.
    async fn select(&self, query: &Query) -> Result<Vec<Record>, StoreError>;

    /// Cheap round trip used by readiness checks.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Backend name for logs.
    fn describe(&self) -> &'static str;
}

/// Text form of a scalar cell, as it would compare under `::text`. Null, arrays and objects have none.
pub fn value_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Decode a JSON array of objects, as the REST API returns for a select.
pub(crate) fn decode_rows(body: &str) -> Result<Vec<Record>, StoreError> {
    let value: Value = serde_json::from_str(body).map_err(|e| StoreError::Decode(e.to_string()))?;
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(StoreError::Decode(format!(
                "expected an array of rows, got {}",
                json_kind(&other)
            )))
        }
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => Ok(map),
            other => Err(StoreError::Decode(format!(
                "expected a row object, got {}",
                json_kind(&other)
            ))),
        })
        .collect()
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_builder_sets_filter_and_limit() {
        let q = Query::all("boxes").eq("name", "Leg").limit(2);
        assert_eq!(q.resource, "boxes");
        assert_eq!(q.columns, Columns::All);
        assert_eq!(
            q.filter,
            Some(Filter {
                field: "name".into(),
                value: "Leg".into()
            })
        );
        assert_eq!(q.limit, Some(2));
    }

    #[test]
    fn value_text_covers_scalars_only() {
        assert_eq!(value_text(&json!("Arm")), Some("Arm".into()));
        assert_eq!(value_text(&json!(42)), Some("42".into()));
        assert_eq!(value_text(&json!(true)), Some("true".into()));
        assert_eq!(value_text(&json!(null)), None);
        assert_eq!(value_text(&json!({"a": 1})), None);
    }

    #[test]
    fn decode_rows_rejects_non_objects() {
        let rows = decode_rows(r#"[{"name":"Arm"},{"name":"Leg"}]"#).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["name"], json!("Leg"));

        assert!(matches!(decode_rows(r#"{"name":"Arm"}"#), Err(StoreError::Decode(_))));
        assert!(matches!(decode_rows("[1, 2]"), Err(StoreError::Decode(_))));
        assert!(matches!(decode_rows("not json"), Err(StoreError::Decode(_))));
    }
}
