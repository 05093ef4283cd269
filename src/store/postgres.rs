//! Direct PostgreSQL backend for deployments that reach the database without the REST layer.

use super::{Query, Record, RowStore};
use crate::error::StoreError;
use crate::sql::select;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

pub struct PgStore {
    pool: PgPool,
    schema: String,
}

impl PgStore {
    pub async fn connect(database_url: &str, schema: &str) -> Result<Self, StoreError> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self::from_pool(pool, schema))
    }

    pub fn from_pool(pool: PgPool, schema: &str) -> Self {
        PgStore {
            pool,
            schema: schema.to_string(),
        }
    }
}

#[async_trait]
impl RowStore for PgStore {
    async fn select(&self, query: &Query) -> Result<Vec<Record>, StoreError> {
        let q = select(&self.schema, query);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut stmt = sqlx::query_scalar::<_, Value>(&q.sql);
        for p in &q.params {
            stmt = stmt.bind(p);
        }
        let rows = stmt.fetch_all(&self.pool).await?;
        rows.into_iter()
            .map(|row| match row {
                Value::Object(map) => Ok(map),
                other => Err(StoreError::Decode(format!("row_to_json returned {}", other))),
            })
            .collect()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }

    fn describe(&self) -> &'static str {
        "postgres"
    }
}
