//! Builds parameterized SELECT statements from a store [`Query`].

use crate::store::{Columns, Query};

/// Quote identifier for PostgreSQL.
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full qualified table name.
fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<String>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: String) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v);
        n
    }
}

fn select_column_list(columns: &Columns) -> String {
    match columns {
        Columns::All => "*".to_string(),
        Columns::Only(cols) => cols.iter().map(|c| quoted(c)).collect::<Vec<_>>().join(", "),
        Columns::Text(cols) => cols
            .iter()
            .map(|c| format!("{}::text AS {}", quoted(c), quoted(c)))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// SELECT with optional equality filter and LIMIT, each row folded into one JSON object by
/// `row_to_json` so cells keep the representation PostgreSQL gives them (numeric, timestamps, enums).
/// The filter compares the column's text form so a slug matches text, integer and uuid keys alike.
pub fn select(schema: &str, query: &Query) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = qualified_table(schema, &query.resource);
    let cols = select_column_list(&query.columns);

    let where_clause = match &query.filter {
        Some(filter) => {
            let n = q.push_param(filter.value.clone());
            format!(" WHERE {}::text = ${}", quoted(&filter.field), n)
        }
        None => String::new(),
    };
    let limit_clause = query.limit.map(|n| format!(" LIMIT {}", n)).unwrap_or_default();

    q.sql = format!(
        "SELECT row_to_json(sub) FROM (SELECT {} FROM {}{}{}) sub",
        cols, table, where_clause, limit_clause
    );
    q
}
