//! Page data envelopes handed to the rendering layer.

use crate::store::Record;
use serde::Serialize;
use serde_json::{Map, Value};

/// `{ "<key>": value }`, the shape a page's data load returns.
pub fn page_data(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Value::Object(map)
}

pub fn records_value(records: Vec<Record>) -> Value {
    Value::Array(records.into_iter().map(Value::Object).collect())
}

#[derive(Serialize)]
pub struct Entry {
    pub slug: String,
}

#[derive(Serialize)]
pub struct EntriesBody {
    pub entries: Vec<Entry>,
}

impl EntriesBody {
    pub fn from_slugs(slugs: Vec<String>) -> Self {
        EntriesBody {
            entries: slugs.into_iter().map(|slug| Entry { slug }).collect(),
        }
    }
}
