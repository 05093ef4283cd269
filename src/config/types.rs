//! Settings and routing-table types. Route tables deserialize from the JSON routes file.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// How a detail route is served: from a snapshot built at startup, or with a store query per request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    Static,
    #[default]
    Dynamic,
}

impl std::str::FromStr for RenderMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "static" => Ok(RenderMode::Static),
            "dynamic" => Ok(RenderMode::Dynamic),
            _ => Err(ConfigError::InvalidVar {
                var: "RENDER_MODE",
                reason: format!("{} (expected static or dynamic)", s),
            }),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetailRoute {
    /// Field whose value is the slug, e.g. `name`.
    pub key_field: String,
    /// Key the record is published under; `record` when omitted.
    #[serde(default)]
    pub data_key: Option<String>,
    #[serde(default)]
    pub render: RenderMode,
    /// Fixed slugs to prerender instead of enumerating the store.
    #[serde(default)]
    pub entries: Option<Vec<String>>,
}

impl DetailRoute {
    pub fn data_key(&self) -> &str {
        self.data_key.as_deref().unwrap_or("record")
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageRoute {
    /// Path under the base path, e.g. `/warehouse/boxes`.
    pub path: String,
    pub resource: String,
    /// Key the list is published under; the resource name when omitted.
    #[serde(default)]
    pub data_key: Option<String>,
    #[serde(default)]
    pub detail: Option<DetailRoute>,
}

impl PageRoute {
    pub fn data_key(&self) -> &str {
        self.data_key.as_deref().unwrap_or(&self.resource)
    }

    pub fn is_static(&self) -> bool {
        self.detail
            .as_ref()
            .map(|d| d.render == RenderMode::Static)
            .unwrap_or(false)
    }
}

#[derive(Clone)]
pub enum StoreSettings {
    Rest { url: String, key: String },
    Postgres { database_url: String, schema: String },
}

impl std::fmt::Debug for StoreSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreSettings::Rest { url, .. } => f
                .debug_struct("Rest")
                .field("url", url)
                .field("key", &"<redacted>")
                .finish(),
            StoreSettings::Postgres { schema, .. } => f
                .debug_struct("Postgres")
                .field("database_url", &"<redacted>")
                .field("schema", schema)
                .finish(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub store: StoreSettings,
    pub bind_addr: SocketAddr,
    /// Prefix for all page routes; empty or `/segment...` without trailing slash.
    pub base_path: String,
    pub routes: Vec<PageRoute>,
}
