//! Load settings from the process environment and the routing table from JSON or the built-in table.

use crate::config::types::*;
use crate::config::{validate_path, validate_routes};
use crate::error::ConfigError;
use std::net::SocketAddr;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_BASE_PATH: &str = "/rr_inventory";
const DEFAULT_DB_SCHEMA: &str = "public";

/// The inventory site's pages: accounts, products, suppliers, warehouse and boxes.
pub fn builtin_routes() -> Vec<PageRoute> {
    let list = |path: &str, resource: &str, data_key: &str| PageRoute {
        path: path.into(),
        resource: resource.into(),
        data_key: Some(data_key.into()),
        detail: None,
    };
    vec![
        list("/accounts", "accounts", "table"),
        list("/products", "products", "table"),
        PageRoute {
            detail: Some(DetailRoute {
                key_field: "name".into(),
                data_key: None,
                render: RenderMode::Static,
                entries: None,
            }),
            ..list("/supplier", "suppliers", "suppliers")
        },
        list("/warehouse", "warehouse", "table"),
        PageRoute {
            detail: Some(DetailRoute {
                key_field: "name".into(),
                data_key: Some("box".into()),
                render: RenderMode::Static,
                entries: Some(vec!["Arm".into(), "Leg".into(), "Group Test".into()]),
            }),
            ..list("/warehouse/boxes", "boxes", "boxes")
        },
    ]
}

/// Parse a routes file body: a JSON array of routes.
pub fn parse_routes(json: &str) -> Result<Vec<PageRoute>, serde_json::Error> {
    serde_json::from_str(json)
}

pub fn load_routes_file(path: &str) -> Result<Vec<PageRoute>, ConfigError> {
    let body = std::fs::read_to_string(path).map_err(|e| ConfigError::RoutesFile {
        path: path.to_string(),
        reason: e.to_string(),
    })?;
    parse_routes(&body).map_err(|e| ConfigError::RoutesFile {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

/// Force every detail route into `mode`.
pub fn override_render_mode(routes: &mut [PageRoute], mode: RenderMode) {
    for detail in routes.iter_mut().filter_map(|r| r.detail.as_mut()) {
        detail.render = mode;
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build settings from a variable lookup. Empty values count as unset.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let backend = var("STORE_BACKEND").unwrap_or_else(|| "rest".into());
        let store = match backend.to_lowercase().as_str() {
            "rest" => StoreSettings::Rest {
                url: var("PUBLIC_SUPABASE_URL")
                    .or_else(|| var("SUPABASE_URL"))
                    .ok_or(ConfigError::MissingVar("PUBLIC_SUPABASE_URL"))?,
                key: var("PUBLIC_ANON_KEY")
                    .or_else(|| var("SUPABASE_ANON_KEY"))
                    .ok_or(ConfigError::MissingVar("PUBLIC_ANON_KEY"))?,
            },
            "postgres" => StoreSettings::Postgres {
                database_url: var("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                schema: var("DB_SCHEMA").unwrap_or_else(|| DEFAULT_DB_SCHEMA.into()),
            },
            other => {
                return Err(ConfigError::InvalidVar {
                    var: "STORE_BACKEND",
                    reason: format!("{} (expected rest or postgres)", other),
                })
            }
        };

        let bind_addr: SocketAddr = var("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.into())
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidVar {
                var: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        // An explicitly empty BASE_PATH mounts pages at the root.
        let base_path = match lookup("BASE_PATH") {
            Some(v) => v.trim().to_string(),
            None => DEFAULT_BASE_PATH.to_string(),
        };
        validate_path(&base_path, true).map_err(|reason| ConfigError::InvalidVar {
            var: "BASE_PATH",
            reason,
        })?;

        let mut routes = match var("ROUTES_PATH") {
            Some(path) => load_routes_file(&path)?,
            None => builtin_routes(),
        };
        if let Some(mode) = var("RENDER_MODE") {
            override_render_mode(&mut routes, mode.parse()?);
        }
        validate_routes(&routes)?;

        Ok(Settings {
            store,
            bind_addr,
            base_path,
            routes,
        })
    }
}
