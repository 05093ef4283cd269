//! Inventory pages: page data for the inventory site, loaded from a PostgREST or PostgreSQL store.

pub mod config;
pub mod error;
pub mod handlers;
pub mod loader;
pub mod prerender;
pub mod response;
pub mod routes;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{builtin_routes, PageRoute, RenderMode, Settings, StoreSettings};
pub use error::{AppError, ConfigError, StoreError};
pub use loader::{Lookup, RowLoader};
pub use prerender::Snapshot;
pub use routes::{app, common_routes, page_routes};
pub use state::AppState;
pub use store::{MemoryStore, PgStore, Record, RestStore, RowStore};
