//! Shared application state for all routes. Built once at startup, read-only afterwards.

use crate::config::PageRoute;
use crate::loader::RowLoader;
use crate::prerender::Snapshot;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub loader: RowLoader,
    pub snapshot: Arc<Snapshot>,
}

/// State of one page route: the shared state plus the route it serves.
#[derive(Clone)]
pub struct PageState {
    pub app: AppState,
    pub route: Arc<PageRoute>,
}
