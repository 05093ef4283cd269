//! Router assembly: common routes at the root, page routes under the base path.

mod common;
mod pages;

pub use common::common_routes;
pub use pages::{page_routes, ENTRIES_SUFFIX};

use crate::config::PageRoute;
use crate::error::AppError;
use crate::state::AppState;
use axum::{http::Uri, Router};
use tower_http::trace::TraceLayer;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

/// The full application. `base_path` is empty or `/segment...` (validated at config load).
pub fn app(state: AppState, base_path: &str, routes: &[PageRoute]) -> Router {
    let pages = page_routes(routes, state.clone());
    let router = if base_path.is_empty() {
        common_routes(state).merge(pages)
    } else {
        common_routes(state).nest(base_path, pages)
    };
    router.fallback(not_found).layer(TraceLayer::new_for_http())
}
