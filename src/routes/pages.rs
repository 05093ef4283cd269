//! Page routes built from the routing table. Each route gets its own state carrying the route.

use crate::config::PageRoute;
use crate::handlers::pages::{detail_page, entries_page, list_page};
use crate::state::{AppState, PageState};
use axum::{routing::get, Router};
use std::sync::Arc;

/// Suffix of the path listing a detail route's addressable slugs, e.g. `/warehouse/boxes.entries`.
/// It sits beside `{path}/:slug` rather than under it, so every slug stays a detail page.
pub const ENTRIES_SUFFIX: &str = ".entries";

fn page_router(route: &PageRoute, state: AppState) -> Router {
    let page = PageState {
        app: state,
        route: Arc::new(route.clone()),
    };
    let mut router = Router::new().route(&route.path, get(list_page));
    if route.detail.is_some() {
        router = router
            .route(&format!("{}{}", route.path, ENTRIES_SUFFIX), get(entries_page))
            .route(&format!("{}/:slug", route.path), get(detail_page));
    }
    router.with_state(page)
}

/// All page routes, relative to the base path.
pub fn page_routes(routes: &[PageRoute], state: AppState) -> Router {
    routes
        .iter()
        .fold(Router::new(), |router, route| router.merge(page_router(route, state.clone())))
}
