//! Page handlers: list, detail and entries for one configured route.

use crate::error::AppError;
use crate::response::{page_data, records_value, EntriesBody};
use crate::routes::ENTRIES_SUFFIX;
use crate::state::PageState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

pub async fn list_page(State(page): State<PageState>) -> Json<Value> {
    let rows = page.app.loader.load_collection(&page.route.resource).await;
    Json(page_data(page.route.data_key(), records_value(rows)))
}

pub async fn detail_page(
    State(page): State<PageState>,
    Path(slug): Path<String>,
) -> Result<Json<Value>, AppError> {
    let route = &page.route;
    let detail = route
        .detail
        .as_ref()
        .ok_or_else(|| AppError::NotFound(format!("{}/{}", route.path, slug)))?;
    let record = if route.is_static() {
        let record = page.app.snapshot.get(&route.path, &slug).cloned();
        if record.is_none() {
            tracing::warn!(path = %route.path, slug = %slug, "slug was not prerendered");
        }
        record
    } else {
        page.app
            .loader
            .load_one(&route.resource, &detail.key_field, &slug)
            .await
            .into_record()
    };
    Ok(Json(page_data(
        detail.data_key(),
        record.map(Value::Object).unwrap_or(Value::Null),
    )))
}

pub async fn entries_page(State(page): State<PageState>) -> Result<Json<EntriesBody>, AppError> {
    let route = &page.route;
    let detail = route
        .detail
        .as_ref()
        .ok_or_else(|| AppError::NotFound(format!("{}{}", route.path, ENTRIES_SUFFIX)))?;
    let slugs = if route.is_static() {
        page.app.snapshot.slugs(&route.path)
    } else {
        match &detail.entries {
            Some(entries) => entries.clone(),
            None => {
                page.app
                    .loader
                    .enumerate_keys(&route.resource, &detail.key_field)
                    .await
            }
        }
    };
    Ok(Json(EntriesBody::from_slugs(slugs)))
}
