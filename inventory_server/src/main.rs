//! Inventory page server: reads settings from the environment (and `.env`), connects the store,
//! prerenders static routes, then serves page data.

use inventory_pages::{app, AppState, PgStore, RestStore, RowLoader, RowStore, Settings, Snapshot, StoreSettings};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("inventory_pages=info,inventory_server=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    tracing::info!(store = ?settings.store, base_path = %settings.base_path, routes = settings.routes.len(), "settings loaded");

    let store: Arc<dyn RowStore> = match &settings.store {
        StoreSettings::Rest { url, key } => Arc::new(RestStore::new(url, key)?),
        StoreSettings::Postgres { database_url, schema } => Arc::new(PgStore::connect(database_url, schema).await?),
    };
    let loader = RowLoader::new(store);

    let snapshot = Snapshot::build(&loader, &settings.routes).await;
    tracing::info!(pages = snapshot.page_count(), "static pages ready");

    let state = AppState {
        loader,
        snapshot: Arc::new(snapshot),
    };
    let router = app(state, &settings.base_path, &settings.routes);

    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
