#![allow(dead_code)]

use inventory_pages::{MemoryStore, Record};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::layer::Context;
use tracing_subscriber::prelude::*;

pub fn row(v: Value) -> Record {
    v.as_object().cloned().expect("row literal must be an object")
}

/// The inventory fixture: three boxes, no suppliers, a couple of rows elsewhere.
pub fn inventory() -> MemoryStore {
    MemoryStore::new()
        .with_resource(
            "boxes",
            vec![
                row(json!({"id": 1, "name": "Arm", "location": "A1", "quantity": 12})),
                row(json!({"id": 2, "name": "Leg", "location": "A2", "quantity": 3})),
                row(json!({"id": 3, "name": "Group Test", "location": null, "quantity": 0})),
            ],
        )
        .with_resource("suppliers", vec![])
        .with_resource(
            "accounts",
            vec![row(json!({"id": 1, "email": "ops@example.com", "role": "admin"}))],
        )
        .with_resource(
            "products",
            vec![
                row(json!({"sku": "P-1", "name": "Bolt", "price": 0.25})),
                row(json!({"sku": "P-2", "name": "Nut", "price": 0.1})),
            ],
        )
        .with_resource("warehouse", vec![row(json!({"name": "Main", "boxes": 3}))])
}

struct CountWarnings(Arc<AtomicUsize>);

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for CountWarnings {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() <= Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Count warn and error events on this thread while the guard lives.
pub fn count_warnings() -> (Arc<AtomicUsize>, tracing::subscriber::DefaultGuard) {
    let count = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(CountWarnings(count.clone()));
    let guard = tracing::subscriber::set_default(subscriber);
    (count, guard)
}
