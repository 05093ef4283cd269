//! RestStore against an in-process fake of the PostgREST endpoint.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use inventory_pages::store::Query as StoreQuery;
use inventory_pages::{RestStore, RowLoader, RowStore, StoreError};
use serde_json::{json, Map, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

const KEY: &str = "test-anon-key";

#[derive(Clone, Default)]
struct Fake {
    requests: Arc<Mutex<Vec<Vec<(String, String)>>>>,
}

fn boxes() -> Vec<Value> {
    vec![
        json!({"id": 1, "name": "Arm", "quantity": 12}),
        json!({"id": 2, "name": "Leg", "quantity": 3}),
        json!({"id": 3, "name": "Group Test", "quantity": 0}),
    ]
}

fn authorized(headers: &HeaderMap) -> bool {
    let apikey = headers.get("apikey").and_then(|v| v.to_str().ok());
    let bearer = headers.get("authorization").and_then(|v| v.to_str().ok());
    apikey == Some(KEY) && bearer == Some(format!("Bearer {}", KEY).as_str())
}

fn cell_text(v: &Value) -> String {
    v.as_str().map(String::from).unwrap_or_else(|| v.to_string())
}

async fn table(
    State(fake): State<Fake>,
    Path(resource): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Response {
    fake.requests.lock().unwrap().push(params.clone());
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Invalid API key"}))).into_response();
    }
    let rows = match resource.as_str() {
        "boxes" => boxes(),
        "suppliers" => vec![],
        "broken" => return Json(json!({"unexpected": true})).into_response(),
        other => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "code": "42P01",
                    "details": null,
                    "hint": null,
                    "message": format!("relation \"public.{}\" does not exist", other)
                })),
            )
                .into_response()
        }
    };

    let mut select = "*".to_string();
    let mut limit = usize::MAX;
    let mut filters = Vec::new();
    for (k, v) in params {
        match k.as_str() {
            "select" => select = v,
            "limit" => limit = v.parse().unwrap(),
            _ => filters.push((k, v.strip_prefix("eq.").unwrap().to_string())),
        }
    }
    let out: Vec<Value> = rows
        .into_iter()
        .filter(|row| {
            filters
                .iter()
                .all(|(f, v)| row.get(f).map(cell_text).as_deref() == Some(v.as_str()))
        })
        .take(limit)
        .map(|row| {
            if select == "*" {
                return row;
            }
            // `col::text` projects the column as text under its own name.
            let projected: Map<String, Value> = select
                .split(',')
                .filter_map(|col| {
                    let (name, as_text) = match col.strip_suffix("::text") {
                        Some(name) => (name, true),
                        None => (col, false),
                    };
                    let cell = row.get(name)?;
                    let cell = if as_text { Value::String(cell_text(cell)) } else { cell.clone() };
                    Some((name.to_string(), cell))
                })
                .collect();
            Value::Object(projected)
        })
        .collect();
    Json(out).into_response()
}

async fn root(headers: HeaderMap) -> StatusCode {
    if authorized(&headers) {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    }
}

async fn serve_fake() -> (SocketAddr, Fake) {
    let fake = Fake::default();
    let router = Router::new()
        .route("/rest/v1/", get(root))
        .route("/rest/v1/:resource", get(table))
        .with_state(fake.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (addr, fake)
}

#[tokio::test]
async fn loads_through_rest() {
    let (addr, fake) = serve_fake().await;
    let store = RestStore::new(&format!("http://{}/", addr), KEY).unwrap();
    let loader = RowLoader::new(Arc::new(store));

    assert_eq!(loader.load_collection("boxes").await.len(), 3);
    assert!(loader.load_collection("suppliers").await.is_empty());
    assert_eq!(
        loader.enumerate_keys("boxes", "name").await,
        vec!["Arm", "Leg", "Group Test"]
    );
    let record = loader.load_one("boxes", "name", "Group Test").await.into_record().unwrap();
    assert_eq!(Value::Object(record), json!({"id": 3, "name": "Group Test", "quantity": 0}));

    let requests = fake.requests.lock().unwrap().clone();
    assert_eq!(requests[0], vec![("select".to_string(), "*".to_string())]);
    assert_eq!(requests[2], vec![("select".to_string(), "name::text".to_string())]);
    assert_eq!(
        requests[3],
        vec![
            ("select".to_string(), "*".to_string()),
            ("name".to_string(), "eq.Group Test".to_string()),
            ("limit".to_string(), "2".to_string()),
        ]
    );
}

#[tokio::test]
async fn numeric_keys_enumerate_as_text_and_resolve() {
    let (addr, _) = serve_fake().await;
    let loader = RowLoader::new(Arc::new(RestStore::new(&format!("http://{}", addr), KEY).unwrap()));
    let keys = loader.enumerate_keys("boxes", "quantity").await;
    assert_eq!(keys, vec!["12", "3", "0"]);
    for key in keys {
        assert!(loader.load_one("boxes", "quantity", &key).await.is_found(), "{}", key);
    }
}

#[tokio::test]
async fn status_errors_carry_postgrest_message() {
    let (addr, _) = serve_fake().await;
    let store = RestStore::new(&format!("http://{}", addr), KEY).unwrap();
    match store.select(&StoreQuery::all("pallets")).await {
        Err(StoreError::Status { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "relation \"public.pallets\" does not exist");
        }
        other => panic!("expected status error, got {:?}", other),
    }

    let wrong_key = RestStore::new(&format!("http://{}", addr), "nope").unwrap();
    assert!(matches!(
        wrong_key.select(&StoreQuery::all("boxes")).await,
        Err(StoreError::Status { status: 401, .. })
    ));
    assert!(wrong_key.ping().await.is_err());
    assert!(store.ping().await.is_ok());
}

#[tokio::test]
async fn non_array_body_is_a_decode_error() {
    let (addr, _) = serve_fake().await;
    let store = RestStore::new(&format!("http://{}", addr), KEY).unwrap();
    assert!(matches!(
        store.select(&StoreQuery::all("broken")).await,
        Err(StoreError::Decode(_))
    ));
}

#[tokio::test]
async fn closed_port_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = RestStore::new(&format!("http://{}", addr), KEY).unwrap();
    assert!(matches!(
        store.select(&StoreQuery::all("boxes")).await,
        Err(StoreError::Transport(_))
    ));
    let loader = RowLoader::new(Arc::new(store));
    assert!(loader.load_collection("boxes").await.is_empty());
    assert!(loader.load_one("boxes", "name", "Arm").await.into_record().is_none());
}
