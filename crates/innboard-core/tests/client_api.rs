//! End-to-end tests against an in-process mock API
//!
//! Each test spins up its own axum router on an ephemeral port and points a
//! real client at it, so the wire shapes (envelopes, bare auth bodies,
//! query strings, bearer headers) are exercised exactly as production sees
//! them.

use axum::extract::{Path, RawQuery};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use innboard_core::models::FilterField;
use innboard_core::pages::{InventoryPage, RoomTypesPage, RoomsPage};
use innboard_core::{
    ApiClient, ApiConfig, CoreError, DataEvent, EventBus, PropertyStore, SessionPhase,
    SessionStore,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/api")
}

fn client_for(base: &str) -> Arc<ApiClient> {
    Arc::new(ApiClient::new(ApiConfig::with_base_url(base)).unwrap())
}

fn ok(data: Value) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}

fn login_router() -> Router {
    Router::new().route(
        "/api/auth/login",
        post(|Json(body): Json<Value>| async move {
            if body["email"] == "a@b.com" && body["password"] == "x" {
                Json(json!({
                    "token": "t1",
                    "user": { "_id": "u1", "name": "Admin", "email": "a@b.com" }
                }))
                .into_response()
            } else {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "message": "Invalid credentials" })),
                )
                    .into_response()
            }
        }),
    )
}

// ============================================================================
// Session
// ============================================================================

#[tokio::test]
async fn test_login_persists_token_and_signs_in() {
    let base = serve(login_router()).await;
    let dir = tempfile::tempdir().unwrap();
    let client = client_for(&base);
    let session = SessionStore::with_config_dir(client.clone(), EventBus::default(), dir.path());

    let user = session.login("a@b.com", "x").await.unwrap();
    assert_eq!(user.display_name(), "Admin");
    assert_eq!(session.phase(), SessionPhase::SignedIn);
    assert!(client.has_token());

    let saved = std::fs::read_to_string(dir.path().join("session.json")).unwrap();
    assert!(saved.contains("t1"));
}

#[tokio::test]
async fn test_login_failure_surfaces_server_message() {
    let base = serve(login_router()).await;
    let dir = tempfile::tempdir().unwrap();
    let client = client_for(&base);
    let session = SessionStore::with_config_dir(client.clone(), EventBus::default(), dir.path());

    let err = session.login("a@b.com", "wrong").await.unwrap_err();
    match err {
        CoreError::Api { message } => assert_eq!(message, "Invalid credentials"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!session.is_authenticated());
    assert!(!client.has_token());
    assert!(!dir.path().join("session.json").exists());
}

#[tokio::test]
async fn test_bootstrap_validates_persisted_token() {
    let hits = Arc::new(AtomicUsize::new(0));
    let seen_auth = Arc::new(Mutex::new(None::<String>));

    let handler_hits = hits.clone();
    let handler_seen = seen_auth.clone();
    let router = Router::new().route(
        "/api/auth/validate",
        get(move |headers: HeaderMap| async move {
            handler_hits.fetch_add(1, Ordering::SeqCst);
            *handler_seen.lock().unwrap() = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(String::from);
            Json(json!({ "user": { "_id": "u1", "name": "Admin", "email": "a@b.com" } }))
        }),
    );
    let base = serve(router).await;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("session.json"), r#"{ "token": "t1" }"#).unwrap();

    let client = client_for(&base);
    let session = SessionStore::with_config_dir(client, EventBus::default(), dir.path());

    assert_eq!(session.bootstrap().await, SessionPhase::SignedIn);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(
        seen_auth.lock().unwrap().as_deref(),
        Some("Bearer t1")
    );
}

#[tokio::test]
async fn test_bootstrap_after_logout_never_validates() {
    let hits = Arc::new(AtomicUsize::new(0));
    let handler_hits = hits.clone();
    let router = login_router().route(
        "/api/auth/validate",
        get(move || async move {
            handler_hits.fetch_add(1, Ordering::SeqCst);
            Json(json!({ "user": { "_id": "u1" } }))
        }),
    );
    let base = serve(router).await;
    let dir = tempfile::tempdir().unwrap();

    {
        let client = client_for(&base);
        let session =
            SessionStore::with_config_dir(client.clone(), EventBus::default(), dir.path());
        session.login("a@b.com", "x").await.unwrap();
        session.logout().unwrap();
        assert!(!client.has_token());
    }

    // Fresh start: no token on disk, so no validation round-trip
    let client = client_for(&base);
    let session = SessionStore::with_config_dir(client, EventBus::default(), dir.path());
    assert_eq!(session.bootstrap().await, SessionPhase::SignedOut);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_bootstrap_discards_rejected_token() {
    let router = Router::new().route(
        "/api/auth/validate",
        get(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Invalid token" })),
            )
        }),
    );
    let base = serve(router).await;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("session.json"), r#"{ "token": "stale" }"#).unwrap();

    let client = client_for(&base);
    let session = SessionStore::with_config_dir(client.clone(), EventBus::default(), dir.path());

    assert_eq!(session.bootstrap().await, SessionPhase::SignedOut);
    assert!(!client.has_token());
    assert!(!dir.path().join("session.json").exists());
}

#[tokio::test]
async fn test_rejected_token_mid_session_expires_and_signs_out() {
    let router = Router::new()
        .route(
            "/api/properties",
            get(|| async { ok(json!([{ "_id": "p1", "name": "One" }])) }),
        )
        .route(
            "/api/rooms",
            get(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "message": "jwt expired" })),
                )
            }),
        )
        .route("/api/room-types", get(|| async { ok(json!([])) }));
    let base = serve(router).await;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("session.json"), r#"{ "token": "stale" }"#).unwrap();

    let client = client_for(&base);
    client.set_token(Some("stale".to_string()));
    let bus = EventBus::default();
    let session = SessionStore::with_config_dir(client.clone(), bus.clone(), dir.path());
    let store = Arc::new(PropertyStore::new(client.clone(), bus.clone()));
    store.refresh().await;

    let mut rx = bus.subscribe();
    let page = RoomsPage::new(client.clone(), store, bus);
    page.refresh().await;

    let mut expired = false;
    while let Ok(event) = rx.try_recv() {
        if matches!(event, DataEvent::SessionExpired) {
            expired = true;
        }
    }
    assert!(expired, "refresh against a revoked token must raise expiry");

    // The shell reacts to the event by dropping the session entirely
    session.expire();
    assert_eq!(session.phase(), SessionPhase::SignedOut);
    assert!(!client.has_token());
    assert!(!dir.path().join("session.json").exists());
}

// ============================================================================
// Properties
// ============================================================================

#[tokio::test]
async fn test_property_list_accepts_bare_array() {
    let router = Router::new().route(
        "/api/properties",
        get(|| async { Json(json!([{ "_id": "p1", "name": "One" }])) }),
    );
    let base = serve(router).await;

    let client = client_for(&base);
    let properties = client.list_properties().await.unwrap();
    assert_eq!(properties.len(), 1);
    assert_eq!(properties[0].id, "p1");
}

#[tokio::test]
async fn test_selection_falls_back_after_refresh() {
    let list = Arc::new(Mutex::new(json!([
        { "_id": "p1", "name": "One" },
        { "_id": "p2", "name": "Two" }
    ])));
    let handler_list = list.clone();
    let router = Router::new().route(
        "/api/properties",
        get(move || async move { ok(handler_list.lock().unwrap().clone()) }),
    );
    let base = serve(router).await;

    let store = PropertyStore::new(client_for(&base), EventBus::default());
    store.refresh().await;
    assert_eq!(store.selected_id(), Some("p1".to_string()));

    assert!(store.select("p2"));

    // p2 disappears server-side; selection falls back to the first entry
    *list.lock().unwrap() = json!([
        { "_id": "p1", "name": "One" },
        { "_id": "p3", "name": "Three" }
    ]);
    store.refresh().await;
    assert_eq!(store.selected_id(), Some("p1".to_string()));
    assert_eq!(store.error(), None);
}

#[tokio::test]
async fn test_empty_property_list_sets_banner() {
    let router = Router::new().route("/api/properties", get(|| async { ok(json!([])) }));
    let base = serve(router).await;

    let store = PropertyStore::new(client_for(&base), EventBus::default());
    store.refresh().await;
    assert!(store.is_empty());
    assert_eq!(store.selected_id(), None);
    assert_eq!(store.error(), Some("No properties found".to_string()));
}

#[tokio::test]
async fn test_stale_property_refresh_is_discarded() {
    let gate = Arc::new(Notify::new());
    let calls = Arc::new(AtomicUsize::new(0));

    let handler_gate = gate.clone();
    let handler_calls = calls.clone();
    let router = Router::new().route(
        "/api/properties",
        get(move || async move {
            if handler_calls.fetch_add(1, Ordering::SeqCst) == 0 {
                // hold the first response until the second refresh settled
                handler_gate.notified().await;
                ok(json!([{ "_id": "p-slow", "name": "Slow" }]))
            } else {
                ok(json!([{ "_id": "p-fast", "name": "Fast" }]))
            }
        }),
    );
    let base = serve(router).await;

    let store = Arc::new(PropertyStore::new(client_for(&base), EventBus::default()));

    let slow_store = store.clone();
    let slow = tokio::spawn(async move { slow_store.refresh().await });

    // wait for the first request to reach the server
    tokio::time::timeout(Duration::from_secs(5), async {
        while calls.load(Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();

    store.refresh().await;
    gate.notify_one();
    slow.await.unwrap();

    let properties = store.properties();
    assert_eq!(properties.len(), 1);
    assert_eq!(properties[0].id, "p-fast");
    assert!(!store.is_loading());
}

// ============================================================================
// Room types
// ============================================================================

#[tokio::test]
async fn test_room_type_create_scopes_to_property_and_refetches() {
    let room_types = Arc::new(Mutex::new(vec![] as Vec<Value>));
    let gets = Arc::new(AtomicUsize::new(0));
    let posts = Arc::new(Mutex::new(vec![] as Vec<Value>));

    let list_types = room_types.clone();
    let list_gets = gets.clone();
    let create_types = room_types.clone();
    let create_posts = posts.clone();
    let router = Router::new()
        .route(
            "/api/properties",
            get(|| async { ok(json!([{ "_id": "p1", "name": "One" }])) }),
        )
        .route(
            "/api/room-types",
            get(move || async move {
                list_gets.fetch_add(1, Ordering::SeqCst);
                ok(Value::Array(list_types.lock().unwrap().clone()))
            })
            .post(move |Json(body): Json<Value>| async move {
                create_posts.lock().unwrap().push(body.clone());
                let created = json!({
                    "_id": "rt9",
                    "name": body["name"],
                    "baseRate": body["baseRate"],
                    "capacity": body["capacity"],
                    "propertyId": body["propertyId"]
                });
                create_types.lock().unwrap().push(created.clone());
                ok(created)
            }),
        );
    let base = serve(router).await;

    let client = client_for(&base);
    let bus = EventBus::default();
    let store = Arc::new(PropertyStore::new(client.clone(), bus.clone()));
    store.refresh().await;
    assert_eq!(store.selected_id(), Some("p1".to_string()));

    let page = RoomTypesPage::new(client, store, bus);
    page.refresh().await;
    assert_eq!(gets.load(Ordering::SeqCst), 1);

    page.open_create();
    page.update_form(|form| {
        form.name = "Suite".to_string();
        form.base_rate = "100".to_string();
        form.capacity = "2".to_string();
    });
    page.submit().await;

    assert!(!page.modal().is_open());
    {
        let posts = posts.lock().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0]["propertyId"], "p1");
        assert_eq!(posts[0]["name"], "Suite");
        assert_eq!(posts[0]["baseRate"], 100.0);
        assert_eq!(posts[0]["capacity"], 2);
    }
    assert_eq!(gets.load(Ordering::SeqCst), 2);
    assert!(page.room_types().iter().any(|rt| rt.name == "Suite"));
}

#[tokio::test]
async fn test_room_type_delete_confirm_flow() {
    let deletes = Arc::new(Mutex::new(vec![] as Vec<String>));
    let handler_deletes = deletes.clone();
    let router = Router::new()
        .route(
            "/api/properties",
            get(|| async { ok(json!([{ "_id": "p1", "name": "One" }])) }),
        )
        .route(
            "/api/room-types",
            get(|| async {
                ok(json!([
                    { "_id": "rt1", "name": "Suite", "baseRate": 200.0, "capacity": 4 }
                ]))
            }),
        )
        .route(
            "/api/room-types/{id}",
            delete(move |Path(id): Path<String>| async move {
                handler_deletes.lock().unwrap().push(id);
                Json(json!({ "success": true }))
            }),
        );
    let base = serve(router).await;

    let client = client_for(&base);
    let bus = EventBus::default();
    let store = Arc::new(PropertyStore::new(client.clone(), bus.clone()));
    store.refresh().await;

    let page = RoomTypesPage::new(client, store, bus);
    page.refresh().await;

    assert!(page.request_delete("rt1"));
    let pending = page.pending_delete().unwrap();
    assert_eq!(pending.label, "room type Suite");

    page.confirm_delete().await;
    assert_eq!(*deletes.lock().unwrap(), vec!["rt1".to_string()]);
    assert_eq!(page.pending_delete(), None);
}

// ============================================================================
// Rooms
// ============================================================================

#[tokio::test]
async fn test_api_failure_text_reaches_page_error() {
    let router = Router::new()
        .route(
            "/api/properties",
            get(|| async { ok(json!([{ "_id": "p1", "name": "One" }])) }),
        )
        .route(
            "/api/rooms",
            get(|| async { Json(json!({ "success": false, "error": "Database offline" })) }),
        )
        .route("/api/room-types", get(|| async { ok(json!([])) }));
    let base = serve(router).await;

    let client = client_for(&base);
    let bus = EventBus::default();
    let store = Arc::new(PropertyStore::new(client.clone(), bus.clone()));
    store.refresh().await;

    let page = RoomsPage::new(client, store, bus);
    page.refresh().await;
    assert_eq!(page.error(), Some("Database offline".to_string()));
    assert!(page.rooms().is_empty());
}

#[tokio::test]
async fn test_rooms_refresh_scopes_to_property() {
    let queries = Arc::new(Mutex::new(vec![] as Vec<String>));
    let handler_queries = queries.clone();
    let router = Router::new()
        .route(
            "/api/properties",
            get(|| async { ok(json!([{ "_id": "p1", "name": "One" }])) }),
        )
        .route(
            "/api/rooms",
            get(move |RawQuery(q): RawQuery| async move {
                handler_queries.lock().unwrap().push(q.unwrap_or_default());
                ok(json!([{
                    "_id": "r1",
                    "roomNumber": "101",
                    "propertyId": "p1",
                    "roomType": "rt1",
                    "bedType": "queen"
                }]))
            }),
        )
        .route("/api/room-types", get(|| async { ok(json!([])) }));
    let base = serve(router).await;

    let client = client_for(&base);
    let bus = EventBus::default();
    let store = Arc::new(PropertyStore::new(client.clone(), bus.clone()));
    store.refresh().await;

    let page = RoomsPage::new(client, store, bus);
    page.refresh().await;

    assert_eq!(*queries.lock().unwrap(), vec!["propertyId=p1".to_string()]);
    assert_eq!(page.rooms().len(), 1);
}

// ============================================================================
// Reservations
// ============================================================================

#[tokio::test]
async fn test_reservation_query_carries_exact_keys() {
    let queries = Arc::new(Mutex::new(vec![] as Vec<String>));
    let handler_queries = queries.clone();
    let router = Router::new()
        .route(
            "/api/properties",
            get(|| async { ok(json!([{ "_id": "p1", "name": "One" }])) }),
        )
        .route(
            "/api/reservations",
            get(move |RawQuery(q): RawQuery| async move {
                handler_queries.lock().unwrap().push(q.unwrap_or_default());
                Json(json!({
                    "success": true,
                    "data": [],
                    "count": 0,
                    "pagination": { "total": 21, "page": 2, "pages": 3 }
                }))
            }),
        )
        .route("/api/room-types", get(|| async { ok(json!([])) }));
    let base = serve(router).await;

    let client = client_for(&base);
    let bus = EventBus::default();
    let store = Arc::new(PropertyStore::new(client.clone(), bus.clone()));
    store.refresh().await;

    let page = InventoryPage::new(client, store, bus);
    page.set_filter(FilterField::Status, "confirmed".to_string());
    page.set_page(2);
    page.refresh().await;

    let queries = queries.lock().unwrap();
    let pairs: Vec<(&str, &str)> = queries
        .last()
        .unwrap()
        .split('&')
        .map(|kv| kv.split_once('=').unwrap())
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("page", "2"),
            ("limit", "10"),
            ("propertyId", "p1"),
            ("status", "confirmed"),
        ]
    );
    assert_eq!(page.page(), 2);
    assert_eq!(page.pages(), 3);
    assert_eq!(page.total(), 21);
}
