//! Pagination behavior against a local stand-in service
//!
//! Covers both pagination conventions end to end: cursor streams terminate
//! on an absent `nextPageToken` (and only on that), offset streams terminate
//! on the first empty item batch, pages are fetched lazily, and classified
//! failures propagate out of the stream without being swallowed.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use streamone_ion::api::customers::ListCustomersOptions;
use streamone_ion::api::orders::ListOrdersOptions;
use streamone_ion::api::subscriptions::ListSubscriptionsOptions;
use streamone_ion::{ClientConfig, IonClient, IonError};

#[derive(Default)]
struct Hits {
    resource: AtomicUsize,
}

/// Bind a router on an ephemeral port and return its base URL.
async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Client wired to the fake service, with v3 credentials the fake's
/// validate endpoint always accepts.
async fn v3_client(base_url: &str, dir: &tempfile::TempDir) -> IonClient {
    let path = dir.path().join("config.json");
    let config = json!({
        "accountid": "acct-1",
        "v3": {"access_token": "T1", "refresh_token": "R1"}
    });
    std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

    IonClient::with_config(&path, ClientConfig::builder().base_url(base_url).build())
        .await
        .unwrap()
}

fn with_validate(router: Router<Arc<Hits>>) -> Router<Arc<Hits>> {
    router.route("/oauth/validateAccess", post(|| async { StatusCode::OK }))
}

// ---------------------------------------------------------------------------
// Cursor style
// ---------------------------------------------------------------------------

/// Three pages: batches [a], [b], [] with cursors c1, c2, none. The stream
/// must yield exactly [a, b] and issue exactly 3 requests: the empty final
/// batch still arrives with work to do (discover the absent token).
#[tokio::test]
async fn cursor_stream_follows_tokens_until_absent() {
    async fn orders(
        State(hits): State<Arc<Hits>>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Json<Value> {
        hits.resource.fetch_add(1, Ordering::SeqCst);
        let page = match params.get("pageToken").map(String::as_str) {
            None => json!({"orders": [{"id": "a"}], "nextPageToken": "c1"}),
            Some("c1") => json!({"orders": [{"id": "b"}], "nextPageToken": "c2"}),
            _ => json!({"orders": []}),
        };
        Json(page)
    }

    let hits = Arc::new(Hits::default());
    let router = with_validate(
        Router::new().route("/api/v3/accounts/acct-1/orders", get(orders)),
    )
    .with_state(hits.clone());
    let base_url = spawn(router).await;

    let dir = tempfile::tempdir().unwrap();
    let client = v3_client(&base_url, &dir).await;

    let stream = client
        .list_account_orders(&ListOrdersOptions::default())
        .await
        .unwrap();
    let orders = stream.try_collect().await.unwrap();

    let ids: Vec<&str> = orders.iter().map(|o| o["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(hits.resource.load(Ordering::SeqCst), 3);
}

/// No second request may go out before the first page's items are fully
/// consumed, and building the stream fetches nothing at all.
#[tokio::test]
async fn cursor_stream_is_lazy() {
    async fn orders(
        State(hits): State<Arc<Hits>>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Json<Value> {
        hits.resource.fetch_add(1, Ordering::SeqCst);
        let page = match params.get("pageToken").map(String::as_str) {
            None => json!({"orders": [{"id": "a1"}, {"id": "a2"}], "nextPageToken": "c1"}),
            _ => json!({"orders": [{"id": "b1"}]}),
        };
        Json(page)
    }

    let hits = Arc::new(Hits::default());
    let router = with_validate(
        Router::new().route("/api/v3/accounts/acct-1/orders", get(orders)),
    )
    .with_state(hits.clone());
    let base_url = spawn(router).await;

    let dir = tempfile::tempdir().unwrap();
    let client = v3_client(&base_url, &dir).await;

    let mut stream = client
        .list_account_orders(&ListOrdersOptions::default())
        .await
        .unwrap();
    assert_eq!(hits.resource.load(Ordering::SeqCst), 0);

    assert_eq!(stream.try_next().await.unwrap().unwrap()["id"], "a1");
    assert_eq!(hits.resource.load(Ordering::SeqCst), 1);

    assert_eq!(stream.try_next().await.unwrap().unwrap()["id"], "a2");
    assert_eq!(hits.resource.load(Ordering::SeqCst), 1);

    // Buffer exhausted: only now may page two go out
    assert_eq!(stream.try_next().await.unwrap().unwrap()["id"], "b1");
    assert_eq!(hits.resource.load(Ordering::SeqCst), 2);
}

/// 25 records across pages of 10/10/5 with no trailing cursor on the last
/// page: all 25 in service order, exactly 3 requests, short IDs attached.
#[tokio::test]
async fn cursor_stream_preserves_order_across_pages() {
    fn customer_batch(range: std::ops::Range<usize>) -> Vec<Value> {
        range
            .map(|i| json!({"name": format!("accounts/acct-1/customers/c{}", i)}))
            .collect()
    }

    async fn customers(
        State(hits): State<Arc<Hits>>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Json<Value> {
        hits.resource.fetch_add(1, Ordering::SeqCst);
        assert_eq!(params.get("pageSize").map(String::as_str), Some("10"));
        let page = match params.get("pageToken").map(String::as_str) {
            None => json!({"customers": customer_batch(0..10), "nextPageToken": "p2"}),
            Some("p2") => json!({"customers": customer_batch(10..20), "nextPageToken": "p3"}),
            _ => json!({"customers": customer_batch(20..25)}),
        };
        Json(page)
    }

    let hits = Arc::new(Hits::default());
    let router = with_validate(
        Router::new().route("/api/v3/accounts/acct-1/customers", get(customers)),
    )
    .with_state(hits.clone());
    let base_url = spawn(router).await;

    let dir = tempfile::tempdir().unwrap();
    let client = v3_client(&base_url, &dir).await;

    let options = ListCustomersOptions {
        page_size: Some(10),
        ..Default::default()
    };
    let customers = client
        .list_customers(&options)
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(customers.len(), 25);
    for (i, customer) in customers.iter().enumerate() {
        assert_eq!(customer["id"], format!("c{}", i));
    }
    assert_eq!(hits.resource.load(Ordering::SeqCst), 3);
}

/// 404 on the customer listing is "nothing found", not an error.
#[tokio::test]
async fn customer_listing_treats_404_as_empty() {
    async fn customers(State(hits): State<Arc<Hits>>) -> impl IntoResponse {
        hits.resource.fetch_add(1, Ordering::SeqCst);
        (StatusCode::NOT_FOUND, "no customers here")
    }

    let hits = Arc::new(Hits::default());
    let router = with_validate(
        Router::new().route("/api/v3/accounts/acct-1/customers", get(customers)),
    )
    .with_state(hits.clone());
    let base_url = spawn(router).await;

    let dir = tempfile::tempdir().unwrap();
    let client = v3_client(&base_url, &dir).await;

    let customers = client
        .list_customers(&ListCustomersOptions::default())
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();
    assert!(customers.is_empty());
    assert_eq!(hits.resource.load(Ordering::SeqCst), 1);
}

// ---------------------------------------------------------------------------
// Offset style
// ---------------------------------------------------------------------------

/// Offset enumeration stops at the first empty batch: two requests, no
/// items contributed by the empty page, offsets advancing by the page size.
#[tokio::test]
async fn offset_stream_stops_on_empty_batch() {
    async fn subscriptions(
        State(hits): State<Arc<Hits>>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Json<Value> {
        hits.resource.fetch_add(1, Ordering::SeqCst);
        assert_eq!(params.get("pagination.limit").map(String::as_str), Some("10"));
        let page = match params.get("pagination.offset").map(String::as_str) {
            Some("0") => json!({"items": [{"id": "s1"}, {"id": "s2"}]}),
            Some("10") => json!({"items": []}),
            other => panic!("unexpected offset {:?}", other),
        };
        Json(page)
    }

    let hits = Arc::new(Hits::default());
    let router = with_validate(
        Router::new().route("/api/v3/accounts/acct-1/subscriptions", get(subscriptions)),
    )
    .with_state(hits.clone());
    let base_url = spawn(router).await;

    let dir = tempfile::tempdir().unwrap();
    let client = v3_client(&base_url, &dir).await;

    let subscriptions = client
        .list_subscriptions(&ListSubscriptionsOptions::default())
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    let ids: Vec<&str> = subscriptions
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["s1", "s2"]);
    assert_eq!(hits.resource.load(Ordering::SeqCst), 2);
}

/// The subscription family classifies 404 as a hard NotFound failure, in
/// contrast to the customer listing above.
#[tokio::test]
async fn subscription_listing_treats_404_as_failure() {
    async fn subscriptions(State(hits): State<Arc<Hits>>) -> impl IntoResponse {
        hits.resource.fetch_add(1, Ordering::SeqCst);
        (StatusCode::NOT_FOUND, "unknown account")
    }

    let hits = Arc::new(Hits::default());
    let router = with_validate(
        Router::new().route("/api/v3/accounts/acct-1/subscriptions", get(subscriptions)),
    )
    .with_state(hits.clone());
    let base_url = spawn(router).await;

    let dir = tempfile::tempdir().unwrap();
    let client = v3_client(&base_url, &dir).await;

    let mut stream = client
        .list_subscriptions(&ListSubscriptionsOptions::default())
        .await
        .unwrap();
    let err = stream.try_next().await.unwrap_err();
    assert!(matches!(err, IonError::NotFound(m) if m == "unknown account"));
}

// ---------------------------------------------------------------------------
// Failure propagation
// ---------------------------------------------------------------------------

/// A mid-sequence server failure surfaces once; afterwards the stream is
/// exhausted and issues no further requests.
#[tokio::test]
async fn stream_failure_is_surfaced_then_terminal() {
    async fn orders(
        State(hits): State<Arc<Hits>>,
        Query(params): Query<HashMap<String, String>>,
    ) -> axum::response::Response {
        hits.resource.fetch_add(1, Ordering::SeqCst);
        match params.get("pageToken") {
            None => Json(json!({"orders": [{"id": "a"}], "nextPageToken": "c1"})).into_response(),
            Some(_) => (StatusCode::INTERNAL_SERVER_ERROR, "backing store down").into_response(),
        }
    }

    let hits = Arc::new(Hits::default());
    let router = with_validate(
        Router::new().route("/api/v3/accounts/acct-1/orders", get(orders)),
    )
    .with_state(hits.clone());
    let base_url = spawn(router).await;

    let dir = tempfile::tempdir().unwrap();
    let client = v3_client(&base_url, &dir).await;

    let mut stream = client
        .list_account_orders(&ListOrdersOptions::default())
        .await
        .unwrap();

    assert_eq!(stream.try_next().await.unwrap().unwrap()["id"], "a");

    let err = stream.try_next().await.unwrap_err();
    assert!(matches!(err, IonError::ServerError(m) if m == "backing store down"));

    // Terminal: no retry, no extra request
    assert!(stream.try_next().await.unwrap().is_none());
    assert_eq!(hits.resource.load(Ordering::SeqCst), 2);
}
