//! v1 generation and report export against a local stand-in service
//!
//! The v1 surface has no token lifecycle: requests carry a static Basic
//! header and the bracketed filter syntax rides in a hand-assembled query
//! string. Also exercises the report CSV export, the one operation that
//! writes service data to disk.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Form, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use streamone_ion::api::reports::{RelativeDateRange, ReportDateRange, ReportsModule};
use streamone_ion::v1::{FilterValue, GenerateInvoicesOptions, ListInvoicesOptions};
use streamone_ion::{ClientConfig, IonClient, IonError};

#[derive(Default)]
struct Seen {
    queries: std::sync::Mutex<Vec<String>>,
    auth_headers: std::sync::Mutex<Vec<String>>,
    forms: std::sync::Mutex<Vec<HashMap<String, String>>>,
    report_payloads: std::sync::Mutex<Vec<Value>>,
}

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn client_with(
    dir: &tempfile::TempDir,
    base_url: &str,
    config: &Value,
) -> IonClient {
    let path = dir.path().join("config.json");
    std::fs::write(&path, serde_json::to_string_pretty(config).unwrap()).unwrap();
    IonClient::with_config(&path, ClientConfig::builder().base_url(base_url).build())
        .await
        .unwrap()
}

fn v1_only_config() -> Value {
    json!({
        "accountid": "acct-1",
        "v1": {"api_key": "key-1", "api_secret": "secret-1"}
    })
}

/// `key-1:secret-1` base64-encoded, as the Basic header must carry it.
const EXPECTED_BASIC: &str = "Basic a2V5LTE6c2VjcmV0LTE=";

#[tokio::test]
async fn my_invoices_carry_basic_auth_and_bracketed_filters() {
    async fn my_invoices(
        State(seen): State<Arc<Seen>>,
        uri: Uri,
        headers: HeaderMap,
    ) -> Json<Value> {
        seen.queries
            .lock()
            .unwrap()
            .push(uri.query().unwrap_or_default().to_string());
        seen.auth_headers.lock().unwrap().push(
            headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string(),
        );
        Json(json!({"data": {"invoices": [{"id": "INV-1"}]}}))
    }

    let seen = Arc::new(Seen::default());
    let router = Router::new()
        .route("/api/v1/invoices/myinvoices", get(my_invoices))
        .with_state(seen.clone());
    let base_url = spawn(router).await;

    let dir = tempfile::tempdir().unwrap();
    let client = client_with(&dir, &base_url, &v1_only_config()).await;

    let mut options = ListInvoicesOptions {
        limit: 25,
        offset: 50,
        ..Default::default()
    };
    options
        .filters
        .insert("status".into(), FilterValue::new("open"));
    options
        .filters
        .insert("total".into(), FilterValue::with_modifier("100", "gt"));
    options.sort.insert("issuedAt".into(), "desc".into());
    options.relations.push("customer".into());

    let invoices = client.get_my_invoices(&options).await.unwrap();
    assert_eq!(invoices["data"]["invoices"][0]["id"], "INV-1");

    let queries = seen.queries.lock().unwrap();
    let query = urlencoding::decode(&queries[0]).unwrap().into_owned();
    assert!(query.contains("limit=25"));
    assert!(query.contains("offset=50"));
    assert!(query.contains("filter[status]=open"));
    assert!(query.contains("filter[total:gt]=100"));
    assert!(query.contains("sort[issuedAt]=desc"));
    assert!(query.contains("relations=customer"));

    assert_eq!(seen.auth_headers.lock().unwrap().as_slice(), [EXPECTED_BASIC]);
}

#[tokio::test]
async fn customer_invoices_append_the_customer_id() {
    async fn invoices(State(seen): State<Arc<Seen>>, uri: Uri) -> Json<Value> {
        seen.queries
            .lock()
            .unwrap()
            .push(uri.query().unwrap_or_default().to_string());
        Json(json!({"data": {"invoices": []}}))
    }

    let seen = Arc::new(Seen::default());
    let router = Router::new()
        .route("/api/v1/invoices", get(invoices))
        .with_state(seen.clone());
    let base_url = spawn(router).await;

    let dir = tempfile::tempdir().unwrap();
    let client = client_with(&dir, &base_url, &v1_only_config()).await;

    client
        .get_customer_invoices("CUST-7", &ListInvoicesOptions::default())
        .await
        .unwrap();

    let queries = seen.queries.lock().unwrap();
    assert!(queries[0].contains("customerId=CUST-7"));
}

#[tokio::test]
async fn v1_404_is_a_not_found_failure() {
    let router = Router::new().route(
        "/api/v1/invoices/myinvoices",
        get(|| async { (StatusCode::NOT_FOUND, "no invoices") }),
    );
    let base_url = spawn(router).await;

    let dir = tempfile::tempdir().unwrap();
    let client = client_with(&dir, &base_url, &v1_only_config()).await;

    let err = client
        .get_my_invoices(&ListInvoicesOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, IonError::NotFound(m) if m == "no invoices"));
}

#[tokio::test]
async fn generate_invoices_posts_a_form_with_a_period() {
    async fn generate(
        State(seen): State<Arc<Seen>>,
        Form(form): Form<HashMap<String, String>>,
    ) -> Json<Value> {
        seen.forms.lock().unwrap().push(form);
        Json(json!({"data": {"queued": true}}))
    }

    let seen = Arc::new(Seen::default());
    let router = Router::new()
        .route("/api/v1/invoices/generate", post(generate))
        .with_state(seen.clone());
    let base_url = spawn(router).await;

    let dir = tempfile::tempdir().unwrap();
    let client = client_with(&dir, &base_url, &v1_only_config()).await;

    let mut options = GenerateInvoicesOptions::new("manual");
    options.customers = vec!["c1".into(), "c2".into()];
    let result = client.generate_invoices(&options).await.unwrap();
    assert_eq!(result["data"]["queued"], true);

    let forms = seen.forms.lock().unwrap();
    let form = &forms[0];
    assert_eq!(form.get("source").map(String::as_str), Some("manual"));
    assert_eq!(form.get("status").map(String::as_str), Some("open"));
    assert_eq!(form.get("sendEmails").map(String::as_str), Some("false"));
    assert_eq!(form.get("customers").map(String::as_str), Some("c1,c2"));
    assert!(form.get("resellers").is_none());

    // Default period is the previous month in m-MM-YYYY form
    let period = form.get("period").unwrap();
    assert!(period.starts_with("m-"));
    assert_eq!(period.len(), "m-07-2025".len());
}

#[tokio::test]
async fn detailed_invoice_files_land_in_the_target_folder() {
    async fn detailed(State(base): State<String>) -> Json<Value> {
        Json(json!({
            "data": {"invoice": {"detailedInvoiceFilesUrls": [
                format!("{}/files/2025-07.csv?sig=abc", base),
                format!("{}/files/gone.csv", base),
            ]}}
        }))
    }

    // The detailed endpoint hands out absolute URLs, so it needs to know
    // its own base: bind the listener first, then build the router.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    let router = Router::new()
        .route(
            "/api/v1/invoices/INV-1/detailed",
            get(detailed).with_state(base_url.clone()),
        )
        .route(
            "/files/2025-07.csv",
            get(|| async { "col_a,col_b\n1,2\n" }),
        )
        .route(
            "/files/gone.csv",
            get(|| async { (StatusCode::NOT_FOUND, "expired link") }),
        );
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let dir = tempfile::tempdir().unwrap();
    let client = client_with(&dir, &base_url, &v1_only_config()).await;

    let out_dir = tempfile::tempdir().unwrap();
    let written = client
        .download_detailed_invoice_files("INV-1", out_dir.path())
        .await
        .unwrap();

    // The expired link is skipped, not fatal
    assert_eq!(written, vec![out_dir.path().join("2025-07.csv")]);
    let contents = std::fs::read_to_string(&written[0]).unwrap();
    assert_eq!(contents, "col_a,col_b\n1,2\n");
}

#[tokio::test]
#[allow(deprecated)]
async fn v1_customers_listing_and_point_lookup_share_one_operation() {
    async fn customers(State(seen): State<Arc<Seen>>, uri: Uri) -> Json<Value> {
        seen.queries
            .lock()
            .unwrap()
            .push(format!("{}?{}", uri.path(), uri.query().unwrap_or_default()));
        Json(json!({"data": {"customers": []}}))
    }

    let seen = Arc::new(Seen::default());
    let router = Router::new()
        .route("/api/v1/customers", get(customers))
        .route("/api/v1/customers/:id", get(customers))
        .with_state(seen.clone());
    let base_url = spawn(router).await;

    let dir = tempfile::tempdir().unwrap();
    let client = client_with(&dir, &base_url, &v1_only_config()).await;

    use streamone_ion::v1::ListCustomersV1Options;
    client
        .get_customers_v1(None, &ListCustomersV1Options::default())
        .await
        .unwrap();
    client
        .get_customers_v1(Some("CUST-3"), &ListCustomersV1Options::default())
        .await
        .unwrap();

    let queries = seen.queries.lock().unwrap();
    assert!(queries[0].starts_with("/api/v1/customers?limit=100&offset=0"));
    assert!(queries[1].starts_with("/api/v1/customers/CUST-3?limit=100&offset=0"));
}

#[tokio::test]
async fn report_export_writes_the_results_payload_verbatim() {
    async fn export(
        State(seen): State<Arc<Seen>>,
        Json(payload): Json<Value>,
    ) -> Json<Value> {
        seen.report_payloads.lock().unwrap().push(payload);
        Json(json!({"results": "sku,amount\nS-1,10\nS-2,32\n"}))
    }

    let seen = Arc::new(Seen::default());
    let router = Router::new()
        .route("/oauth/validateAccess", post(|| async { StatusCode::OK }))
        .route(
            "/api/v3/accounts/acct-1/reports/R-9/reportDataCsv",
            post(export),
        )
        .with_state(seen.clone());
    let base_url = spawn(router).await;

    let dir = tempfile::tempdir().unwrap();
    let config = json!({
        "accountid": "acct-1",
        "v3": {"access_token": "T1", "refresh_token": "R1"}
    });
    let client = client_with(&dir, &base_url, &config).await;

    let out = dir.path().join("monthly.csv");
    let written = client
        .export_report_csv(
            "R-9",
            ReportsModule::Invoice,
            "BILLING",
            ReportDateRange::Relative(RelativeDateRange::LastMonth),
            Some(out.clone()),
        )
        .await
        .unwrap();

    assert_eq!(written, out);
    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "sku,amount\nS-1,10\nS-2,32\n"
    );

    let payloads = seen.report_payloads.lock().unwrap();
    assert_eq!(payloads[0]["report_id"], "R-9");
    assert_eq!(payloads[0]["report_module"], "INVOICE_REPORTS_MODULE");
    assert_eq!(payloads[0]["category"], "BILLING");
    assert_eq!(
        payloads[0]["specs"]["date_range_option"]["select_date_range"],
        "LAST_MONTH"
    );
}
