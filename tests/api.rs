//! End-to-end router tests driven with `tower::ServiceExt::oneshot`.

#![allow(clippy::panic)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::Utc;
use tower::ServiceExt;

use pricewatch_gateway::api;
use pricewatch_gateway::app_state::AppState;
use pricewatch_gateway::domain::{InstancePricing, OperatingSystem, SpotQuote};
use pricewatch_gateway::error::ApiError;
use pricewatch_gateway::persistence::memory::{MemoryAlertStore, MemoryHistoryStore};
use pricewatch_gateway::persistence::{AlertStore, HistoryStore};
use pricewatch_gateway::pricing::PricingProvider;
use pricewatch_gateway::service::{HistoryService, PricingService};

/// Fixed-table provider: every region serves the same rows and quotes.
#[derive(Debug, Default)]
struct StaticProvider {
    rows: Vec<(String, Option<f64>, Option<f64>)>,
    spot: HashMap<String, f64>,
}

impl StaticProvider {
    fn with_t3_micro() -> Self {
        let mut spot = HashMap::new();
        spot.insert("t3.micro".to_string(), 0.0031);
        Self {
            rows: vec![("t3.micro".to_string(), Some(0.0104), Some(0.0065))],
            spot,
        }
    }
}

#[async_trait]
impl PricingProvider for StaticProvider {
    async fn fetch_list_prices(
        &self,
        _region: &str,
        os: OperatingSystem,
    ) -> Result<Vec<InstancePricing>, ApiError> {
        Ok(self
            .rows
            .iter()
            .map(|(instance_type, on_demand, reserved)| InstancePricing {
                instance_type: instance_type.clone(),
                vcpu: 2,
                memory_gib: 1.0,
                network_performance: "Up to 5 Gigabit".to_string(),
                os,
                on_demand: *on_demand,
                reserved: *reserved,
                spot: None,
                spot_last_updated: None,
            })
            .collect())
    }

    async fn fetch_spot_prices(
        &self,
        _region: &str,
        _os: OperatingSystem,
    ) -> Result<HashMap<String, SpotQuote>, ApiError> {
        Ok(self
            .spot
            .iter()
            .map(|(instance_type, price)| {
                (
                    instance_type.clone(),
                    SpotQuote {
                        price: *price,
                        timestamp: Utc::now(),
                    },
                )
            })
            .collect())
    }
}

fn app(provider: StaticProvider) -> Router {
    let provider: Arc<dyn PricingProvider> = Arc::new(provider);
    let pricing = Arc::new(PricingService::new(provider, Duration::from_secs(600)));
    let history_store: Arc<dyn HistoryStore> = Arc::new(MemoryHistoryStore::new());
    let history = Arc::new(HistoryService::new(
        history_store,
        Arc::clone(&pricing),
        30,
    ));
    let alerts: Arc<dyn AlertStore> = Arc::new(MemoryAlertStore::new());
    api::build_router().with_state(AppState::new(pricing, history, alerts))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let Ok(request) = Request::builder().uri(uri).body(Body::empty()) else {
        panic!("request build failed");
    };
    let Ok(response) = app.clone().oneshot(request).await else {
        panic!("request dispatch failed");
    };
    let status = response.status();
    (status, read_json(response).await)
}

async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let Ok(request) = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
    else {
        panic!("request build failed");
    };
    let Ok(response) = app.clone().oneshot(request).await else {
        panic!("request dispatch failed");
    };
    let status = response.status();
    (status, read_json(response).await)
}

async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
        panic!("body read failed");
    };
    serde_json::from_slice(&bytes).unwrap_or_default()
}

#[tokio::test]
async fn health_reports_healthy() {
    let app = app(StaticProvider::with_t3_micro());
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("status").and_then(|v| v.as_str()), Some("healthy"));
    assert!(body.get("version").is_some());
}

#[tokio::test]
async fn regions_returns_the_supported_set() {
    let app = app(StaticProvider::with_t3_micro());
    let (status, body) = get(&app, "/api/regions").await;
    assert_eq!(status, StatusCode::OK);
    let Some(regions) = body.as_array() else {
        panic!("expected array, got {body}");
    };
    assert_eq!(regions.len(), 10);
    assert!(regions.iter().all(|r| {
        r.get("id").and_then(|v| v.as_str()).is_some_and(|s| !s.is_empty())
            && r.get("name").and_then(|v| v.as_str()).is_some_and(|s| !s.is_empty())
    }));
}

#[tokio::test]
async fn unknown_region_is_a_400_with_wire_message() {
    let app = app(StaticProvider::with_t3_micro());
    for uri in [
        "/api/instances/mars-north-1",
        "/api/price-history/mars-north-1/t3.micro",
        "/api/export/mars-north-1",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(
            body.get("error").and_then(|v| v.as_str()),
            Some("Invalid region"),
            "{uri}"
        );
    }
}

#[tokio::test]
async fn instances_returns_merged_rows_per_os() {
    let app = app(StaticProvider::with_t3_micro());
    let (status, body) = get(&app, "/api/instances/us-east-1").await;
    assert_eq!(status, StatusCode::OK);
    let Some(rows) = body.as_array() else {
        panic!("expected array, got {body}");
    };
    assert_eq!(rows.len(), 2); // Linux + Windows
    for row in rows {
        assert_eq!(
            row.get("instanceType").and_then(|v| v.as_str()),
            Some("t3.micro")
        );
        assert_eq!(row.get("onDemand").and_then(|v| v.as_f64()), Some(0.0104));
        assert_eq!(row.get("spot").and_then(|v| v.as_f64()), Some(0.0031));
        assert!(row.get("spotLastUpdated").is_some_and(|v| !v.is_null()));
    }
}

#[tokio::test]
async fn price_history_seeds_an_empty_series() {
    let app = app(StaticProvider::with_t3_micro());
    let (status, body) = get(&app, "/api/price-history/us-east-1/t3.micro?days=7").await;
    assert_eq!(status, StatusCode::OK);
    let Some(points) = body.as_array() else {
        panic!("expected array, got {body}");
    };
    let count_of = |kind: &str| {
        points
            .iter()
            .filter(|p| p.get("priceType").and_then(|v| v.as_str()) == Some(kind))
            .count()
    };
    assert_eq!(count_of("onDemand"), 7);
    assert_eq!(count_of("spot"), 7);
    assert_eq!(count_of("reserved"), 1);
}

#[tokio::test]
async fn price_history_rejects_unknown_os() {
    let app = app(StaticProvider::with_t3_micro());
    let (status, body) = get(&app, "/api/price-history/us-east-1/t3.micro?os=BeOS").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body.get("error").and_then(|v| v.as_str()),
        Some("Invalid operating system")
    );
}

#[tokio::test]
async fn savings_requires_all_parameters() {
    let app = app(StaticProvider::with_t3_micro());
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/calculate-savings",
        serde_json::json!({ "instanceType": "t2.micro", "region": "us-east-1" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body.get("error").and_then(|v| v.as_str()),
        Some("Missing required parameters")
    );
}

#[tokio::test]
async fn savings_breakdown_for_a_full_month() {
    let app = app(StaticProvider::with_t3_micro());
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/calculate-savings",
        serde_json::json!({
            "instanceType": "t2.micro",
            "region": "us-east-1",
            "os": "Linux",
            "hours": 730
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let f = |key: &str| body.get(key).and_then(|v| v.as_f64()).unwrap_or(f64::NAN);
    assert!((f("onDemandMonthly") - 73.0).abs() < 1e-9);
    assert!((f("reservedMonthly") - 51.1).abs() < 1e-9);
    assert!((f("spotMonthly") - 21.9).abs() < 1e-9);
    assert!((f("reservedSavings") - 21.9).abs() < 1e-9);
    assert!((f("reservedSavingsPercentage") - 30.0).abs() < 1e-9);
    assert!((f("spotSavingsPercentage") - 70.0).abs() < 1e-9);
    assert_eq!(body.get("riTerm").and_then(|v| v.as_str()), Some("1yr"));
    assert_eq!(
        body.get("riPayment").and_then(|v| v.as_str()),
        Some("no_upfront")
    );
    assert_eq!(
        body.get("instanceType").and_then(|v| v.as_str()),
        Some("t2.micro")
    );
}

#[tokio::test]
async fn reserved_terms_exposes_the_discount_table() {
    let app = app(StaticProvider::with_t3_micro());
    let (status, body) = get(&app, "/api/reserved-terms").await;
    assert_eq!(status, StatusCode::OK);
    let discount = body
        .get("1yr")
        .and_then(|v| v.get("no_upfront"))
        .and_then(|v| v.get("discount"))
        .and_then(|v| v.as_f64());
    assert_eq!(discount, Some(0.25));
    assert!(body.get("3yr").is_some());
}

#[tokio::test]
async fn instance_specs_returns_sheet_or_empty_object() {
    let app = app(StaticProvider::with_t3_micro());

    let (status, body) = get(&app, "/api/instance-specs/t3.micro").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body.get("processorInfo").and_then(|v| v.as_str()),
        Some("Intel Xeon Platinum 8259CL")
    );

    let (status, body) = get(&app, "/api/instance-specs/z99.mega").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({}));
}

#[tokio::test]
async fn export_defaults_to_json() {
    let app = app(StaticProvider::with_t3_micro());
    let (status, body) = get(&app, "/api/export/us-east-1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().is_some_and(|rows| rows.len() == 2));
}

#[tokio::test]
async fn export_csv_is_a_named_attachment() {
    let app = app(StaticProvider::with_t3_micro());
    let Ok(request) = Request::builder()
        .uri("/api/export/us-east-1?format=csv")
        .body(Body::empty())
    else {
        panic!("request build failed");
    };
    let Ok(response) = app.clone().oneshot(request).await else {
        panic!("request dispatch failed");
    };
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("text/csv")
    );
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok()),
        Some("attachment; filename=aws-pricing-us-east-1.csv")
    );

    let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
        panic!("body read failed");
    };
    let text = String::from_utf8_lossy(&bytes);
    let mut lines = text.lines();
    assert!(lines.next().is_some_and(|h| h.contains("instanceType")));
    assert_eq!(lines.count(), 2);
}

fn alert_body() -> serde_json::Value {
    serde_json::json!({
        "instanceType": "t3.micro",
        "region": "us-east-1",
        "os": "Linux",
        "priceType": "spot",
        "threshold": 0.005,
        "email": "ops@example.com"
    })
}

#[tokio::test]
async fn alert_creation_returns_201_with_defaults() {
    let app = app(StaticProvider::with_t3_micro());
    let (status, body) = send_json(&app, "POST", "/api/price-alerts", alert_body()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.get("active").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(
        body.get("notificationCount").and_then(|v| v.as_i64()),
        Some(0)
    );
    assert!(body.get("lastNotified").is_some_and(|v| v.is_null()));
    assert!(body.get("id").and_then(|v| v.as_str()).is_some());
}

#[tokio::test]
async fn alert_creation_validates_input() {
    let app = app(StaticProvider::with_t3_micro());

    let mut missing = alert_body();
    if let Some(obj) = missing.as_object_mut() {
        obj.remove("threshold");
    }
    let (status, body) = send_json(&app, "POST", "/api/price-alerts", missing).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body.get("error").and_then(|v| v.as_str()),
        Some("Missing required fields")
    );

    let mut bad_email = alert_body();
    if let Some(obj) = bad_email.as_object_mut() {
        obj.insert("email".to_string(), serde_json::json!("not-an-email"));
    }
    let (status, body) = send_json(&app, "POST", "/api/price-alerts", bad_email).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body.get("error").and_then(|v| v.as_str()),
        Some("Invalid email format")
    );
}

#[tokio::test]
async fn alert_listing_requires_email() {
    let app = app(StaticProvider::with_t3_micro());
    let (status, body) = get(&app, "/api/price-alerts").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body.get("error").and_then(|v| v.as_str()),
        Some("Email is required")
    );
}

#[tokio::test]
async fn alert_crud_round_trip() {
    let app = app(StaticProvider::with_t3_micro());

    let (status, created) = send_json(&app, "POST", "/api/price-alerts", alert_body()).await;
    assert_eq!(status, StatusCode::CREATED);
    let Some(id) = created.get("id").and_then(|v| v.as_str()).map(String::from) else {
        panic!("created alert has no id: {created}");
    };

    let (status, listed) = get(&app, "/api/price-alerts?email=ops@example.com").await;
    assert_eq!(status, StatusCode::OK);
    assert!(listed.as_array().is_some_and(|a| a.len() == 1));

    let (status, updated) = send_json(
        &app,
        "PUT",
        &format!("/api/price-alerts/{id}"),
        serde_json::json!({ "threshold": 0.004, "active": false }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated.get("threshold").and_then(|v| v.as_f64()), Some(0.004));
    assert_eq!(updated.get("active").and_then(|v| v.as_bool()), Some(false));

    let (status, deleted) = send_json(
        &app,
        "DELETE",
        &format!("/api/price-alerts/{id}"),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, serde_json::json!({ "success": true }));

    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/api/price-alerts/{id}"),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn updating_an_unknown_alert_is_404() {
    let app = app(StaticProvider::with_t3_micro());
    let (status, _) = send_json(
        &app,
        "PUT",
        "/api/price-alerts/00000000-0000-0000-0000-000000000000",
        serde_json::json!({ "active": false }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
