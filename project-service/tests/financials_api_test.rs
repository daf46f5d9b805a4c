//! Financial summary endpoints served in-process. No database required.

mod common;

use axum::http::{Method, StatusCode};
use common::{router, send};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;

fn dec(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("decimal serialized as string")).unwrap()
}

async fn summary(body: Value) -> Value {
    let (status, json) = send(&router(), Method::POST, "/financials/summary", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    json
}

#[tokio::test]
async fn over_budget_material_reports_a_loss() {
    let body = summary(json!({
        "materials": [{ "quotationQty": 2, "quotationPrice": 100, "realQty": 2, "realPrice": 120 }],
        "services": [],
        "acUnits": []
    }))
    .await;

    assert_eq!(dec(&body["totalQuotation"]), Decimal::from(200));
    assert_eq!(dec(&body["totalReal"]), Decimal::from(240));
    assert_eq!(dec(&body["profitLoss"]), Decimal::from(-40));
    assert_eq!(body["isProfitable"], false);
}

#[tokio::test]
async fn missing_real_fields_count_as_zero() {
    let body = summary(json!({
        "materials": [{ "quotationQty": 5, "quotationPrice": 10 }]
    }))
    .await;

    assert_eq!(dec(&body["totalQuotation"]), Decimal::from(50));
    assert_eq!(dec(&body["totalReal"]), Decimal::ZERO);
    assert_eq!(dec(&body["profitLoss"]), Decimal::from(50));
    assert_eq!(body["isProfitable"], true);
}

#[tokio::test]
async fn break_even_ac_unit_is_profitable() {
    let body = summary(json!({
        "acUnits": [{
            "acType": "1PK",
            "quotationQty": 1,
            "quotationPrice": 3000000,
            "realQty": 1,
            "realPrice": 3000000
        }]
    }))
    .await;

    assert_eq!(dec(&body["profitLoss"]), Decimal::ZERO);
    assert_eq!(body["isProfitable"], true);
}

#[tokio::test]
async fn mixed_collections_net_out() {
    let body = summary(json!({
        "materials": [{ "quotationQty": 1, "quotationPrice": 1000000, "realQty": 1, "realPrice": 900000 }],
        "services": [{ "quotationQty": 1, "quotationPrice": 500000, "realQty": 1, "realPrice": 600000 }],
        "acUnits": [{ "acType": "2PK", "quotationQty": 1, "quotationPrice": 3000000, "realQty": 1, "realPrice": 3000000 }]
    }))
    .await;

    assert_eq!(dec(&body["totalQuotation"]), Decimal::from(4_500_000));
    assert_eq!(dec(&body["totalReal"]), Decimal::from(4_500_000));
    assert_eq!(dec(&body["profitLoss"]), Decimal::ZERO);
    assert_eq!(body["isProfitable"], true);
}

#[tokio::test]
async fn empty_and_null_collections_are_break_even() {
    let body = summary(json!({ "materials": null })).await;

    assert_eq!(dec(&body["totalQuotation"]), Decimal::ZERO);
    assert_eq!(dec(&body["totalReal"]), Decimal::ZERO);
    assert_eq!(body["isProfitable"], true);
}

#[tokio::test]
async fn non_numeric_fields_are_coerced_to_zero() {
    let body = summary(json!({
        "materials": [
            { "name": "Pipa", "quotationQty": "3", "quotationPrice": "abc", "realQty": null, "realPrice": true },
            { "name": "Kabel", "quotationQty": "2", "quotationPrice": "12.5" }
        ]
    }))
    .await;

    assert_eq!(dec(&body["totalQuotation"]), Decimal::from(25));
    assert_eq!(dec(&body["totalReal"]), Decimal::ZERO);
}

#[tokio::test]
async fn breakdown_returns_rows_and_inventory() {
    let (status, body) = send(
        &router(),
        Method::POST,
        "/financials/breakdown",
        Some(json!({
            "materials": [{ "name": "Pipa", "quotationQty": 2, "quotationPrice": 100, "realQty": 2, "realPrice": 120 }],
            "acUnits": [
                { "acType": "1PK", "quotationQty": 2, "quotationPrice": 10 },
                { "acType": "1PK", "quotationQty": 1, "quotationPrice": 10 }
            ]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(dec(&body["summary"]["totalQuotation"]), Decimal::from(230));
    assert_eq!(dec(&body["materialSummary"]["difference"]), Decimal::from(40));
    assert_eq!(dec(&body["materialSummary"]["totalDeviation"]), Decimal::from(20));

    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["kind"], "material");
    assert_eq!(items[0]["label"], "Pipa");
    assert_eq!(items[0]["isProfitable"], false);
    assert_eq!(items[2]["kind"], "ac_unit");

    assert_eq!(dec(&body["acUnits"]["totalUnits"]), Decimal::from(3));
    assert_eq!(body["acUnits"]["byType"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let (status, _) = send(
        &router(),
        Method::POST,
        "/financials/summary",
        Some(json!({ "materials": "not a list" })),
    )
    .await;

    assert!(status.is_client_error());
}

#[tokio::test]
async fn health_does_not_require_database() {
    let (status, body) = send(&router(), Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "project-service");
}

#[tokio::test]
async fn metrics_are_exposed_after_a_summary() {
    let app = router();
    summary(json!({ "materials": [{ "quotationQty": 1, "quotationPrice": 1 }] })).await;

    let request = axum::http::Request::builder()
        .uri("/metrics")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("project_summary_calculations_total"));
}

#[tokio::test]
async fn unknown_status_filter_is_rejected_before_querying() {
    let (status, body) = send(&router(), Method::GET, "/dashboard?status=archived", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("archived"));
}
