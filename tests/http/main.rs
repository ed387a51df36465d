//! HTTP transport integration tests.
//!
//! Starts an axum server and exercises it with reqwest.

#![cfg(feature = "http")]

use std::sync::Arc;

use prize_wheel::{
    http, CodeRecord, InMemoryTable, LockedInventory, LockedLedger, PrizeRecord,
    RedemptionCoordinator, RngSource, Table,
};
use serde_json::{json, Value};

type Wheel = RedemptionCoordinator<
    LockedInventory<InMemoryTable<PrizeRecord>>,
    LockedLedger<InMemoryTable<CodeRecord>>,
    RngSource<rand::rngs::StdRng>,
>;

fn wheel() -> Arc<Wheel> {
    let prizes = InMemoryTable::from_rows(vec![
        PrizeRecord::new("A", 1, 1),
        PrizeRecord::new("B", 1, 0),
        PrizeRecord::new("C", 2, 5),
    ])
    .unwrap();
    let codes = InMemoryTable::from_rows(vec![CodeRecord::unused("X1")]).unwrap();
    Arc::new(
        RedemptionCoordinator::new(LockedInventory::new(prizes), LockedLedger::new(codes))
            .with_random_source(RngSource::seeded(11)),
    )
}

/// Bind to port 0 and return the actual address.
async fn start_server(wheel: Arc<Wheel>) -> String {
    let app = http::router(wheel);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn spin(client: &reqwest::Client, base: &str, body: Value) -> (u16, Value) {
    let resp = client
        .post(format!("{base}/spin"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

#[tokio::test]
async fn health_check() {
    let base = start_server(wheel()).await;

    let resp = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "ok": true }));
}

#[tokio::test]
async fn prizes_lists_every_segment() {
    let base = start_server(wheel()).await;

    let body: Value = reqwest::get(format!("{base}/prizes"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["names"], json!(["A", "B", "C"]));
    assert_eq!(body["degraded"], json!(false));
    assert_eq!(body["segments"][1], json!({ "name": "B", "has_stock": false }));
}

#[tokio::test]
async fn spin_awards_then_rejects_reuse() {
    let wheel = wheel();
    let base = start_server(wheel.clone()).await;
    let client = reqwest::Client::new();

    let (status, body) = spin(&client, &base, json!({ "code": "x1", "nickname": "Ann" })).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["total_segments"], 3);
    assert_eq!(body["all_names"], json!(["A", "B", "C"]));
    let prize = body["prize"].as_str().unwrap().to_string();
    assert_ne!(prize, "B");

    let (status, body) = spin(&client, &base, json!({ "code": "X1", "nickname": "Bob" })).await;
    assert_eq!(status, 403);
    assert_eq!(body, json!({ "status": "CODE_USED" }));

    let record = wheel.ledger().table().get("X1").unwrap().unwrap();
    assert_eq!(record.redeemer(), Some("Ann"));
    assert_eq!(record.awarded_prize(), Some(prize.as_str()));
}

#[tokio::test]
async fn spin_maps_rejections_to_status_codes() {
    let base = start_server(wheel()).await;
    let client = reqwest::Client::new();

    let (status, body) = spin(&client, &base, json!({ "code": "NOPE", "nickname": "Ann" })).await;
    assert_eq!(status, 404);
    assert_eq!(body["status"], "CODE_INVALID");

    let (status, body) = spin(&client, &base, json!({ "code": "X1" })).await;
    assert_eq!(status, 400);
    assert_eq!(body["status"], "BAD_INPUT");
}

#[tokio::test]
async fn unreadable_spin_body_is_bad_input() {
    let base = start_server(wheel()).await;
    let client = reqwest::Client::new();

    let requests = [
        client
            .post(format!("{base}/spin"))
            .header("content-type", "application/json")
            .body("{ not json"),
        client.post(format!("{base}/spin")).body(r#"{"code":"X1","nickname":"Ann"}"#),
        client.post(format!("{base}/spin")).json(&json!("X1")),
    ];
    for request in requests {
        let resp = request.send().await.unwrap();
        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!({ "status": "BAD_INPUT" }));
    }
}
