//! Async wrapper tests (requires the `async` feature).

#![cfg(feature = "async")]

mod common;

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use agrimarket_sdk::{AsyncMarketSdk, FilterCriteria, MarketField, MarketSession};
use common::{registry_body, StubServer};
use serde_json::json;

async fn sdk_for(server: &StubServer) -> AsyncMarketSdk {
    AsyncMarketSdk::builder()
        .api_key("test-key")
        .base_url(server.base_url.clone())
        .build()
        .await
        .unwrap()
}

#[tokio::test]
async fn fetch_market_data_runs_on_blocking_pool() {
    let server = StubServer::ok(&registry_body());
    let sdk = sdk_for(&server).await;

    let records = sdk
        .fetch_market_data(FilterCriteria::new().search("onion"))
        .await
        .unwrap();
    assert_eq!(records.len(), 2);
    sdk.close().await.unwrap();
}

#[tokio::test]
async fn fetch_for_applies_current_ticket() {
    let server = StubServer::ok(&registry_body());
    let sdk = sdk_for(&server).await;

    let session = Mutex::new(MarketSession::new());
    session
        .lock()
        .unwrap()
        .set_filter(MarketField::State, "Maharashtra");
    assert!(sdk.fetch_for(&session).await.unwrap());

    let s = session.lock().unwrap();
    assert_eq!(s.insights().unwrap().records.len(), 4);
    drop(s);
    sdk.close().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn newer_fetch_wins_over_slow_stale_one() {
    let stale_body = json!({"total": 1, "records": [{"state": "Goa", "market": "Mapusa"}]});
    let server = StubServer::serve_delayed(vec![
        (200, stale_body.to_string(), Duration::from_millis(1500)),
        (200, registry_body().to_string(), Duration::ZERO),
    ]);
    let sdk = sdk_for(&server).await;
    let session = Arc::new(Mutex::new(MarketSession::new()));

    let stale = tokio::spawn({
        let sdk = sdk.clone();
        let session = session.clone();
        async move {
            let applied = sdk.fetch_for(&session).await;
            sdk.close().await.unwrap();
            applied
        }
    });
    while server.request_count() < 1 {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    session
        .lock()
        .unwrap()
        .set_filter(MarketField::State, "Maharashtra");
    let started = Instant::now();
    assert!(sdk.fetch_for(&session).await.unwrap());
    assert!(
        started.elapsed() < Duration::from_millis(1000),
        "newer fetch waited {:?} for the stale one",
        started.elapsed()
    );
    assert!(!session.lock().unwrap().is_loading());

    assert!(!stale.await.unwrap().unwrap());
    let s = session.lock().unwrap();
    let insights = s.insights().unwrap();
    assert_eq!(insights.records.len(), 4);
    assert!(insights.records.iter().all(|r| r.market != "Mapusa"));
    drop(s);

    sdk.close().await.unwrap();
}

#[tokio::test]
async fn network_failure_is_reported() {
    let server = StubServer::serve(vec![(500, "{}".to_string())]);
    let sdk = sdk_for(&server).await;
    let err = sdk
        .fetch_market_data(FilterCriteria::new())
        .await
        .unwrap_err();
    assert!(err.is_network());
    sdk.close().await.unwrap();
}
