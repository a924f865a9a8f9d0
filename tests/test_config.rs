//! Configuration and builder tests.

use std::time::Duration;

use agrimarket_sdk::config::{
    API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_LIMIT, DEFAULT_RADIUS_KM,
};
use agrimarket_sdk::{MarketConfig, MarketError, MarketSdk};

#[test]
fn config_defaults() {
    let config = MarketConfig::new("k");
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.timeout, None);
    assert_eq!(DEFAULT_LIMIT, 20);
    assert_eq!(DEFAULT_RADIUS_KM, 50.0);
}

// Environment variables are process-wide, so every `from_env` case lives in
// this one test.
#[test]
fn from_env_requires_key_and_honours_base_url_override() {
    std::env::remove_var(API_KEY_ENV);
    std::env::remove_var(BASE_URL_ENV);
    let err = MarketConfig::from_env().unwrap_err();
    assert!(matches!(err, MarketError::InvalidArgument(ref m) if m.contains(API_KEY_ENV)));

    std::env::set_var(API_KEY_ENV, "   ");
    assert!(MarketConfig::from_env().is_err());

    std::env::set_var(API_KEY_ENV, "env-key");
    let config = MarketConfig::from_env().unwrap();
    assert_eq!(config.api_key, "env-key");
    assert_eq!(config.base_url, DEFAULT_BASE_URL);

    std::env::set_var(BASE_URL_ENV, "http://127.0.0.1:9/resource/mirror");
    let config = MarketConfig::from_env().unwrap();
    assert_eq!(config.base_url, "http://127.0.0.1:9/resource/mirror");
    assert_eq!(config.timeout, None);

    let sdk = MarketSdk::from_env().unwrap();
    assert_eq!(sdk.fetcher().config.base_url, "http://127.0.0.1:9/resource/mirror");

    std::env::remove_var(API_KEY_ENV);
    std::env::remove_var(BASE_URL_ENV);
}

#[test]
fn builder_applies_config() {
    let sdk = MarketSdk::builder()
        .api_key("k")
        .base_url("http://127.0.0.1:1/resource/x")
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    let config = &sdk.fetcher().config;
    assert_eq!(config.api_key, "k");
    assert_eq!(config.base_url, "http://127.0.0.1:1/resource/x");
    assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    assert!(!sdk.fetcher().offline);
    assert!(sdk.fetcher().snapshots().is_none());
}

#[test]
fn display_mentions_endpoint_and_mode() {
    let tmp = tempfile::tempdir().unwrap();
    let sdk = MarketSdk::builder()
        .offline(true)
        .cache_dir(tmp.path())
        .build()
        .unwrap();
    let shown = sdk.to_string();
    assert!(shown.contains(DEFAULT_BASE_URL));
    assert!(shown.contains("offline=true"));
}

#[test]
fn clear_snapshots_without_cache_is_noop() {
    let sdk = MarketSdk::builder().api_key("k").build().unwrap();
    sdk.clear_snapshots().unwrap();
}
