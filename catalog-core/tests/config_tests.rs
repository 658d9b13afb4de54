use catalog_core::{ApiClient, AppConfig};

#[test]
fn config_round_trips_through_file() {
    let mut path = std::env::temp_dir();
    path.push(format!(
        "artifact_catalog_config_{}.json",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));

    let mut config = AppConfig::default();
    config.api.base_url = "http://museum.test/backend".into();
    config.catalog.items_per_page = 8;
    config.save_to(&path).unwrap();

    let loaded = AppConfig::load_from(&path).unwrap();
    assert_eq!(loaded, config);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn missing_sections_use_defaults() {
    let loaded: AppConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(loaded, AppConfig::default());
    assert_eq!(loaded.catalog.items_per_page, 16);
    assert_eq!(loaded.api.request_timeout_seconds, 10);
}

#[test]
fn endpoints_keep_base_path_prefix() {
    let mut config = AppConfig::default();
    config.api.base_url = "http://museum.test/backend/".into();
    let client = ApiClient::new(&config.api).unwrap();
    let url = client.endpoint(&["api", "liked", "42"]).unwrap();
    assert_eq!(url.as_str(), "http://museum.test/backend/api/liked/42");

    config.api.base_url = "http://museum.test".into();
    let client = ApiClient::new(&config.api).unwrap();
    assert_eq!(
        client.endpoint(&["api", "liked"]).unwrap().as_str(),
        "http://museum.test/api/liked"
    );
}

#[test]
fn unusable_base_url_is_rejected() {
    let mut config = AppConfig::default();
    config.api.base_url = "mailto:curator@museum.test".into();
    assert!(ApiClient::new(&config.api).is_err());
}
