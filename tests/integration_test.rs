use tavily_search_gateway::{Config, Error};

#[tokio::test]
async fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.provider.endpoint, "https://api.tavily.com");
    assert_eq!(config.provider.timeout_secs, 30);
    assert_eq!(config.search.default_search_depth, "advanced");
    assert_eq!(config.search.default_max_results, 5);
    assert_eq!(config.cache.ttl_secs, 300);
}

#[tokio::test]
async fn test_config_validation() {
    let mut config = Config::default();

    // Valid config should pass
    assert!(config.validate().is_ok());

    // Invalid endpoint
    config.provider.endpoint = "://bad".to_string();
    assert!(matches!(config.validate(), Err(Error::InvalidInput { .. })));
    config.provider.endpoint = "https://api.tavily.com".to_string();

    // Zero timeout
    config.provider.timeout_secs = 0;
    assert!(matches!(config.validate(), Err(Error::InvalidInput { .. })));
    config.provider.timeout_secs = 30;

    // Zero max results
    config.search.default_max_results = 0;
    assert!(matches!(config.validate(), Err(Error::InvalidInput { .. })));
    config.search.default_max_results = 5;

    // Unknown search depth
    config.search.default_search_depth = "deep".to_string();
    assert!(matches!(config.validate(), Err(Error::InvalidInput { .. })));
}

#[test]
fn test_error_chain() {
    let err = Error::InvalidInput {
        field: "query".to_string(),
        reason: "test error".to_string(),
    };
    assert_eq!(format!("{}", err), "Invalid input: query - test error");
}

#[test]
fn test_config_file_round_trip() {
    use std::io::Write;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        "[provider]\nendpoint = \"https://mock.example\"\ntimeout_secs = 5\n\n[cache]\nttl_secs = 60\n"
    )
    .unwrap();

    let overrides = tavily_search_gateway::ConfigOverrides {
        config_path: Some(path),
        ..Default::default()
    };
    let config = Config::load_with_overrides(&overrides).unwrap();
    assert_eq!(config.provider.endpoint, "https://mock.example");
    assert_eq!(config.provider.timeout_secs, 5);
    assert_eq!(config.cache.ttl_secs, 60);
    // Unspecified sections keep their defaults.
    assert_eq!(config.search.default_max_results, 5);
}

#[test]
fn test_cli_overrides_win_over_file() {
    use std::io::Write;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "[provider]\ntimeout_secs = 5\n").unwrap();

    let overrides = tavily_search_gateway::ConfigOverrides {
        config_path: Some(path),
        timeout_secs: Some(9),
        api_key: Some("cli-key".to_string()),
        ..Default::default()
    };
    let config = Config::load_with_overrides(&overrides).unwrap();
    assert_eq!(config.provider.timeout_secs, 9);
    assert_eq!(config.provider.api_key.as_deref(), Some("cli-key"));
}
