use super::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.http.host, "127.0.0.1");
    assert_eq!(config.http.port, 5000);
    assert_eq!(config.providers.len(), 1);
    assert_eq!(config.providers[0].kind, ProviderKind::Microsoft);
    assert_eq!(config.providers[0].route_prefix, "/microsoft");
    assert!(config.validate().is_ok());
}

#[test]
fn test_microsoft_builtin_endpoints() {
    let provider = ProviderConfig::microsoft();
    assert_eq!(
        provider.authorization_endpoint.as_str(),
        MICROSOFT_AUTHORIZATION_ENDPOINT
    );
    assert_eq!(provider.token_endpoint.as_str(), MICROSOFT_TOKEN_ENDPOINT);
    assert_eq!(provider.userinfo_endpoint.as_str(), MICROSOFT_USERINFO_ENDPOINT);
    assert!(provider.validate().is_ok());
}

#[test]
fn test_config_serialization() {
    let config = Config::default();
    let json = serde_json::to_string_pretty(&config).unwrap();
    assert!(json.contains("routePrefix"));
    assert!(json.contains("tokenEndpoint"));

    let parsed: Config = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.providers, config.providers);
}

#[test]
fn test_missing_file_yields_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::load_from_path(temp_dir.path().join("absent.json")).unwrap();
    assert_eq!(config.providers, vec![ProviderConfig::microsoft()]);
}

#[test]
fn test_config_load_from_json_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("adapter.config.json");

    let config_content = r#"
{
    "http": { "host": "0.0.0.0", "port": 8080 },
    "upstream": { "timeoutSecs": 5 },
    "cache": { "sweepIntervalSecs": 0 },
    "providers": [
        {
            "kind": "oidc",
            "routePrefix": "google/",
            "authorizationEndpoint": "https://accounts.example.com/o/oauth2/v2/auth",
            "tokenEndpoint": "https://oauth2.example.com/token",
            "userinfoEndpoint": "https://openidconnect.example.com/v1/userinfo"
        }
    ]
}
"#;

    fs::write(&config_path, config_content).unwrap();
    let config = Config::load_from_path(&config_path).unwrap();

    assert_eq!(config.http.host, "0.0.0.0");
    assert_eq!(config.http.port, 8080);
    assert_eq!(config.upstream.timeout_secs, 5);
    assert_eq!(config.upstream.connect_timeout_secs, 10);
    assert_eq!(config.cache.sweep_interval(), None);
    assert_eq!(config.providers[0].kind, ProviderKind::Oidc);
    assert_eq!(config.providers[0].route_prefix, "/google");
}

#[test]
fn test_config_load_from_yaml_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("adapter.yaml");

    let config_content = r#"
http:
  port: 6000
providers:
  - kind: microsoft
    routePrefix: /ms
    authorizationEndpoint: https://login.example.com/authorize
    tokenEndpoint: https://login.example.com/token
    userinfoEndpoint: https://graph.example.com/oidc/userinfo
"#;

    fs::write(&config_path, config_content).unwrap();
    let config = Config::load_from_path(&config_path).unwrap();

    assert_eq!(config.http.host, "127.0.0.1");
    assert_eq!(config.http.port, 6000);
    assert_eq!(config.providers[0].route_prefix, "/ms");
    assert_eq!(
        config.cache.sweep_interval(),
        Some(Duration::from_secs(300))
    );
}

#[test]
fn test_providers_default_to_microsoft_when_omitted() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("adapter.config.json");
    fs::write(&config_path, r#"{"http": {"port": 7000}}"#).unwrap();

    let config = Config::load_from_path(&config_path).unwrap();
    assert_eq!(config.providers, vec![ProviderConfig::microsoft()]);
}

#[test]
fn test_env_references_are_expanded() {
    unsafe {
        std::env::set_var(
            "OIDC_ADAPTER_TEST_TOKEN_URL",
            "https://tenant.example.com/oauth2/v2.0/token",
        );
    }

    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("adapter.config.json");
    fs::write(
        &config_path,
        r#"{
            "providers": [{
                "kind": "microsoft",
                "routePrefix": "/microsoft",
                "authorizationEndpoint": "https://tenant.example.com/oauth2/v2.0/authorize",
                "tokenEndpoint": "$env:OIDC_ADAPTER_TEST_TOKEN_URL",
                "userinfoEndpoint": "https://graph.example.com/oidc/userinfo"
            }]
        }"#,
    )
    .unwrap();

    let config = Config::load_from_path(&config_path).unwrap();
    assert_eq!(
        config.providers[0].token_endpoint.as_str(),
        "https://tenant.example.com/oauth2/v2.0/token"
    );
}

#[test]
fn test_expand_env_value() {
    unsafe {
        std::env::set_var("OIDC_ADAPTER_TEST_VAR", "test_value");
    }
    assert_eq!(expand_env_value("$env:OIDC_ADAPTER_TEST_VAR"), "test_value");
    assert_eq!(expand_env_value("plain_value"), "plain_value");
    assert_eq!(
        expand_env_value("$env:OIDC_ADAPTER_TEST_UNSET_VAR"),
        "$env:OIDC_ADAPTER_TEST_UNSET_VAR"
    );
}

#[test]
fn test_invalid_json_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("adapter.config.json");
    fs::write(&config_path, "{ not json").unwrap();

    let err = Config::load_from_path(&config_path).unwrap_err();
    assert!(matches!(err, AdapterError::Config(_)));
}

#[test]
fn test_relative_endpoint_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("adapter.config.json");
    fs::write(
        &config_path,
        r#"{"providers": [{
            "kind": "oidc",
            "routePrefix": "/x",
            "authorizationEndpoint": "/authorize",
            "tokenEndpoint": "https://idp.example.com/token",
            "userinfoEndpoint": "https://idp.example.com/userinfo"
        }]}"#,
    )
    .unwrap();

    assert!(Config::load_from_path(&config_path).is_err());
}

#[test]
fn test_config_validation() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.http.port = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.http.host = String::new();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.providers.clear();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.providers[0].route_prefix = "/".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.providers[0].token_endpoint = Url::parse("ftp://files.example.com/token").unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_duplicate_prefixes_are_rejected() {
    let mut config = Config::default();
    let mut other = ProviderConfig::microsoft();
    other.kind = ProviderKind::Oidc;
    other.route_prefix = "/MICROSOFT/".to_string();
    config.providers.push(other);

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("duplicate"));
}

#[test]
fn test_normalize_route_prefix() {
    assert_eq!(normalize_route_prefix("microsoft"), "/microsoft");
    assert_eq!(normalize_route_prefix("/microsoft/"), "/microsoft");
    assert_eq!(normalize_route_prefix(" /idp/v2 "), "/idp/v2");
    assert_eq!(normalize_route_prefix("/"), "");
    assert_eq!(normalize_route_prefix(""), "");
}
