use std::env;
use std::io::Write;

use metatag::config::AppConfig;
use serial_test::serial;

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        env::remove_var("METATAG_SERVER__PORT");
        env::remove_var("METATAG_SERVER__HOST");
        env::remove_var("METATAG_BACKEND__BASE_URL");
        env::remove_var("CONFIG_FILE");
        env::remove_var("PORT");
        env::remove_var("BACKEND_URL");
    }
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = AppConfig::load_from_args(["metatag"]).expect("defaults should load");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.backend.base_url, "http://localhost:8000");
    assert_eq!(config.backend.request_timeout_secs, 120);
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("METATAG_SERVER__PORT", "9090");
        env::set_var("METATAG_BACKEND__BASE_URL", "http://10.0.0.5:8000");
    }

    let config = AppConfig::load_from_args(["metatag"]).expect("Failed to load config");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.backend.base_url, "http://10.0.0.5:8000");

    clear_env_vars();
}

#[test]
#[serial]
fn test_clap_env_fallback() {
    clear_env_vars();
    unsafe {
        env::set_var("PORT", "6060");
        env::set_var("BACKEND_URL", "http://127.0.0.1:7000");
    }

    let config = AppConfig::load_from_args(["metatag"]).expect("Failed to load config");
    assert_eq!(config.server.port, 6060);
    assert_eq!(config.backend.base_url, "http://127.0.0.1:7000");

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let config_content = r#"
server:
  port: 7070
backend:
  base_url: "http://backend.internal:8000"
"#;

    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("Failed to create temp config");
    file.write_all(config_content.as_bytes())
        .expect("Failed to write temp config");

    let path = file.path().to_string_lossy().into_owned();
    let config = AppConfig::load_from_args(["metatag", "--config", &path])
        .expect("Failed to load config from file");

    assert_eq!(config.server.port, 7070);
    assert_eq!(config.backend.base_url, "http://backend.internal:8000");
    // Keys the file omits keep their defaults.
    assert_eq!(config.backend.request_timeout_secs, 120);
}

#[test]
#[serial]
fn test_cli_flags_win_over_env() {
    clear_env_vars();
    unsafe {
        env::set_var("METATAG_SERVER__PORT", "9090");
    }

    let config = AppConfig::load_from_args(["metatag", "--port", "8081"])
        .expect("Failed to load config");
    assert_eq!(config.server.port, 8081);

    clear_env_vars();
}
