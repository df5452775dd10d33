//! Configuration resolution tests
//!
//! Uses serial_test: these tests set process-wide environment variables.

use djset_ai::backends::BackendKind;
use djset_ai::config::{
    CliOverrides, Settings, CORPUS_PLAYLIST_ENV, SPOTIFY_CLIENT_ID_ENV, SPOTIFY_CLIENT_SECRET_ENV,
    SPOTIFY_REDIRECT_URI_ENV,
};
use djset_common::config::{parse_toml_config, TomlConfig, DEFAULT_CORPUS_PLAYLIST, DEFAULT_PORT};
use djset_common::Error;
use serial_test::serial;
use std::path::PathBuf;

const VARS: [&str; 6] = [
    "GEMINI_API_KEY",
    "DEEPSEEK_API_KEY",
    SPOTIFY_CLIENT_ID_ENV,
    SPOTIFY_CLIENT_SECRET_ENV,
    SPOTIFY_REDIRECT_URI_ENV,
    CORPUS_PLAYLIST_ENV,
];

fn clear_env() {
    for var in VARS {
        std::env::remove_var(var);
    }
}

fn sample_toml() -> TomlConfig {
    parse_toml_config(
        r#"
database_path = "/tmp/djset-test.db"

[server]
port = 6000

[generation]
backend = "deepseek"

[generation.gemini]
api_key = "toml-gemini"

[generation.deepseek]
api_key = "toml-deepseek"
model = "deepseek-reasoner"

[spotify]
client_id = "toml-client"
client_secret = "toml-secret"
default_playlist_name = "Salsa Pool"

[logging]
level = "debug"
"#,
    )
    .unwrap()
}

#[test]
#[serial]
fn test_defaults_without_file_or_env() {
    clear_env();

    let settings = Settings::resolve(&TomlConfig::default(), &CliOverrides::default()).unwrap();

    assert_eq!(settings.port, DEFAULT_PORT);
    assert_eq!(settings.backend, BackendKind::Gemini);
    assert!(settings.backend_settings.api_key.is_none());
    assert!(settings.spotify.client_id.is_none());
    assert_eq!(
        settings.spotify.redirect_uri,
        format!("http://127.0.0.1:{}/callback", DEFAULT_PORT)
    );
    assert_eq!(settings.corpus_playlist, DEFAULT_CORPUS_PLAYLIST);
}

#[test]
#[serial]
fn test_toml_values_used() {
    clear_env();

    let settings = Settings::resolve(&sample_toml(), &CliOverrides::default()).unwrap();

    assert_eq!(settings.port, 6000);
    assert_eq!(settings.backend, BackendKind::Deepseek);
    assert_eq!(settings.backend_settings.api_key.as_deref(), Some("toml-deepseek"));
    assert_eq!(settings.backend_settings.model.as_deref(), Some("deepseek-reasoner"));
    assert_eq!(settings.spotify.client_id.as_deref(), Some("toml-client"));
    assert_eq!(settings.spotify.redirect_uri, "http://127.0.0.1:6000/callback");
    assert_eq!(settings.corpus_playlist, "Salsa Pool");
    assert_eq!(settings.database_path, PathBuf::from("/tmp/djset-test.db"));
}

#[test]
#[serial]
fn test_environment_overrides_toml() {
    clear_env();
    std::env::set_var("DEEPSEEK_API_KEY", "env-deepseek");
    std::env::set_var(SPOTIFY_CLIENT_ID_ENV, "env-client");
    std::env::set_var(SPOTIFY_REDIRECT_URI_ENV, "https://djset.example/callback");
    std::env::set_var(CORPUS_PLAYLIST_ENV, "Env Pool");

    let settings = Settings::resolve(&sample_toml(), &CliOverrides::default()).unwrap();

    assert_eq!(settings.backend_settings.api_key.as_deref(), Some("env-deepseek"));
    assert_eq!(settings.spotify.client_id.as_deref(), Some("env-client"));
    assert_eq!(settings.spotify.client_secret.as_deref(), Some("toml-secret"));
    assert_eq!(settings.spotify.redirect_uri, "https://djset.example/callback");
    assert_eq!(settings.corpus_playlist, "Env Pool");

    clear_env();
}

#[test]
#[serial]
fn test_blank_environment_value_ignored() {
    clear_env();
    std::env::set_var("DEEPSEEK_API_KEY", "   ");

    let settings = Settings::resolve(&sample_toml(), &CliOverrides::default()).unwrap();
    assert_eq!(settings.backend_settings.api_key.as_deref(), Some("toml-deepseek"));

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_toml() {
    clear_env();
    std::env::set_var("GEMINI_API_KEY", "env-gemini");

    let cli = CliOverrides {
        port: Some(7000),
        backend: Some("Gemini".to_string()),
        database_path: Some(PathBuf::from("/tmp/cli.db")),
    };
    let settings = Settings::resolve(&sample_toml(), &cli).unwrap();

    assert_eq!(settings.port, 7000);
    assert_eq!(settings.backend, BackendKind::Gemini);
    assert_eq!(settings.backend_settings.api_key.as_deref(), Some("env-gemini"));
    assert!(settings.backend_settings.model.is_none());
    assert_eq!(settings.database_path, PathBuf::from("/tmp/cli.db"));
    assert_eq!(settings.spotify.redirect_uri, "http://127.0.0.1:7000/callback");

    clear_env();
}

#[test]
#[serial]
fn test_unknown_backend_is_config_error() {
    clear_env();

    let cli = CliOverrides {
        backend: Some("openai".to_string()),
        ..Default::default()
    };
    let result = Settings::resolve(&TomlConfig::default(), &cli);

    match result {
        Err(Error::Config(msg)) => assert!(msg.contains("openai")),
        other => panic!("expected config error, got {:?}", other.map(|s| s.backend)),
    }
}
