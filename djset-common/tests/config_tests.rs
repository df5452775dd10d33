//! Tests for TOML configuration loading
//!
//! - Missing files fall back to defaults
//! - Partial files fill unspecified sections with defaults
//! - Malformed files are reported as configuration errors

use djset_common::config::{
    load_toml_config, parse_toml_config, DEFAULT_PORT,
};
use djset_common::Error;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.toml");

    let config = load_toml_config(&path).unwrap();

    assert_eq!(config.server.port, DEFAULT_PORT);
    assert_eq!(config.logging.level, "info");
    assert!(config.generation.backend.is_none());
    assert!(config.spotify.client_id.is_none());
}

#[test]
fn test_full_file_is_parsed() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
database_path = "/tmp/djset-test.db"

[server]
port = 6000

[generation]
backend = "deepseek"

[generation.deepseek]
api_key = "ds-key"
model = "deepseek-reasoner"

[spotify]
client_id = "cid"
client_secret = "secret"
redirect_uri = "http://127.0.0.1:6000/callback"
default_playlist_name = "Salsa Library"

[logging]
level = "debug"
"#
    )
    .unwrap();

    let config = load_toml_config(file.path()).unwrap();

    assert_eq!(config.server.port, 6000);
    assert_eq!(config.generation.backend.as_deref(), Some("deepseek"));
    assert_eq!(config.generation.deepseek.api_key.as_deref(), Some("ds-key"));
    assert_eq!(
        config.generation.deepseek.model.as_deref(),
        Some("deepseek-reasoner")
    );
    assert!(config.generation.gemini.api_key.is_none());
    assert_eq!(config.spotify.client_id.as_deref(), Some("cid"));
    assert_eq!(
        config.spotify.default_playlist_name.as_deref(),
        Some("Salsa Library")
    );
    assert_eq!(
        config.database_path.as_deref(),
        Some(std::path::Path::new("/tmp/djset-test.db"))
    );
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_partial_file_keeps_section_defaults() {
    let config = parse_toml_config(
        r#"
[generation.gemini]
api_key = "g-key"
"#,
    )
    .unwrap();

    assert_eq!(config.server.port, DEFAULT_PORT);
    assert_eq!(config.generation.gemini.api_key.as_deref(), Some("g-key"));
    assert!(config.generation.backend.is_none());
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_malformed_file_is_config_error() {
    let result = parse_toml_config("[server\nport = ");
    assert!(matches!(result, Err(Error::Config(_))));
}
