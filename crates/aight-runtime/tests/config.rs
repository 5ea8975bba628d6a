//! Config file loading.

use std::io::Write;

use aight_runtime::config::{Config, DEFAULT_URL};

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(format!("{err:#}").contains("cannot read config"), "{err:#}");
}

#[test]
fn loads_server_and_autocomplete_sections() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[server]\nurl = \"ws://10.0.0.2:8123/api/websocket\"\ntoken = \"abc\"\nreply_timeout_secs = 10\n\n[autocomplete]\nlimit = 8\ndebounce_ms = 50"
    )
    .unwrap();

    let config = Config::load(Some(file.path())).unwrap();
    assert_eq!(config.server.url, "ws://10.0.0.2:8123/api/websocket");
    assert_eq!(config.server.token.as_deref(), Some("abc"));
    assert_eq!(config.reply_timeout().as_secs(), 10);
    assert_eq!(config.autocomplete.limit, 8);
    assert_eq!(config.debounce().as_millis(), 50);
}

#[test]
fn invalid_values_name_the_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[server]\nreply_timeout_secs = 0").unwrap();
    let err = Config::load(Some(file.path())).unwrap_err();
    let text = format!("{err:#}");
    assert!(text.contains("invalid config"), "{text}");
    assert!(text.contains("reply_timeout_secs"), "{text}");
}

#[test]
fn defaults_when_no_token() {
    let config = Config::default();
    assert_eq!(config.server.url, DEFAULT_URL);
    assert!(config.server.token.is_none());
}
