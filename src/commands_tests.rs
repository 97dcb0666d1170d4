use super::*;

use std::io::Write;
use std::path::PathBuf;

fn config_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_config_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config(&dir.path().join("absent.toml"), None).unwrap();
    assert_eq!(config.browser.debug_port, 9222);
    assert!(config.browser.page_match.is_none());
}

#[test]
fn test_load_config_page_override() {
    let file = config_file("[browser]\npage_match = \"config\"\n");
    let config = load_config(file.path(), Some("cli".to_string())).unwrap();
    assert_eq!(config.browser.page_match.as_deref(), Some("cli"));
}

#[test]
fn test_load_config_rejects_invalid() {
    let file = config_file("[ai]\nmin_words = 400\nmax_words = 300\n");
    let err = load_config(file.path(), None).unwrap_err();
    assert!(format!("{err:#}").contains("min_words"));
}

#[test]
fn test_check_config_valid_and_invalid() {
    let file = config_file("[browser]\ndebug_port = 9333\n");
    assert!(check_config(file.path()).is_ok());

    let file = config_file("[timing]\nmenu_wait_ms = 0\n");
    assert!(check_config(file.path()).is_err());
}

#[test]
fn test_ai_generator_requires_key() {
    let config = Config::default();
    assert!(ai_generator(&config).unwrap().is_none());

    let mut config = Config::default();
    config.ai.api_key = Some("sk-test".to_string());
    let generator = ai_generator(&config).unwrap().unwrap();
    assert_eq!(generator.id(), "chat");
}

#[test]
fn test_read_source_text_and_file() {
    let text = read_source(TextSource {
        text: Some("Olá".to_string()),
        file: None,
    })
    .unwrap();
    assert_eq!(text, "Olá");

    let file = config_file("Texto do arquivo");
    let text = read_source(TextSource {
        text: None,
        file: Some(file.path().to_path_buf()),
    })
    .unwrap();
    assert_eq!(text, "Texto do arquivo");
}

#[test]
fn test_read_source_missing_file() {
    let err = read_source(TextSource {
        text: None,
        file: Some(PathBuf::from("/nonexistent/essay.txt")),
    })
    .unwrap_err();
    assert!(err.to_string().contains("/nonexistent/essay.txt"));
}
