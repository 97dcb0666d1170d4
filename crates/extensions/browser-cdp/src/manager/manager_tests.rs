use super::*;

use essaypilot_config::BrowserConfig;
use essaypilot_protocols::{DecisionError, PageError};

use crate::cdp::{CdpError, PageInfo};

fn page(id: &str, kind: &str, title: &str, url: &str) -> PageInfo {
    PageInfo {
        id: id.to_string(),
        page_type: kind.to_string(),
        title: title.to_string(),
        url: url.to_string(),
        web_socket_debugger_url: None,
    }
}

fn pages() -> Vec<PageInfo> {
    vec![
        page("0", "page", "DevTools", "devtools://devtools/bundled/inspector.html"),
        page("1", "page", "Caixa de entrada", "https://mail.example.com/"),
        page("2", "page", "Redação - Plataforma", "https://escola.example.com/redacao/42"),
        page("3", "iframe", "", "https://escola.example.com/redacao/frame"),
    ]
}

#[test]
fn test_select_page_by_url() {
    let pages = pages();
    let selected = select_page(&pages, Some("/redacao")).unwrap();
    assert_eq!(selected.id, "2");
}

#[test]
fn test_select_page_by_title() {
    let pages = pages();
    let selected = select_page(&pages, Some("Caixa")).unwrap();
    assert_eq!(selected.id, "1");
}

#[test]
fn test_select_first_user_page_without_pattern() {
    let pages = pages();
    assert_eq!(select_page(&pages, None).unwrap().id, "1");
}

#[test]
fn test_select_page_no_match() {
    let pages = pages();
    assert!(select_page(&pages, Some("inexistente")).is_none());
    assert!(select_page(&[], None).is_none());
}

#[test]
fn test_browser_error_display() {
    let err = BrowserError::ChromeNotFound;
    assert_eq!(err.to_string(), "Chrome not found. Please install Google Chrome.");

    let err = BrowserError::PageNotFound("/redacao".to_string());
    assert_eq!(err.to_string(), "No open tab matches /redacao");
}

#[test]
fn test_cdp_error_conversion() {
    let err: BrowserError = CdpError::JavaScript("boom".to_string()).into();
    assert!(matches!(err, BrowserError::ScriptFailed(_)));

    let err: BrowserError = CdpError::SessionClosed.into();
    assert!(matches!(err, BrowserError::NotConnected));
}

#[test]
fn test_page_error_conversion() {
    let err: PageError = BrowserError::ScriptFailed("boom".to_string()).into();
    assert!(matches!(err, PageError::Script(_)));

    let err: PageError = BrowserError::Timeout("Runtime.evaluate".to_string()).into();
    assert!(matches!(err, PageError::Transport(_)));
}

#[test]
fn test_decision_error_conversion() {
    let err: DecisionError = BrowserError::NotConnected.into();
    assert!(matches!(err, DecisionError::SurfaceClosed));

    let err: DecisionError = BrowserError::ScriptFailed("x".to_string()).into();
    assert!(matches!(err, DecisionError::Surface(_)));
}

#[test]
fn test_find_chrome() {
    let _result = BrowserManager::find_chrome();
}

#[tokio::test]
async fn test_close_without_connect() {
    let manager = BrowserManager::new(BrowserConfig::default());
    manager.close().await;
    assert!(manager.client().await.is_err());
}

#[tokio::test]
async fn test_connect_refuses_when_launch_disabled() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let manager = BrowserManager::new(BrowserConfig {
        debug_port: port,
        launch: false,
        ..Default::default()
    });

    let err = manager.connect().await.unwrap_err();
    assert!(matches!(err, BrowserError::ConnectionFailed(_)));
}
