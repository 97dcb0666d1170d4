use super::*;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn pending_with(id: u64) -> (PendingMap, oneshot::Receiver<Result<Value, CdpError>>) {
    let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
    let (tx, rx) = oneshot::channel();
    pending.lock().insert(id, PendingRequest { tx });
    (pending, rx)
}

#[tokio::test]
async fn test_dispatch_result_to_waiter() {
    let (pending, rx) = pending_with(3);
    let resp: CdpResponse =
        serde_json::from_str(r#"{"id": 3, "result": {"value": 42}}"#).unwrap();

    dispatch(resp, &pending);

    let value = rx.await.unwrap().unwrap();
    assert_eq!(value["value"], 42);
    assert!(pending.lock().is_empty());
}

#[tokio::test]
async fn test_dispatch_protocol_error() {
    let (pending, rx) = pending_with(5);
    let resp: CdpResponse = serde_json::from_str(
        r#"{"id": 5, "error": {"code": -32601, "message": "'Foo.bar' wasn't found"}}"#,
    )
    .unwrap();

    dispatch(resp, &pending);

    match rx.await.unwrap() {
        Err(CdpError::Protocol { code, message }) => {
            assert_eq!(code, -32601);
            assert!(message.contains("Foo.bar"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_dispatch_ignores_events_and_unknown_ids() {
    let (pending, _rx) = pending_with(1);
    let event: CdpResponse =
        serde_json::from_str(r#"{"method": "Page.loadEventFired", "params": {}}"#).unwrap();
    dispatch(event, &pending);
    let stray: CdpResponse = serde_json::from_str(r#"{"id": 99, "result": {}}"#).unwrap();
    dispatch(stray, &pending);

    assert_eq!(pending.lock().len(), 1);
}

#[tokio::test]
async fn test_fetch_version() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Browser": "Chrome/131.0.6778.85",
            "Protocol-Version": "1.3",
            "User-Agent": "Mozilla/5.0",
            "webSocketDebuggerUrl": "ws://localhost:9222/devtools/browser/abc"
        })))
        .mount(&server)
        .await;

    let version = fetch_version(&server.uri()).await.unwrap();
    assert_eq!(version.protocol_version, "1.3");
    assert!(version.web_socket_debugger_url.ends_with("/browser/abc"));
}

#[tokio::test]
async fn test_list_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": "A", "type": "page", "title": "Redação", "url": "https://example.com/redacao"},
            {"id": "B", "type": "iframe", "title": "", "url": "https://ads.example.com"}
        ])))
        .mount(&server)
        .await;

    let pages = list_pages(&format!("{}/", server.uri())).await.unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].id, "A");
    assert!(!pages[1].is_user_page());
}

#[tokio::test]
async fn test_connect_without_chrome() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/version"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = CdpClient::connect(&server.uri(), Duration::from_secs(1)).await;
    assert!(matches!(result, Err(CdpError::ChromeNotAvailable(_))));
}
