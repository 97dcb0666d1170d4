use super::*;
use serde_json::json;

#[test]
fn test_page_call_installs_runtime_then_calls() {
    let expr = page_call("readValue", &[json!("textarea#main")]);
    assert!(expr.starts_with("// DOM primitives"));
    assert!(expr.ends_with("window.__essaypilotPage.readValue(\"textarea#main\");"));
}

#[test]
fn test_call_arguments_are_json_encoded() {
    let expr = page_call("writeValue", &[json!("#t"), json!("diz \"oi\"\n"), Value::Null]);
    assert!(expr.ends_with(r##"writeValue("#t", "diz \"oi\"\n", null);"##));
}

#[test]
fn test_overlay_call_without_arguments() {
    let expr = overlay_call("closeAll", &[json!(400)]);
    assert!(expr.contains("window.__essaypilotOverlay = window.__essaypilotOverlay ||"));
    assert!(expr.ends_with("window.__essaypilotOverlay.closeAll(400);"));

    let expr = overlay_call("setHeading", &[]);
    assert!(expr.ends_with(".setHeading();"));
}

#[test]
fn test_runtimes_expose_every_method() {
    for method in [
        "probe", "count", "readValue", "writeValue", "forceValue", "focus", "sendChar",
        "selectAll", "sendBackspace", "buttonLabels", "clickButton", "firstMarker",
        "scrollIntoView", "click", "retireMarker", "menuEntries", "dismiss", "claimBusy",
        "releaseBusy", "busyOwner", "extractContext",
    ] {
        assert!(PAGE_RUNTIME.contains(&format!("    {method}(")), "page runtime lacks {method}");
    }
    for method in [
        "ask", "openPanel", "setHeading", "awaitAction", "promptText", "showApplying",
        "closePanel", "openLoading", "updateLoading", "closeLoading", "showGenerated",
        "countdownTick", "closeAll",
    ] {
        assert!(OVERLAY_RUNTIME.contains(&format!("{method}(")), "overlay runtime lacks {method}");
    }
}

#[test]
fn test_decode_value_reply() {
    let reply = decode_reply(json!({"value": "rendered"})).unwrap();
    assert_eq!(reply, Reply::Value(json!("rendered")));
}

#[test]
fn test_decode_null_value_reply() {
    let reply = decode_reply(json!({"value": null})).unwrap();
    assert_eq!(reply, Reply::Value(Value::Null));
}

#[test]
fn test_decode_detached_reply() {
    let reply = decode_reply(json!({"detached": true})).unwrap();
    assert_eq!(reply, Reply::Detached);
}

#[test]
fn test_decode_non_object_reply() {
    assert!(matches!(
        decode_reply(Value::Null),
        Err(CdpError::InvalidResponse(_))
    ));
}
