//! Embedded page scripts and the call expressions built on them.
//!
//! Both runtimes install themselves once per document under a `window`
//! global and answer every call with `{value}` or `{detached: true}`.

use serde::Deserialize;
use serde_json::Value;

use crate::cdp::CdpError;

const PAGE_RUNTIME: &str = include_str!("page.js");
const OVERLAY_RUNTIME: &str = include_str!("overlay.js");

const PAGE_GLOBAL: &str = "__essaypilotPage";
const OVERLAY_GLOBAL: &str = "__essaypilotOverlay";

/// Expression calling a DOM primitive of the page runtime.
pub(crate) fn page_call(method: &str, args: &[Value]) -> String {
    call_expression(PAGE_RUNTIME, PAGE_GLOBAL, method, args)
}

/// Expression calling an overlay operation.
pub(crate) fn overlay_call(method: &str, args: &[Value]) -> String {
    call_expression(OVERLAY_RUNTIME, OVERLAY_GLOBAL, method, args)
}

fn call_expression(runtime: &str, global: &str, method: &str, args: &[Value]) -> String {
    let args = args
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("{runtime}\nwindow.{global}.{method}({args});")
}

/// Decoded answer of a runtime call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Reply {
    /// The addressed element or overlay is gone.
    Detached,
    Value(Value),
}

#[derive(Deserialize)]
struct RawReply {
    #[serde(default)]
    detached: bool,
    #[serde(default)]
    value: Value,
}

pub(crate) fn decode_reply(raw: Value) -> Result<Reply, CdpError> {
    if !raw.is_object() {
        return Err(CdpError::InvalidResponse(format!(
            "Unexpected script reply: {raw}"
        )));
    }
    let reply: RawReply = serde_json::from_value(raw)?;
    if reply.detached {
        Ok(Reply::Detached)
    } else {
        Ok(Reply::Value(reply.value))
    }
}

#[cfg(test)]
#[path = "scripts_tests.rs"]
mod tests;
