//! CDP page session for one attached tab.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tracing::debug;

use super::client::Transport;
use super::error::CdpError;
use super::protocol::ExceptionDetails;

/// A flattened session attached to a single page target.
pub struct PageSession {
    target_id: String,
    session_id: String,
    transport: Arc<Transport>,
    default_timeout: Duration,
}

impl PageSession {
    pub(crate) fn new(
        target_id: String,
        session_id: String,
        transport: Arc<Transport>,
        default_timeout: Duration,
    ) -> Self {
        Self {
            target_id,
            session_id,
            transport,
            default_timeout,
        }
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Send a command with the session's default timeout.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.call_with_timeout(method, params, self.default_timeout)
            .await
    }

    /// Send a command with its own timeout.
    pub async fn call_with_timeout(
        &self,
        method: &str,
        params: Option<Value>,
        timeout: Duration,
    ) -> Result<Value, CdpError> {
        self.transport
            .send(method, params, Some(&self.session_id), timeout)
            .await
    }

    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        self.call("Page.enable", None).await?;
        self.call("Runtime.enable", None).await?;

        debug!("Enabled CDP domains for session {}", self.session_id);
        Ok(())
    }

    /// Evaluate an expression, awaiting a returned promise.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        self.evaluate_with_timeout(expression, self.default_timeout)
            .await
    }

    /// Evaluate with a caller-chosen bound. Used for promises that settle
    /// on user input.
    pub async fn evaluate_with_timeout(
        &self,
        expression: &str,
        timeout: Duration,
    ) -> Result<Value, CdpError> {
        let result = self
            .call_with_timeout(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                    "userGesture": true,
                })),
                timeout,
            )
            .await?;

        evaluation_value(result)
    }

    /// Activate the tab.
    pub async fn bring_to_front(&self) -> Result<(), CdpError> {
        self.call("Page.bringToFront", None).await?;
        Ok(())
    }
}

/// Value of a `Runtime.evaluate` result, or the thrown exception.
pub(crate) fn evaluation_value(mut result: Value) -> Result<Value, CdpError> {
    if let Some(exception) = result.get("exceptionDetails") {
        let details: ExceptionDetails = serde_json::from_value(exception.clone())?;
        return Err(CdpError::JavaScript(details.message()));
    }

    Ok(result
        .get_mut("result")
        .and_then(|r| r.get_mut("value"))
        .map(Value::take)
        .unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluation_value() {
        let result = json!({"result": {"type": "object", "value": {"value": "rendered"}}});
        assert_eq!(evaluation_value(result).unwrap(), json!({"value": "rendered"}));
    }

    #[test]
    fn test_evaluation_undefined_is_null() {
        let result = json!({"result": {"type": "undefined"}});
        assert_eq!(evaluation_value(result).unwrap(), Value::Null);
    }

    #[test]
    fn test_evaluation_exception() {
        let result = json!({
            "result": {"type": "object"},
            "exceptionDetails": {
                "text": "Uncaught (in promise)",
                "exception": {"type": "object", "description": "Error: overlay missing"}
            }
        });
        match evaluation_value(result) {
            Err(CdpError::JavaScript(message)) => assert_eq!(message, "Error: overlay missing"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
