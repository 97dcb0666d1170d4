//! [`DecisionSurface`] drawn into the host page.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::trace;

use essaypilot_protocols::{
    DecisionError, DecisionSurface, Dialog, ErrorContext, GenerationChoice, UserAction,
};

use crate::cdp::PageSession;
use crate::manager::BrowserError;
use crate::scripts::{decode_reply, overlay_call, Reply};

/// Bound for promises that settle on a click. The user may leave a
/// decision open for as long as they like.
const DECISION_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

/// Overlays rendered by the overlay runtime script.
pub struct PageOverlay {
    session: Arc<PageSession>,
    settle_ms: u64,
}

impl PageOverlay {
    pub fn new(session: Arc<PageSession>, settle_ms: u64) -> Self {
        Self { session, settle_ms }
    }

    async fn run(&self, method: &str, args: Vec<Value>) -> Result<Value, DecisionError> {
        self.run_within(method, args, None).await
    }

    /// Call an operation that waits on the user.
    async fn wait_for<T: DeserializeOwned>(
        &self,
        method: &str,
        args: Vec<Value>,
    ) -> Result<T, DecisionError> {
        let value = self.run_within(method, args, Some(DECISION_TIMEOUT)).await?;
        parse(method, value)
    }

    async fn run_within(
        &self,
        method: &str,
        args: Vec<Value>,
        timeout: Option<Duration>,
    ) -> Result<Value, DecisionError> {
        trace!("overlay.{}", method);
        let expression = overlay_call(method, &args);
        let raw = match timeout {
            Some(timeout) => self.session.evaluate_with_timeout(&expression, timeout).await,
            None => self.session.evaluate(&expression).await,
        }
        .map_err(BrowserError::from)?;
        let reply = decode_reply(raw).map_err(BrowserError::from)?;
        reply_value(reply)
    }
}

fn reply_value(reply: Reply) -> Result<Value, DecisionError> {
    match reply {
        Reply::Value(value) => Ok(value),
        Reply::Detached => Err(DecisionError::SurfaceClosed),
    }
}

fn parse<T: DeserializeOwned>(method: &str, value: Value) -> Result<T, DecisionError> {
    serde_json::from_value(value)
        .map_err(|e| DecisionError::Surface(format!("{method} returned an unexpected value: {e}")))
}

#[async_trait]
impl DecisionSurface for PageOverlay {
    async fn ask(&self, dialog: &Dialog) -> Result<String, DecisionError> {
        self.wait_for("ask", vec![json!(dialog), json!(self.settle_ms)])
            .await
    }

    async fn open_panel(&self, heading: &str) -> Result<(), DecisionError> {
        self.run("openPanel", vec![json!(heading)]).await?;
        Ok(())
    }

    async fn set_heading(&self, heading: &str) -> Result<(), DecisionError> {
        self.run("setHeading", vec![json!(heading)]).await?;
        Ok(())
    }

    async fn await_action(
        &self,
        context: &ErrorContext,
        suggestions: &[String],
    ) -> Result<UserAction, DecisionError> {
        self.wait_for("awaitAction", vec![json!(context), json!(suggestions)])
            .await
    }

    async fn prompt_text(&self, message: &str, seed: &str) -> Result<Option<String>, DecisionError> {
        self.wait_for("promptText", vec![json!(message), json!(seed)])
            .await
    }

    async fn show_applying(&self, message: &str) -> Result<(), DecisionError> {
        self.run("showApplying", vec![json!(message)]).await?;
        Ok(())
    }

    async fn close_panel(&self) -> Result<(), DecisionError> {
        self.run("closePanel", vec![json!(self.settle_ms)]).await?;
        Ok(())
    }

    async fn open_loading(&self, status: &str) -> Result<(), DecisionError> {
        self.run("openLoading", vec![json!(status)]).await?;
        Ok(())
    }

    async fn update_loading(
        &self,
        status: Option<&str>,
        progress: Option<u8>,
    ) -> Result<(), DecisionError> {
        self.run("updateLoading", vec![json!(status), json!(progress)])
            .await?;
        Ok(())
    }

    async fn close_loading(&self) -> Result<(), DecisionError> {
        self.run("closeLoading", vec![json!(self.settle_ms)]).await?;
        Ok(())
    }

    async fn show_generated(&self, text: &str) -> Result<GenerationChoice, DecisionError> {
        self.wait_for("showGenerated", vec![json!(text)]).await
    }

    async fn countdown_tick(&self, digit: u8, millis: u64) -> Result<(), DecisionError> {
        self.run("countdownTick", vec![json!(digit), json!(millis)])
            .await?;
        Ok(())
    }

    async fn close_all(&self) -> Result<(), DecisionError> {
        self.run("closeAll", vec![json!(self.settle_ms)]).await?;
        Ok(())
    }
}
