//! [`HostPage`] over a CDP page session.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::trace;

use essaypilot_protocols::{HostPage, MarkerSnapshot, PageContext, PageError, Presence};

use crate::cdp::PageSession;
use crate::manager::BrowserError;
use crate::scripts::{decode_reply, page_call, Reply};

/// Host page driven through the page runtime script.
pub struct CdpHostPage {
    session: Arc<PageSession>,
}

impl CdpHostPage {
    pub fn new(session: Arc<PageSession>) -> Self {
        Self { session }
    }

    /// Call a runtime method addressing `target`; a detached reply names it.
    async fn run(&self, method: &str, target: &str, args: Vec<Value>) -> Result<Value, PageError> {
        trace!("page.{}({})", method, target);
        let raw = self
            .session
            .evaluate(&page_call(method, &args))
            .await
            .map_err(BrowserError::from)?;
        let reply = decode_reply(raw).map_err(BrowserError::from)?;
        reply_value(reply, target)
    }

    async fn value<T: DeserializeOwned>(
        &self,
        method: &str,
        target: &str,
        args: Vec<Value>,
    ) -> Result<T, PageError> {
        let value = self.run(method, target, args).await?;
        parse(method, value)
    }
}

fn reply_value(reply: Reply, target: &str) -> Result<Value, PageError> {
    match reply {
        Reply::Value(value) => Ok(value),
        Reply::Detached => Err(PageError::Detached(target.to_string())),
    }
}

fn parse<T: DeserializeOwned>(method: &str, value: Value) -> Result<T, PageError> {
    serde_json::from_value(value)
        .map_err(|e| PageError::InvalidResponse(format!("{method}: {e}")))
}

#[async_trait]
impl HostPage for CdpHostPage {
    async fn probe(&self, selector: &str) -> Result<Presence, PageError> {
        self.value("probe", selector, vec![json!(selector)]).await
    }

    async fn count(&self, selector: &str) -> Result<usize, PageError> {
        self.value("count", selector, vec![json!(selector)]).await
    }

    async fn read_value(&self, selector: &str) -> Result<String, PageError> {
        self.value("readValue", selector, vec![json!(selector)])
            .await
    }

    async fn write_value(
        &self,
        selector: &str,
        value: &str,
        cursor: Option<usize>,
    ) -> Result<(), PageError> {
        self.run(
            "writeValue",
            selector,
            vec![json!(selector), json!(value), json!(cursor)],
        )
        .await?;
        Ok(())
    }

    async fn force_value(&self, selector: &str, value: &str) -> Result<(), PageError> {
        self.run("forceValue", selector, vec![json!(selector), json!(value)])
            .await?;
        Ok(())
    }

    async fn focus(&self, selector: &str) -> Result<(), PageError> {
        self.run("focus", selector, vec![json!(selector)]).await?;
        Ok(())
    }

    async fn send_char(&self, selector: &str, ch: char) -> Result<bool, PageError> {
        self.value(
            "sendChar",
            selector,
            vec![json!(selector), json!(ch.to_string())],
        )
        .await
    }

    async fn select_all(&self, selector: &str) -> Result<(), PageError> {
        self.run("selectAll", selector, vec![json!(selector)]).await?;
        Ok(())
    }

    async fn send_backspace(&self, selector: &str) -> Result<bool, PageError> {
        self.value("sendBackspace", selector, vec![json!(selector)])
            .await
    }

    async fn button_labels(&self) -> Result<Vec<String>, PageError> {
        self.value("buttonLabels", "button", Vec::new()).await
    }

    async fn click_button(&self, label: &str) -> Result<bool, PageError> {
        self.value("clickButton", label, vec![json!(label)]).await
    }

    async fn first_marker(&self, selector: &str) -> Result<Option<MarkerSnapshot>, PageError> {
        self.value("firstMarker", selector, vec![json!(selector)])
            .await
    }

    async fn scroll_into_view(&self, selector: &str) -> Result<(), PageError> {
        self.run("scrollIntoView", selector, vec![json!(selector)])
            .await?;
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<(), PageError> {
        self.run("click", selector, vec![json!(selector)]).await?;
        Ok(())
    }

    async fn retire_marker(&self, selector: &str) -> Result<(), PageError> {
        self.run("retireMarker", selector, vec![json!(selector)])
            .await?;
        Ok(())
    }

    async fn menu_entries(&self, selector: &str) -> Result<Vec<String>, PageError> {
        self.value("menuEntries", selector, vec![json!(selector)])
            .await
    }

    async fn dismiss(&self) -> Result<(), PageError> {
        self.run("dismiss", "body", Vec::new()).await?;
        Ok(())
    }

    async fn claim_busy(&self, owner: &str) -> Result<bool, PageError> {
        self.value("claimBusy", "window", vec![json!(owner)]).await
    }

    async fn release_busy(&self, owner: &str) -> Result<bool, PageError> {
        self.value("releaseBusy", "window", vec![json!(owner)]).await
    }

    async fn busy_owner(&self) -> Result<Option<String>, PageError> {
        self.value("busyOwner", "window", Vec::new()).await
    }

    async fn extract_context(&self, root_selector: &str) -> Result<PageContext, PageError> {
        self.value("extractContext", root_selector, vec![json!(root_selector)])
            .await
    }
}

#[cfg(test)]
#[path = "page_tests.rs"]
mod tests;
