//! In-memory page, surface and generator doubles for engine tests.
//!
//! [`FakePage`] models just enough of the host page: one text buffer, a
//! button row, a queue of markers whose menus open on click, and a
//! processing indicator that goes away after a number of probes.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use essaypilot_config::SelectorConfig;
use essaypilot_protocols::{
    AiError, DecisionError, DecisionSurface, Dialog, ErrorContext, GenerationChoice, HostPage,
    MarkerSnapshot, PageContext, PageError, Presence, TextGenerator, UserAction,
};

/// One scripted error marker.
#[derive(Debug, Clone)]
pub struct FakeMarker {
    pub raw_text: String,
    /// Menu entries after the echo. `None` means the menu never opens.
    pub suggestions: Option<Vec<String>>,
    pub visible: bool,
    /// Clicking fails with a script error.
    pub fail_click: bool,
    /// Clicking removes the marker text from the buffer.
    pub vanish_on_click: bool,
}

impl FakeMarker {
    pub fn new(raw_text: &str, suggestions: &[&str]) -> Self {
        Self {
            raw_text: raw_text.to_string(),
            suggestions: Some(suggestions.iter().map(|s| s.to_string()).collect()),
            visible: true,
            fail_click: false,
            vanish_on_click: false,
        }
    }

    pub fn without_menu(raw_text: &str) -> Self {
        Self {
            suggestions: None,
            ..Self::new(raw_text, &[])
        }
    }

    pub fn hidden(raw_text: &str) -> Self {
        Self {
            visible: false,
            ..Self::new(raw_text, &[])
        }
    }

    pub fn failing(raw_text: &str) -> Self {
        Self {
            fail_click: true,
            ..Self::new(raw_text, &[])
        }
    }

    pub fn vanishing(raw_text: &str, suggestions: &[&str]) -> Self {
        Self {
            vanish_on_click: true,
            ..Self::new(raw_text, suggestions)
        }
    }
}

#[derive(Debug)]
struct Dom {
    text: Option<String>,
    selected_all: bool,
    buttons: Vec<String>,
    markers: VecDeque<FakeMarker>,
    menu: Option<Vec<String>>,
    processing_polls: usize,
    processing_after_click: usize,
    context: PageContext,
    clicked_buttons: Vec<String>,
    writes: Vec<String>,
    dismissals: usize,
    native_clear_works: bool,
    backspace_works: bool,
    reject_chars: bool,
    detach_after_chars: Option<usize>,
    chars_typed: usize,
    busy_owner: Option<String>,
}

/// Scripted [`HostPage`].
pub struct FakePage {
    selectors: SelectorConfig,
    dom: Mutex<Dom>,
}

impl FakePage {
    pub fn new(selectors: SelectorConfig) -> Self {
        Self {
            selectors,
            dom: Mutex::new(Dom {
                text: None,
                selected_all: false,
                buttons: Vec::new(),
                markers: VecDeque::new(),
                menu: None,
                processing_polls: 0,
                processing_after_click: 0,
                context: PageContext::default(),
                clicked_buttons: Vec::new(),
                writes: Vec::new(),
                dismissals: 0,
                native_clear_works: true,
                backspace_works: true,
                reject_chars: false,
                detach_after_chars: None,
                chars_typed: 0,
                busy_owner: None,
            }),
        }
    }

    pub fn with_text(self, text: &str) -> Self {
        self.dom.lock().text = Some(text.to_string());
        self
    }

    pub fn with_buttons(self, labels: &[&str]) -> Self {
        self.dom.lock().buttons = labels.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_marker(self, marker: FakeMarker) -> Self {
        self.dom.lock().markers.push_back(marker);
        self
    }

    /// The processing indicator is reported present for `polls` probes.
    pub fn with_processing_polls(self, polls: usize) -> Self {
        self.dom.lock().processing_polls = polls;
        self
    }

    /// Clicking the corrector button shows the processing indicator for
    /// `polls` probes.
    pub fn with_processing_after_click(self, polls: usize) -> Self {
        self.dom.lock().processing_after_click = polls;
        self
    }

    pub fn with_context(self, context: PageContext) -> Self {
        self.dom.lock().context = context;
        self
    }

    /// Native-setter writes of an empty value are ignored.
    pub fn without_native_clear(self) -> Self {
        self.dom.lock().native_clear_works = false;
        self
    }

    /// Backspace over a full selection does nothing.
    pub fn without_backspace(self) -> Self {
        self.dom.lock().backspace_works = false;
        self
    }

    pub fn rejecting_chars(self) -> Self {
        self.dom.lock().reject_chars = true;
        self
    }

    /// The text buffer is removed after `chars` typed characters.
    pub fn detach_after(self, chars: usize) -> Self {
        self.dom.lock().detach_after_chars = Some(chars);
        self
    }

    pub fn text(&self) -> Option<String> {
        self.dom.lock().text.clone()
    }

    pub fn set_text(&self, text: Option<&str>) {
        self.dom.lock().text = text.map(str::to_string);
    }

    pub fn clicked_buttons(&self) -> Vec<String> {
        self.dom.lock().clicked_buttons.clone()
    }

    /// Values written through the native setter, in order.
    pub fn writes(&self) -> Vec<String> {
        self.dom.lock().writes.clone()
    }

    pub fn remaining_markers(&self) -> usize {
        self.dom.lock().markers.len()
    }

    pub fn dismissals(&self) -> usize {
        self.dom.lock().dismissals
    }

    /// Holder of the page busy marker.
    pub fn busy_holder(&self) -> Option<String> {
        self.dom.lock().busy_owner.clone()
    }

    fn detached(selector: &str) -> PageError {
        PageError::Detached(selector.to_string())
    }
}

fn rendered(present: bool) -> Presence {
    if present {
        Presence::Rendered
    } else {
        Presence::Absent
    }
}

#[async_trait]
impl HostPage for FakePage {
    async fn probe(&self, selector: &str) -> Result<Presence, PageError> {
        let mut dom = self.dom.lock();
        let s = &self.selectors;
        let presence = if selector == s.text_buffer {
            rendered(dom.text.is_some())
        } else if selector == s.suggestion_menu {
            rendered(dom.menu.is_some())
        } else if selector == s.marker {
            match dom.markers.front() {
                Some(m) if !m.visible => Presence::Hidden,
                Some(_) => Presence::Rendered,
                None => Presence::Absent,
            }
        } else if selector == s.processing_indicator {
            if dom.processing_polls > 0 {
                if dom.processing_polls != usize::MAX {
                    dom.processing_polls -= 1;
                }
                Presence::Rendered
            } else {
                Presence::Absent
            }
        } else {
            Presence::Absent
        };
        Ok(presence)
    }

    async fn count(&self, selector: &str) -> Result<usize, PageError> {
        if selector == self.selectors.marker {
            return Ok(self.dom.lock().markers.len());
        }
        Ok(usize::from(self.probe(selector).await?.exists()))
    }

    async fn read_value(&self, selector: &str) -> Result<String, PageError> {
        self.dom.lock().text.clone().ok_or_else(|| Self::detached(selector))
    }

    async fn write_value(
        &self,
        selector: &str,
        value: &str,
        _cursor: Option<usize>,
    ) -> Result<(), PageError> {
        let mut dom = self.dom.lock();
        if dom.text.is_none() {
            return Err(Self::detached(selector));
        }
        dom.writes.push(value.to_string());
        if value.is_empty() && !dom.native_clear_works {
            return Ok(());
        }
        dom.text = Some(value.to_string());
        dom.selected_all = false;
        Ok(())
    }

    async fn force_value(&self, selector: &str, value: &str) -> Result<(), PageError> {
        let mut dom = self.dom.lock();
        match dom.text.as_mut() {
            Some(text) => {
                *text = value.to_string();
                Ok(())
            }
            None => Err(Self::detached(selector)),
        }
    }

    async fn focus(&self, selector: &str) -> Result<(), PageError> {
        match self.dom.lock().text {
            Some(_) => Ok(()),
            None => Err(Self::detached(selector)),
        }
    }

    async fn send_char(&self, selector: &str, ch: char) -> Result<bool, PageError> {
        let mut dom = self.dom.lock();
        if dom.reject_chars {
            return Ok(false);
        }
        let selected_all = dom.selected_all;
        let Some(text) = dom.text.as_mut() else {
            return Err(Self::detached(selector));
        };
        if selected_all {
            text.clear();
        }
        text.push(ch);
        dom.selected_all = false;
        dom.chars_typed += 1;
        if dom.detach_after_chars == Some(dom.chars_typed) {
            dom.text = None;
        }
        Ok(true)
    }

    async fn select_all(&self, selector: &str) -> Result<(), PageError> {
        let mut dom = self.dom.lock();
        if dom.text.is_none() {
            return Err(Self::detached(selector));
        }
        dom.selected_all = true;
        Ok(())
    }

    async fn send_backspace(&self, selector: &str) -> Result<bool, PageError> {
        let mut dom = self.dom.lock();
        let selected_all = dom.selected_all;
        let backspace_works = dom.backspace_works;
        let Some(text) = dom.text.as_mut() else {
            return Err(Self::detached(selector));
        };
        let changed = if selected_all {
            if backspace_works && !text.is_empty() {
                text.clear();
                true
            } else {
                false
            }
        } else {
            text.pop().is_some()
        };
        dom.selected_all = false;
        Ok(changed)
    }

    async fn button_labels(&self) -> Result<Vec<String>, PageError> {
        Ok(self.dom.lock().buttons.clone())
    }

    async fn click_button(&self, label: &str) -> Result<bool, PageError> {
        let mut dom = self.dom.lock();
        if !dom.buttons.iter().any(|b| b == label) {
            return Ok(false);
        }
        dom.clicked_buttons.push(label.to_string());
        if label == self.selectors.corrector_label {
            dom.processing_polls = dom.processing_after_click;
        }
        Ok(true)
    }

    async fn first_marker(&self, selector: &str) -> Result<Option<MarkerSnapshot>, PageError> {
        let _ = selector;
        Ok(self.dom.lock().markers.front().map(|m| MarkerSnapshot {
            raw_text: m.raw_text.clone(),
            visible: m.visible,
            attached: true,
        }))
    }

    async fn scroll_into_view(&self, selector: &str) -> Result<(), PageError> {
        if selector == self.selectors.marker && self.dom.lock().markers.is_empty() {
            return Err(Self::detached(selector));
        }
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<(), PageError> {
        if selector != self.selectors.marker {
            return Ok(());
        }
        let mut dom = self.dom.lock();
        let Some(marker) = dom.markers.front().cloned() else {
            return Err(Self::detached(selector));
        };
        if marker.fail_click {
            return Err(PageError::Script("click handler threw".to_string()));
        }
        if marker.vanish_on_click {
            if let Some(text) = dom.text.as_mut() {
                *text = text.replacen(&marker.raw_text, "", 1);
            }
        }
        dom.menu = marker.suggestions.map(|suggestions| {
            std::iter::once(marker.raw_text.trim().to_string())
                .chain(suggestions)
                .collect()
        });
        Ok(())
    }

    async fn retire_marker(&self, selector: &str) -> Result<(), PageError> {
        match self.dom.lock().markers.pop_front() {
            Some(_) => Ok(()),
            None => Err(Self::detached(selector)),
        }
    }

    async fn menu_entries(&self, selector: &str) -> Result<Vec<String>, PageError> {
        self.dom.lock().menu.clone().ok_or_else(|| Self::detached(selector))
    }

    async fn dismiss(&self) -> Result<(), PageError> {
        let mut dom = self.dom.lock();
        dom.menu = None;
        dom.dismissals += 1;
        Ok(())
    }

    async fn claim_busy(&self, owner: &str) -> Result<bool, PageError> {
        let mut dom = self.dom.lock();
        if dom.busy_owner.is_some() {
            return Ok(false);
        }
        dom.busy_owner = Some(owner.to_string());
        Ok(true)
    }

    async fn release_busy(&self, owner: &str) -> Result<bool, PageError> {
        let mut dom = self.dom.lock();
        if dom.busy_owner.as_deref() != Some(owner) {
            return Ok(false);
        }
        dom.busy_owner = None;
        Ok(true)
    }

    async fn busy_owner(&self) -> Result<Option<String>, PageError> {
        Ok(self.dom.lock().busy_owner.clone())
    }

    async fn extract_context(&self, _root_selector: &str) -> Result<PageContext, PageError> {
        Ok(self.dom.lock().context.clone())
    }
}

/// Everything a [`FakeSurface`] was asked to show, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Dialog { id: String, message: String },
    PanelOpened(String),
    Heading(String),
    AwaitAction { context: ErrorContext, suggestions: Vec<String> },
    Prompt { message: String, seed: String },
    Applying(String),
    PanelClosed,
    LoadingOpened(String),
    LoadingUpdated { status: Option<String>, progress: Option<u8> },
    LoadingClosed,
    Generated(String),
    Countdown(u8),
    ClosedAll,
}

#[derive(Default)]
struct Script {
    answers: HashMap<String, VecDeque<String>>,
    actions: VecDeque<UserAction>,
    prompts: VecDeque<Option<String>>,
    choices: VecDeque<GenerationChoice>,
}

/// Scripted [`DecisionSurface`].
///
/// Unscripted dialogs answer with their first button, unscripted decisions
/// skip, unscripted prompts cancel and unscripted result popups abandon.
#[derive(Default)]
pub struct FakeSurface {
    script: Mutex<Script>,
    events: Mutex<Vec<SurfaceEvent>>,
    action_delay: Option<Duration>,
}

impl FakeSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the value returned by the next dialog with `id`.
    pub fn answer(self, id: &str, value: &str) -> Self {
        self.script
            .lock()
            .answers
            .entry(id.to_string())
            .or_default()
            .push_back(value.to_string());
        self
    }

    pub fn action(self, action: UserAction) -> Self {
        self.script.lock().actions.push_back(action);
        self
    }

    pub fn prompt_reply(self, reply: Option<&str>) -> Self {
        self.script.lock().prompts.push_back(reply.map(str::to_string));
        self
    }

    pub fn generation_choice(self, choice: GenerationChoice) -> Self {
        self.script.lock().choices.push_back(choice);
        self
    }

    /// Hold every decision for `delay` before answering.
    pub fn with_action_delay(mut self, delay: Duration) -> Self {
        self.action_delay = Some(delay);
        self
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events.lock().clone()
    }

    /// Ids of every dialog shown, in order.
    pub fn dialog_ids(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Dialog { id, .. } => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    /// Message of the last dialog with `id`.
    pub fn last_message(&self, id: &str) -> Option<String> {
        self.events.lock().iter().rev().find_map(|e| match e {
            SurfaceEvent::Dialog { id: shown, message } if shown == id => Some(message.clone()),
            _ => None,
        })
    }

    pub fn decision_calls(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| matches!(e, SurfaceEvent::AwaitAction { .. }))
            .count()
    }

    fn record(&self, event: SurfaceEvent) {
        self.events.lock().push(event);
    }
}

#[async_trait]
impl DecisionSurface for FakeSurface {
    async fn ask(&self, dialog: &Dialog) -> Result<String, DecisionError> {
        self.record(SurfaceEvent::Dialog {
            id: dialog.id.clone(),
            message: dialog.message.clone(),
        });
        let scripted = self
            .script
            .lock()
            .answers
            .get_mut(&dialog.id)
            .and_then(VecDeque::pop_front);
        scripted
            .or_else(|| dialog.buttons.first().map(|b| b.value.clone()))
            .ok_or(DecisionError::SurfaceClosed)
    }

    async fn open_panel(&self, heading: &str) -> Result<(), DecisionError> {
        self.record(SurfaceEvent::PanelOpened(heading.to_string()));
        Ok(())
    }

    async fn set_heading(&self, heading: &str) -> Result<(), DecisionError> {
        self.record(SurfaceEvent::Heading(heading.to_string()));
        Ok(())
    }

    async fn await_action(
        &self,
        context: &ErrorContext,
        suggestions: &[String],
    ) -> Result<UserAction, DecisionError> {
        self.record(SurfaceEvent::AwaitAction {
            context: context.clone(),
            suggestions: suggestions.to_vec(),
        });
        if let Some(delay) = self.action_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.script.lock().actions.pop_front().unwrap_or(UserAction::Skip))
    }

    async fn prompt_text(&self, message: &str, seed: &str) -> Result<Option<String>, DecisionError> {
        self.record(SurfaceEvent::Prompt {
            message: message.to_string(),
            seed: seed.to_string(),
        });
        Ok(self.script.lock().prompts.pop_front().flatten())
    }

    async fn show_applying(&self, message: &str) -> Result<(), DecisionError> {
        self.record(SurfaceEvent::Applying(message.to_string()));
        Ok(())
    }

    async fn close_panel(&self) -> Result<(), DecisionError> {
        self.record(SurfaceEvent::PanelClosed);
        Ok(())
    }

    async fn open_loading(&self, status: &str) -> Result<(), DecisionError> {
        self.record(SurfaceEvent::LoadingOpened(status.to_string()));
        Ok(())
    }

    async fn update_loading(
        &self,
        status: Option<&str>,
        progress: Option<u8>,
    ) -> Result<(), DecisionError> {
        self.record(SurfaceEvent::LoadingUpdated {
            status: status.map(str::to_string),
            progress,
        });
        Ok(())
    }

    async fn close_loading(&self) -> Result<(), DecisionError> {
        self.record(SurfaceEvent::LoadingClosed);
        Ok(())
    }

    async fn show_generated(&self, text: &str) -> Result<GenerationChoice, DecisionError> {
        self.record(SurfaceEvent::Generated(text.to_string()));
        Ok(self
            .script
            .lock()
            .choices
            .pop_front()
            .unwrap_or(GenerationChoice::Abandon))
    }

    async fn countdown_tick(&self, digit: u8, _millis: u64) -> Result<(), DecisionError> {
        self.record(SurfaceEvent::Countdown(digit));
        Ok(())
    }

    async fn close_all(&self) -> Result<(), DecisionError> {
        self.record(SurfaceEvent::ClosedAll);
        Ok(())
    }
}

/// Scripted [`TextGenerator`] that records every prompt.
#[derive(Default)]
pub struct FakeGenerator {
    replies: Mutex<VecDeque<Result<String, AiError>>>,
    prompts: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl FakeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.replies.lock().push_back(Ok(text.to_string()));
        self
    }

    pub fn fail(self, error: AiError) -> Self {
        self.replies.lock().push_back(Err(error));
        self
    }

    /// Wait `delay` before every reply.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    fn id(&self) -> &str {
        "fake"
    }

    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        self.prompts.lock().push(prompt.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(AiError::Network("no scripted reply".to_string())))
    }
}
