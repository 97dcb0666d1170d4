//! Configuration schema definitions.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub selectors: SelectorConfig,

    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub typing: TypingConfig,

    #[serde(default)]
    pub ai: AiConfig,
}

/// Chrome connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Remote debugging port.
    #[serde(default = "default_debug_port")]
    pub debug_port: u16,

    /// Launch Chrome when nothing listens on the debug port.
    #[serde(default = "default_true")]
    pub launch: bool,

    #[serde(default)]
    pub headless: bool,

    /// Profile directory for a launched Chrome (login state survives runs).
    #[serde(default)]
    pub profile_dir: Option<PathBuf>,

    /// Substring of the URL of the tab to attach to. First page tab if unset.
    #[serde(default)]
    pub page_match: Option<String>,

    /// Per CDP command timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            debug_port: default_debug_port(),
            launch: true,
            headless: false,
            profile_dir: None,
            page_match: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl BrowserConfig {
    /// CDP HTTP endpoint.
    pub fn endpoint(&self) -> String {
        format!("http://localhost:{}", self.debug_port)
    }

    /// Profile directory, defaulting to `~/.essaypilot/browser-profile`.
    pub fn profile_dir(&self) -> PathBuf {
        self.profile_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".essaypilot")
                .join("browser-profile")
        })
    }
}

fn default_debug_port() -> u16 {
    9222
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

/// Host page DOM contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    #[serde(default = "default_text_buffer")]
    pub text_buffer: String,

    #[serde(default = "default_marker")]
    pub marker: String,

    #[serde(default = "default_suggestion_menu")]
    pub suggestion_menu: String,

    #[serde(default = "default_processing_indicator")]
    pub processing_indicator: String,

    #[serde(default = "default_context_root")]
    pub context_root: String,

    /// Label of the button shown once the essay is concluded.
    #[serde(default = "default_conclude_label")]
    pub conclude_label: String,

    /// Label of the online corrector button when it is ready.
    #[serde(default = "default_corrector_label")]
    pub corrector_label: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            text_buffer: default_text_buffer(),
            marker: default_marker(),
            suggestion_menu: default_suggestion_menu(),
            processing_indicator: default_processing_indicator(),
            context_root: default_context_root(),
            conclude_label: default_conclude_label(),
            corrector_label: default_corrector_label(),
        }
    }
}

fn default_text_buffer() -> String {
    r#"textarea#outlined-multiline-static[class*="jss"]"#.to_string()
}

fn default_marker() -> String {
    r#"span[style*="background-color: rgb"][style*="cursor: pointer"]"#.to_string()
}

fn default_suggestion_menu() -> String {
    "ul#menu-list-grow".to_string()
}

fn default_processing_indicator() -> String {
    "div.sc-kAyceB.kEYIQb".to_string()
}

fn default_context_root() -> String {
    ".jss6".to_string()
}

fn default_conclude_label() -> String {
    "Concluir".to_string()
}

fn default_corrector_label() -> String {
    "CORRIGIR ONLINE".to_string()
}

/// Waits and pauses, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Bound for locating the text buffer.
    pub target_wait_ms: u64,
    /// Bound for the online corrector's processing indicator to go away.
    pub processing_wait_ms: u64,
    /// Bound for a marker's suggestion menu to appear.
    pub menu_wait_ms: u64,
    pub appear_poll_ms: u64,
    pub disappear_poll_ms: u64,
    /// Pause after clicking a marker before looking for its menu.
    pub marker_click_ms: u64,
    /// Pause after the menu appears, for its entries to render.
    pub menu_render_ms: u64,
    /// Pause after scrolling a marker into view.
    pub scroll_ms: u64,
    /// Pause between markers.
    pub step_ms: u64,
    /// Pause after a replacement is written.
    pub post_apply_ms: u64,
    /// How long the "applying" transition stays up for automatic picks.
    pub auto_apply_feedback_ms: u64,
    /// Pause after the online corrector finished.
    pub corrector_settle_ms: u64,
    /// Fade-out time before an overlay is detached.
    pub overlay_settle_ms: u64,
    /// Interval of the rotating status line during AI review.
    pub status_rotation_ms: u64,
    /// How long the final AI status stays on screen.
    pub final_status_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            target_wait_ms: 5_000,
            processing_wait_ms: 45_000,
            menu_wait_ms: 1_500,
            appear_poll_ms: 50,
            disappear_poll_ms: 100,
            marker_click_ms: 150,
            menu_render_ms: 100,
            scroll_ms: 140,
            step_ms: 1,
            post_apply_ms: 150,
            auto_apply_feedback_ms: 800,
            corrector_settle_ms: 1_000,
            overlay_settle_ms: 400,
            status_rotation_ms: 2_200,
            final_status_ms: 1_200,
        }
    }
}

impl TimingConfig {
    /// Every pause zeroed and every bound shortened; for tests.
    pub fn instant() -> Self {
        Self {
            target_wait_ms: 200,
            processing_wait_ms: 200,
            menu_wait_ms: 100,
            appear_poll_ms: 5,
            disappear_poll_ms: 5,
            marker_click_ms: 0,
            menu_render_ms: 0,
            scroll_ms: 0,
            step_ms: 0,
            post_apply_ms: 0,
            auto_apply_feedback_ms: 0,
            corrector_settle_ms: 0,
            overlay_settle_ms: 0,
            status_rotation_ms: 20,
            final_status_ms: 0,
        }
    }
}

/// Keystroke simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    /// Delay between characters for bulk typing.
    pub fast_delay_ms: u64,
    /// Default delay for the interactive typing command.
    pub default_delay_ms: u64,
    /// Countdown before interactive typing starts; 0 disables it.
    pub countdown_from: u8,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            fast_delay_ms: 1,
            default_delay_ms: 1,
            countdown_from: 3,
        }
    }
}

/// External AI text service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    #[serde(default = "default_ai_api_url")]
    pub api_url: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_ai_model")]
    pub model: String,

    #[serde(default = "default_min_words")]
    pub min_words: u32,

    #[serde(default = "default_max_words")]
    pub max_words: u32,

    #[serde(default = "default_ai_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_url: default_ai_api_url(),
            api_key: None,
            model: default_ai_model(),
            min_words: default_min_words(),
            max_words: default_max_words(),
            timeout_secs: default_ai_timeout_secs(),
        }
    }
}

fn default_ai_api_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_ai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_min_words() -> u32 {
    170
}

fn default_max_words() -> u32 {
    300
}

fn default_ai_timeout_secs() -> u64 {
    180
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
