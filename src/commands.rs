//! Command handlers.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use tracing::{info, warn};

use essaypilot_browser::{BrowserManager, CdpHostPage, PageOverlay};
use essaypilot_config::{Config, ConfigLoader, ConfigValidator, ValidationResult};
use essaypilot_core::{
    extract_context, AiReview, Corrector, DecisionUi, EssayGenerator, GenerationOutcome, Typist,
};
use essaypilot_protocols::{
    AiError, CorrectionMode, DecisionSurface, HostPage, TextGenerator,
};
use essaypilot_provider_chat::ChatProvider;

use crate::cli::TextSource;

/// Load, apply the `--page` override and refuse invalid configurations.
pub(crate) fn load_config(path: &Path, page: Option<String>) -> anyhow::Result<Config> {
    let mut config = ConfigLoader::load_or_default(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    if let Some(pattern) = page {
        config.browser.page_match = Some(pattern);
    }

    let result = ConfigValidator::validate(&config)?;
    for warning in &result.warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }
    result.into_result()?;
    Ok(config)
}

/// The attached tab with both of its surfaces.
struct Attached {
    manager: BrowserManager,
    page: Arc<dyn HostPage>,
    surface: Arc<dyn DecisionSurface>,
}

impl Attached {
    async fn open(config: &Config) -> anyhow::Result<Self> {
        let manager = BrowserManager::new(config.browser.clone());
        let session = manager
            .attach(config.browser.page_match.as_deref())
            .await
            .context("Failed to attach to the essay tab")?;

        Ok(Self {
            manager,
            page: Arc::new(CdpHostPage::new(session.clone())),
            surface: Arc::new(PageOverlay::new(session, config.timing.overlay_settle_ms)),
        })
    }

    async fn close(self) {
        self.manager.close().await;
    }
}

/// AI service, when an API key is configured.
fn ai_generator(config: &Config) -> anyhow::Result<Option<Arc<dyn TextGenerator>>> {
    if config.ai.api_key.is_none() {
        return Ok(None);
    }
    let provider = ChatProvider::from_config(&config.ai)?;
    Ok(Some(Arc::new(provider)))
}

pub(crate) async fn correct(
    config: &Config,
    mode: Option<CorrectionMode>,
    yes: bool,
) -> anyhow::Result<()> {
    let attached = Attached::open(config).await?;

    let mut corrector = Corrector::new(attached.page.clone(), attached.surface.clone(), config)
        .with_mode(mode)
        .assume_yes(yes);
    match ai_generator(config)? {
        Some(generator) => {
            corrector = corrector.with_reviewer(AiReview::new(
                generator,
                attached.page.clone(),
                attached.surface.clone(),
                config,
            ));
        }
        None => info!("No AI key configured, the final review will not be offered"),
    }

    let result = corrector.run().await;
    attached.close().await;
    let report = result?;

    println!("{}", report.message);
    println!(
        "[{}] {} ({} markers at start)",
        report.outcome.as_str(),
        report.tally,
        report.markers_at_start
    );
    Ok(())
}

pub(crate) async fn generate(config: &Config) -> anyhow::Result<()> {
    let Some(generator) = ai_generator(config)? else {
        bail!(AiError::NotConfigured("ai.api_key is not set".to_string()));
    };
    let attached = Attached::open(config).await?;

    let essay = EssayGenerator::new(
        generator,
        attached.page.clone(),
        DecisionUi::new(attached.surface.clone()),
        config,
    );
    let result = essay.run().await;
    attached.close().await;

    match result? {
        GenerationOutcome::Written(mode) => println!("Texto escrito ({mode:?})."),
        other => println!("Nada foi escrito ({other:?})."),
    }
    Ok(())
}

pub(crate) async fn type_text(
    config: &Config,
    source: TextSource,
    delay: Option<u64>,
) -> anyhow::Result<()> {
    let text = read_source(source)?;
    let delay = Duration::from_millis(delay.unwrap_or(config.typing.default_delay_ms));
    let attached = Attached::open(config).await?;

    let typist = Typist::new(attached.page.clone(), &config.typing)
        .with_surface(attached.surface.clone());
    let result = typist
        .type_with_delay(&config.selectors.text_buffer, &text, delay)
        .await;
    attached.close().await;
    let stats = result?;

    println!(
        "{} caracteres digitados, {} falharam{}",
        stats.typed,
        stats.failed,
        if stats.verified { "" } else { " (texto pode estar incompleto)" }
    );
    Ok(())
}

fn read_source(source: TextSource) -> anyhow::Result<String> {
    match (source.text, source.file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display())),
        (None, None) => bail!("Either --text or --file is required"),
    }
}

pub(crate) async fn context(config: &Config) -> anyhow::Result<()> {
    let attached = Attached::open(config).await?;
    let result = extract_context(attached.page.as_ref(), &config.selectors.context_root).await;
    attached.close().await;

    match result? {
        Some(context) => println!("{context}"),
        None => println!("Nenhum contexto encontrado na página."),
    }
    Ok(())
}

/// Print every validation finding; fails when any of them is an error.
pub(crate) fn check_config(path: &Path) -> anyhow::Result<()> {
    let config = ConfigLoader::load_or_default(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    let result = ConfigValidator::validate(&config)?;
    print_findings(path, &result);

    if !result.is_valid() {
        bail!("Configuration has {} error(s)", result.errors.len());
    }
    Ok(())
}

fn print_findings(path: &Path, result: &ValidationResult) {
    println!("{}", path.display());
    for error in &result.errors {
        println!("  error   {}: {}", error.path, error.message);
    }
    for warning in &result.warnings {
        println!("  warning {}: {}", warning.path, warning.message);
    }
    if result.errors.is_empty() && result.warnings.is_empty() {
        println!("  ok");
    }
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
