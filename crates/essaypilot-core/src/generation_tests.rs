use super::*;

use essaypilot_config::TimingConfig;
use essaypilot_protocols::{AiError, PageContext};

use crate::decision::{ALERT_DIALOG, GENERATION_CONFIRM_DIALOG, WRITE_MODE_DIALOG};
use crate::testing::{FakeGenerator, FakePage, FakeSurface, SurfaceEvent};

fn config() -> Config {
    let mut config = Config::default();
    config.timing = TimingConfig::instant();
    config.typing.fast_delay_ms = 0;
    config
}

fn page_with_context(text: &str) -> Arc<FakePage> {
    Arc::new(
        FakePage::new(SelectorConfig::default())
            .with_text(text)
            .with_context(PageContext {
                genre: Some("Artigo de opinião".to_string()),
                theme: Some("Redes sociais".to_string()),
                ..Default::default()
            }),
    )
}

fn generator(
    page: Arc<FakePage>,
    surface: Arc<FakeSurface>,
    ai: Arc<FakeGenerator>,
) -> EssayGenerator {
    EssayGenerator::new(ai, page, DecisionUi::new(surface), &config())
}

#[test]
fn test_generation_prompt() {
    let prompt = generation_prompt("CTX", 170, 300);
    assert!(prompt.starts_with("Crie uma redação"));
    assert!(prompt.contains("entre 170 palavras (no minimo) e 300 palavras (no maximo)"));
    assert!(prompt.ends_with("\n\nCTX"));
}

#[tokio::test]
async fn test_declined_confirmation() {
    let page = page_with_context("");
    let surface = Arc::new(FakeSurface::new());
    let ai = Arc::new(FakeGenerator::new());

    let outcome = generator(page, surface, ai.clone()).run().await.unwrap();
    assert_eq!(outcome, GenerationOutcome::Declined);
    assert!(ai.prompts().is_empty());
}

#[tokio::test]
async fn test_append_after_regenerate() {
    let page = page_with_context("Meu rascunho.");
    let surface = Arc::new(
        FakeSurface::new()
            .answer(GENERATION_CONFIRM_DIALOG, "true")
            .generation_choice(GenerationChoice::Regenerate)
            .generation_choice(GenerationChoice::Write)
            .answer(WRITE_MODE_DIALOG, "append"),
    );
    let ai = Arc::new(FakeGenerator::new().reply("Primeira versão.").reply("Segunda versão."));

    let outcome = generator(page.clone(), surface.clone(), ai.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(outcome, GenerationOutcome::Written(WriteMode::Append));
    assert_eq!(
        page.text().as_deref(),
        Some("Meu rascunho.\n\nSegunda versão.")
    );

    let prompts = ai.prompts();
    assert_eq!(prompts.len(), 2);
    assert_eq!(prompts[0], prompts[1]);
    assert!(prompts[0].contains("GÊNERO TEXTUAL:\nArtigo de opinião"));

    let shown: Vec<_> = surface
        .events()
        .into_iter()
        .filter(|e| matches!(e, SurfaceEvent::Generated(_)))
        .collect();
    assert_eq!(shown.len(), 2);
    assert_eq!(
        surface.last_message(ALERT_DIALOG).as_deref(),
        Some("Texto gerado pela IA foi adicionado ao final!")
    );
}

#[tokio::test]
async fn test_replace_clears_then_types() {
    let page = page_with_context("Texto antigo que some.");
    let surface = Arc::new(
        FakeSurface::new()
            .answer(GENERATION_CONFIRM_DIALOG, "true")
            .generation_choice(GenerationChoice::Write)
            .answer(WRITE_MODE_DIALOG, "replace"),
    );
    let ai = Arc::new(FakeGenerator::new().reply("Texto novo."));

    let outcome = generator(page.clone(), surface, ai).run().await.unwrap();
    assert_eq!(outcome, GenerationOutcome::Written(WriteMode::Replace));
    assert_eq!(page.text().as_deref(), Some("Texto novo."));
}

#[tokio::test]
async fn test_abandon_leaves_buffer() {
    let page = page_with_context("intocado");
    let surface = Arc::new(
        FakeSurface::new()
            .answer(GENERATION_CONFIRM_DIALOG, "true")
            .generation_choice(GenerationChoice::Abandon),
    );
    let ai = Arc::new(FakeGenerator::new().reply("descartado"));

    let outcome = generator(page.clone(), surface, ai).run().await.unwrap();
    assert_eq!(outcome, GenerationOutcome::Abandoned);
    assert_eq!(page.text().as_deref(), Some("intocado"));
}

#[tokio::test]
async fn test_write_cancelled() {
    let page = page_with_context("intocado");
    let surface = Arc::new(
        FakeSurface::new()
            .answer(GENERATION_CONFIRM_DIALOG, "true")
            .generation_choice(GenerationChoice::Write),
    );
    let ai = Arc::new(FakeGenerator::new().reply("texto"));

    let outcome = generator(page.clone(), surface, ai).run().await.unwrap();
    assert_eq!(outcome, GenerationOutcome::WriteCancelled);
    assert_eq!(page.text().as_deref(), Some("intocado"));
}

#[tokio::test]
async fn test_missing_context_is_error() {
    let page = Arc::new(FakePage::new(SelectorConfig::default()).with_text(""));
    let surface = Arc::new(FakeSurface::new().answer(GENERATION_CONFIRM_DIALOG, "true"));
    let ai = Arc::new(FakeGenerator::new().reply("nunca"));

    let err = generator(page, surface.clone(), ai.clone())
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::ContextMissing));
    assert!(ai.prompts().is_empty());
    assert!(surface.events().contains(&SurfaceEvent::LoadingClosed));
    assert!(surface
        .last_message(ALERT_DIALOG)
        .unwrap()
        .starts_with("Erro ao gerar texto:"));
}

#[tokio::test]
async fn test_missing_buffer_on_write() {
    let page = page_with_context("x");
    page.set_text(None);
    let surface = Arc::new(
        FakeSurface::new()
            .answer(GENERATION_CONFIRM_DIALOG, "true")
            .generation_choice(GenerationChoice::Write),
    );
    let ai = Arc::new(FakeGenerator::new().reply("texto"));

    let err = generator(page, surface, ai).run().await.unwrap_err();
    assert!(matches!(err, WorkflowError::TargetNotFound));
}

#[tokio::test]
async fn test_ai_failure_surfaced() {
    let page = page_with_context("x");
    let surface = Arc::new(FakeSurface::new().answer(GENERATION_CONFIRM_DIALOG, "true"));
    let ai = Arc::new(FakeGenerator::new().fail(AiError::UnrecognizedShape("{}".to_string())));

    let err = generator(page, surface.clone(), ai).run().await.unwrap_err();
    assert!(matches!(err, WorkflowError::Ai(AiError::UnrecognizedShape(_))));
    assert!(surface.events().contains(&SurfaceEvent::LoadingClosed));
}
