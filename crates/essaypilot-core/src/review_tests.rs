use super::*;

use essaypilot_config::{SelectorConfig, TimingConfig};
use essaypilot_protocols::AiError;

use crate::testing::{FakeGenerator, FakePage, FakeSurface, SurfaceEvent};

fn config() -> Config {
    let mut config = Config::default();
    config.timing = TimingConfig::instant();
    config.typing.fast_delay_ms = 0;
    config
}

fn selector() -> String {
    SelectorConfig::default().text_buffer
}

fn review(
    page: Arc<FakePage>,
    surface: Arc<FakeSurface>,
    generator: Arc<FakeGenerator>,
    config: &Config,
) -> AiReview {
    AiReview::new(generator, page, surface, config)
}

#[test]
fn test_review_prompt_contains_text() {
    let prompt = review_prompt("eu vou na escola");
    assert!(prompt.starts_with("Revise este texto"));
    assert!(prompt.ends_with("TEXTO ORIGINAL:\neu vou na escola"));
    assert!(prompt.contains("Retorne APENAS o texto corrigido."));
}

#[tokio::test]
async fn test_review_replaces_buffer() {
    let page = Arc::new(FakePage::new(SelectorConfig::default()).with_text("eu vai na escola"));
    let surface = Arc::new(FakeSurface::new());
    let generator = Arc::new(FakeGenerator::new().reply("Eu vou à escola."));

    review(page.clone(), surface.clone(), generator.clone(), &config())
        .review(&selector())
        .await
        .unwrap();

    assert_eq!(page.text().as_deref(), Some("Eu vou à escola."));
    assert!(generator.prompts()[0].ends_with("eu vai na escola"));

    let events = surface.events();
    assert_eq!(
        events.first(),
        Some(&SurfaceEvent::LoadingOpened("Revisando seu texto...".to_string()))
    );
    assert_eq!(events.last(), Some(&SurfaceEvent::LoadingClosed));
    assert!(events.contains(&SurfaceEvent::LoadingUpdated {
        status: Some("Paraná Tools informa: 'Revisado!'".to_string()),
        progress: Some(100),
    }));
}

#[tokio::test]
async fn test_review_empty_buffer() {
    let page = Arc::new(FakePage::new(SelectorConfig::default()).with_text("   "));
    let surface = Arc::new(FakeSurface::new());
    let generator = Arc::new(FakeGenerator::new().reply("nunca"));

    let err = review(page.clone(), surface.clone(), generator.clone(), &config())
        .review(&selector())
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::EmptyBuffer));
    assert!(generator.prompts().is_empty());
    assert_eq!(surface.events().last(), Some(&SurfaceEvent::LoadingClosed));
}

#[tokio::test]
async fn test_review_ai_failure_leaves_buffer() {
    let page = Arc::new(FakePage::new(SelectorConfig::default()).with_text("texto original"));
    let surface = Arc::new(FakeSurface::new());
    let generator = Arc::new(FakeGenerator::new().fail(AiError::ApiError {
        status: 500,
        message: "indisponível".to_string(),
    }));

    let err = review(page.clone(), surface.clone(), generator, &config())
        .review(&selector())
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::Ai(AiError::ApiError { status: 500, .. })));
    assert_eq!(page.text().as_deref(), Some("texto original"));
    assert_eq!(surface.events().last(), Some(&SurfaceEvent::LoadingClosed));
}

#[tokio::test]
async fn test_status_rotates_while_waiting() {
    let page = Arc::new(FakePage::new(SelectorConfig::default()).with_text("texto"));
    let surface = Arc::new(FakeSurface::new());
    let generator = Arc::new(
        FakeGenerator::new()
            .reply("Texto.")
            .with_delay(Duration::from_millis(120)),
    );

    review(page, surface.clone(), generator, &config())
        .review(&selector())
        .await
        .unwrap();

    let rotated: Vec<String> = surface
        .events()
        .into_iter()
        .filter_map(|e| match e {
            SurfaceEvent::LoadingUpdated {
                status: Some(status),
                progress: None,
            } => Some(status),
            _ => None,
        })
        .collect();
    assert!(!rotated.is_empty());
    assert_eq!(rotated[0], "Analisando detalhes...");
    assert!(!rotated.iter().any(|s| s.contains("Revisado")));
}

#[tokio::test]
async fn test_rotation_stops_on_drop() {
    let surface = Arc::new(FakeSurface::new());
    let rotation = StatusRotation::start(
        surface.clone(),
        &REVIEW_STATUSES[..4],
        Duration::from_millis(5),
    );
    tokio::time::sleep(Duration::from_millis(30)).await;
    drop(rotation);
    tokio::time::sleep(Duration::from_millis(10)).await;
    let seen = surface.events().len();
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(surface.events().len(), seen);
    assert!(seen > 0);
}
