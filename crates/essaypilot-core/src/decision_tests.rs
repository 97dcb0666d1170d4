use super::*;
use std::time::Duration;

use crate::testing::{FakeSurface, SurfaceEvent};

fn context() -> ErrorContext {
    ErrorContext {
        before: "ontem ".to_string(),
        error: "eu vai".to_string(),
        after: " na escola".to_string(),
    }
}

fn suggestions() -> Vec<String> {
    vec!["eu vou".to_string(), "eu ia".to_string()]
}

#[tokio::test]
async fn test_pick_resolves_suggestion() {
    let surface = Arc::new(FakeSurface::new().action(UserAction::Pick("eu ia".to_string())));
    let ui = DecisionUi::new(surface.clone());

    let resolution = ui.present(&context(), &suggestions()).await.unwrap();
    assert_eq!(resolution, Resolution::Suggestion("eu ia".to_string()));
    assert_eq!(
        surface.events().last(),
        Some(&SurfaceEvent::Applying("Aplicando sugestão...".to_string()))
    );
}

#[tokio::test]
async fn test_manual_prompt_seeded_with_error() {
    let surface = Arc::new(
        FakeSurface::new()
            .action(UserAction::Manual)
            .prompt_reply(Some("eu fui")),
    );
    let ui = DecisionUi::new(surface.clone());

    let resolution = ui.present(&context(), &suggestions()).await.unwrap();
    assert_eq!(resolution, Resolution::Manual("eu fui".to_string()));
    assert!(surface.events().contains(&SurfaceEvent::Prompt {
        message: "Digite a correção manual para \"eu vai\":".to_string(),
        seed: "eu vai".to_string(),
    }));
    assert!(surface
        .events()
        .contains(&SurfaceEvent::Applying("Aplicando correção manual...".to_string())));
}

#[tokio::test]
async fn test_cancelled_manual_prompt_skips() {
    let surface = Arc::new(FakeSurface::new().action(UserAction::Manual).prompt_reply(None));
    let ui = DecisionUi::new(surface.clone());

    let resolution = ui.present(&context(), &suggestions()).await.unwrap();
    assert_eq!(resolution, Resolution::Skip);
    assert!(surface
        .events()
        .contains(&SurfaceEvent::Applying("Operação manual cancelada.".to_string())));
}

#[tokio::test]
async fn test_skip_action() {
    let surface = Arc::new(FakeSurface::new().action(UserAction::Skip));
    let ui = DecisionUi::new(surface.clone());

    let resolution = ui.present(&context(), &[]).await.unwrap();
    assert_eq!(resolution, Resolution::Skip);
    assert!(surface
        .events()
        .contains(&SurfaceEvent::Applying("Pulando erro...".to_string())));
}

#[tokio::test]
async fn test_concurrent_present_rejected() {
    let surface = Arc::new(FakeSurface::new().with_action_delay(Duration::from_millis(100)));
    let ui = DecisionUi::new(surface);

    let first = {
        let ui = ui.clone();
        tokio::spawn(async move { ui.present(&context(), &suggestions()).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    let second = ui.present(&context(), &suggestions()).await;
    assert!(matches!(second, Err(DecisionError::AlreadyPending)));

    let first = first.await.unwrap().unwrap();
    assert_eq!(first, Resolution::Skip);

    // Slot released after resolution.
    let third = ui.present(&context(), &suggestions()).await;
    assert!(third.is_ok());
}

#[tokio::test]
async fn test_choose_mode() {
    let surface = Arc::new(FakeSurface::new().answer(MODE_DIALOG, "advanced"));
    let ui = DecisionUi::new(surface);
    assert_eq!(ui.choose_mode().await.unwrap(), Some(CorrectionMode::Advanced));
}

#[tokio::test]
async fn test_choose_mode_dismissed() {
    let surface = Arc::new(FakeSurface::new().answer(MODE_DIALOG, ""));
    let ui = DecisionUi::new(surface);
    assert_eq!(ui.choose_mode().await.unwrap(), None);
}

#[tokio::test]
async fn test_confirm_basic_defaults_to_cancel() {
    let surface = Arc::new(FakeSurface::new());
    let ui = DecisionUi::new(surface);
    assert!(!ui.confirm_basic().await.unwrap());
}

#[tokio::test]
async fn test_choose_write_mode() {
    let surface = Arc::new(
        FakeSurface::new()
            .answer(WRITE_MODE_DIALOG, "append")
            .answer(WRITE_MODE_DIALOG, "replace"),
    );
    let ui = DecisionUi::new(surface);
    assert_eq!(ui.choose_write_mode().await.unwrap(), WriteMode::Append);
    assert_eq!(ui.choose_write_mode().await.unwrap(), WriteMode::Replace);
    assert_eq!(ui.choose_write_mode().await.unwrap(), WriteMode::Cancel);
}

#[tokio::test]
async fn test_notify_uses_alert() {
    let surface = Arc::new(FakeSurface::new());
    let ui = DecisionUi::new(surface.clone());
    ui.notify("Pronto", Severity::Success).await.unwrap();
    assert_eq!(surface.last_message(ALERT_DIALOG).as_deref(), Some("Pronto"));
}

#[tokio::test]
async fn test_show_auto_message() {
    let surface = Arc::new(FakeSurface::new());
    let ui = DecisionUi::new(surface.clone());
    ui.show_auto(" cassa ", "casa").await.unwrap();
    assert_eq!(
        surface.events(),
        vec![SurfaceEvent::Applying("Aplicando: cassa → casa".to_string())]
    );
}
