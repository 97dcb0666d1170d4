use super::*;
use crate::types::DialogTone;

#[test]
fn test_dialog_builder() {
    let dialog = Dialog::new("mode", "Escolha o modo", DialogTone::Question)
        .with_button(DialogButton::secondary("Básico", "basic"))
        .with_button(DialogButton::new("Avançado", "advanced"));
    assert_eq!(dialog.buttons.len(), 2);
    assert!(dialog.buttons[0].secondary);
    assert!(!dialog.buttons[1].secondary);
    assert_eq!(dialog.buttons[1].value, "advanced");
}

#[test]
fn test_alert_has_single_ok() {
    let dialog = Dialog::alert("Pronto", DialogTone::Success);
    assert_eq!(dialog.buttons.len(), 1);
    assert_eq!(dialog.buttons[0].label, "OK");
}

#[test]
fn test_user_action_deserialize() {
    let pick: UserAction = serde_json::from_str(r#"{"action":"pick","value":"casa"}"#).unwrap();
    assert_eq!(pick, UserAction::Pick("casa".to_string()));

    let skip: UserAction = serde_json::from_str(r#"{"action":"skip"}"#).unwrap();
    assert_eq!(skip, UserAction::Skip);

    let manual: UserAction = serde_json::from_str(r#"{"action":"manual"}"#).unwrap();
    assert_eq!(manual, UserAction::Manual);
}

#[test]
fn test_generation_choice_deserialize() {
    let choice: GenerationChoice = serde_json::from_str("\"regenerate\"").unwrap();
    assert_eq!(choice, GenerationChoice::Regenerate);
}
