use super::*;

#[test]
fn test_validate_default_config() {
    let config = Config::default();
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
}

#[test]
fn test_default_config_warns_about_missing_key() {
    let config = Config::default();
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.warnings.iter().any(|w| w.path == "ai.api_key"));
    assert!(result.warnings.iter().any(|w| w.path == "browser.page_match"));
}

#[test]
fn test_validate_invalid_port() {
    let mut config = Config::default();
    config.browser.debug_port = 0;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "browser.debug_port"));
}

#[test]
fn test_validate_empty_selector() {
    let mut config = Config::default();
    config.selectors.marker = "  ".to_string();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "selectors.marker"));
}

#[test]
fn test_validate_empty_context_root_warns() {
    let mut config = Config::default();
    config.selectors.context_root = String::new();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "selectors.context_root"));
}

#[test]
fn test_validate_zero_wait_bound() {
    let mut config = Config::default();
    config.timing.menu_wait_ms = 0;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.iter().any(|e| e.path == "timing.menu_wait_ms"));
}

#[test]
fn test_validate_zero_pause_allowed() {
    let mut config = Config::default();
    config.timing = crate::schema::TimingConfig::instant();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
}

#[test]
fn test_validate_invalid_api_url() {
    let mut config = Config::default();
    config.ai.api_url = "api.example.com".to_string();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "ai.api_url"));
}

#[test]
fn test_validate_word_bounds() {
    let mut config = Config::default();
    config.ai.min_words = 400;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "ai.min_words"));
}

#[test]
fn test_into_result_first_error() {
    let mut config = Config::default();
    config.browser.debug_port = 0;
    config.ai.timeout_secs = 0;

    let result = ConfigValidator::validate(&config).unwrap();
    let err = result.into_result().unwrap_err();
    assert!(err.to_string().contains("browser.debug_port"));
}

#[test]
fn test_into_result_keeps_warnings() {
    let result = ConfigValidator::validate(&Config::default()).unwrap();
    let warnings = result.into_result().unwrap();
    assert!(!warnings.is_empty());
}

#[test]
fn test_validation_error_new() {
    let err = ValidationError::new("ai.model", "bad");
    assert_eq!(err.path, "ai.model");
    assert_eq!(err.message, "bad");
}
