//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// First error as a [`ConfigError`], for callers that refuse to start
    /// on an invalid configuration.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(ConfigError::InvalidValue {
                field: err.path,
                message: err.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_browser(config, &mut result);
        Self::validate_selectors(config, &mut result);
        Self::validate_timing(config, &mut result);
        Self::validate_ai(config, &mut result);

        Ok(result)
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        if config.browser.debug_port == 0 {
            result.add_error(ValidationError::new(
                "browser.debug_port",
                "Port cannot be 0",
            ));
        }

        if config.browser.request_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "browser.request_timeout_secs",
                "request_timeout_secs must be greater than 0",
            ));
        }

        if config.browser.page_match.is_none() {
            result.add_warning(ValidationWarning::new(
                "browser.page_match",
                "page_match is not set, the first open tab will be used",
            ));
        }
    }

    fn validate_selectors(config: &Config, result: &mut ValidationResult) {
        let selectors = &config.selectors;
        let required = [
            ("selectors.text_buffer", &selectors.text_buffer),
            ("selectors.marker", &selectors.marker),
            ("selectors.suggestion_menu", &selectors.suggestion_menu),
            ("selectors.processing_indicator", &selectors.processing_indicator),
            ("selectors.conclude_label", &selectors.conclude_label),
            ("selectors.corrector_label", &selectors.corrector_label),
        ];
        for (path, value) in required {
            if value.trim().is_empty() {
                result.add_error(ValidationError::new(path, "Selector cannot be empty"));
            }
        }

        if selectors.context_root.trim().is_empty() {
            result.add_warning(ValidationWarning::new(
                "selectors.context_root",
                "context_root is empty, the whole document will be scanned",
            ));
        }
    }

    fn validate_timing(config: &Config, result: &mut ValidationResult) {
        let timing = &config.timing;
        let bounds = [
            ("timing.target_wait_ms", timing.target_wait_ms),
            ("timing.processing_wait_ms", timing.processing_wait_ms),
            ("timing.menu_wait_ms", timing.menu_wait_ms),
            ("timing.appear_poll_ms", timing.appear_poll_ms),
            ("timing.disappear_poll_ms", timing.disappear_poll_ms),
        ];
        for (path, value) in bounds {
            if value == 0 {
                result.add_error(ValidationError::new(
                    path,
                    "Wait bounds and poll intervals must be greater than 0",
                ));
            }
        }

        if timing.appear_poll_ms > timing.menu_wait_ms {
            result.add_warning(ValidationWarning::new(
                "timing.appear_poll_ms",
                "Poll interval exceeds menu_wait_ms, menus will be probed once",
            ));
        }
    }

    fn validate_ai(config: &Config, result: &mut ValidationResult) {
        let ai = &config.ai;

        if !ai.api_url.starts_with("http://") && !ai.api_url.starts_with("https://") {
            result.add_error(ValidationError::new(
                "ai.api_url",
                "api_url must start with http:// or https://",
            ));
        }

        if ai.api_key.is_none() {
            result.add_warning(ValidationWarning::new(
                "ai.api_key",
                "API key is not set, AI review and generation are unavailable",
            ));
        }

        if ai.min_words > ai.max_words {
            result.add_error(ValidationError::new(
                "ai.min_words",
                format!(
                    "min_words ({}) cannot exceed max_words ({})",
                    ai.min_words, ai.max_words
                ),
            ));
        }

        if ai.timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "ai.timeout_secs",
                "timeout_secs must be greater than 0",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
