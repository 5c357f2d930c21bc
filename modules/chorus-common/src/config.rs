use std::env;

use crate::error::PipelineError;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Secrets and service settings loaded from the environment (and `.env`).
///
/// Credentials are optional here; each pipeline asks for the one it needs
/// before doing any work.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub apify_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            openai_api_key: non_empty_env("OPENAI_API_KEY"),
            openai_model: non_empty_env("OPENAI_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            openai_base_url: non_empty_env("OPENAI_BASE_URL"),
            apify_api_key: non_empty_env("APIFY_API_KEY"),
        }
    }

    pub fn require_openai_key(&self) -> Result<&str, PipelineError> {
        self.openai_api_key
            .as_deref()
            .ok_or(PipelineError::MissingCredential("OPENAI_API_KEY"))
    }

    pub fn require_apify_key(&self) -> Result<&str, PipelineError> {
        self.apify_api_key
            .as_deref()
            .ok_or(PipelineError::MissingCredential("APIFY_API_KEY"))
    }

    pub fn log_redacted(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  OPENAI_API_KEY: {}", preview_opt(&self.openai_api_key));
        tracing::info!("  OPENAI_MODEL: {}", self.openai_model);
        tracing::info!(
            "  OPENAI_BASE_URL: {}",
            self.openai_base_url.as_deref().unwrap_or("<default>")
        );
        tracing::info!("  APIFY_API_KEY: {}", preview_opt(&self.apify_api_key));
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn preview(val: &str) -> String {
    let n = val.char_indices().nth(5).map(|(i, _)| i).unwrap_or(val.len());
    format!("{}...({} chars)", &val[..n], val.chars().count())
}

fn preview_opt(val: &Option<String>) -> String {
    match val {
        Some(v) => preview(v),
        None => "<not set>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credentials_are_reported_by_name() {
        let config = Config::default();
        let err = config.require_openai_key().unwrap_err();
        assert_eq!(err.to_string(), "OPENAI_API_KEY environment variable not set");
        assert!(matches!(
            config.require_apify_key(),
            Err(PipelineError::MissingCredential("APIFY_API_KEY"))
        ));
    }

    #[test]
    fn present_credential_is_returned() {
        let config = Config {
            openai_api_key: Some("sk-abc".into()),
            ..Config::default()
        };
        assert_eq!(config.require_openai_key().unwrap(), "sk-abc");
    }

    #[test]
    fn preview_redacts_all_but_prefix() {
        assert_eq!(preview("sk-1234567890"), "sk-12...(13 chars)");
        assert_eq!(preview("abc"), "abc...(3 chars)");
    }
}
