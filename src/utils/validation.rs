// file: src/utils/validation.rs
// description: request validation utilities and helpers
// reference: input validation patterns

use crate::error::{GatewayError, Result};
use reqwest::Url;

pub struct Validator;

impl Validator {
    pub fn validate_not_blank(field: &str, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(GatewayError::Validation(format!("{} must not be empty", field)));
        }
        Ok(())
    }

    /// Repository URLs must be absolute http(s) URLs with a host.
    pub fn validate_repo_url(url: &str) -> Result<()> {
        Self::validate_not_blank("repo_url", url)?;

        let parsed = Url::parse(url.trim()).map_err(|e| {
            GatewayError::Validation(format!("Invalid repo_url {}: {}", url, e))
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(GatewayError::Validation(format!(
                "repo_url must use http or https: {}",
                url
            )));
        }

        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(GatewayError::Validation(format!(
                "repo_url has no host: {}",
                url
            )));
        }

        Ok(())
    }

    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
            None => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_validate_repo_url() {
        assert_ok!(Validator::validate_repo_url("https://github.com/acme/widgets"));
        assert_ok!(Validator::validate_repo_url("http://git.internal/acme/widgets.git"));
        assert_err!(Validator::validate_repo_url(""));
        assert_err!(Validator::validate_repo_url("   "));
        assert_err!(Validator::validate_repo_url("github.com/acme/widgets"));
        assert_err!(Validator::validate_repo_url("ftp://github.com/acme/widgets"));
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(Validator::validate_not_blank("question", "why?").is_ok());
        let err = Validator::validate_not_blank("question", " \n").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: question must not be empty");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(Validator::truncate_text("short", 10), "short");
        assert_eq!(
            Validator::truncate_text("this is a very long text", 10),
            "this is a ..."
        );
        assert_eq!(Validator::truncate_text("repositório", 9), "repositór...");
    }
}
