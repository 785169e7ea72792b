//! Environment configuration.
//!
//! The only settings that live outside CLI flags are the default dataset URLs
//! (`--default`). They are read from the process environment after loading an
//! optional `.env` file from the working directory:
//!
//! ```text
//! FAIRLEND_PRICING_URL=https://example.org/Pricing_data.csv
//! FAIRLEND_UW_URL=https://example.org/UW_data.csv
//! ```

use crate::domain::Analysis;
use crate::error::AppError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    pub pricing_url: Option<String>,
    pub uw_url: Option<String>,
}

impl EnvConfig {
    /// Load `.env` (if present) and read the process environment.
    pub fn load() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests inject a map here).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |analysis: Analysis| {
            lookup(analysis.url_env_var())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            pricing_url: read(Analysis::Pricing),
            uw_url: read(Analysis::Underwriting),
        }
    }

    /// The configured default dataset URL for an analysis.
    pub fn default_url(&self, analysis: Analysis) -> Result<&str, AppError> {
        let url = match analysis {
            Analysis::Pricing => self.pricing_url.as_deref(),
            Analysis::Underwriting => self.uw_url.as_deref(),
        };
        url.ok_or_else(|| {
            AppError::usage(format!(
                "`--default` needs {} in the environment (.env).",
                analysis.url_env_var()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_count_as_unset() {
        let cfg = EnvConfig::from_lookup(|key| match key {
            "FAIRLEND_PRICING_URL" => Some(" https://x/p.csv ".to_string()),
            "FAIRLEND_UW_URL" => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(cfg.default_url(Analysis::Pricing).unwrap(), "https://x/p.csv");
        let err = cfg.default_url(Analysis::Underwriting).unwrap_err();
        assert!(err.message().contains("FAIRLEND_UW_URL"));
    }
}
