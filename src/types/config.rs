use crate::error::CalcError;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalcConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_path")]
    pub path: String,
    #[serde(default = "default_stream")]
    pub default_stream: String,
    #[serde(default = "default_extended_streams")]
    pub extended_streams: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            default_stream: default_stream(),
            extended_streams: default_extended_streams(),
        }
    }
}

fn default_catalog_path() -> String {
    "subjects.json".to_string()
}

fn default_stream() -> String {
    "CSE".to_string()
}

fn default_extended_streams() -> Vec<String> {
    vec!["MBA".to_string()]
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractionConfig {
    pub endpoint: Option<String>,
    pub api_key_env: Option<String>,
    pub timeout_secs: Option<u64>,
    pub fallback_credits: Option<f64>,
    pub min_code_len: Option<usize>,
}

/// Knobs the extraction normalizer runs with.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizerPolicy {
    pub default_stream: String,
    pub fallback_credits: f64,
    pub min_code_len: usize,
}

impl Default for NormalizerPolicy {
    fn default() -> Self {
        Self {
            default_stream: default_stream(),
            fallback_credits: 3.0,
            min_code_len: 4,
        }
    }
}

pub const DEFAULT_API_KEY_ENV: &str = "EDUCALC_API_KEY";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

impl CalcConfig {
    pub fn normalizer_policy(&self) -> NormalizerPolicy {
        let defaults = NormalizerPolicy::default();
        NormalizerPolicy {
            default_stream: self.catalog.default_stream.clone(),
            fallback_credits: self
                .extraction
                .fallback_credits
                .unwrap_or(defaults.fallback_credits),
            min_code_len: self.extraction.min_code_len.unwrap_or(defaults.min_code_len),
        }
    }

    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn api_key_env(&self) -> &str {
        self.extraction
            .api_key_env
            .as_deref()
            .unwrap_or(DEFAULT_API_KEY_ENV)
    }

    pub fn validate(&self) -> Result<(), CalcError> {
        if self.catalog.default_stream.trim().is_empty() {
            return Err(CalcError::ConfigParse(
                "catalog.default_stream must be non-empty".to_string(),
            ));
        }
        if self.catalog.path.trim().is_empty() {
            return Err(CalcError::ConfigParse(
                "catalog.path must be non-empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for stream in &self.catalog.extended_streams {
            let normalized = stream.trim();
            if normalized.is_empty() {
                return Err(CalcError::ConfigParse(
                    "catalog.extended_streams entries must be non-empty".to_string(),
                ));
            }
            if !seen.insert(normalized.to_ascii_uppercase()) {
                return Err(CalcError::ConfigParse(format!(
                    "catalog.extended_streams contains duplicate stream: {normalized}"
                )));
            }
        }

        if let Some(timeout_secs) = self.extraction.timeout_secs {
            if timeout_secs == 0 {
                return Err(CalcError::ConfigParse(
                    "extraction.timeout_secs must be greater than 0".to_string(),
                ));
            }
        }
        if let Some(fallback_credits) = self.extraction.fallback_credits {
            if !(fallback_credits > 0.0 && fallback_credits.is_finite()) {
                return Err(CalcError::ConfigParse(
                    "extraction.fallback_credits must be a positive number".to_string(),
                ));
            }
        }
        if let Some(min_code_len) = self.extraction.min_code_len {
            if min_code_len == 0 {
                return Err(CalcError::ConfigParse(
                    "extraction.min_code_len must be greater than 0".to_string(),
                ));
            }
        }
        if let Some(endpoint) = &self.extraction.endpoint {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(CalcError::ConfigParse(format!(
                    "extraction.endpoint must be an http(s) URL: {endpoint}"
                )));
            }
        }

        Ok(())
    }
}
