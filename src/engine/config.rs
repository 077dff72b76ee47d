//! Configuration for the prompt engine

use crate::engine::error::{EngineError, EngineResult};
use crate::engine::types::QualityCategory;
use serde::{Deserialize, Serialize};

/// What quality mode returns when no category keyword matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QualityFallback {
    /// Every category in declaration order
    #[default]
    FullCatalog,
    /// No categories at all
    Empty,
    /// A single fixed category
    Category(QualityCategory),
}

/// Configuration for prompt engine behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// LIMIT used when the prompt does not name one
    pub default_limit: u32,

    /// Upper bound applied to any extracted limit
    pub max_limit: u32,

    /// Prompts longer than this are rejected
    pub max_prompt_chars: usize,

    /// Quality categories returned on zero keyword hits
    pub quality_fallback: QualityFallback,

    /// Attach the schema-aware system prompt to SQL responses
    pub include_system_prompt: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 1000,
            max_prompt_chars: 2000,
            quality_fallback: QualityFallback::FullCatalog,
            include_system_prompt: true,
        }
    }
}

impl EngineConfig {
    /// Validate configuration
    pub fn validate(&self) -> EngineResult<()> {
        if self.max_limit == 0 {
            return Err(EngineError::Configuration(
                "max_limit must be greater than 0".to_string(),
            ));
        }

        if self.default_limit == 0 || self.default_limit > self.max_limit {
            return Err(EngineError::Configuration(format!(
                "default_limit must be between 1 and max_limit ({})",
                self.max_limit
            )));
        }

        if self.max_prompt_chars == 0 {
            return Err(EngineError::Configuration(
                "max_prompt_chars must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Get documentation for configuration fields
    pub fn documentation() -> Vec<(&'static str, &'static str)> {
        vec![
            ("[engine]", "Deterministic prompt engine"),
            ("default_limit", "Row limit when the prompt names none (default: 10)"),
            ("max_limit", "Largest limit a prompt can request (default: 1000)"),
            ("max_prompt_chars", "Reject prompts longer than this (default: 2000)"),
            (
                "quality_fallback",
                "Quality categories on no match: \"full_catalog\", \"empty\" or { category = \"<name>\" } (default: full_catalog)",
            ),
            ("include_system_prompt", "Attach the schema system prompt to SQL output (default: true)"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.default_limit, 10);
        assert_eq!(config.max_limit, 1000);
        assert_eq!(config.quality_fallback, QualityFallback::FullCatalog);
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case(0, 1000, 2000)]
    #[case(1001, 1000, 2000)]
    #[case(10, 0, 2000)]
    #[case(10, 1000, 0)]
    fn test_validation_rejects(
        #[case] default_limit: u32,
        #[case] max_limit: u32,
        #[case] max_prompt_chars: usize,
    ) {
        let config = EngineConfig {
            default_limit,
            max_limit,
            max_prompt_chars,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(EngineError::Configuration(_))));
    }

    #[rstest]
    #[case(r#"quality_fallback = "full_catalog""#, QualityFallback::FullCatalog)]
    #[case(r#"quality_fallback = "empty""#, QualityFallback::Empty)]
    #[case(
        r#"quality_fallback = { category = "validity" }"#,
        QualityFallback::Category(QualityCategory::Validity)
    )]
    fn test_quality_fallback_from_toml(#[case] text: &str, #[case] expected: QualityFallback) {
        let config: EngineConfig = toml::from_str(text).unwrap();
        assert_eq!(config.quality_fallback, expected);
        assert_eq!(config.default_limit, 10);
    }
}
