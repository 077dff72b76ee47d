//! Deterministic prompt engine
//!
//! Turns short natural-language requests into one of three structured outputs using
//! pattern matching over a fixed, validated pattern library:
//!
//! - a read-only SQL query against the e-commerce schema
//! - a data-transformation plan with a code sketch
//! - a set of data-quality rules grouped by category
//!
//! Every stage is a pure function of the prompt and the library, so the same prompt
//! always yields the same output, and one engine can be shared across threads.
//!
//! # Usage
//!
//! ```rust
//! use dataforge::engine::{EngineConfig, PromptEngine};
//!
//! let engine = PromptEngine::new(EngineConfig::default())?;
//! let response = engine.generate_sql("top 5 customers by spending")?;
//! assert!(response.sql.starts_with("SELECT"));
//! # Ok::<(), dataforge::engine::EngineError>(())
//! ```

pub mod assembler;
pub mod classifier;
pub mod config;
pub mod error;
pub mod extractor;
pub mod few_shot;
pub mod guard;
pub mod library;
pub mod patterns;
pub mod prompt;
pub mod response;
pub mod selector;
pub mod trace;
pub mod types;

pub use classifier::{IntentClassifier, IntentRanking};
pub use config::{EngineConfig, QualityFallback};
pub use error::{EngineError, EngineResult};
pub use extractor::EntityExtractor;
pub use few_shot::FewShotMatcher;
pub use library::{LibraryTables, PatternLibrary};
pub use prompt::PromptGenerator;
pub use response::{QualityResponse, SqlResponse, TransformResponse};
pub use selector::{Selection, TemplateSelector};
pub use trace::{ReasoningTrace, StepLabel, TraceBuilder};
pub use types::{EntityBundle, IntentCategory};

use std::sync::Arc;
use tracing::{debug, info};

/// Database dialect the templates and date expressions are written for
const DIALECT: &str = "SQLite";

/// Main prompt engine that orchestrates the pipeline stages
#[derive(Debug, Clone)]
pub struct PromptEngine {
    config: EngineConfig,
    library: Arc<PatternLibrary>,
    extractor: EntityExtractor,
    classifier: IntentClassifier,
    selector: TemplateSelector,
    few_shots: FewShotMatcher,
    system_prompt: Option<String>,
}

impl PromptEngine {
    /// Create an engine over the built-in pattern library
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        let library = Arc::new(PatternLibrary::builtin()?);
        Self::with_library(config, library)
    }

    /// Create an engine over an already loaded library
    pub fn with_library(config: EngineConfig, library: Arc<PatternLibrary>) -> EngineResult<Self> {
        config.validate()?;

        let system_prompt = config
            .include_system_prompt
            .then(|| PromptGenerator::system_prompt(DIALECT));

        info!(
            "Prompt engine ready ({} intents, {} SQL templates)",
            library.intents.len(),
            library.sql_templates.len()
        );

        Ok(Self {
            extractor: EntityExtractor::new(Arc::clone(&library), config.max_limit),
            classifier: IntentClassifier::new(Arc::clone(&library)),
            selector: TemplateSelector::new(Arc::clone(&library), &config),
            few_shots: FewShotMatcher::new(Arc::clone(&library)),
            library,
            config,
            system_prompt,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn library(&self) -> &PatternLibrary {
        &self.library
    }

    /// Reject empty and oversized prompts before any stage runs
    fn validate_prompt<'a>(&self, prompt: &'a str) -> EngineResult<&'a str> {
        let trimmed = prompt.trim();
        if trimmed.is_empty() {
            return Err(EngineError::InvalidInput("prompt is empty".to_string()));
        }

        let length = trimmed.chars().count();
        if length > self.config.max_prompt_chars {
            return Err(EngineError::InvalidInput(format!(
                "prompt is {length} characters, the limit is {}",
                self.config.max_prompt_chars
            )));
        }

        Ok(trimmed)
    }

    /// Generate a read-only SQL query from a natural-language prompt
    pub fn generate_sql(&self, prompt: &str) -> EngineResult<SqlResponse> {
        let prompt = self.validate_prompt(prompt)?;
        info!("Generating SQL for prompt: {}", prompt);

        let entities = self.extractor.extract(prompt);
        let intents = self.classifier.classify(prompt);
        let selection = self.selector.select_sql(&intents, &entities);
        let few_shot = self.few_shots.find(prompt, intents.top());
        let sql = assembler::render_sql(&selection)?;
        let reasoning = TraceBuilder::build(
            Some(&intents),
            &entities,
            Selection::Sql(&selection),
            few_shot,
        );

        debug!("Generated SQL from template '{}'", selection.template.id);

        Ok(SqlResponse {
            prompt: prompt.to_string(),
            sql,
            template: selection.template.id,
            reasoning,
            technique: response::SQL_TECHNIQUE,
            intents,
            entities,
            parameters: selection.parameters,
            few_shot,
            system_prompt: self.system_prompt.clone(),
        })
    }

    /// Generate a transformation plan and code sketch
    pub fn generate_transform(&self, prompt: &str) -> EngineResult<TransformResponse> {
        let prompt = self.validate_prompt(prompt)?;
        info!("Generating transform for prompt: {}", prompt);

        let entities = self.extractor.extract(prompt);
        let selection = self.selector.select_transform(prompt);
        let reasoning =
            TraceBuilder::build(None, &entities, Selection::Transform(&selection), None);
        let template = selection.template;

        Ok(TransformResponse {
            prompt: prompt.to_string(),
            kind: template.kind,
            name: template.name,
            description: template.description,
            plan: template.steps,
            code: template.code,
            matches: selection.matches,
            reasoning,
            technique: response::TRANSFORM_TECHNIQUE,
        })
    }

    /// Generate data-quality rules for the categories the prompt mentions
    pub fn generate_quality(&self, prompt: &str) -> EngineResult<QualityResponse> {
        let prompt = self.validate_prompt(prompt)?;
        info!("Generating quality rules for prompt: {}", prompt);

        let entities = self.extractor.extract(prompt);
        let selection = self.selector.select_quality(prompt);
        let categories = assembler::quality_categories(&selection);
        let reasoning = TraceBuilder::build(None, &entities, Selection::Quality(&selection), None);

        Ok(QualityResponse {
            prompt: prompt.to_string(),
            total_rules: categories.rule_count(),
            categories,
            fallback: selection.fallback,
            reasoning,
            technique: response::QUALITY_TECHNIQUE,
        })
    }

    /// Ranked intents for a prompt, for inspection
    pub fn classify(&self, prompt: &str) -> EngineResult<IntentRanking> {
        let prompt = self.validate_prompt(prompt)?;
        Ok(self.classifier.classify(prompt))
    }

    /// Extracted entities for a prompt, for inspection
    pub fn extract(&self, prompt: &str) -> EngineResult<EntityBundle> {
        let prompt = self.validate_prompt(prompt)?;
        Ok(self.extractor.extract(prompt))
    }
}
