//! Compiled, validated pattern library.
//!
//! Built once at startup from [`LibraryTables`] and shared read-only between all
//! engine components. Any table that fails to compile or breaks an invariant is a
//! [`EngineError::Configuration`] and the engine refuses to start.

use crate::engine::error::{EngineError, EngineResult};
use crate::engine::guard;
use crate::engine::patterns::{
    self, EntityPatternSpec, FewShotExample, IntentSpec, QualityRuleCategory, Slot, SqlTemplate,
    TemplateRule, TransformTemplate,
};
use crate::engine::types::{
    AggregationKind, Granularity, IntentCategory, QualityCategory, SortOrder, TemplateId,
    TransformKind,
};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[a-z_]+\}").expect("Invalid regex"));

/// Raw tables a library is built from. Tests substitute individual tables.
#[derive(Debug, Clone, Copy)]
pub struct LibraryTables {
    pub intents: &'static [IntentSpec],
    pub entities: &'static EntityPatternSpec,
    pub sql_templates: &'static [SqlTemplate],
    pub template_rules: &'static [TemplateRule],
    pub fallback_template: TemplateId,
    pub few_shots: &'static [FewShotExample],
    pub transforms: &'static [TransformTemplate],
    pub quality: &'static [QualityRuleCategory],
}

impl LibraryTables {
    pub fn builtin() -> Self {
        Self {
            intents: patterns::INTENT_TABLE,
            entities: &patterns::ENTITY_PATTERNS,
            sql_templates: patterns::SQL_TEMPLATES,
            template_rules: patterns::TEMPLATE_RULES,
            fallback_template: patterns::FALLBACK_TEMPLATE,
            few_shots: patterns::FEW_SHOT_EXAMPLES,
            transforms: patterns::TRANSFORM_TEMPLATES,
            quality: patterns::QUALITY_CATALOG,
        }
    }
}

/// A compiled intent pattern group
#[derive(Debug)]
pub struct CompiledIntent {
    pub category: IntentCategory,
    pub priority: u32,
    pub patterns: Vec<(Regex, u32)>,
}

/// Compiled entity surface patterns
#[derive(Debug)]
pub struct EntityPatterns {
    pub number: Regex,
    pub iso_date: Regex,
    pub month_name: Regex,
    pub year: Regex,
    pub relative_period: Regex,
    pub last_n_days: Regex,
    pub ranking_verb: Regex,
    pub aggregations: Vec<(Regex, AggregationKind)>,
    pub sort_cues: Vec<(Regex, SortOrder)>,
    pub granularities: Vec<(Regex, Granularity)>,
}

/// Immutable pattern library shared by every engine component
#[derive(Debug)]
pub struct PatternLibrary {
    pub intents: Vec<CompiledIntent>,
    pub entities: EntityPatterns,
    pub sql_templates: &'static [SqlTemplate],
    pub template_rules: &'static [TemplateRule],
    fallback: &'static SqlTemplate,
    pub few_shots: &'static [FewShotExample],
    pub transforms: &'static [TransformTemplate],
    pub quality: &'static [QualityRuleCategory],
}

fn compile(what: &str, pattern: &str) -> EngineResult<Regex> {
    Regex::new(pattern)
        .map_err(|e| EngineError::Configuration(format!("invalid {what} pattern {pattern:?}: {e}")))
}

fn compile_tagged<T: Copy>(what: &str, table: &[(&str, T)]) -> EngineResult<Vec<(Regex, T)>> {
    table
        .iter()
        .map(|(pattern, tag)| Ok((compile(what, pattern)?, *tag)))
        .collect()
}

impl PatternLibrary {
    /// Build the library from the built-in tables
    pub fn builtin() -> EngineResult<Self> {
        Self::load(LibraryTables::builtin())
    }

    /// Compile and validate a set of tables
    pub fn load(tables: LibraryTables) -> EngineResult<Self> {
        let intents = Self::compile_intents(tables.intents)?;
        let entities = Self::compile_entities(tables.entities)?;

        Self::validate_templates(tables.sql_templates)?;
        let fallback = Self::validate_rules(tables)?;
        Self::validate_catalogs(tables)?;

        debug!(
            "Pattern library loaded: {} intents, {} SQL templates, {} transforms, {} quality categories",
            intents.len(),
            tables.sql_templates.len(),
            tables.transforms.len(),
            tables.quality.len()
        );

        Ok(Self {
            intents,
            entities,
            sql_templates: tables.sql_templates,
            template_rules: tables.template_rules,
            fallback,
            few_shots: tables.few_shots,
            transforms: tables.transforms,
            quality: tables.quality,
        })
    }

    /// Look up a SQL template by id
    pub fn template(&self, id: TemplateId) -> Option<&'static SqlTemplate> {
        self.sql_templates.iter().find(|t| t.id == id)
    }

    /// The template used when no rule applies
    pub fn fallback(&self) -> &'static SqlTemplate {
        self.fallback
    }

    /// Total number of rules across all quality categories
    pub fn quality_rule_count(&self) -> usize {
        self.quality.iter().map(|c| c.rules.len()).sum()
    }

    fn compile_intents(table: &[IntentSpec]) -> EngineResult<Vec<CompiledIntent>> {
        let mut seen = HashSet::new();
        let mut compiled = Vec::with_capacity(table.len());

        for spec in table {
            if !seen.insert(spec.category) {
                return Err(EngineError::Configuration(format!(
                    "intent '{}' is declared twice",
                    spec.category
                )));
            }
            if spec.patterns.is_empty() {
                return Err(EngineError::Configuration(format!(
                    "intent '{}' has no patterns",
                    spec.category
                )));
            }

            let mut patterns = Vec::with_capacity(spec.patterns.len());
            for pattern in spec.patterns {
                if pattern.weight == 0 {
                    return Err(EngineError::Configuration(format!(
                        "intent '{}' pattern {:?} has zero weight",
                        spec.category, pattern.regex
                    )));
                }
                patterns.push((compile("intent", pattern.regex)?, pattern.weight));
            }

            compiled.push(CompiledIntent {
                category: spec.category,
                priority: spec.priority,
                patterns,
            });
        }

        Ok(compiled)
    }

    fn compile_entities(spec: &EntityPatternSpec) -> EngineResult<EntityPatterns> {
        Ok(EntityPatterns {
            number: compile("number", spec.number)?,
            iso_date: compile("date", spec.iso_date)?,
            month_name: compile("month", spec.month_name)?,
            year: compile("year", spec.year)?,
            relative_period: compile("relative date", spec.relative_period)?,
            last_n_days: compile("relative date", spec.last_n_days)?,
            ranking_verb: compile("ranking", spec.ranking_verb)?,
            aggregations: compile_tagged("aggregation", spec.aggregations)?,
            sort_cues: compile_tagged("sort", spec.sort_cues)?,
            granularities: compile_tagged("granularity", spec.granularities)?,
        })
    }

    fn validate_templates(templates: &[SqlTemplate]) -> EngineResult<()> {
        let mut seen = HashSet::new();

        for template in templates {
            let id = template.id;
            if !seen.insert(id) {
                return Err(EngineError::Configuration(format!(
                    "SQL template '{id}' is declared twice"
                )));
            }

            for slot in Slot::ALL {
                let declared = template.has_slot(slot);
                let present = template.skeleton.contains(slot.placeholder());
                if declared != present {
                    return Err(EngineError::Configuration(format!(
                        "SQL template '{id}': slot {} declared={declared} but placeholder present={present}",
                        slot.placeholder()
                    )));
                }
            }

            let known: Vec<&str> = Slot::ALL.iter().map(|s| s.placeholder()).collect();
            if let Some(unknown) = PLACEHOLDER
                .find_iter(template.skeleton)
                .find(|m| !known.contains(&m.as_str()))
            {
                return Err(EngineError::Configuration(format!(
                    "SQL template '{id}' uses unknown placeholder {}",
                    unknown.as_str()
                )));
            }

            let needs_date_column =
                template.has_slot(Slot::DateRange) || template.has_slot(Slot::Granularity);
            if needs_date_column && template.date_column.is_none() {
                return Err(EngineError::Configuration(format!(
                    "SQL template '{id}' has a date slot but no date column"
                )));
            }

            let bare = PLACEHOLDER.replace_all(template.skeleton, "1");
            guard::ensure_read_only(&bare).map_err(|e| {
                EngineError::Configuration(format!("SQL template '{id}' is not read-only: {e}"))
            })?;
        }

        Ok(())
    }

    /// Check every rule target and resolve the fallback template
    fn validate_rules(tables: LibraryTables) -> EngineResult<&'static SqlTemplate> {
        let find = |id: TemplateId| tables.sql_templates.iter().find(|t| t.id == id);

        let fallback = find(tables.fallback_template).ok_or_else(|| {
            EngineError::Configuration(format!(
                "fallback SQL template '{}' does not exist",
                tables.fallback_template
            ))
        })?;

        for rule in tables.template_rules {
            let template = find(rule.template).ok_or_else(|| {
                EngineError::Configuration(format!(
                    "rule for '{}' points at missing template '{}'",
                    rule.intent, rule.template
                ))
            })?;
            if !template.intents.contains(&rule.intent) {
                return Err(EngineError::Configuration(format!(
                    "template '{}' does not list intent '{}' that selects it",
                    rule.template, rule.intent
                )));
            }
        }

        Ok(fallback)
    }

    fn validate_catalogs(tables: LibraryTables) -> EngineResult<()> {
        if tables.few_shots.is_empty() {
            return Err(EngineError::Configuration(
                "at least one few-shot example is required".to_string(),
            ));
        }
        if tables.transforms.is_empty() {
            return Err(EngineError::Configuration(
                "at least one transform template is required".to_string(),
            ));
        }
        if tables.quality.is_empty() {
            return Err(EngineError::Configuration(
                "at least one quality category is required".to_string(),
            ));
        }

        let mut kinds: HashSet<TransformKind> = HashSet::new();
        for transform in tables.transforms {
            if !kinds.insert(transform.kind) || transform.keywords.is_empty() {
                return Err(EngineError::Configuration(format!(
                    "transform '{}' is duplicated or has no keywords",
                    transform.kind
                )));
            }
        }

        let mut categories: HashSet<QualityCategory> = HashSet::new();
        for category in tables.quality {
            if !categories.insert(category.category) || category.rules.is_empty() {
                return Err(EngineError::Configuration(format!(
                    "quality category '{}' is duplicated or has no rules",
                    category.category
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::patterns::{DateClause, PatternSpec};

    #[test]
    fn test_builtin_library_loads() {
        let library = PatternLibrary::builtin().unwrap();
        assert_eq!(library.intents.len(), 15);
        assert_eq!(library.sql_templates.len(), 13);
        assert_eq!(library.few_shots.len(), 5);
        assert_eq!(library.transforms.len(), 6);
        assert_eq!(library.quality.len(), 5);
        assert_eq!(library.quality_rule_count(), 18);
        assert_eq!(library.fallback().id, TemplateId::TopEntitiesByCount);
    }

    #[test]
    fn test_every_template_starts_with_select() {
        for template in patterns::SQL_TEMPLATES {
            assert!(
                template.skeleton.starts_with("SELECT"),
                "{} does not start with SELECT",
                template.id
            );
            assert!(!template.skeleton.contains(';'));
        }
    }

    static DUPLICATE_INTENTS: &[IntentSpec] = &[
        IntentSpec {
            category: IntentCategory::Revenue,
            priority: 1,
            patterns: &[PatternSpec {
                regex: r"(?i)\brevenue\b",
                weight: 1,
            }],
        },
        IntentSpec {
            category: IntentCategory::Revenue,
            priority: 2,
            patterns: &[PatternSpec {
                regex: r"(?i)\bsales\b",
                weight: 1,
            }],
        },
    ];

    #[test]
    fn test_duplicate_intent_is_configuration_error() {
        let tables = LibraryTables {
            intents: DUPLICATE_INTENTS,
            ..LibraryTables::builtin()
        };
        let err = PatternLibrary::load(tables).unwrap_err();
        assert!(matches!(err, EngineError::Configuration(_)));
        assert!(err.to_string().contains("declared twice"));
    }

    static BROKEN_REGEX: &[IntentSpec] = &[IntentSpec {
        category: IntentCategory::Revenue,
        priority: 1,
        patterns: &[PatternSpec {
            regex: r"(?i)(revenue",
            weight: 1,
        }],
    }];

    #[test]
    fn test_invalid_regex_is_configuration_error() {
        let tables = LibraryTables {
            intents: BROKEN_REGEX,
            ..LibraryTables::builtin()
        };
        assert!(matches!(
            PatternLibrary::load(tables),
            Err(EngineError::Configuration(_))
        ));
    }

    static MUTATING_TEMPLATE: &[SqlTemplate] = &[SqlTemplate {
        id: TemplateId::TopEntitiesByCount,
        description: "broken",
        intents: &[],
        slots: &[],
        default_sort: SortOrder::Desc,
        date_column: None,
        date_clause: DateClause::And,
        skeleton: "DELETE FROM orders",
    }];

    #[test]
    fn test_mutating_template_rejected() {
        let tables = LibraryTables {
            sql_templates: MUTATING_TEMPLATE,
            template_rules: &[],
            ..LibraryTables::builtin()
        };
        let err = PatternLibrary::load(tables).unwrap_err();
        assert!(err.to_string().contains("not read-only"));
    }

    static UNDECLARED_SLOT: &[SqlTemplate] = &[SqlTemplate {
        id: TemplateId::TopEntitiesByCount,
        description: "limit used but not declared",
        intents: &[],
        slots: &[],
        default_sort: SortOrder::Desc,
        date_column: None,
        date_clause: DateClause::And,
        skeleton: "SELECT p.name FROM products p LIMIT {limit}",
    }];

    #[test]
    fn test_undeclared_slot_rejected() {
        let tables = LibraryTables {
            sql_templates: UNDECLARED_SLOT,
            template_rules: &[],
            ..LibraryTables::builtin()
        };
        let err = PatternLibrary::load(tables).unwrap_err();
        assert!(err.to_string().contains("{limit}"));
    }

    #[test]
    fn test_missing_fallback_rejected() {
        let tables = LibraryTables {
            fallback_template: TemplateId::TopEntitiesByCount,
            sql_templates: &patterns::SQL_TEMPLATES[..1],
            template_rules: &[],
            ..LibraryTables::builtin()
        };
        assert!(PatternLibrary::load(tables).is_err());
    }
}
