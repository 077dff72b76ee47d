//! Response payloads returned by the engine.

use crate::engine::classifier::IntentRanking;
use crate::engine::config::QualityFallback;
use crate::engine::patterns::{FewShotExample, QualityRule};
use crate::engine::selector::{SqlParameters, TransformMatch};
use crate::engine::trace::ReasoningTrace;
use crate::engine::types::{EntityBundle, QualityCategory, TemplateId, TransformKind};
use serde::ser::{Serialize, SerializeMap, Serializer};

pub const SQL_TECHNIQUE: &str = "Few-shot + Chain-of-thought + Role prompting";
pub const TRANSFORM_TECHNIQUE: &str = "Keyword matching + Template rendering";
pub const QUALITY_TECHNIQUE: &str = "Context-aware rule selection";

/// Generated read-only query and everything that led to it
#[derive(Debug, Clone, serde::Serialize)]
pub struct SqlResponse {
    pub prompt: String,
    pub sql: String,
    pub template: TemplateId,
    pub reasoning: ReasoningTrace,
    pub technique: &'static str,
    pub intents: IntentRanking,
    pub entities: EntityBundle,
    pub parameters: SqlParameters,
    pub few_shot: Option<&'static FewShotExample>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

/// Transformation plan and code sketch
#[derive(Debug, Clone, serde::Serialize)]
pub struct TransformResponse {
    pub prompt: String,
    pub kind: TransformKind,
    pub name: &'static str,
    pub description: &'static str,
    pub plan: &'static [&'static str],
    pub code: &'static str,
    pub matches: Vec<TransformMatch>,
    pub reasoning: ReasoningTrace,
    pub technique: &'static str,
}

/// Rules grouped by category, serialized as a map that keeps declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QualityCategories(Vec<(QualityCategory, &'static [QualityRule])>);

impl QualityCategories {
    pub fn new(entries: Vec<(QualityCategory, &'static [QualityRule])>) -> Self {
        Self(entries)
    }

    pub fn iter(&self) -> impl Iterator<Item = (QualityCategory, &'static [QualityRule])> + '_ {
        self.0.iter().copied()
    }

    pub fn names(&self) -> Vec<QualityCategory> {
        self.0.iter().map(|(category, _)| *category).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn rule_count(&self) -> usize {
        self.0.iter().map(|(_, rules)| rules.len()).sum()
    }
}

impl Serialize for QualityCategories {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, rules) in &self.0 {
            map.serialize_entry(category, rules)?;
        }
        map.end()
    }
}

/// Selected data-quality rules
#[derive(Debug, Clone, serde::Serialize)]
pub struct QualityResponse {
    pub prompt: String,
    pub categories: QualityCategories,
    pub total_rules: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<QualityFallback>,
    pub reasoning: ReasoningTrace,
    pub technique: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::patterns::QUALITY_CATALOG;

    #[test]
    fn test_quality_categories_keep_order() {
        let uniqueness = &QUALITY_CATALOG[3];
        let completeness = &QUALITY_CATALOG[0];
        let categories = QualityCategories::new(vec![
            (uniqueness.category, uniqueness.rules),
            (completeness.category, completeness.rules),
        ]);

        let json = serde_json::to_string(&categories).unwrap();
        let uniqueness_at = json.find("\"uniqueness\"").unwrap();
        let completeness_at = json.find("\"completeness\"").unwrap();
        assert!(uniqueness_at < completeness_at);
        assert_eq!(categories.rule_count(), 8);
    }

    #[test]
    fn test_rule_shape() {
        let completeness = &QUALITY_CATALOG[0];
        let categories =
            QualityCategories::new(vec![(completeness.category, completeness.rules)]);
        let value = serde_json::to_value(&categories).unwrap();
        assert_eq!(
            value["completeness"][0],
            serde_json::json!({"field": "order_date", "description": "NOT NULL", "severity": "critical"})
        );
    }
}
