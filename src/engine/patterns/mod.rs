//! Static pattern tables.
//!
//! Everything here is plain `'static` data. [`crate::engine::library::PatternLibrary`]
//! compiles and validates these tables once at startup; nothing mutates them afterwards.

mod entities;
mod examples;
mod intents;
mod quality;
mod sql;
mod transforms;

pub use entities::ENTITY_PATTERNS;
pub use examples::FEW_SHOT_EXAMPLES;
pub use intents::INTENT_TABLE;
pub use quality::QUALITY_CATALOG;
pub use sql::{FALLBACK_TEMPLATE, SQL_TEMPLATES, TEMPLATE_RULES};
pub use transforms::TRANSFORM_TEMPLATES;

use crate::engine::types::{
    AggregationKind, Granularity, IntentCategory, QualityCategory, Severity, SortOrder, TemplateId,
    TransformKind,
};
use serde::Serialize;

/// A regex that contributes `weight` to its category's score when it matches
#[derive(Debug, Clone, Copy)]
pub struct PatternSpec {
    pub regex: &'static str,
    pub weight: u32,
}

/// Pattern group for one intent category
#[derive(Debug, Clone, Copy)]
pub struct IntentSpec {
    pub category: IntentCategory,
    /// Higher wins when two categories score the same
    pub priority: u32,
    pub patterns: &'static [PatternSpec],
}

/// Surface patterns used by the entity extractor
#[derive(Debug, Clone, Copy)]
pub struct EntityPatternSpec {
    pub number: &'static str,
    pub iso_date: &'static str,
    pub month_name: &'static str,
    pub year: &'static str,
    pub relative_period: &'static str,
    pub last_n_days: &'static str,
    pub ranking_verb: &'static str,
    pub aggregations: &'static [(&'static str, AggregationKind)],
    pub sort_cues: &'static [(&'static str, SortOrder)],
    pub granularities: &'static [(&'static str, Granularity)],
}

/// Named placeholder a SQL template can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// `{limit}`, default 10
    Limit,
    /// `{direction}`, default is the template's own direction
    SortDirection,
    /// `{date_range}`, default is no filter
    DateRange,
    /// `{period}`, default is monthly buckets
    Granularity,
}

impl Slot {
    pub fn placeholder(self) -> &'static str {
        match self {
            Slot::Limit => "{limit}",
            Slot::SortDirection => "{direction}",
            Slot::DateRange => "{date_range}",
            Slot::Granularity => "{period}",
        }
    }

    pub const ALL: [Slot; 4] = [
        Slot::Limit,
        Slot::SortDirection,
        Slot::DateRange,
        Slot::Granularity,
    ];
}

/// How a date predicate joins the template's filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateClause {
    /// Appended to an existing WHERE as `AND ...`
    And,
    /// Template has no WHERE; the predicate opens one
    Where,
}

/// Parameterized read-only query
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SqlTemplate {
    pub id: TemplateId,
    pub description: &'static str,
    /// Intents whose rules may select this template
    pub intents: &'static [IntentCategory],
    pub slots: &'static [Slot],
    pub default_sort: SortOrder,
    /// Column the date-range and granularity slots bind to
    pub date_column: Option<&'static str>,
    pub date_clause: DateClause,
    #[serde(skip)]
    pub skeleton: &'static str,
}

impl SqlTemplate {
    pub fn has_slot(&self, slot: Slot) -> bool {
        self.slots.contains(&slot)
    }
}

/// Maps a top intent (optionally with a companion intent) to a template
#[derive(Debug, Clone, Copy)]
pub struct TemplateRule {
    pub intent: IntentCategory,
    pub companion: Option<IntentCategory>,
    pub template: TemplateId,
}

/// Curated (prompt, reasoning, query) triple attached to SQL traces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FewShotExample {
    pub prompt: &'static str,
    pub reasoning: &'static str,
    pub sql: &'static str,
    pub tags: &'static [IntentCategory],
}

/// Static data-transformation plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransformTemplate {
    pub kind: TransformKind,
    pub name: &'static str,
    pub description: &'static str,
    pub keywords: &'static [&'static str],
    pub steps: &'static [&'static str],
    pub code: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QualityRule {
    pub field: &'static str,
    pub description: &'static str,
    pub severity: Severity,
}

/// One data-quality dimension and its rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QualityRuleCategory {
    pub category: QualityCategory,
    pub name: &'static str,
    pub description: &'static str,
    pub keywords: &'static [&'static str],
    pub rules: &'static [QualityRule],
}
