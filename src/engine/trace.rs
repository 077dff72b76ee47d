//! Chain-of-thought traces composed from stage outputs.

use crate::engine::classifier::IntentRanking;
use crate::engine::patterns::{FewShotExample, Slot};
use crate::engine::selector::{
    QualitySelection, Selection, SqlParameters, SqlSelection, TransformSelection,
};
use crate::engine::types::EntityBundle;
use serde::Serialize;
use std::fmt;
use strum::Display;

/// Label of a reasoning step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "title_case")]
pub enum StepLabel {
    Classification,
    Entities,
    Selection,
    Defaults,
    Parameters,
    FewShot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceStep {
    pub label: StepLabel,
    pub detail: String,
}

/// Ordered, labeled explanation of how an output was produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReasoningTrace {
    steps: Vec<TraceStep>,
}

impl ReasoningTrace {
    pub fn steps(&self) -> &[TraceStep] {
        &self.steps
    }

    pub fn step(&self, label: StepLabel) -> Option<&TraceStep> {
        self.steps.iter().find(|s| s.label == label)
    }

    fn push(&mut self, label: StepLabel, detail: impl Into<String>) {
        self.steps.push(TraceStep {
            label,
            detail: detail.into(),
        });
    }
}

impl fmt::Display for ReasoningTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            writeln!(f, "{}. {}: {}", i + 1, step.label, step.detail)?;
        }
        Ok(())
    }
}

/// Builds traces. Holds no state; every step is derived from its arguments.
pub struct TraceBuilder;

impl TraceBuilder {
    pub fn build(
        intents: Option<&IntentRanking>,
        entities: &EntityBundle,
        selection: Selection<'_>,
        few_shot: Option<&FewShotExample>,
    ) -> ReasoningTrace {
        let mut trace = ReasoningTrace::default();

        if let Some(intents) = intents {
            let detail = match intents.top() {
                Some(top) => format!("top intent '{top}' from candidates [{intents}]"),
                None => "no intent matched".to_string(),
            };
            trace.push(StepLabel::Classification, detail);
        }

        trace.push(StepLabel::Entities, entities.to_string());

        match selection {
            Selection::Sql(sql) => Self::sql_steps(&mut trace, sql),
            Selection::Transform(transform) => Self::transform_steps(&mut trace, transform),
            Selection::Quality(quality) => Self::quality_steps(&mut trace, quality),
        }

        if let Some(example) = few_shot {
            trace.push(
                StepLabel::FewShot,
                format!("closest example '{}': {}", example.prompt, example.reasoning),
            );
        }

        trace
    }

    fn sql_steps(trace: &mut ReasoningTrace, selection: &SqlSelection) {
        let template = selection.template.id;
        let detail = match selection.rule {
            Some(rule) => match rule.companion {
                Some(companion) => format!(
                    "template '{template}' via rule {} + {companion}",
                    rule.intent
                ),
                None => format!("template '{template}' via rule {}", rule.intent),
            },
            None => format!("no rule applies, fallback template '{template}'"),
        };
        trace.push(StepLabel::Selection, detail);

        let params = &selection.parameters;
        if !params.defaulted.is_empty() {
            let slots: Vec<&str> = params.defaulted.iter().map(|s| s.placeholder()).collect();
            trace.push(
                StepLabel::Defaults,
                format!("filled from defaults: {}", slots.join(", ")),
            );
        }

        trace.push(StepLabel::Parameters, Self::describe_parameters(selection));
    }

    fn describe_parameters(selection: &SqlSelection) -> String {
        let params: &SqlParameters = &selection.parameters;
        let mut bound = Vec::new();
        if let Some(limit) = params.limit {
            bound.push(format!("limit={limit}"));
        }
        if let Some(direction) = params.direction {
            bound.push(format!("direction={}", direction.sql_keyword()));
        }
        if selection.template.has_slot(Slot::DateRange) {
            match params.date_range {
                Some(range) => bound.push(format!("date_range={range}")),
                None => bound.push("date_range=none".to_string()),
            }
        }
        if let Some(granularity) = params.granularity {
            bound.push(format!("period={granularity}"));
        }
        bound.join(", ")
    }

    fn transform_steps(trace: &mut ReasoningTrace, selection: &TransformSelection) {
        let template = selection.template;
        let detail = if selection.fallback_used() {
            format!("no keyword matched, default template '{}'", template.kind)
        } else {
            let ranked: Vec<String> = selection
                .matches
                .iter()
                .map(|m| format!("{}={}", m.kind, m.hits))
                .collect();
            format!(
                "template '{}' from keyword hits [{}]",
                template.kind,
                ranked.join(", ")
            )
        };
        trace.push(StepLabel::Selection, detail);
        trace.push(
            StepLabel::Parameters,
            format!(
                "'{}': {} plan steps, code bound unchanged",
                template.name,
                template.steps.len()
            ),
        );
    }

    fn quality_steps(trace: &mut ReasoningTrace, selection: &QualitySelection) {
        let names: Vec<String> = selection
            .categories
            .iter()
            .map(|c| c.category.to_string())
            .collect();
        let detail = match selection.fallback {
            Some(policy) => format!(
                "no keyword matched, fallback {policy:?} selects [{}]",
                names.join(", ")
            ),
            None => format!("categories with keyword hits [{}]", names.join(", ")),
        };
        trace.push(StepLabel::Selection, detail);

        let rules: usize = selection.categories.iter().map(|c| c.rules.len()).sum();
        trace.push(
            StepLabel::Parameters,
            format!("{rules} rules across {} categories", selection.categories.len()),
        );
    }
}
