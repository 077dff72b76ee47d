use crate::engine::classifier::IntentRanking;
use crate::engine::response::{QualityResponse, SqlResponse, TransformResponse};
use crate::engine::trace::ReasoningTrace;
use crate::engine::types::EntityBundle;
use crate::highlighter::SqlHighlighter;
use nu_ansi_term::{Color, Style};
use prettytable::{Cell, Row, Table};

/// Text renderer for engine responses
pub struct TextFormatter {
    color: bool,
    highlighter: SqlHighlighter,
}

impl TextFormatter {
    pub fn new(color: bool) -> Self {
        Self {
            color,
            highlighter: SqlHighlighter::new(),
        }
    }

    fn heading(&self, text: &str) -> String {
        if self.color {
            Style::new().fg(Color::Cyan).bold().paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn sql(&self, sql: &str) -> String {
        if self.color {
            self.highlighter.paint(sql)
        } else {
            sql.to_string()
        }
    }

    fn reasoning(&self, out: &mut String, trace: &ReasoningTrace) {
        out.push_str(&format!("\n{}\n", self.heading("Reasoning")));
        out.push_str(&trace.to_string());
    }

    pub fn format_sql(&self, response: &SqlResponse) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{} ({})\n",
            self.heading("Generated SQL"),
            response.template
        ));
        out.push_str(&format!("{}\n", self.sql(&response.sql)));
        self.reasoning(&mut out, &response.reasoning);

        if let Some(example) = response.few_shot {
            out.push_str(&format!("\n{}\n", self.heading("Similar example")));
            out.push_str(&format!("{}\n", example.prompt));
            out.push_str(&format!("{}\n", self.sql(example.sql)));
        }

        out.push_str(&format!("\nTechnique: {}\n", response.technique));
        out
    }

    pub fn format_transform(&self, response: &TransformResponse) -> String {
        let mut out = String::new();
        out.push_str(&format!("{} ({})\n", self.heading(response.name), response.kind));
        out.push_str(&format!("{}\n\n", response.description));

        out.push_str(&format!("{}\n", self.heading("Plan")));
        for (i, step) in response.plan.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, step));
        }

        out.push_str(&format!("\n{}\n", self.heading("Code")));
        out.push_str(&format!("{}\n", response.code));
        self.reasoning(&mut out, &response.reasoning);
        out.push_str(&format!("\nTechnique: {}\n", response.technique));
        out
    }

    pub fn format_quality(&self, response: &QualityResponse) -> String {
        let mut out = String::new();

        if response.categories.is_empty() {
            out.push_str("No quality categories selected\n");
        }

        for (category, rules) in response.categories.iter() {
            out.push_str(&format!("{}\n", self.heading(&category.to_string())));
            let mut table = Table::new();
            table.set_titles(Row::new(vec![
                Cell::new("Field"),
                Cell::new("Rule"),
                Cell::new("Severity"),
            ]));
            for rule in rules {
                table.add_row(Row::new(vec![
                    Cell::new(rule.field),
                    Cell::new(rule.description),
                    Cell::new(&rule.severity.to_string()),
                ]));
            }
            out.push_str(&format!("{table}\n"));
        }

        out.push_str(&format!("Total rules: {}\n", response.total_rules));
        self.reasoning(&mut out, &response.reasoning);
        out.push_str(&format!("\nTechnique: {}\n", response.technique));
        out
    }
}

/// Ranked intents as a table
pub fn format_intents(ranking: &IntentRanking) -> String {
    if ranking.is_empty() {
        return "No intent matched".to_string();
    }

    let mut table = Table::new();
    table.set_titles(Row::new(vec![
        Cell::new("#"),
        Cell::new("Intent"),
        Cell::new("Score"),
    ]));
    for (i, candidate) in ranking.iter().enumerate() {
        table.add_row(Row::new(vec![
            Cell::new(&(i + 1).to_string()),
            Cell::new(&candidate.intent.to_string()),
            Cell::new(&candidate.score.to_string()),
        ]));
    }
    table.to_string()
}

fn or_none<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Extracted entities as a two-column table
pub fn format_entities(entities: &EntityBundle) -> String {
    let numbers = entities
        .numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let dates = entities
        .dates
        .iter()
        .map(|d| format!("{} ({})", d.text, d.range))
        .collect::<Vec<_>>()
        .join(", ");

    let rows = [
        ("numbers", numbers),
        ("dates", dates),
        ("aggregation", or_none(entities.aggregation)),
        ("sort_order", or_none(entities.sort_order)),
        ("limit", or_none(entities.limit)),
        ("granularity", or_none(entities.granularity)),
    ];

    let mut table = Table::new();
    table.set_titles(Row::new(vec![Cell::new("Entity"), Cell::new("Value")]));
    for (name, value) in rows {
        let value = if value.is_empty() { "-".to_string() } else { value };
        table.add_row(Row::new(vec![Cell::new(name), Cell::new(&value)]));
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineConfig, PromptEngine};

    fn engine() -> PromptEngine {
        PromptEngine::new(EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_plain_sql_output() {
        let response = engine().generate_sql("top 3 products by revenue").unwrap();
        let text = TextFormatter::new(false).format_sql(&response);
        assert!(text.starts_with("Generated SQL (top_products_revenue)\nSELECT"));
        assert!(text.contains("LIMIT 3"));
        assert!(text.contains("Reasoning\n1. Classification:"));
        assert!(!text.contains("\u{1b}["));
    }

    #[test]
    fn test_quality_tables() {
        let response = engine()
            .generate_quality("find duplicate customers")
            .unwrap();
        let text = TextFormatter::new(false).format_quality(&response);
        assert!(text.starts_with("uniqueness\n"));
        assert!(text.contains("customer.email"));
        assert!(text.contains("Total rules: 3"));
    }

    #[test]
    fn test_transform_plan_numbered() {
        let response = engine().generate_transform("remove duplicates").unwrap();
        let text = TextFormatter::new(false).format_transform(&response);
        assert!(text.starts_with("Deduplicate Records (deduplicate)"));
        assert!(text.contains("1. Identify exact duplicates across all columns"));
        assert!(text.contains("def deduplicate"));
    }

    #[test]
    fn test_intent_table() {
        let ranking = engine().classify("top 10 products by revenue").unwrap();
        let text = format_intents(&ranking);
        assert!(text.contains("top_products"));
        assert_eq!(format_intents(&IntentRanking::default()), "No intent matched");
    }

    #[test]
    fn test_entity_table() {
        let entities = engine().extract("top 5 customers last 7 days").unwrap();
        let text = format_entities(&entities);
        assert!(text.contains("last 7 days"));
        assert!(text.contains("desc"));
    }
}
