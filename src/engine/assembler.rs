//! Binds selections and entities into final output payloads.

use crate::engine::error::{EngineError, EngineResult};
use crate::engine::guard;
use crate::engine::patterns::{DateClause, Slot};
use crate::engine::response::QualityCategories;
use crate::engine::selector::{QualitySelection, SqlSelection};
use crate::engine::types::Granularity;

/// Renders a SQL template with its resolved parameters.
///
/// Every placeholder the template declares is replaced; the result is re-checked by the
/// read-only guard before it leaves the engine.
pub fn render_sql(selection: &SqlSelection) -> EngineResult<String> {
    let template = selection.template;
    let params = &selection.parameters;
    let mut sql = template.skeleton.to_string();

    for slot in template.slots {
        let value = match slot {
            Slot::Limit => params.limit.map(|l| l.to_string()).ok_or_else(|| {
                EngineError::Configuration(format!("{}: limit not resolved", template.id))
            })?,
            Slot::SortDirection => params
                .direction
                .unwrap_or(template.default_sort)
                .sql_keyword()
                .to_string(),
            Slot::DateRange => match (params.date_range, template.date_column) {
                (Some(range), Some(column)) => {
                    let predicate = range.predicate(column);
                    match template.date_clause {
                        DateClause::And => format!("\n  AND {predicate}"),
                        DateClause::Where => format!("\nWHERE {predicate}"),
                    }
                }
                _ => String::new(),
            },
            Slot::Granularity => {
                let column = template.date_column.ok_or_else(|| {
                    EngineError::Configuration(format!("{}: no date column", template.id))
                })?;
                params
                    .granularity
                    .unwrap_or(Granularity::Month)
                    .period_expression(column)
            }
        };
        sql = sql.replace(slot.placeholder(), &value);
    }

    guard::ensure_read_only(&sql)?;
    Ok(sql)
}

/// Rules for every selected category, in category declaration order
pub fn quality_categories(selection: &QualitySelection) -> QualityCategories {
    QualityCategories::new(
        selection
            .categories
            .iter()
            .map(|c| (c.category, c.rules))
            .collect(),
    )
}
