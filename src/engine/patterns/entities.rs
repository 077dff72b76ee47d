use super::EntityPatternSpec;
use crate::engine::types::{AggregationKind, Granularity, SortOrder};

pub static ENTITY_PATTERNS: EntityPatternSpec = EntityPatternSpec {
    number: r"\b(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?\b",
    iso_date: r"\b(\d{4})-(\d{2})-(\d{2})\b",
    month_name: r"(?i)\b(january|february|march|april|may|june|july|august|september|october|november|december)\b(?:\s+(\d{4})\b)?",
    year: r"\b((?:19|20)\d{2})\b",
    relative_period: r"(?i)\b(today|yesterday|(?:this|last|past) (?:week|month|year))\b",
    last_n_days: r"(?i)\b(?:last|past)\s+(\d+)\s+(days?|weeks?|months?)\b",
    ranking_verb: r"(?i)\b(top|bottom|best|worst|highest|lowest)\b",
    aggregations: &[
        (r"(?i)\b(total|sum)\b", AggregationKind::Sum),
        (r"(?i)\b(average|avg|mean)\b", AggregationKind::Avg),
        (r"(?i)\b(count|how many|number of)\b", AggregationKind::Count),
        (r"(?i)\b(min|minimum)\b", AggregationKind::Min),
        (r"(?i)\b(max|maximum)\b", AggregationKind::Max),
    ],
    sort_cues: &[
        (
            r"(?i)\b(highest|most|best|top|largest|biggest|greatest|descending|desc)\b",
            SortOrder::Desc,
        ),
        (
            r"(?i)\b(lowest|least|worst|bottom|smallest|fewest|ascending|asc)\b",
            SortOrder::Asc,
        ),
    ],
    granularities: &[
        (r"(?i)\b(daily|(?:by|per|each) day)\b", Granularity::Day),
        (r"(?i)\b(weekly|(?:by|per|each) week)\b", Granularity::Week),
        (r"(?i)\b(monthly|(?:by|per|each) month)\b", Granularity::Month),
        (r"(?i)\b(quarterly|(?:by|per|each) quarter)\b", Granularity::Quarter),
        (r"(?i)\b(yearly|annual(?:ly)?|(?:by|per|each) year)\b", Granularity::Year),
    ],
};
