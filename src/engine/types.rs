//! Shared types for the prompt engine.
//!
//! Every closed set the engine dispatches on (intents, templates, transform kinds,
//! quality categories) is an explicit enum so that pattern tables stay plain data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

// ============================================================================
// Intents
// ============================================================================

/// Coarse purpose a prompt expresses
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IntentCategory {
    Revenue,
    TopProducts,
    TopCustomers,
    Orders,
    Trend,
    Category,
    Region,
    Inventory,
    Rating,
    Discount,
    Customer,
    Product,
    Payment,
    Refund,
    Profit,
}

/// One ranked classification candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntentScore {
    pub intent: IntentCategory,
    pub score: u32,
}

// ============================================================================
// Entities
// ============================================================================

/// Aggregation verb found in the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AggregationKind {
    Sum,
    Avg,
    Count,
    Min,
    Max,
}

/// Requested ordering direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn sql_keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Time bucket used by grouping templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl Granularity {
    /// SQLite expression that buckets `column` into this granularity
    pub fn period_expression(self, column: &str) -> String {
        match self {
            Granularity::Day => format!("strftime('%Y-%m-%d', {column})"),
            Granularity::Week => format!("strftime('%Y-W%W', {column})"),
            Granularity::Month => format!("strftime('%Y-%m', {column})"),
            Granularity::Quarter => format!(
                "strftime('%Y', {column}) || '-Q' || ((CAST(strftime('%m', {column}) AS INTEGER) + 2) / 3)"
            ),
            Granularity::Year => format!("strftime('%Y', {column})"),
        }
    }
}

/// Relative period keyword, resolved by the database rather than by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RelativePeriod {
    Today,
    Yesterday,
    ThisWeek,
    LastWeek,
    ThisMonth,
    LastMonth,
    ThisYear,
    LastYear,
}

/// Normalized, comparable form of a date-like token.
///
/// Absolute ranges are half-open (`start <= d < end`). Relative ranges stay symbolic so
/// that extraction never reads the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DateRange {
    Between { start: NaiveDate, end: NaiveDate },
    MonthOfYear { month: u32 },
    Relative { period: RelativePeriod },
    LastDays { days: u32 },
    LastMonths { months: u32 },
}

impl DateRange {
    /// Whole calendar day
    pub fn day(date: NaiveDate) -> Option<Self> {
        Some(DateRange::Between {
            start: date,
            end: date.succ_opt()?,
        })
    }

    /// Whole calendar month
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        Some(DateRange::Between { start, end })
    }

    /// Whole calendar year
    pub fn year(year: i32) -> Option<Self> {
        Some(DateRange::Between {
            start: NaiveDate::from_ymd_opt(year, 1, 1)?,
            end: NaiveDate::from_ymd_opt(year + 1, 1, 1)?,
        })
    }

    /// SQL predicate restricting `column` to this range (SQLite date functions)
    pub fn predicate(&self, column: &str) -> String {
        match self {
            DateRange::Between { start, end } => format!(
                "{column} >= '{}' AND {column} < '{}'",
                start.format("%Y-%m-%d"),
                end.format("%Y-%m-%d")
            ),
            DateRange::MonthOfYear { month } => {
                format!("strftime('%m', {column}) = '{month:02}'")
            }
            DateRange::LastDays { days } => {
                format!("{column} >= date('now', '-{days} days')")
            }
            DateRange::LastMonths { months } => {
                format!("{column} >= date('now', '-{months} months')")
            }
            DateRange::Relative { period } => {
                let (from, to) = match period {
                    RelativePeriod::Today => ("date('now')", None),
                    RelativePeriod::Yesterday => ("date('now', '-1 day')", Some("date('now')")),
                    RelativePeriod::ThisWeek => ("date('now', 'weekday 1', '-7 days')", None),
                    RelativePeriod::LastWeek => (
                        "date('now', 'weekday 1', '-14 days')",
                        Some("date('now', 'weekday 1', '-7 days')"),
                    ),
                    RelativePeriod::ThisMonth => ("date('now', 'start of month')", None),
                    RelativePeriod::LastMonth => (
                        "date('now', 'start of month', '-1 month')",
                        Some("date('now', 'start of month')"),
                    ),
                    RelativePeriod::ThisYear => ("date('now', 'start of year')", None),
                    RelativePeriod::LastYear => (
                        "date('now', 'start of year', '-1 year')",
                        Some("date('now', 'start of year')"),
                    ),
                };
                match to {
                    Some(to) => format!("{column} >= {from} AND {column} < {to}"),
                    None => format!("{column} >= {from}"),
                }
            }
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateRange::Between { start, end } => {
                // Show the inclusive last day, which is what users typed
                let last = end.pred_opt().unwrap_or(*end);
                if start == &last {
                    write!(f, "{start}")
                } else {
                    write!(f, "{start}..{last}")
                }
            }
            DateRange::MonthOfYear { month } => write!(f, "month {month:02} of any year"),
            DateRange::Relative { period } => write!(f, "{period}"),
            DateRange::LastDays { days } => write!(f, "last {days} days"),
            DateRange::LastMonths { months } => write!(f, "last {months} months"),
        }
    }
}

/// A date-like token and its normalized range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateToken {
    pub text: String,
    pub range: DateRange,
}

/// Structured entities extracted from a single prompt
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EntityBundle {
    pub numbers: Vec<f64>,
    pub dates: Vec<DateToken>,
    pub aggregation: Option<AggregationKind>,
    pub sort_order: Option<SortOrder>,
    pub limit: Option<u32>,
    pub granularity: Option<Granularity>,
}

impl EntityBundle {
    /// First extracted date range, the one templates filter on
    pub fn primary_date_range(&self) -> Option<DateRange> {
        self.dates.first().map(|token| token.range)
    }

    pub fn is_empty(&self) -> bool {
        self == &EntityBundle::default()
    }
}

fn display_optional<T: fmt::Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "none".to_string())
}

impl fmt::Display for EntityBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let numbers = self
            .numbers
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let dates = self
            .dates
            .iter()
            .map(|d| format!("'{}' => {}", d.text, d.range))
            .collect::<Vec<_>>()
            .join(", ");
        write!(
            f,
            "numbers=[{numbers}], dates=[{dates}], aggregation={}, sort_order={}, limit={}, granularity={}",
            display_optional(&self.aggregation),
            display_optional(&self.sort_order),
            display_optional(&self.limit),
            display_optional(&self.granularity),
        )
    }
}

// ============================================================================
// Output identifiers
// ============================================================================

/// Identifier of a SQL template in the pattern library
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TemplateId {
    RevenueByCategory,
    RevenueByRegion,
    RevenueTrend,
    TopProductsRevenue,
    TopProductsRating,
    TopCustomers,
    OrderStatusBreakdown,
    PaymentAnalysis,
    InventoryStatus,
    ProfitAnalysis,
    RefundAnalysis,
    CustomerSegments,
    TopEntitiesByCount,
}

/// Identifier of a transformation template
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TransformKind {
    CleanNulls,
    NormalizePrices,
    AggregateRevenue,
    CustomerRfm,
    Deduplicate,
    EnrichDates,
}

/// Data-quality dimension
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum QualityCategory {
    Completeness,
    Consistency,
    Validity,
    Uniqueness,
    Timeliness,
}

/// Criticality tier of a quality rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(r#"{"kind":"last_days","days":30}"#, DateRange::LastDays { days: 30 })]
    #[case(
        r#"{"kind":"between","start":"2024-03-01","end":"2024-04-01"}"#,
        DateRange::Between { start: date(2024, 3, 1), end: date(2024, 4, 1) }
    )]
    fn test_date_range_tagged_json(#[case] json: &str, #[case] expected: DateRange) {
        let parsed: DateRange = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, expected);
        assert_eq!(serde_json::to_string(&expected).unwrap(), json);
    }

    #[test]
    fn test_month_range_wraps_december() {
        let range = DateRange::month(2024, 12).unwrap();
        assert_eq!(
            range,
            DateRange::Between {
                start: date(2024, 12, 1),
                end: date(2025, 1, 1)
            }
        );
        assert_eq!(range.to_string(), "2024-12-01..2024-12-31");
    }

    #[test]
    fn test_single_day_display() {
        let range = DateRange::day(date(2024, 2, 29)).unwrap();
        assert_eq!(range.to_string(), "2024-02-29");
    }

    #[rstest]
    #[case(DateRange::year(2024).unwrap(), "o.order_date >= '2024-01-01' AND o.order_date < '2025-01-01'")]
    #[case(DateRange::MonthOfYear { month: 3 }, "strftime('%m', o.order_date) = '03'")]
    #[case(DateRange::LastDays { days: 30 }, "o.order_date >= date('now', '-30 days')")]
    #[case(
        DateRange::Relative { period: RelativePeriod::LastMonth },
        "o.order_date >= date('now', 'start of month', '-1 month') AND o.order_date < date('now', 'start of month')"
    )]
    fn test_date_predicates(#[case] range: DateRange, #[case] expected: &str) {
        assert_eq!(range.predicate("o.order_date"), expected);
    }

    #[test]
    fn test_intent_names_round_trip() {
        assert_eq!(IntentCategory::TopProducts.to_string(), "top_products");
        assert_eq!(
            IntentCategory::from_str("top_customers").unwrap(),
            IntentCategory::TopCustomers
        );
        assert_eq!(QualityCategory::from_str("timeliness").unwrap(), QualityCategory::Timeliness);
    }

    #[test]
    fn test_entity_bundle_display() {
        let bundle = EntityBundle {
            numbers: vec![10.0],
            sort_order: Some(SortOrder::Desc),
            limit: Some(10),
            ..Default::default()
        };
        assert_eq!(
            bundle.to_string(),
            "numbers=[10], dates=[], aggregation=none, sort_order=desc, limit=10, granularity=none"
        );
        assert!(!bundle.is_empty());
        assert!(EntityBundle::default().is_empty());
    }

    #[test]
    fn test_quarter_expression_mentions_column() {
        let expr = Granularity::Quarter.period_expression("o.order_date");
        assert!(expr.contains("'-Q'"));
        assert_eq!(expr.matches("o.order_date").count(), 2);
    }
}
