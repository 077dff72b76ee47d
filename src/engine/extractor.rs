//! Entity extraction from raw prompts.

use crate::engine::library::PatternLibrary;
use crate::engine::types::{DateRange, DateToken, EntityBundle, RelativePeriod};
use chrono::NaiveDate;
use regex::{Captures, Regex};
use std::ops::Range;
use std::sync::Arc;
use tracing::debug;

/// Parses a prompt into an [`EntityBundle`]. Extraction never fails; anything
/// unrecognized is simply absent from the bundle.
#[derive(Debug, Clone)]
pub struct EntityExtractor {
    library: Arc<PatternLibrary>,
    max_limit: u32,
}

/// Date token with its byte span in the prompt
struct DateMatch {
    span: Range<usize>,
    token: DateToken,
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name.to_lowercase().as_str() {
        "january" => 1,
        "february" => 2,
        "march" => 3,
        "april" => 4,
        "may" => 5,
        "june" => 6,
        "july" => 7,
        "august" => 8,
        "september" => 9,
        "october" => 10,
        "november" => 11,
        "december" => 12,
        _ => return None,
    };
    Some(month)
}

fn relative_period(text: &str) -> Option<RelativePeriod> {
    let lower = text.to_lowercase();
    let mut words = lower.split_whitespace();
    let first = words.next()?;
    let period = match (first, words.next()) {
        ("today", None) => RelativePeriod::Today,
        ("yesterday", None) => RelativePeriod::Yesterday,
        ("this", Some("week")) => RelativePeriod::ThisWeek,
        ("this", Some("month")) => RelativePeriod::ThisMonth,
        ("this", Some("year")) => RelativePeriod::ThisYear,
        ("last" | "past", Some("week")) => RelativePeriod::LastWeek,
        ("last" | "past", Some("month")) => RelativePeriod::LastMonth,
        ("last" | "past", Some("year")) => RelativePeriod::LastYear,
        _ => return None,
    };
    Some(period)
}

/// Earliest match among tagged patterns
fn earliest<T: Copy>(patterns: &[(Regex, T)], prompt: &str) -> Option<T> {
    patterns
        .iter()
        .filter_map(|(regex, tag)| regex.find(prompt).map(|m| (m.start(), *tag)))
        .min_by_key(|(start, _)| *start)
        .map(|(_, tag)| tag)
}

impl EntityExtractor {
    pub fn new(library: Arc<PatternLibrary>, max_limit: u32) -> Self {
        Self {
            library,
            max_limit: max_limit.max(1),
        }
    }

    /// Extract every entity kind from `prompt`
    pub fn extract(&self, prompt: &str) -> EntityBundle {
        let patterns = &self.library.entities;

        let dates = self.extract_dates(prompt);
        let numbers: Vec<f64> = patterns
            .number
            .find_iter(prompt)
            .filter(|m| !dates.iter().any(|d| overlaps(&d.span, &m.range())))
            .filter_map(|m| m.as_str().replace(',', "").parse::<f64>().ok())
            .collect();

        let limit = if patterns.ranking_verb.is_match(prompt) {
            numbers.first().and_then(|n| self.limit_from(*n))
        } else {
            None
        };

        let bundle = EntityBundle {
            numbers,
            dates: dates.into_iter().map(|d| d.token).collect(),
            aggregation: earliest(&patterns.aggregations, prompt),
            sort_order: earliest(&patterns.sort_cues, prompt),
            limit,
            granularity: earliest(&patterns.granularities, prompt),
        };

        debug!("Extracted entities: {}", bundle);
        bundle
    }

    /// Whole, positive numbers become a limit clamped to `[1, max_limit]`
    fn limit_from(&self, value: f64) -> Option<u32> {
        if value.fract() != 0.0 || value < 0.0 {
            return None;
        }
        let clamped = value.clamp(1.0, f64::from(self.max_limit));
        Some(clamped as u32)
    }

    /// Whether a ranking verb ends right before `start`, separated only by whitespace
    fn follows_ranking_verb(&self, prompt: &str, start: usize) -> bool {
        let before = prompt[..start].trim_end();
        before.len() < start
            && self
                .library
                .entities
                .ranking_verb
                .find_iter(before)
                .any(|m| m.end() == before.len())
    }

    /// Collect date tokens in prompt order. More specific forms claim their span
    /// first so that "March 2024" is one token rather than a month and a year.
    fn extract_dates(&self, prompt: &str) -> Vec<DateMatch> {
        let patterns = &self.library.entities;
        let mut found: Vec<DateMatch> = Vec::new();

        let mut push = |caps: &Captures, range: Option<DateRange>| {
            let Some(whole) = caps.get(0) else { return };
            let Some(range) = range else { return };
            let span = whole.range();
            if found.iter().any(|d| overlaps(&d.span, &span)) {
                return;
            }
            found.push(DateMatch {
                span,
                token: DateToken {
                    text: whole.as_str().to_string(),
                    range,
                },
            });
        };

        for caps in patterns.iso_date.captures_iter(prompt) {
            let range = NaiveDate::parse_from_str(&caps[0], "%Y-%m-%d")
                .ok()
                .and_then(DateRange::day);
            push(&caps, range);
        }

        for caps in patterns.last_n_days.captures_iter(prompt) {
            let count: Option<u32> = caps[1].parse().ok().filter(|n| *n > 0);
            let unit = caps[2].to_lowercase();
            let range = count.and_then(|n| {
                if unit.starts_with("day") {
                    Some(DateRange::LastDays { days: n })
                } else if unit.starts_with("week") {
                    n.checked_mul(7).map(|days| DateRange::LastDays { days })
                } else {
                    Some(DateRange::LastMonths { months: n })
                }
            });
            push(&caps, range);
        }

        for caps in patterns.relative_period.captures_iter(prompt) {
            let range = relative_period(&caps[1]).map(|period| DateRange::Relative { period });
            push(&caps, range);
        }

        for caps in patterns.month_name.captures_iter(prompt) {
            let Some(month) = month_number(&caps[1]) else {
                continue;
            };
            let year = caps.get(2).and_then(|y| y.as_str().parse::<i32>().ok());
            let range = match year {
                Some(year) => DateRange::month(year, month),
                // "may" alone is far more often the verb than the month
                None if month == 5 => None,
                None => Some(DateRange::MonthOfYear { month }),
            };
            push(&caps, range);
        }

        for caps in patterns.year.captures_iter(prompt) {
            // "top 2000 products" asks for a count, not a year
            if caps.get(0).is_some_and(|m| self.follows_ranking_verb(prompt, m.start())) {
                continue;
            }
            let range = caps[1].parse::<i32>().ok().and_then(DateRange::year);
            push(&caps, range);
        }

        found.sort_by_key(|d| d.span.start);
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{AggregationKind, Granularity, SortOrder};
    use rstest::rstest;

    fn extractor() -> EntityExtractor {
        EntityExtractor::new(Arc::new(PatternLibrary::builtin().unwrap()), 1000)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_top_products_prompt() {
        let bundle = extractor().extract("Show top 10 products by revenue");
        assert_eq!(bundle.numbers, vec![10.0]);
        assert_eq!(bundle.limit, Some(10));
        assert_eq!(bundle.aggregation, None);
        assert_eq!(bundle.sort_order, Some(SortOrder::Desc));
        assert!(bundle.dates.is_empty());
    }

    #[rstest]
    #[case("show 5 orders", None)]
    #[case("top 5 customers", Some(5))]
    #[case("worst 3 products", Some(3))]
    #[case("top 0 products", Some(1))]
    #[case("top 50000 products", Some(1000))]
    #[case("top 2.5 products", None)]
    #[case("best products", None)]
    #[case("top 1,000 customers", Some(1000))]
    #[case("top 2000 products by revenue", Some(1000))]
    #[case("bottom 1999 products", Some(1000))]
    fn test_limit_requires_ranking_verb(#[case] prompt: &str, #[case] expected: Option<u32>) {
        assert_eq!(extractor().extract(prompt).limit, expected);
    }

    #[rstest]
    #[case("lowest rated products with the most reviews", SortOrder::Asc)]
    #[case("most reviews among the lowest rated", SortOrder::Desc)]
    #[case("sort descending", SortOrder::Desc)]
    fn test_earliest_sort_cue_wins(#[case] prompt: &str, #[case] expected: SortOrder) {
        assert_eq!(extractor().extract(prompt).sort_order, Some(expected));
    }

    #[rstest]
    #[case("average order value by region", Some(AggregationKind::Avg))]
    #[case("how many orders, total and average", Some(AggregationKind::Count))]
    #[case("sum of refunds", Some(AggregationKind::Sum))]
    #[case("list products", None)]
    fn test_aggregation(#[case] prompt: &str, #[case] expected: Option<AggregationKind>) {
        assert_eq!(extractor().extract(prompt).aggregation, expected);
    }

    #[rstest]
    #[case("weekly revenue", Some(Granularity::Week))]
    #[case("revenue by quarter", Some(Granularity::Quarter))]
    #[case("annual sales", Some(Granularity::Year))]
    #[case("revenue trend", None)]
    fn test_granularity(#[case] prompt: &str, #[case] expected: Option<Granularity>) {
        assert_eq!(extractor().extract(prompt).granularity, expected);
    }

    #[test]
    fn test_dates_in_prompt_order() {
        let bundle = extractor().extract("orders between 2024-01-15 and March 2024 or last 30 days");
        let ranges: Vec<DateRange> = bundle.dates.iter().map(|d| d.range).collect();
        assert_eq!(
            ranges,
            vec![
                DateRange::day(date(2024, 1, 15)).unwrap(),
                DateRange::month(2024, 3).unwrap(),
                DateRange::LastDays { days: 30 },
            ]
        );
        assert_eq!(bundle.dates[1].text, "March 2024");
        // numbers inside date tokens are not free-standing numbers
        assert!(bundle.numbers.is_empty());
    }

    #[rstest]
    #[case("sales today", DateRange::Relative { period: RelativePeriod::Today })]
    #[case("refunds last month", DateRange::Relative { period: RelativePeriod::LastMonth })]
    #[case("orders past year", DateRange::Relative { period: RelativePeriod::LastYear })]
    #[case("revenue in 2023", DateRange::year(2023).unwrap())]
    #[case("revenue in december", DateRange::MonthOfYear { month: 12 })]
    #[case("last 2 weeks", DateRange::LastDays { days: 14 })]
    #[case("past 6 months", DateRange::LastMonths { months: 6 })]
    fn test_single_date(#[case] prompt: &str, #[case] expected: DateRange) {
        let bundle = extractor().extract(prompt);
        assert_eq!(bundle.primary_date_range(), Some(expected));
    }

    #[rstest]
    #[case("top 1,000 customers", vec![1000.0])]
    #[case("top 12,500 products and 3 regions", vec![12500.0, 3.0])]
    #[case("items 1,2 and 3", vec![1.0, 2.0, 3.0])]
    #[case("price 1,234.50", vec![1234.5])]
    fn test_thousands_separator(#[case] prompt: &str, #[case] expected: Vec<f64>) {
        assert_eq!(extractor().extract(prompt).numbers, expected);
    }

    #[rstest]
    #[case("top 2000 products by revenue")]
    #[case("best   2024 customers")]
    fn test_count_after_ranking_verb_is_not_a_year(#[case] prompt: &str) {
        let bundle = extractor().extract(prompt);
        assert!(bundle.dates.is_empty());
        assert_eq!(bundle.limit, Some(1000));
    }

    #[test]
    fn test_year_elsewhere_still_a_date() {
        let bundle = extractor().extract("top 5 products in 2024");
        assert_eq!(bundle.primary_date_range(), DateRange::year(2024));
        assert_eq!(bundle.limit, Some(5));
    }

    #[test]
    fn test_may_without_year_is_not_a_date() {
        let bundle = extractor().extract("may I see the top customers");
        assert!(bundle.dates.is_empty());
        let bundle = extractor().extract("revenue for May 2024");
        assert_eq!(bundle.primary_date_range(), DateRange::month(2024, 5));
    }

    #[test]
    fn test_invalid_iso_date_ignored() {
        let bundle = extractor().extract("orders on 2024-02-30");
        assert!(bundle.dates.iter().all(|d| d.text != "2024-02-30"));
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let extractor = extractor();
        let prompt = "top 7 products by total revenue last 90 days";
        assert_eq!(extractor.extract(prompt), extractor.extract(prompt));
    }

    #[test]
    fn test_empty_bundle() {
        assert!(extractor().extract("hello there").is_empty());
    }
}
