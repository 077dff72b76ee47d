//! Weighted pattern scoring of prompts against intent groups.

use crate::engine::library::PatternLibrary;
use crate::engine::types::{IntentCategory, IntentScore};
use serde::Serialize;
use std::cmp::Reverse;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Ranked intent candidates, best first. Only intents with a positive score appear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IntentRanking {
    candidates: Vec<IntentScore>,
}

impl IntentRanking {
    pub fn new(candidates: Vec<IntentScore>) -> Self {
        Self { candidates }
    }

    /// Highest ranked intent, if anything matched
    pub fn top(&self) -> Option<IntentCategory> {
        self.candidates.first().map(|c| c.intent)
    }

    pub fn contains(&self, intent: IntentCategory) -> bool {
        self.candidates.iter().any(|c| c.intent == intent)
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn as_slice(&self) -> &[IntentScore] {
        &self.candidates
    }

    pub fn iter(&self) -> impl Iterator<Item = &IntentScore> {
        self.candidates.iter()
    }
}

impl fmt::Display for IntentRanking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.candidates.is_empty() {
            return write!(f, "no intent matched");
        }
        let parts: Vec<String> = self
            .candidates
            .iter()
            .map(|c| format!("{}={}", c.intent, c.score))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Scores prompts against the library's intent pattern groups
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    library: Arc<PatternLibrary>,
}

impl IntentClassifier {
    pub fn new(library: Arc<PatternLibrary>) -> Self {
        Self { library }
    }

    /// Rank intents by the summed weight of their matching patterns.
    ///
    /// Equal scores are ordered by priority (higher first), then by declaration order.
    pub fn classify(&self, prompt: &str) -> IntentRanking {
        let mut scored: Vec<(usize, u32, IntentScore)> = self
            .library
            .intents
            .iter()
            .enumerate()
            .filter_map(|(index, intent)| {
                let score: u32 = intent
                    .patterns
                    .iter()
                    .filter(|(regex, _)| regex.is_match(prompt))
                    .map(|(_, weight)| *weight)
                    .sum();
                (score > 0).then_some((
                    index,
                    intent.priority,
                    IntentScore {
                        intent: intent.category,
                        score,
                    },
                ))
            })
            .collect();

        scored.sort_by_key(|(index, priority, candidate)| {
            (Reverse(candidate.score), Reverse(*priority), *index)
        });

        let ranking = IntentRanking::new(scored.into_iter().map(|(_, _, c)| c).collect());
        debug!("Intent classification: {}", ranking);
        ranking
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use crate::engine::types::IntentCategory::*;

    fn classifier() -> IntentClassifier {
        IntentClassifier::new(Arc::new(PatternLibrary::builtin().unwrap()))
    }

    #[rstest]
    #[case("Show top 10 products by revenue", TopProducts)]
    #[case("show total revenue by category", Category)]
    #[case("what are the best rated products", Rating)]
    #[case("find top 5 customers by spending", TopCustomers)]
    #[case("top 1,000 customers", TopCustomers)]
    #[case("show monthly revenue trend", Trend)]
    #[case("which products are out of stock", Inventory)]
    #[case("revenue by payment method", Payment)]
    #[case("how many orders were refunded", Refund)]
    #[case("profit margin per product", Profit)]
    #[case("discounted orders", Discount)]
    fn test_top_intent(#[case] prompt: &str, #[case] expected: IntentCategory) {
        assert_eq!(classifier().classify(prompt).top(), Some(expected));
    }

    #[test]
    fn test_scores_sum_pattern_weights() {
        let ranking = classifier().classify("Show top 10 products by revenue");
        assert_eq!(
            ranking.as_slice(),
            &[
                IntentScore {
                    intent: TopProducts,
                    score: 3
                },
                IntentScore {
                    intent: Product,
                    score: 1
                },
                IntentScore {
                    intent: Revenue,
                    score: 1
                },
            ]
        );
        assert_eq!(ranking.to_string(), "top_products=3, product=1, revenue=1");
    }

    #[test]
    fn test_tie_broken_by_priority() {
        let ranking = classifier().classify("revenue by region");
        assert_eq!(ranking.top(), Some(Region));
        assert!(ranking.contains(Revenue));
    }

    #[test]
    fn test_no_match_is_empty() {
        let ranking = classifier().classify("hello world");
        assert!(ranking.is_empty());
        assert_eq!(ranking.top(), None);
        assert_eq!(ranking.to_string(), "no intent matched");
    }

    #[test]
    fn test_classification_is_deterministic() {
        let classifier = classifier();
        let prompt = "top customers by revenue in each region";
        assert_eq!(classifier.classify(prompt), classifier.classify(prompt));
    }
}
