//! Few-shot example matching for SQL traces.

use crate::engine::library::PatternLibrary;
use crate::engine::patterns::FewShotExample;
use crate::engine::types::IntentCategory;
use std::collections::HashSet;
use std::sync::Arc;

fn words(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Picks the curated example closest to a request
#[derive(Debug, Clone)]
pub struct FewShotMatcher {
    library: Arc<PatternLibrary>,
}

impl FewShotMatcher {
    pub fn new(library: Arc<PatternLibrary>) -> Self {
        Self { library }
    }

    /// Examples tagged with `intent` win; word overlap with the prompt breaks ties,
    /// then declaration order. Returns `None` only for an empty example table.
    pub fn find(
        &self,
        prompt: &str,
        intent: Option<IntentCategory>,
    ) -> Option<&'static FewShotExample> {
        let request = words(prompt);
        let mut best: Option<(&'static FewShotExample, (bool, usize))> = None;

        for example in self.library.few_shots {
            let tagged = intent.is_some_and(|i| example.tags.contains(&i));
            let overlap = words(example.prompt).intersection(&request).count();
            let score = (tagged, overlap);
            if best.is_none_or(|(_, current)| score > current) {
                best = Some((example, score));
            }
        }

        best.map(|(example, _)| example)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn matcher() -> FewShotMatcher {
        FewShotMatcher::new(Arc::new(PatternLibrary::builtin().unwrap()))
    }

    #[rstest]
    #[case("revenue per category", Some(IntentCategory::Category), "show total revenue by category")]
    #[case("best customers", Some(IntentCategory::TopCustomers), "find top 5 customers by spending")]
    #[case("ratings", Some(IntentCategory::Rating), "what are the best rated products")]
    #[case("sales by region", Some(IntentCategory::Region), "show revenue by region")]
    fn test_tag_match_wins(
        #[case] prompt: &str,
        #[case] intent: Option<IntentCategory>,
        #[case] expected: &str,
    ) {
        assert_eq!(matcher().find(prompt, intent).unwrap().prompt, expected);
    }

    #[test]
    fn test_overlap_breaks_tag_ties() {
        // revenue is tagged on four examples; the monthly one shares the most words
        let example = matcher()
            .find("show monthly revenue trend please", Some(IntentCategory::Revenue))
            .unwrap();
        assert_eq!(example.prompt, "show monthly revenue trend");
    }

    #[test]
    fn test_without_intent_uses_overlap() {
        let example = matcher().find("show revenue by region", None).unwrap();
        assert_eq!(example.prompt, "show revenue by region");
    }

    #[test]
    fn test_no_signal_picks_first_declared() {
        let example = matcher().find("zzz", None).unwrap();
        assert_eq!(example.prompt, "show total revenue by category");
    }
}
