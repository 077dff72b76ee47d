//! Template and rule selection for the three output modes.

use crate::engine::classifier::IntentRanking;
use crate::engine::config::{EngineConfig, QualityFallback};
use crate::engine::library::PatternLibrary;
use crate::engine::patterns::{
    QualityRuleCategory, Slot, SqlTemplate, TemplateRule, TransformTemplate,
};
use crate::engine::types::{
    DateRange, EntityBundle, Granularity, QualityCategory, SortOrder, TransformKind,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Resolved values for the slots a template declares. A field is `None` when the
/// template has no such slot, except `date_range`, which is also `None` when the
/// slot defaults to "no filter".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SqlParameters {
    pub limit: Option<u32>,
    pub direction: Option<SortOrder>,
    pub date_range: Option<DateRange>,
    pub granularity: Option<Granularity>,
    /// Slots filled from fixed defaults rather than from the prompt
    pub defaulted: Vec<Slot>,
}

/// Chosen SQL template and its bound parameters
#[derive(Debug, Clone)]
pub struct SqlSelection {
    pub template: &'static SqlTemplate,
    /// Rule that picked the template; `None` when the fallback was used
    pub rule: Option<&'static TemplateRule>,
    pub parameters: SqlParameters,
}

impl SqlSelection {
    pub fn fallback_used(&self) -> bool {
        self.rule.is_none()
    }
}

/// Keyword hits for one transform template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransformMatch {
    pub kind: TransformKind,
    pub hits: usize,
}

#[derive(Debug, Clone)]
pub struct TransformSelection {
    pub template: &'static TransformTemplate,
    /// Templates with at least one hit, best first
    pub matches: Vec<TransformMatch>,
}

impl TransformSelection {
    pub fn fallback_used(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Keyword hits for one quality category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QualityMatch {
    pub category: QualityCategory,
    pub hits: usize,
}

#[derive(Debug, Clone)]
pub struct QualitySelection {
    /// Selected categories in declaration order
    pub categories: Vec<&'static QualityRuleCategory>,
    /// Categories with at least one hit, in declaration order
    pub matches: Vec<QualityMatch>,
    /// Policy applied when nothing matched
    pub fallback: Option<QualityFallback>,
}

/// What the selector picked, for the trace builder
#[derive(Debug, Clone, Copy)]
pub enum Selection<'a> {
    Sql(&'a SqlSelection),
    Transform(&'a TransformSelection),
    Quality(&'a QualitySelection),
}

/// Number of keywords that occur in the lowercased prompt
fn keyword_hits(keywords: &[&str], prompt: &str) -> usize {
    keywords.iter().filter(|k| prompt.contains(*k)).count()
}

/// Maps classification and entities to concrete templates and rules
#[derive(Debug, Clone)]
pub struct TemplateSelector {
    library: Arc<PatternLibrary>,
    default_limit: u32,
    max_limit: u32,
    quality_fallback: QualityFallback,
}

impl TemplateSelector {
    pub fn new(library: Arc<PatternLibrary>, config: &EngineConfig) -> Self {
        Self {
            library,
            default_limit: config.default_limit,
            max_limit: config.max_limit,
            quality_fallback: config.quality_fallback,
        }
    }

    /// Pick a SQL template for the top intent and resolve its slots
    pub fn select_sql(&self, intents: &IntentRanking, entities: &EntityBundle) -> SqlSelection {
        let rule = intents.top().and_then(|top| {
            self.library.template_rules.iter().find(|rule| {
                rule.intent == top && rule.companion.is_none_or(|c| intents.contains(c))
            })
        });

        let template = match rule.and_then(|r| self.library.template(r.template)) {
            Some(template) => template,
            None => {
                info!(
                    "No template rule for top intent {:?}, using fallback '{}'",
                    intents.top().map(|i| i.to_string()),
                    self.library.fallback().id
                );
                self.library.fallback()
            }
        };

        let parameters = self.resolve_parameters(template, entities);
        debug!(
            "Selected SQL template '{}' (defaults: {:?})",
            template.id, parameters.defaulted
        );

        SqlSelection {
            template,
            rule: rule.filter(|r| r.template == template.id),
            parameters,
        }
    }

    fn resolve_parameters(&self, template: &SqlTemplate, entities: &EntityBundle) -> SqlParameters {
        let mut defaulted = Vec::new();
        let mut declared = |slot: Slot, from_prompt: bool| {
            let declared = template.has_slot(slot);
            if declared && !from_prompt {
                defaulted.push(slot);
            }
            declared
        };

        let limit = declared(Slot::Limit, entities.limit.is_some()).then(|| {
            entities
                .limit
                .unwrap_or(self.default_limit)
                .clamp(1, self.max_limit)
        });
        let direction = declared(Slot::SortDirection, entities.sort_order.is_some())
            .then(|| entities.sort_order.unwrap_or(template.default_sort));
        let date_range = if declared(Slot::DateRange, !entities.dates.is_empty()) {
            entities.primary_date_range()
        } else {
            None
        };
        let granularity = declared(Slot::Granularity, entities.granularity.is_some())
            .then(|| entities.granularity.unwrap_or(Granularity::Month));

        SqlParameters {
            limit,
            direction,
            date_range,
            granularity,
            defaulted,
        }
    }

    /// Pick the transform template with the most keyword hits
    pub fn select_transform(&self, prompt: &str) -> TransformSelection {
        let lower = prompt.to_lowercase();
        let mut matches: Vec<TransformMatch> = self
            .library
            .transforms
            .iter()
            .map(|t| TransformMatch {
                kind: t.kind,
                hits: keyword_hits(t.keywords, &lower),
            })
            .filter(|m| m.hits > 0)
            .collect();
        // stable sort keeps declaration order among equal hit counts
        matches.sort_by(|a, b| b.hits.cmp(&a.hits));

        let template = matches
            .first()
            .and_then(|best| self.library.transforms.iter().find(|t| t.kind == best.kind))
            .unwrap_or(&self.library.transforms[0]);

        if matches.is_empty() {
            info!("No transform keyword matched, using '{}'", template.kind);
        } else {
            debug!("Selected transform '{}' from {:?}", template.kind, matches);
        }

        TransformSelection { template, matches }
    }

    /// Select every quality category with at least one keyword hit
    pub fn select_quality(&self, prompt: &str) -> QualitySelection {
        let lower = prompt.to_lowercase();
        let matches: Vec<QualityMatch> = self
            .library
            .quality
            .iter()
            .map(|c| QualityMatch {
                category: c.category,
                hits: keyword_hits(c.keywords, &lower),
            })
            .filter(|m| m.hits > 0)
            .collect();

        if !matches.is_empty() {
            let categories = self
                .library
                .quality
                .iter()
                .filter(|c| matches.iter().any(|m| m.category == c.category))
                .collect();
            debug!("Selected quality categories {:?}", matches);
            return QualitySelection {
                categories,
                matches,
                fallback: None,
            };
        }

        let categories = match self.quality_fallback {
            QualityFallback::FullCatalog => self.library.quality.iter().collect(),
            QualityFallback::Empty => Vec::new(),
            QualityFallback::Category(category) => self
                .library
                .quality
                .iter()
                .filter(|c| c.category == category)
                .collect(),
        };
        info!(
            "No quality keyword matched, applying fallback {:?}",
            self.quality_fallback
        );

        QualitySelection {
            categories,
            matches,
            fallback: Some(self.quality_fallback),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::classifier::IntentClassifier;
    use crate::engine::extractor::EntityExtractor;
    use crate::engine::types::TemplateId;
    use rstest::rstest;

    struct Fixture {
        classifier: IntentClassifier,
        extractor: EntityExtractor,
        selector: TemplateSelector,
    }

    impl Fixture {
        fn with_config(config: EngineConfig) -> Self {
            let library = Arc::new(PatternLibrary::builtin().unwrap());
            Self {
                classifier: IntentClassifier::new(library.clone()),
                extractor: EntityExtractor::new(library.clone(), config.max_limit),
                selector: TemplateSelector::new(library, &config),
            }
        }

        fn new() -> Self {
            Self::with_config(EngineConfig::default())
        }

        fn sql(&self, prompt: &str) -> SqlSelection {
            let intents = self.classifier.classify(prompt);
            let entities = self.extractor.extract(prompt);
            self.selector.select_sql(&intents, &entities)
        }
    }

    #[rstest]
    #[case("Show top 10 products by revenue", TemplateId::TopProductsRevenue)]
    #[case("show total revenue by category", TemplateId::RevenueByCategory)]
    #[case("show revenue by region", TemplateId::RevenueByRegion)]
    #[case("show monthly revenue trend", TemplateId::RevenueTrend)]
    #[case("what are the best rated products", TemplateId::TopProductsRating)]
    #[case("find top 5 customers by spending", TemplateId::TopCustomers)]
    #[case("customer revenue", TemplateId::TopCustomers)]
    #[case("customer segments", TemplateId::CustomerSegments)]
    #[case("products that are low stock", TemplateId::InventoryStatus)]
    #[case("order payment methods", TemplateId::PaymentAnalysis)]
    #[case("refunds per month", TemplateId::RefundAnalysis)]
    #[case("product profit margins", TemplateId::ProfitAnalysis)]
    #[case("order status breakdown", TemplateId::OrderStatusBreakdown)]
    fn test_sql_template_selection(#[case] prompt: &str, #[case] expected: TemplateId) {
        let selection = Fixture::new().sql(prompt);
        assert_eq!(selection.template.id, expected);
        assert!(!selection.fallback_used());
    }

    #[rstest]
    #[case("hello world")]
    #[case("discount coupons")]
    fn test_sql_fallback(#[case] prompt: &str) {
        let selection = Fixture::new().sql(prompt);
        assert_eq!(selection.template.id, TemplateId::TopEntitiesByCount);
        assert!(selection.fallback_used());
    }

    #[test]
    fn test_defaults_recorded() {
        let selection = Fixture::new().sql("popular products");
        assert_eq!(selection.template.id, TemplateId::TopProductsRevenue);
        assert_eq!(selection.parameters.limit, Some(10));
        assert_eq!(selection.parameters.direction, Some(SortOrder::Desc));
        assert_eq!(selection.parameters.date_range, None);
        assert_eq!(
            selection.parameters.defaulted,
            vec![Slot::Limit, Slot::SortDirection, Slot::DateRange]
        );
    }

    #[test]
    fn test_configured_default_limit() {
        let fixture = Fixture::with_config(EngineConfig {
            default_limit: 25,
            ..Default::default()
        });
        let selection = fixture.sql("product revenue");
        assert_eq!(selection.parameters.limit, Some(25));
    }

    #[test]
    fn test_entities_override_defaults() {
        let selection = Fixture::new().sql("bottom 3 products by revenue in 2024");
        let params = &selection.parameters;
        assert_eq!(params.limit, Some(3));
        assert_eq!(params.direction, Some(SortOrder::Asc));
        assert_eq!(params.date_range, DateRange::year(2024));
        assert!(params.defaulted.is_empty());
    }

    #[test]
    fn test_granularity_defaults_to_month() {
        let selection = Fixture::new().sql("revenue trend");
        assert_eq!(selection.template.id, TemplateId::RevenueTrend);
        assert_eq!(selection.parameters.granularity, Some(Granularity::Month));
        assert_eq!(selection.parameters.limit, None);
        assert!(selection.parameters.defaulted.contains(&Slot::Granularity));
    }

    #[rstest]
    #[case("RFM customer segmentation", TransformKind::CustomerRfm)]
    #[case("remove duplicate rows", TransformKind::Deduplicate)]
    #[case("normalize price outliers", TransformKind::NormalizePrices)]
    #[case("extract day of week and quarter features", TransformKind::EnrichDates)]
    #[case("summarize total revenue", TransformKind::AggregateRevenue)]
    #[case("do something useful", TransformKind::CleanNulls)]
    fn test_transform_selection(#[case] prompt: &str, #[case] expected: TransformKind) {
        let selection = Fixture::new().selector.select_transform(prompt);
        assert_eq!(selection.template.kind, expected);
    }

    #[test]
    fn test_transform_zero_hits_falls_back() {
        let selection = Fixture::new().selector.select_transform("xyz");
        assert!(selection.fallback_used());
        assert_eq!(selection.template.kind, TransformKind::CleanNulls);
    }

    #[test]
    fn test_quality_multi_select_in_declaration_order() {
        let selection = Fixture::new()
            .selector
            .select_quality("Check for duplicates and missing values");
        let categories: Vec<QualityCategory> =
            selection.categories.iter().map(|c| c.category).collect();
        assert_eq!(
            categories,
            vec![QualityCategory::Completeness, QualityCategory::Uniqueness]
        );
        assert_eq!(selection.fallback, None);
    }

    #[rstest]
    #[case(QualityFallback::FullCatalog, 5)]
    #[case(QualityFallback::Empty, 0)]
    #[case(QualityFallback::Category(QualityCategory::Validity), 1)]
    fn test_quality_fallback_policy(#[case] policy: QualityFallback, #[case] expected: usize) {
        let fixture = Fixture::with_config(EngineConfig {
            quality_fallback: policy,
            ..Default::default()
        });
        let selection = fixture.selector.select_quality("check the data");
        assert_eq!(selection.categories.len(), expected);
        assert_eq!(selection.fallback, Some(policy));
        assert!(selection.matches.is_empty());
    }
}
