use super::{QualityRule, QualityRuleCategory};
use crate::engine::types::{QualityCategory, Severity};

const fn rule(field: &'static str, description: &'static str, severity: Severity) -> QualityRule {
    QualityRule {
        field,
        description,
        severity,
    }
}

/// Quality rule catalog in declaration order (18 rules over 5 categories)
pub static QUALITY_CATALOG: &[QualityRuleCategory] = &[
    QualityRuleCategory {
        category: QualityCategory::Completeness,
        name: "Completeness Check",
        description: "Verify all required fields are populated",
        keywords: &["complete", "null", "missing", "empty", "required"],
        rules: &[
            rule("order_date", "NOT NULL", Severity::Critical),
            rule("customer_id", "NOT NULL", Severity::Critical),
            rule("total", "NOT NULL AND >= 0", Severity::Critical),
            rule("email", "NOT NULL AND VALID FORMAT", Severity::High),
            rule("region", "NOT NULL", Severity::Medium),
        ],
    },
    QualityRuleCategory {
        category: QualityCategory::Consistency,
        name: "Consistency Check",
        description: "Ensure data values are logically consistent",
        keywords: &["consistent", "match", "correct", "valid calculation", "logic"],
        rules: &[
            rule("total", "total = subtotal - discount + tax (within rounding)", Severity::Critical),
            rule("line_total", "line_total = quantity * unit_price", Severity::Critical),
            rule("price", "price > cost (positive margin)", Severity::High),
            rule("order_date", "order_date >= customer.signup_date", Severity::Medium),
        ],
    },
    QualityRuleCategory {
        category: QualityCategory::Validity,
        name: "Validity Check",
        description: "Ensure values fall within acceptable ranges",
        keywords: &["valid", "range", "boundary", "limit", "constraint", "format"],
        rules: &[
            rule("rating", "1.0 <= rating <= 5.0", Severity::High),
            rule("quantity", "quantity > 0 AND quantity <= 100", Severity::High),
            rule("discount", "discount >= 0 AND discount <= subtotal", Severity::Medium),
            rule("stock", "stock >= 0", Severity::Low),
        ],
    },
    QualityRuleCategory {
        category: QualityCategory::Uniqueness,
        name: "Uniqueness Check",
        description: "Verify unique constraints are maintained",
        keywords: &["unique", "duplicate", "distinct", "primary key"],
        rules: &[
            rule("customer.email", "UNIQUE across all customers", Severity::Critical),
            rule("order.id", "UNIQUE primary key", Severity::Critical),
            rule("product.name", "UNIQUE within category", Severity::Medium),
        ],
    },
    QualityRuleCategory {
        category: QualityCategory::Timeliness,
        name: "Timeliness Check",
        description: "Verify data freshness and temporal validity",
        keywords: &["fresh", "recent", "timely", "date range", "outdated", "stale"],
        rules: &[
            rule("order_date", "Within the expected reporting window", Severity::Medium),
            rule("created_at", "Not in the future", Severity::High),
        ],
    },
];
