//! Role prompt attached to SQL responses

/// Table and column layout the SQL templates are written against
pub const SCHEMA_TABLES: &[(&str, &[&str])] = &[
    ("categories", &["id", "name", "margin"]),
    (
        "products",
        &[
            "id",
            "name",
            "category_id",
            "price",
            "cost",
            "stock",
            "rating",
            "reviews_count",
            "created_at",
        ],
    ),
    (
        "customers",
        &[
            "id",
            "first_name",
            "last_name",
            "email",
            "region",
            "city",
            "signup_date",
            "lifetime_value",
            "order_count",
        ],
    ),
    (
        "orders",
        &[
            "id",
            "customer_id",
            "order_date",
            "status",
            "payment_method",
            "subtotal",
            "discount",
            "tax",
            "total",
            "region",
        ],
    ),
    (
        "order_items",
        &["id", "order_id", "product_id", "quantity", "unit_price", "line_total"],
    ),
];

const AUTHORING_RULES: &[&str] = &[
    "Always use proper JOIN syntax",
    "Use aliases for readability",
    "Add ORDER BY for sorted results",
    "Use LIMIT for top-N queries",
    "Format numbers with ROUND() where appropriate",
];

/// Prompt generator for the SQL analyst role
pub struct PromptGenerator;

impl PromptGenerator {
    /// Generate the system prompt describing the schema and authoring rules
    pub fn system_prompt(database_type: &str) -> String {
        let tables: Vec<String> = SCHEMA_TABLES
            .iter()
            .map(|(table, columns)| format!("- {} ({})", table, columns.join(", ")))
            .collect();
        let rules: Vec<String> = AUTHORING_RULES
            .iter()
            .enumerate()
            .map(|(i, rule)| format!("{}. {}", i + 1, rule))
            .collect();

        format!(
            "You are a senior {} analyst working with an e-commerce database.\n\nTABLES:\n{}\n\nRULES:\n{}\n",
            database_type,
            tables.join("\n"),
            rules.join("\n")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt() {
        let prompt = PromptGenerator::system_prompt("SQLite");
        assert!(prompt.starts_with("You are a senior SQLite analyst"));
        assert!(prompt.contains("- order_items (id, order_id, product_id, quantity, unit_price, line_total)"));
        assert!(prompt.contains("4. Use LIMIT for top-N queries"));
    }

    #[test]
    fn test_every_table_listed() {
        let prompt = PromptGenerator::system_prompt("SQL");
        for (table, _) in SCHEMA_TABLES {
            assert!(prompt.contains(&format!("- {table} (")));
        }
    }
}
