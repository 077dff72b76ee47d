//! Read-only validation for generated SQL.
//!
//! Generated queries cross a trust boundary before they are executed, so the executor
//! re-checks them here even though every template is already a single SELECT.

use crate::engine::error::{EngineError, EngineResult};
use regex::Regex;
use std::sync::LazyLock;

static STRING_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'(?:[^']|'')*'").expect("Invalid regex"));
static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"--[^\n]*").expect("Invalid regex"));
static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("Invalid regex"));
static LEADING_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(SELECT|WITH)\b").expect("Invalid regex"));
static MUTATING_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(INSERT|UPDATE|DELETE|DROP|ALTER|CREATE|TRUNCATE|REPLACE|ATTACH|DETACH|PRAGMA|VACUUM|GRANT|REVOKE)\b",
    )
    .expect("Invalid regex")
});

/// Remove literals and comments so keyword checks only see executable text
fn strip_inert_text(sql: &str) -> String {
    let without_literals = STRING_LITERAL.replace_all(sql, "''");
    let without_blocks = BLOCK_COMMENT.replace_all(&without_literals, " ");
    LINE_COMMENT.replace_all(&without_blocks, " ").into_owned()
}

/// Accept only a single read-only statement.
///
/// Rejects empty text, statements that do not start with `SELECT`/`WITH`, a `;` followed
/// by anything but whitespace, and any mutating keyword outside string literals.
pub fn ensure_read_only(sql: &str) -> EngineResult<()> {
    let code = strip_inert_text(sql);
    let trimmed = code.trim();

    if trimmed.is_empty() {
        return Err(EngineError::UnsafeSql("empty SQL query".to_string()));
    }

    if !LEADING_KEYWORD.is_match(trimmed) {
        return Err(EngineError::UnsafeSql(
            "only SELECT statements are allowed".to_string(),
        ));
    }

    let body = trimmed.strip_suffix(';').unwrap_or(trimmed);
    if body.contains(';') {
        return Err(EngineError::UnsafeSql(
            "multiple statements are not allowed".to_string(),
        ));
    }

    if let Some(found) = MUTATING_KEYWORD.find(body) {
        return Err(EngineError::UnsafeSql(format!(
            "{} is not allowed in a read-only query",
            found.as_str().to_uppercase()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("SELECT * FROM orders")]
    #[case("select id from orders;")]
    #[case("WITH t AS (SELECT 1 AS x) SELECT x FROM t")]
    #[case("SELECT 'DROP TABLE orders' AS harmless")]
    #[case("SELECT status FROM orders WHERE status != 'Cancelled' -- ; DELETE")]
    fn test_accepts_read_only(#[case] sql: &str) {
        assert!(ensure_read_only(sql).is_ok(), "expected {sql:?} to pass");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("DROP TABLE orders")]
    #[case("DELETE FROM orders")]
    #[case("SELECT 1; DROP TABLE orders")]
    #[case("SELECT 1; SELECT 2")]
    #[case("WITH x AS (DELETE FROM orders RETURNING id) SELECT * FROM x")]
    #[case("UPDATE orders SET total = 0")]
    #[case("PRAGMA table_info(orders)")]
    fn test_rejects_unsafe(#[case] sql: &str) {
        let err = ensure_read_only(sql).unwrap_err();
        assert!(matches!(err, EngineError::UnsafeSql(_)));
    }

    #[test]
    fn test_error_names_keyword() {
        let err = ensure_read_only("SELECT * FROM t WHERE id IN (SELECT 1) OR drop").unwrap_err();
        assert!(err.to_string().contains("DROP"));
    }
}
