use nu_ansi_term::{Color, Style};
use regex::Regex;
use std::sync::LazyLock;

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<comment>--[^\n]*)|(?P<string>'(?:[^']|'')*')|(?P<number>\b\d+(?:\.\d+)?\b)|(?P<word>\b\w+\b)")
        .expect("Invalid regex")
});

const SQL_KEYWORDS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "GROUP", "BY", "ORDER", "HAVING", "JOIN", "LEFT", "RIGHT",
    "INNER", "OUTER", "CROSS", "UNION", "LIMIT", "OFFSET", "ASC", "DESC", "DISTINCT", "ALL",
    "IN", "BETWEEN", "LIKE", "IS", "NULL", "AND", "OR", "NOT", "AS", "WITH", "ON", "USING",
    "CASE", "WHEN", "THEN", "ELSE", "END",
];

const SQL_TYPES: &[&str] = &["INT", "INTEGER", "REAL", "NUMERIC", "TEXT", "DATE", "BOOLEAN"];

const SQL_FUNCTIONS: &[&str] = &[
    "COUNT", "SUM", "AVG", "MIN", "MAX", "ROUND", "CAST", "COALESCE", "NULLIF", "STRFTIME",
    "DATE", "JULIANDAY", "UPPER", "LOWER", "LENGTH", "ABS",
];

/// Styled segments of a SQL text
pub type StyledSegments = Vec<(Style, String)>;

/// Terminal syntax highlighting for generated SQL
pub struct SqlHighlighter {
    keyword_style: Style,
    type_style: Style,
    function_style: Style,
    string_style: Style,
    number_style: Style,
    comment_style: Style,
}

impl Default for SqlHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlHighlighter {
    pub fn new() -> Self {
        SqlHighlighter {
            keyword_style: Style::new().fg(Color::Blue).bold(),
            type_style: Style::new().fg(Color::Green).bold(),
            function_style: Style::new().fg(Color::Purple).bold(),
            string_style: Style::new().fg(Color::Red),
            number_style: Style::new().fg(Color::Yellow),
            comment_style: Style::new().fg(Color::DarkGray).italic(),
        }
    }

    fn word_style(&self, word: &str, next: Option<char>) -> Style {
        let upper = word.to_uppercase();
        let upper = upper.as_str();
        // DATE is both a type and a function; a following paren decides
        if next == Some('(') && SQL_FUNCTIONS.contains(&upper) {
            self.function_style
        } else if SQL_KEYWORDS.contains(&upper) {
            self.keyword_style
        } else if SQL_TYPES.contains(&upper) {
            self.type_style
        } else {
            Style::new()
        }
    }

    /// Split `sql` into styled segments that concatenate back to the input
    pub fn highlight(&self, sql: &str) -> StyledSegments {
        let mut segments: StyledSegments = Vec::new();
        let mut last_end = 0;

        for caps in TOKEN.captures_iter(sql) {
            let Some(token) = caps.get(0) else { continue };
            if token.start() > last_end {
                segments.push((Style::new(), sql[last_end..token.start()].to_string()));
            }

            let style = if caps.name("comment").is_some() {
                self.comment_style
            } else if caps.name("string").is_some() {
                self.string_style
            } else if caps.name("number").is_some() {
                self.number_style
            } else {
                let next = sql[token.end()..].chars().next();
                self.word_style(token.as_str(), next)
            };

            segments.push((style, token.as_str().to_string()));
            last_end = token.end();
        }

        if last_end < sql.len() {
            segments.push((Style::new(), sql[last_end..].to_string()));
        }

        segments
    }

    /// Highlighted text with ANSI escape codes
    pub fn paint(&self, sql: &str) -> String {
        self.highlight(sql)
            .into_iter()
            .map(|(style, text)| style.paint(text).to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn joined(segments: &StyledSegments) -> String {
        segments.iter().map(|(_, text)| text.as_str()).collect()
    }

    #[rstest]
    #[case("SELECT * FROM users WHERE id = 123")]
    #[case("SELECT * FROM users -- Get all users")]
    #[case("SELECT name FROM users WHERE name = 'O''Brien'")]
    #[case("SELECT strftime('%Y-%m', o.order_date) AS month\nFROM orders o")]
    fn test_segments_preserve_text(#[case] sql: &str) {
        let highlighter = SqlHighlighter::new();
        let segments = highlighter.highlight(sql);
        assert!(segments.len() > 1);
        assert_eq!(joined(&segments), sql);
    }

    #[rstest]
    fn test_token_styles() {
        let highlighter = SqlHighlighter::new();
        let segments = highlighter.highlight("SELECT COUNT(id) FROM t WHERE s = 'x' LIMIT 10");
        let style_of = |text: &str| {
            segments
                .iter()
                .find(|(_, t)| t == text)
                .map(|(style, _)| *style)
                .unwrap()
        };
        assert_eq!(style_of("SELECT"), highlighter.keyword_style);
        assert_eq!(style_of("COUNT"), highlighter.function_style);
        assert_eq!(style_of("'x'"), highlighter.string_style);
        assert_eq!(style_of("10"), highlighter.number_style);
        assert_eq!(style_of("id"), Style::new());
    }

    #[rstest]
    fn test_keywords_inside_strings_not_styled() {
        let highlighter = SqlHighlighter::new();
        let segments = highlighter.highlight("SELECT 'FROM'");
        assert!(segments.iter().all(|(style, text)| text != "FROM" || *style != highlighter.keyword_style));
    }

    #[rstest]
    fn test_paint_adds_escape_codes() {
        let painted = SqlHighlighter::new().paint("SELECT 1");
        assert!(painted.contains("\u{1b}["));
        assert!(painted.contains("SELECT"));
    }
}
