//! Vendor-specific SQL fragments.
//!
//! The builder never hardcodes one SQL flavour for the parts that differ between
//! databases: table delimiters, placeholder tokens, pattern matching, length-aware text
//! comparison and the empty membership list. Those are supplied by a [`Dialect`].

use crate::value::Value;
use crate::writer::SqlWriter;
use std::fmt;

/// Options for pattern matches (`LIKE`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeOptions {
    /// Distinguish `A` from `a`.
    pub case_sensitive: bool,
    /// Distinguish accented letters from their base letter.
    ///
    /// Neither built-in dialect rewrites the match for this; accent handling follows the
    /// column collation. Custom dialects may honour it in [`Dialect::write_like`].
    pub accent_sensitive: bool,
    /// Escape `%` and `_` in the pattern before binding it.
    pub escape: bool,
    /// Escape character used in the `ESCAPE` clause.
    pub escape_string: String,
}

impl Default for LikeOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            accent_sensitive: false,
            escape: false,
            escape_string: "\\".to_string(),
        }
    }
}

impl LikeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn case_sensitive(mut self, yes: bool) -> Self {
        self.case_sensitive = yes;
        self
    }

    pub fn accent_sensitive(mut self, yes: bool) -> Self {
        self.accent_sensitive = yes;
        self
    }

    /// Treat the pattern as literal text (wildcards are escaped).
    pub fn escaped(mut self, yes: bool) -> Self {
        self.escape = yes;
        self
    }

    pub fn escape_string(mut self, escape: impl Into<String>) -> Self {
        self.escape_string = escape.into();
        self
    }
}

/// Supplies the vendor-specific parts of generated SQL.
pub trait Dialect: fmt::Debug + Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Render a table reference.
    fn table(&self, name: &str) -> String;

    /// Render the placeholder token for the 1-based parameter `index`.
    fn placeholder(&self, index: usize) -> String;

    /// Write `column [NOT] LIKE <pattern>` honouring `options`.
    ///
    /// Implementations must bind `pattern` exactly once via [`SqlWriter::push_bind`].
    fn write_like(
        &self,
        w: &mut SqlWriter<'_>,
        column: &str,
        pattern: Value,
        options: &LikeOptions,
        negate: bool,
    );

    /// Escape LIKE wildcards in `text` so it matches literally.
    fn like_escape(&self, text: &str, escape: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(ch) = rest.chars().next() {
            if !escape.is_empty() && rest.starts_with(escape) {
                out.push_str(escape);
                out.push_str(escape);
                rest = &rest[escape.len()..];
                continue;
            }
            if ch == '%' || ch == '_' {
                out.push_str(escape);
            }
            out.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
        out
    }

    /// Left-hand side of a text comparison limited to `len` characters.
    fn compare_text(&self, column: &str, len: usize) -> String;

    /// Fragment used for a membership test against an empty list.
    fn empty_in(&self, negate: bool) -> &'static str {
        if negate { "1=1" } else { "1=0" }
    }
}

fn escape_clause(escape: &str) -> String {
    format!(" ESCAPE '{}'", escape.replace('\'', "''"))
}

/// Host-substituted SQL: `{table}` references (resolved by the host's table prefixing)
/// and `?` placeholders.
///
/// Case-insensitive matches lower both sides. `accent_sensitive` is ignored; accent
/// folding is left to the host connection's collation.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericDialect;

impl Dialect for GenericDialect {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn table(&self, name: &str) -> String {
        format!("{{{name}}}")
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn write_like(
        &self,
        w: &mut SqlWriter<'_>,
        column: &str,
        pattern: Value,
        options: &LikeOptions,
        negate: bool,
    ) {
        let op = if negate { " NOT LIKE " } else { " LIKE " };
        if options.case_sensitive {
            w.push(column).push(op).push_bind(pattern);
        } else {
            w.push("LOWER(")
                .push(column)
                .push(")")
                .push(op)
                .push("LOWER(")
                .push_bind(pattern)
                .push(")");
        }
        w.push(&escape_clause(&options.escape_string));
    }

    fn compare_text(&self, column: &str, len: usize) -> String {
        format!("SUBSTR({column}, 1, {})", len.max(1))
    }
}

/// PostgreSQL: `"table"` identifiers, `$n` placeholders and `ILIKE`.
///
/// Accent-insensitive matching needs the `unaccent` extension and is not applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn table(&self, name: &str) -> String {
        name.split('.')
            .map(|part| format!("\"{}\"", part.replace('"', "\"\"")))
            .collect::<Vec<_>>()
            .join(".")
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${index}")
    }

    fn write_like(
        &self,
        w: &mut SqlWriter<'_>,
        column: &str,
        pattern: Value,
        options: &LikeOptions,
        negate: bool,
    ) {
        let op = match (options.case_sensitive, negate) {
            (true, false) => " LIKE ",
            (true, true) => " NOT LIKE ",
            (false, false) => " ILIKE ",
            (false, true) => " NOT ILIKE ",
        };
        w.push(column).push(op).push_bind(pattern);
        w.push(&escape_clause(&options.escape_string));
    }

    fn compare_text(&self, column: &str, len: usize) -> String {
        format!("SUBSTRING({column} FROM 1 FOR {})", len.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_table_braces() {
        assert_eq!(GenericDialect.table("users"), "{users}");
    }

    #[test]
    fn test_postgres_table_quoting() {
        assert_eq!(PostgresDialect.table("public.users"), r#""public"."users""#);
        assert_eq!(PostgresDialect.table(r#"we"ird"#), r#""we""ird""#);
    }

    #[test]
    fn test_like_escape() {
        assert_eq!(GenericDialect.like_escape("50%_off", "\\"), r"50\%\_off");
        assert_eq!(GenericDialect.like_escape(r"a\b", "\\"), r"a\\b");
        assert_eq!(GenericDialect.like_escape("a%b", "|"), "a|%b");
    }

    #[test]
    fn test_generic_like_case_insensitive() {
        let d = GenericDialect;
        let mut w = SqlWriter::new(&d);
        d.write_like(&mut w, "name", "a%".into(), &LikeOptions::default(), false);
        let built = w.finish();
        assert_eq!(built.sql, r"LOWER(name) LIKE LOWER(?) ESCAPE '\'");
        assert_eq!(built.params.len(), 1);
    }

    #[test]
    fn test_postgres_like_negated() {
        let d = PostgresDialect;
        let mut w = SqlWriter::new(&d);
        let opts = LikeOptions::new().case_sensitive(true);
        d.write_like(&mut w, "name", "a%".into(), &opts, true);
        assert_eq!(w.finish().sql, r"name NOT LIKE $1 ESCAPE '\'");
    }

    #[test]
    fn test_accent_option_leaves_sql_unchanged() {
        let render = |options: &LikeOptions| {
            let d = GenericDialect;
            let mut w = SqlWriter::new(&d);
            d.write_like(&mut w, "name", Value::from("é%"), options, false);
            w.finish().sql
        };
        let plain = LikeOptions::new();
        assert!(!plain.accent_sensitive);
        assert_eq!(render(&plain), render(&LikeOptions::new().accent_sensitive(true)));
    }

    #[test]
    fn test_compare_text() {
        assert_eq!(GenericDialect.compare_text("summary", 5), "SUBSTR(summary, 1, 5)");
        assert_eq!(PostgresDialect.compare_text("summary", 0), "SUBSTRING(summary FROM 1 FOR 1)");
    }
}
