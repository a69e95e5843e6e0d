//! Fragment builder shared by every statement part.
//!
//! `SqlWriter` accumulates SQL text and bound values side by side. The only way to emit a
//! placeholder is [`SqlWriter::push_bind`], which appends the value and renders the
//! dialect's token for that position in one step, so the Nth placeholder always refers to
//! the Nth value no matter how deeply fragments nest.

use crate::dialect::Dialect;
use crate::value::Value;

/// Anything that can write itself into an [`SqlWriter`].
pub trait Expression {
    /// Append this node's SQL text and bound values.
    fn write_sql(&self, w: &mut SqlWriter<'_>);
}

/// The result of compiling a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

impl BuiltQuery {
    /// Create a new built query.
    pub fn new(sql: String, params: Vec<Value>) -> Self {
        Self { sql, params }
    }
}

/// Accumulates SQL text and parameters for a single compile pass.
#[derive(Debug)]
pub struct SqlWriter<'d> {
    dialect: &'d dyn Dialect,
    sql: String,
    params: Vec<Value>,
}

impl<'d> SqlWriter<'d> {
    /// Create an empty writer rendering through `dialect`.
    pub fn new(dialect: &'d dyn Dialect) -> Self {
        Self {
            dialect,
            sql: String::new(),
            params: Vec::new(),
        }
    }

    /// The dialect this writer renders with.
    pub fn dialect(&self) -> &'d dyn Dialect {
        self.dialect
    }

    /// Append raw SQL (no parameters).
    pub fn push(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    /// Append a placeholder and bind its value.
    pub fn push_bind(&mut self, value: Value) -> &mut Self {
        self.params.push(value);
        let token = self.dialect.placeholder(self.params.len());
        self.sql.push_str(&token);
        self
    }

    /// Append a comma-separated list of placeholders, one per value.
    pub fn push_bind_list(&mut self, values: impl IntoIterator<Item = Value>) -> &mut Self {
        for (i, v) in values.into_iter().enumerate() {
            if i > 0 {
                self.push(",");
            }
            self.push_bind(v);
        }
        self
    }

    /// Append a table name using the dialect's delimiters.
    pub fn push_table(&mut self, name: &str) -> &mut Self {
        let table = self.dialect.table(name);
        self.sql.push_str(&table);
        self
    }

    /// Append a nested expression wrapped in parentheses.
    pub fn push_nested(&mut self, expr: &dyn Expression) -> &mut Self {
        self.push("(");
        expr.write_sql(self);
        self.push(")")
    }

    /// Number of values bound so far.
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// Finish the pass, collapsing incidental whitespace.
    pub fn finish(self) -> BuiltQuery {
        BuiltQuery::new(collapse_whitespace(&self.sql), self.params)
    }
}

/// Collapse runs of whitespace outside quoted literals and trim the ends.
fn collapse_whitespace(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut quote: Option<char> = None;
    let mut pending_space = false;

    for ch in sql.chars() {
        if let Some(q) = quote {
            out.push(ch);
            if ch == q {
                quote = None;
            }
            continue;
        }
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        if ch == '\'' || ch == '"' {
            quote = Some(ch);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{GenericDialect, PostgresDialect};

    #[test]
    fn test_push_bind_generic() {
        let dialect = GenericDialect;
        let mut w = SqlWriter::new(&dialect);
        assert!(w.is_empty());
        w.push("a = ").push_bind(Value::Int(1)).push(" AND b = ").push_bind("x".into());
        assert_eq!(w.param_count(), 2);
        let built = w.finish();
        assert_eq!(built.sql, "a = ? AND b = ?");
        assert_eq!(built.params, vec![Value::Int(1), Value::Text("x".into())]);
    }

    #[test]
    fn test_push_bind_numbered() {
        let dialect = PostgresDialect;
        let mut w = SqlWriter::new(&dialect);
        w.push("id IN (").push_bind_list(vec![Value::Int(1), Value::Int(2)]).push(")");
        assert_eq!(w.finish().sql, "id IN ($1,$2)");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  SELECT   *\n FROM  t  "), "SELECT * FROM t");
        assert_eq!(collapse_whitespace("a  =  'x   y'"), "a = 'x   y'");
    }
}
