//! ORDER BY.

use crate::writer::{Expression, SqlWriter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTerm {
    pub column: String,
    pub ascending: bool,
}

/// Ordered list of sort terms.
#[derive(Debug, Clone, Default)]
pub struct Ordering {
    terms: Vec<OrderTerm>,
}

impl Ordering {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn terms(&self) -> &[OrderTerm] {
        &self.terms
    }

    pub fn order_asc(&mut self, columns: &[&str]) -> &mut Self {
        self.push(columns, true)
    }

    pub fn order_desc(&mut self, columns: &[&str]) -> &mut Self {
        self.push(columns, false)
    }

    pub fn clear_order(&mut self) -> &mut Self {
        self.terms.clear();
        self
    }

    fn push(&mut self, columns: &[&str], ascending: bool) -> &mut Self {
        self.terms.extend(columns.iter().map(|c| OrderTerm {
            column: c.to_string(),
            ascending,
        }));
        self
    }
}

impl Expression for Ordering {
    fn write_sql(&self, w: &mut SqlWriter<'_>) {
        if self.terms.is_empty() {
            return;
        }
        w.push(" ORDER BY ");
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                w.push(", ");
            }
            w.push(&term.column);
            w.push(if term.ascending { " ASC" } else { " DESC" });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::GenericDialect;

    fn sql(o: &Ordering) -> String {
        let dialect = GenericDialect;
        let mut w = SqlWriter::new(&dialect);
        o.write_sql(&mut w);
        w.finish().sql
    }

    #[test]
    fn test_order_terms_keep_call_order() {
        let mut o = Ordering::new();
        o.order_desc(&["email"]).order_asc(&["timecreated", "id"]);
        assert_eq!(sql(&o), "ORDER BY email DESC, timecreated ASC, id ASC");
    }

    #[test]
    fn test_clear_order() {
        let mut o = Ordering::new();
        o.order_asc(&["id"]).clear_order();
        assert_eq!(sql(&o), "");
    }
}
