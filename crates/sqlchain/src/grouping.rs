//! GROUP BY and HAVING.

use crate::condition::Condition;
use crate::error::SqlResult;
use crate::expr::IntoOperand;
use crate::writer::{Expression, SqlWriter};

/// GROUP BY columns plus a parameterized HAVING condition.
#[derive(Debug, Clone, Default)]
pub struct Grouping {
    columns: Vec<String>,
    having: Condition,
}

impl Grouping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the grouping columns, replacing any previous ones.
    pub fn group_by(&mut self, columns: &[&str]) -> &mut Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn having_condition(&self) -> &Condition {
        &self.having
    }

    pub fn having(
        &mut self,
        column: &str,
        op: &str,
        value: impl IntoOperand,
    ) -> SqlResult<&mut Self> {
        self.having.where_(column, op, value)?;
        Ok(self)
    }

    pub fn or_having(
        &mut self,
        column: &str,
        op: &str,
        value: impl IntoOperand,
    ) -> SqlResult<&mut Self> {
        self.having.or_where(column, op, value)?;
        Ok(self)
    }

    pub fn having_not(
        &mut self,
        column: &str,
        op: &str,
        value: impl IntoOperand,
    ) -> SqlResult<&mut Self> {
        self.having.where_not(column, op, value)?;
        Ok(self)
    }
}

impl Expression for Grouping {
    fn write_sql(&self, w: &mut SqlWriter<'_>) {
        // HAVING without GROUP BY is dropped along with its params.
        if self.columns.is_empty() {
            return;
        }
        w.push(" GROUP BY ").push(&self.columns.join(", "));
        if !self.having.has_no_conditions() {
            w.push(" HAVING ");
            self.having.write_sql(w);
        }
    }
}
