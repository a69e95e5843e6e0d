//! Ordered AND-chain of conditions with OR-folding.
//!
//! WHERE, HAVING and join ON clauses all use [`Condition`]. Each `or_*` method appends
//! its node and then folds it together with the previous entry, so
//! `where_(a).or_where(b).or_where(c)` yields one flat `(a OR b OR c)`.

use crate::clock::Clock;
use crate::dialect::LikeOptions;
use crate::error::{SqlError, SqlResult};
use crate::expr::{ComparisonOp, Expr, IntoMembers, IntoOperand, Operand};
use crate::value::Value;
use crate::writer::{Expression, SqlWriter};

/// An ordered list of conditions joined by `AND`.
#[derive(Debug, Clone, Default)]
pub struct Condition {
    entries: Vec<Expr>,
}

impl Condition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an already-built node.
    pub fn add(&mut self, expr: Expr) -> &mut Self {
        self.entries.push(expr);
        self
    }

    /// Fold the two most recent entries into one OR group.
    ///
    /// Does nothing with fewer than two entries. When the older entry is already an
    /// OR group, the newer one joins it instead of nesting.
    pub fn combine_last_two_by_or(&mut self) -> &mut Self {
        if self.entries.len() < 2 {
            return self;
        }
        if let (Some(newer), Some(older)) = (self.entries.pop(), self.entries.pop()) {
            self.entries.push(Expr::or_pair(older, newer));
        }
        self
    }

    /// Alias of [`Condition::combine_last_two_by_or`].
    pub fn or_fold(&mut self) -> &mut Self {
        self.combine_last_two_by_or()
    }

    pub fn has_no_conditions(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Expr] {
        &self.entries
    }

    fn push_compare(
        &mut self,
        column: &str,
        op: &str,
        value: Operand,
        negate: bool,
    ) -> SqlResult<&mut Self> {
        if op.trim().eq_ignore_ascii_case("like") {
            let pattern = match value {
                Operand::Value(Value::Text(text)) => text,
                _ => {
                    return Err(SqlError::validation(format!(
                        "LIKE on column '{column}' needs a text pattern"
                    )));
                }
            };
            return Ok(self.add(Expr::like(column, pattern, LikeOptions::default(), negate)));
        }
        let expr = Expr::compare(column, op, value, negate)?;
        Ok(self.add(expr))
    }

    // ==================== Comparisons ====================

    /// `column op value`. The operator `like` routes to a pattern match.
    pub fn where_(
        &mut self,
        column: &str,
        op: &str,
        value: impl IntoOperand,
    ) -> SqlResult<&mut Self> {
        self.push_compare(column, op, value.into_operand(), false)
    }

    pub fn or_where(
        &mut self,
        column: &str,
        op: &str,
        value: impl IntoOperand,
    ) -> SqlResult<&mut Self> {
        self.where_(column, op, value)?;
        Ok(self.or_fold())
    }

    pub fn where_not(
        &mut self,
        column: &str,
        op: &str,
        value: impl IntoOperand,
    ) -> SqlResult<&mut Self> {
        self.push_compare(column, op, value.into_operand(), true)
    }

    pub fn or_where_not(
        &mut self,
        column: &str,
        op: &str,
        value: impl IntoOperand,
    ) -> SqlResult<&mut Self> {
        self.where_not(column, op, value)?;
        Ok(self.or_fold())
    }

    /// `column op othercolumn`. Binds nothing.
    pub fn where_column(&mut self, column: &str, op: &str, other: &str) -> SqlResult<&mut Self> {
        let expr = Expr::column_compare(column, op, other, false)?;
        Ok(self.add(expr))
    }

    pub fn or_where_column(
        &mut self,
        column: &str,
        op: &str,
        other: &str,
    ) -> SqlResult<&mut Self> {
        self.where_column(column, op, other)?;
        Ok(self.or_fold())
    }

    // ==================== Pattern and text matches ====================

    pub fn where_like(
        &mut self,
        column: &str,
        pattern: &str,
        options: Option<LikeOptions>,
    ) -> &mut Self {
        self.add(Expr::like(column, pattern, options.unwrap_or_default(), false))
    }

    pub fn where_not_like(
        &mut self,
        column: &str,
        pattern: &str,
        options: Option<LikeOptions>,
    ) -> &mut Self {
        self.add(Expr::like(column, pattern, options.unwrap_or_default(), true))
    }

    pub fn where_fulltext(&mut self, column: &str, value: &str) -> &mut Self {
        self.add(Expr::fulltext(column, value, false))
    }

    pub fn where_fulltext_not(&mut self, column: &str, value: &str) -> &mut Self {
        self.add(Expr::fulltext(column, value, true))
    }

    // ==================== Null checks ====================

    pub fn where_null(&mut self, column: &str) -> &mut Self {
        self.add(Expr::is_null(column))
    }

    pub fn or_where_null(&mut self, column: &str) -> &mut Self {
        self.where_null(column).or_fold()
    }

    pub fn where_notnull(&mut self, column: &str) -> &mut Self {
        self.add(Expr::is_not_null(column))
    }

    pub fn or_where_notnull(&mut self, column: &str) -> &mut Self {
        self.where_notnull(column).or_fold()
    }

    // ==================== Membership ====================

    pub fn where_in(&mut self, column: &str, members: impl IntoMembers) -> &mut Self {
        self.add(Expr::in_members(column, members, false))
    }

    pub fn where_not_in(&mut self, column: &str, members: impl IntoMembers) -> &mut Self {
        self.add(Expr::in_members(column, members, true))
    }

    // ==================== Time window ====================

    /// Rows whose `[start, end]` window contains the clock's current time.
    ///
    /// A NULL bound is open: `(start IS NULL OR start <= now) AND (end IS NULL OR end >= now)`.
    pub fn where_currently_active(
        &mut self,
        start_column: &str,
        end_column: &str,
        clock: &dyn Clock,
    ) -> &mut Self {
        let now = clock.now();
        self.where_null(start_column);
        self.add(Expr::Compare {
            column: start_column.to_string(),
            op: ComparisonOp::Le,
            value: Operand::Value(Value::Int(now)),
            negate: false,
        })
        .or_fold();
        self.where_null(end_column);
        self.add(Expr::Compare {
            column: end_column.to_string(),
            op: ComparisonOp::Ge,
            value: Operand::Value(Value::Int(now)),
            negate: false,
        })
        .or_fold()
    }
}

impl Expression for Condition {
    fn write_sql(&self, w: &mut SqlWriter<'_>) {
        for (i, expr) in self.entries.iter().enumerate() {
            if i > 0 {
                w.push(" AND ");
            }
            expr.write_sql(w);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::dialect::GenericDialect;
    use crate::writer::BuiltQuery;

    fn build(cond: &Condition) -> BuiltQuery {
        let dialect = GenericDialect;
        let mut w = SqlWriter::new(&dialect);
        cond.write_sql(&mut w);
        w.finish()
    }

    #[test]
    fn test_empty_condition_compiles_to_nothing() {
        let cond = Condition::new();
        assert!(cond.has_no_conditions());
        assert_eq!(build(&cond).sql, "");
    }

    #[test]
    fn test_and_chain() {
        let mut cond = Condition::new();
        cond.where_("a", "=", 1).unwrap();
        cond.where_("b", ">", 2).unwrap();
        let built = build(&cond);
        assert_eq!(built.sql, "a = ? AND b > ?");
        assert_eq!(built.params, vec![Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn test_or_where_chain_stays_flat() {
        let mut cond = Condition::new();
        cond.where_("a", "=", 1).unwrap();
        cond.or_where("b", "=", 2).unwrap();
        cond.or_where("c", "=", 3).unwrap();
        assert_eq!(cond.len(), 1);

        let built = build(&cond);
        assert_eq!(built.sql, "(a = ? OR b = ? OR c = ?)");
        assert_eq!(built.params, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    }

    #[test]
    fn test_fold_with_single_entry_is_noop() {
        let mut cond = Condition::new();
        cond.or_where("a", "=", 1).unwrap();
        assert_eq!(build(&cond).sql, "a = ?");
    }

    #[test]
    fn test_or_only_touches_last_two() {
        let mut cond = Condition::new();
        cond.where_("a", "=", 1).unwrap();
        cond.where_("b", "=", 2).unwrap();
        cond.or_where_null("c");
        assert_eq!(build(&cond).sql, "a = ? AND (b = ? OR c IS NULL)");
    }

    #[test]
    fn test_like_operator_routes_to_pattern_match() {
        let mut cond = Condition::new();
        cond.where_("name", "LIKE", "jo%").unwrap();
        assert!(matches!(cond.entries()[0], Expr::Like { .. }));

        let err = Condition::new().where_("name", "like", 3).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_bad_operator() {
        let mut cond = Condition::new();
        let err = cond.where_("name", "~=", "x").unwrap_err();
        assert!(err.to_string().contains("~="));
        assert!(cond.has_no_conditions());
    }

    #[test]
    fn test_currently_active() {
        let mut cond = Condition::new();
        cond.where_currently_active("start", "end", &FixedClock(100));
        let built = build(&cond);
        assert_eq!(
            built.sql,
            "(start IS NULL OR start <= ?) AND (end IS NULL OR end >= ?)"
        );
        assert_eq!(built.params, vec![Value::Int(100), Value::Int(100)]);
    }

    #[test]
    fn test_where_column_and_not() {
        let mut cond = Condition::new();
        cond.where_column("a.id", "=", "b.a_id").unwrap();
        cond.or_where_not("flag", "=", true).unwrap();
        let built = build(&cond);
        assert_eq!(built.sql, "(a.id = b.a_id OR NOT flag = ?)");
        assert_eq!(built.params, vec![Value::Bool(true)]);
    }
}
