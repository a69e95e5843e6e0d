//! Statements: SELECT, UPDATE and DELETE.
//!
//! Each statement owns one of each part it needs (selection, source, joins, WHERE
//! condition, grouping, ordering, pagination) and assembles them in a fixed order:
//!
//! ```text
//! SELECT ... FROM ... JOIN ... WHERE ... GROUP BY ... HAVING ... ORDER BY ... LIMIT ... OFFSET ...
//! UPDATE ... SET ... JOIN ... WHERE ... GROUP BY ...
//! DELETE FROM ... JOIN ... WHERE ... GROUP BY ...
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use sqlchain::{Db, Statement};
//!
//! let db = Db::new();
//! let q = db
//!     .table("users")
//!     .where_("deleted", "=", 0)?
//!     .order_desc("email")
//!     .order_asc("timecreated");
//!
//! assert_eq!(
//!     q.to_sql(),
//!     "SELECT * FROM {users} WHERE deleted = ? ORDER BY email DESC, timecreated ASC"
//! );
//!
//! let first = q.first(&client).await?;
//! ```
//!
//! Every fluent method is also reachable by name through `call`, for callers that
//! build statements from data:
//!
//! ```ignore
//! let q = db.table("users").call("where", args!["deleted", "=", 0])?;
//! ```

use crate::client::Executor;
use crate::condition::Condition;
use crate::config::BuilderConfig;
use crate::error::SqlResult;
use crate::grouping::Grouping;
use crate::join::JoinList;
use crate::source::Source;
use crate::value::Value;
use crate::writer::{BuiltQuery, Expression, SqlWriter};

/// A compilable statement.
pub trait Statement: Expression + Sync {
    /// Configuration the statement was created with.
    fn config(&self) -> &BuilderConfig;

    /// Check the statement is safe to execute.
    fn validate(&self) -> SqlResult<()> {
        Ok(())
    }

    /// Compile to SQL text and the matching parameter list.
    fn compile(&self) -> BuiltQuery {
        let dialect = self.config().dialect.as_ref();
        let mut w = SqlWriter::new(dialect);
        self.write_sql(&mut w);
        let built = w.finish();
        tracing::trace!(
            target: "sqlchain.sql",
            dialect = dialect.name(),
            sql = %built.sql,
            params = built.params.len(),
            "compiled statement"
        );
        built
    }

    /// Compiled SQL text.
    fn to_sql(&self) -> String {
        self.compile().sql
    }

    /// Compiled parameters, in placeholder order.
    fn params(&self) -> Vec<Value> {
        self.compile().params
    }
}

/// Statements that modify rows.
pub trait MutationStatement: Statement {
    /// Validate, compile and execute. Returns the affected row count.
    fn execute<E: Executor>(
        &self,
        exec: &E,
    ) -> impl std::future::Future<Output = SqlResult<u64>> + Send {
        async move {
            self.validate()?;
            let built = self.compile();
            tracing::debug!(
                target: "sqlchain.sql",
                sql = %built.sql,
                params = built.params.len(),
                "execute"
            );
            exec.execute(&built.sql, &built.params).await
        }
    }
}

/// The parts every statement shares, used by the dynamic dispatch registry.
pub(crate) trait StatementParts {
    fn builder_config(&self) -> &BuilderConfig;
    fn source_mut(&mut self) -> &mut Source;
    fn joins_mut(&mut self) -> &mut JoinList;
    fn conditions_mut(&mut self) -> &mut Condition;
    fn grouping_mut(&mut self) -> &mut Grouping;
}

/// Write ` WHERE <condition>` when the condition is not empty.
pub(crate) fn write_where(conditions: &Condition, w: &mut SqlWriter<'_>) {
    if !conditions.has_no_conditions() {
        w.push(" WHERE ");
        conditions.write_sql(w);
    }
}

/// Fluent WHERE/JOIN/GROUP methods shared by every statement type.
///
/// The target type must have `config: Arc<BuilderConfig>`, `joins: JoinList`,
/// `conditions: Condition` and `grouping: Grouping` fields.
macro_rules! impl_filter_methods {
    ($ty:ty) => {
        impl $ty {
            // ==================== WHERE ====================

            /// Add WHERE: `column op value`. The operator `like` adds a pattern match.
            pub fn where_(
                mut self,
                column: &str,
                op: &str,
                value: impl $crate::expr::IntoOperand,
            ) -> $crate::error::SqlResult<Self> {
                self.conditions.where_(column, op, value)?;
                Ok(self)
            }

            /// Add WHERE and OR it with the previous condition.
            pub fn or_where(
                mut self,
                column: &str,
                op: &str,
                value: impl $crate::expr::IntoOperand,
            ) -> $crate::error::SqlResult<Self> {
                self.conditions.or_where(column, op, value)?;
                Ok(self)
            }

            /// Add WHERE: `NOT column op value`
            pub fn where_not(
                mut self,
                column: &str,
                op: &str,
                value: impl $crate::expr::IntoOperand,
            ) -> $crate::error::SqlResult<Self> {
                self.conditions.where_not(column, op, value)?;
                Ok(self)
            }

            pub fn or_where_not(
                mut self,
                column: &str,
                op: &str,
                value: impl $crate::expr::IntoOperand,
            ) -> $crate::error::SqlResult<Self> {
                self.conditions.or_where_not(column, op, value)?;
                Ok(self)
            }

            /// Add WHERE: `column op othercolumn`
            pub fn where_column(
                mut self,
                column: &str,
                op: &str,
                other: &str,
            ) -> $crate::error::SqlResult<Self> {
                self.conditions.where_column(column, op, other)?;
                Ok(self)
            }

            pub fn or_where_column(
                mut self,
                column: &str,
                op: &str,
                other: &str,
            ) -> $crate::error::SqlResult<Self> {
                self.conditions.or_where_column(column, op, other)?;
                Ok(self)
            }

            /// Add WHERE: `column LIKE pattern` (case-insensitive, unescaped).
            pub fn where_like(mut self, column: &str, pattern: &str) -> Self {
                self.conditions.where_like(column, pattern, None);
                self
            }

            /// Add WHERE: `column LIKE pattern` with explicit options.
            pub fn where_like_with(
                mut self,
                column: &str,
                pattern: &str,
                options: $crate::dialect::LikeOptions,
            ) -> Self {
                self.conditions.where_like(column, pattern, Some(options));
                self
            }

            pub fn where_not_like(mut self, column: &str, pattern: &str) -> Self {
                self.conditions.where_not_like(column, pattern, None);
                self
            }

            pub fn where_not_like_with(
                mut self,
                column: &str,
                pattern: &str,
                options: $crate::dialect::LikeOptions,
            ) -> Self {
                self.conditions.where_not_like(column, pattern, Some(options));
                self
            }

            /// Add WHERE: length-aware text equality.
            pub fn where_fulltext(mut self, column: &str, value: &str) -> Self {
                self.conditions.where_fulltext(column, value);
                self
            }

            pub fn where_fulltext_not(mut self, column: &str, value: &str) -> Self {
                self.conditions.where_fulltext_not(column, value);
                self
            }

            /// Add WHERE: `column IS NULL`
            pub fn where_null(mut self, column: &str) -> Self {
                self.conditions.where_null(column);
                self
            }

            pub fn or_where_null(mut self, column: &str) -> Self {
                self.conditions.or_where_null(column);
                self
            }

            /// Add WHERE: `column IS NOT NULL`
            pub fn where_notnull(mut self, column: &str) -> Self {
                self.conditions.where_notnull(column);
                self
            }

            pub fn or_where_notnull(mut self, column: &str) -> Self {
                self.conditions.or_where_notnull(column);
                self
            }

            /// Add WHERE: `column IN (...)` over a list or a nested query.
            pub fn where_in(mut self, column: &str, members: impl $crate::expr::IntoMembers) -> Self {
                self.conditions.where_in(column, members);
                self
            }

            /// Add WHERE: `column NOT IN (...)`
            pub fn where_not_in(
                mut self,
                column: &str,
                members: impl $crate::expr::IntoMembers,
            ) -> Self {
                self.conditions.where_not_in(column, members);
                self
            }

            /// Rows whose `[start, end]` window contains the configured clock's time.
            pub fn where_currently_active(mut self, start_column: &str, end_column: &str) -> Self {
                let clock = std::sync::Arc::clone(&self.config.clock);
                self.conditions
                    .where_currently_active(start_column, end_column, clock.as_ref());
                self
            }

            /// Add a prebuilt condition node.
            pub fn where_expr(mut self, expr: $crate::expr::Expr) -> Self {
                self.conditions.add(expr);
                self
            }

            /// OR the two most recent WHERE conditions.
            pub fn or_fold(mut self) -> Self {
                self.conditions.or_fold();
                self
            }

            /// The WHERE condition.
            pub fn conditions(&self) -> &$crate::condition::Condition {
                &self.conditions
            }

            // ==================== JOIN ====================

            /// Add INNER JOIN on `(left, op, right)` columns.
            pub fn join(
                mut self,
                target: impl Into<$crate::join::JoinTarget>,
                on: (&str, &str, &str),
            ) -> $crate::error::SqlResult<Self> {
                self.joins
                    .join_on_columns($crate::join::JoinKind::Inner, target, None, on)?;
                Ok(self)
            }

            pub fn join_as(
                mut self,
                target: impl Into<$crate::join::JoinTarget>,
                alias: &str,
                on: (&str, &str, &str),
            ) -> $crate::error::SqlResult<Self> {
                self.joins
                    .join_on_columns($crate::join::JoinKind::Inner, target, Some(alias), on)?;
                Ok(self)
            }

            /// Add LEFT JOIN.
            pub fn left_join(
                mut self,
                target: impl Into<$crate::join::JoinTarget>,
                on: (&str, &str, &str),
            ) -> $crate::error::SqlResult<Self> {
                self.joins
                    .join_on_columns($crate::join::JoinKind::Left, target, None, on)?;
                Ok(self)
            }

            pub fn left_join_as(
                mut self,
                target: impl Into<$crate::join::JoinTarget>,
                alias: &str,
                on: (&str, &str, &str),
            ) -> $crate::error::SqlResult<Self> {
                self.joins
                    .join_on_columns($crate::join::JoinKind::Left, target, Some(alias), on)?;
                Ok(self)
            }

            /// Add RIGHT JOIN.
            pub fn right_join(
                mut self,
                target: impl Into<$crate::join::JoinTarget>,
                on: (&str, &str, &str),
            ) -> $crate::error::SqlResult<Self> {
                self.joins
                    .join_on_columns($crate::join::JoinKind::Right, target, None, on)?;
                Ok(self)
            }

            pub fn right_join_as(
                mut self,
                target: impl Into<$crate::join::JoinTarget>,
                alias: &str,
                on: (&str, &str, &str),
            ) -> $crate::error::SqlResult<Self> {
                self.joins
                    .join_on_columns($crate::join::JoinKind::Right, target, Some(alias), on)?;
                Ok(self)
            }

            /// Add FULL JOIN.
            pub fn full_join(
                mut self,
                target: impl Into<$crate::join::JoinTarget>,
                on: (&str, &str, &str),
            ) -> $crate::error::SqlResult<Self> {
                self.joins
                    .join_on_columns($crate::join::JoinKind::Full, target, None, on)?;
                Ok(self)
            }

            pub fn full_join_as(
                mut self,
                target: impl Into<$crate::join::JoinTarget>,
                alias: &str,
                on: (&str, &str, &str),
            ) -> $crate::error::SqlResult<Self> {
                self.joins
                    .join_on_columns($crate::join::JoinKind::Full, target, Some(alias), on)?;
                Ok(self)
            }

            /// Add CROSS JOIN (no ON clause). A nested query needs [`Self::cross_join_as`].
            pub fn cross_join(
                mut self,
                target: impl Into<$crate::join::JoinTarget>,
            ) -> $crate::error::SqlResult<Self> {
                self.joins.cross_join(target, None)?;
                Ok(self)
            }

            pub fn cross_join_as(
                mut self,
                target: impl Into<$crate::join::JoinTarget>,
                alias: &str,
            ) -> $crate::error::SqlResult<Self> {
                self.joins.cross_join(target, Some(alias))?;
                Ok(self)
            }

            /// Add a join whose ON condition is built by `build`.
            ///
            /// ```ignore
            /// db.table_as("user", "u").join_on(JoinKind::Left, "role_assignments", Some("ra"), |on| {
            ///     on.where_column("ra.userid", "=", "u.id")?;
            ///     on.where_("ra.contextid", "=", 1)?;
            ///     Ok(())
            /// })?;
            /// ```
            pub fn join_on<F>(
                mut self,
                kind: $crate::join::JoinKind,
                target: impl Into<$crate::join::JoinTarget>,
                alias: Option<&str>,
                build: F,
            ) -> $crate::error::SqlResult<Self>
            where
                F: FnOnce(&mut $crate::condition::Condition) -> $crate::error::SqlResult<()>,
            {
                self.joins.join_with(kind, target, alias, build)?;
                Ok(self)
            }

            // ==================== GROUP BY / HAVING ====================

            /// Set GROUP BY columns.
            pub fn group_by(mut self, columns: &[&str]) -> Self {
                self.grouping.group_by(columns);
                self
            }

            /// Add HAVING: `column op value`
            pub fn having(
                mut self,
                column: &str,
                op: &str,
                value: impl $crate::expr::IntoOperand,
            ) -> $crate::error::SqlResult<Self> {
                self.grouping.having(column, op, value)?;
                Ok(self)
            }

            pub fn or_having(
                mut self,
                column: &str,
                op: &str,
                value: impl $crate::expr::IntoOperand,
            ) -> $crate::error::SqlResult<Self> {
                self.grouping.or_having(column, op, value)?;
                Ok(self)
            }

            pub fn having_not(
                mut self,
                column: &str,
                op: &str,
                value: impl $crate::expr::IntoOperand,
            ) -> $crate::error::SqlResult<Self> {
                self.grouping.having_not(column, op, value)?;
                Ok(self)
            }
        }

        impl $crate::query::StatementParts for $ty {
            fn builder_config(&self) -> &$crate::config::BuilderConfig {
                &self.config
            }

            fn source_mut(&mut self) -> &mut $crate::source::Source {
                &mut self.source
            }

            fn joins_mut(&mut self) -> &mut $crate::join::JoinList {
                &mut self.joins
            }

            fn conditions_mut(&mut self) -> &mut $crate::condition::Condition {
                &mut self.conditions
            }

            fn grouping_mut(&mut self) -> &mut $crate::grouping::Grouping {
                &mut self.grouping
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&$crate::query::Statement::to_sql(self))
            }
        }
    };
}

mod delete;
mod registry;
mod select;
mod update;

pub use delete::DeleteQuery;
pub use registry::{Arg, Args, Registry};
pub use select::SelectQuery;
pub use update::UpdateQuery;
