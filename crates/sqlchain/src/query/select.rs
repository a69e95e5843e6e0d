//! SELECT statement.

use super::registry::{self, Arg, Registry};
use super::{Statement, write_where};
use crate::client::Executor;
use crate::condition::Condition;
use crate::config::BuilderConfig;
use crate::error::SqlResult;
use crate::expr::{ComparisonOp, Expr, Operand};
use crate::grouping::Grouping;
use crate::join::JoinList;
use crate::ordering::Ordering;
use crate::pagination::Pagination;
use crate::selection::Selection;
use crate::source::Source;
use crate::value::Value;
use crate::writer::{Expression, SqlWriter};
use std::sync::{Arc, OnceLock};

/// SELECT statement builder.
#[derive(Clone, Debug)]
pub struct SelectQuery {
    config: Arc<BuilderConfig>,
    /// SELECT columns (empty means `*`)
    selection: Selection,
    /// FROM source
    source: Source,
    /// JOIN clauses
    joins: JoinList,
    /// WHERE conditions
    conditions: Condition,
    /// GROUP BY / HAVING
    grouping: Grouping,
    /// ORDER BY terms
    ordering: Ordering,
    /// LIMIT / OFFSET
    pagination: Pagination,
}

impl SelectQuery {
    /// Create a SELECT over `source`.
    pub fn new(config: Arc<BuilderConfig>, source: Source) -> Self {
        Self {
            config,
            selection: Selection::new(),
            source,
            joins: JoinList::new(),
            conditions: Condition::new(),
            grouping: Grouping::new(),
            ordering: Ordering::new(),
            pagination: Pagination::new(),
        }
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    // ==================== SELECT columns ====================

    /// Append a column.
    pub fn select(mut self, column: &str) -> Self {
        self.selection.select(column, None);
        self
    }

    /// Append a column rendered as `(column) AS alias`.
    pub fn select_as(mut self, column: &str, alias: &str) -> Self {
        self.selection.select(column, Some(alias));
        self
    }

    /// Replace the column list with `*`.
    pub fn select_all(mut self) -> Self {
        self.selection.select_all();
        self
    }

    /// Replace the column list with `COUNT(1)`.
    pub fn select_count(mut self) -> Self {
        self.selection.select_count(None);
        self
    }

    pub fn select_count_as(mut self, alias: &str) -> Self {
        self.selection.select_count(Some(alias));
        self
    }

    /// Replace the column list with `MAX(column)`.
    pub fn select_max(mut self, column: &str) -> Self {
        self.selection.select_max(column, None);
        self
    }

    pub fn select_max_as(mut self, column: &str, alias: &str) -> Self {
        self.selection.select_max(column, Some(alias));
        self
    }

    /// Replace the column list with `MIN(column)`.
    pub fn select_min(mut self, column: &str) -> Self {
        self.selection.select_min(column, None);
        self
    }

    pub fn select_min_as(mut self, column: &str, alias: &str) -> Self {
        self.selection.select_min(column, Some(alias));
        self
    }

    /// Replace the column list with `SUM(column)`.
    pub fn select_sum(mut self, column: &str) -> Self {
        self.selection.select_sum(column, None);
        self
    }

    pub fn select_sum_as(mut self, column: &str, alias: &str) -> Self {
        self.selection.select_sum(column, Some(alias));
        self
    }

    /// Replace the column list with `AVG(column)`.
    pub fn select_avg(mut self, column: &str) -> Self {
        self.selection.select_avg(column, None);
        self
    }

    pub fn select_avg_as(mut self, column: &str, alias: &str) -> Self {
        self.selection.select_avg(column, Some(alias));
        self
    }

    /// Emit `SELECT DISTINCT`.
    pub fn distinct(mut self) -> Self {
        self.selection.distinct();
        self
    }

    // ==================== Ordering ====================

    /// Add ORDER BY column ASC.
    pub fn order_asc(mut self, column: &str) -> Self {
        self.ordering.order_asc(&[column]);
        self
    }

    /// Add ORDER BY column DESC.
    pub fn order_desc(mut self, column: &str) -> Self {
        self.ordering.order_desc(&[column]);
        self
    }

    /// Add several ascending columns.
    pub fn order_asc_cols(mut self, columns: &[&str]) -> Self {
        self.ordering.order_asc(columns);
        self
    }

    /// Add several descending columns.
    pub fn order_desc_cols(mut self, columns: &[&str]) -> Self {
        self.ordering.order_desc(columns);
        self
    }

    /// Drop all ORDER BY terms.
    pub fn clear_order(mut self) -> Self {
        self.ordering.clear_order();
        self
    }

    // ==================== Pagination ====================

    /// Set LIMIT.
    pub fn limit(mut self, n: u64) -> Self {
        self.pagination.limit(n);
        self
    }

    /// Set OFFSET.
    pub fn offset(mut self, n: u64) -> Self {
        self.pagination.offset(n);
        self
    }

    /// Zero-based page `n` of `size` rows (`LIMIT size OFFSET n*size`).
    pub fn page(mut self, n: u64, size: u64) -> Self {
        self.pagination.page(n, size);
        self
    }

    // ==================== Dynamic dispatch ====================

    /// Apply an operation by name.
    ///
    /// Names resolve statement-level operations first, then the parts in the order
    /// selection, source, joins, where, grouping, ordering, pagination.
    pub fn call(mut self, op: &str, args: Vec<Arg>) -> SqlResult<Self> {
        Self::registry().dispatch(&mut self, op, args)?;
        Ok(self)
    }

    /// The operation registry for SELECT statements.
    pub fn registry() -> &'static Registry<SelectQuery> {
        static REGISTRY: OnceLock<Registry<SelectQuery>> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            let mut r = Registry::new();
            registry::register_statement_ops(&mut r);
            register_selection(&mut r);
            registry::register_source(&mut r);
            registry::register_joins(&mut r);
            registry::register_where(&mut r);
            registry::register_grouping(&mut r);
            register_ordering(&mut r);
            register_pagination(&mut r);
            r
        })
    }

    // ==================== Execution ====================

    /// Execute and return all rows.
    pub async fn get<E: Executor>(&self, exec: &E) -> SqlResult<Vec<E::Row>> {
        let built = self.compile();
        tracing::debug!(
            target: "sqlchain.sql",
            sql = %built.sql,
            params = built.params.len(),
            "get"
        );
        exec.query(&built.sql, &built.params).await
    }

    /// Execute a copy limited to one row and return it, or `None` when nothing matches.
    pub async fn first<E: Executor>(&self, exec: &E) -> SqlResult<Option<E::Row>> {
        let query = self.clone().limit(1);
        let rows = query.get(exec).await?;
        Ok(rows.into_iter().next())
    }

    /// Look a row up by the configured identity column.
    pub async fn find<E: Executor>(
        &self,
        exec: &E,
        id: impl Into<Value>,
    ) -> SqlResult<Option<E::Row>> {
        let mut query = self.clone();
        query.conditions.add(Expr::Compare {
            column: self.config.identity_column.clone(),
            op: ComparisonOp::Eq,
            value: Operand::Value(id.into()),
            negate: false,
        });
        query.first(exec).await
    }
}

impl_filter_methods!(SelectQuery);

impl Expression for SelectQuery {
    fn write_sql(&self, w: &mut SqlWriter<'_>) {
        self.selection.write_sql(w);
        w.push(" FROM ");
        self.source.write_sql(w);
        self.joins.write_sql(w);
        write_where(&self.conditions, w);
        self.grouping.write_sql(w);
        self.ordering.write_sql(w);
        self.pagination.write_sql(w);
    }
}

impl Statement for SelectQuery {
    fn config(&self) -> &BuilderConfig {
        &self.config
    }
}

fn register_selection(r: &mut Registry<SelectQuery>) {
    r.op("select", |q, a| {
        let column = a.text("column")?;
        let alias = a.opt_text()?;
        q.selection.select(&column, alias.as_deref());
        Ok(())
    })
    .op("select_all", |q, _| {
        q.selection.select_all();
        Ok(())
    })
    .op("select_count", |q, a| {
        let alias = a.opt_text()?;
        q.selection.select_count(alias.as_deref());
        Ok(())
    })
    .op("select_max", |q, a| {
        let column = a.text("column")?;
        let alias = a.opt_text()?;
        q.selection.select_max(&column, alias.as_deref());
        Ok(())
    })
    .op("select_min", |q, a| {
        let column = a.text("column")?;
        let alias = a.opt_text()?;
        q.selection.select_min(&column, alias.as_deref());
        Ok(())
    })
    .op("select_sum", |q, a| {
        let column = a.text("column")?;
        let alias = a.opt_text()?;
        q.selection.select_sum(&column, alias.as_deref());
        Ok(())
    })
    .op("select_avg", |q, a| {
        let column = a.text("column")?;
        let alias = a.opt_text()?;
        q.selection.select_avg(&column, alias.as_deref());
        Ok(())
    })
    .op("distinct", |q, _| {
        q.selection.distinct();
        Ok(())
    });
}

fn register_ordering(r: &mut Registry<SelectQuery>) {
    r.op("order_asc", |q, a| {
        let columns = a.rest_texts("column")?;
        let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
        q.ordering.order_asc(&columns);
        Ok(())
    })
    .op("order_desc", |q, a| {
        let columns = a.rest_texts("column")?;
        let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
        q.ordering.order_desc(&columns);
        Ok(())
    })
    .op("clear_order", |q, _| {
        q.ordering.clear_order();
        Ok(())
    });
}

fn register_pagination(r: &mut Registry<SelectQuery>) {
    r.op("limit", |q, a| {
        q.pagination.limit(a.count("limit")?);
        Ok(())
    })
    .op("offset", |q, a| {
        q.pagination.offset(a.count("offset")?);
        Ok(())
    })
    .op("page", |q, a| {
        let n = a.count("page")?;
        let size = a.count("page size")?;
        q.pagination.page(n, size);
        Ok(())
    });
}
