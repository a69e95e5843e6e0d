//! DELETE statement.

use super::registry::{self, Arg, Registry};
use super::{MutationStatement, Statement, write_where};
use crate::condition::Condition;
use crate::config::BuilderConfig;
use crate::error::{SqlError, SqlResult};
use crate::grouping::Grouping;
use crate::join::JoinList;
use crate::source::Source;
use crate::writer::{Expression, SqlWriter};
use std::sync::{Arc, OnceLock};

/// DELETE statement builder.
#[derive(Clone, Debug)]
pub struct DeleteQuery {
    config: Arc<BuilderConfig>,
    /// Target table
    source: Source,
    /// JOIN clauses
    joins: JoinList,
    /// WHERE conditions
    conditions: Condition,
    /// GROUP BY / HAVING
    grouping: Grouping,
    /// Whether to allow DELETE without WHERE (dangerous!)
    allow_delete_all: bool,
}

impl DeleteQuery {
    pub fn new(config: Arc<BuilderConfig>, source: Source) -> Self {
        Self {
            config,
            source,
            joins: JoinList::new(),
            conditions: Condition::new(),
            grouping: Grouping::new(),
            allow_delete_all: false,
        }
    }

    /// Allow DELETE without WHERE conditions (dangerous!).
    ///
    /// By default, executing a DELETE without WHERE fails validation.
    pub fn allow_delete_all(mut self, allow: bool) -> Self {
        self.allow_delete_all = allow;
        self
    }

    /// Apply an operation by name.
    pub fn call(mut self, op: &str, args: Vec<Arg>) -> SqlResult<Self> {
        Self::registry().dispatch(&mut self, op, args)?;
        Ok(self)
    }

    /// The operation registry for DELETE statements.
    pub fn registry() -> &'static Registry<DeleteQuery> {
        static REGISTRY: OnceLock<Registry<DeleteQuery>> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            let mut r = Registry::new();
            registry::register_statement_ops(&mut r);
            registry::register_source(&mut r);
            registry::register_joins(&mut r);
            registry::register_where(&mut r);
            registry::register_grouping(&mut r);
            r
        })
    }
}

impl_filter_methods!(DeleteQuery);

impl Expression for DeleteQuery {
    fn write_sql(&self, w: &mut SqlWriter<'_>) {
        w.push("DELETE FROM ");
        self.source.write_sql(w);
        self.joins.write_sql(w);
        write_where(&self.conditions, w);
        self.grouping.write_sql(w);
    }
}

impl Statement for DeleteQuery {
    fn config(&self) -> &BuilderConfig {
        &self.config
    }

    fn validate(&self) -> SqlResult<()> {
        if self.conditions.has_no_conditions() && !self.allow_delete_all {
            return Err(SqlError::validation(
                "DELETE without WHERE is refused; call allow_delete_all(true) to delete every row",
            ));
        }
        Ok(())
    }
}

impl MutationStatement for DeleteQuery {}
