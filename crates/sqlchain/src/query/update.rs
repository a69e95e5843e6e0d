//! UPDATE statement.

use super::registry::{self, Arg, Registry};
use super::{MutationStatement, Statement, write_where};
use crate::client::Executor;
use crate::condition::Condition;
use crate::config::BuilderConfig;
use crate::error::{SqlError, SqlResult};
use crate::expr::{IntoOperand, Operand};
use crate::grouping::Grouping;
use crate::join::JoinList;
use crate::source::Source;
use crate::writer::{Expression, SqlWriter};
use std::sync::{Arc, OnceLock};

/// UPDATE statement builder.
#[derive(Clone, Debug)]
pub struct UpdateQuery {
    config: Arc<BuilderConfig>,
    /// Target table
    source: Source,
    /// SET assignments, in call order
    sets: Vec<(String, Operand)>,
    /// JOIN clauses
    joins: JoinList,
    /// WHERE conditions
    conditions: Condition,
    /// GROUP BY / HAVING
    grouping: Grouping,
}

impl UpdateQuery {
    pub fn new(config: Arc<BuilderConfig>, source: Source) -> Self {
        Self {
            config,
            source,
            sets: Vec::new(),
            joins: JoinList::new(),
            conditions: Condition::new(),
            grouping: Grouping::new(),
        }
    }

    /// Assign `column = value`. The value may be a nested query.
    pub fn set(mut self, column: &str, value: impl IntoOperand) -> Self {
        self.sets.push((column.to_string(), value.into_operand()));
        self
    }

    pub fn sets(&self) -> &[(String, Operand)] {
        &self.sets
    }

    /// Apply an operation by name.
    pub fn call(mut self, op: &str, args: Vec<Arg>) -> SqlResult<Self> {
        Self::registry().dispatch(&mut self, op, args)?;
        Ok(self)
    }

    /// The operation registry for UPDATE statements.
    pub fn registry() -> &'static Registry<UpdateQuery> {
        static REGISTRY: OnceLock<Registry<UpdateQuery>> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            let mut r = Registry::new();
            r.op("set", |q: &mut UpdateQuery, a| {
                let column = a.text("column")?;
                let value = a.operand("value")?;
                q.sets.push((column, value));
                Ok(())
            });
            registry::register_statement_ops(&mut r);
            registry::register_source(&mut r);
            registry::register_joins(&mut r);
            registry::register_where(&mut r);
            registry::register_grouping(&mut r);
            r
        })
    }

    /// Add every assignment in `sets` and execute.
    pub async fn update<E, I, K, V>(mut self, exec: &E, sets: I) -> SqlResult<u64>
    where
        E: Executor,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoOperand,
    {
        self.sets
            .extend(sets.into_iter().map(|(k, v)| (k.into(), v.into_operand())));
        self.execute(exec).await
    }
}

impl_filter_methods!(UpdateQuery);

impl Expression for UpdateQuery {
    fn write_sql(&self, w: &mut SqlWriter<'_>) {
        w.push("UPDATE ");
        self.source.write_sql(w);
        w.push(" SET ");
        for (i, (column, value)) in self.sets.iter().enumerate() {
            if i > 0 {
                w.push(", ");
            }
            w.push(column).push(" = ");
            value.write_sql(w);
        }
        self.joins.write_sql(w);
        write_where(&self.conditions, w);
        self.grouping.write_sql(w);
    }
}

impl Statement for UpdateQuery {
    fn config(&self) -> &BuilderConfig {
        &self.config
    }

    fn validate(&self) -> SqlResult<()> {
        if self.sets.is_empty() {
            return Err(SqlError::validation("UPDATE: SET clause cannot be empty"));
        }
        Ok(())
    }
}

impl MutationStatement for UpdateQuery {}
