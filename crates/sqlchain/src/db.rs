//! Statement factory.

use crate::config::BuilderConfig;
use crate::error::SqlResult;
use crate::expr::IntoOperand;
use crate::query::{DeleteQuery, SelectQuery, UpdateQuery};
use crate::source::Source;
use std::sync::Arc;

/// Creates statements that share one [`BuilderConfig`].
///
/// ```ignore
/// let db = Db::postgres();
/// let active = db
///     .table_as("user", "u")
///     .where_("u.deleted", "=", 0)?
///     .where_currently_active("u.timestart", "u.timeend");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Db {
    config: Arc<BuilderConfig>,
}

impl Db {
    /// A factory with the default configuration (generic `{table}` / `?` output).
    ///
    /// Use [`Db::postgres`] for statements run through the PostgreSQL executors.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BuilderConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// A factory rendering for PostgreSQL.
    pub fn postgres() -> Self {
        Self::with_config(BuilderConfig::postgres())
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// `SELECT ... FROM table`
    pub fn table(&self, name: &str) -> SelectQuery {
        SelectQuery::new(Arc::clone(&self.config), Source::table(name, None))
    }

    /// `SELECT ... FROM table alias`
    pub fn table_as(&self, name: &str, alias: &str) -> SelectQuery {
        SelectQuery::new(Arc::clone(&self.config), Source::table(name, Some(alias)))
    }

    /// `SELECT ... FROM (query) AS alias`
    pub fn from_query(&self, query: SelectQuery, alias: &str) -> SqlResult<SelectQuery> {
        let source = Source::query(query, alias)?;
        Ok(SelectQuery::new(Arc::clone(&self.config), source))
    }

    /// `SELECT ... FROM (VALUES ...) AS alias(columns)`
    pub fn from_values<R, T>(
        &self,
        rows: R,
        alias: Option<&str>,
        columns: Option<&[&str]>,
    ) -> SqlResult<SelectQuery>
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = T>,
        T: IntoOperand,
    {
        let source = Source::values(rows, alias, columns)?;
        Ok(SelectQuery::new(Arc::clone(&self.config), source))
    }

    /// `UPDATE table SET ...`
    pub fn update(&self, name: &str) -> UpdateQuery {
        UpdateQuery::new(Arc::clone(&self.config), Source::table(name, None))
    }

    pub fn update_as(&self, name: &str, alias: &str) -> UpdateQuery {
        UpdateQuery::new(Arc::clone(&self.config), Source::table(name, Some(alias)))
    }

    /// `DELETE FROM table ...`
    pub fn delete(&self, name: &str) -> DeleteQuery {
        DeleteQuery::new(Arc::clone(&self.config), Source::table(name, None))
    }

    pub fn delete_as(&self, name: &str, alias: &str) -> DeleteQuery {
        DeleteQuery::new(Arc::clone(&self.config), Source::table(name, Some(alias)))
    }
}
