//! Executor trait: where compiled statements are sent.

use crate::error::{SqlError, SqlResult};
use crate::value::Value;
use tokio_postgres::types::ToSql;

/// Runs compiled SQL with its bound parameters.
///
/// Implemented for `tokio_postgres` clients and transactions (and pooled `deadpool`
/// clients with the `pool` feature). Errors are returned unchanged.
///
/// The PostgreSQL implementations expect `"table"` and `$n` placeholders, so statements
/// for them come from [`Db::postgres`](crate::Db::postgres).
pub trait Executor: Send + Sync {
    /// Row type produced by queries.
    type Row: Send;

    /// Run a query and return all rows.
    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = SqlResult<Vec<Self::Row>>> + Send;

    /// Run a statement and return the number of affected rows.
    fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = SqlResult<u64>> + Send;
}

fn as_sql_params(params: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    params.iter().map(|p| p as &(dyn ToSql + Sync)).collect()
}

impl Executor for tokio_postgres::Client {
    type Row = tokio_postgres::Row;

    async fn query(&self, sql: &str, params: &[Value]) -> SqlResult<Vec<Self::Row>> {
        let params = as_sql_params(params);
        tokio_postgres::Client::query(self, sql, &params)
            .await
            .map_err(SqlError::from_db_error)
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> SqlResult<u64> {
        let params = as_sql_params(params);
        tokio_postgres::Client::execute(self, sql, &params)
            .await
            .map_err(SqlError::from_db_error)
    }
}

impl Executor for tokio_postgres::Transaction<'_> {
    type Row = tokio_postgres::Row;

    async fn query(&self, sql: &str, params: &[Value]) -> SqlResult<Vec<Self::Row>> {
        let params = as_sql_params(params);
        tokio_postgres::Transaction::query(self, sql, &params)
            .await
            .map_err(SqlError::from_db_error)
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> SqlResult<u64> {
        let params = as_sql_params(params);
        tokio_postgres::Transaction::execute(self, sql, &params)
            .await
            .map_err(SqlError::from_db_error)
    }
}

#[cfg(feature = "pool")]
impl Executor for deadpool_postgres::Client {
    type Row = tokio_postgres::Row;

    async fn query(&self, sql: &str, params: &[Value]) -> SqlResult<Vec<Self::Row>> {
        // Delegate to the deref target (ClientWrapper / tokio_postgres::Client).
        let client: &tokio_postgres::Client = self;
        Executor::query(client, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> SqlResult<u64> {
        let client: &tokio_postgres::Client = self;
        Executor::execute(client, sql, params).await
    }
}

impl<E: Executor> Executor for &E {
    type Row = E::Row;

    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = SqlResult<Vec<Self::Row>>> + Send {
        (**self).query(sql, params)
    }

    fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = SqlResult<u64>> + Send {
        (**self).execute(sql, params)
    }
}
