//! # sqlchain
//!
//! A fluent SQL statement builder with positional parameter binding.
//!
//! ## Features
//!
//! - **Positional binding**: every placeholder is emitted together with its value, so
//!   the Nth placeholder always matches the Nth parameter, through nested queries and
//!   OR-folded conditions alike
//! - **Fail fast**: unsupported operators and malformed sources are rejected by the
//!   call that introduced them
//! - **Dialects**: `{table}` / `?` host-substituted SQL or PostgreSQL `"table"` / `$n`
//! - **Safe defaults**: DELETE requires WHERE, UPDATE requires SET
//! - **Dynamic surface**: every fluent operation is also callable by name
//!
//! ## Usage
//!
//! ```ignore
//! use sqlchain::prelude::*;
//!
//! // PostgreSQL executors need `"table"` / `$n` output; `Db::new()` renders the
//! // generic `{table}` / `?` form for host-side substitution.
//! let db = Db::postgres();
//!
//! // SELECT
//! let q = db
//!     .table("users")
//!     .where_("deleted", "=", 0)?
//!     .or_where("suspended", "=", 1)?
//!     .order_desc("email")
//!     .limit(10);
//! let rows = q.get(&client).await?;
//!
//! // Subqueries as values, sources and IN members
//! let admins = db.table("role_assignments").select("userid").where_("roleid", "=", 1)?;
//! let q = db.table("user").where_in("id", admins);
//!
//! // UPDATE
//! db.update("users")
//!     .set("status", "inactive")
//!     .where_("id", "=", user_id)?
//!     .execute(&client)
//!     .await?;
//!
//! // DELETE
//! db.delete("sessions")
//!     .where_("expires", "<", now)?
//!     .execute(&client)
//!     .await?;
//! ```

pub mod client;
pub mod clock;
pub mod condition;
pub mod config;
pub mod db;
pub mod dialect;
pub mod error;
pub mod expr;
pub mod grouping;
pub mod join;
pub mod ordering;
pub mod pagination;
pub mod prelude;
pub mod query;
pub mod selection;
pub mod source;
pub mod value;
pub mod writer;

pub use client::Executor;
pub use clock::{Clock, FixedClock, SystemClock};
pub use condition::Condition;
pub use config::BuilderConfig;
pub use db::Db;
pub use dialect::{Dialect, GenericDialect, LikeOptions, PostgresDialect};
pub use error::{SqlError, SqlResult};
pub use expr::{ComparisonOp, Expr, IntoMembers, IntoOperand, Members, Operand};
pub use join::{JoinKind, JoinTarget};
pub use query::{
    Arg, Args, DeleteQuery, MutationStatement, Registry, SelectQuery, Statement, UpdateQuery,
};
pub use selection::Aggregation;
pub use source::Source;
pub use value::Value;
pub use writer::{BuiltQuery, Expression, SqlWriter};

/// Create a SELECT over `name` with the default configuration.
///
/// # Example
/// ```ignore
/// let sql = sqlchain::table("users").where_("id", "=", 1)?.to_sql();
/// ```
pub fn table(name: &str) -> SelectQuery {
    Db::new().table(name)
}
