//! Convenient imports for typical `sqlchain` usage.
//!
//! ```ignore
//! use sqlchain::prelude::*;
//! ```

pub use crate::{
    BuilderConfig, Db, Executor, JoinKind, LikeOptions, MutationStatement, SqlError, SqlResult,
    Statement, Value, args,
};
