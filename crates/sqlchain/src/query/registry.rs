//! Name-based dispatch of statement operations.
//!
//! Each statement type builds one [`Registry`] on first use. Operation names map to
//! handlers bound to the part that owns them; when two parts expose the same name the
//! first registration wins.

use super::{SelectQuery, StatementParts};
use crate::dialect::LikeOptions;
use crate::error::{SqlError, SqlResult};
use crate::expr::{Members, Operand};
use crate::join::{JoinKind, JoinTarget};
use crate::source::Source;
use crate::value::Value;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

/// A dynamically passed argument.
#[derive(Debug, Clone)]
pub enum Arg {
    /// Identifiers and text values.
    Text(String),
    Value(Value),
    /// A value list (for `IN`).
    Values(Vec<Value>),
    Query(Box<SelectQuery>),
    Like(LikeOptions),
    /// An explicitly absent optional argument.
    Null,
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Text(s.to_string())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Text(s)
    }
}

impl From<Value> for Arg {
    fn from(v: Value) -> Self {
        Arg::Value(v)
    }
}

impl From<SelectQuery> for Arg {
    fn from(q: SelectQuery) -> Self {
        Arg::Query(Box::new(q))
    }
}

impl From<LikeOptions> for Arg {
    fn from(o: LikeOptions) -> Self {
        Arg::Like(o)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Arg {
    fn from(values: Vec<T>) -> Self {
        Arg::Values(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Arg {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => Arg::Value(v.into()),
            None => Arg::Null,
        }
    }
}

macro_rules! impl_arg_from_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Arg {
                fn from(v: $t) -> Self {
                    Arg::Value(v.into())
                }
            }
        )*
    };
}

impl_arg_from_value!(bool, i8, i16, i32, i64, u8, u16, u32, f32, f64);

/// Build a `Vec<Arg>` from heterogeneous values.
///
/// ```ignore
/// let q = db.table("users").call("where", args!["deleted", "=", 0])?;
/// ```
#[macro_export]
macro_rules! args {
    () => { Vec::<$crate::Arg>::new() };
    ($($arg:expr),+ $(,)?) => {
        vec![$($crate::Arg::from($arg)),+]
    };
}

/// Cursor over the arguments of one dynamic call.
#[derive(Debug)]
pub struct Args {
    op: String,
    items: VecDeque<Arg>,
    position: usize,
}

impl Args {
    pub fn new(op: &str, args: Vec<Arg>) -> Self {
        Self {
            op: op.to_string(),
            items: args.into(),
            position: 0,
        }
    }

    fn next(&mut self) -> Option<Arg> {
        let arg = self.items.pop_front();
        if arg.is_some() {
            self.position += 1;
        }
        arg
    }

    fn missing(&self, what: &str) -> SqlError {
        SqlError::validation(format!(
            "'{}' expects {what} as argument {}",
            self.op,
            self.position + 1
        ))
    }

    fn wrong(&self, what: &str, got: &Arg) -> SqlError {
        SqlError::validation(format!(
            "'{}' expects {what} as argument {}, got {got:?}",
            self.op, self.position
        ))
    }

    /// A required identifier or text.
    pub fn text(&mut self, what: &str) -> SqlResult<String> {
        match self.next() {
            Some(Arg::Text(s)) | Some(Arg::Value(Value::Text(s))) => Ok(s),
            Some(other) => Err(self.wrong(what, &other)),
            None => Err(self.missing(what)),
        }
    }

    /// An optional trailing text. Absent and [`Arg::Null`] both give `None`.
    pub fn opt_text(&mut self) -> SqlResult<Option<String>> {
        match self.items.front() {
            None => Ok(None),
            Some(Arg::Null) => {
                self.next();
                Ok(None)
            }
            Some(_) => self.text("text").map(Some),
        }
    }

    /// All remaining arguments as text; at least one is required.
    pub fn rest_texts(&mut self, what: &str) -> SqlResult<Vec<String>> {
        let mut out = Vec::new();
        while !self.items.is_empty() {
            out.push(self.text(what)?);
        }
        if out.is_empty() {
            return Err(self.missing(what));
        }
        Ok(out)
    }

    /// A scalar value.
    pub fn value(&mut self, what: &str) -> SqlResult<Value> {
        match self.next() {
            Some(Arg::Value(v)) => Ok(v),
            Some(Arg::Text(s)) => Ok(Value::Text(s)),
            Some(Arg::Null) => Ok(Value::Null),
            Some(other) => Err(self.wrong(what, &other)),
            None => Err(self.missing(what)),
        }
    }

    /// A scalar or a nested query.
    pub fn operand(&mut self, what: &str) -> SqlResult<Operand> {
        match self.items.front() {
            Some(Arg::Query(_)) => match self.next() {
                Some(Arg::Query(q)) => Ok(Operand::Query(q)),
                _ => Err(self.missing(what)),
            },
            _ => self.value(what).map(Operand::Value),
        }
    }

    /// A value list or a nested query.
    pub fn members(&mut self, what: &str) -> SqlResult<Members> {
        match self.next() {
            Some(Arg::Values(values)) => Ok(Members::List(values)),
            Some(Arg::Query(q)) => Ok(Members::Query(q)),
            Some(other) => Err(self.wrong(what, &other)),
            None => Err(self.missing(what)),
        }
    }

    /// A non-negative integer.
    pub fn count(&mut self, what: &str) -> SqlResult<u64> {
        match self.next() {
            Some(Arg::Value(Value::Int(n))) if n >= 0 => Ok(n as u64),
            Some(other) => Err(self.wrong(what, &other)),
            None => Err(self.missing(what)),
        }
    }

    /// Optional trailing [`LikeOptions`].
    pub fn opt_like(&mut self) -> SqlResult<Option<LikeOptions>> {
        match self.next() {
            None | Some(Arg::Null) => Ok(None),
            Some(Arg::Like(options)) => Ok(Some(options)),
            Some(other) => Err(self.wrong("like options", &other)),
        }
    }

    /// A table name or a nested query.
    pub fn join_target(&mut self) -> SqlResult<JoinTarget> {
        match self.next() {
            Some(Arg::Text(name)) => Ok(JoinTarget::Table(name)),
            Some(Arg::Query(q)) => Ok(JoinTarget::Query(q)),
            Some(other) => Err(self.wrong("a table or query", &other)),
            None => Err(self.missing("a table or query")),
        }
    }

    /// Fail if arguments are left over.
    pub fn finish(self) -> SqlResult<()> {
        if self.items.is_empty() {
            Ok(())
        } else {
            Err(SqlError::validation(format!(
                "'{}' got {} unexpected trailing argument(s)",
                self.op,
                self.items.len()
            )))
        }
    }
}

type Handler<S> = Box<dyn Fn(&mut S, &mut Args) -> SqlResult<()> + Send + Sync>;

/// Operation name to handler map for one statement type.
pub struct Registry<S> {
    handlers: HashMap<&'static str, Handler<S>>,
    names: Vec<&'static str>,
}

impl<S> Default for Registry<S> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
            names: Vec::new(),
        }
    }
}

impl<S> fmt::Debug for Registry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry").field("operations", &self.names).finish()
    }
}

impl<S> Registry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name`. Ignored when the name is already taken.
    pub fn op<F>(&mut self, name: &'static str, handler: F) -> &mut Self
    where
        F: Fn(&mut S, &mut Args) -> SqlResult<()> + Send + Sync + 'static,
    {
        if !self.handlers.contains_key(name) {
            self.handlers.insert(name, Box::new(handler));
            self.names.push(name);
        }
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names in registration order.
    pub fn operations(&self) -> &[&'static str] {
        &self.names
    }

    /// Run `op` against `target`.
    pub fn dispatch(&self, target: &mut S, op: &str, args: Vec<Arg>) -> SqlResult<()> {
        let handler = self
            .handlers
            .get(op)
            .ok_or_else(|| SqlError::unknown_operation(op))?;
        let mut args = Args::new(op, args);
        handler(target, &mut args)?;
        args.finish()
    }
}

// ==================== Shared registrations ====================

pub(crate) fn register_statement_ops<S: StatementParts + 'static>(r: &mut Registry<S>) {
    r.op("where_currently_active", |s, a| {
        let start = a.text("start column")?;
        let end = a.text("end column")?;
        let clock = Arc::clone(&s.builder_config().clock);
        s.conditions_mut()
            .where_currently_active(&start, &end, clock.as_ref());
        Ok(())
    });
}

pub(crate) fn register_source<S: StatementParts + 'static>(r: &mut Registry<S>) {
    r.op("from", |s, a| {
        let source = match a.join_target()? {
            JoinTarget::Table(name) => {
                let alias = a.opt_text()?;
                Source::table(name, alias.as_deref())
            }
            JoinTarget::Query(q) => {
                let alias = a.text("alias")?;
                Source::query(*q, &alias)?
            }
        };
        *s.source_mut() = source;
        Ok(())
    });
}

fn join_columns<S: StatementParts>(kind: JoinKind, s: &mut S, a: &mut Args) -> SqlResult<()> {
    let target = a.join_target()?;
    let left = a.text("left column")?;
    let op = a.text("operator")?;
    let right = a.text("right column")?;
    let alias = a.opt_text()?;
    s.joins_mut()
        .join_on_columns(kind, target, alias.as_deref(), (left.as_str(), op.as_str(), right.as_str()))?;
    Ok(())
}

pub(crate) fn register_joins<S: StatementParts + 'static>(r: &mut Registry<S>) {
    r.op("join", |s, a| join_columns(JoinKind::Inner, s, a))
        .op("left_join", |s, a| join_columns(JoinKind::Left, s, a))
        .op("right_join", |s, a| join_columns(JoinKind::Right, s, a))
        .op("full_join", |s, a| join_columns(JoinKind::Full, s, a))
        .op("cross_join", |s, a| {
            let target = a.join_target()?;
            let alias = a.opt_text()?;
            s.joins_mut().cross_join(target, alias.as_deref())?;
            Ok(())
        });
}

pub(crate) fn register_where<S: StatementParts + 'static>(r: &mut Registry<S>) {
    r.op("where", |s, a| {
        let (column, op, value) = (a.text("column")?, a.text("operator")?, a.operand("value")?);
        s.conditions_mut().where_(&column, &op, value)?;
        Ok(())
    })
    .op("or_where", |s, a| {
        let (column, op, value) = (a.text("column")?, a.text("operator")?, a.operand("value")?);
        s.conditions_mut().or_where(&column, &op, value)?;
        Ok(())
    })
    .op("where_not", |s, a| {
        let (column, op, value) = (a.text("column")?, a.text("operator")?, a.operand("value")?);
        s.conditions_mut().where_not(&column, &op, value)?;
        Ok(())
    })
    .op("or_where_not", |s, a| {
        let (column, op, value) = (a.text("column")?, a.text("operator")?, a.operand("value")?);
        s.conditions_mut().or_where_not(&column, &op, value)?;
        Ok(())
    })
    .op("where_column", |s, a| {
        let (column, op, other) = (a.text("column")?, a.text("operator")?, a.text("column")?);
        s.conditions_mut().where_column(&column, &op, &other)?;
        Ok(())
    })
    .op("or_where_column", |s, a| {
        let (column, op, other) = (a.text("column")?, a.text("operator")?, a.text("column")?);
        s.conditions_mut().or_where_column(&column, &op, &other)?;
        Ok(())
    })
    .op("where_like", |s, a| {
        let (column, pattern, options) = (a.text("column")?, a.text("pattern")?, a.opt_like()?);
        s.conditions_mut().where_like(&column, &pattern, options);
        Ok(())
    })
    .op("where_not_like", |s, a| {
        let (column, pattern, options) = (a.text("column")?, a.text("pattern")?, a.opt_like()?);
        s.conditions_mut().where_not_like(&column, &pattern, options);
        Ok(())
    })
    .op("where_fulltext", |s, a| {
        let (column, value) = (a.text("column")?, a.text("value")?);
        s.conditions_mut().where_fulltext(&column, &value);
        Ok(())
    })
    .op("where_fulltext_not", |s, a| {
        let (column, value) = (a.text("column")?, a.text("value")?);
        s.conditions_mut().where_fulltext_not(&column, &value);
        Ok(())
    })
    .op("where_null", |s, a| {
        let column = a.text("column")?;
        s.conditions_mut().where_null(&column);
        Ok(())
    })
    .op("or_where_null", |s, a| {
        let column = a.text("column")?;
        s.conditions_mut().or_where_null(&column);
        Ok(())
    })
    .op("where_notnull", |s, a| {
        let column = a.text("column")?;
        s.conditions_mut().where_notnull(&column);
        Ok(())
    })
    .op("or_where_notnull", |s, a| {
        let column = a.text("column")?;
        s.conditions_mut().or_where_notnull(&column);
        Ok(())
    })
    .op("where_in", |s, a| {
        let (column, members) = (a.text("column")?, a.members("values or query")?);
        s.conditions_mut().where_in(&column, members);
        Ok(())
    })
    .op("where_not_in", |s, a| {
        let (column, members) = (a.text("column")?, a.members("values or query")?);
        s.conditions_mut().where_not_in(&column, members);
        Ok(())
    })
    .op("combine_last_two_by_or", |s, _| {
        s.conditions_mut().combine_last_two_by_or();
        Ok(())
    });
}

pub(crate) fn register_grouping<S: StatementParts + 'static>(r: &mut Registry<S>) {
    r.op("group_by", |s, a| {
        let columns = a.rest_texts("column")?;
        let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
        s.grouping_mut().group_by(&columns);
        Ok(())
    })
    .op("having", |s, a| {
        let (column, op, value) = (a.text("column")?, a.text("operator")?, a.operand("value")?);
        s.grouping_mut().having(&column, &op, value)?;
        Ok(())
    })
    .op("or_having", |s, a| {
        let (column, op, value) = (a.text("column")?, a.text("operator")?, a.operand("value")?);
        s.grouping_mut().or_having(&column, &op, value)?;
        Ok(())
    })
    .op("having_not", |s, a| {
        let (column, op, value) = (a.text("column")?, a.text("operator")?, a.operand("value")?);
        s.grouping_mut().having_not(&column, &op, value)?;
        Ok(())
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_registration_wins() {
        let mut r: Registry<Vec<&'static str>> = Registry::new();
        r.op("touch", |v, _| {
            v.push("first");
            Ok(())
        })
        .op("touch", |v, _| {
            v.push("second");
            Ok(())
        });

        let mut log = Vec::new();
        r.dispatch(&mut log, "touch", Vec::new()).unwrap();
        assert_eq!(log, vec!["first"]);
        assert_eq!(r.operations(), &["touch"]);
    }

    #[test]
    fn test_unknown_operation() {
        let r: Registry<()> = Registry::new();
        let err = r.dispatch(&mut (), "frobnicate", Vec::new()).unwrap_err();
        assert!(err.is_unknown_operation());
        assert!(err.to_string().contains("frobnicate"));
    }

    #[test]
    fn test_args_cursor() {
        let mut a = Args::new("select", vec![Arg::from("id"), Arg::Null]);
        assert_eq!(a.text("column").unwrap(), "id");
        assert_eq!(a.opt_text().unwrap(), None);
        a.finish().unwrap();
    }

    #[test]
    fn test_args_shape_errors() {
        let mut a = Args::new("limit", vec![Arg::from("ten")]);
        assert!(a.count("limit").unwrap_err().is_validation());

        let mut a = Args::new("limit", Vec::new());
        let err = a.count("limit").unwrap_err();
        assert!(err.to_string().contains("argument 1"));

        let a = Args::new("distinct", vec![Arg::from(1)]);
        assert!(a.finish().is_err());
    }

    #[test]
    fn test_operand_accepts_nested_query() {
        let q = crate::Db::new().table("user");
        let mut a = Args::new("where", vec![Arg::from(q)]);
        assert!(matches!(a.operand("value").unwrap(), Operand::Query(_)));
    }
}
