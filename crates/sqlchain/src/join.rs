//! JOIN clauses.

use crate::condition::Condition;
use crate::error::{SqlError, SqlResult};
use crate::query::SelectQuery;
use crate::writer::{Expression, SqlWriter};

/// Join flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

/// The joined relation: a table or a nested query.
#[derive(Debug, Clone)]
pub enum JoinTarget {
    Table(String),
    Query(Box<SelectQuery>),
}

impl From<&str> for JoinTarget {
    fn from(name: &str) -> Self {
        JoinTarget::Table(name.to_string())
    }
}

impl From<String> for JoinTarget {
    fn from(name: String) -> Self {
        JoinTarget::Table(name)
    }
}

impl From<SelectQuery> for JoinTarget {
    fn from(query: SelectQuery) -> Self {
        JoinTarget::Query(Box::new(query))
    }
}

/// One JOIN entry.
#[derive(Debug, Clone)]
pub struct Join {
    pub target: JoinTarget,
    pub kind: JoinKind,
    pub on: Condition,
    pub alias: Option<String>,
}

impl Join {
    /// Build a join, rejecting shapes that cannot be rendered: a nested query
    /// without an alias, or a non-CROSS join without an ON condition.
    pub fn new(
        kind: JoinKind,
        target: impl Into<JoinTarget>,
        alias: Option<&str>,
        on: Condition,
    ) -> SqlResult<Self> {
        let target = target.into();
        let alias = alias.map(str::trim).filter(|a| !a.is_empty());
        if matches!(target, JoinTarget::Query(_)) && alias.is_none() {
            return Err(SqlError::validation(format!(
                "{}: a nested query source requires an alias",
                kind.as_str()
            )));
        }
        if kind != JoinKind::Cross && on.has_no_conditions() {
            return Err(SqlError::validation(format!(
                "{}: an ON condition is required",
                kind.as_str()
            )));
        }
        Ok(Self {
            target,
            kind,
            on,
            alias: alias.map(str::to_string),
        })
    }
}

impl Expression for Join {
    fn write_sql(&self, w: &mut SqlWriter<'_>) {
        w.push(" ").push(self.kind.as_str()).push(" ");
        match &self.target {
            JoinTarget::Table(name) => {
                w.push_table(name);
            }
            JoinTarget::Query(q) => {
                w.push_nested(q.as_ref());
            }
        }
        if let Some(alias) = &self.alias {
            w.push(" ").push(alias);
        }
        if self.kind != JoinKind::Cross && !self.on.has_no_conditions() {
            w.push(" ON ");
            self.on.write_sql(w);
        }
    }
}

/// Ordered list of joins.
#[derive(Debug, Clone, Default)]
pub struct JoinList {
    joins: Vec<Join>,
}

impl JoinList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.joins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joins.is_empty()
    }

    fn push(&mut self, join: Join) -> &mut Self {
        self.joins.push(join);
        self
    }

    /// Join on `left op right`, both sides being columns.
    pub fn join_on_columns(
        &mut self,
        kind: JoinKind,
        target: impl Into<JoinTarget>,
        alias: Option<&str>,
        (left, op, right): (&str, &str, &str),
    ) -> SqlResult<&mut Self> {
        let mut on = Condition::new();
        on.where_column(left, op, right)?;
        Ok(self.push(Join::new(kind, target, alias, on)?))
    }

    /// Join on a condition built by `build` from a fresh [`Condition`].
    pub fn join_with<F>(
        &mut self,
        kind: JoinKind,
        target: impl Into<JoinTarget>,
        alias: Option<&str>,
        build: F,
    ) -> SqlResult<&mut Self>
    where
        F: FnOnce(&mut Condition) -> SqlResult<()>,
    {
        let mut on = Condition::new();
        build(&mut on)?;
        Ok(self.push(Join::new(kind, target, alias, on)?))
    }

    pub fn cross_join(
        &mut self,
        target: impl Into<JoinTarget>,
        alias: Option<&str>,
    ) -> SqlResult<&mut Self> {
        Ok(self.push(Join::new(JoinKind::Cross, target, alias, Condition::new())?))
    }
}

impl Expression for JoinList {
    fn write_sql(&self, w: &mut SqlWriter<'_>) {
        for join in &self.joins {
            join.write_sql(w);
        }
    }
}
