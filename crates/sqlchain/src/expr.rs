//! Condition leaves and the OR group.
//!
//! Every node validates its input when it is constructed, so a bad operator is
//! reported by the call that introduced it rather than when the statement compiles.

use crate::dialect::LikeOptions;
use crate::error::{SqlError, SqlResult};
use crate::query::SelectQuery;
use crate::value::Value;
use crate::writer::{Expression, SqlWriter};
use chrono::{DateTime, Utc};
use std::fmt;

/// Comparison operators accepted by value and column comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl ComparisonOp {
    /// Parse an operator, normalizing `!=` to `<>`.
    pub fn parse(op: &str) -> SqlResult<Self> {
        match op.trim() {
            "=" => Ok(Self::Eq),
            "<>" | "!=" => Ok(Self::Ne),
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Le),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Ge),
            other => Err(SqlError::validation(format!(
                "Operator '{other}' is not supported (expected one of =, <>, !=, <, <=, >, >=)"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Right-hand side of a comparison: a bound scalar or a nested query.
#[derive(Debug, Clone)]
pub enum Operand {
    Value(Value),
    Query(Box<SelectQuery>),
}

impl Operand {
    fn write_to(&self, w: &mut SqlWriter<'_>) {
        match self {
            Operand::Value(v) => {
                w.push_bind(v.clone());
            }
            Operand::Query(q) => {
                w.push_nested(q.as_ref());
            }
        }
    }
}

impl Expression for Operand {
    fn write_sql(&self, w: &mut SqlWriter<'_>) {
        self.write_to(w);
    }
}

/// Conversion into an [`Operand`].
pub trait IntoOperand {
    fn into_operand(self) -> Operand;
}

impl IntoOperand for Operand {
    fn into_operand(self) -> Operand {
        self
    }
}

impl IntoOperand for SelectQuery {
    fn into_operand(self) -> Operand {
        Operand::Query(Box::new(self))
    }
}

impl<T: Into<Value>> IntoOperand for Option<T> {
    fn into_operand(self) -> Operand {
        Operand::Value(self.into())
    }
}

macro_rules! impl_into_operand {
    ($($t:ty),*) => {
        $(
            impl IntoOperand for $t {
                fn into_operand(self) -> Operand {
                    Operand::Value(self.into())
                }
            }
        )*
    };
}

impl_into_operand!(
    Value, bool, i8, i16, i32, i64, u8, u16, u32, f32, f64, &str, String, &String,
    serde_json::Value, DateTime<Utc>
);

/// Members of an `IN` test: a value list or a nested query.
#[derive(Debug, Clone)]
pub enum Members {
    List(Vec<Value>),
    Query(Box<SelectQuery>),
}

/// Conversion into [`Members`].
pub trait IntoMembers {
    fn into_members(self) -> Members;
}

impl IntoMembers for Members {
    fn into_members(self) -> Members {
        self
    }
}

impl IntoMembers for SelectQuery {
    fn into_members(self) -> Members {
        Members::Query(Box::new(self))
    }
}

impl<T: Into<Value>> IntoMembers for Vec<T> {
    fn into_members(self) -> Members {
        Members::List(self.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value> + Clone> IntoMembers for &[T] {
    fn into_members(self) -> Members {
        Members::List(self.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> IntoMembers for [T; N] {
    fn into_members(self) -> Members {
        Members::List(self.into_iter().map(Into::into).collect())
    }
}

/// A boolean condition node.
#[derive(Debug, Clone)]
pub enum Expr {
    /// `[NOT] column op value` or `[NOT] column op (subquery)`
    Compare {
        column: String,
        op: ComparisonOp,
        value: Operand,
        negate: bool,
    },

    /// `[NOT] column op othercolumn`, never binds.
    ColumnCompare {
        column: String,
        op: ComparisonOp,
        other: String,
        negate: bool,
    },

    /// `column IS [NOT] NULL`
    NullCheck { column: String, negated: bool },

    /// Pattern match rendered by the dialect.
    Like {
        column: String,
        pattern: String,
        options: LikeOptions,
        negate: bool,
    },

    /// Length-aware text equality rendered by the dialect.
    FullText {
        column: String,
        value: String,
        negate: bool,
    },

    /// `column [NOT] IN (...)`
    In {
        column: String,
        members: Members,
        negate: bool,
    },

    /// `(a OR b OR ...)`
    Or(Vec<Expr>),
}

impl Expr {
    /// Value comparison. Fails for operators outside `=, <>, !=, <, <=, >, >=`.
    pub fn compare(
        column: impl Into<String>,
        op: &str,
        value: impl IntoOperand,
        negate: bool,
    ) -> SqlResult<Self> {
        Ok(Expr::Compare {
            column: column.into(),
            op: ComparisonOp::parse(op)?,
            value: value.into_operand(),
            negate,
        })
    }

    /// Column-to-column comparison.
    pub fn column_compare(
        column: impl Into<String>,
        op: &str,
        other: impl Into<String>,
        negate: bool,
    ) -> SqlResult<Self> {
        Ok(Expr::ColumnCompare {
            column: column.into(),
            op: ComparisonOp::parse(op)?,
            other: other.into(),
            negate,
        })
    }

    pub fn is_null(column: impl Into<String>) -> Self {
        Expr::NullCheck {
            column: column.into(),
            negated: false,
        }
    }

    pub fn is_not_null(column: impl Into<String>) -> Self {
        Expr::NullCheck {
            column: column.into(),
            negated: true,
        }
    }

    pub fn like(
        column: impl Into<String>,
        pattern: impl Into<String>,
        options: LikeOptions,
        negate: bool,
    ) -> Self {
        Expr::Like {
            column: column.into(),
            pattern: pattern.into(),
            options,
            negate,
        }
    }

    pub fn fulltext(column: impl Into<String>, value: impl Into<String>, negate: bool) -> Self {
        Expr::FullText {
            column: column.into(),
            value: value.into(),
            negate,
        }
    }

    pub fn in_members(column: impl Into<String>, members: impl IntoMembers, negate: bool) -> Self {
        Expr::In {
            column: column.into(),
            members: members.into_members(),
            negate,
        }
    }

    /// OR-combine `older` and `newer`, keeping left-to-right order and flattening
    /// existing OR groups on either side.
    pub fn or_pair(older: Expr, newer: Expr) -> Self {
        let mut items = match older {
            Expr::Or(items) => items,
            other => vec![other],
        };
        match newer {
            Expr::Or(more) => items.extend(more),
            other => items.push(other),
        }
        Expr::Or(items)
    }

    /// Whether this node is an OR group.
    pub fn is_or(&self) -> bool {
        matches!(self, Expr::Or(_))
    }
}

impl Expression for Expr {
    fn write_sql(&self, w: &mut SqlWriter<'_>) {
        match self {
            Expr::Compare {
                column,
                op,
                value,
                negate,
            } => {
                if *negate {
                    w.push("NOT ");
                }
                w.push(column).push(" ").push(op.as_str()).push(" ");
                value.write_to(w);
            }
            Expr::ColumnCompare {
                column,
                op,
                other,
                negate,
            } => {
                if *negate {
                    w.push("NOT ");
                }
                w.push(column).push(" ").push(op.as_str()).push(" ").push(other);
            }
            Expr::NullCheck { column, negated } => {
                w.push(column);
                w.push(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            Expr::Like {
                column,
                pattern,
                options,
                negate,
            } => {
                let dialect = w.dialect();
                let bound = if options.escape {
                    dialect.like_escape(pattern, &options.escape_string)
                } else {
                    pattern.clone()
                };
                dialect.write_like(w, column, Value::Text(bound), options, *negate);
            }
            Expr::FullText {
                column,
                value,
                negate,
            } => {
                if *negate {
                    w.push("NOT ");
                }
                let lhs = w.dialect().compare_text(column, value.chars().count());
                w.push(&lhs).push(" = ").push_bind(Value::Text(value.clone()));
            }
            Expr::In {
                column,
                members,
                negate,
            } => {
                let keyword = if *negate { " NOT IN (" } else { " IN (" };
                match members {
                    Members::List(values) if values.is_empty() => {
                        let fragment = w.dialect().empty_in(*negate);
                        w.push(fragment);
                    }
                    Members::List(values) => {
                        w.push(column).push(keyword);
                        w.push_bind_list(values.iter().cloned());
                        w.push(")");
                    }
                    Members::Query(q) => {
                        w.push(column).push(keyword);
                        q.write_sql(w);
                        w.push(")");
                    }
                }
            }
            Expr::Or(items) => {
                w.push("(");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        w.push(" OR ");
                    }
                    item.write_sql(w);
                }
                w.push(")");
            }
        }
    }
}
