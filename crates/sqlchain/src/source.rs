//! The FROM clause: a table, a nested query or a literal row set.

use crate::error::{SqlError, SqlResult};
use crate::expr::{IntoOperand, Operand};
use crate::query::SelectQuery;
use crate::writer::{Expression, SqlWriter};

/// What a statement reads from (or writes to).
#[derive(Debug, Clone)]
pub enum Source {
    /// `{table} [alias]`
    Table { name: String, alias: Option<String> },

    /// `(subquery) AS alias`
    Query {
        query: Box<SelectQuery>,
        alias: String,
    },

    /// `(VALUES (...), (...)) [AS alias[(col, ...)]]`
    Values {
        rows: Vec<Vec<Operand>>,
        alias: Option<String>,
        columns: Option<Vec<String>>,
    },
}

impl Source {
    pub fn table(name: impl Into<String>, alias: Option<&str>) -> Self {
        Source::Table {
            name: name.into(),
            alias: alias.map(str::to_string),
        }
    }

    /// A nested query. Derived tables must be named, so an empty alias is rejected.
    pub fn query(query: SelectQuery, alias: &str) -> SqlResult<Self> {
        let alias = alias.trim();
        if alias.is_empty() {
            return Err(SqlError::validation("a nested query source needs an alias"));
        }
        Ok(Source::Query {
            query: Box::new(query),
            alias: alias.to_string(),
        })
    }

    /// A literal row set.
    ///
    /// Rows must be non-empty and equally wide. Column aliases need a table alias and
    /// must name every column.
    pub fn values<R, T>(rows: R, alias: Option<&str>, columns: Option<&[&str]>) -> SqlResult<Self>
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = T>,
        T: IntoOperand,
    {
        let rows: Vec<Vec<Operand>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(IntoOperand::into_operand).collect())
            .collect();
        Self::values_from_operands(rows, alias, columns)
    }

    pub fn values_from_operands(
        rows: Vec<Vec<Operand>>,
        alias: Option<&str>,
        columns: Option<&[&str]>,
    ) -> SqlResult<Self> {
        let width = match rows.first() {
            Some(first) if !first.is_empty() => first.len(),
            _ => return Err(SqlError::validation("VALUES needs at least one non-empty row")),
        };
        if let Some(pos) = rows.iter().position(|row| row.len() != width) {
            return Err(SqlError::validation(format!(
                "VALUES row {pos} has {} columns, expected {width}",
                rows[pos].len()
            )));
        }
        if let Some(columns) = columns {
            if alias.is_none() {
                return Err(SqlError::validation(
                    "VALUES column aliases need a table alias",
                ));
            }
            if columns.len() != width {
                return Err(SqlError::validation(format!(
                    "VALUES has {width} columns but {} column aliases were given",
                    columns.len()
                )));
            }
        }
        Ok(Source::Values {
            rows,
            alias: alias.map(str::to_string),
            columns: columns.map(|cols| cols.iter().map(|c| c.to_string()).collect()),
        })
    }

    /// Table name for a `Table` source.
    pub fn table_name(&self) -> Option<&str> {
        match self {
            Source::Table { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl Expression for Source {
    fn write_sql(&self, w: &mut SqlWriter<'_>) {
        match self {
            Source::Table { name, alias } => {
                w.push_table(name);
                if let Some(alias) = alias {
                    w.push(" ").push(alias);
                }
            }
            Source::Query { query, alias } => {
                w.push_nested(query.as_ref()).push(" AS ").push(alias);
            }
            Source::Values {
                rows,
                alias,
                columns,
            } => {
                w.push("(VALUES ");
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        w.push(", ");
                    }
                    w.push("(");
                    for (j, cell) in row.iter().enumerate() {
                        if j > 0 {
                            w.push(", ");
                        }
                        cell.write_sql(w);
                    }
                    w.push(")");
                }
                w.push(")");
                if let Some(alias) = alias {
                    w.push(" AS ").push(alias);
                    if let Some(columns) = columns {
                        w.push("(").push(&columns.join(",")).push(")");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::GenericDialect;
    use crate::value::Value;
    use crate::writer::BuiltQuery;

    fn build(src: &Source) -> BuiltQuery {
        let dialect = GenericDialect;
        let mut w = SqlWriter::new(&dialect);
        src.write_sql(&mut w);
        w.finish()
    }

    #[test]
    fn test_table_with_alias() {
        assert_eq!(build(&Source::table("user", Some("u"))).sql, "{user} u");
        assert_eq!(build(&Source::table("user", None)).sql, "{user}");
        assert_eq!(Source::table("user", Some("u")).table_name(), Some("user"));
    }

    #[test]
    fn test_values_binds_scalars() {
        let src = Source::values(
            vec![vec![Value::from(1), Value::from("a")], vec![Value::from(2), Value::from("b")]],
            Some("t"),
            Some(&["id", "name"]),
        )
        .unwrap();
        let built = build(&src);
        assert_eq!(built.sql, "(VALUES (?, ?), (?, ?)) AS t(id,name)");
        assert_eq!(built.params.len(), 4);
    }

    #[test]
    fn test_values_validation() {
        let ragged = Source::values(vec![vec![1, 2], vec![3]], None, None);
        assert!(ragged.unwrap_err().is_validation());

        let empty: Vec<Vec<i32>> = Vec::new();
        assert!(Source::values(empty, None, None).is_err());

        let width = Source::values(vec![vec![1, 2]], Some("t"), Some(&["a"]));
        assert!(width.unwrap_err().to_string().contains("column aliases"));

        let no_alias = Source::values(vec![vec![1]], None, Some(&["a"]));
        assert!(no_alias.is_err());
    }
}
