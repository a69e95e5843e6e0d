//! SELECT column list and aggregates.

use crate::writer::{Expression, SqlWriter};
use std::fmt;

/// Aggregate functions usable in a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    Max,
    Min,
    Avg,
    Sum,
    Count,
}

impl Aggregation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregation::Max => "MAX",
            Aggregation::Min => "MIN",
            Aggregation::Avg => "AVG",
            Aggregation::Sum => "SUM",
            Aggregation::Count => "COUNT",
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the column list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    Plain {
        name: String,
        alias: Option<String>,
    },
    Aggregate {
        kind: Aggregation,
        name: String,
        alias: Option<String>,
    },
    All,
}

impl Column {
    /// Standalone columns replace the whole list instead of appending to it.
    pub fn is_standalone(&self) -> bool {
        !matches!(self, Column::Plain { .. })
    }
}

impl Expression for Column {
    fn write_sql(&self, w: &mut SqlWriter<'_>) {
        match self {
            Column::Plain { name, alias: None } => {
                w.push(name);
            }
            Column::Plain {
                name,
                alias: Some(alias),
            } => {
                w.push("(").push(name).push(") AS ").push(alias);
            }
            Column::Aggregate { kind, name, alias } => {
                w.push(kind.as_str()).push("(").push(name).push(")");
                if let Some(alias) = alias {
                    w.push(" AS ").push(alias);
                }
            }
            Column::All => {
                w.push("*");
            }
        }
    }
}

/// The SELECT clause.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    columns: Vec<Column>,
    distinct: bool,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    /// Append a plain column.
    pub fn select(&mut self, name: &str, alias: Option<&str>) -> &mut Self {
        if matches!(self.columns.as_slice(), [Column::All]) {
            self.columns.clear();
        }
        self.columns.push(Column::Plain {
            name: name.to_string(),
            alias: alias.map(str::to_string),
        });
        self
    }

    pub fn select_all(&mut self) -> &mut Self {
        self.replace(Column::All)
    }

    /// `COUNT(1)`, or `COUNT(1) AS alias`.
    pub fn select_count(&mut self, alias: Option<&str>) -> &mut Self {
        self.aggregate(Aggregation::Count, "1", alias)
    }

    pub fn select_max(&mut self, name: &str, alias: Option<&str>) -> &mut Self {
        self.aggregate(Aggregation::Max, name, alias)
    }

    pub fn select_min(&mut self, name: &str, alias: Option<&str>) -> &mut Self {
        self.aggregate(Aggregation::Min, name, alias)
    }

    pub fn select_sum(&mut self, name: &str, alias: Option<&str>) -> &mut Self {
        self.aggregate(Aggregation::Sum, name, alias)
    }

    pub fn select_avg(&mut self, name: &str, alias: Option<&str>) -> &mut Self {
        self.aggregate(Aggregation::Avg, name, alias)
    }

    pub fn distinct(&mut self) -> &mut Self {
        self.distinct = true;
        self
    }

    fn aggregate(&mut self, kind: Aggregation, name: &str, alias: Option<&str>) -> &mut Self {
        self.replace(Column::Aggregate {
            kind,
            name: name.to_string(),
            alias: alias.map(str::to_string),
        })
    }

    fn replace(&mut self, column: Column) -> &mut Self {
        let discarded = self
            .columns
            .iter()
            .filter(|c| !c.is_standalone())
            .count();
        if discarded > 0 {
            tracing::warn!(
                target: "sqlchain.sql",
                discarded,
                "standalone selection replaces previously selected columns"
            );
        }
        self.columns.clear();
        self.columns.push(column);
        self
    }
}

impl Expression for Selection {
    fn write_sql(&self, w: &mut SqlWriter<'_>) {
        w.push("SELECT ");
        if self.distinct {
            w.push("DISTINCT ");
        }
        if self.columns.is_empty() {
            w.push("*");
            return;
        }
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                w.push(", ");
            }
            col.write_sql(w);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::GenericDialect;

    fn sql(sel: &Selection) -> String {
        let dialect = GenericDialect;
        let mut w = SqlWriter::new(&dialect);
        sel.write_sql(&mut w);
        w.finish().sql
    }

    #[test]
    fn test_empty_is_star_without_mutation() {
        let sel = Selection::new();
        assert_eq!(sql(&sel), "SELECT *");
        assert!(sel.columns().is_empty());
    }

    #[test]
    fn test_plain_and_aliased() {
        let mut sel = Selection::new();
        sel.select("id", None).select("firstname", Some("name"));
        assert_eq!(sql(&sel), "SELECT id, (firstname) AS name");
    }

    #[test]
    fn test_aggregate_replaces() {
        let mut sel = Selection::new();
        sel.select("id", None).select("name", None).select_count(None);
        assert_eq!(sql(&sel), "SELECT COUNT(1)");
        assert_eq!(sel.columns().len(), 1);
    }

    #[test]
    fn test_aggregate_alias_and_distinct() {
        let mut sel = Selection::new();
        sel.select_avg("grade", Some("avg_grade")).distinct();
        assert_eq!(sql(&sel), "SELECT DISTINCT AVG(grade) AS avg_grade");
    }

    #[test]
    fn test_standalone_columns() {
        let mut sel = Selection::new();
        sel.select("id", None);
        assert!(!sel.columns()[0].is_standalone());
        sel.select_max("grade", None);
        assert_eq!(sel.columns().len(), 1);
        assert!(sel.columns()[0].is_standalone());
        sel.select_all();
        assert!(matches!(sel.columns(), [Column::All]));
    }

    #[test]
    fn test_plain_after_select_all_drops_star() {
        let mut sel = Selection::new();
        sel.select_all().select("id", None);
        assert_eq!(sql(&sel), "SELECT id");
    }
}
