//! LIMIT and OFFSET.

use crate::writer::{Expression, SqlWriter};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Pagination {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(&mut self, n: u64) -> &mut Self {
        self.limit = Some(n);
        self
    }

    pub fn offset(&mut self, n: u64) -> &mut Self {
        self.offset = Some(n);
        self
    }

    /// Zero-based page `n` of `size` rows. Overwrites limit and offset.
    pub fn page(&mut self, n: u64, size: u64) -> &mut Self {
        self.limit = Some(size);
        self.offset = Some(n.saturating_mul(size));
        self
    }

    pub fn get_limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn get_offset(&self) -> Option<u64> {
        self.offset
    }
}

impl Expression for Pagination {
    fn write_sql(&self, w: &mut SqlWriter<'_>) {
        if let Some(limit) = self.limit {
            w.push(" LIMIT ").push(&limit.to_string());
        }
        if let Some(offset) = self.offset {
            w.push(" OFFSET ").push(&offset.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::GenericDialect;

    fn sql(p: &Pagination) -> String {
        let dialect = GenericDialect;
        let mut w = SqlWriter::new(&dialect);
        p.write_sql(&mut w);
        w.finish().sql
    }

    #[test]
    fn test_limit_only() {
        let mut p = Pagination::new();
        p.limit(5);
        assert_eq!(sql(&p), "LIMIT 5");
    }

    #[test]
    fn test_page_overwrites() {
        let mut p = Pagination::new();
        p.limit(3).offset(7).page(2, 10);
        assert_eq!(p.get_limit(), Some(10));
        assert_eq!(p.get_offset(), Some(20));
        assert_eq!(sql(&p), "LIMIT 10 OFFSET 20");
    }

    #[test]
    fn test_offset_only() {
        let mut p = Pagination::new();
        p.offset(4);
        assert_eq!(p.get_limit(), None);
        assert_eq!(sql(&p), "OFFSET 4");
    }
}
