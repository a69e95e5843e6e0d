use crate::clock::{Clock, SystemClock};
use crate::dialect::{Dialect, GenericDialect, PostgresDialect};
use std::sync::Arc;

/// Collaborators and defaults shared by every statement a [`Db`](crate::Db) creates.
///
/// By default statements render for the [`GenericDialect`], read time from the
/// [`SystemClock`] and look rows up by the `id` column.
///
/// The generic dialect emits `{table}` and `?` for a host layer to substitute. Statements
/// sent straight to the PostgreSQL executors in [`client`](crate::client) must be built
/// with [`BuilderConfig::postgres`] (or [`Db::postgres`](crate::Db::postgres)).
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    /// Dialect used to render tables, placeholders and vendor fragments.
    pub dialect: Arc<dyn Dialect>,
    /// Time source for `where_currently_active`.
    pub clock: Arc<dyn Clock>,
    /// Column matched by `find(id)`.
    pub identity_column: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            dialect: Arc::new(GenericDialect),
            clock: Arc::new(SystemClock),
            identity_column: "id".to_string(),
        }
    }
}

impl BuilderConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with the [`PostgresDialect`].
    pub fn postgres() -> Self {
        Self::default().with_dialect(PostgresDialect)
    }

    /// Set the dialect.
    pub fn with_dialect(mut self, dialect: impl Dialect + 'static) -> Self {
        self.dialect = Arc::new(dialect);
        self
    }

    /// Set the clock.
    ///
    /// Tests pass a [`FixedClock`](crate::FixedClock) to make time windows deterministic.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Set the identity column used by `find`.
    pub fn with_identity_column(mut self, column: impl Into<String>) -> Self {
        self.identity_column = column.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    #[test]
    fn test_defaults() {
        let cfg = BuilderConfig::new();
        assert_eq!(cfg.dialect.name(), "generic");
        assert_eq!(cfg.identity_column, "id");
    }

    #[test]
    fn test_overrides() {
        let cfg = BuilderConfig::postgres()
            .with_clock(FixedClock(42))
            .with_identity_column("uuid");
        assert_eq!(cfg.dialect.name(), "postgres");
        assert_eq!(cfg.clock.now(), 42);
        assert_eq!(cfg.identity_column, "uuid");
    }
}
