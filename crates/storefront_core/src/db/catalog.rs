//! Physical table/column catalog.
//!
//! # Responsibility
//! - Declare, per entity kind, the physical table name, the mapped column
//!   set, and which column carries the identity.
//! - Feed repository binding construction with static schema facts.
//!
//! # Invariants
//! - Declared columns mirror the migrated schema; binding verifies them
//!   against the live connection before any CRUD runs.
//! - Column order is the persisted-row value order used by mappers.

/// Static description of one persisted table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    /// Physical table name.
    pub name: &'static str,
    /// Mapped columns in persisted-row value order.
    pub columns: &'static [&'static str],
}

impl TableSchema {
    /// Returns whether `column` belongs to this table's mapped column set.
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|candidate| *candidate == column)
    }
}

/// Identity column of the `sessions` table.
pub const SESSIONS_IDENTITY: &str = "session_uuid";

/// Mapped shape of the `sessions` table.
pub const SESSIONS: TableSchema = TableSchema {
    name: "sessions",
    columns: &["session_uuid", "preferred_language", "preferred_currency"],
};

/// Identity column of the `currencies` table.
pub const CURRENCIES_IDENTITY: &str = "currency_uuid";

/// Mapped shape of the `currencies` table.
pub const CURRENCIES: TableSchema = TableSchema {
    name: "currencies",
    columns: &["currency_uuid", "code", "display_name", "minor_units"],
};

#[cfg(test)]
mod tests {
    use super::{CURRENCIES, CURRENCIES_IDENTITY, SESSIONS, SESSIONS_IDENTITY};

    #[test]
    fn identity_columns_belong_to_their_tables() {
        assert!(SESSIONS.has_column(SESSIONS_IDENTITY));
        assert!(CURRENCIES.has_column(CURRENCIES_IDENTITY));
    }

    #[test]
    fn has_column_rejects_foreign_names() {
        assert!(!SESSIONS.has_column("code"));
        assert!(!CURRENCIES.has_column("preferred_language"));
    }
}
