//! Table binding: the (table, identity column) pairing behind a repository.
//!
//! # Responsibility
//! - Pair one catalog table schema with its identity column.
//! - Derive the fixed CRUD statements used by the generic repository.
//!
//! # Invariants
//! - The identity column is verified to belong to the schema at
//!   construction, never mid-query.
//! - A binding is immutable for the lifetime of its repository.

use crate::db::catalog::TableSchema;
use crate::repo::repository::{RepoError, RepoResult};

/// Fixed pairing of a table schema and its identity column, carrying the
/// derived SQL for single-row lookup, identity-keyed upsert, and delete.
#[derive(Debug, Clone)]
pub struct TableBinding {
    schema: &'static TableSchema,
    identity_column: &'static str,
    select_by_id_sql: String,
    upsert_sql: String,
    delete_sql: String,
}

impl TableBinding {
    /// Builds a binding, rejecting identity columns foreign to the schema.
    pub fn try_new(
        schema: &'static TableSchema,
        identity_column: &'static str,
    ) -> RepoResult<Self> {
        if !schema.has_column(identity_column) {
            return Err(RepoError::IdentityColumnNotInTable {
                table: schema.name,
                column: identity_column,
            });
        }

        Ok(Self {
            schema,
            identity_column,
            select_by_id_sql: select_by_id_sql(schema, identity_column),
            upsert_sql: upsert_sql(schema, identity_column),
            delete_sql: delete_sql(schema, identity_column),
        })
    }

    /// Catalog schema this binding executes against.
    pub fn schema(&self) -> &'static TableSchema {
        self.schema
    }

    /// Column carrying the identity key.
    pub fn identity_column(&self) -> &'static str {
        self.identity_column
    }

    pub(crate) fn table_name(&self) -> &'static str {
        self.schema.name
    }

    pub(crate) fn column_count(&self) -> usize {
        self.schema.columns.len()
    }

    pub(crate) fn select_by_id_sql(&self) -> &str {
        &self.select_by_id_sql
    }

    pub(crate) fn upsert_sql(&self) -> &str {
        &self.upsert_sql
    }

    pub(crate) fn delete_sql(&self) -> &str {
        &self.delete_sql
    }
}

fn select_by_id_sql(schema: &TableSchema, identity_column: &str) -> String {
    format!(
        "SELECT {columns} FROM {table} WHERE {identity_column} = ?1;",
        columns = schema.columns.join(", "),
        table = schema.name,
    )
}

fn upsert_sql(schema: &TableSchema, identity_column: &str) -> String {
    let placeholders = (1..=schema.columns.len())
        .map(|position| format!("?{position}"))
        .collect::<Vec<_>>()
        .join(", ");

    let overwrites = schema
        .columns
        .iter()
        .filter(|column| **column != identity_column)
        .map(|column| format!("{column} = excluded.{column}"))
        .collect::<Vec<_>>()
        .join(", ");

    // A table mapping only its identity column has nothing to overwrite.
    let conflict_action = if overwrites.is_empty() {
        "DO NOTHING".to_string()
    } else {
        format!("DO UPDATE SET {overwrites}")
    };

    format!(
        "INSERT INTO {table} ({columns}) VALUES ({placeholders}) \
         ON CONFLICT({identity_column}) {conflict_action};",
        table = schema.name,
        columns = schema.columns.join(", "),
    )
}

fn delete_sql(schema: &TableSchema, identity_column: &str) -> String {
    format!(
        "DELETE FROM {table} WHERE {identity_column} = ?1;",
        table = schema.name,
    )
}

#[cfg(test)]
mod tests {
    use super::TableBinding;
    use crate::db::catalog::TableSchema;
    use crate::repo::repository::RepoError;

    const ITEMS: TableSchema = TableSchema {
        name: "items",
        columns: &["item_uuid", "label", "rank"],
    };

    const KEYS_ONLY: TableSchema = TableSchema {
        name: "keys_only",
        columns: &["key_uuid"],
    };

    #[test]
    fn try_new_rejects_foreign_identity_column() {
        let err = TableBinding::try_new(&ITEMS, "missing").unwrap_err();
        assert!(matches!(
            err,
            RepoError::IdentityColumnNotInTable {
                table: "items",
                column: "missing",
            }
        ));
    }

    #[test]
    fn select_projects_all_mapped_columns_keyed_by_identity() {
        let binding = TableBinding::try_new(&ITEMS, "item_uuid").unwrap();
        assert_eq!(
            binding.select_by_id_sql(),
            "SELECT item_uuid, label, rank FROM items WHERE item_uuid = ?1;"
        );
    }

    #[test]
    fn upsert_overwrites_every_non_identity_column() {
        let binding = TableBinding::try_new(&ITEMS, "item_uuid").unwrap();
        assert_eq!(
            binding.upsert_sql(),
            "INSERT INTO items (item_uuid, label, rank) VALUES (?1, ?2, ?3) \
             ON CONFLICT(item_uuid) DO UPDATE SET label = excluded.label, rank = excluded.rank;"
        );
    }

    #[test]
    fn upsert_on_identity_only_table_degrades_to_do_nothing() {
        let binding = TableBinding::try_new(&KEYS_ONLY, "key_uuid").unwrap();
        assert_eq!(
            binding.upsert_sql(),
            "INSERT INTO keys_only (key_uuid) VALUES (?1) ON CONFLICT(key_uuid) DO NOTHING;"
        );
    }

    #[test]
    fn delete_is_keyed_by_identity() {
        let binding = TableBinding::try_new(&ITEMS, "item_uuid").unwrap();
        assert_eq!(
            binding.delete_sql(),
            "DELETE FROM items WHERE item_uuid = ?1;"
        );
    }
}
