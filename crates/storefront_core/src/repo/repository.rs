//! Generic CRUD repository over one table binding and one mapper.
//!
//! # Responsibility
//! - Execute identity-keyed lookup, upsert, and delete for any entity kind.
//! - Verify connection readiness once at bind time, in place of per-call
//!   schema discovery.
//!
//! # Invariants
//! - CRUD requires a bound connection; binding happens exactly once per
//!   request lifecycle.
//! - `save` is an identity-keyed upsert: last write wins across all mapped
//!   columns, and retrying with the same entity value is idempotent.
//! - `delete` of an absent identity is a no-op success.
//! - Write failures other than the identity conflict propagate unchanged.

use crate::db::DbError;
use crate::model::Entity;
use crate::repo::binding::TableBinding;
use crate::repo::mapper::{EntityMapper, MappingError};
use rusqlite::{params_from_iter, Connection};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from repository construction, binding, and CRUD execution.
#[derive(Debug)]
pub enum RepoError {
    /// Persisted row could not be converted to a domain entity.
    Mapping(MappingError),
    /// Underlying read/write failure (constraint violation, lost
    /// connection, ...).
    Db(DbError),
    /// CRUD was called before `bind_connection`.
    NotBound,
    /// `bind_connection` was called twice on the same repository.
    AlreadyBound,
    /// Binding construction named an identity column foreign to the table.
    IdentityColumnNotInTable {
        table: &'static str,
        column: &'static str,
    },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Bound table is missing from the live schema.
    MissingRequiredTable(&'static str),
    /// Mapped column is missing from the live table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mapping(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotBound => write!(f, "repository used before a connection was bound"),
            Self::AlreadyBound => write!(f, "repository connection is already bound"),
            Self::IdentityColumnNotInTable { table, column } => write!(
                f,
                "identity column `{column}` does not belong to table `{table}`"
            ),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "repository requires column `{column}` in table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Mapping(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MappingError> for RepoError {
    fn from(value: MappingError) -> Self {
        Self::Mapping(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Generic CRUD engine binding one mapper to one table binding.
///
/// One instance exists per entity kind inside a unit-of-work context; all
/// instances of one context share the same underlying connection.
pub struct Repository<M: EntityMapper> {
    mapper: M,
    binding: TableBinding,
    conn: Option<Rc<Connection>>,
}

impl<M: EntityMapper> Repository<M> {
    /// Creates an unbound repository from its mapper/binding pair.
    pub fn new(mapper: M, binding: TableBinding) -> Self {
        Self {
            mapper,
            binding,
            conn: None,
        }
    }

    /// Attaches the live connection shared with the owning context.
    ///
    /// Must be called exactly once per request lifecycle, before any CRUD
    /// call. Verifies that the connection is migrated and that the bound
    /// table exposes every mapped column.
    pub fn bind_connection(&mut self, conn: Rc<Connection>) -> RepoResult<()> {
        if self.conn.is_some() {
            return Err(RepoError::AlreadyBound);
        }

        ensure_connection_ready(&conn, &self.binding)?;
        self.conn = Some(conn);
        Ok(())
    }

    /// Binding this repository executes against.
    pub fn binding(&self) -> &TableBinding {
        &self.binding
    }

    /// Looks up one entity by identity.
    ///
    /// Absence is `Ok(None)`, not an error. Should the identity column ever
    /// match several rows, only the first returned row is used; a non-unique
    /// identity is a table-design bug, not a condition handled here.
    pub fn find_by_id(
        &self,
        id: &<M::Entity as Entity>::Id,
    ) -> RepoResult<Option<M::Entity>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(self.binding.select_by_id_sql())?;
        let mut rows = stmt.query([id.to_string()])?;

        if let Some(row) = rows.next()? {
            return Ok(Some(self.mapper.to_domain(row)?));
        }

        Ok(None)
    }

    /// Upserts one entity keyed by the binding's identity column.
    ///
    /// On identity conflict every mapped column is overwritten with the new
    /// values; there are no merge semantics. Returns the identity of the
    /// affected row.
    pub fn save(&self, entity: &M::Entity) -> RepoResult<<M::Entity as Entity>::Id> {
        let conn = self.conn()?;
        let values = self.mapper.to_persistence(entity);

        if values.len() != self.binding.column_count() {
            return Err(RepoError::Mapping(MappingError::Invalid(format!(
                "mapper produced {} values for {} mapped columns in `{}`",
                values.len(),
                self.binding.column_count(),
                self.binding.table_name(),
            ))));
        }

        conn.execute(self.binding.upsert_sql(), params_from_iter(values))?;
        Ok(entity.id().clone())
    }

    /// Deletes the row with the given identity, if present.
    ///
    /// Deleting an absent identity succeeds without effect.
    pub fn delete(&self, id: &<M::Entity as Entity>::Id) -> RepoResult<()> {
        let conn = self.conn()?;
        conn.execute(self.binding.delete_sql(), [id.to_string()])?;
        Ok(())
    }

    fn conn(&self) -> RepoResult<&Connection> {
        self.conn.as_deref().ok_or(RepoError::NotBound)
    }
}

fn ensure_connection_ready(conn: &Connection, binding: &TableBinding) -> RepoResult<()> {
    let expected_version = crate::db::migrations::latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table = binding.table_name();
    if !table_exists(conn, table)? {
        return Err(RepoError::MissingRequiredTable(table));
    }

    for &column in binding.schema().columns {
        if !table_has_column(conn, table, column)? {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
