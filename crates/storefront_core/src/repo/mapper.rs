//! Entity/row mapper contract.
//!
//! # Responsibility
//! - Define the bidirectional conversion boundary between domain entities
//!   and persisted rows.
//! - Provide shared column-reading helpers that reject malformed persisted
//!   state instead of masking it.
//!
//! # Invariants
//! - Mappers are stateless pure translators.
//! - Round-trip law: mapping an entity to its persisted form and back
//!   reconstructs an entity equal by identity and in every mapped field.

use crate::model::Entity;
use rusqlite::types::Value;
use rusqlite::Row;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Bidirectional converter between one entity kind and its persisted row.
pub trait EntityMapper {
    /// Entity kind this mapper translates.
    type Entity: Entity;

    /// Rebuilds a domain entity from one persisted row.
    ///
    /// Fails when required columns are absent or malformed; reconstruction
    /// goes through the entity's validating factory, so invalid persisted
    /// state is rejected rather than silently coerced.
    fn to_domain(&self, row: &Row<'_>) -> Result<Self::Entity, MappingError>;

    /// Produces the persisted values for one entity, in the catalog's
    /// declared column order.
    ///
    /// Total over a fully constructed entity; construction-time validation
    /// is the entity's responsibility, not the mapper's.
    fn to_persistence(&self, entity: &Self::Entity) -> Vec<Value>;
}

/// Errors raised while rebuilding an entity from a persisted row.
#[derive(Debug)]
pub enum MappingError {
    /// Column missing or carrying an incompatible type at the driver level.
    Read(rusqlite::Error),
    /// Column value is readable but semantically malformed.
    Invalid(String),
}

impl Display for MappingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read(err) => write!(f, "{err}"),
            Self::Invalid(message) => write!(f, "invalid persisted row: {message}"),
        }
    }
}

impl Error for MappingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

/// Reads one text column.
pub fn text_column(row: &Row<'_>, column: &'static str) -> Result<String, MappingError> {
    row.get(column).map_err(MappingError::Read)
}

/// Reads one integer column.
pub fn i64_column(row: &Row<'_>, column: &'static str) -> Result<i64, MappingError> {
    row.get(column).map_err(MappingError::Read)
}

/// Reads one UUID column persisted as text.
pub fn uuid_column(row: &Row<'_>, column: &'static str) -> Result<Uuid, MappingError> {
    let text: String = row.get(column).map_err(MappingError::Read)?;
    Uuid::parse_str(&text).map_err(|_| {
        MappingError::Invalid(format!("invalid uuid value `{text}` in column `{column}`"))
    })
}
