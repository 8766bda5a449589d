//! Per-entity mappers for the registered entity kinds.
//!
//! # Responsibility
//! - Translate sessions and currencies to/from their catalog row shapes.
//!
//! # Invariants
//! - Value order matches the catalog's declared column order.
//! - Reconstruction goes through entity factories, so persisted rows that
//!   fail domain validation are rejected as mapping errors.

use crate::model::currency::{Currency, CurrencyId};
use crate::model::session::{Session, SessionId};
use crate::model::Entity;
use crate::repo::mapper::{i64_column, text_column, uuid_column, EntityMapper, MappingError};
use rusqlite::types::Value;
use rusqlite::Row;

/// Maps [`Session`] to the `sessions` table shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionMapper;

impl EntityMapper for SessionMapper {
    type Entity = Session;

    fn to_domain(&self, row: &Row<'_>) -> Result<Session, MappingError> {
        let id = SessionId::from_uuid(uuid_column(row, "session_uuid")?);
        let preferred_language = text_column(row, "preferred_language")?;
        let preferred_currency = text_column(row, "preferred_currency")?;

        Session::with_id(id, preferred_language, preferred_currency).map_err(|err| {
            MappingError::Invalid(format!("session row {id} failed validation: {err}"))
        })
    }

    fn to_persistence(&self, entity: &Session) -> Vec<Value> {
        vec![
            Value::Text(entity.id().to_string()),
            Value::Text(entity.preferred_language().to_string()),
            Value::Text(entity.preferred_currency().to_string()),
        ]
    }
}

/// Maps [`Currency`] to the `currencies` table shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrencyMapper;

impl EntityMapper for CurrencyMapper {
    type Entity = Currency;

    fn to_domain(&self, row: &Row<'_>) -> Result<Currency, MappingError> {
        let id = CurrencyId::from_uuid(uuid_column(row, "currency_uuid")?);
        let code = text_column(row, "code")?;
        let display_name = text_column(row, "display_name")?;

        let minor_units_raw = i64_column(row, "minor_units")?;
        let minor_units = u8::try_from(minor_units_raw).map_err(|_| {
            MappingError::Invalid(format!(
                "invalid minor_units value `{minor_units_raw}` in column `minor_units`"
            ))
        })?;

        Currency::with_id(id, code, display_name, minor_units).map_err(|err| {
            MappingError::Invalid(format!("currency row {id} failed validation: {err}"))
        })
    }

    fn to_persistence(&self, entity: &Currency) -> Vec<Value> {
        vec![
            Value::Text(entity.id().to_string()),
            Value::Text(entity.code().to_string()),
            Value::Text(entity.display_name().to_string()),
            Value::Integer(i64::from(entity.minor_units())),
        ]
    }
}
