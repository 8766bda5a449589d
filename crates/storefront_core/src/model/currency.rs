//! Currency domain model.
//!
//! # Responsibility
//! - Define the currency record used for price presentation.
//! - Provide validating factories for fresh and replayed identities.
//!
//! # Invariants
//! - `CurrencyId` is stable and never reused for another currency.
//! - `code` is non-empty lowercase and unique across currencies (enforced by
//!   a unique index on the persisted table).
//! - `minor_units` never exceeds [`Currency::MAX_MINOR_UNITS`].

use crate::model::Entity;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Nominal identity for one currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyId(Uuid);

impl CurrencyId {
    /// Generates a fresh random identity.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an identity that already exists externally.
    pub const fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Display for CurrencyId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation failures raised by currency factories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurrencyValidationError {
    /// Nil UUID can never identify a currency.
    NilIdentity,
    /// Currency code is empty after trimming.
    EmptyCode,
    /// Display name is empty after trimming.
    EmptyDisplayName,
    /// Minor-unit count exceeds the supported range.
    MinorUnitsOutOfRange(u8),
}

impl Display for CurrencyValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilIdentity => write!(f, "currency id must not be the nil uuid"),
            Self::EmptyCode => write!(f, "currency code must not be empty"),
            Self::EmptyDisplayName => write!(f, "currency display name must not be empty"),
            Self::MinorUnitsOutOfRange(value) => write!(
                f,
                "minor units {value} exceeds supported maximum {}",
                Currency::MAX_MINOR_UNITS
            ),
        }
    }
}

impl Error for CurrencyValidationError {}

/// Presentation currency registered with the shop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "CurrencyWire")]
pub struct Currency {
    id: CurrencyId,
    code: String,
    display_name: String,
    minor_units: u8,
}

#[derive(Debug, Deserialize)]
struct CurrencyWire {
    id: CurrencyId,
    code: String,
    display_name: String,
    minor_units: u8,
}

impl TryFrom<CurrencyWire> for Currency {
    type Error = CurrencyValidationError;

    fn try_from(wire: CurrencyWire) -> Result<Self, Self::Error> {
        Currency::with_id(wire.id, wire.code, wire.display_name, wire.minor_units)
    }
}

impl Currency {
    /// Largest supported number of minor units per major unit.
    pub const MAX_MINOR_UNITS: u8 = 6;

    /// Creates a currency with a generated identity.
    pub fn new(
        code: impl Into<String>,
        display_name: impl Into<String>,
        minor_units: u8,
    ) -> Result<Self, CurrencyValidationError> {
        Self::with_id(CurrencyId::generate(), code, display_name, minor_units)
    }

    /// Creates a currency with a caller-provided identity.
    ///
    /// Used by mappers and import paths where identity already exists.
    pub fn with_id(
        id: CurrencyId,
        code: impl Into<String>,
        display_name: impl Into<String>,
        minor_units: u8,
    ) -> Result<Self, CurrencyValidationError> {
        if id.as_uuid().is_nil() {
            return Err(CurrencyValidationError::NilIdentity);
        }

        let code = code.into();
        let code = code.trim();
        if code.is_empty() {
            return Err(CurrencyValidationError::EmptyCode);
        }

        let display_name = display_name.into();
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(CurrencyValidationError::EmptyDisplayName);
        }

        if minor_units > Self::MAX_MINOR_UNITS {
            return Err(CurrencyValidationError::MinorUnitsOutOfRange(minor_units));
        }

        Ok(Self {
            id,
            code: code.to_ascii_lowercase(),
            display_name: display_name.to_string(),
            minor_units,
        })
    }

    /// Lowercase currency code, e.g. `usd`.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Human-readable currency name, e.g. `US Dollar`.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Number of minor units per major unit, e.g. `2` for cents.
    pub fn minor_units(&self) -> u8 {
        self.minor_units
    }
}

impl Entity for Currency {
    type Id = CurrencyId;

    fn id(&self) -> &CurrencyId {
        &self.id
    }
}

impl PartialEq for Currency {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Currency {}
