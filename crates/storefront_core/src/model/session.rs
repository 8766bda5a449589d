//! Visitor session domain model.
//!
//! # Responsibility
//! - Define the session record carrying per-visitor shop preferences.
//! - Provide validating factories for fresh and replayed identities.
//!
//! # Invariants
//! - `SessionId` is stable and never reused for another session.
//! - Preference fields are non-empty and stored lowercase.

use crate::model::Entity;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Nominal identity for one visitor session.
///
/// A distinct wrapper type so a session id can never be passed where another
/// entity kind's id is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
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

impl Display for SessionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation failures raised by session factories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionValidationError {
    /// Nil UUID can never identify a session.
    NilIdentity,
    /// Preferred language is empty after trimming.
    EmptyPreferredLanguage,
    /// Preferred currency is empty after trimming.
    EmptyPreferredCurrency,
}

impl Display for SessionValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilIdentity => write!(f, "session id must not be the nil uuid"),
            Self::EmptyPreferredLanguage => write!(f, "preferred language must not be empty"),
            Self::EmptyPreferredCurrency => write!(f, "preferred currency must not be empty"),
        }
    }
}

impl Error for SessionValidationError {}

/// Per-visitor session with shop presentation preferences.
///
/// Constructed through [`Session::new`] or [`Session::with_id`]; both
/// normalize and validate field values, so a constructed session is always
/// persistable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SessionWire")]
pub struct Session {
    id: SessionId,
    preferred_language: String,
    preferred_currency: String,
}

#[derive(Debug, Deserialize)]
struct SessionWire {
    id: SessionId,
    preferred_language: String,
    preferred_currency: String,
}

impl TryFrom<SessionWire> for Session {
    type Error = SessionValidationError;

    fn try_from(wire: SessionWire) -> Result<Self, Self::Error> {
        Session::with_id(wire.id, wire.preferred_language, wire.preferred_currency)
    }
}

impl Session {
    /// Creates a session with a generated identity.
    pub fn new(
        preferred_language: impl Into<String>,
        preferred_currency: impl Into<String>,
    ) -> Result<Self, SessionValidationError> {
        Self::with_id(SessionId::generate(), preferred_language, preferred_currency)
    }

    /// Creates a session with a caller-provided identity.
    ///
    /// Used by mappers and import paths where identity already exists.
    pub fn with_id(
        id: SessionId,
        preferred_language: impl Into<String>,
        preferred_currency: impl Into<String>,
    ) -> Result<Self, SessionValidationError> {
        if id.as_uuid().is_nil() {
            return Err(SessionValidationError::NilIdentity);
        }

        let preferred_language = normalize(preferred_language.into())
            .ok_or(SessionValidationError::EmptyPreferredLanguage)?;
        let preferred_currency = normalize(preferred_currency.into())
            .ok_or(SessionValidationError::EmptyPreferredCurrency)?;

        Ok(Self {
            id,
            preferred_language,
            preferred_currency,
        })
    }

    /// Returns a copy of this session carrying new preference values.
    ///
    /// Identity is preserved; the original session is left untouched.
    pub fn with_preferences(
        &self,
        preferred_language: impl Into<String>,
        preferred_currency: impl Into<String>,
    ) -> Result<Self, SessionValidationError> {
        Self::with_id(self.id, preferred_language, preferred_currency)
    }

    /// Lowercase visitor language preference, e.g. `en`.
    pub fn preferred_language(&self) -> &str {
        &self.preferred_language
    }

    /// Lowercase visitor currency preference, e.g. `usd`.
    pub fn preferred_currency(&self) -> &str {
        &self.preferred_currency
    }
}

impl Entity for Session {
    type Id = SessionId;

    fn id(&self) -> &SessionId {
        &self.id
    }
}

impl PartialEq for Session {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Session {}

fn normalize(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_ascii_lowercase())
}
