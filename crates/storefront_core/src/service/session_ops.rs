//! Session use cases.
//!
//! # Responsibility
//! - Provide create/get/update/delete entry points for visitor sessions.
//!
//! # Invariants
//! - Payload validation failures surface before any write is issued.
//! - `UpdateSessionPreferences` requires the session to exist; plain reads
//!   report absence as an empty result instead.

use crate::context::StoreContext;
use crate::model::session::{Session, SessionId};
use crate::model::Entity;
use crate::service::use_case::{Command, Query, UseCaseError, UseCaseResult};
use serde::{Deserialize, Serialize};

/// Read model returned by session queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub preferred_language: String,
    pub preferred_currency: String,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        Self {
            session_id: *session.id(),
            preferred_language: session.preferred_language().to_string(),
            preferred_currency: session.preferred_currency().to_string(),
        }
    }
}

/// Input payload for [`CreateSession`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSessionInput {
    pub preferred_language: String,
    pub preferred_currency: String,
}

/// Output payload for [`CreateSession`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSessionOutput {
    pub session_id: SessionId,
}

/// Creates a fresh session from visitor preferences.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateSession;

impl Command for CreateSession {
    type Input = CreateSessionInput;
    type Output = CreateSessionOutput;

    fn implementation(
        &self,
        context: &mut StoreContext,
        input: Self::Input,
    ) -> UseCaseResult<Self::Output> {
        let session = Session::new(input.preferred_language, input.preferred_currency)
            .map_err(|err| UseCaseError::Invalid(err.to_string()))?;

        let session_id = context.sessions().save(&session)?;
        Ok(CreateSessionOutput { session_id })
    }
}

/// Input payload for [`GetSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetSessionInput {
    pub session_id: SessionId,
}

/// Looks up one session; absence is an empty result, not an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetSession;

impl Query for GetSession {
    type Input = GetSessionInput;
    type Output = Option<SessionView>;

    fn implementation(
        &self,
        context: &mut StoreContext,
        input: Self::Input,
    ) -> UseCaseResult<Self::Output> {
        let session = context.sessions().find_by_id(&input.session_id)?;
        Ok(session.as_ref().map(SessionView::from))
    }
}

/// Input payload for [`UpdateSessionPreferences`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSessionPreferencesInput {
    pub session_id: SessionId,
    pub preferred_language: String,
    pub preferred_currency: String,
}

/// Replaces both preference values on an existing session.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateSessionPreferences;

impl Command for UpdateSessionPreferences {
    type Input = UpdateSessionPreferencesInput;
    type Output = SessionView;

    fn implementation(
        &self,
        context: &mut StoreContext,
        input: Self::Input,
    ) -> UseCaseResult<Self::Output> {
        let session = context
            .sessions()
            .find_by_id(&input.session_id)?
            .ok_or_else(|| UseCaseError::NotFound {
                entity: "session",
                id: input.session_id.to_string(),
            })?;

        let updated = session
            .with_preferences(input.preferred_language, input.preferred_currency)
            .map_err(|err| UseCaseError::Invalid(err.to_string()))?;

        context.sessions().save(&updated)?;
        Ok(SessionView::from(&updated))
    }
}

/// Input payload for [`DeleteSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteSessionInput {
    pub session_id: SessionId,
}

/// Deletes one session; deleting an absent session is a no-op success.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteSession;

impl Command for DeleteSession {
    type Input = DeleteSessionInput;
    type Output = ();

    fn implementation(
        &self,
        context: &mut StoreContext,
        input: Self::Input,
    ) -> UseCaseResult<Self::Output> {
        context.sessions().delete(&input.session_id)?;
        Ok(())
    }
}
