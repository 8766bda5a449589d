//! Command/Query use-case bases.
//!
//! # Responsibility
//! - Define the single `implementation()` hook both use-case variants wrap.
//! - Give commands their transactional bracket; queries run bare.
//!
//! # Invariants
//! - A command resolves its transaction exactly once: commit on success,
//!   rollback on failure.
//! - A rollback failure is logged and never masks the original error.

use crate::context::{ContextError, StoreContext};
use crate::repo::RepoError;
use log::error;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type UseCaseResult<T> = Result<T, UseCaseError>;

/// Errors surfaced by use-case execution.
#[derive(Debug)]
pub enum UseCaseError {
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Transaction lifecycle failure.
    Context(ContextError),
    /// A required entity was absent.
    NotFound { entity: &'static str, id: String },
    /// Input payload failed domain validation.
    Invalid(String),
}

impl Display for UseCaseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Context(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Invalid(message) => write!(f, "invalid input: {message}"),
        }
    }
}

impl Error for UseCaseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Context(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for UseCaseError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ContextError> for UseCaseError {
    fn from(value: ContextError) -> Self {
        Self::Context(value)
    }
}

/// Read-oriented use case executed without a transaction boundary.
///
/// Intended for lookups only; durability of writes issued inside a query is
/// undefined.
pub trait Query {
    type Input;
    type Output;

    /// The single business operation this query performs.
    fn implementation(
        &self,
        context: &mut StoreContext,
        input: Self::Input,
    ) -> UseCaseResult<Self::Output>;

    /// Runs `implementation` directly against the context.
    fn execute(
        &self,
        context: &mut StoreContext,
        input: Self::Input,
    ) -> UseCaseResult<Self::Output> {
        self.implementation(context, input)
    }
}

/// Write-oriented use case bracketed in the context's transaction.
pub trait Command {
    type Input;
    type Output;

    /// The single business operation this command performs.
    fn implementation(
        &self,
        context: &mut StoreContext,
        input: Self::Input,
    ) -> UseCaseResult<Self::Output>;

    /// Runs `implementation` inside start→commit, rolling back on failure.
    ///
    /// The original failure is re-raised unchanged; a rollback failure is
    /// logged but never masks it. Should the commit itself fail, a rollback
    /// is attempted so the context is not left active, and the commit
    /// failure is surfaced.
    fn execute(
        &self,
        context: &mut StoreContext,
        input: Self::Input,
    ) -> UseCaseResult<Self::Output> {
        context.start_transaction()?;

        let output = match self.implementation(context, input) {
            Ok(output) => output,
            Err(err) => {
                rollback_logged(context);
                return Err(err);
            }
        };

        if let Err(commit_err) = context.commit_transaction() {
            rollback_logged(context);
            return Err(commit_err.into());
        }

        Ok(output)
    }
}

fn rollback_logged(context: &mut StoreContext) {
    if let Err(rollback_err) = context.rollback_transaction() {
        error!("event=command_rollback module=service status=error error={rollback_err}");
    }
}
