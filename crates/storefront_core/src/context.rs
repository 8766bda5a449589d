//! Request-scoped unit-of-work context.
//!
//! # Responsibility
//! - Aggregate one repository per registered entity kind over one shared
//!   connection.
//! - Drive the transaction lifecycle around use-case execution.
//!
//! # Invariants
//! - One context per in-flight operation; never shared across tasks.
//! - Transactions do not nest: start requires idle, commit/rollback require
//!   active.
//! - A context dropped with an active transaction rolls it back, so an
//!   abandoned command cannot leak an open transaction.

use crate::db::{catalog, DbError};
use crate::repo::{
    CurrencyMapper, RepoError, Repository, SessionMapper, TableBinding,
};
use log::{debug, error, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Errors from context construction and transaction lifecycle transitions.
#[derive(Debug)]
pub enum ContextError {
    /// `start_transaction` was called while a transaction is already open.
    TransactionAlreadyActive,
    /// `commit_transaction`/`rollback_transaction` was called while idle.
    NoActiveTransaction,
    /// Underlying transaction statement failed.
    Db(DbError),
    /// Repository binding failed during context construction.
    Repo(RepoError),
}

impl Display for ContextError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TransactionAlreadyActive => {
                write!(f, "a transaction is already active on this context")
            }
            Self::NoActiveTransaction => {
                write!(f, "no transaction is active on this context")
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ContextError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ContextError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for ContextError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TxState {
    Idle,
    Active,
}

/// Unit-of-work context owning one connection and its repositories.
///
/// Repositories are bound to the shared connection at construction, so
/// operations issued through any of them participate in the same
/// transaction.
pub struct StoreContext {
    conn: Rc<Connection>,
    tx_state: TxState,
    sessions: Repository<SessionMapper>,
    currencies: Repository<CurrencyMapper>,
}

impl StoreContext {
    /// Builds a context over a migrated connection, binding one repository
    /// per registered entity kind.
    pub fn new(conn: Connection) -> Result<Self, ContextError> {
        let conn = Rc::new(conn);

        let mut sessions = Repository::new(
            SessionMapper,
            TableBinding::try_new(&catalog::SESSIONS, catalog::SESSIONS_IDENTITY)?,
        );
        sessions.bind_connection(Rc::clone(&conn))?;

        let mut currencies = Repository::new(
            CurrencyMapper,
            TableBinding::try_new(&catalog::CURRENCIES, catalog::CURRENCIES_IDENTITY)?,
        );
        currencies.bind_connection(Rc::clone(&conn))?;

        Ok(Self {
            conn,
            tx_state: TxState::Idle,
            sessions,
            currencies,
        })
    }

    /// Session repository sharing this context's connection.
    pub fn sessions(&self) -> &Repository<SessionMapper> {
        &self.sessions
    }

    /// Currency repository sharing this context's connection.
    pub fn currencies(&self) -> &Repository<CurrencyMapper> {
        &self.currencies
    }

    /// Returns whether a transaction is currently open.
    pub fn transaction_active(&self) -> bool {
        self.tx_state == TxState::Active
    }

    /// Opens a transaction; all writes until commit/rollback stay invisible
    /// outside this context.
    pub fn start_transaction(&mut self) -> Result<(), ContextError> {
        if self.tx_state == TxState::Active {
            return Err(ContextError::TransactionAlreadyActive);
        }

        self.conn.execute_batch("BEGIN IMMEDIATE;")?;
        self.tx_state = TxState::Active;
        debug!("event=tx_begin module=context status=ok");
        Ok(())
    }

    /// Durably persists all writes issued since `start_transaction`.
    ///
    /// On failure the transaction stays open so the caller can roll back.
    pub fn commit_transaction(&mut self) -> Result<(), ContextError> {
        if self.tx_state != TxState::Active {
            return Err(ContextError::NoActiveTransaction);
        }

        self.conn.execute_batch("COMMIT;")?;
        self.tx_state = TxState::Idle;
        debug!("event=tx_commit module=context status=ok");
        Ok(())
    }

    /// Discards all writes issued since `start_transaction`.
    pub fn rollback_transaction(&mut self) -> Result<(), ContextError> {
        if self.tx_state != TxState::Active {
            return Err(ContextError::NoActiveTransaction);
        }

        self.conn.execute_batch("ROLLBACK;")?;
        self.tx_state = TxState::Idle;
        debug!("event=tx_rollback module=context status=ok");
        Ok(())
    }
}

impl Drop for StoreContext {
    fn drop(&mut self) {
        if self.tx_state != TxState::Active {
            return;
        }

        match self.conn.execute_batch("ROLLBACK;") {
            Ok(()) => {
                warn!("event=tx_rollback module=context status=ok reason=context_dropped_active")
            }
            Err(err) => error!(
                "event=tx_rollback module=context status=error reason=context_dropped_active error={err}"
            ),
        }
        self.tx_state = TxState::Idle;
    }
}
