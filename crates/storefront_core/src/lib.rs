//! Core persistence and use-case framework for the storefront backend.
//! This crate is the single source of truth for the repository, unit-of-work,
//! and command/query contracts.

pub mod context;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use context::{ContextError, StoreContext};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::currency::{Currency, CurrencyId, CurrencyValidationError};
pub use model::session::{Session, SessionId, SessionValidationError};
pub use model::Entity;
pub use repo::{
    CurrencyMapper, EntityMapper, MappingError, RepoError, RepoResult, Repository,
    SessionMapper, TableBinding,
};
pub use service::currency_ops::{GetCurrency, RegisterCurrency};
pub use service::session_ops::{
    CreateSession, DeleteSession, GetSession, UpdateSessionPreferences,
};
pub use service::{Command, Query, UseCaseError, UseCaseResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
