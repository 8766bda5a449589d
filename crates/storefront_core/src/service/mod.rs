//! Use-case layer: command/query bases and concrete operations.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Bracket write-oriented use cases in the context's transaction.
//!
//! # Invariants
//! - Use cases never bypass repository persistence contracts.
//! - Exactly one of commit/rollback resolves each command execution.

pub mod currency_ops;
pub mod session_ops;
pub mod use_case;

pub use use_case::{Command, Query, UseCaseError, UseCaseResult};
