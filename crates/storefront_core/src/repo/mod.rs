//! Generic repository layer over SQLite persistence.
//!
//! # Responsibility
//! - Define the entity/row mapper contract and the table binding that
//!   parameterizes generic CRUD.
//! - Provide one generic repository engine instead of one handwritten
//!   repository per entity kind.
//!
//! # Invariants
//! - A repository executes against exactly one table binding through exactly
//!   one mapper; the pairing is fixed for the repository's lifetime.
//! - Binding problems surface at construction or connection-bind time, never
//!   mid-query.
//! - Repositories return semantic absence (`Ok(None)`) for missing rows and
//!   reserve errors for real failures.

pub mod binding;
pub mod mapper;
pub mod mappers;
pub mod repository;

pub use binding::TableBinding;
pub use mapper::{EntityMapper, MappingError};
pub use mappers::{CurrencyMapper, SessionMapper};
pub use repository::{RepoError, RepoResult, Repository};
