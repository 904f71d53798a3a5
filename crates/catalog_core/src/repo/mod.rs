//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repositories refuse to operate on unmigrated connections (`try_new`).
//! - Repository APIs return semantic errors (`NoRowsMatched`) in addition to
//!   DB transport errors.

pub mod product_repo;
