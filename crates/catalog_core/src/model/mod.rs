//! Product domain model.
//!
//! # Responsibility
//! - Define the canonical data structures shared by the repo and service
//!   layers.
//!
//! # Invariants
//! - Every product is identified by a stable, store-assigned
//!   [`product::ProductId`].
//! - Deletion is represented by the `available` tombstone flag, not by hard
//!   delete.

pub mod product;
