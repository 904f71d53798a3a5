//! Product domain model.
//!
//! # Responsibility
//! - Define the canonical product record shared by the repo and service
//!   layers.
//! - Define the input shapes for create and partial update.
//!
//! # Invariants
//! - `id` is assigned by the store on insert and never reused.
//! - `available` is the source of truth for tombstone state: unavailable
//!   products are invisible to reads but stay in the store.

use serde::{Deserialize, Serialize};

/// Stable identifier assigned by the store when a product is inserted.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ProductId = i64;

/// Canonical product record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned ID. Monotonically increasing, never reused.
    pub id: ProductId,
    /// Display name. Stored verbatim, no normalization.
    pub name: String,
    /// Unit price. The store does not constrain sign or magnitude.
    pub price: f64,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Soft delete tombstone. `false` means removed.
    pub available: bool,
}

/// Input shape for creating a product.
///
/// `id` and `available` are intentionally absent: the store assigns the ID
/// and every new product starts available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
}

impl NewProduct {
    /// Creates an input with no description.
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            description: None,
        }
    }

    /// Attaches a description to the input.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update for a product. `None` fields are left untouched.
///
/// There is deliberately no `available` field here: availability changes
/// only through the remove flow, and a patch cannot clear a description
/// back to NULL, only replace it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
}
