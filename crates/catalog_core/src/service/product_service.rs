//! Product use-case service.
//!
//! # Responsibility
//! - Compose repository primitives into the catalog CRUD use cases.
//! - Own pagination math and the page metadata contract.
//! - Decide what an unmatched update means for each use case.
//!
//! # Invariants
//! - Every read surface hides tombstoned products. `update` is the one
//!   deliberate exception and touches rows regardless of availability.
//! - `meta.last_page` is `ceil(total_products / limit)` and therefore 0
//!   when the store holds no available products.
//! - Only an unmatched by-id write or lookup becomes `NotFound`; every
//!   other store failure passes through unchanged.

use crate::model::product::{NewProduct, Product, ProductId, ProductPatch};
use crate::repo::product_repo::{ProductChanges, ProductFilter, ProductRepository, RepoError};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_LIMIT: u32 = 10;

/// Service error for catalog use-cases.
#[derive(Debug)]
pub enum ProductServiceError {
    /// Target product does not exist, or is tombstoned for flows that only
    /// see available rows.
    NotFound(ProductId),
    /// Persistence-layer failure, propagated unchanged.
    Store(RepoError),
}

impl Display for ProductServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "product not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProductServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<RepoError> for ProductServiceError {
    fn from(value: RepoError) -> Self {
        Self::Store(value)
    }
}

/// Pagination input for [`ProductService::find_all`].
///
/// Degenerate values are normalized instead of rejected: page 0 becomes
/// page 1 and limit 0 falls back to the default of 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    /// Rows per page.
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    fn normalize(self) -> Self {
        Self {
            page: if self.page == 0 {
                DEFAULT_PAGE
            } else {
                self.page
            },
            limit: if self.limit == 0 {
                DEFAULT_LIMIT
            } else {
                self.limit
            },
        }
    }

    /// Rows to skip before this page. Callers must normalize first so that
    /// `page >= 1` holds.
    fn offset(self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// Page metadata returned alongside every product listing.
///
/// Field names serialize as `totalProducts` and `lastPage` to match the
/// external API contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Effective 1-based page after normalization.
    pub page: u32,
    /// Effective page size after normalization.
    pub limit: u32,
    /// Count of available products across the whole store.
    pub total_products: u64,
    /// `ceil(total_products / limit)`; 0 when the store is empty.
    pub last_page: u64,
}

/// One page of products plus store-wide metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub data: Vec<Product>,
    pub meta: PageMeta,
}

/// Product service facade over repository implementations.
pub struct ProductService<R: ProductRepository> {
    repo: R,
}

impl<R: ProductRepository> ProductService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one product and returns the persisted row.
    ///
    /// Input is stored verbatim; the service does not validate name or
    /// price, and store constraint violations surface unchanged.
    pub fn create(&self, input: NewProduct) -> Result<Product, ProductServiceError> {
        let product = self.repo.insert(&input)?;
        Ok(product)
    }

    /// Lists one page of available products plus store-wide metadata.
    ///
    /// A page past the end of the data yields empty `data` with intact
    /// metadata rather than an error.
    pub fn find_all(&self, request: PageRequest) -> Result<ProductPage, ProductServiceError> {
        let request = request.normalize();
        let filter = ProductFilter::available_only();

        let total_products = self.repo.count(&filter)?;
        let data = self
            .repo
            .find_many(&filter, request.offset(), request.limit)?;

        Ok(ProductPage {
            data,
            meta: PageMeta {
                page: request.page,
                limit: request.limit,
                total_products,
                last_page: total_products.div_ceil(u64::from(request.limit)),
            },
        })
    }

    /// Gets one available product by id.
    ///
    /// A tombstoned product is indistinguishable from one that never
    /// existed.
    pub fn find_one(&self, id: ProductId) -> Result<Product, ProductServiceError> {
        self.repo
            .find_first(&ProductFilter::available_by_id(id))?
            .ok_or(ProductServiceError::NotFound(id))
    }

    /// Applies a partial update and returns the persisted row.
    ///
    /// The patch ignores availability on purpose, so tombstoned rows can
    /// still be corrected. Availability itself changes only through
    /// [`Self::remove`].
    pub fn update(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Product, ProductServiceError> {
        match self
            .repo
            .update_where(&ProductFilter::by_id(id), &ProductChanges::from(patch))
        {
            Ok(product) => Ok(product),
            Err(RepoError::NoRowsMatched) => Err(ProductServiceError::NotFound(id)),
            Err(other) => Err(ProductServiceError::Store(other)),
        }
    }

    /// Tombstones one available product and returns its final state.
    ///
    /// Removing an already removed product reports `NotFound`: the
    /// availability filter cannot tell that case from an unknown id.
    pub fn remove(&self, id: ProductId) -> Result<Product, ProductServiceError> {
        match self.repo.update_where(
            &ProductFilter::available_by_id(id),
            &ProductChanges::unavailable(),
        ) {
            Ok(product) => Ok(product),
            Err(RepoError::NoRowsMatched) => Err(ProductServiceError::NotFound(id)),
            Err(other) => Err(ProductServiceError::Store(other)),
        }
    }
}
