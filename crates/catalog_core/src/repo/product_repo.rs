//! Product repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the primitive persistence operations the catalog service
//!   composes: `count`, `find_many`, `find_first`, `insert`, `update_where`.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Listing order is `id ASC`, the insertion order of the store.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `update_where` reports an unmatched filter as `RepoError::NoRowsMatched`
//!   so callers decide what absence means for their use case.
//! - Writes return the row as persisted, read back from the store, never an
//!   echo of the input.

use crate::db::{migrations, DbError};
use crate::model::product::{NewProduct, Product, ProductId, ProductPatch};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PRODUCT_SELECT_SQL: &str = "SELECT
    id,
    name,
    price,
    description,
    available
FROM product";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for product persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// An update filter matched zero rows. Callers translate this into
    /// their own notion of "not found".
    NoRowsMatched,
    InvalidData(String),
    InvalidFilter(&'static str),
    /// A write reported success but the read-back found no row.
    Inconsistent(&'static str),
    /// The connection was not opened through `db::open_db`, so migrations
    /// never ran on it.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NoRowsMatched => write!(f, "no product rows matched the update filter"),
            Self::InvalidData(message) => write!(f, "invalid persisted product data: {message}"),
            Self::InvalidFilter(message) => write!(f, "invalid repository filter: {message}"),
            Self::Inconsistent(details) => write!(f, "inconsistent product state: {details}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match required {expected_version}; open the database through db::open_db"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Row selector shared by read, count and update operations.
///
/// `None` fields do not constrain the query, so the default filter matches
/// every row including tombstoned ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub id: Option<ProductId>,
    pub available: Option<bool>,
}

impl ProductFilter {
    /// Matches one product regardless of availability.
    pub fn by_id(id: ProductId) -> Self {
        Self {
            id: Some(id),
            available: None,
        }
    }

    /// Matches one product only while it is still available.
    pub fn available_by_id(id: ProductId) -> Self {
        Self {
            id: Some(id),
            available: Some(true),
        }
    }

    /// Matches every non-tombstoned product.
    pub fn available_only() -> Self {
        Self {
            id: None,
            available: Some(true),
        }
    }

    /// Appends the WHERE clause for this filter.
    ///
    /// Bind values are pushed in the same order as their `?` placeholders.
    fn append_where(&self, sql: &mut String, bind_values: &mut Vec<Value>) {
        sql.push_str(" WHERE 1 = 1");

        if let Some(id) = self.id {
            sql.push_str(" AND id = ?");
            bind_values.push(Value::Integer(id));
        }

        if let Some(available) = self.available {
            sql.push_str(" AND available = ?");
            bind_values.push(Value::Integer(bool_to_int(available)));
        }
    }
}

/// Column assignments for [`ProductRepository::update_where`].
///
/// `None` fields keep their current value. Unlike [`ProductPatch`] this shape
/// can flip `available`, which is how the remove flow tombstones a row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub available: Option<bool>,
}

impl ProductChanges {
    /// The assignment used by the remove flow: tombstone only.
    pub fn unavailable() -> Self {
        Self {
            available: Some(false),
            ..Self::default()
        }
    }

    /// Returns whether this change set assigns no columns at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.available.is_none()
    }
}

impl From<ProductPatch> for ProductChanges {
    fn from(patch: ProductPatch) -> Self {
        Self {
            name: patch.name,
            price: patch.price,
            description: patch.description,
            available: None,
        }
    }
}

/// Repository interface for product persistence.
///
/// These are deliberately primitive operations; pagination math and
/// "not found" semantics live in the service layer on top.
pub trait ProductRepository {
    /// Counts rows matching the filter.
    fn count(&self, filter: &ProductFilter) -> RepoResult<u64>;
    /// Lists matching rows in `id ASC` order, skipping `offset` rows and
    /// returning at most `limit`.
    fn find_many(
        &self,
        filter: &ProductFilter,
        offset: u64,
        limit: u32,
    ) -> RepoResult<Vec<Product>>;
    /// Returns the first matching row in `id ASC` order, if any.
    fn find_first(&self, filter: &ProductFilter) -> RepoResult<Option<Product>>;
    /// Inserts one product and returns the stored row, id included.
    fn insert(&self, product: &NewProduct) -> RepoResult<Product>;
    /// Applies the change set to the row matching the filter and returns
    /// that row as persisted after the write.
    fn update_where(&self, filter: &ProductFilter, changes: &ProductChanges) -> RepoResult<Product>;
}

/// SQLite-backed product repository.
pub struct SqliteProductRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ProductRepository for SqliteProductRepository<'_> {
    fn count(&self, filter: &ProductFilter) -> RepoResult<u64> {
        let mut sql = String::from("SELECT COUNT(*) FROM product");
        let mut bind_values: Vec<Value> = Vec::new();
        filter.append_where(&mut sql, &mut bind_values);
        sql.push(';');

        let total: i64 = self
            .conn
            .query_row(&sql, params_from_iter(bind_values), |row| row.get(0))?;
        u64::try_from(total)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{total}` in product")))
    }

    fn find_many(
        &self,
        filter: &ProductFilter,
        offset: u64,
        limit: u32,
    ) -> RepoResult<Vec<Product>> {
        let mut sql = String::from(PRODUCT_SELECT_SQL);
        let mut bind_values: Vec<Value> = Vec::new();
        filter.append_where(&mut sql, &mut bind_values);

        sql.push_str(" ORDER BY id ASC LIMIT ?");
        bind_values.push(Value::Integer(i64::from(limit)));
        if offset > 0 {
            sql.push_str(" OFFSET ?");
            // Offsets past i64::MAX can only select past the end of the table.
            bind_values.push(Value::Integer(i64::try_from(offset).unwrap_or(i64::MAX)));
        }
        sql.push(';');

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut products = Vec::new();

        while let Some(row) = rows.next()? {
            products.push(parse_product_row(row)?);
        }

        Ok(products)
    }

    fn find_first(&self, filter: &ProductFilter) -> RepoResult<Option<Product>> {
        let mut sql = String::from(PRODUCT_SELECT_SQL);
        let mut bind_values: Vec<Value> = Vec::new();
        filter.append_where(&mut sql, &mut bind_values);
        sql.push_str(" ORDER BY id ASC LIMIT 1;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_product_row(row)?));
        }

        Ok(None)
    }

    fn insert(&self, product: &NewProduct) -> RepoResult<Product> {
        // Every new product starts available; only the remove flow clears it.
        self.conn.execute(
            "INSERT INTO product (name, price, description, available)
             VALUES (?1, ?2, ?3, 1);",
            params![
                product.name.as_str(),
                product.price,
                product.description.as_deref(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.find_first(&ProductFilter::by_id(id))?
            .ok_or(RepoError::Inconsistent(
                "inserted product not found on read-back",
            ))
    }

    fn update_where(
        &self,
        filter: &ProductFilter,
        changes: &ProductChanges,
    ) -> RepoResult<Product> {
        let Some(id) = filter.id else {
            return Err(RepoError::InvalidFilter(
                "update_where requires a filter scoped to one product id",
            ));
        };

        let mut assignments: Vec<&str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(name) = changes.name.as_ref() {
            assignments.push("name = ?");
            bind_values.push(Value::Text(name.clone()));
        }
        if let Some(price) = changes.price {
            assignments.push("price = ?");
            bind_values.push(Value::Real(price));
        }
        if let Some(description) = changes.description.as_ref() {
            assignments.push("description = ?");
            bind_values.push(Value::Text(description.clone()));
        }
        if let Some(available) = changes.available {
            assignments.push("available = ?");
            bind_values.push(Value::Integer(bool_to_int(available)));
        }
        if assignments.is_empty() {
            // An empty change set must still report whether the filter matched.
            assignments.push("id = id");
        }

        let mut sql = format!("UPDATE product SET {}", assignments.join(", "));
        filter.append_where(&mut sql, &mut bind_values);
        sql.push(';');

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            return Err(RepoError::NoRowsMatched);
        }

        // Read back by id alone: the write may have changed the very flags
        // the filter matched on.
        self.find_first(&ProductFilter::by_id(id))?
            .ok_or(RepoError::Inconsistent(
                "updated product not found on read-back",
            ))
    }
}

fn parse_product_row(row: &Row<'_>) -> RepoResult<Product> {
    let available = match row.get::<_, i64>("available")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid available value `{other}` in product.available"
            )));
        }
    };

    Ok(Product {
        id: row.get("id")?,
        name: row.get("name")?,
        price: row.get("price")?,
        description: row.get("description")?,
        available,
    })
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = migrations::latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "product")? {
        return Err(RepoError::MissingRequiredTable("product"));
    }

    for column in ["id", "name", "price", "description", "available"] {
        if !table_has_column(conn, "product", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "product",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_binds_follow_placeholder_order() {
        let filter = ProductFilter {
            id: Some(7),
            available: Some(true),
        };
        let mut sql = String::from("SELECT COUNT(*) FROM product");
        let mut bind_values = Vec::new();
        filter.append_where(&mut sql, &mut bind_values);

        assert_eq!(
            sql,
            "SELECT COUNT(*) FROM product WHERE 1 = 1 AND id = ? AND available = ?"
        );
        assert_eq!(bind_values, vec![Value::Integer(7), Value::Integer(1)]);
    }

    #[test]
    fn default_filter_constrains_nothing() {
        let mut sql = String::new();
        let mut bind_values = Vec::new();
        ProductFilter::default().append_where(&mut sql, &mut bind_values);

        assert_eq!(sql, " WHERE 1 = 1");
        assert!(bind_values.is_empty());
    }

    #[test]
    fn patch_conversion_never_touches_availability() {
        let changes = ProductChanges::from(ProductPatch {
            name: Some("renamed".to_string()),
            price: None,
            description: None,
        });

        assert_eq!(changes.name.as_deref(), Some("renamed"));
        assert_eq!(changes.available, None);
        assert!(!changes.is_empty());
        assert!(ProductChanges::from(ProductPatch::default()).is_empty());
    }
}
