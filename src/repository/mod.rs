use crate::db::{DbConnection, DbPool};
use crate::domain::category::{Category, CategoryChanges, CategoryDeactivation, NewCategory};
use crate::domain::product::{NewProduct, Product, ProductChanges};
use crate::domain::types::{CategoryId, CategoryName, ProductId, fold_case};

pub mod category;
pub mod errors;
pub mod product;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be handed to each request instead of living in a process-wide handle.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Structured predicate for category queries.
///
/// Every populated field narrows the result set; an empty filter selects all
/// categories in store order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryFilter {
    /// Case-insensitive substring of the name.
    pub name_contains: Option<String>,
    /// Exact status match.
    pub status: Option<bool>,
}

impl CategoryFilter {
    pub fn name_contains(mut self, pattern: impl Into<String>) -> Self {
        self.name_contains = Some(pattern.into());
        self
    }
    pub fn status(mut self, status: bool) -> Self {
        self.status = Some(status);
        self
    }
}

/// Result ordering for product queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductOrder {
    /// Store order (ascending id).
    #[default]
    Natural,
    /// Most recently created first.
    NewestFirst,
    /// Largest stock first.
    QuantityDescending,
}

/// Structured predicate for product queries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    /// Case-insensitive substring of the name.
    pub name_contains: Option<String>,
    /// Exact quantity match.
    pub quantity: Option<i32>,
    /// Inclusive lower price bound.
    pub price_min: Option<f64>,
    /// Inclusive upper price bound.
    pub price_max: Option<f64>,
    /// Case-insensitive substring of the address.
    pub address_contains: Option<String>,
    /// Exact status match.
    pub status: Option<bool>,
    /// Owning category.
    pub category_id: Option<CategoryId>,
    pub order: ProductOrder,
}

impl ProductFilter {
    pub fn name_contains(mut self, pattern: impl Into<String>) -> Self {
        self.name_contains = Some(pattern.into());
        self
    }
    pub fn quantity(mut self, quantity: i32) -> Self {
        self.quantity = Some(quantity);
        self
    }
    pub fn price_between(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.price_min = min;
        self.price_max = max;
        self
    }
    pub fn address_contains(mut self, pattern: impl Into<String>) -> Self {
        self.address_contains = Some(pattern.into());
        self
    }
    pub fn status(mut self, status: bool) -> Self {
        self.status = Some(status);
        self
    }
    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
    pub fn order(mut self, order: ProductOrder) -> Self {
        self.order = order;
        self
    }
}

/// Builds a `LIKE` pattern matching `value` anywhere, escaping wildcards with `\`.
///
/// The pattern is case-folded and must be matched against a `*_folded` column.
pub(crate) fn contains_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for ch in fold_case(value).chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// List categories matching the filter, in store order.
    fn list_categories(&self, filter: CategoryFilter) -> RepositoryResult<Vec<Category>>;
    /// Retrieve a category by its identifier.
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
    /// Find a category whose name equals `name` ignoring case, whatever its status.
    fn find_category_by_name(&self, name: &CategoryName) -> RepositoryResult<Option<Category>>;
}

/// Write operations for category entities.
pub trait CategoryWriter {
    /// Persist a new category and return the stored row.
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category>;
    /// Overwrite name, status and (when present) image.
    fn update_category(&self, id: CategoryId, changes: &CategoryChanges)
    -> RepositoryResult<usize>;
    /// Soft-delete a category and every product referencing it in one transaction.
    fn deactivate_category(&self, id: CategoryId) -> RepositoryResult<CategoryDeactivation>;
}

/// Read-only operations for product entities.
pub trait ProductReader {
    /// List products matching the filter, ordered as requested.
    fn list_products(&self, filter: ProductFilter) -> RepositoryResult<Vec<Product>>;
    /// Retrieve a product by its identifier.
    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>>;
}

/// Write operations for product entities.
pub trait ProductWriter {
    /// Persist a new product and return the stored row.
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product>;
    /// Overwrite the product's attributes.
    fn update_product(&self, id: ProductId, changes: &ProductChanges) -> RepositoryResult<usize>;
    /// Soft-delete a single product.
    fn deactivate_product(&self, id: ProductId) -> RepositoryResult<usize>;
}
