use crate::db::{DbConnection, DbPool};
use crate::domain::category::{Category, NewCategory};
use crate::domain::cookie::{Cookie, NewCookie};
use crate::domain::types::{CategoryId, CookieId, TechnicalName};

pub mod batch;
pub mod category;
pub mod cookie;
pub mod errors;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
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

/// Query parameters for listing categories.
#[derive(Debug, Clone, Default)]
pub struct CategoryListQuery {
    /// Restrict to categories with `active = true`.
    pub active_only: bool,
}

impl CategoryListQuery {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn active_only(mut self) -> Self {
        self.active_only = true;
        self
    }
}

/// Query parameters for listing cookies.
#[derive(Debug, Clone, Default)]
pub struct CookieListQuery {
    /// Restrict to active cookies whose category is active as well.
    pub active_only: bool,
    /// Filter by owning category.
    pub category_id: Option<CategoryId>,
}

impl CookieListQuery {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn active_only(mut self) -> Self {
        self.active_only = true;
        self
    }
    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// List categories ordered by position.
    fn list_categories(&self, query: CategoryListQuery) -> RepositoryResult<Vec<Category>>;
    /// Retrieve a category by its identifier.
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
    /// Retrieve a category by its technical name.
    fn get_category_by_technical_name(
        &self,
        technical_name: &TechnicalName,
    ) -> RepositoryResult<Option<Category>>;
}

/// Write operations for category entities.
pub trait CategoryWriter {
    /// Persist a new category with its translations.
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category>;
    /// Persist all fields of `category`; translations it carries are upserted.
    fn update_category(&self, category: &Category) -> RepositoryResult<Category>;
    /// Delete a category together with its cookies, items and translations.
    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize>;
}

/// Read-only operations for cookie entities.
pub trait CookieReader {
    /// List cookies ordered by category position, then own position.
    fn list_cookies(&self, query: CookieListQuery) -> RepositoryResult<Vec<Cookie>>;
    /// Retrieve a cookie with its items by identifier.
    fn get_cookie_by_id(&self, id: CookieId) -> RepositoryResult<Option<Cookie>>;
    /// Retrieve a cookie with its items by technical name.
    fn get_cookie_by_technical_name(
        &self,
        technical_name: &TechnicalName,
    ) -> RepositoryResult<Option<Cookie>>;
}

/// Write operations for cookie entities.
pub trait CookieWriter {
    /// Persist a new cookie with its translations and items.
    fn create_cookie(&self, cookie: &NewCookie) -> RepositoryResult<Cookie>;
    /// Persist the cookie aggregate.
    ///
    /// Items without an id are inserted, items with an id are updated and
    /// stored items missing from `cookie.items` are deleted.
    fn update_cookie(&self, cookie: &Cookie) -> RepositoryResult<Cookie>;
    /// Delete a cookie together with its items and translations.
    fn delete_cookie(&self, id: CookieId) -> RepositoryResult<usize>;
}

/// A single category mutation inside an import batch.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryWrite {
    Create(NewCategory),
    Update(Category),
}

/// A single cookie mutation inside an import batch.
#[derive(Debug, Clone, PartialEq)]
pub enum CookieWrite {
    Create(NewCookie),
    Update(Cookie),
}

/// Transactional batch writes used by the import engine.
///
/// Each call commits once: either every write of the batch is persisted or
/// none is.
pub trait TaxonomyBatchWriter {
    fn write_categories(&self, writes: &[CategoryWrite]) -> RepositoryResult<usize>;
    fn write_cookies(&self, writes: &[CookieWrite]) -> RepositoryResult<usize>;
}
