use async_trait::async_trait;
use common::{
    DateRange, Page, Product, ProductId, Pvz, PvzId, Reception, ReceptionId, ReceptionStatus, User,
};

use crate::Result;

/// Names of the unique constraints both backends enforce.
///
/// A write rejected by one of these surfaces as
/// [`StoreError::Conflict`](crate::StoreError::Conflict) carrying the name.
pub mod constraints {
    /// Primary key of the `pvz` table.
    pub const PVZ_PRIMARY_KEY: &str = "pvz_pkey";
    /// Partial unique index allowing one `in_progress` reception per pickup point.
    pub const ONE_OPEN_RECEPTION: &str = "one_open_reception_per_pvz";
    /// Unique email of the `users` table.
    pub const USER_EMAIL: &str = "users_email_key";
}

/// Data access for pickup points.
#[async_trait]
pub trait PvzStore: Send + Sync {
    /// Persists a new pickup point as given.
    async fn create_pvz(&self, pvz: &Pvz) -> Result<()>;

    /// Returns one page of pickup points ordered by id.
    async fn list_pvz_page(&self, page: Page) -> Result<Vec<Pvz>>;

    /// Returns every pickup point ordered by id.
    async fn list_all_pvz(&self) -> Result<Vec<Pvz>>;

    /// Looks up a pickup point by id.
    async fn get_pvz(&self, id: &PvzId) -> Result<Option<Pvz>>;
}

/// Data access for receptions.
#[async_trait]
pub trait ReceptionStore: Send + Sync {
    /// Persists a new reception.
    ///
    /// Fails with a conflict on [`constraints::ONE_OPEN_RECEPTION`] if the
    /// pickup point already has a reception in progress.
    async fn create_reception(&self, reception: &Reception) -> Result<()>;

    /// Returns the reception with the latest opening time for a pickup point.
    async fn last_reception_for_pvz(&self, pvz_id: &PvzId) -> Result<Option<Reception>>;

    /// Sets the status of an existing reception.
    async fn update_reception_status(&self, id: &ReceptionId, status: ReceptionStatus)
    -> Result<()>;

    /// Returns all receptions of the given pickup points opened within `range`.
    async fn receptions_for_pvzs(&self, pvz_ids: &[PvzId], range: DateRange)
    -> Result<Vec<Reception>>;
}

/// Data access for products.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Persists a new product.
    async fn create_product(&self, product: &Product) -> Result<()>;

    /// Returns the most recently added product of a reception.
    async fn last_product_for_reception(&self, reception_id: &ReceptionId)
    -> Result<Option<Product>>;

    /// Deletes a product by id. Deleting a missing product is not an error.
    async fn delete_product(&self, id: &ProductId) -> Result<()>;

    /// Returns all products belonging to the given receptions.
    async fn products_for_receptions(&self, reception_ids: &[ReceptionId]) -> Result<Vec<Product>>;
}

/// Data access for user accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new user. Fails with a conflict on [`constraints::USER_EMAIL`]
    /// if the email is taken.
    async fn create_user(&self, user: &User) -> Result<()>;

    /// Looks up a user by email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
}

/// A backend implementing every store trait.
///
/// Implemented automatically for any cloneable type that provides all four.
pub trait Store: PvzStore + ReceptionStore + ProductStore + UserStore + Clone + 'static {}

impl<T> Store for T where T: PvzStore + ReceptionStore + ProductStore + UserStore + Clone + 'static {}
