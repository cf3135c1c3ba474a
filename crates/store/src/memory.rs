use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use common::{
    DateRange, Page, Product, ProductId, Pvz, PvzId, Reception, ReceptionId, ReceptionStatus, User,
};
use tokio::sync::RwLock;

use crate::store::{ProductStore, PvzStore, ReceptionStore, UserStore, constraints};
use crate::{Result, StoreError};

#[derive(Debug, Default)]
struct Tables {
    pvz: BTreeMap<PvzId, Pvz>,
    receptions: Vec<Reception>,
    products: Vec<Product>,
    users: Vec<User>,
}

/// In-memory store implementation for testing.
///
/// Provides the same interface and unique constraints as the PostgreSQL
/// implementation. Every trait call is counted, and the store can be told
/// to refuse all calls, which lets tests observe exactly when a service
/// touches storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
    calls: Arc<AtomicUsize>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of store trait calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Makes every subsequent call fail with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Returns the number of stored pickup points.
    pub async fn pvz_count(&self) -> usize {
        self.tables.read().await.pvz.len()
    }

    /// Returns the number of stored receptions.
    pub async fn reception_count(&self) -> usize {
        self.tables.read().await.receptions.len()
    }

    /// Returns the number of stored products belonging to a reception.
    pub async fn product_count(&self, reception_id: &ReceptionId) -> usize {
        self.tables
            .read()
            .await
            .products
            .iter()
            .filter(|p| &p.reception_id == reception_id)
            .count()
    }

    fn enter(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "in-memory store is offline".to_string(),
            ));
        }
        Ok(())
    }
}

fn conflict(constraint: &str) -> StoreError {
    StoreError::Conflict {
        constraint: constraint.to_string(),
    }
}

#[async_trait]
impl PvzStore for InMemoryStore {
    async fn create_pvz(&self, pvz: &Pvz) -> Result<()> {
        self.enter()?;
        let mut tables = self.tables.write().await;
        if tables.pvz.contains_key(&pvz.id) {
            return Err(conflict(constraints::PVZ_PRIMARY_KEY));
        }
        tables.pvz.insert(pvz.id.clone(), pvz.clone());
        Ok(())
    }

    async fn list_pvz_page(&self, page: Page) -> Result<Vec<Pvz>> {
        self.enter()?;
        let tables = self.tables.read().await;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        Ok(tables
            .pvz
            .values()
            .skip(offset)
            .take(page.size() as usize)
            .cloned()
            .collect())
    }

    async fn list_all_pvz(&self) -> Result<Vec<Pvz>> {
        self.enter()?;
        Ok(self.tables.read().await.pvz.values().cloned().collect())
    }

    async fn get_pvz(&self, id: &PvzId) -> Result<Option<Pvz>> {
        self.enter()?;
        Ok(self.tables.read().await.pvz.get(id).cloned())
    }
}

#[async_trait]
impl ReceptionStore for InMemoryStore {
    async fn create_reception(&self, reception: &Reception) -> Result<()> {
        self.enter()?;
        let mut tables = self.tables.write().await;

        // Partial unique index simulation
        if reception.status == ReceptionStatus::InProgress
            && tables
                .receptions
                .iter()
                .any(|r| r.pvz_id == reception.pvz_id && r.is_open())
        {
            return Err(conflict(constraints::ONE_OPEN_RECEPTION));
        }

        tables.receptions.push(reception.clone());
        Ok(())
    }

    async fn last_reception_for_pvz(&self, pvz_id: &PvzId) -> Result<Option<Reception>> {
        self.enter()?;
        let tables = self.tables.read().await;
        Ok(tables
            .receptions
            .iter()
            .filter(|r| &r.pvz_id == pvz_id)
            .max_by(|a, b| a.opened_at.cmp(&b.opened_at).then_with(|| a.id.cmp(&b.id)))
            .cloned())
    }

    async fn update_reception_status(
        &self,
        id: &ReceptionId,
        status: ReceptionStatus,
    ) -> Result<()> {
        self.enter()?;
        let mut tables = self.tables.write().await;
        if let Some(reception) = tables.receptions.iter_mut().find(|r| &r.id == id) {
            reception.status = status;
        }
        Ok(())
    }

    async fn receptions_for_pvzs(
        &self,
        pvz_ids: &[PvzId],
        range: DateRange,
    ) -> Result<Vec<Reception>> {
        self.enter()?;
        let tables = self.tables.read().await;
        Ok(tables
            .receptions
            .iter()
            .filter(|r| pvz_ids.contains(&r.pvz_id) && range.contains(r.opened_at))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProductStore for InMemoryStore {
    async fn create_product(&self, product: &Product) -> Result<()> {
        self.enter()?;
        self.tables.write().await.products.push(product.clone());
        Ok(())
    }

    async fn last_product_for_reception(
        &self,
        reception_id: &ReceptionId,
    ) -> Result<Option<Product>> {
        self.enter()?;
        let tables = self.tables.read().await;
        Ok(tables
            .products
            .iter()
            .filter(|p| &p.reception_id == reception_id)
            .max_by(|a, b| a.added_at.cmp(&b.added_at).then_with(|| a.id.cmp(&b.id)))
            .cloned())
    }

    async fn delete_product(&self, id: &ProductId) -> Result<()> {
        self.enter()?;
        self.tables.write().await.products.retain(|p| &p.id != id);
        Ok(())
    }

    async fn products_for_receptions(&self, reception_ids: &[ReceptionId]) -> Result<Vec<Product>> {
        self.enter()?;
        let tables = self.tables.read().await;
        Ok(tables
            .products
            .iter()
            .filter(|p| reception_ids.contains(&p.reception_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn create_user(&self, user: &User) -> Result<()> {
        self.enter()?;
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(conflict(constraints::USER_EMAIL));
        }
        tables.users.push(user.clone());
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.enter()?;
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }
}
