//! Pickup-point registration and the nested listing.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use common::{City, DateRange, Page, Product, Pvz, PvzId, Reception, ReceptionId, Role};
use store::Store;
use store::store::constraints;

use crate::DomainError;
use crate::access::require_moderator;

/// Input for [`PvzService::create_pvz`]. The city is validated by the service.
#[derive(Debug, Clone)]
pub struct NewPvz {
    pub id: PvzId,
    pub registration_date: DateTime<Utc>,
    pub city: String,
}

/// A reception together with its products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceptionWithProducts {
    pub reception: Reception,
    pub products: Vec<Product>,
}

/// A pickup point together with its receptions in the requested window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PvzWithReceptions {
    pub pvz: Pvz,
    pub receptions: Vec<ReceptionWithProducts>,
}

/// Service for registering and listing pickup points.
pub struct PvzService<S: Store> {
    store: S,
}

impl<S: Store> PvzService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Registers a pickup point. Only moderators may do this.
    ///
    /// The id and registration date are stored as given.
    #[tracing::instrument(skip(self))]
    pub async fn create_pvz(&self, new: NewPvz, role: Role) -> Result<Pvz, DomainError> {
        require_moderator(role)?;
        let city: City = new.city.parse().map_err(|_| DomainError::InvalidCity)?;

        let pvz = Pvz::new(new.id, new.registration_date, city);
        self.store.create_pvz(&pvz).await.map_err(|e| {
            if e.is_conflict_on(constraints::PVZ_PRIMARY_KEY) {
                DomainError::PvzAlreadyExists
            } else {
                e.into()
            }
        })?;
        Ok(pvz)
    }

    /// Returns one page of pickup points, each with the receptions opened
    /// within `range` and every product of those receptions.
    ///
    /// Pickup points keep the store's page order; receptions and products are
    /// in the order the store returned them.
    #[tracing::instrument(skip(self))]
    pub async fn list_pvz(
        &self,
        range: DateRange,
        page: Page,
    ) -> Result<Vec<PvzWithReceptions>, DomainError> {
        let pvzs = self.store.list_pvz_page(page).await?;
        if pvzs.is_empty() {
            return Ok(Vec::new());
        }

        let pvz_ids: Vec<PvzId> = pvzs.iter().map(|p| p.id.clone()).collect();
        let receptions = self.store.receptions_for_pvzs(&pvz_ids, range).await?;

        let reception_ids: Vec<ReceptionId> = receptions.iter().map(|r| r.id.clone()).collect();
        let products = self.store.products_for_receptions(&reception_ids).await?;

        Ok(assemble(pvzs, receptions, products))
    }

    /// Returns every pickup point, without receptions.
    #[tracing::instrument(skip(self))]
    pub async fn list_all_pvz(&self) -> Result<Vec<Pvz>, DomainError> {
        Ok(self.store.list_all_pvz().await?)
    }
}

fn assemble(
    pvzs: Vec<Pvz>,
    receptions: Vec<Reception>,
    products: Vec<Product>,
) -> Vec<PvzWithReceptions> {
    let mut products_by_reception: HashMap<ReceptionId, Vec<Product>> = HashMap::new();
    for product in products {
        products_by_reception
            .entry(product.reception_id.clone())
            .or_default()
            .push(product);
    }

    let mut receptions_by_pvz: HashMap<PvzId, Vec<ReceptionWithProducts>> = HashMap::new();
    for reception in receptions {
        let products = products_by_reception
            .remove(&reception.id)
            .unwrap_or_default();
        receptions_by_pvz
            .entry(reception.pvz_id.clone())
            .or_default()
            .push(ReceptionWithProducts {
                reception,
                products,
            });
    }

    pvzs.into_iter()
        .map(|pvz| PvzWithReceptions {
            receptions: receptions_by_pvz.remove(&pvz.id).unwrap_or_default(),
            pvz,
        })
        .collect()
}
