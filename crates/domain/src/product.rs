//! Adding products to the open reception and undoing the last add.

use common::{Product, ProductType, PvzId, Reception, Role};
use store::Store;

use crate::DomainError;
use crate::access::require_employee;

/// Service for products of the currently open reception.
pub struct ProductService<S: Store> {
    store: S,
}

impl<S: Store> ProductService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Adds a product of `product_type` to the open reception at `pvz_id`.
    #[tracing::instrument(skip(self))]
    pub async fn add_product(
        &self,
        product_type: &str,
        pvz_id: &PvzId,
        role: Role,
    ) -> Result<Product, DomainError> {
        require_employee(role)?;
        let product_type: ProductType = product_type
            .parse()
            .map_err(|_| DomainError::InvalidProductType)?;

        let reception = self
            .open_reception(pvz_id)
            .await?
            .ok_or(DomainError::NoOpenReceptionToAddTo)?;

        let product = Product::new(product_type, reception.id);
        self.store.create_product(&product).await?;
        Ok(product)
    }

    /// Deletes the most recently added product of the open reception at `pvz_id`.
    #[tracing::instrument(skip(self))]
    pub async fn delete_last_product(&self, pvz_id: &PvzId, role: Role) -> Result<(), DomainError> {
        require_employee(role)?;

        let reception = self
            .open_reception(pvz_id)
            .await?
            .ok_or(DomainError::NoOpenReceptionToDeleteFrom)?;

        let product = self
            .store
            .last_product_for_reception(&reception.id)
            .await?
            .ok_or(DomainError::NoProductsToDelete)?;

        self.store.delete_product(&product.id).await?;
        Ok(())
    }

    /// The most recent reception at `pvz_id`, if it still accepts products.
    async fn open_reception(&self, pvz_id: &PvzId) -> Result<Option<Reception>, DomainError> {
        Ok(self
            .store
            .last_reception_for_pvz(pvz_id)
            .await?
            .filter(|r| r.status.accepts_products()))
    }
}
