//! Opening and closing receptions.
//!
//! Per pickup point the lifecycle is `no reception -> in_progress -> closed`,
//! after which a new reception may be opened. At most one reception per
//! pickup point is in progress at a time; the store's unique constraint
//! backs the check made here.

use common::{PvzId, Reception, ReceptionStatus, Role};
use store::Store;
use store::store::constraints;

use crate::DomainError;
use crate::access::require_employee;

/// Service for the reception lifecycle.
pub struct ReceptionService<S: Store> {
    store: S,
}

impl<S: Store> ReceptionService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Opens a new reception at `pvz_id`. Only employees may do this.
    #[tracing::instrument(skip(self))]
    pub async fn open_reception(&self, pvz_id: &PvzId, role: Role) -> Result<Reception, DomainError> {
        require_employee(role)?;

        if self.store.get_pvz(pvz_id).await?.is_none() {
            return Err(DomainError::PvzNotFound);
        }

        let last = self.store.last_reception_for_pvz(pvz_id).await?;
        if last.is_some_and(|r| r.is_open()) {
            return Err(DomainError::OpenReceptionAlreadyExists);
        }

        let reception = Reception::open(pvz_id.clone());
        self.store.create_reception(&reception).await.map_err(|e| {
            // Lost a race with a concurrent open
            if e.is_conflict_on(constraints::ONE_OPEN_RECEPTION) {
                DomainError::OpenReceptionAlreadyExists
            } else {
                e.into()
            }
        })?;
        Ok(reception)
    }

    /// Closes the most recent reception at `pvz_id` if it is still in progress.
    #[tracing::instrument(skip(self))]
    pub async fn close_last_reception(
        &self,
        pvz_id: &PvzId,
        role: Role,
    ) -> Result<Reception, DomainError> {
        require_employee(role)?;

        let mut reception = self
            .store
            .last_reception_for_pvz(pvz_id)
            .await?
            .filter(|r| r.status.can_close())
            .ok_or(DomainError::NoOpenReceptionToClose)?;

        self.store
            .update_reception_status(&reception.id, ReceptionStatus::Closed)
            .await?;
        reception.status = ReceptionStatus::Closed;
        Ok(reception)
    }
}
