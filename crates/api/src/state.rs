//! Shared application state.

use std::sync::Arc;

use auth::JwtService;
use domain::{AccountService, ProductService, PvzService, ReceptionService};
use store::Store;

use crate::observer::OperationObserver;

/// Shared state accessible from all REST handlers and the gRPC service.
pub struct AppState<S: Store> {
    pub pvz: PvzService<S>,
    pub receptions: ReceptionService<S>,
    pub products: ProductService<S>,
    pub accounts: AccountService<S>,
    pub jwt: JwtService,
    pub observer: Arc<dyn OperationObserver>,
}

impl<S: Store> AppState<S> {
    /// Builds every service over one store backend.
    pub fn new(store: S, jwt: JwtService, observer: Arc<dyn OperationObserver>) -> Self {
        Self {
            pvz: PvzService::new(store.clone()),
            receptions: ReceptionService::new(store.clone()),
            products: ProductService::new(store.clone()),
            accounts: AccountService::new(store, jwt.clone()),
            jwt,
            observer,
        }
    }
}
