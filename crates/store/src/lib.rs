//! Store adapters for the pickup-point service.
//!
//! The services in `domain` consume the [`PvzStore`], [`ReceptionStore`],
//! [`ProductStore`] and [`UserStore`] traits; [`Store`] bundles all four so a
//! single backend value can be handed to every service. Two backends are
//! provided: [`InMemoryStore`] for tests and [`PostgresStore`] for production.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use postgres::{DatabaseConfig, PostgresStore};
pub use store::{ProductStore, PvzStore, ReceptionStore, Store, UserStore};
