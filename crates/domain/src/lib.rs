//! Core services of the pickup-point backend.
//!
//! - [`PvzService`] registers pickup points and builds the nested listing
//! - [`ReceptionService`] opens and closes receptions
//! - [`ProductService`] adds products to the open reception and undoes the last add
//! - [`AccountService`] registers users and issues tokens
//!
//! Every service is generic over a [`store::Store`] backend. Role checks run
//! before any store access, and failures are returned as [`DomainError`]
//! without being logged or retried.

pub mod access;
pub mod account;
pub mod error;
pub mod product;
pub mod pvz;
pub mod reception;

pub use account::AccountService;
pub use error::{DomainError, ErrorKind};
pub use product::ProductService;
pub use pvz::{NewPvz, PvzService, PvzWithReceptions, ReceptionWithProducts};
pub use reception::ReceptionService;
