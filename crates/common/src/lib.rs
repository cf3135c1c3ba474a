//! Shared types for the pickup-point service.
//!
//! Everything that crosses a crate boundary lives here: identifier
//! newtypes, the closed enums that replace string-typed roles, cities,
//! statuses and product types, the plain entity records returned by the
//! store adapters, and the pagination/date-range value objects used by
//! listings.

pub mod model;
pub mod page;
pub mod types;

pub use model::{Product, Pvz, Reception, User};
pub use page::{DateRange, Page, PageError};
pub use types::{
    City, ParseEnumError, ProductId, ProductType, PvzId, ReceptionId, ReceptionStatus, Role,
    UserId,
};
