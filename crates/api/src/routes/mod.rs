//! REST handlers.

pub mod auth;
pub mod dto;
pub mod health;
pub mod metrics;
pub mod products;
pub mod pvz;
pub mod receptions;
