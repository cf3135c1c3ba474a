//! Plain entity records exchanged between the store adapters and the services.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{City, ProductId, ProductType, PvzId, ReceptionId, ReceptionStatus, Role, UserId};

/// Timestamps are kept at microsecond precision, the resolution of
/// PostgreSQL `TIMESTAMPTZ`, so a record equals what the store reads back.
const TIMESTAMP_DIGITS: u16 = 6;

fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(TIMESTAMP_DIGITS)
}

/// A registered user. The role is fixed at registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    /// PHC-formatted password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
}

/// A pickup point. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pvz {
    pub id: PvzId,
    pub registration_date: DateTime<Utc>,
    pub city: City,
}

impl Pvz {
    pub fn new(id: impl Into<PvzId>, registration_date: DateTime<Utc>, city: City) -> Self {
        Self {
            id: id.into(),
            registration_date: registration_date.trunc_subsecs(TIMESTAMP_DIGITS),
            city,
        }
    }
}

/// A goods-reception session at a pickup point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reception {
    pub id: ReceptionId,
    pub opened_at: DateTime<Utc>,
    pub pvz_id: PvzId,
    pub status: ReceptionStatus,
}

impl Reception {
    /// Starts a new reception for the given pickup point, stamped now.
    pub fn open(pvz_id: PvzId) -> Self {
        Self {
            id: ReceptionId::generate(),
            opened_at: now(),
            pvz_id,
            status: ReceptionStatus::InProgress,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == ReceptionStatus::InProgress
    }
}

/// A product accepted during a reception.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub added_at: DateTime<Utc>,
    pub product_type: ProductType,
    pub reception_id: ReceptionId,
}

impl Product {
    /// Creates a product stamped now and attached to `reception_id`.
    pub fn new(product_type: ProductType, reception_id: ReceptionId) -> Self {
        Self {
            id: ProductId::generate(),
            added_at: now(),
            product_type,
            reception_id,
        }
    }
}
