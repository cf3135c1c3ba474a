//! Wire shapes for the REST API. Field names are camelCase.

use chrono::{DateTime, Utc};
use common::{City, Product, ProductType, Pvz, Reception, ReceptionStatus, Role, User};
use domain::{PvzWithReceptions, ReceptionWithProducts};
use serde::{Deserialize, Serialize};

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct DummyLoginRequest {
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePvzRequest {
    pub id: Option<String>,
    pub registration_date: Option<DateTime<Utc>>,
    pub city: String,
}

/// Listing query. Everything is taken as text so that bad page numbers
/// fall back to defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPvzQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenReceptionRequest {
    pub pvz_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddProductRequest {
    #[serde(rename = "type")]
    pub product_type: String,
    pub pvz_id: String,
}

// -- Response types --

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.into_inner(),
            email: user.email,
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PvzResponse {
    pub id: String,
    pub registration_date: DateTime<Utc>,
    pub city: City,
}

impl From<Pvz> for PvzResponse {
    fn from(pvz: Pvz) -> Self {
        Self {
            id: pvz.id.into_inner(),
            registration_date: pvz.registration_date,
            city: pvz.city,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceptionResponse {
    pub id: String,
    pub date_time: DateTime<Utc>,
    pub pvz_id: String,
    pub status: ReceptionStatus,
}

impl From<Reception> for ReceptionResponse {
    fn from(reception: Reception) -> Self {
        Self {
            id: reception.id.into_inner(),
            date_time: reception.opened_at,
            pvz_id: reception.pvz_id.into_inner(),
            status: reception.status,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: String,
    pub date_time: DateTime<Utc>,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    pub reception_id: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.into_inner(),
            date_time: product.added_at,
            product_type: product.product_type,
            reception_id: product.reception_id.into_inner(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReceptionListItem {
    pub reception: ReceptionResponse,
    pub products: Vec<ProductResponse>,
}

impl From<ReceptionWithProducts> for ReceptionListItem {
    fn from(item: ReceptionWithProducts) -> Self {
        Self {
            reception: item.reception.into(),
            products: item.products.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PvzListItem {
    pub pvz: PvzResponse,
    pub receptions: Vec<ReceptionListItem>,
}

impl From<PvzWithReceptions> for PvzListItem {
    fn from(item: PvzWithReceptions) -> Self {
        Self {
            pvz: item.pvz.into(),
            receptions: item.receptions.into_iter().map(Into::into).collect(),
        }
    }
}
