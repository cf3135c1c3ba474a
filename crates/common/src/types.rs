use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error returned when a string does not name a member of one of the
/// closed enums below.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps an existing identifier string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generates a fresh, time-ordered identifier.
            pub fn generate() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the identifier, returning the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identifier of a pickup point. Supplied by the moderator who registers it.
    PvzId
);
string_id!(
    /// Identifier of a goods-reception session.
    ReceptionId
);
string_id!(
    /// Identifier of a product accepted during a reception.
    ProductId
);
string_id!(
    /// Identifier of a registered user.
    UserId
);

/// Caller role carried in every credential.
///
/// Employees run receptions; moderators register pickup points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Employee,
    Moderator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Moderator => "moderator",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "employee" => Ok(Role::Employee),
            "moderator" => Ok(Role::Moderator),
            other => Err(ParseEnumError::new("role", other)),
        }
    }
}

/// The fixed set of cities where pickup points may be registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum City {
    #[serde(rename = "Москва")]
    Moscow,
    #[serde(rename = "Санкт-Петербург")]
    SaintPetersburg,
    #[serde(rename = "Казань")]
    Kazan,
}

impl City {
    /// All supported cities.
    pub const ALL: [City; 3] = [City::Moscow, City::SaintPetersburg, City::Kazan];

    /// Returns the wire (and storage) name of the city.
    pub fn as_str(&self) -> &'static str {
        match self {
            City::Moscow => "Москва",
            City::SaintPetersburg => "Санкт-Петербург",
            City::Kazan => "Казань",
        }
    }
}

impl std::fmt::Display for City {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for City {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        City::ALL
            .into_iter()
            .find(|city| city.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("city", s))
    }
}

/// Status of a reception.
///
/// State transitions for a single reception:
/// ```text
/// InProgress ──► Closed
/// ```
/// `Closed` is terminal; a pickup point reopens by starting a new reception.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReceptionStatus {
    #[default]
    InProgress,
    Closed,
}

impl ReceptionStatus {
    /// Returns true if products may be added or removed in this state.
    pub fn accepts_products(&self) -> bool {
        matches!(self, ReceptionStatus::InProgress)
    }

    /// Returns true if the reception can be closed in this state.
    pub fn can_close(&self) -> bool {
        matches!(self, ReceptionStatus::InProgress)
    }

    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReceptionStatus::Closed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReceptionStatus::InProgress => "in_progress",
            ReceptionStatus::Closed => "closed",
        }
    }
}

impl std::fmt::Display for ReceptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReceptionStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(ReceptionStatus::InProgress),
            "closed" => Ok(ReceptionStatus::Closed),
            other => Err(ParseEnumError::new("reception status", other)),
        }
    }
}

/// Category of an accepted product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductType {
    #[serde(rename = "электроника")]
    Electronics,
    #[serde(rename = "одежда")]
    Clothes,
    #[serde(rename = "обувь")]
    Shoes,
}

impl ProductType {
    pub const ALL: [ProductType; 3] = [
        ProductType::Electronics,
        ProductType::Clothes,
        ProductType::Shoes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Electronics => "электроника",
            ProductType::Clothes => "одежда",
            ProductType::Shoes => "обувь",
        }
    }
}

impl std::fmt::Display for ProductType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("product type", s))
    }
}
