use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Width of the zero-padded customer id printed into identity tokens.
pub const CUSTOMER_ID_WIDTH: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("customer id must be a positive integer, got {0:?}")]
pub struct InvalidCustomerId(pub String);

/// Positive numeric identifier of a customer record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct CustomerId(i64);

impl CustomerId {
    pub fn new(id: i64) -> Result<Self, InvalidCustomerId> {
        if id <= 0 {
            return Err(InvalidCustomerId(id.to_string()));
        }
        Ok(Self(id))
    }

    pub fn get(self) -> i64 {
        self.0
    }

    /// Canonical fixed-width form, e.g. `42` -> `"000042"`. Ids wider than
    /// [`CUSTOMER_ID_WIDTH`] are printed in full.
    pub fn padded(self) -> String {
        format!("{:0width$}", self.0, width = CUSTOMER_ID_WIDTH)
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CustomerId {
    type Err = InvalidCustomerId;

    /// Accepts plain digits, including the zero-padded form carried in tokens.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidCustomerId(s.to_string()));
        }
        let id = s.parse::<i64>().map_err(|_| InvalidCustomerId(s.to_string()))?;
        Self::new(id).map_err(|_| InvalidCustomerId(s.to_string()))
    }
}

impl TryFrom<i64> for CustomerId {
    type Error = InvalidCustomerId;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<CustomerId> for i64 {
    fn from(id: CustomerId) -> Self {
        id.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub points_balance: i64,
}

/// Identity token persisted against a customer row, reused on every
/// "show my QR" request until an admin re-issues it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StoredIdentityToken {
    pub token: String,
    pub image: String, // PNG data URL
    pub created_at: DateTime<Utc>,
}
