use serde::{Deserialize, Serialize};

/// Claims carried by a login session token presented to the api and scanner
/// services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthClaims {
    pub sub: i64, // user id: staff member or customer
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}

impl AuthClaims {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    pub fn can_scan(&self) -> bool {
        matches!(self.role.as_str(), "staff" | "admin")
    }

    /// True for the session of customer `customer_id` themselves.
    pub fn is_customer(&self, customer_id: i64) -> bool {
        self.role == "customer" && self.sub == customer_id
    }
}

/// Signed payload of a customer's loyalty QR identity token.
///
/// Field order is the serialization order, which keeps the signed encoding
/// stable across builds. There is deliberately no `exp` claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityClaims {
    pub version: u32,
    #[serde(rename = "type")]
    pub token_type: String,
    pub customer_id: String,
    pub issuer: String,
    pub nonce: String, // hex
    pub issued_at: i64,
}
