use std::sync::Arc;

use dto::AuthClaims;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use models::CustomerId;

#[derive(Debug, thiserror::Error)]
pub enum StaffAuthError {
    #[error("missing bearer token")]
    Missing,
    #[error("invalid session token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
    #[error("role {0:?} may not perform this action")]
    Forbidden(String),
}

/// Checks session tokens issued by the login flow. These are ordinary
/// expiring JWTs and are signed with a different secret than identity tokens.
#[derive(Clone)]
pub struct StaffAuthenticator {
    key: Arc<DecodingKey>,
    validation: Validation,
}

impl StaffAuthenticator {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            key: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            validation,
        }
    }

    /// Decodes the `Authorization` header value, which must be `Bearer <jwt>`.
    pub fn authenticate(
        &self,
        authorization: Option<&str>,
    ) -> Result<AuthClaims, StaffAuthError> {
        let token = authorization
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(StaffAuthError::Missing)?;

        Ok(decode::<AuthClaims>(token, &self.key, &self.validation)?.claims)
    }

    pub fn authorize_scanner(
        &self,
        authorization: Option<&str>,
    ) -> Result<AuthClaims, StaffAuthError> {
        let claims = self.authenticate(authorization)?;
        if !claims.can_scan() {
            return Err(StaffAuthError::Forbidden(claims.role));
        }
        Ok(claims)
    }

    pub fn authorize_admin(
        &self,
        authorization: Option<&str>,
    ) -> Result<AuthClaims, StaffAuthError> {
        let claims = self.authenticate(authorization)?;
        if !claims.is_admin() {
            return Err(StaffAuthError::Forbidden(claims.role));
        }
        Ok(claims)
    }

    /// Allows the customer `customer_id` themselves, or any staff member.
    pub fn authorize_customer(
        &self,
        authorization: Option<&str>,
        customer_id: CustomerId,
    ) -> Result<AuthClaims, StaffAuthError> {
        let claims = self.authenticate(authorization)?;
        if !claims.is_customer(customer_id.get()) && !claims.can_scan() {
            return Err(StaffAuthError::Forbidden(claims.role));
        }
        Ok(claims)
    }
}
