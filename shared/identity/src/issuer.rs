use std::sync::Arc;

use chrono::{DateTime, Utc};
use dto::IdentityClaims;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use models::{CustomerId, StoredIdentityToken};
use rand::{rngs::OsRng, RngCore};

use crate::{render::render_qr, IdentityConfig, IdentityError, ImageOptions, RenderedTokenImage};

/// Discriminator carried in the `type` claim of every identity token.
pub const TOKEN_TYPE: &str = "customer_identity";
/// Highest payload version minted and understood by this crate.
pub const TOKEN_VERSION: u32 = 1;

const NONCE_LEN: usize = 16;

/// Result of a mint. Callers persist it once and reuse it afterwards; two
/// mints for the same customer never produce the same token.
#[derive(Debug, Clone)]
pub struct MintedToken {
    pub token: String,
    pub image: RenderedTokenImage,
    pub created_at: DateTime<Utc>,
}

impl MintedToken {
    pub fn into_stored(self) -> StoredIdentityToken {
        StoredIdentityToken {
            image: self.image.to_data_url(),
            token: self.token,
            created_at: self.created_at,
        }
    }
}

#[derive(Clone)]
pub struct TokenIssuer {
    key: Arc<EncodingKey>,
    header: Header,
    issuer: String,
    image: ImageOptions,
}

impl TokenIssuer {
    pub fn new(config: &IdentityConfig) -> Result<Self, IdentityError> {
        if config.secret.is_empty() {
            return Err(IdentityError::MissingSecret);
        }
        Ok(Self {
            key: Arc::new(EncodingKey::from_secret(config.secret.as_bytes())),
            header: Header::new(Algorithm::HS256),
            issuer: config.issuer.clone(),
            image: config.image,
        })
    }

    /// Signs a fresh identity token for `customer_id` and renders its QR image.
    ///
    /// The token has no expiration claim. Nothing is persisted here.
    pub fn mint(&self, customer_id: CustomerId) -> Result<MintedToken, IdentityError> {
        let created_at = Utc::now();
        let claims = self.claims_for(customer_id, created_at)?;
        let token = encode(&self.header, &claims, &self.key)?;
        let image = render_qr(&token, self.image)?;

        tracing::debug!(customer_id = %claims.customer_id, "minted identity token");

        Ok(MintedToken {
            token,
            image,
            created_at,
        })
    }

    fn claims_for(
        &self,
        customer_id: CustomerId,
        issued_at: DateTime<Utc>,
    ) -> Result<IdentityClaims, IdentityError> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.try_fill_bytes(&mut nonce)?;

        Ok(IdentityClaims {
            version: TOKEN_VERSION,
            token_type: TOKEN_TYPE.to_string(),
            customer_id: customer_id.padded(),
            issuer: self.issuer.clone(),
            nonce: hex::encode(nonce),
            issued_at: issued_at.timestamp(),
        })
    }
}
