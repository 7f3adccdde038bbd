//! Static loyalty QR identity tokens.
//!
//! A customer is issued one signed, non-expiring token that encodes their
//! canonical id. [`TokenIssuer`] mints the token and its QR image,
//! [`TokenVerifier`] checks scanned strings and reports a tagged
//! [`VerificationResult`] that scan flows branch on. [`StaffAuthenticator`]
//! checks the staff session tokens that guard scanning and re-issuing.

mod config;
mod error;
mod issuer;
mod render;
mod staff;
mod verifier;

pub use config::{
    IdentityConfig, ImageOptions, DEFAULT_IMAGE_MARGIN, DEFAULT_IMAGE_SIZE, DEFAULT_ISSUER,
    MAX_IMAGE_MARGIN,
};
pub use error::IdentityError;
pub use issuer::{MintedToken, TokenIssuer, TOKEN_TYPE, TOKEN_VERSION};
pub use render::{render_qr, RenderedTokenImage};
pub use staff::{StaffAuthError, StaffAuthenticator};
pub use verifier::{RejectReason, TokenVerifier, VerificationResult};
