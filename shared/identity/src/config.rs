use std::fmt;

use crate::IdentityError;

pub const DEFAULT_ISSUER: &str = "loyalty-platform";
pub const DEFAULT_IMAGE_SIZE: u32 = 400;
pub const DEFAULT_IMAGE_MARGIN: u32 = 4;
/// Upper bound accepted for `QR_IMAGE_MARGIN`, in modules.
pub const MAX_IMAGE_MARGIN: u32 = 64;

/// Pixel size and quiet margin (in modules) of rendered QR images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageOptions {
    pub size: u32,
    pub margin: u32,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_IMAGE_SIZE,
            margin: DEFAULT_IMAGE_MARGIN,
        }
    }
}

/// Settings shared by [`crate::TokenIssuer`] and [`crate::TokenVerifier`].
///
/// Both sides must be built from the same secret and issuer; changing the
/// secret invalidates every token minted before.
#[derive(Clone)]
pub struct IdentityConfig {
    pub secret: String,
    pub issuer: String,
    pub image: ImageOptions,
}

impl fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("image", &self.image)
            .finish()
    }
}

impl IdentityConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: DEFAULT_ISSUER.to_string(),
            image: ImageOptions::default(),
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn with_image(mut self, image: ImageOptions) -> Self {
        self.image = image;
        self
    }

    /// Reads `QR_TOKEN_SECRET`, `QR_TOKEN_ISSUER`, `QR_IMAGE_SIZE` and
    /// `QR_IMAGE_MARGIN` from the process environment.
    pub fn from_env() -> Result<Self, IdentityError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, IdentityError> {
        let secret = lookup("QR_TOKEN_SECRET")
            .filter(|secret| !secret.trim().is_empty())
            .ok_or(IdentityError::MissingSecret)?;

        let issuer = lookup("QR_TOKEN_ISSUER")
            .filter(|issuer| !issuer.is_empty())
            .unwrap_or_else(|| DEFAULT_ISSUER.to_string());

        let size = parse_setting(&lookup, "QR_IMAGE_SIZE", DEFAULT_IMAGE_SIZE)?;
        if size == 0 {
            return Err(IdentityError::InvalidSetting {
                name: "QR_IMAGE_SIZE",
                value: size.to_string(),
            });
        }
        let margin = parse_setting(&lookup, "QR_IMAGE_MARGIN", DEFAULT_IMAGE_MARGIN)?;
        if margin > MAX_IMAGE_MARGIN {
            return Err(IdentityError::InvalidSetting {
                name: "QR_IMAGE_MARGIN",
                value: margin.to_string(),
            });
        }

        Ok(Self {
            secret,
            issuer,
            image: ImageOptions { size, margin },
        })
    }
}

fn parse_setting(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: u32,
) -> Result<u32, IdentityError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| IdentityError::InvalidSetting { name, value }),
    }
}
