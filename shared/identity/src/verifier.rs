use std::{fmt, sync::Arc};

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{IdentityConfig, IdentityError, TOKEN_TYPE, TOKEN_VERSION};

/// Why a scanned token was rejected. Staff UIs display [`RejectReason::message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    MalformedOrBadSignature,
    Expired,
    WrongType,
    MissingCustomerId,
    UnsupportedVersion,
    WrongIssuer,
}

impl RejectReason {
    pub fn code(self) -> &'static str {
        match self {
            RejectReason::MalformedOrBadSignature => "malformed_or_bad_signature",
            RejectReason::Expired => "expired",
            RejectReason::WrongType => "wrong_type",
            RejectReason::MissingCustomerId => "missing_customer_id",
            RejectReason::UnsupportedVersion => "unsupported_version",
            RejectReason::WrongIssuer => "wrong_issuer",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            RejectReason::MalformedOrBadSignature => {
                "QR code is invalid or has been tampered with"
            }
            RejectReason::Expired => "QR code has expired",
            RejectReason::WrongType => "QR code is not a customer identity code",
            RejectReason::MissingCustomerId => "QR code does not identify a customer",
            RejectReason::UnsupportedVersion => "QR code version is not supported",
            RejectReason::WrongIssuer => "QR code was issued by another system",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationResult {
    Valid { customer_id: String },
    Invalid { reason: RejectReason },
}

impl VerificationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, VerificationResult::Valid { .. })
    }

    pub fn customer_id(&self) -> Option<&str> {
        match self {
            VerificationResult::Valid { customer_id } => Some(customer_id),
            VerificationResult::Invalid { .. } => None,
        }
    }

    fn invalid(reason: RejectReason) -> Self {
        VerificationResult::Invalid { reason }
    }
}

/// Claims as read from a token whose signature checked out but whose content
/// is not trusted yet. Every field may be missing or hold any JSON type.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UntrustedClaims {
    version: Option<Value>,
    #[serde(rename = "type")]
    token_type: Option<Value>,
    customer_id: Option<Value>,
    issuer: Option<Value>,
    exp: Option<Value>,
}

/// An `exp` that is not a number cannot be compared and counts as expired.
fn is_expired(exp: &Value, now: i64) -> bool {
    exp.as_f64().map_or(true, |exp| now as f64 > exp)
}

/// Only numbers up to [`TOKEN_VERSION`] are understood.
fn is_supported_version(version: &Value) -> bool {
    version
        .as_f64()
        .is_some_and(|version| version <= f64::from(TOKEN_VERSION))
}

#[derive(Clone)]
pub struct TokenVerifier {
    key: Arc<DecodingKey>,
    validation: Validation,
    issuer: String,
}

impl TokenVerifier {
    pub fn new(config: &IdentityConfig) -> Result<Self, IdentityError> {
        if config.secret.is_empty() {
            return Err(IdentityError::MissingSecret);
        }

        // Only the signature and algorithm are checked by jsonwebtoken;
        // expiry and the remaining claims are checked in `verify_at`.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Ok(Self {
            key: Arc::new(DecodingKey::from_secret(config.secret.as_bytes())),
            validation,
            issuer: config.issuer.clone(),
        })
    }

    pub fn verify(&self, token: &str) -> VerificationResult {
        self.verify_at(token, chrono::Utc::now().timestamp())
    }

    /// Checks `token` as of `now` (Unix seconds). The first failing check
    /// decides the reason: signature, expiry, type, customer id, version,
    /// issuer.
    pub fn verify_at(&self, token: &str, now: i64) -> VerificationResult {
        let claims = match decode::<UntrustedClaims>(token.trim(), &self.key, &self.validation) {
            Ok(data) => data.claims,
            Err(_) => {
                return VerificationResult::invalid(RejectReason::MalformedOrBadSignature);
            }
        };

        if claims.exp.as_ref().is_some_and(|exp| is_expired(exp, now)) {
            return VerificationResult::invalid(RejectReason::Expired);
        }

        if claims.token_type.as_ref().and_then(Value::as_str) != Some(TOKEN_TYPE) {
            return VerificationResult::invalid(RejectReason::WrongType);
        }

        let customer_id = match claims.customer_id {
            Some(Value::String(id)) if !id.is_empty() => id,
            _ => return VerificationResult::invalid(RejectReason::MissingCustomerId),
        };

        if claims
            .version
            .as_ref()
            .is_some_and(|version| !is_supported_version(version))
        {
            return VerificationResult::invalid(RejectReason::UnsupportedVersion);
        }

        if claims
            .issuer
            .as_ref()
            .is_some_and(|issuer| issuer.as_str() != Some(self.issuer.as_str()))
        {
            return VerificationResult::invalid(RejectReason::WrongIssuer);
        }

        VerificationResult::Valid { customer_id }
    }
}
