//! HS256 JSON Web Tokens via `jsonwebtoken`.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::{TokenCodec, TokenError};
use crate::domain::{Principal, Role, TokenClaims};

#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    sub: String,
    role: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies self-issued bearer tokens with a shared secret.
///
/// Expiry is not validated here; the auth gate compares `exp` against its
/// clock.
pub struct JwtTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtTokenCodec {
    /// Build a codec from the signing secret.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub", "exp"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

fn timestamp(seconds: i64, claim: &str) -> Result<DateTime<Utc>, TokenError> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| TokenError::invalid(format!("{claim} out of range")))
}

impl TokenCodec for JwtTokenCodec {
    fn issue(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        let wire = WireClaims {
            sub: claims.principal.subject_id().to_string(),
            role: claims.principal.role().as_str().to_owned(),
            iat: claims.issued_at.timestamp(),
            exp: claims.expires_at.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &wire, &self.encoding)
            .map_err(|err| TokenError::signing(err.to_string()))
    }

    fn decode(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let data = decode::<WireClaims>(token, &self.decoding, &self.validation)
            .map_err(|err| TokenError::invalid(err.to_string()))?;
        let wire = data.claims;
        let subject = Uuid::parse_str(&wire.sub)
            .map_err(|_| TokenError::invalid("subject is not a UUID"))?;
        let role: Role = wire
            .role
            .parse()
            .map_err(|_| TokenError::invalid("unknown role"))?;
        Ok(TokenClaims {
            principal: Principal::new(subject, role),
            issued_at: timestamp(wire.iat, "iat")?,
            expires_at: timestamp(wire.exp, "exp")?,
        })
    }
}
