//! Bearer token codec.
//!
//! Tokens are HS256 JWTs carrying the standard claim set `{sub, iat, exp}`
//! where `sub` is the account email. Two independent codecs exist per
//! process - one per signing domain (user, admin) - each a value object of
//! secret plus lifetime. A token minted by one codec is garbage to the
//! other.
//!
//! Verification runs with zero leeway so "rejected after its declared
//! expiry" means exactly that, and expiry is reported distinctly from a bad
//! signature or malformed token.

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode,
    errors::ErrorKind,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tusport_core::Email;

/// Token verification/creation failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The token's expiry timestamp has passed.
    #[error("token expired")]
    Expired,
    /// Bad signature, malformed structure, or claims that don't decode.
    #[error("token invalid")]
    Invalid,
    /// Token could not be created.
    #[error("token encoding failed: {0}")]
    Encoding(String),
}

/// Claims embedded in a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the account email.
    pub sub: String,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

/// A freshly minted token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The signed compact JWT.
    pub token: String,
    /// When it stops being accepted.
    pub expires_at: DateTime<Utc>,
}

/// Codec for one signing domain.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
    validation: Validation,
}

impl TokenCodec {
    /// Create a codec from a signing secret and token lifetime.
    #[must_use]
    pub fn new(secret: &SecretString, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.expose_secret().as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            ttl,
            validation,
        }
    }

    /// Issue a token for an account.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Encoding` if signing fails.
    pub fn issue(&self, email: &Email) -> Result<IssuedToken, TokenError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::from_std(self.ttl).unwrap_or_default();

        let claims = Claims {
            sub: email.as_str().to_owned(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify a token's signature and expiry and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` for a structurally valid token past its
    /// expiry, `TokenError::Invalid` for everything else (bad signature,
    /// malformed token, wrong signing domain).
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data: TokenData<Claims> =
            decode(token, &self.decoding_key, &self.validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })?;

        Ok(data.claims)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    fn email() -> Email {
        Email::parse("a@b.com").unwrap()
    }

    fn codec(s: &str) -> TokenCodec {
        TokenCodec::new(&secret(s), Duration::from_secs(3600))
    }

    #[test]
    fn test_issue_then_verify() {
        let codec = codec("jH8!kPq2wZn5vXr9bTm3cLd7fGs1yAe4");
        let issued = codec.issue(&email()).unwrap();

        assert!(issued.expires_at > Utc::now());

        let claims = codec.verify(&issued.token).unwrap();
        assert_eq!(claims.sub, "a@b.com");
        assert_eq!(claims.exp, issued.expires_at.timestamp());
    }

    #[test]
    fn test_domains_never_cross_validate() {
        let user_codec = codec("jH8!kPq2wZn5vXr9bTm3cLd7fGs1yAe4");
        let admin_codec = codec("Qw7#rTy4uIo1pAs8dFg5hJk2lZx6cVb9");

        let issued = user_codec.issue(&email()).unwrap();
        assert_eq!(
            admin_codec.verify(&issued.token).unwrap_err(),
            TokenError::Invalid
        );

        let issued = admin_codec.issue(&email()).unwrap();
        assert_eq!(
            user_codec.verify(&issued.token).unwrap_err(),
            TokenError::Invalid
        );
    }

    #[test]
    fn test_expired_token_rejected_distinctly() {
        let signing = secret("jH8!kPq2wZn5vXr9bTm3cLd7fGs1yAe4");
        let codec = TokenCodec::new(&signing, Duration::from_secs(3600));

        // Craft a token that expired an hour ago with the same secret.
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "a@b.com".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let stale = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(signing.expose_secret().as_bytes()),
        )
        .unwrap();

        assert_eq!(codec.verify(&stale).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn test_garbage_is_invalid_not_expired() {
        let codec = codec("jH8!kPq2wZn5vXr9bTm3cLd7fGs1yAe4");
        assert_eq!(
            codec.verify("not.a.token").unwrap_err(),
            TokenError::Invalid
        );
        assert_eq!(codec.verify("").unwrap_err(), TokenError::Invalid);
    }
}
