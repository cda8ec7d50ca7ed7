//! Signed Bearer Tokens
//!
//! HS256 JSON Web Tokens carrying the subject id and the issue time.
//! The issue time (`iat`) is what callers compare against a user's last
//! password change, so it is always present and always validated.

use std::fmt;
use std::time::Duration;

use axum::http::{HeaderMap, header};
use chrono::{DateTime, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind as JwtErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// HS256 keys shorter than this are refused.
pub const MIN_SECRET_LENGTH: usize = 32;

/// Registered claims we issue and require.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: Uuid,
    /// Issued at, epoch seconds
    pub iat: i64,
    /// Expiry, epoch seconds
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token secret must be at least {min} bytes (got {actual})")]
    WeakSecret { min: usize, actual: usize },

    #[error("Token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("Token has expired")]
    Expired,

    /// Bad signature, malformed token or missing claim
    #[error("Token is invalid")]
    Invalid,
}

/// A freshly signed token and the claims inside it.
#[derive(Clone)]
pub struct SignedToken {
    pub token: String,
    pub claims: Claims,
}

impl fmt::Debug for SignedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedToken")
            .field("token", &"[REDACTED]")
            .field("claims", &self.claims)
            .finish()
    }
}

/// Signing and verification keys derived from one shared secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, TokenError> {
        if secret.len() < MIN_SECRET_LENGTH {
            return Err(TokenError::WeakSecret {
                min: MIN_SECRET_LENGTH,
                actual: secret.len(),
            });
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, subject: Uuid) -> Result<SignedToken, TokenError> {
        self.issue_at(subject, Utc::now())
    }

    /// Sign a token as if issued at `issued_at`.
    pub fn issue_at(
        &self,
        subject: Uuid,
        issued_at: DateTime<Utc>,
    ) -> Result<SignedToken, TokenError> {
        let iat = issued_at.timestamp();
        let ttl_secs = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: subject,
            iat,
            exp: iat.saturating_add(ttl_secs),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(TokenError::Signing)?;

        Ok(SignedToken { token, claims })
    }

    /// Check signature and expiry and return the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

impl fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenKeys")
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Token from an `Authorization: Bearer <token>` header.
pub fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn keys() -> TokenKeys {
        TokenKeys::new(SECRET, Duration::from_secs(3600)).unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let keys = keys();
        let subject = Uuid::new_v4();
        let signed = keys.issue(subject).unwrap();

        let claims = keys.verify(&signed.token).unwrap();
        assert_eq!(claims.sub, subject);
        assert_eq!(claims, signed.claims);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_issue_at_preserves_issue_time() {
        let issued_at = Utc::now() - chrono::Duration::minutes(5);
        let signed = keys().issue_at(Uuid::new_v4(), issued_at).unwrap();
        assert_eq!(signed.claims.iat, issued_at.timestamp());
        assert!(keys().verify(&signed.token).is_ok());
    }

    #[test]
    fn test_expired_token() {
        let issued_at = Utc::now() - chrono::Duration::hours(3);
        let signed = keys().issue_at(Uuid::new_v4(), issued_at).unwrap();
        assert!(matches!(keys().verify(&signed.token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let signed = keys().issue(Uuid::new_v4()).unwrap();
        let other = TokenKeys::new(&[7u8; 32], Duration::from_secs(3600)).unwrap();
        assert!(matches!(other.verify(&signed.token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let signed = keys().issue(Uuid::new_v4()).unwrap();
        let mut tampered = signed.token.clone();
        tampered.push('x');
        assert!(matches!(keys().verify(&tampered), Err(TokenError::Invalid)));
        assert!(matches!(keys().verify("not.a.jwt"), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_weak_secret_rejected() {
        assert!(matches!(
            TokenKeys::new(b"short", Duration::from_secs(60)),
            Err(TokenError::WeakSecret { min: 32, actual: 5 })
        ));
    }

    #[test]
    fn test_extract_bearer() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_bearer(&headers), Some("abc.def.ghi".to_string()));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_bearer(&headers), None);
    }

    #[test]
    fn test_debug_redaction() {
        let signed = keys().issue(Uuid::new_v4()).unwrap();
        assert!(!format!("{:?}", signed).contains(&signed.token));
        assert!(format!("{:?}", keys()).contains("REDACTED"));
    }
}
