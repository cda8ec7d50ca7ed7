//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::token::{TokenError, TokenKeys};

use crate::domain::service::credential::PASSWORD_CHANGE_SKEW;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 signing secret, at least 32 bytes
    pub token_secret: Vec<u8>,
    /// Token lifetime (90 days)
    pub token_ttl: Duration,
    /// Name of the cookie carrying the token
    pub cookie_name: String,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: Vec::new(),
            token_ttl: Duration::from_secs(90 * 24 * 3600),
            cookie_name: "jwt".to_string(),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"[REDACTED]")
            .field("token_ttl", &self.token_ttl)
            .field("cookie_name", &self.cookie_name)
            .field("cookie_secure", &self.cookie_secure)
            .field("cookie_same_site", &self.cookie_same_site)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl AuthConfig {
    /// Create config with a random token secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = vec![0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            token_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    pub fn password_change_skew(&self) -> Duration {
        PASSWORD_CHANGE_SKEW
    }

    /// Cookie attributes for the token; Max-Age follows the token TTL.
    pub fn cookie_config(&self) -> CookieConfig {
        CookieConfig {
            name: self.cookie_name.clone(),
            secure: self.cookie_secure,
            same_site: self.cookie_same_site,
            max_age_secs: Some(self.token_ttl.as_secs()),
            ..CookieConfig::default()
        }
    }

    /// Fails when the secret is shorter than 32 bytes.
    pub fn token_keys(&self) -> Result<TokenKeys, TokenError> {
        TokenKeys::new(&self.token_secret, self.token_ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_secret_is_refused() {
        assert!(matches!(
            AuthConfig::default().token_keys(),
            Err(TokenError::WeakSecret { .. })
        ));
    }

    #[test]
    fn test_development_config() {
        let config = AuthConfig::development();
        assert!(!config.cookie_secure);
        assert!(config.token_keys().is_ok());
        assert_eq!(config.token_ttl, Duration::from_secs(90 * 24 * 3600));
    }

    #[test]
    fn test_cookie_config_follows_ttl() {
        let config = AuthConfig::development();
        let cookie = config.cookie_config();
        assert_eq!(cookie.name, "jwt");
        assert!(cookie.http_only);
        assert_eq!(cookie.max_age_secs, Some(90 * 24 * 3600));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = AuthConfig {
            password_pepper: Some(b"pepper".to_vec()),
            ..AuthConfig::development()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("pepper\""));
        assert!(debug.contains("[REDACTED]"));
    }
}
