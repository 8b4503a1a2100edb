use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Token type reported alongside every issued access token.
pub const TOKEN_TYPE: &str = "bearer";

/// Authentication coordinator combining password hashing and JWT handling.
///
/// Holds no per-user state: tokens are validated purely by signature and expiry.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    token_lifetime: Duration,
}

/// Result of successful token issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// Signed JWT access token
    pub access_token: String,
    /// Always `"bearer"`
    pub token_type: &'static str,
    /// Absolute expiry of the token
    pub expires_at: DateTime<Utc>,
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    /// * `token_lifetime` - Validity period of every issued token
    ///
    /// # Returns
    /// Configured Authenticator instance
    pub fn new(jwt_secret: &[u8], token_lifetime: Duration) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret),
            token_lifetime,
        }
    }

    /// Validity period applied to issued tokens.
    pub fn token_lifetime(&self) -> Duration {
        self.token_lifetime
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// Malformed hashes never match.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Mint a signed token for `subject` carrying `scopes`.
    ///
    /// # Arguments
    /// * `subject` - Username the token identifies
    /// * `scopes` - Granted scope tags
    ///
    /// # Returns
    /// AccessToken expiring `token_lifetime` from now
    ///
    /// # Errors
    /// * `EncodingFailed` - Token generation failed
    pub fn issue_token<I, S>(&self, subject: &str, scopes: I) -> Result<AccessToken, JwtError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let claims = Claims::for_subject(subject, scopes, self.token_lifetime);
        let access_token = self.jwt_handler.encode(&claims)?;
        let expires_at = claims
            .expires_at()
            .ok_or_else(|| JwtError::EncodingFailed("expiry out of range".to_string()))?;

        Ok(AccessToken {
            access_token,
            token_type: TOKEN_TYPE,
            expires_at,
        })
    }

    /// Validate and decode a token.
    ///
    /// # Errors
    /// * `InvalidToken` - Token validation or decoding failed
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.decode(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator() -> Authenticator {
        Authenticator::new(b"test_secret_key_at_least_32_bytes!", Duration::hours(24))
    }

    #[test]
    fn test_hash_and_verify_password() {
        let authenticator = authenticator();

        let hash = authenticator
            .hash_password("my_password")
            .expect("Failed to hash password");

        assert!(authenticator.verify_password("my_password", &hash));
        assert!(!authenticator.verify_password("wrong_password", &hash));
    }

    #[test]
    fn test_issue_and_validate_token() {
        let authenticator = authenticator();

        let issued = authenticator
            .issue_token("dev", ["me", "supervisor"])
            .expect("Failed to issue token");

        assert_eq!(issued.token_type, "bearer");
        assert!(!issued.access_token.is_empty());

        let claims = authenticator
            .validate_token(&issued.access_token)
            .expect("Failed to validate token");
        assert_eq!(claims.sub, "dev");
        assert!(claims.has_scope("supervisor"));
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
        assert_eq!(claims.expires_at(), Some(issued.expires_at));
    }

    #[test]
    fn test_validate_token_from_other_secret() {
        let issuer = Authenticator::new(b"another_secret_at_least_32_bytes!!", Duration::hours(1));
        let issued = issuer.issue_token("dev", ["me"]).expect("Failed to issue token");

        let result = authenticator().validate_token(&issued.access_token);
        assert_eq!(result, Err(JwtError::InvalidToken));
    }

    #[test]
    fn test_validate_invalid_token() {
        let result = authenticator().validate_token("invalid.token.here");
        assert!(result.is_err());
    }
}
