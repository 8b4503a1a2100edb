use std::collections::BTreeSet;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried by an issued bearer token.
///
/// The subject is the username; `scopes` are the capability tags granted at
/// login. Clients treat the encoded token as opaque.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,

    /// Granted scope tags
    #[serde(default)]
    pub scopes: BTreeSet<String>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a subject valid from now for `lifetime`.
    ///
    /// # Arguments
    /// * `subject` - Username the token is issued to
    /// * `scopes` - Granted scope tags
    /// * `lifetime` - Time until the token expires
    ///
    /// # Returns
    /// Claims with sub, scopes, iat and exp set
    pub fn for_subject<I, S>(subject: impl ToString, scopes: I, lifetime: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let now = Utc::now();

        Self {
            sub: subject.to_string(),
            scopes: scopes.into_iter().map(Into::into).collect(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        }
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = exp;
        self
    }

    /// Set issued at (Unix timestamp).
    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.iat = iat;
        self
    }

    /// Check whether a scope tag was granted.
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.contains(scope)
    }

    /// Expiration as a UTC datetime.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Check if token is expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_subject() {
        let claims = Claims::for_subject("dev", ["me", "supervisor"], Duration::hours(24));

        assert_eq!(claims.sub, "dev");
        assert!(claims.has_scope("me"));
        assert!(claims.has_scope("supervisor"));
        assert!(!claims.has_scope("guest"));
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_duplicate_scopes_collapse() {
        let claims = Claims::for_subject("dev", ["me", "me", "guest"], Duration::minutes(5));
        assert_eq!(claims.scopes.len(), 2);
    }

    #[test]
    fn test_is_expired() {
        let claims = Claims::for_subject("dev", Vec::<String>::new(), Duration::zero())
            .with_expiration(1000);

        assert!(!claims.is_expired(999));
        assert!(!claims.is_expired(1000));
        assert!(claims.is_expired(1001));
    }

    #[test]
    fn test_expires_at() {
        let claims = Claims::for_subject("dev", ["me"], Duration::zero()).with_expiration(0);
        assert_eq!(claims.expires_at(), DateTime::from_timestamp(0, 0));
    }
}
