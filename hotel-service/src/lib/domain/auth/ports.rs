use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::RouteRequirement;
use crate::domain::user::models::Identity;

/// Port for credential exchange and per-request authorization.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Exchange username and password for a scoped access token.
    ///
    /// # Errors
    /// * `UnknownUsername` - No account with this username
    /// * `InvalidPassword` - Password does not match
    /// * `Forbidden` - Requested scopes do not include the account's role
    /// * `Internal` - Store or token failure
    async fn login(&self, command: LoginCommand) -> Result<auth::AccessToken, AuthError>;

    /// Resolve a bearer token into the identity allowed through `requirement`.
    ///
    /// Checks run in order: token, subject lookup, scopes, disabled flag,
    /// role presence, role family.
    ///
    /// # Errors
    /// * `CouldNotValidate` - Token invalid, expired or subject unknown
    /// * `InsufficientScope` - No required scope granted
    /// * `Inactive` - Account disabled
    /// * `MissingRole` - Account has no role
    /// * `Forbidden` - Role outside the route's family
    /// * `Internal` - Store failure
    async fn authorize(
        &self,
        token: &str,
        requirement: &RouteRequirement,
    ) -> Result<Identity, AuthError>;
}
