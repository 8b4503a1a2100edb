use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::RouteRequirement;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::models::CredentialRecord;
use crate::domain::user::models::Identity;
use crate::domain::user::models::Role;
use crate::domain::user::models::Username;
use crate::domain::user::ports::CredentialStore;

/// Login and per-request authorization over the credential store.
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    authenticator: Arc<auth::Authenticator>,
    allow_admin_scope_escalation: bool,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        authenticator: Arc<auth::Authenticator>,
        allow_admin_scope_escalation: bool,
    ) -> Self {
        Self {
            store,
            authenticator,
            allow_admin_scope_escalation,
        }
    }

    /// Usernames that fail validation cannot exist in the store.
    async fn find_by_username(&self, username: &str) -> Result<Option<CredentialRecord>, AuthError> {
        match Username::new(username.to_string()) {
            Ok(username) => Ok(self.store.find_by_username(&username).await?),
            Err(_) => Ok(None),
        }
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, AuthError> {
        let authenticator = Arc::clone(&self.authenticator);
        tokio::task::spawn_blocking(move || authenticator.verify_password(&password, &hash))
            .await
            .map_err(|e| AuthError::Internal(format!("Password verification task failed: {}", e)))
    }

    /// Scopes written into the token.
    ///
    /// The caller must ask for their own role tag and then receives the
    /// requested set as is. Admins skip the role tag check only when
    /// escalation is switched on.
    fn grant_scopes(
        &self,
        identity: &Identity,
        requested: &BTreeSet<String>,
    ) -> Result<BTreeSet<String>, AuthError> {
        let role = identity.role.ok_or(AuthError::Forbidden)?;

        if role == Role::Admin && self.allow_admin_scope_escalation {
            tracing::warn!(
                username = %identity.username,
                scopes = ?requested,
                "Admin login granted requested scopes unchecked"
            );
            return Ok(requested.clone());
        }

        if !requested.contains(role.as_str()) {
            return Err(AuthError::Forbidden);
        }

        Ok(requested.clone())
    }
}

#[async_trait]
impl AuthServicePort for AuthService {
    async fn login(&self, command: LoginCommand) -> Result<auth::AccessToken, AuthError> {
        let record = self
            .find_by_username(&command.username)
            .await?
            .ok_or(AuthError::UnknownUsername)?;

        let matches = self
            .verify_password(command.password, record.password_hash.clone())
            .await?;
        if !matches {
            tracing::warn!(username = %record.identity.username, "Login rejected: wrong password");
            return Err(AuthError::InvalidPassword);
        }

        let scopes = self.grant_scopes(&record.identity, &command.scopes)?;
        let token = self
            .authenticator
            .issue_token(record.identity.username.as_str(), scopes.iter().cloned())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        tracing::info!(
            username = %record.identity.username,
            scopes = ?scopes,
            expires_at = %token.expires_at,
            "Access token issued"
        );

        Ok(token)
    }

    async fn authorize(
        &self,
        token: &str,
        requirement: &RouteRequirement,
    ) -> Result<Identity, AuthError> {
        let claims = self
            .authenticator
            .validate_token(token)
            .map_err(|_| AuthError::CouldNotValidate)?;

        let identity = self
            .find_by_username(&claims.sub)
            .await?
            .map(|record| record.identity)
            .ok_or(AuthError::CouldNotValidate)?;

        if !requirement.is_satisfied_by(claims.scopes.iter().map(String::as_str)) {
            return Err(AuthError::InsufficientScope);
        }

        if identity.disabled {
            return Err(AuthError::Inactive);
        }

        let role = identity.role.ok_or(AuthError::MissingRole)?;
        if !requirement.family.admits(role) {
            return Err(AuthError::Forbidden);
        }

        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use chrono::Utc;
    use mockall::mock;

    use super::*;
    use crate::domain::auth::models::RoleFamily;
    use crate::domain::auth::models::Scope;
    use crate::domain::pagination::Page;
    use crate::domain::pagination::PageRequest;
    use crate::domain::user::errors::UserError;
    use crate::domain::user::models::Profile;
    use crate::domain::user::models::Uid;
    use crate::domain::user::models::UserFilter;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    mock! {
        pub TestCredentialStore {}

        #[async_trait]
        impl CredentialStore for TestCredentialStore {
            async fn insert(&self, record: CredentialRecord) -> Result<CredentialRecord, UserError>;
            async fn find_by_uid(&self, uid: &Uid) -> Result<Option<CredentialRecord>, UserError>;
            async fn find_by_username(&self, username: &Username) -> Result<Option<CredentialRecord>, UserError>;
            async fn list(&self, filter: &UserFilter, page: PageRequest) -> Result<Page<CredentialRecord>, UserError>;
            async fn update(&self, record: CredentialRecord) -> Result<CredentialRecord, UserError>;
            async fn delete(&self, uid: &Uid) -> Result<(), UserError>;
        }
    }

    fn authenticator() -> Arc<auth::Authenticator> {
        Arc::new(auth::Authenticator::new(SECRET, Duration::hours(24)))
    }

    fn account(username: &str, password: &str, role: Option<Role>, disabled: bool) -> CredentialRecord {
        CredentialRecord {
            identity: Identity {
                uid: Uid::new(),
                username: Username::new(username.to_string()).unwrap(),
                role,
                position: None,
                disabled,
            },
            profile: Profile::default(),
            password_hash: auth::PasswordHasher::new().hash(password).unwrap(),
            created_at: Utc::now(),
        }
    }

    fn store_with(record: CredentialRecord) -> MockTestCredentialStore {
        let mut store = MockTestCredentialStore::new();
        store
            .expect_find_by_username()
            .returning(move |username| {
                if username == &record.identity.username {
                    Ok(Some(record.clone()))
                } else {
                    Ok(None)
                }
            });
        store
    }

    fn login(username: &str, password: &str, scopes: &[&str]) -> LoginCommand {
        LoginCommand {
            username: username.to_string(),
            password: password.to_string(),
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn token_for(subject: &str, scopes: &[&str]) -> String {
        authenticator()
            .issue_token(subject, scopes.iter().copied())
            .unwrap()
            .access_token
    }

    #[tokio::test]
    async fn test_supervisor_login_and_authorize() {
        let record = account("dev", "secret", Some(Role::Supervisor), false);
        let service = AuthService::new(Arc::new(store_with(record)), authenticator(), false);

        let token = service
            .login(login("dev", "secret", &["me", "supervisor"]))
            .await
            .unwrap();
        assert_eq!(token.token_type, "bearer");
        assert!(token.expires_at > Utc::now() + Duration::hours(23));

        let identity = service
            .authorize(&token.access_token, &RouteRequirement::SUPERVISORS)
            .await
            .unwrap();
        assert_eq!(identity.username.as_str(), "dev");
        assert_eq!(identity.role, Some(Role::Supervisor));
    }

    #[tokio::test]
    async fn test_login_grants_requested_scopes() {
        let record = account("frontdesk", "secret", Some(Role::Employee), false);
        let service = AuthService::new(Arc::new(store_with(record)), authenticator(), false);

        let token = service
            .login(login("frontdesk", "secret", &["me", "employee", "guest"]))
            .await
            .unwrap();

        let claims = authenticator().validate_token(&token.access_token).unwrap();
        assert_eq!(
            claims.scopes,
            ["employee", "guest", "me"]
                .iter()
                .map(|s| s.to_string())
                .collect::<BTreeSet<String>>()
        );
    }

    #[tokio::test]
    async fn test_supervisor_with_employee_scope_reaches_staff_routes() {
        let record = account("dev", "secret", Some(Role::Supervisor), false);
        let service = AuthService::new(Arc::new(store_with(record)), authenticator(), false);

        let token = service
            .login(login("dev", "secret", &["supervisor", "employee"]))
            .await
            .unwrap();

        let identity = service
            .authorize(&token.access_token, &RouteRequirement::STAFF)
            .await
            .unwrap();
        assert_eq!(identity.role, Some(Role::Supervisor));
    }

    #[tokio::test]
    async fn test_login_unknown_username() {
        let record = account("dev", "secret", Some(Role::Supervisor), false);
        let service = AuthService::new(Arc::new(store_with(record)), authenticator(), false);

        let result = service.login(login("nobody", "secret", &["supervisor"])).await;
        assert_eq!(result.unwrap_err(), AuthError::UnknownUsername);

        let result = service.login(login("x", "secret", &["supervisor"])).await;
        assert_eq!(result.unwrap_err(), AuthError::UnknownUsername);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let record = account("dev", "secret", Some(Role::Supervisor), false);
        let service = AuthService::new(Arc::new(store_with(record)), authenticator(), false);

        let result = service.login(login("dev", "wrong", &["supervisor"])).await;
        assert_eq!(result.unwrap_err(), AuthError::InvalidPassword);
    }

    #[tokio::test]
    async fn test_login_requires_own_role_scope() {
        let record = account("101", "secret", Some(Role::Guest), false);
        let service = AuthService::new(Arc::new(store_with(record)), authenticator(), false);

        let result = service.login(login("101", "secret", &["me", "supervisor"])).await;
        assert_eq!(result.unwrap_err(), AuthError::Forbidden);
    }

    #[tokio::test]
    async fn test_login_without_role_is_forbidden() {
        let record = account("ghost", "secret", None, false);
        let service = AuthService::new(Arc::new(store_with(record)), authenticator(), false);

        let result = service.login(login("ghost", "secret", &["me", "guest"])).await;
        assert_eq!(result.unwrap_err(), AuthError::Forbidden);
    }

    #[tokio::test]
    async fn test_admin_escalation_disabled_by_default() {
        let record = account("root", "secret", Some(Role::Admin), false);
        let service = AuthService::new(Arc::new(store_with(record)), authenticator(), false);

        let result = service.login(login("root", "secret", &["supervisor"])).await;
        assert_eq!(result.unwrap_err(), AuthError::Forbidden);
    }

    #[tokio::test]
    async fn test_admin_escalation_grants_requested_scopes() {
        let record = account("root", "secret", Some(Role::Admin), false);
        let service = AuthService::new(Arc::new(store_with(record)), authenticator(), true);

        let token = service
            .login(login("root", "secret", &["me", "supervisor", "guest"]))
            .await
            .unwrap();

        let claims = authenticator().validate_token(&token.access_token).unwrap();
        assert!(claims.has_scope("supervisor"));
        assert!(claims.has_scope("guest"));
        assert!(!claims.has_scope("admin"));
    }

    #[tokio::test]
    async fn test_authorize_rejects_garbage_token() {
        let record = account("dev", "secret", Some(Role::Supervisor), false);
        let service = AuthService::new(Arc::new(store_with(record)), authenticator(), false);

        let result = service
            .authorize("not-a-token", &RouteRequirement::SUPERVISORS)
            .await;
        assert_eq!(result.unwrap_err(), AuthError::CouldNotValidate);
    }

    #[tokio::test]
    async fn test_authorize_rejects_expired_token() {
        let record = account("dev", "secret", Some(Role::Supervisor), false);
        let service = AuthService::new(Arc::new(store_with(record)), authenticator(), false);

        let claims = auth::Claims::for_subject("dev", ["supervisor"], Duration::hours(1))
            .with_expiration(Utc::now().timestamp() - 60);
        let token = auth::JwtHandler::new(SECRET).encode(&claims).unwrap();

        let result = service
            .authorize(&token, &RouteRequirement::SUPERVISORS)
            .await;
        assert_eq!(result.unwrap_err(), AuthError::CouldNotValidate);
    }

    #[tokio::test]
    async fn test_authorize_unknown_subject() {
        let record = account("dev", "secret", Some(Role::Supervisor), false);
        let service = AuthService::new(Arc::new(store_with(record)), authenticator(), false);

        let token = token_for("someone-else", &["supervisor"]);
        let result = service
            .authorize(&token, &RouteRequirement::SUPERVISORS)
            .await;
        assert_eq!(result.unwrap_err(), AuthError::CouldNotValidate);
    }

    #[tokio::test]
    async fn test_authorize_insufficient_scope() {
        let record = account("frontdesk", "secret", Some(Role::Employee), false);
        let service = AuthService::new(Arc::new(store_with(record)), authenticator(), false);

        let token = token_for("frontdesk", &["employee"]);
        let result = service
            .authorize(&token, &RouteRequirement::SUPERVISORS)
            .await;
        assert_eq!(result.unwrap_err(), AuthError::InsufficientScope);
    }

    #[tokio::test]
    async fn test_employee_scopes_against_supervisor_scope() {
        let record = account("frontdesk", "secret", Some(Role::Employee), false);
        let service = AuthService::new(Arc::new(store_with(record)), authenticator(), false);

        let requirement = RouteRequirement {
            scopes: &[Scope::Supervisor],
            family: RoleFamily::SupervisorOnly,
        };
        let token = token_for("frontdesk", &["me", "employee"]);
        let result = service.authorize(&token, &requirement).await;
        assert_eq!(result.unwrap_err(), AuthError::InsufficientScope);
        assert_eq!(AuthError::InsufficientScope.to_string(), "Not enough permissions");
    }

    #[tokio::test]
    async fn test_me_scope_passes_scope_check_but_not_family() {
        let record = account("frontdesk", "secret", Some(Role::Employee), false);
        let service = AuthService::new(Arc::new(store_with(record)), authenticator(), false);

        let token = token_for("frontdesk", &["me", "employee"]);
        let result = service
            .authorize(&token, &RouteRequirement::SUPERVISORS)
            .await;
        assert_eq!(result.unwrap_err(), AuthError::Forbidden);
    }

    #[tokio::test]
    async fn test_disabled_checked_after_scopes() {
        let record = account("dev", "secret", Some(Role::Supervisor), true);
        let service = AuthService::new(Arc::new(store_with(record)), authenticator(), false);

        let token = token_for("dev", &["supervisor"]);
        let result = service
            .authorize(&token, &RouteRequirement::SUPERVISORS)
            .await;
        assert_eq!(result.unwrap_err(), AuthError::Inactive);

        let token = token_for("dev", &["guest"]);
        let result = service
            .authorize(&token, &RouteRequirement::SUPERVISORS)
            .await;
        assert_eq!(result.unwrap_err(), AuthError::InsufficientScope);

        let result = service
            .authorize("garbage", &RouteRequirement::SUPERVISORS)
            .await;
        assert_eq!(result.unwrap_err(), AuthError::CouldNotValidate);
    }

    #[tokio::test]
    async fn test_missing_role() {
        let record = account("ghost", "secret", None, false);
        let service = AuthService::new(Arc::new(store_with(record)), authenticator(), false);

        let token = token_for("ghost", &["me"]);
        let result = service.authorize(&token, &RouteRequirement::MEMBERS).await;
        assert_eq!(result.unwrap_err(), AuthError::MissingRole);
    }

    #[tokio::test]
    async fn test_staff_routes_admit_supervisors_and_employees() {
        let supervisor = account("dev", "secret", Some(Role::Supervisor), false);
        let service = AuthService::new(Arc::new(store_with(supervisor)), authenticator(), false);
        let token = token_for("dev", &["me", "supervisor"]);
        assert!(service
            .authorize(&token, &RouteRequirement::STAFF)
            .await
            .is_ok());

        let guest = account("101", "secret", Some(Role::Guest), false);
        let service = AuthService::new(Arc::new(store_with(guest)), authenticator(), false);
        let token = token_for("101", &["me", "guest"]);
        assert_eq!(
            service
                .authorize(&token, &RouteRequirement::STAFF)
                .await
                .unwrap_err(),
            AuthError::Forbidden
        );
    }

    #[tokio::test]
    async fn test_role_is_reread_from_store() {
        let record = account("frontdesk", "secret", Some(Role::Employee), false);
        let service = AuthService::new(Arc::new(store_with(record)), authenticator(), false);

        // Token claims a supervisor scope the account no longer matches.
        let token = token_for("frontdesk", &["supervisor"]);
        let result = service
            .authorize(&token, &RouteRequirement::SUPERVISORS)
            .await;
        assert_eq!(result.unwrap_err(), AuthError::Forbidden);
    }
}
