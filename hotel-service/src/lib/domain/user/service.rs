use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::pagination::Page;
use crate::domain::pagination::PageRequest;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::CreateEmployeeCommand;
use crate::domain::user::models::CreateGuestCommand;
use crate::domain::user::models::CredentialRecord;
use crate::domain::user::models::Identity;
use crate::domain::user::models::Profile;
use crate::domain::user::models::Role;
use crate::domain::user::models::Uid;
use crate::domain::user::models::UpdateEmployeeCommand;
use crate::domain::user::models::UpdateGuestCommand;
use crate::domain::user::models::UserFilter;
use crate::domain::user::models::Username;
use crate::domain::user::ports::CredentialStore;
use crate::domain::user::ports::UserServicePort;

/// Domain service for account management.
///
/// Holds the store behind a trait object so the backend can be picked from
/// configuration at startup.
pub struct UserService {
    store: Arc<dyn CredentialStore>,
    password_hasher: auth::PasswordHasher,
}

impl UserService {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            store,
            password_hasher: auth::PasswordHasher::new(),
        }
    }

    /// Argon2 is CPU bound; keep it off the async workers.
    async fn hash_password(&self, password: String) -> Result<String, UserError> {
        let hasher = self.password_hasher;
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| UserError::Unknown(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| UserError::Unknown(format!("Password hashing failed: {}", e)))
    }

    async fn find_existing(&self, uid: &Uid) -> Result<CredentialRecord, UserError> {
        self.store
            .find_by_uid(uid)
            .await?
            .ok_or(UserError::NotFound(uid.to_string()))
    }
}

fn staff_role(role: Role) -> Result<Role, UserError> {
    if role.is_staff() {
        Ok(role)
    } else {
        Err(UserError::InvalidRole(format!(
            "{} is not a staff role",
            role
        )))
    }
}

#[async_trait]
impl UserServicePort for UserService {
    async fn create_employee(
        &self,
        command: CreateEmployeeCommand,
    ) -> Result<CredentialRecord, UserError> {
        let role = staff_role(command.role)?;
        let password_hash = self.hash_password(command.password).await?;

        let record = CredentialRecord {
            identity: Identity {
                uid: Uid::new(),
                username: command.username,
                role: Some(role),
                position: command.position,
                disabled: false,
            },
            profile: Profile {
                firstname: Some(command.firstname),
                lastname: Some(command.lastname),
                nickname: command.nickname,
                tel: Some(command.tel),
                room_number: None,
            },
            password_hash,
            created_at: Utc::now(),
        };

        let created = self.store.insert(record).await?;
        tracing::info!(
            uid = %created.identity.uid,
            username = %created.identity.username,
            role = %role,
            "Staff account created"
        );

        Ok(created)
    }

    async fn create_guest(
        &self,
        command: CreateGuestCommand,
    ) -> Result<CredentialRecord, UserError> {
        let password_hash = self.hash_password(command.password).await?;
        let room_number = command.room_number.as_str().to_string();

        let record = CredentialRecord {
            identity: Identity {
                uid: Uid::new(),
                username: command.room_number,
                role: Some(Role::Guest),
                position: None,
                disabled: false,
            },
            profile: Profile {
                room_number: Some(room_number),
                ..Profile::default()
            },
            password_hash,
            created_at: Utc::now(),
        };

        let created = self.store.insert(record).await?;
        tracing::info!(
            uid = %created.identity.uid,
            room = %created.identity.username,
            "Guest account created"
        );

        Ok(created)
    }

    async fn get_user(&self, uid: &Uid) -> Result<CredentialRecord, UserError> {
        self.find_existing(uid).await
    }

    async fn list_users(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<Page<CredentialRecord>, UserError> {
        self.store.list(filter, page).await
    }

    async fn update_employee(
        &self,
        actor: &Identity,
        uid: &Uid,
        command: UpdateEmployeeCommand,
    ) -> Result<CredentialRecord, UserError> {
        let is_supervisor = actor.role == Some(Role::Supervisor);
        if !is_supervisor {
            if actor.uid != *uid {
                return Err(UserError::Forbidden(
                    "Employees may only update their own account".to_string(),
                ));
            }
            if command.changes_privileges() {
                return Err(UserError::Forbidden(
                    "Only supervisors may change role or disabled status".to_string(),
                ));
            }
        }

        let mut record = self.find_existing(uid).await?;
        if !record.identity.role.map_or(true, |role| role.is_staff()) {
            return Err(UserError::NotFound(uid.to_string()));
        }

        if let Some(role) = command.role {
            record.identity.role = Some(staff_role(role)?);
        }
        if let Some(username) = command.username {
            record.identity.username = username;
        }
        if let Some(position) = command.position {
            record.identity.position = Some(position);
        }
        if let Some(disabled) = command.disabled {
            record.identity.disabled = disabled;
        }
        if let Some(firstname) = command.firstname {
            record.profile.firstname = Some(firstname);
        }
        if let Some(lastname) = command.lastname {
            record.profile.lastname = Some(lastname);
        }
        if let Some(nickname) = command.nickname {
            record.profile.nickname = Some(nickname);
        }
        if let Some(tel) = command.tel {
            record.profile.tel = Some(tel);
        }
        if let Some(password) = command.password {
            record.password_hash = self.hash_password(password).await?;
        }

        let updated = self.store.update(record).await?;
        tracing::info!(uid = %uid, actor = %actor.username, "Staff account updated");

        Ok(updated)
    }

    async fn update_guest(
        &self,
        uid: &Uid,
        command: UpdateGuestCommand,
    ) -> Result<CredentialRecord, UserError> {
        let mut record = self.find_existing(uid).await?;
        if record.identity.role != Some(Role::Guest) {
            return Err(UserError::NotFound(uid.to_string()));
        }

        if let Some(room_number) = command.room_number {
            record.profile.room_number = Some(room_number.as_str().to_string());
            record.identity.username = room_number;
        }
        if let Some(disabled) = command.disabled {
            record.identity.disabled = disabled;
        }
        if let Some(password) = command.password {
            record.password_hash = self.hash_password(password).await?;
        }

        let updated = self.store.update(record).await?;
        tracing::info!(uid = %uid, "Guest account updated");

        Ok(updated)
    }

    async fn delete_user(&self, uid: &Uid) -> Result<(), UserError> {
        self.store.delete(uid).await?;
        tracing::info!(uid = %uid, "Account deleted");

        Ok(())
    }

    async fn ensure_supervisor(
        &self,
        username: Username,
        password: String,
    ) -> Result<bool, UserError> {
        if self.store.find_by_username(&username).await?.is_some() {
            return Ok(false);
        }

        let password_hash = self.hash_password(password).await?;
        let record = CredentialRecord {
            identity: Identity {
                uid: Uid::new(),
                username,
                role: Some(Role::Supervisor),
                position: None,
                disabled: false,
            },
            profile: Profile::default(),
            password_hash,
            created_at: Utc::now(),
        };

        let created = self.store.insert(record).await?;
        tracing::warn!(
            username = %created.identity.username,
            "Bootstrap supervisor account created"
        );

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;

    use super::*;

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

    fn record(username: &str, role: Option<Role>) -> CredentialRecord {
        CredentialRecord {
            identity: Identity {
                uid: Uid::new(),
                username: Username::new(username.to_string()).unwrap(),
                role,
                position: None,
                disabled: false,
            },
            profile: Profile::default(),
            password_hash: "$argon2id$test_hash".to_string(),
            created_at: Utc::now(),
        }
    }

    fn employee_command(role: Role) -> CreateEmployeeCommand {
        CreateEmployeeCommand {
            username: Username::new("frontdesk".to_string()).unwrap(),
            password: "password123".to_string(),
            role,
            position: Some("Reception".to_string()),
            firstname: "Ada".to_string(),
            lastname: "Lovelace".to_string(),
            nickname: None,
            tel: "0800000000".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_employee_success() {
        let mut store = MockTestCredentialStore::new();

        store
            .expect_insert()
            .withf(|record| {
                record.identity.username.as_str() == "frontdesk"
                    && record.identity.role == Some(Role::Employee)
                    && !record.identity.disabled
                    && record.password_hash.starts_with("$argon2")
            })
            .times(1)
            .returning(Ok);

        let service = UserService::new(Arc::new(store));

        let created = service
            .create_employee(employee_command(Role::Employee))
            .await
            .unwrap();
        assert_eq!(created.profile.firstname.as_deref(), Some("Ada"));
        assert_eq!(created.identity.position.as_deref(), Some("Reception"));
        assert!(auth::PasswordHasher::new().verify("password123", &created.password_hash));
    }

    #[tokio::test]
    async fn test_create_employee_rejects_non_staff_role() {
        let mut store = MockTestCredentialStore::new();
        store.expect_insert().times(0);

        let service = UserService::new(Arc::new(store));

        for role in [Role::Guest, Role::Admin] {
            let result = service.create_employee(employee_command(role)).await;
            assert!(matches!(result, Err(UserError::InvalidRole(_))));
        }
    }

    #[tokio::test]
    async fn test_create_employee_duplicate_username() {
        let mut store = MockTestCredentialStore::new();
        store.expect_insert().times(1).returning(|record| {
            Err(UserError::UsernameAlreadyExists(
                record.identity.username.as_str().to_string(),
            ))
        });

        let service = UserService::new(Arc::new(store));

        let result = service
            .create_employee(employee_command(Role::Supervisor))
            .await;
        assert!(matches!(result, Err(UserError::UsernameAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_create_guest_uses_room_as_username() {
        let mut store = MockTestCredentialStore::new();
        store
            .expect_insert()
            .withf(|record| {
                record.identity.username.as_str() == "101"
                    && record.profile.room_number.as_deref() == Some("101")
                    && record.identity.role == Some(Role::Guest)
            })
            .times(1)
            .returning(Ok);

        let service = UserService::new(Arc::new(store));

        let created = service
            .create_guest(CreateGuestCommand {
                room_number: Username::new("101".to_string()).unwrap(),
                password: "room-secret".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(created.identity.role, Some(Role::Guest));
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut store = MockTestCredentialStore::new();
        store.expect_find_by_uid().times(1).returning(|_| Ok(None));

        let service = UserService::new(Arc::new(store));

        let result = service.get_user(&Uid::new()).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_supervisor_updates_role_and_disabled() {
        let mut store = MockTestCredentialStore::new();
        let target = record("frontdesk", Some(Role::Employee));
        let target_uid = target.identity.uid;

        store
            .expect_find_by_uid()
            .times(1)
            .returning(move |_| Ok(Some(target.clone())));
        store
            .expect_update()
            .withf(|record| {
                record.identity.role == Some(Role::Supervisor) && record.identity.disabled
            })
            .times(1)
            .returning(Ok);

        let service = UserService::new(Arc::new(store));
        let actor = record("dev", Some(Role::Supervisor)).identity;

        let command = UpdateEmployeeCommand {
            role: Some(Role::Supervisor),
            disabled: Some(true),
            ..UpdateEmployeeCommand::default()
        };
        let updated = service
            .update_employee(&actor, &target_uid, command)
            .await
            .unwrap();
        assert_eq!(updated.identity.uid, target_uid);
    }

    #[tokio::test]
    async fn test_employee_cannot_update_someone_else() {
        let mut store = MockTestCredentialStore::new();
        store.expect_find_by_uid().times(0);
        store.expect_update().times(0);

        let service = UserService::new(Arc::new(store));
        let actor = record("frontdesk", Some(Role::Employee)).identity;

        let command = UpdateEmployeeCommand {
            tel: Some("0811111111".to_string()),
            ..UpdateEmployeeCommand::default()
        };
        let result = service.update_employee(&actor, &Uid::new(), command).await;
        assert!(matches!(result, Err(UserError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_employee_cannot_change_own_role() {
        let mut store = MockTestCredentialStore::new();
        store.expect_update().times(0);

        let service = UserService::new(Arc::new(store));
        let actor = record("frontdesk", Some(Role::Employee)).identity;
        let own_uid = actor.uid;

        let command = UpdateEmployeeCommand {
            role: Some(Role::Supervisor),
            ..UpdateEmployeeCommand::default()
        };
        let result = service.update_employee(&actor, &own_uid, command).await;
        assert!(matches!(result, Err(UserError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_employee_updates_own_profile_and_password() {
        let mut store = MockTestCredentialStore::new();
        let own = record("frontdesk", Some(Role::Employee));
        let actor = own.identity.clone();
        let own_uid = actor.uid;

        store
            .expect_find_by_uid()
            .times(1)
            .returning(move |_| Ok(Some(own.clone())));
        store
            .expect_update()
            .withf(|record| {
                record.profile.nickname.as_deref() == Some("Ada")
                    && record.password_hash != "$argon2id$test_hash"
            })
            .times(1)
            .returning(Ok);

        let service = UserService::new(Arc::new(store));

        let command = UpdateEmployeeCommand {
            nickname: Some("Ada".to_string()),
            password: Some("new-password".to_string()),
            ..UpdateEmployeeCommand::default()
        };
        let updated = service
            .update_employee(&actor, &own_uid, command)
            .await
            .unwrap();
        assert!(auth::PasswordHasher::new().verify("new-password", &updated.password_hash));
    }

    #[tokio::test]
    async fn test_update_employee_skips_guest_accounts() {
        let mut store = MockTestCredentialStore::new();
        let guest = record("101", Some(Role::Guest));
        let guest_uid = guest.identity.uid;

        store
            .expect_find_by_uid()
            .times(1)
            .returning(move |_| Ok(Some(guest.clone())));
        store.expect_update().times(0);

        let service = UserService::new(Arc::new(store));
        let actor = record("dev", Some(Role::Supervisor)).identity;

        let result = service
            .update_employee(&actor, &guest_uid, UpdateEmployeeCommand::default())
            .await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_guest_moves_room() {
        let mut store = MockTestCredentialStore::new();
        let guest = record("101", Some(Role::Guest));
        let guest_uid = guest.identity.uid;

        store
            .expect_find_by_uid()
            .times(1)
            .returning(move |_| Ok(Some(guest.clone())));
        store
            .expect_update()
            .withf(|record| {
                record.identity.username.as_str() == "202"
                    && record.profile.room_number.as_deref() == Some("202")
            })
            .times(1)
            .returning(Ok);

        let service = UserService::new(Arc::new(store));

        let command = UpdateGuestCommand {
            room_number: Some(Username::new("202".to_string()).unwrap()),
            ..UpdateGuestCommand::default()
        };
        assert!(service.update_guest(&guest_uid, command).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_user_not_found() {
        let mut store = MockTestCredentialStore::new();
        store
            .expect_delete()
            .times(1)
            .returning(|uid| Err(UserError::NotFound(uid.to_string())));

        let service = UserService::new(Arc::new(store));

        let result = service.delete_user(&Uid::new()).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_ensure_supervisor_creates_once() {
        let mut store = MockTestCredentialStore::new();
        store
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));
        store
            .expect_insert()
            .withf(|record| record.identity.role == Some(Role::Supervisor))
            .times(1)
            .returning(Ok);

        let service = UserService::new(Arc::new(store));

        let created = service
            .ensure_supervisor(
                Username::new("dev".to_string()).unwrap(),
                "secret".to_string(),
            )
            .await
            .unwrap();
        assert!(created);
    }

    #[tokio::test]
    async fn test_ensure_supervisor_keeps_existing_account() {
        let mut store = MockTestCredentialStore::new();
        let existing = record("dev", Some(Role::Supervisor));
        store
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        store.expect_insert().times(0);

        let service = UserService::new(Arc::new(store));

        let created = service
            .ensure_supervisor(
                Username::new("dev".to_string()).unwrap(),
                "secret".to_string(),
            )
            .await
            .unwrap();
        assert!(!created);
    }
}
