use async_trait::async_trait;

use crate::domain::pagination::Page;
use crate::domain::pagination::PageRequest;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::CreateEmployeeCommand;
use crate::domain::user::models::CreateGuestCommand;
use crate::domain::user::models::CredentialRecord;
use crate::domain::user::models::Identity;
use crate::domain::user::models::Uid;
use crate::domain::user::models::UpdateEmployeeCommand;
use crate::domain::user::models::UpdateGuestCommand;
use crate::domain::user::models::UserFilter;
use crate::domain::user::models::Username;

/// Port for account management operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a staff account.
    ///
    /// # Errors
    /// * `InvalidRole` - Role is not `supervisor` or `employee`
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn create_employee(
        &self,
        command: CreateEmployeeCommand,
    ) -> Result<CredentialRecord, UserError>;

    /// Register a guest account for a room.
    ///
    /// # Errors
    /// * `RoomAlreadyExists` - Room already has an account
    /// * `DatabaseError` - Database operation failed
    async fn create_guest(&self, command: CreateGuestCommand)
        -> Result<CredentialRecord, UserError>;

    /// Retrieve account by identifier.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_user(&self, uid: &Uid) -> Result<CredentialRecord, UserError>;

    /// List accounts matching a filter, one page at a time.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_users(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<Page<CredentialRecord>, UserError>;

    /// Update a staff account on behalf of `actor`.
    ///
    /// Supervisors may change any staff account. Employees may change
    /// their own profile but neither role nor disabled flag.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist or is not a staff account
    /// * `Forbidden` - Actor may not perform this change
    /// * `InvalidRole` - New role is not a staff role
    /// * `UsernameAlreadyExists` - New username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn update_employee(
        &self,
        actor: &Identity,
        uid: &Uid,
        command: UpdateEmployeeCommand,
    ) -> Result<CredentialRecord, UserError>;

    /// Update a guest account.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist or is not a guest account
    /// * `RoomAlreadyExists` - New room already has an account
    /// * `DatabaseError` - Database operation failed
    async fn update_guest(
        &self,
        uid: &Uid,
        command: UpdateGuestCommand,
    ) -> Result<CredentialRecord, UserError>;

    /// Delete an account.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete_user(&self, uid: &Uid) -> Result<(), UserError>;

    /// Create a supervisor account unless the username is already taken.
    ///
    /// # Returns
    /// `true` if an account was created
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn ensure_supervisor(&self, username: Username, password: String)
        -> Result<bool, UserError>;
}

/// Persistence operations for credential records.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Persist a new record.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `RoomAlreadyExists` - Room number is already taken
    /// * `DatabaseError` - Database operation failed
    async fn insert(&self, record: CredentialRecord) -> Result<CredentialRecord, UserError>;

    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_uid(&self, uid: &Uid) -> Result<Option<CredentialRecord>, UserError>;

    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<CredentialRecord>, UserError>;

    /// Records matching `filter`, oldest first, windowed by `page`.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<Page<CredentialRecord>, UserError>;

    /// Replace a stored record.
    ///
    /// # Errors
    /// * `NotFound` - Record does not exist
    /// * `UsernameAlreadyExists` - New username is already taken
    /// * `RoomAlreadyExists` - New room number is already taken
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, record: CredentialRecord) -> Result<CredentialRecord, UserError>;

    /// # Errors
    /// * `NotFound` - Record does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, uid: &Uid) -> Result<(), UserError>;
}
