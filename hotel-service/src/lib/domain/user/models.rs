use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::user::errors::UidError;
use crate::domain::user::errors::UsernameError;

/// Account role.
///
/// Closed set: anything else read from the store becomes "no role" and every
/// authorization check fails closed on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Supervisor,
    Employee,
    Guest,
    Admin,
}

impl Role {
    /// Lowercase tag used in storage, scopes and responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Supervisor => "supervisor",
            Role::Employee => "employee",
            Role::Guest => "guest",
            Role::Admin => "admin",
        }
    }

    /// Parse a role tag, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "supervisor" => Some(Role::Supervisor),
            "employee" => Some(Role::Employee),
            "guest" => Some(Role::Guest),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Roles held by hotel staff (as opposed to guests and administrators).
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Supervisor | Role::Employee)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Uid(pub Uuid);

impl Uid {
    /// Generate a new random uid.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a uid from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UidError> {
        Uuid::parse_str(s)
            .map(Uid)
            .map_err(|e| UidError::InvalidFormat(e.to_string()))
    }
}

impl Default for Uid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// 3-32 characters of alphanumerics, underscore, hyphen and dot. Guest
/// accounts use their room number as username.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 32;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `TooShort` - Username shorter than 3 characters
    /// * `TooLong` - Username longer than 32 characters
    /// * `InvalidCharacters` - Contains characters other than alphanumerics, `_`, `-` and `.`
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let username = Self::with_valid_length(username)?;
        let username = Self::with_valid_chars(username)?;
        Ok(Self(username))
    }

    fn with_valid_length(username: String) -> Result<String, UsernameError> {
        let length = username.chars().count();
        if length < Self::MIN_LENGTH {
            Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(username)
        }
    }

    fn with_valid_chars(username: String) -> Result<String, UsernameError> {
        if username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
        {
            Ok(username)
        } else {
            Err(UsernameError::InvalidCharacters)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Role-tagged view of an account, re-read from the store on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: Uid,
    pub username: Username,
    pub role: Option<Role>,
    pub position: Option<String>,
    pub disabled: bool,
}

/// Descriptive fields kept alongside an account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub nickname: Option<String>,
    pub tel: Option<String>,
    pub room_number: Option<String>,
}

/// Stored account: identity, profile and password hash.
///
/// The hash never leaves the domain; response types are built from
/// `identity` and `profile` only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub identity: Identity,
    pub profile: Profile,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Which accounts a listing returns. Empty vectors do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub roles: Vec<Role>,
    pub positions: Vec<String>,
}

impl UserFilter {
    pub fn matches(&self, identity: &Identity) -> bool {
        let role_matches = self.roles.is_empty()
            || identity
                .role
                .map_or(false, |role| self.roles.contains(&role));
        let position_matches = self.positions.is_empty()
            || identity
                .position
                .as_ref()
                .map_or(false, |position| self.positions.contains(position));

        role_matches && position_matches
    }
}

/// Command to register a staff account.
#[derive(Debug)]
pub struct CreateEmployeeCommand {
    pub username: Username,
    pub password: String,
    pub role: Role,
    pub position: Option<String>,
    pub firstname: String,
    pub lastname: String,
    pub nickname: Option<String>,
    pub tel: String,
}

/// Command to register a guest account for a room.
///
/// The room number doubles as the username.
#[derive(Debug)]
pub struct CreateGuestCommand {
    pub room_number: Username,
    pub password: String,
}

/// Partial update of a staff account. Only provided fields change.
#[derive(Debug, Default)]
pub struct UpdateEmployeeCommand {
    pub username: Option<Username>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub position: Option<String>,
    pub disabled: Option<bool>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub nickname: Option<String>,
    pub tel: Option<String>,
}

impl UpdateEmployeeCommand {
    /// Whether the update touches fields reserved to supervisors.
    pub fn changes_privileges(&self) -> bool {
        self.role.is_some() || self.disabled.is_some()
    }
}

/// Partial update of a guest account.
#[derive(Debug, Default)]
pub struct UpdateGuestCommand {
    pub room_number: Option<Username>,
    pub password: Option<String>,
    pub disabled: Option<bool>,
}
