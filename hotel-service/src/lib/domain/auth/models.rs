use std::collections::BTreeSet;

use crate::domain::user::models::Role;

/// Permission tag carried inside an access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Me,
    Supervisor,
    Employee,
    Guest,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Me => "me",
            Scope::Supervisor => "supervisor",
            Scope::Employee => "employee",
            Scope::Guest => "guest",
        }
    }
}

/// Set of roles admitted by a route once its scopes are satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleFamily {
    SupervisorOnly,
    /// Staff routes: supervisors and employees.
    EmployeeOnly,
    GuestOnly,
    AnyAuthenticated,
}

impl RoleFamily {
    pub fn admits(&self, role: Role) -> bool {
        match self {
            RoleFamily::SupervisorOnly => role == Role::Supervisor,
            RoleFamily::EmployeeOnly => matches!(role, Role::Supervisor | Role::Employee),
            RoleFamily::GuestOnly => role == Role::Guest,
            RoleFamily::AnyAuthenticated => true,
        }
    }
}

/// What a protected route demands: at least one of `scopes` in the token,
/// and a role inside `family`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRequirement {
    pub scopes: &'static [Scope],
    pub family: RoleFamily,
}

impl RouteRequirement {
    pub const SUPERVISORS: RouteRequirement = RouteRequirement {
        scopes: &[Scope::Me, Scope::Supervisor],
        family: RoleFamily::SupervisorOnly,
    };

    pub const STAFF: RouteRequirement = RouteRequirement {
        scopes: &[Scope::Me, Scope::Employee],
        family: RoleFamily::EmployeeOnly,
    };

    pub const GUESTS: RouteRequirement = RouteRequirement {
        scopes: &[Scope::Me, Scope::Guest],
        family: RoleFamily::GuestOnly,
    };

    pub const MEMBERS: RouteRequirement = RouteRequirement {
        scopes: &[Scope::Me, Scope::Supervisor, Scope::Employee, Scope::Guest],
        family: RoleFamily::AnyAuthenticated,
    };

    /// Whether any required scope was granted.
    pub fn is_satisfied_by<'a>(&self, granted: impl IntoIterator<Item = &'a str>) -> bool {
        let granted: BTreeSet<&str> = granted.into_iter().collect();
        self.scopes
            .iter()
            .any(|scope| granted.contains(scope.as_str()))
    }

    /// `WWW-Authenticate` challenge value advertising the required scopes.
    pub fn challenge(&self) -> String {
        if self.scopes.is_empty() {
            return "Bearer".to_string();
        }

        let scopes: Vec<&str> = self.scopes.iter().map(Scope::as_str).collect();
        format!("Bearer scope=\"{}\"", scopes.join(" "))
    }
}

/// Password-grant login request.
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub username: String,
    pub password: String,
    pub scopes: BTreeSet<String>,
}
