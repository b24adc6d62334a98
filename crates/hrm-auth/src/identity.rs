//! User identity derived from access token claims, and role gating.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::token::{TokenClaims, decode_claims};

/// Well-known realm roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Employee,
    Manager,
    HrStaff,
    SystemAdmin,
}

impl Role {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Manager => "manager",
            Self::HrStaff => "hr_staff",
            Self::SystemAdmin => "system_admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "employee" => Ok(Self::Employee),
            "manager" => Ok(Self::Manager),
            "hr_staff" => Ok(Self::HrStaff),
            "system_admin" => Ok(Self::SystemAdmin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Application areas whose access is gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Area {
    Dashboard,
    Attendance,
    Leave,
    Overtime,
    Shifts,
    Organization,
    Employees,
    Departments,
    Teams,
    TeamAttendance,
    Approvals,
    Reports,
    Settings,
}

impl Area {
    pub const ALL: [Area; 13] = [
        Area::Dashboard,
        Area::Attendance,
        Area::Leave,
        Area::Overtime,
        Area::Shifts,
        Area::Organization,
        Area::Employees,
        Area::Departments,
        Area::Teams,
        Area::TeamAttendance,
        Area::Approvals,
        Area::Reports,
        Area::Settings,
    ];

    /// Roles allowed into this area; holding any one of them is enough.
    #[must_use]
    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Self::Dashboard
            | Self::Attendance
            | Self::Leave
            | Self::Overtime
            | Self::Shifts
            | Self::Organization => &[Role::Employee],
            Self::Employees
            | Self::Departments
            | Self::Teams
            | Self::TeamAttendance
            | Self::Reports => &[Role::HrStaff, Role::Manager, Role::SystemAdmin],
            Self::Approvals => &[Role::Manager, Role::HrStaff],
            Self::Settings => &[Role::SystemAdmin],
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Attendance => "attendance",
            Self::Leave => "leave",
            Self::Overtime => "overtime",
            Self::Shifts => "shifts",
            Self::Organization => "organization",
            Self::Employees => "employees",
            Self::Departments => "departments",
            Self::Teams => "teams",
            Self::TeamAttendance => "team attendance",
            Self::Approvals => "approvals",
            Self::Reports => "reports",
            Self::Settings => "settings",
        }
    }
}

/// The authenticated user, as described by the current access token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Realm roles exactly as carried by the token, unknown ones included.
    pub roles: Vec<String>,
}

impl UserIdentity {
    /// Derives the identity from an access token.
    pub fn from_token(token: &str) -> Result<Self, AuthError> {
        decode_claims(token).map(Self::from)
    }

    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    #[must_use]
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| self.has_role(role.as_str()))
    }

    #[must_use]
    pub fn can_access(&self, area: Area) -> bool {
        self.has_any_role(area.allowed_roles())
    }

    /// Areas this identity may enter, in navigation order.
    #[must_use]
    pub fn accessible_areas(&self) -> Vec<Area> {
        Area::ALL
            .into_iter()
            .filter(|area| self.can_access(*area))
            .collect()
    }

    /// Given and family name joined, falling back to the username.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

impl From<TokenClaims> for UserIdentity {
    fn from(claims: TokenClaims) -> Self {
        let roles = claims.roles().to_vec();
        Self {
            id: claims.sub.unwrap_or_default(),
            username: claims.preferred_username.unwrap_or_default(),
            email: claims.email.unwrap_or_default(),
            first_name: claims.given_name.unwrap_or_default(),
            last_name: claims.family_name.unwrap_or_default(),
            roles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::token_with_payload;
    use serde_json::json;
    use std::collections::HashSet;

    fn identity_with_roles(roles: &[&str]) -> UserIdentity {
        UserIdentity {
            id: "u-1".to_string(),
            username: "jdoe".to_string(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_from_token_maps_claims() {
        let token = token_with_payload(&json!({
            "sub": "u-42",
            "preferred_username": "mgr",
            "email": "mgr@example.com",
            "given_name": "Mia",
            "family_name": "Ng",
            "realm_access": { "roles": ["manager", "employee", "offline_access"] },
            "exp": 4_000_000_000_i64
        }));

        let identity = UserIdentity::from_token(&token).unwrap();
        assert_eq!(identity.id, "u-42");
        assert_eq!(identity.username, "mgr");
        assert_eq!(identity.first_name, "Mia");
        assert_eq!(identity.last_name, "Ng");
        let roles: HashSet<_> = identity.roles.iter().map(String::as_str).collect();
        assert_eq!(roles, HashSet::from(["manager", "employee", "offline_access"]));
    }

    #[test]
    fn test_missing_claims_default_to_empty() {
        let token = token_with_payload(&json!({ "exp": 1 }));
        let identity = UserIdentity::from_token(&token).unwrap();
        assert_eq!(identity.id, "");
        assert_eq!(identity.username, "");
        assert!(identity.roles.is_empty());
    }

    #[test]
    fn test_identity_without_expiry_claim() {
        let token = token_with_payload(&json!({
            "sub": "u-7",
            "preferred_username": "lee",
            "realm_access": { "roles": ["employee"] }
        }));
        let identity = UserIdentity::from_token(&token).unwrap();
        assert_eq!(identity.username, "lee");
        assert!(identity.has_role("employee"));
    }

    #[test]
    fn test_from_token_rejects_garbage() {
        assert!(UserIdentity::from_token("garbage").is_err());
    }

    #[test]
    fn test_role_round_trip_names() {
        for role in [Role::Employee, Role::Manager, Role::HrStaff, Role::SystemAdmin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_area_gating() {
        let employee = identity_with_roles(&["employee"]);
        assert!(employee.can_access(Area::Leave));
        assert!(!employee.can_access(Area::Approvals));
        assert!(!employee.can_access(Area::TeamAttendance));

        let manager = identity_with_roles(&["employee", "manager"]);
        assert!(manager.can_access(Area::Approvals));
        assert!(manager.can_access(Area::TeamAttendance));
        assert!(!manager.can_access(Area::Settings));

        let admin = identity_with_roles(&["system_admin"]);
        assert!(admin.can_access(Area::Settings));
        assert!(admin.can_access(Area::Reports));
        assert!(!admin.can_access(Area::Approvals));
    }

    #[test]
    fn test_accessible_areas_in_order() {
        let hr = identity_with_roles(&["hr_staff"]);
        assert_eq!(
            hr.accessible_areas(),
            vec![
                Area::Employees,
                Area::Departments,
                Area::Teams,
                Area::TeamAttendance,
                Area::Approvals,
                Area::Reports,
            ]
        );
    }

    #[test]
    fn test_display_name() {
        let mut identity = identity_with_roles(&[]);
        assert_eq!(identity.display_name(), "jdoe");
        identity.first_name = "John".to_string();
        identity.last_name = "Doe".to_string();
        assert_eq!(identity.display_name(), "John Doe");
    }
}
