use std::sync::Arc;

use anyhow::{Context, Result};
use hrm_api::ApiClient;
use hrm_auth::{Area, FileTokenStore, SessionConfig, SessionManager, UserIdentity};

/// Resolved global options shared by every command.
pub struct AppContext {
    pub profile: String,
    pub server: String,
}

impl AppContext {
    /// Session manager backed by the profile's token file.
    ///
    /// Background renewal stays off: each invocation is a single request and
    /// refreshes on demand.
    pub fn session_manager(&self) -> Result<SessionManager> {
        let store = FileTokenStore::for_profile(&self.profile)?;
        tracing::debug!(path = %store.path().display(), server = %self.server, "Opening session");
        let config = SessionConfig::new(&self.server).with_renewal_enabled(false);
        SessionManager::new(config, Arc::new(store))
            .with_context(|| format!("Invalid server URL: {}", self.server))
    }

    /// Resumes the stored session and checks that it may enter `area`.
    pub async fn authorize(&self, area: Option<Area>) -> Result<(ApiClient, UserIdentity)> {
        let session = self.session_manager()?;
        let Some(active) = session.check_auth_status().await? else {
            anyhow::bail!(
                "Not logged in (profile: \"{}\"). Run: hrm login --username <name>",
                self.profile
            );
        };

        if let Some(area) = area {
            ensure_access(&active.user, area)?;
        }

        let client = ApiClient::new(session)?;
        Ok((client, active.user))
    }
}

/// Fails with a readable message when `user` holds none of the roles `area`
/// needs.
pub fn ensure_access(user: &UserIdentity, area: Area) -> Result<()> {
    if user.can_access(area) {
        return Ok(());
    }
    let required = area
        .allowed_roles()
        .iter()
        .map(|role| role.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    anyhow::bail!(
        "Permission denied: {} requires one of the roles {required} (user {} has: {})",
        area.name(),
        user.username,
        if user.roles.is_empty() {
            "none".to_string()
        } else {
            user.roles.join(", ")
        }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(roles: &[&str]) -> UserIdentity {
        UserIdentity {
            id: "id-1".into(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            first_name: "Alice".into(),
            last_name: "Smith".into(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_employee_cannot_see_team_attendance() {
        let err = ensure_access(&user(&["employee"]), Area::TeamAttendance).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Permission denied: team attendance requires one of the roles hr_staff, manager, \
             system_admin (user alice has: employee)"
        );
    }

    #[test]
    fn test_manager_may_approve() {
        assert!(ensure_access(&user(&["employee", "manager"]), Area::Approvals).is_ok());
        assert!(ensure_access(&user(&["system_admin"]), Area::Approvals).is_err());
        assert!(ensure_access(&user(&[]), Area::Leave).is_err());
    }
}
