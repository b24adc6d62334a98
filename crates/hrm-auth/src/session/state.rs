use std::fmt;

use crate::identity::UserIdentity;

/// Observable lifecycle state of the session.
///
/// ```text
/// Unauthenticated -> Authenticating -> Authenticated -> Refreshing -> Authenticated
///        ^                 |                  |               |
///        +-----------------+------------------+---------------+
///         (login failure)     (logout)          (refresh failure)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Authenticating,
    Authenticated(UserIdentity),
    Refreshing,
}

impl SessionState {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserIdentity> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "unauthenticated"),
            Self::Authenticating => write!(f, "authenticating"),
            Self::Authenticated(user) => write!(f, "authenticated as {}", user.username),
            Self::Refreshing => write!(f, "refreshing"),
        }
    }
}

/// Identity and access token returned by a successful login or status check.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthenticatedSession {
    pub user: UserIdentity,
    pub access_token: String,
}

impl fmt::Debug for AuthenticatedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedSession")
            .field("user", &self.user)
            .field("access_token", &"<redacted>")
            .finish()
    }
}
