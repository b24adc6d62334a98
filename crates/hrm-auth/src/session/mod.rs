//! The session manager.
//!
//! [`SessionManager`] owns the client-held token pair and the identity
//! decoded from it. Every change to the pair goes through one write lock
//! that covers both the [`TokenStore`] and the in-memory copy, so readers
//! never observe an identity that belongs to a different token.
//!
//! Refreshes are serialized by an async gate: concurrent callers that find
//! an expired token queue on the gate, and whoever gets it after a
//! successful refresh reuses the new token instead of refreshing again.

mod renewal;
mod state;

use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use tokio::sync::{Mutex, RwLock, watch};

use crate::config::SessionConfig;
use crate::endpoint::AuthEndpoint;
use crate::error::AuthError;
use crate::identity::UserIdentity;
use crate::storage::TokenStore;
use crate::token::{TokenPair, TokenResponse, expires_within, is_token_expired};

use renewal::RenewalTask;
pub use state::{AuthenticatedSession, SessionState};

/// Token pair currently in memory, with the identity decoded from it.
///
/// `identity` is `None` only while an undecodable (and therefore expired)
/// access token waits for its refresh.
#[derive(Clone)]
struct ActiveSession {
    tokens: TokenPair,
    identity: Option<UserIdentity>,
}

/// Client-side authentication context.
///
/// Cheap to clone; clones share one session. The background renewal task
/// stops once the last clone is dropped.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionInner>,
}

pub(crate) struct SessionInner {
    config: SessionConfig,
    endpoint: AuthEndpoint,
    store: Arc<dyn TokenStore>,
    current: RwLock<Option<ActiveSession>>,
    refresh_gate: Mutex<()>,
    state: watch::Sender<SessionState>,
    renewal: StdMutex<Option<RenewalTask>>,
}

impl SessionManager {
    /// Creates a manager with no session loaded yet.
    ///
    /// Call [`SessionManager::check_auth_status`] (or [`SessionManager::init`])
    /// at application start to pick up a persisted session.
    pub fn new(config: SessionConfig, store: Arc<dyn TokenStore>) -> Result<Self, AuthError> {
        config.validate()?;
        let endpoint = AuthEndpoint::new(&config)?;
        let (state, _) = watch::channel(SessionState::Unauthenticated);

        Ok(Self {
            inner: Arc::new(SessionInner {
                config,
                endpoint,
                store,
                current: RwLock::new(None),
                refresh_gate: Mutex::new(()),
                state,
                renewal: StdMutex::new(None),
            }),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// Loads the persisted token pair into memory without contacting the
    /// server. Returns `true` if a pair was found.
    pub async fn init(&self) -> Result<bool, AuthError> {
        let stored = self.inner.store.load().await?;
        let mut current = self.inner.current.write().await;

        match stored {
            Some(tokens) => {
                let identity = UserIdentity::from_token(&tokens.access_token).ok();
                match &identity {
                    Some(user) if !is_token_expired(&tokens.access_token) => {
                        self.inner.set_state(SessionState::Authenticated(user.clone()));
                    }
                    _ => self.inner.set_state(SessionState::Unauthenticated),
                }
                *current = Some(ActiveSession { tokens, identity });
                Ok(true)
            }
            None => {
                *current = None;
                self.inner.set_state(SessionState::Unauthenticated);
                Ok(false)
            }
        }
    }

    /// Authenticates with username and password.
    ///
    /// On success the new token pair replaces any existing one and background
    /// renewal starts.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthenticatedSession, AuthError> {
        self.inner.set_state(SessionState::Authenticating);

        match self.login_inner(username, password).await {
            Ok(session) => {
                tracing::info!(username = %session.user.username, "Logged in");
                self.start_renewal();
                Ok(session)
            }
            Err(e) => {
                tracing::warn!(username, error = %e, "Login failed");
                self.inner.restore_state().await;
                Err(e)
            }
        }
    }

    async fn login_inner(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthenticatedSession, AuthError> {
        let response = self.inner.endpoint.login(username, password).await?;
        if response.access_token.is_empty() {
            return Err(AuthError::invalid_token("No access token received"));
        }
        let user = UserIdentity::from_token(&response.access_token)
            .map_err(|_| AuthError::invalid_token("Failed to decode user info"))?;

        let tokens = TokenPair::from(response);
        let access_token = tokens.access_token.clone();

        // A refresh in flight for the previous session must not overwrite us.
        let _gate = self.inner.refresh_gate.lock().await;
        self.inner.install(tokens, user.clone()).await?;

        Ok(AuthenticatedSession { user, access_token })
    }

    /// Resolves the persisted session at application start.
    ///
    /// Returns `None` when there is no usable session. An expired access
    /// token gets exactly one refresh attempt; if that fails, storage is
    /// cleared.
    pub async fn check_auth_status(&self) -> Result<Option<AuthenticatedSession>, AuthError> {
        if !self.init().await? {
            tracing::debug!("No persisted session");
            return Ok(None);
        }

        if let Some(session) = self.inner.authenticated_session().await {
            self.start_renewal();
            return Ok(Some(session));
        }

        tracing::debug!("Persisted access token expired, refreshing");
        match self.refresh_access_token().await {
            Ok(_) => match self.inner.authenticated_session().await {
                Some(session) => {
                    self.start_renewal();
                    Ok(Some(session))
                }
                None => {
                    self.inner.end_session().await;
                    Ok(None)
                }
            },
            Err(e) => {
                tracing::info!(error = %e, "Persisted session could not be renewed");
                Ok(None)
            }
        }
    }

    /// Exchanges the stored refresh token for a new token pair and returns
    /// the new access token.
    ///
    /// Fails with `NoSession` (leaving everything untouched) when no refresh
    /// token is stored. Any other failure clears the session and yields
    /// `RefreshFailed`. Never retries.
    pub async fn refresh_access_token(&self) -> Result<String, AuthError> {
        let _gate = self.inner.refresh_gate.lock().await;
        self.inner.refresh_locked().await
    }

    /// Returns an access token that is not expired at call time, refreshing
    /// first if necessary.
    pub async fn get_valid_token(&self) -> Result<String, AuthError> {
        self.inner.valid_token().await
    }

    /// Ends the session.
    ///
    /// The server is asked to invalidate the refresh token on a best-effort
    /// basis; local state is cleared whatever the outcome of that call.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.inner.stop_renewal();

        if let Some(refresh_token) = self.get_refresh_token().await
            && let Err(e) = self.inner.endpoint.logout(&refresh_token).await
        {
            tracing::debug!(error = %e, "Ignoring logout notification failure");
        }

        let _gate = self.inner.refresh_gate.lock().await;
        let result = self.inner.clear().await;
        tracing::info!("Logged out");
        result
    }

    pub async fn get_access_token(&self) -> Option<String> {
        let current = self.inner.current.read().await;
        current.as_ref().map(|s| s.tokens.access_token.clone())
    }

    pub async fn get_refresh_token(&self) -> Option<String> {
        let current = self.inner.current.read().await;
        current.as_ref().map(|s| s.tokens.refresh_token.clone())
    }

    /// Identity decoded from the current access token.
    pub async fn current_user(&self) -> Option<UserIdentity> {
        let current = self.inner.current.read().await;
        current.as_ref().and_then(|s| s.identity.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.authenticated_session().await.is_some()
    }

    /// Snapshot of the lifecycle state.
    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Subscribes to lifecycle state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Returns `true` while the background renewal task is running.
    pub fn renewal_active(&self) -> bool {
        let renewal = self
            .inner
            .renewal
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        renewal.as_ref().is_some_and(|task| !task.is_cancelled())
    }

    fn start_renewal(&self) {
        let config = &self.inner.config;
        if !config.renewal_enabled {
            return;
        }

        let task = RenewalTask::spawn(
            Arc::downgrade(&self.inner),
            config.renewal_interval,
            config.min_validity,
        );
        let mut renewal = self
            .inner
            .renewal
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(previous) = renewal.replace(task) {
            previous.cancel();
        }
    }
}

impl SessionInner {
    fn set_state(&self, state: SessionState) {
        self.state.send_replace(state);
    }

    /// Re-derives the observable state from the in-memory session.
    async fn restore_state(&self) {
        let current = self.current.read().await;
        let state = match current.as_ref().and_then(|s| s.identity.clone()) {
            Some(user) => SessionState::Authenticated(user),
            None => SessionState::Unauthenticated,
        };
        self.set_state(state);
    }

    async fn authenticated_session(&self) -> Option<AuthenticatedSession> {
        let current = self.current.read().await;
        let session = current.as_ref()?;
        if is_token_expired(&session.tokens.access_token) {
            return None;
        }
        Some(AuthenticatedSession {
            user: session.identity.clone()?,
            access_token: session.tokens.access_token.clone(),
        })
    }

    /// Persists a new pair and swaps it into memory under the write lock.
    async fn install(&self, tokens: TokenPair, user: UserIdentity) -> Result<(), AuthError> {
        let mut current = self.current.write().await;
        self.store.save(&tokens).await?;
        *current = Some(ActiveSession {
            tokens,
            identity: Some(user.clone()),
        });
        self.set_state(SessionState::Authenticated(user));
        Ok(())
    }

    /// Drops the session from storage and memory.
    ///
    /// Memory is cleared even if the store fails; the store error is returned.
    async fn clear(&self) -> Result<(), AuthError> {
        let mut current = self.current.write().await;
        let result = self.store.clear().await;
        *current = None;
        self.set_state(SessionState::Unauthenticated);
        result
    }

    async fn end_session(&self) {
        self.stop_renewal();
        if let Err(e) = self.clear().await {
            tracing::warn!(error = %e, "Failed to clear persisted session");
        }
    }

    fn stop_renewal(&self) {
        let mut renewal = self
            .renewal
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(task) = renewal.take() {
            task.cancel();
        }
    }

    async fn valid_token(&self) -> Result<String, AuthError> {
        let seen = {
            let current = self.current.read().await;
            current
                .as_ref()
                .map(|s| s.tokens.access_token.clone())
                .ok_or(AuthError::NoSession)?
        };
        if !is_token_expired(&seen) {
            return Ok(seen);
        }

        let _gate = self.refresh_gate.lock().await;
        {
            let current = self.current.read().await;
            let Some(session) = current.as_ref() else {
                // The refresh we queued behind failed, or the user logged out.
                return Err(AuthError::NoSession);
            };
            if session.tokens.access_token != seen
                && !is_token_expired(&session.tokens.access_token)
            {
                return Ok(session.tokens.access_token.clone());
            }
        }
        self.refresh_locked().await
    }

    /// One renewal tick. Returns `false` once the session is gone.
    pub(crate) async fn renew_if_needed(&self, min_validity: Duration) -> bool {
        let Some(seen) = self.access_token().await else {
            return false;
        };
        if !expires_within(&seen, min_validity) {
            return true;
        }

        let _gate = self.refresh_gate.lock().await;
        match self.access_token().await {
            None => return false,
            Some(token) if token != seen && !expires_within(&token, min_validity) => return true,
            Some(_) => {}
        }

        match self.refresh_locked().await {
            Ok(_) => {
                tracing::debug!("Access token renewed in background");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Background renewal failed, session ended");
                false
            }
        }
    }

    async fn access_token(&self) -> Option<String> {
        let current = self.current.read().await;
        current.as_ref().map(|s| s.tokens.access_token.clone())
    }

    /// Performs the refresh. Caller must hold `refresh_gate`.
    async fn refresh_locked(&self) -> Result<String, AuthError> {
        let refresh_token = {
            let current = self.current.read().await;
            current
                .as_ref()
                .map(|s| s.tokens.refresh_token.clone())
                .filter(|t| !t.is_empty())
                .ok_or(AuthError::NoSession)?
        };

        self.set_state(SessionState::Refreshing);

        let outcome = match self.endpoint.refresh(&refresh_token).await {
            Ok(response) => self.accept_refresh(response, refresh_token).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(access_token) => Ok(access_token),
            Err(e) => {
                self.end_session().await;
                Err(match e {
                    AuthError::RefreshFailed { .. } => e,
                    other => AuthError::refresh_failed(other.to_string()),
                })
            }
        }
    }

    async fn accept_refresh(
        &self,
        response: TokenResponse,
        previous_refresh_token: String,
    ) -> Result<String, AuthError> {
        if response.access_token.is_empty() {
            return Err(AuthError::refresh_failed("No access token received"));
        }
        let user = UserIdentity::from_token(&response.access_token)
            .map_err(|_| AuthError::refresh_failed("Failed to decode user info"))?;
        if is_token_expired(&response.access_token) {
            return Err(AuthError::refresh_failed("Received an expired access token"));
        }

        let mut tokens = TokenPair::from(response);
        // Servers that do not rotate refresh tokens omit the field.
        if tokens.refresh_token.is_empty() {
            tokens.refresh_token = previous_refresh_token;
        }
        let access_token = tokens.access_token.clone();
        self.install(tokens, user).await?;
        Ok(access_token)
    }
}
