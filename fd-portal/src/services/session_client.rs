//! Token lifecycle for the signed-in user.
//!
//! [`SessionClient`] owns the persisted session, attaches the bearer token to
//! every backend call, refreshes on 401 and on a fixed period, and evicts the
//! session on logout or when a refresh is rejected. State changes are
//! published on a `watch` channel; a transition to `Anonymous` that the caller
//! did not ask for is the signal to send the user back to the login page.
//!
//! Login, logout and expiry each start a new session epoch. A refresh only
//! writes its tokens back if the epoch it started in is still current, so a
//! refresh that lands after a logout cannot bring the session back.

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use service_core::observability::TracedClientExt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::watch;
use validator::Validate;

use crate::config::ServiceEndpoint;
use crate::error::ClientError;
use crate::models::auth::{AuthPayload, LoginRequest, RegisterRequest};
use crate::models::session::{Session, SessionState, UserType};
use crate::services::auth_client::AuthClient;
use crate::services::envelope;
use crate::services::refresh::{RefreshCycle, TickOutcome};
use crate::session::{SessionStore, StorageError};
use crate::utils::jwt::decode_claims;

/// Default period of the proactive refresh.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(9 * 60);

/// Cheap to clone; clones share one session and one refresh task.
#[derive(Clone)]
pub struct SessionClient {
    inner: Arc<Inner>,
}

struct Inner {
    auth: AuthClient,
    store: SessionStore,
    state: watch::Sender<SessionState>,
    refresh: RefreshCycle,
    epoch: Mutex<u64>,
}

impl SessionClient {
    pub fn new(auth: AuthClient, store: SessionStore, refresh_interval: Duration) -> Self {
        let (state, _) = watch::channel(SessionState::Anonymous);
        Self {
            inner: Arc::new(Inner {
                auth,
                store,
                state,
                refresh: RefreshCycle::new(refresh_interval),
                epoch: Mutex::new(0),
            }),
        }
    }

    /// Restores a persisted session and resumes the refresh cycle.
    ///
    /// A session whose stored values cannot be read is evicted and the client
    /// starts anonymous. Storage I/O failures are returned.
    pub fn init(&self) -> Result<Option<Session>, ClientError> {
        let session = match self.inner.store.load() {
            Ok(session) => session,
            Err(e @ StorageError::Value { .. }) => {
                tracing::warn!(error = %e, "Evicting unreadable persisted session");
                let mut epoch = self.lock_epoch();
                self.end_session(&mut epoch);
                None
            }
            Err(e) => return Err(e.into()),
        };
        match &session {
            Some(session) => {
                tracing::info!(
                    user_id = ?session.user.user_id,
                    user_type = ?session.user_type(),
                    "Restored persisted session"
                );
                self.set_state(SessionState::Authenticated);
                self.start_refresh_cycle();
            }
            None => {
                tracing::debug!("No persisted session found");
                self.set_state(SessionState::Anonymous);
            }
        }
        Ok(session)
    }

    /// Stops background work; the persisted session is left in place.
    pub fn teardown(&self) {
        self.stop_refresh_cycle();
        tracing::debug!("Session client torn down");
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    pub fn state(&self) -> SessionState {
        *self.inner.state.borrow()
    }

    pub fn store(&self) -> &SessionStore {
        &self.inner.store
    }

    pub fn current_session(&self) -> Result<Option<Session>, ClientError> {
        Ok(self.inner.store.load()?)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.inner.store.access_token(), Ok(Some(_)))
    }

    pub fn is_refresh_cycle_running(&self) -> bool {
        self.inner.refresh.is_running()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let request = LoginRequest::new(email, password);
        request.validate()?;

        let payload = self.inner.auth.login(&request).await.map_err(|e| {
            tracing::warn!(email, error = %e, "Login failed");
            e
        })?;

        let session = session_from_payload(payload, None);
        self.establish(&session)?;
        tracing::info!(
            user_id = ?session.user.user_id,
            user_type = ?session.user_type(),
            "User logged in"
        );
        Ok(session)
    }

    /// `user_type` falls back to `CUSTOMER` when neither the response nor
    /// the token claims carry one.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Session, ClientError> {
        request.validate()?;

        let payload = self.inner.auth.register(request).await.map_err(|e| {
            tracing::warn!(email = %request.email, error = %e, "Registration failed");
            e
        })?;

        let session = session_from_payload(payload, Some(UserType::Customer));
        self.establish(&session)?;
        tracing::info!(user_id = ?session.user.user_id, "User registered");
        Ok(session)
    }

    /// Clears the session whatever the auth service answers.
    pub async fn logout(&self) {
        let access_token = self.inner.store.access_token().ok().flatten();
        let refresh_token = self.inner.store.refresh_token().ok().flatten();

        if access_token.is_some() || refresh_token.is_some() {
            if let Err(e) = self
                .inner
                .auth
                .logout(access_token.as_deref(), refresh_token.as_deref())
                .await
            {
                tracing::warn!(error = %e, "Remote logout failed, clearing local session anyway");
            }
        }

        let mut epoch = self.lock_epoch();
        self.end_session(&mut epoch);
        tracing::info!("User logged out");
    }

    /// Sends a JSON request with the stored bearer token and returns the
    /// parsed body.
    ///
    /// A 401 triggers one refresh and one retry when a refresh token is
    /// stored; otherwise it is returned as `Http { status: 401 }`. A rejected
    /// refresh, or a 401 on the retry, ends the session with
    /// `SessionExpired`.
    pub async fn authorized_request(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Value, ClientError> {
        self.execute(method, url, body, None).await
    }

    /// Typed request against a backend endpoint, unwrapping the envelope.
    pub async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &ServiceEndpoint,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, ClientError> {
        let value = self
            .execute(method, &endpoint.endpoint(path), body, Some(endpoint.timeout()))
            .await?;
        envelope::decode(value)
    }

    /// Like [`send`](Self::send) for endpoints returning a list.
    pub async fn send_list<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &ServiceEndpoint,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Vec<T>, ClientError> {
        let value = self
            .execute(method, &endpoint.endpoint(path), body, Some(endpoint.timeout()))
            .await?;
        envelope::decode_list(value)
    }

    /// Starts the proactive refresh, replacing any running cycle.
    pub fn start_refresh_cycle(&self) {
        let client = Arc::downgrade(&self.inner);
        self.inner.refresh.start(move || {
            let client = Weak::clone(&client);
            async move {
                match client.upgrade() {
                    Some(inner) => SessionClient { inner }.proactive_refresh().await,
                    None => TickOutcome::Stop,
                }
            }
        });
    }

    pub fn stop_refresh_cycle(&self) {
        self.inner.refresh.stop();
    }

    /// Exchanges the stored refresh token and persists the new pair.
    /// Returns the new access token. The caller decides what a failure means.
    ///
    /// Fails with `SessionExpired` when no refresh token is stored, or when
    /// the session was logged out, expired or replaced while the exchange was
    /// in flight. The new tokens are dropped in that case.
    pub async fn refresh_session(&self) -> Result<String, ClientError> {
        let epoch = self.epoch();
        self.refresh_in(epoch).await
    }

    /// Records the customer number learned from the profile service.
    pub fn set_customer_number(&self, customer_number: &str) -> Result<(), ClientError> {
        Ok(self.inner.store.set_customer_number(customer_number)?)
    }

    async fn execute(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        timeout: Option<Duration>,
    ) -> Result<Value, ClientError> {
        let access_token = self.inner.store.access_token()?;
        let response = self
            .dispatch(&method, url, body, access_token.as_deref(), timeout)
            .await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return envelope::read_body(response).await;
        }

        if self.inner.store.refresh_token()?.is_none() {
            tracing::debug!(%method, url, "401 with no refresh token stored");
            return envelope::read_body(response).await;
        }

        tracing::debug!(%method, url, "Access token rejected, refreshing");
        let epoch = self.epoch();
        let access_token = match self.refresh_in(epoch).await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed, ending session");
                self.expire(epoch);
                return Err(ClientError::SessionExpired);
            }
        };

        let retry = self
            .dispatch(&method, url, body, Some(&access_token), timeout)
            .await?;
        if retry.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!(%method, url, "Request rejected after refresh, ending session");
            self.expire(epoch);
            return Err(ClientError::SessionExpired);
        }

        envelope::read_body(retry).await
    }

    async fn dispatch(
        &self,
        method: &Method,
        url: &str,
        body: Option<&Value>,
        access_token: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<reqwest::Response, ClientError> {
        let mut request = self.inner.auth.http().traced_request(method.clone(), url);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(token) = access_token {
            request = request.bearer_auth(token);
        }

        request.send().await.map_err(|e| {
            tracing::error!(%method, url, error = %e, "Backend request failed");
            ClientError::from(e)
        })
    }

    async fn refresh_in(&self, epoch: u64) -> Result<String, ClientError> {
        let Some(refresh_token) = self.inner.store.refresh_token()? else {
            return Err(ClientError::SessionExpired);
        };

        if self
            .if_current(epoch, |_| self.set_state(SessionState::Refreshing))
            .is_none()
        {
            return Err(ClientError::SessionExpired);
        }

        let payload = self.inner.auth.refresh(&refresh_token).await?;

        let applied = self.if_current(epoch, |_| -> Result<(), ClientError> {
            self.inner.store.apply_refresh(&payload)?;
            self.set_state(SessionState::Authenticated);
            Ok(())
        });
        match applied {
            Some(result) => result?,
            None => {
                tracing::info!("Session ended while refreshing, dropping new tokens");
                return Err(ClientError::SessionExpired);
            }
        }

        tracing::debug!("Access token refreshed");
        Ok(payload.access_token)
    }

    async fn proactive_refresh(&self) -> TickOutcome {
        let epoch = self.epoch();
        match self.refresh_in(epoch).await {
            Ok(_) => TickOutcome::Continue,
            Err(ClientError::Network(e)) => {
                tracing::warn!(error = %e, "Proactive token refresh unreachable, keeping session");
                let _ = self.if_current(epoch, |_| self.set_state(SessionState::Authenticated));
                TickOutcome::Continue
            }
            Err(ClientError::SessionExpired) => {
                tracing::debug!("No refresh token stored, stopping refresh cycle");
                TickOutcome::Stop
            }
            Err(e) => {
                tracing::warn!(error = %e, "Proactive token refresh rejected, ending session");
                self.expire(epoch);
                TickOutcome::Stop
            }
        }
    }

    fn establish(&self, session: &Session) -> Result<(), ClientError> {
        let mut epoch = self.lock_epoch();
        *epoch = epoch.wrapping_add(1);
        self.inner.store.save(session)?;
        self.set_state(SessionState::Authenticated);
        self.start_refresh_cycle();
        Ok(())
    }

    /// Ends the session without contacting the auth service, unless it was
    /// already ended or replaced since `epoch`.
    fn expire(&self, epoch: u64) {
        if self.if_current(epoch, |current| self.end_session(current)).is_none() {
            tracing::debug!("Session already replaced, nothing to expire");
        }
    }

    /// Must be called with the epoch lock held.
    fn end_session(&self, epoch: &mut u64) {
        *epoch = epoch.wrapping_add(1);
        self.stop_refresh_cycle();
        if let Err(e) = self.inner.store.clear() {
            tracing::error!(error = %e, "Failed to clear session storage");
        }
        self.set_state(SessionState::Anonymous);
    }

    fn lock_epoch(&self) -> MutexGuard<'_, u64> {
        self.inner.epoch.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn epoch(&self) -> u64 {
        *self.lock_epoch()
    }

    /// Runs `f` under the epoch lock if no login, logout or expiry happened
    /// since `epoch` was read.
    fn if_current<R>(&self, epoch: u64, f: impl FnOnce(&mut u64) -> R) -> Option<R> {
        let mut current = self.lock_epoch();
        (*current == epoch).then(|| f(&mut current))
    }

    fn set_state(&self, state: SessionState) {
        let previous = self.inner.state.send_replace(state);
        if previous != state {
            tracing::debug!(from = ?previous, to = ?state, "Session state changed");
        }
    }
}

/// Builds the session from an auth response, filling what the server left
/// out from the access token's claims.
fn session_from_payload(payload: AuthPayload, default_user_type: Option<UserType>) -> Session {
    let mut user = payload.user.unwrap_or_default();
    if let Some(claims) = decode_claims(&payload.access_token) {
        user.fill_from_claims(&claims);
    }
    if user.user_type.is_none() {
        user.user_type = default_user_type;
    }

    Session {
        access_token: payload.access_token,
        refresh_token: payload.refresh_token,
        user,
        customer_number: payload.customer_number,
    }
}
