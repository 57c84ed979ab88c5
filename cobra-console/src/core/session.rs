//! Session Store
//!
//! Owns the authentication state of the console. Constructed once at
//! startup, [`SessionStore::restore`]d once, then shared (`Arc`) with the
//! guards and synchronizers that read it. Nothing else mutates the session.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use cobra_client::{AuthGrant, ClientError, HttpClient, ImageUpload};
use parking_lot::RwLock;
use shared::client::UserInfo;
use shared::permissions::Permission;
use tokio::sync::watch;

use super::error::{ConsoleError, ConsoleResult};
use super::session_cache::{PersistedSession, SessionStorage, parse_jwt_exp};

/// 当前会话: token and identity, always together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub refresh_token: Option<String>,
    pub user: UserInfo,
    pub expires_at: Option<i64>,
}

impl Session {
    fn from_grant(grant: AuthGrant) -> Self {
        let expires_at = parse_jwt_exp(&grant.access_token);
        Self {
            token: grant.access_token,
            refresh_token: grant.refresh_token,
            user: grant.user,
            expires_at,
        }
    }

    fn to_persisted(&self) -> PersistedSession {
        PersistedSession {
            token: self.token.clone(),
            refresh_token: self.refresh_token.clone(),
            user: self.user.clone(),
            expires_at: self.expires_at,
            saved_at: shared::util::now_secs(),
        }
    }
}

impl From<PersistedSession> for Session {
    fn from(p: PersistedSession) -> Self {
        let expires_at = p.expires_at.or_else(|| parse_jwt_exp(&p.token));
        Self {
            token: p.token,
            refresh_token: p.refresh_token,
            user: p.user,
            expires_at,
        }
    }
}

/// Last session transition, published to subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// `restore()` has not run yet
    Pending,
    Restored { authenticated: bool },
    LoggedIn,
    LoggedOut,
    /// The server rejected the token (401)
    Expired,
}

pub struct SessionStore<C: HttpClient> {
    client: Arc<C>,
    storage: Arc<dyn SessionStorage>,
    current: RwLock<Option<Session>>,
    restored: AtomicBool,
    events: watch::Sender<SessionEvent>,
}

impl<C: HttpClient> std::fmt::Debug for SessionStore<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .field("restored", &self.is_restored())
            .finish()
    }
}

impl<C: HttpClient> SessionStore<C> {
    pub fn new(client: Arc<C>, storage: Arc<dyn SessionStorage>) -> Self {
        let (events, _) = watch::channel(SessionEvent::Pending);
        Self {
            client,
            storage,
            current: RwLock::new(None),
            restored: AtomicBool::new(false),
            events,
        }
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    /// Receives every session transition; hosts re-run their guards on it.
    pub fn subscribe(&self) -> watch::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    // ========== Lifecycle ==========

    /// Reloads a previously persisted session. No network call: expiry is
    /// checked against the local clock and stale or unreadable records are
    /// cleared.
    pub fn restore(&self) -> Option<Session> {
        let restored = match self.storage.load() {
            Ok(Some(persisted)) if persisted.token.is_empty() => {
                tracing::info!("Cached session has no token, cleared");
                self.clear_storage();
                None
            }
            Ok(Some(persisted)) if persisted.is_expired(shared::util::now_secs()) => {
                tracing::info!(user = %persisted.user.id, "Cached session expired, cleared");
                self.clear_storage();
                None
            }
            Ok(Some(persisted)) => Some(Session::from(persisted)),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read cached session");
                self.clear_storage();
                None
            }
        };

        if let Some(session) = &restored {
            tracing::info!(user = %session.user.id, "Loaded cached session");
        }
        self.install(restored.clone());
        self.restored.store(true, Ordering::Release);
        self.events.send_replace(SessionEvent::Restored {
            authenticated: restored.is_some(),
        });
        restored
    }

    /// Exchanges a username/password pair for a session.
    ///
    /// On failure the current session is left as it was.
    pub async fn login(&self, username: &str, password: &str) -> ConsoleResult<UserInfo> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(ConsoleError::Validation(
                "username and password are required".into(),
            ));
        }

        let grant = self
            .client
            .login(username, password)
            .await
            .map_err(|e| login_error(username, e))?;
        tracing::info!(username = %username, "User logged in");
        Ok(self.establish(grant))
    }

    /// Face-recognition login: one captured frame in, same contract as
    /// [`SessionStore::login`].
    pub async fn login_with_face(&self, image: Vec<u8>) -> ConsoleResult<UserInfo> {
        if image.is_empty() {
            return Err(ConsoleError::Validation("a captured image is required".into()));
        }

        let grant = self
            .client
            .face_login(ImageUpload::jpeg(image))
            .await
            .map_err(|e| login_error("<face>", e))?;
        tracing::info!(user = %grant.user.id, "User logged in by face recognition");
        Ok(self.establish(grant))
    }

    /// Clears the local session whatever happens to the revoke call.
    pub async fn logout(&self) {
        let refresh = self
            .current
            .read()
            .as_ref()
            .map(|s| s.refresh_token.clone());

        // Only a live session has anything to revoke
        if let Some(refresh) = refresh {
            if let Err(e) = self.client.logout(refresh.as_deref()).await {
                tracing::warn!(error = %e, "Server-side logout failed, clearing local session anyway");
            }
        }

        self.install(None);
        self.clear_storage();
        self.events.send_replace(SessionEvent::LoggedOut);
        tracing::info!("User logged out");
    }

    /// Drops the session after the server rejected its token.
    pub fn expire(&self) {
        self.expire_if(|_| true);
    }

    /// Drops the session only if `token` is still the one in use. A 401
    /// for a request issued under a replaced token leaves the new
    /// session alone.
    pub fn expire_token(&self, token: Option<&str>) {
        self.expire_if(|session| Some(session.token.as_str()) == token);
    }

    fn expire_if(&self, rejected: impl FnOnce(&Session) -> bool) {
        let mut current = self.current.write();
        match current.as_ref() {
            None => return,
            Some(session) if !rejected(session) => {
                tracing::debug!("Rejection for a replaced token ignored");
                return;
            }
            Some(_) => {}
        }
        *current = None;
        self.client.set_token(None);
        self.clear_storage();
        drop(current);

        self.events.send_replace(SessionEvent::Expired);
        tracing::warn!("Session rejected by server, signed out");
    }

    fn establish(&self, grant: AuthGrant) -> UserInfo {
        let session = Session::from_grant(grant);
        let user = session.user.clone();

        // 1. 保存到存储 (one record: token + identity)
        if let Err(e) = self.storage.save(&session.to_persisted()) {
            tracing::warn!(error = %e, "Failed to persist session");
        }
        // 2. 更新内存中的 session
        self.install(Some(session));
        self.events.send_replace(SessionEvent::LoggedIn);
        user
    }

    fn install(&self, session: Option<Session>) {
        let token = session.as_ref().map(|s| s.token.clone());
        *self.current.write() = session;
        self.client.set_token(token);
    }

    fn clear_storage(&self) {
        if let Err(e) = self.storage.clear() {
            tracing::warn!(error = %e, "Failed to clear cached session");
        }
    }

    // ========== Queries ==========

    pub fn is_restored(&self) -> bool {
        self.restored.load(Ordering::Acquire)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.read().is_some()
    }

    /// Snapshot of the whole session
    pub fn current(&self) -> Option<Session> {
        self.current.read().clone()
    }

    pub fn user(&self) -> Option<UserInfo> {
        self.current.read().as_ref().map(|s| s.user.clone())
    }

    pub fn token(&self) -> Option<String> {
        self.current.read().as_ref().map(|s| s.token.clone())
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.current
            .read()
            .as_ref()
            .is_some_and(|s| s.user.has_role(role))
    }

    /// True if the user holds at least one of `roles`; false for an empty list.
    pub fn has_any_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        self.current
            .read()
            .as_ref()
            .is_some_and(|s| roles.iter().any(|r| s.user.has_role(r.as_ref())))
    }

    /// True if the user holds every role in `roles`; false for an empty list.
    pub fn has_all_roles<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        self.current.read().as_ref().is_some_and(|s| {
            !roles.is_empty() && roles.iter().all(|r| s.user.has_role(r.as_ref()))
        })
    }

    /// Derived from the current roles on every call
    pub fn permissions(&self) -> Vec<Permission> {
        self.current
            .read()
            .as_ref()
            .map(|s| s.user.permissions())
            .unwrap_or_default()
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }

    pub fn is_superuser(&self) -> bool {
        self.current
            .read()
            .as_ref()
            .is_some_and(|s| s.user.is_superuser)
    }
}

fn login_error(who: &str, err: ClientError) -> ConsoleError {
    match err {
        ClientError::Auth(msg) => {
            tracing::info!(username = %who, reason = %msg, "Login rejected");
            ConsoleError::Authentication(msg)
        }
        other => {
            tracing::warn!(username = %who, error = %other, "Login request failed");
            ConsoleError::Client(other)
        }
    }
}
