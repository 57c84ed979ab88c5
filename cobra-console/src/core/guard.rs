//! Access Guard
//!
//! Decides whether a protected view may render. The decision is recomputed
//! from the Session Store on every call; nothing is cached between renders,
//! so a session that expires mid-screen denies on the next render.
//!
//! ```text
//! PENDING ──restore──▶ ALLOWED
//!    │                    │ (session expires / logout)
//!    └──────restore────▶ DENIED  (terminal for the mount)
//! ```

use cobra_client::HttpClient;
use shared::permissions::Permission;

use super::session::SessionStore;

pub const DEFAULT_LOGIN_ROUTE: &str = "/login";
pub const DEFAULT_ROUTE: &str = "/dashboard";

/// Checks attached to a view. All configured checks must pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requirement {
    role: Option<String>,
    any_role: Vec<String>,
    permission: Option<Permission>,
    superuser: bool,
}

impl Requirement {
    /// Only a session is required
    pub fn authenticated() -> Self {
        Self::default()
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// At least one of `roles`. An empty list adds no check.
    pub fn any_role<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.any_role = roles.into_iter().map(Into::into).collect();
        self
    }

    pub fn permission(mut self, permission: Permission) -> Self {
        self.permission = Some(permission);
        self
    }

    pub fn superuser(mut self) -> Self {
        self.superuser = true;
        self
    }

    /// First failing check, in declaration order
    fn check<C: HttpClient>(&self, session: &SessionStore<C>) -> Result<(), Denial> {
        if !session.is_authenticated() {
            return Err(Denial::NotAuthenticated);
        }
        if let Some(role) = &self.role
            && !session.has_role(role)
        {
            return Err(Denial::MissingRole(role.clone()));
        }
        if !self.any_role.is_empty() && !session.has_any_role(&self.any_role) {
            return Err(Denial::MissingAnyRole(self.any_role.clone()));
        }
        if let Some(permission) = self.permission
            && !session.has_permission(permission)
        {
            return Err(Denial::MissingPermission(permission));
        }
        if self.superuser && !session.is_superuser() {
            return Err(Denial::NotSuperuser);
        }
        Ok(())
    }
}

/// Why a view was denied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    NotAuthenticated,
    MissingRole(String),
    MissingAnyRole(Vec<String>),
    MissingPermission(Permission),
    NotSuperuser,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    /// Session restore has not completed
    Pending,
    Allowed,
    Denied(Denial),
}

/// What the host should draw
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardView<V, F> {
    Loading,
    Content(V),
    Redirect(String),
    Fallback(F),
}

#[derive(Debug, Clone)]
pub struct AccessGuard {
    requirement: Requirement,
    login_route: String,
    default_route: String,
}

impl AccessGuard {
    pub fn new(requirement: Requirement) -> Self {
        Self {
            requirement,
            login_route: DEFAULT_LOGIN_ROUTE.to_string(),
            default_route: DEFAULT_ROUTE.to_string(),
        }
    }

    pub fn with_routes(mut self, login_route: impl Into<String>, default_route: impl Into<String>) -> Self {
        self.login_route = login_route.into();
        self.default_route = default_route.into();
        self
    }

    pub fn requirement(&self) -> &Requirement {
        &self.requirement
    }

    pub fn evaluate<C: HttpClient>(&self, session: &SessionStore<C>) -> GuardState {
        if !session.is_restored() {
            return GuardState::Pending;
        }
        match self.requirement.check(session) {
            Ok(()) => GuardState::Allowed,
            Err(denial) => GuardState::Denied(denial),
        }
    }

    /// Renders `content` only when allowed; denied views redirect.
    pub fn render<C, V>(&self, session: &SessionStore<C>, content: impl FnOnce() -> V) -> GuardView<V, ()>
    where
        C: HttpClient,
    {
        self.view(self.evaluate(session), content, None::<fn(&Denial)>)
    }

    /// Like [`AccessGuard::render`], but an authenticated user who fails a
    /// check gets `fallback` instead of the default-route redirect.
    pub fn render_with_fallback<C, V, F>(
        &self,
        session: &SessionStore<C>,
        content: impl FnOnce() -> V,
        fallback: impl FnOnce(&Denial) -> F,
    ) -> GuardView<V, F>
    where
        C: HttpClient,
    {
        self.view(self.evaluate(session), content, Some(fallback))
    }

    /// Starts one mount of the guarded view
    pub fn mount<'a, C: HttpClient>(&'a self, session: &'a SessionStore<C>) -> GuardMount<'a, C> {
        GuardMount {
            guard: self,
            session,
            denied: None,
        }
    }

    fn view<V, F>(
        &self,
        state: GuardState,
        content: impl FnOnce() -> V,
        fallback: Option<impl FnOnce(&Denial) -> F>,
    ) -> GuardView<V, F> {
        match state {
            GuardState::Pending => GuardView::Loading,
            GuardState::Allowed => GuardView::Content(content()),
            GuardState::Denied(Denial::NotAuthenticated) => {
                tracing::debug!(route = %self.login_route, "Not authenticated, redirecting");
                GuardView::Redirect(self.login_route.clone())
            }
            GuardState::Denied(denial) => match fallback {
                Some(fallback) => GuardView::Fallback(fallback(&denial)),
                None => {
                    tracing::debug!(?denial, route = %self.default_route, "Access denied, redirecting");
                    GuardView::Redirect(self.default_route.clone())
                }
            },
        }
    }
}

/// One mount of a guarded view. Once denied it stays denied; a new
/// navigation starts a new mount.
pub struct GuardMount<'a, C: HttpClient> {
    guard: &'a AccessGuard,
    session: &'a SessionStore<C>,
    denied: Option<Denial>,
}

impl<C: HttpClient> GuardMount<'_, C> {
    pub fn state(&mut self) -> GuardState {
        if let Some(denial) = &self.denied {
            return GuardState::Denied(denial.clone());
        }
        let state = self.guard.evaluate(self.session);
        if let GuardState::Denied(denial) = &state {
            self.denied = Some(denial.clone());
        }
        state
    }

    pub fn render<V>(&mut self, content: impl FnOnce() -> V) -> GuardView<V, ()> {
        let state = self.state();
        self.guard.view(state, content, None::<fn(&Denial)>)
    }
}
