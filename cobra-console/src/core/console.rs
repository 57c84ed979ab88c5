//! Console - wires the session, guards and screens together
//!
//! Constructed once per host process. Every screen mounted through
//! [`Console::screen`] is unmounted by [`Console::shutdown`].

use std::sync::Arc;

use cobra_client::{HttpClient, NetworkHttpClient};
use tokio_util::sync::CancellationToken;

use super::error::ConsoleResult;
use super::guard::{AccessGuard, Requirement};
use super::notify::NotificationCenter;
use super::services::Integrations;
use super::session::SessionStore;
use super::session_cache::SessionStorage;
use super::sync::{Resource, ResourceSync};
use crate::config::ConsoleConfig;

pub struct Console<C: HttpClient> {
    config: ConsoleConfig,
    session: Arc<SessionStore<C>>,
    notifications: Arc<NotificationCenter>,
    shutdown: CancellationToken,
}

impl Console<NetworkHttpClient> {
    /// Network client and session storage as configured
    pub fn from_config(config: ConsoleConfig) -> ConsoleResult<Self> {
        let client = Arc::new(config.build_client()?);
        let storage = config.session_storage();
        tracing::info!(api_url = %config.api_url, persistent = config.session_dir.is_some(), "Console configured");
        Ok(Self::new(config, client, storage))
    }
}

impl<C: HttpClient> Console<C> {
    pub fn new(config: ConsoleConfig, client: Arc<C>, storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            config,
            session: Arc::new(SessionStore::new(client, storage)),
            notifications: Arc::new(NotificationCenter::default()),
            shutdown: CancellationToken::new(),
        }
    }

    /// Restores the persisted session; returns whether one was found.
    pub fn restore(&self) -> bool {
        self.session.restore().is_some()
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionStore<C>> {
        &self.session
    }

    pub fn notifications(&self) -> &Arc<NotificationCenter> {
        &self.notifications
    }

    /// Mounts a synchronizer for one screen. The mirror starts empty; call
    /// [`ResourceSync::load_all`] to fill it.
    pub fn screen<T: Resource>(&self) -> ResourceSync<T, C> {
        tracing::debug!(resource = T::LABEL, "Screen mounted");
        ResourceSync::with_cancellation(self.session.clone(), self.shutdown.child_token())
    }

    pub fn guard(&self, requirement: Requirement) -> AccessGuard {
        self.config.guard(requirement)
    }

    pub fn integrations(&self) -> Integrations<C> {
        Integrations::new(self.session.clone())
    }

    /// Unmounts every screen still alive
    pub fn shutdown(&self) {
        tracing::info!("Console shutting down");
        self.shutdown.cancel();
    }
}
