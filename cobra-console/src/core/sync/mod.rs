//! Resource Synchronizer
//!
//! Keeps the local mirror of one remote collection and performs
//! create/read/update/delete against it. One instance per mounted screen;
//! dropping it (or calling [`ResourceSync::unmount`]) cancels an
//! outstanding load and makes every later response a no-op.
//!
//! # Consistency
//!
//! - The mirror only changes after a successful response, and only to the
//!   server's representation. A failed call leaves it untouched.
//! - Loads replace the mirror wholesale; a load is applied only if no
//!   newer load was issued and no mutation was applied since it started.
//! - Updates and deletes on the same id are sequenced by ticket: a response
//!   to a request superseded by a newer one on the same id is discarded.

mod resource;
mod ticket;

pub use resource::{ConfirmDelete, Resource};

use std::sync::Arc;

use cobra_client::{ClientError, HttpClient};
use parking_lot::{Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;

use super::error::{ConsoleError, ConsoleResult};
use super::query::{ListQuery, Page};
use super::session::SessionStore;
use ticket::Tickets;

/// Result of a call whose response may arrive too late to apply
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome<T> {
    /// The mirror now reflects the response
    Applied(T),
    /// The server answered, but the response was stale or the view is gone
    Discarded,
}

impl<T> SyncOutcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, SyncOutcome::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            SyncOutcome::Applied(value) => Some(value),
            SyncOutcome::Discarded => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
    Deleted,
    /// The operator declined; nothing was sent
    Declined,
    /// The server deleted the item after the view went away
    Discarded,
}

struct Mirror<T: Resource> {
    items: Vec<T>,
    loaded: bool,
    tickets: Tickets<T::Id>,
}

impl<T: Resource> Mirror<T> {
    fn position(&self, id: &T::Id) -> Option<usize> {
        self.items.iter().position(|item| item.id() == *id)
    }
}

/// Ticket of an update or delete on the wire. Dropped unfinished (the
/// caller gave up on the future) it is released.
struct Pending<'a, T: Resource> {
    mirror: &'a Mutex<Mirror<T>>,
    id: &'a T::Id,
    ticket: u64,
    finished: bool,
}

impl<'a, T: Resource> Pending<'a, T> {
    fn begin(mirror: &'a Mutex<Mirror<T>>, id: &'a T::Id) -> Self {
        let ticket = mirror.lock().tickets.begin(id.clone());
        Self {
            mirror,
            id,
            ticket,
            finished: false,
        }
    }

    /// Locks the mirror and reports whether this ticket was still the newest.
    fn finish(mut self) -> (MutexGuard<'a, Mirror<T>>, bool) {
        self.finished = true;
        let lock: &'a Mutex<Mirror<T>> = self.mirror;
        let mut mirror = lock.lock();
        let current = mirror.tickets.finish(self.id, self.ticket);
        (mirror, current)
    }
}

impl<T: Resource> Drop for Pending<'_, T> {
    fn drop(&mut self) {
        if !self.finished {
            self.mirror.lock().tickets.finish(self.id, self.ticket);
        }
    }
}

pub struct ResourceSync<T: Resource, C: HttpClient> {
    session: Arc<SessionStore<C>>,
    mirror: Mutex<Mirror<T>>,
    cancel: CancellationToken,
}

impl<T: Resource, C: HttpClient> std::fmt::Debug for ResourceSync<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mirror = self.mirror.lock();
        f.debug_struct("ResourceSync")
            .field("resource", &T::LABEL)
            .field("items", &mirror.items.len())
            .field("loaded", &mirror.loaded)
            .field("mounted", &self.is_mounted())
            .finish()
    }
}

impl<T: Resource, C: HttpClient> ResourceSync<T, C> {
    pub fn new(session: Arc<SessionStore<C>>) -> Self {
        Self::with_cancellation(session, CancellationToken::new())
    }

    /// Mounts under `cancel`; cancelling it unmounts this synchronizer.
    pub fn with_cancellation(session: Arc<SessionStore<C>>, cancel: CancellationToken) -> Self {
        Self {
            session,
            mirror: Mutex::new(Mirror {
                items: Vec::new(),
                loaded: false,
                tickets: Tickets::new(),
            }),
            cancel,
        }
    }

    // ========== Mirror ==========

    /// Snapshot of the mirror, in display order
    pub fn items(&self) -> Vec<T> {
        self.mirror.lock().items.clone()
    }

    pub fn get(&self, id: &T::Id) -> Option<T> {
        let mirror = self.mirror.lock();
        mirror.position(id).map(|pos| mirror.items[pos].clone())
    }

    pub fn len(&self) -> usize {
        self.mirror.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mirror.lock().items.is_empty()
    }

    /// True once a load has been applied
    pub fn is_loaded(&self) -> bool {
        self.mirror.lock().loaded
    }

    /// Updates and deletes still waiting for a response
    pub fn pending_mutations(&self) -> usize {
        self.mirror.lock().tickets.in_flight()
    }

    pub fn query(&self, query: &ListQuery<T::Status>) -> Page<T> {
        query.apply(&self.mirror.lock().items)
    }

    // ========== Lifecycle ==========

    pub fn is_mounted(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// The owning view went away: an outstanding load is cancelled and
    /// mutation responses still in flight are discarded.
    pub fn unmount(&self) {
        if self.is_mounted() {
            tracing::debug!(resource = T::LABEL, "Synchronizer unmounted");
            self.cancel.cancel();
        }
    }

    // ========== Operations ==========

    /// Fetches the whole collection and replaces the mirror with it.
    ///
    /// Returns the number of items on success.
    pub async fn load_all(&self) -> ConsoleResult<SyncOutcome<usize>> {
        if !self.is_mounted() {
            return Err(ConsoleError::Cancelled);
        }
        let ticket = self.mirror.lock().tickets.begin_load();
        let token = self.session.client().token();

        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                tracing::debug!(resource = T::LABEL, "Load cancelled");
                return Err(ConsoleError::Cancelled);
            }
            result = self.session.client().get::<Vec<T>>(T::ENDPOINT) => result,
        };
        let items = result.map_err(|e| self.failed("load", token, e))?;

        let mut mirror = self.mirror.lock();
        if !self.is_mounted() || !mirror.tickets.is_current_load(ticket) {
            tracing::debug!(resource = T::LABEL, ticket, "Stale load discarded");
            return Ok(SyncOutcome::Discarded);
        }
        let count = items.len();
        mirror.items = items;
        mirror.loaded = true;
        tracing::debug!(resource = T::LABEL, count, "Collection loaded");
        Ok(SyncOutcome::Applied(count))
    }

    /// Creates an item; the mirror gains the server's representation,
    /// newest first.
    pub async fn create(&self, payload: &T::Payload) -> ConsoleResult<SyncOutcome<T>> {
        T::validate(payload)?;
        let token = self.session.client().token();

        let created: T = self
            .session
            .client()
            .post(T::ENDPOINT, payload)
            .await
            .map_err(|e| self.failed("create", token, e))?;

        let id = created.id();
        let mut mirror = self.mirror.lock();
        if !self.is_mounted() {
            tracing::debug!(resource = T::LABEL, id = %id, "Created after unmount, discarded");
            return Ok(SyncOutcome::Discarded);
        }
        match mirror.position(&id) {
            // a load that finished first may already hold it
            Some(pos) => mirror.items[pos] = created.clone(),
            None => mirror.items.insert(0, created.clone()),
        }
        mirror.tickets.invalidate_loads();
        tracing::info!(resource = T::LABEL, id = %id, "Created");
        Ok(SyncOutcome::Applied(created))
    }

    /// Replaces the item `id` with the server's answer to `PUT`.
    ///
    /// `id` must be in the mirror, otherwise [`ConsoleError::UnknownItem`]
    /// is returned without a request.
    pub async fn update(
        &self,
        id: &T::Id,
        payload: &T::Payload,
    ) -> ConsoleResult<SyncOutcome<T>> {
        T::validate(payload)?;
        if self.mirror.lock().position(id).is_none() {
            return Err(unknown_item::<T>(id));
        }
        let pending = Pending::begin(&self.mirror, id);
        let token = self.session.client().token();

        let result = self
            .session
            .client()
            .put::<T, _>(&T::item_path(id), payload)
            .await;

        let (mut mirror, current) = pending.finish();
        let updated = match result {
            Ok(updated) => updated,
            Err(e) => {
                drop(mirror);
                return Err(self.failed("update", token, e));
            }
        };

        if !current || !self.is_mounted() {
            tracing::debug!(resource = T::LABEL, id = %id, "Stale update discarded");
            return Ok(SyncOutcome::Discarded);
        }
        let Some(pos) = mirror.position(id) else {
            // deleted while the update was in flight
            return Ok(SyncOutcome::Discarded);
        };
        mirror.items[pos] = updated.clone();
        mirror.tickets.invalidate_loads();
        tracing::info!(resource = T::LABEL, id = %id, "Updated");
        Ok(SyncOutcome::Applied(updated))
    }

    /// Deletes `id` once `confirm` agrees.
    ///
    /// Deletions the resource refuses for the signed-in operator fail with
    /// [`ConsoleError::Refused`] before `confirm` is asked. On success the
    /// item leaves the mirror even if an update on the same id is still in
    /// flight; that update's response is then discarded.
    pub async fn delete(
        &self,
        id: &T::Id,
        confirm: impl ConfirmDelete<T>,
    ) -> ConsoleResult<Deletion> {
        let item = self.get(id).ok_or_else(|| unknown_item::<T>(id))?;
        item.check_delete(self.session.user().as_ref())?;
        if !confirm.confirm(&item) {
            tracing::debug!(resource = T::LABEL, id = %id, "Delete declined");
            return Ok(Deletion::Declined);
        }
        let pending = Pending::begin(&self.mirror, id);
        let token = self.session.client().token();

        let result = self.session.client().delete(&T::item_path(id)).await;

        let (mut mirror, _) = pending.finish();
        if let Err(e) = result {
            drop(mirror);
            return Err(self.failed("delete", token, e));
        }

        if !self.is_mounted() {
            return Ok(Deletion::Discarded);
        }
        mirror.items.retain(|item| item.id() != *id);
        mirror.tickets.invalidate_loads();
        tracing::info!(resource = T::LABEL, id = %id, "Deleted");
        Ok(Deletion::Deleted)
    }

    /// `token` is the one the failed request was sent with.
    fn failed(&self, op: &'static str, token: Option<String>, err: ClientError) -> ConsoleError {
        if err.is_unauthorized() {
            self.session.expire_token(token.as_deref());
        }
        tracing::warn!(resource = T::LABEL, op, error = %err, "Request failed");
        ConsoleError::Client(err)
    }
}

impl<T: Resource, C: HttpClient> Drop for ResourceSync<T, C> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn unknown_item<T: Resource>(id: &T::Id) -> ConsoleError {
    ConsoleError::UnknownItem {
        resource: T::LABEL,
        id: id.to_string(),
    }
}
