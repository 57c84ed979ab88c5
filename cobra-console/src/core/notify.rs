//! Notifications - dismissible toasts for operation results

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::error::ConsoleError;

pub const DEFAULT_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: Instant,
    /// `None` stays until dismissed
    pub ttl: Option<Duration>,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        self.ttl
            .is_some_and(|ttl| now.saturating_duration_since(self.created_at) >= ttl)
    }
}

#[derive(Debug)]
pub struct NotificationCenter {
    next_id: AtomicU64,
    default_ttl: Option<Duration>,
    entries: Mutex<Vec<Notification>>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(Some(DEFAULT_TTL))
    }
}

impl NotificationCenter {
    /// A zero `default_ttl` is the same as `None`: nothing expires.
    pub fn new(default_ttl: Option<Duration>) -> Self {
        Self {
            next_id: AtomicU64::new(1),
            default_ttl: default_ttl.filter(|ttl| !ttl.is_zero()),
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(NotificationLevel::Success, message, self.default_ttl)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(NotificationLevel::Error, message, self.default_ttl)
    }

    pub fn warning(&self, message: impl Into<String>) -> u64 {
        self.push(NotificationLevel::Warning, message, self.default_ttl)
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.push(NotificationLevel::Info, message, self.default_ttl)
    }

    /// Operator-facing message for a failed operation
    pub fn report(&self, err: &ConsoleError) -> u64 {
        self.error(err.user_message())
    }

    pub fn push(
        &self,
        level: NotificationLevel,
        message: impl Into<String>,
        ttl: Option<Duration>,
    ) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries.lock().push(Notification {
            id,
            level,
            message: message.into(),
            created_at: Instant::now(),
            ttl: ttl.filter(|ttl| !ttl.is_zero()),
        });
        id
    }

    /// Returns false if `id` was already gone
    pub fn dismiss(&self, id: u64) -> bool {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|n| n.id != id);
        entries.len() != before
    }

    pub fn active(&self) -> Vec<Notification> {
        self.active_at(Instant::now())
    }

    /// Drops entries expired at `now` and returns the rest, oldest first
    pub fn active_at(&self, now: Instant) -> Vec<Notification> {
        let mut entries = self.entries.lock();
        entries.retain(|n| !n.is_expired(now));
        entries.clone()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ttl_expiry() {
        let center = NotificationCenter::default();
        let id = center.success("Camera saved");
        let now = Instant::now();
        assert_eq!(center.active_at(now).len(), 1);

        let later = now + DEFAULT_TTL + Duration::from_millis(1);
        assert!(center.active_at(later).is_empty());
        // already expired, nothing to dismiss
        assert!(!center.dismiss(id));
    }

    #[test]
    fn test_sticky_until_dismissed() {
        let center = NotificationCenter::default();
        let id = center.push(NotificationLevel::Warning, "Offline", None);
        let far = Instant::now() + Duration::from_secs(3600);
        assert_eq!(center.active_at(far).len(), 1);
        assert!(center.dismiss(id));
        assert!(center.active_at(far).is_empty());
    }

    #[test]
    fn test_zero_ttl_is_sticky() {
        let center = NotificationCenter::new(Some(Duration::ZERO));
        center.info("Loading zones");
        let far = Instant::now() + Duration::from_secs(60);
        assert_eq!(center.active_at(far).len(), 1);
    }

    #[test]
    fn test_report_uses_user_message() {
        let center = NotificationCenter::default();
        center.report(&ConsoleError::Validation("name is required".into()));
        let active = center.active();
        assert_eq!(active[0].level, NotificationLevel::Error);
        assert_eq!(active[0].message, "name is required");
    }

    #[test]
    fn test_ids_are_unique() {
        let center = NotificationCenter::default();
        let a = center.info("a");
        let b = center.info("b");
        assert_ne!(a, b);
        center.clear();
        assert!(center.active().is_empty());
    }
}
