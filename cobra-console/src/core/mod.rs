//! Console core

pub mod console;
pub mod error;
pub mod guard;
pub mod notify;
pub mod query;
pub mod resources;
pub mod services;
pub mod session;
pub mod session_cache;
pub mod sync;

pub use console::Console;
pub use error::{ConsoleError, ConsoleResult, ErrorKind};
pub use guard::{AccessGuard, Denial, GuardMount, GuardState, GuardView, Requirement};
pub use notify::{Notification, NotificationCenter, NotificationLevel};
pub use query::{ListQuery, Page};
pub use resources::{
    CameraSync, EquipmentSync, ReportSync, SiteObjectSync, UserSync, ZoneSync, parse_field,
};
pub use services::Integrations;
pub use session::{Session, SessionEvent, SessionStore};
pub use session_cache::{FileStorage, MemoryStorage, PersistedSession, SessionStorage, StorageError};
pub use sync::{ConfirmDelete, Deletion, Resource, ResourceSync, SyncOutcome};
