//! CyberCobra console core
//!
//! Session handling, view access guards and the generic resource
//! synchronizer behind every admin screen (zones, objects, equipment,
//! cameras, reports, users).

pub mod config;
pub mod core;
pub mod logger;

pub use config::ConsoleConfig;
pub use crate::core::{
    AccessGuard, ConfirmDelete, Console, ConsoleError, ConsoleResult, Deletion, Denial,
    ErrorKind, FileStorage, GuardState, GuardView, Integrations, ListQuery, MemoryStorage,
    NotificationCenter, Page, PersistedSession, Requirement, Resource, ResourceSync, Session,
    SessionEvent, SessionStorage, SessionStore, SyncOutcome,
};
pub use logger::init_logger;

// Re-export workspace crates for hosts
pub use cobra_client;
pub use shared;
