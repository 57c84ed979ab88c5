//! Shared types for the CyberCobra console
//!
//! Wire DTOs, entity models and the role/permission table used by both
//! the API client and the console core.

pub mod client;
pub mod models;
pub mod permissions;
pub mod serde_helpers;
pub mod util;

// Re-exports
pub use client::{LoginRequest, LoginResponse, LogoutRequest, UserInfo};
pub use permissions::{Permission, Role};
pub use serde::{Deserialize, Serialize};
