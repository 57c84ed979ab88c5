//! Cobra Client - HTTP client for the CyberCobra API
//!
//! JSON over HTTPS with bearer-token auth. The console core only talks to
//! the backend through the [`HttpClient`] trait.

pub mod config;
pub mod error;
pub mod http;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{AuthGrant, HttpClient, ImageUpload, NetworkHttpClient};

// Re-export shared types for convenience
pub use shared::client::{LoginRequest, LoginResponse, LogoutRequest, UserInfo};
