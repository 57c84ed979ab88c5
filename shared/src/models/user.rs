//! User account Model (managed from the users screen)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::permissions::Role;

closed_enum! {
    pub enum AccountStatus ("status") {
        Active => "Active",
        Inactive => "Inactive",
    }
}

/// User account entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: AccountStatus,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Create/update user payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserAccountPayload {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email is invalid"))]
    pub email: String,
    pub role: Role,
    pub status: AccountStatus,
}
