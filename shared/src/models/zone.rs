//! Zone Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

closed_enum! {
    /// Zone surveillance status
    pub enum ZoneStatus ("status") {
        Active => "active",
        Inactive => "inactive",
    }
}

/// Zone entity (monitored perimeter: entrance, parking lot, restricted area)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: ZoneStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Create/update zone payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ZonePayload {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub status: ZoneStatus,
}
