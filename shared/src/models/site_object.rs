//! Site Object Model (structures, gates, fences inside a zone)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

closed_enum! {
    pub enum ObjectType ("type") {
        Structure => "structure",
        Gate => "gate",
        Fence => "fence",
        Vehicle => "vehicle",
        Person => "person",
    }
}

closed_enum! {
    pub enum ObjectStatus ("status") {
        Operational => "operational",
        Offline => "offline",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteObject {
    pub id: i64,
    pub name: String,
    #[serde(alias = "zoneId")]
    pub zone_id: String,
    #[serde(rename = "type")]
    pub object_type: ObjectType,
    pub status: ObjectStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SiteObjectPayload {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "zone_id is required"))]
    pub zone_id: String,
    #[serde(rename = "type")]
    pub object_type: ObjectType,
    pub status: ObjectStatus,
}
