//! Camera Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

closed_enum! {
    /// Camera recording status
    pub enum CameraStatus ("status") {
        Recording => "RECORDING",
        Offline => "OFFLINE",
        Maintenance => "MAINTENANCE",
    }
}

/// Camera entity
///
/// The backend may answer an update with only the fields it normalized,
/// so everything except id, name and status is optional on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    #[serde(rename = "id_camera")]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub zone: String,
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub resolution: String,
    pub status: CameraStatus,
    #[serde(default, alias = "date_ajout")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Create/update camera payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CameraPayload {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "zone is required"))]
    pub zone: String,
    #[validate(length(min = 1, message = "ip_address is required"))]
    pub ip_address: String,
    pub resolution: String,
    pub status: CameraStatus,
}

impl Default for CameraPayload {
    fn default() -> Self {
        Self {
            name: String::new(),
            zone: String::new(),
            ip_address: String::new(),
            resolution: "1080p".to_string(),
            status: CameraStatus::Recording,
        }
    }
}

/// One object found by the fire detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireDetectionBox {
    #[serde(rename = "class")]
    pub label: String,
    #[serde(default)]
    pub confidence: f64,
}

/// Result of `POST cameras/detect-fire/`
///
/// `alert_level` is free text on the wire (`CRITICAL`, `HIGH`, ...).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FireDetection {
    #[serde(default)]
    pub fire_detected: bool,
    #[serde(default)]
    pub smoke_detected: bool,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub alert_level: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detections: Vec<FireDetectionBox>,
    #[serde(default)]
    pub annotated_image_base64: Option<String>,
}

impl FireDetection {
    /// Fire or smoke in the frame
    pub fn is_alarm(&self) -> bool {
        self.fire_detected || self.smoke_detected
    }
}
