//! Equipment Model
//!
//! Items screened at the checkpoints. The backend speaks French field
//! names (`nom`, `statut`, `date_ajout`); they are renamed here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

closed_enum! {
    /// Authorization status of a piece of equipment
    pub enum EquipmentStatus ("statut") {
        Authorized => "AUTORISE",
        Forbidden => "INTERDIT",
        RequiresAuthorization => "SOUMIS",
    }
}

/// Equipment entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    #[serde(rename = "id_equipement")]
    pub id: i64,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "statut")]
    pub status: EquipmentStatus,
    #[serde(default)]
    pub description: Option<String>,
    /// Reference photo URL
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, rename = "date_ajout")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Create/update equipment payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EquipmentPayload {
    #[serde(rename = "nom")]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(rename = "statut")]
    pub status: EquipmentStatus,
    pub description: Option<String>,
}

/// Result of `POST equipements/recognize/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRecognition {
    #[serde(rename = "statut")]
    pub status: EquipmentStatus,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default, rename = "nom")]
    pub name: Option<String>,
    #[serde(default, rename = "id_equipement")]
    pub equipment_id: Option<i64>,
}
