//! Report Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

closed_enum! {
    pub enum ReportType ("type") {
        Security => "security",
        Equipment => "equipment",
        Incident => "incident",
        Maintenance => "maintenance",
    }
}

closed_enum! {
    pub enum ReportStatus ("status") {
        Pending => "pending",
        Completed => "completed",
    }
}

/// Report entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    #[serde(alias = "title")]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub status: ReportStatus,
    #[serde(default, alias = "date")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Create/update report payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReportPayload {
    #[validate(length(min = 1, message = "subject is required"))]
    pub subject: String,
    pub body: String,
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub status: ReportStatus,
}

/// `POST report/summarize/` request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummaryRequest {
    pub subject: String,
    pub body: String,
}

/// `POST report/summarize/` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub message: String,
}
