//! Mirrored collections
//!
//! [`Resource`] implementations for every admin screen, plus the
//! synchronizer alias each screen mounts.

use std::str::FromStr;

use shared::client::UserInfo;
use shared::models::{
    AccountStatus, Camera, CameraPayload, CameraStatus, Equipment, EquipmentPayload,
    EquipmentStatus, ObjectStatus, Report, ReportPayload, ReportStatus, SiteObject,
    SiteObjectPayload, UnknownVariant, UserAccount, UserAccountPayload, Zone, ZonePayload,
    ZoneStatus,
};

use super::error::{ConsoleError, ConsoleResult};
use super::sync::{Resource, ResourceSync};

pub type ZoneSync<C> = ResourceSync<Zone, C>;
pub type SiteObjectSync<C> = ResourceSync<SiteObject, C>;
pub type EquipmentSync<C> = ResourceSync<Equipment, C>;
pub type CameraSync<C> = ResourceSync<Camera, C>;
pub type ReportSync<C> = ResourceSync<Report, C>;
pub type UserSync<C> = ResourceSync<UserAccount, C>;

/// Parses a free-text form value into a closed enumeration, so an
/// out-of-range value is refused before anything is sent.
pub fn parse_field<E>(value: &str) -> ConsoleResult<E>
where
    E: FromStr<Err = UnknownVariant>,
{
    Ok(value.trim().parse::<E>()?)
}

impl Resource for Zone {
    type Id = i64;
    type Payload = ZonePayload;
    type Status = ZoneStatus;

    const ENDPOINT: &'static str = "zones/";
    const LABEL: &'static str = "zone";

    fn id(&self) -> i64 {
        self.id
    }

    fn status(&self) -> ZoneStatus {
        self.status
    }

    fn search_text(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.description.as_deref());
        fields
    }
}

impl Resource for SiteObject {
    type Id = i64;
    type Payload = SiteObjectPayload;
    type Status = ObjectStatus;

    const ENDPOINT: &'static str = "objects/";
    const LABEL: &'static str = "object";

    fn id(&self) -> i64 {
        self.id
    }

    fn status(&self) -> ObjectStatus {
        self.status
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

impl Resource for Equipment {
    type Id = i64;
    type Payload = EquipmentPayload;
    type Status = EquipmentStatus;

    // Backend path is French
    const ENDPOINT: &'static str = "equipements/";
    const LABEL: &'static str = "equipment";

    fn id(&self) -> i64 {
        self.id
    }

    fn status(&self) -> EquipmentStatus {
        self.status
    }

    fn search_text(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.status.as_str()];
        fields.extend(self.description.as_deref());
        fields
    }
}

impl Resource for Camera {
    type Id = i64;
    type Payload = CameraPayload;
    type Status = CameraStatus;

    const ENDPOINT: &'static str = "cameras/";
    const LABEL: &'static str = "camera";

    fn id(&self) -> i64 {
        self.id
    }

    fn status(&self) -> CameraStatus {
        self.status
    }

    fn search_text(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.zone.as_str(),
            self.ip_address.as_str(),
        ]
    }
}

impl Resource for Report {
    type Id = i64;
    type Payload = ReportPayload;
    type Status = ReportStatus;

    const ENDPOINT: &'static str = "report/";
    const LABEL: &'static str = "report";

    fn id(&self) -> i64 {
        self.id
    }

    fn status(&self) -> ReportStatus {
        self.status
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.subject.as_str()]
    }
}

impl Resource for UserAccount {
    type Id = i64;
    type Payload = UserAccountPayload;
    type Status = AccountStatus;

    const ENDPOINT: &'static str = "users/";
    const LABEL: &'static str = "user";

    fn id(&self) -> i64 {
        self.id
    }

    fn status(&self) -> AccountStatus {
        self.status
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str()]
    }

    /// Operators cannot delete their own account.
    fn check_delete(&self, operator: Option<&UserInfo>) -> ConsoleResult<()> {
        if operator.is_some_and(|op| op.id == self.id.to_string()) {
            return Err(ConsoleError::Refused(
                "You cannot delete your own account.".into(),
            ));
        }
        Ok(())
    }
}
