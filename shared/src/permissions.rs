//! Permission Definitions
//!
//! Fixed role → permission table. A session's permission set is the union
//! over every role the user holds and is always derived on demand.
//!
//! | role       | permissions                                                              |
//! |------------|--------------------------------------------------------------------------|
//! | `admin`    | manage_users, manage_system, view_reports, manage_zones, manage_equipment |
//! | `operator` | manage_zones, manage_equipment, view_reports, manage_cameras             |
//! | `public`   | view_public_data                                                         |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Console role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Operator,
    Public,
}

/// Permission granted through a role
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ManageUsers,
    ManageSystem,
    ViewReports,
    ManageZones,
    ManageEquipment,
    ManageCameras,
    ViewPublicData,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind}: {value}")]
pub struct UnknownName {
    pub kind: &'static str,
    pub value: String,
}

pub const ADMIN_PERMISSIONS: &[Permission] = &[
    Permission::ManageUsers,
    Permission::ManageSystem,
    Permission::ViewReports,
    Permission::ManageZones,
    Permission::ManageEquipment,
];

pub const OPERATOR_PERMISSIONS: &[Permission] = &[
    Permission::ManageZones,
    Permission::ManageEquipment,
    Permission::ViewReports,
    Permission::ManageCameras,
];

pub const PUBLIC_PERMISSIONS: &[Permission] = &[Permission::ViewPublicData];

impl Role {
    pub const ALL: &'static [Role] = &[Role::Admin, Role::Operator, Role::Public];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Operator => "operator",
            Role::Public => "public",
        }
    }

    /// Permissions granted by this role alone
    pub fn permissions(self) -> &'static [Permission] {
        match self {
            Role::Admin => ADMIN_PERMISSIONS,
            Role::Operator => OPERATOR_PERMISSIONS,
            Role::Public => PUBLIC_PERMISSIONS,
        }
    }
}

impl Permission {
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::ManageUsers => "manage_users",
            Permission::ManageSystem => "manage_system",
            Permission::ViewReports => "view_reports",
            Permission::ManageZones => "manage_zones",
            Permission::ManageEquipment => "manage_equipment",
            Permission::ManageCameras => "manage_cameras",
            Permission::ViewPublicData => "view_public_data",
        }
    }
}

impl FromStr for Role {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownName {
                kind: "role",
                value: s.to_string(),
            })
    }
}

impl FromStr for Permission {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ALL: &[Permission] = &[
            Permission::ManageUsers,
            Permission::ManageSystem,
            Permission::ViewReports,
            Permission::ManageZones,
            Permission::ManageEquipment,
            Permission::ManageCameras,
            Permission::ViewPublicData,
        ];
        ALL.iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownName {
                kind: "permission",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Union of the permissions of `roles`, sorted and without duplicates
pub fn permissions_for(roles: impl IntoIterator<Item = Role>) -> Vec<Permission> {
    let mut perms: Vec<Permission> = roles
        .into_iter()
        .flat_map(|r| r.permissions().iter().copied())
        .collect();
    perms.sort();
    perms.dedup();
    perms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_names() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), *role);
        }
        assert!("superadmin".parse::<Role>().is_err());
    }

    #[test]
    fn test_permission_parse() {
        assert_eq!(
            "manage_users".parse::<Permission>().unwrap(),
            Permission::ManageUsers
        );
        let err = "delete_everything".parse::<Permission>().unwrap_err();
        assert_eq!(err.kind, "permission");
    }

    #[test]
    fn test_operator_cannot_manage_users() {
        let perms = permissions_for([Role::Operator]);
        assert!(!perms.contains(&Permission::ManageUsers));
        assert!(perms.contains(&Permission::ManageCameras));
    }

    #[test]
    fn test_union_of_roles() {
        let perms = permissions_for([Role::Admin, Role::Public]);
        assert!(perms.contains(&Permission::ManageSystem));
        assert!(perms.contains(&Permission::ViewPublicData));
        assert_eq!(perms.len(), ADMIN_PERMISSIONS.len() + 1);
    }

    #[test]
    fn test_no_roles_no_permissions() {
        assert!(permissions_for(std::iter::empty()).is_empty());
    }
}
