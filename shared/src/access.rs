//! Capability table
//!
//! Every role check in the service goes through [`Role::can`]. Route families
//! are guarded by a capability, never by role literals.
//!
//! | Capability | admin | hr | team-lead | employee |
//! |---|---|---|---|---|
//! | `users:manage` | x | | | |
//! | `org:view` | x | x | | |
//! | `org:manage` | x | | | |
//! | `hr:workspace` | x | x | | |
//! | `content:publish` | x | x | | |
//! | `team:workspace` | x | | x | |
//! | `self:service` | x | x | x | x |

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// `/admin/users`
    #[serde(rename = "users:manage")]
    ManageUsers,
    /// Read departments, leave policies, salary structures
    #[serde(rename = "org:view")]
    ViewOrgSettings,
    /// Write departments, leave policies, salary structures
    #[serde(rename = "org:manage")]
    ManageOrgSettings,
    /// `/hr/*`
    #[serde(rename = "hr:workspace")]
    HrWorkspace,
    /// Create/delete announcements
    #[serde(rename = "content:publish")]
    PublishContent,
    /// `/team-lead/*`
    #[serde(rename = "team:workspace")]
    TeamWorkspace,
    /// `/employee/*`, scoped to the caller
    #[serde(rename = "self:service")]
    SelfService,
}

const ADMIN: &[Role] = &[Role::Admin];
const ADMIN_HR: &[Role] = &[Role::Admin, Role::Hr];
const ADMIN_TEAM_LEAD: &[Role] = &[Role::Admin, Role::TeamLead];
const EVERYONE: &[Role] = &Role::ALL;

/// Allowed roles per capability
pub const CAPABILITY_TABLE: &[(Capability, &[Role])] = &[
    (Capability::ManageUsers, ADMIN),
    (Capability::ViewOrgSettings, ADMIN_HR),
    (Capability::ManageOrgSettings, ADMIN),
    (Capability::HrWorkspace, ADMIN_HR),
    (Capability::PublishContent, ADMIN_HR),
    (Capability::TeamWorkspace, ADMIN_TEAM_LEAD),
    (Capability::SelfService, EVERYONE),
];

impl Capability {
    pub const ALL: [Capability; 7] = [
        Capability::ManageUsers,
        Capability::ViewOrgSettings,
        Capability::ManageOrgSettings,
        Capability::HrWorkspace,
        Capability::PublishContent,
        Capability::TeamWorkspace,
        Capability::SelfService,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Capability::ManageUsers => "users:manage",
            Capability::ViewOrgSettings => "org:view",
            Capability::ManageOrgSettings => "org:manage",
            Capability::HrWorkspace => "hr:workspace",
            Capability::PublishContent => "content:publish",
            Capability::TeamWorkspace => "team:workspace",
            Capability::SelfService => "self:service",
        }
    }

    /// Roles granted this capability
    pub fn allowed_roles(self) -> &'static [Role] {
        CAPABILITY_TABLE
            .iter()
            .find(|(cap, _)| *cap == self)
            .map(|(_, roles)| *roles)
            .unwrap_or(&[])
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Role {
    /// Whether this role holds `capability`
    pub fn can(self, capability: Capability) -> bool {
        capability.allowed_roles().contains(&self)
    }

    /// All capabilities held by this role, in table order
    pub fn capabilities(self) -> Vec<Capability> {
        CAPABILITY_TABLE
            .iter()
            .filter(|(_, roles)| roles.contains(&self))
            .map(|(cap, _)| *cap)
            .collect()
    }
}
