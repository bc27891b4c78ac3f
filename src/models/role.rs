use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ChangeRecord;

/// Allow/deny decision attached to an action pattern inside a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionGrant {
    Allowed,
    Denied,
}

/// A named permission bundle.
///
/// A global role carries no `account_id` and is visible to every account; an
/// account role is owned by exactly one account and invisible elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub permissions: BTreeMap<String, PermissionGrant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<ChangeRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<ChangeRecord>,
}

impl Role {
    pub fn is_global(&self) -> bool {
        self.account_id.is_none()
    }
}
