use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::PermissionGrant;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRolePayload {
    #[validate(length(min = 1, message = "role name must not be empty"))]
    pub name: String,

    /// Action pattern → allow/deny. Evaluation happens service-side; the
    /// client treats the patterns as opaque.
    pub permissions: BTreeMap<String, PermissionGrant>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateRoleNamePayload {
    #[validate(length(min = 1, message = "role name must not be empty"))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateRolePermissionsPayload {
    pub permissions: BTreeMap<String, PermissionGrant>,
}
