use serde::{Deserialize, Serialize};

use super::ChangeRecord;

/// A principal belonging to exactly one account.
///
/// The email address is the stable external identifier used by the
/// password-reset and MFA-removal flows, independent of the numeric id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub account_id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_phone: Option<String>,
    #[serde(default)]
    pub role_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<ChangeRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<ChangeRecord>,
}
