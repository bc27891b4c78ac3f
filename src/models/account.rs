use serde::{Deserialize, Serialize};

use super::ChangeRecord;

/// A billable tenant in the AIMS hierarchy.
///
/// `mfa_required` is toggled only through the dedicated operation on the
/// client, never written as a side effect of other calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub mfa_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<ChangeRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<ChangeRecord>,
}

fn default_active() -> bool {
    true
}
