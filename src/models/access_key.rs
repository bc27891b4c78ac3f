use secrecy::Secret;
use serde::{Deserialize, Serialize};

use super::ChangeRecord;

/// A long-lived programmatic credential as returned by read and list
/// operations. There is deliberately no secret field on this shape: the
/// service reveals the secret exactly once, in the creation response, which
/// deserializes into [`CreatedAccessKey`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessKey {
    pub access_key_id: String,
    pub user_id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<ChangeRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<ChangeRecord>,
}

/// Creation response for an access key, the only shape that carries the
/// secret. The secret is held in a [`Secret`] so it is redacted from debug
/// output and never serialized back out.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedAccessKey {
    pub access_key_id: String,
    pub user_id: String,
    #[serde(default)]
    pub label: String,
    pub secret_key: Secret<String>,
}
