use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body for access-key creation and relabeling; the secret itself is minted
/// service-side and only ever travels in the creation response.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AccessKeyLabelPayload {
    #[validate(length(min = 1, message = "label must not be empty"))]
    pub label: String,
}
