//! Typed request payloads.
//!
//! Bodies are built from these structs and serialized by serde, never
//! spliced into strings, so values containing quotes or control characters
//! cannot corrupt the wire payload. Field constraints are checked locally
//! with `validator` before a descriptor is handed to the transport.

mod access_key;
mod role;
mod user;

pub use access_key::AccessKeyLabelPayload;
pub use role::{CreateRolePayload, UpdateRoleNamePayload, UpdateRolePermissionsPayload};
pub use user::CreateUserPayload;

use serde::Serialize;
use serde_json::Value;
use validator::Validate;

use crate::error::AimsError;

/// Run payload validation, mapping failures into the local error taxonomy.
pub(crate) fn validated(
    operation: &'static str,
    payload: &impl Validate,
) -> Result<(), AimsError> {
    payload
        .validate()
        .map_err(|e| AimsError::validation(operation, e.to_string()))
}

pub(crate) fn to_payload<T: Serialize>(
    operation: &'static str,
    payload: &T,
) -> Result<Value, AimsError> {
    serde_json::to_value(payload)
        .map_err(|e| AimsError::validation(operation, format!("unserializable payload: {e}")))
}
