//! Collection unwrapping for list endpoints.
//!
//! List responses arrive as an envelope object with a named collection field
//! (`accounts`, `account_ids`, `roles`, `users`, `access_keys`). Each list
//! operation declares its field once and this single routine does the
//! unwrap, instead of unchecked field access at every call site.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AimsError;

/// Extract and decode the named collection out of a list envelope.
///
/// A present-but-empty field is an empty `Vec`, not a failure; a missing
/// field on an otherwise successful response is a contract violation.
pub(crate) fn unwrap_collection<T: DeserializeOwned>(
    operation: &'static str,
    field: &'static str,
    mut envelope: Value,
) -> Result<Vec<T>, AimsError> {
    let collection = envelope
        .get_mut(field)
        .map(Value::take)
        .ok_or_else(|| AimsError::contract(operation, format!("missing `{field}` collection")))?;

    serde_json::from_value(collection)
        .map_err(|e| AimsError::contract(operation, format!("bad `{field}` collection: {e}")))
}
