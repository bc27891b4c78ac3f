//! Entity shapes returned by the AIMS service.
//!
//! Pure data contracts: optional fields default to absent so a partially
//! populated entity round-trips without corrupting unrelated fields.

mod access_key;
mod account;
mod role;
mod session;
mod user;

pub use access_key::{AccessKey, CreatedAccessKey};
pub use account::Account;
pub use role::{PermissionGrant, Role};
pub use session::{Session, SessionDescriptor, TokenInfo};
pub use user::User;

use serde::{Deserialize, Serialize};

/// Actor/timestamp pair attached to created/modified records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub at: i64,
    pub by: String,
}
