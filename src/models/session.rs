use chrono::{DateTime, Utc};
use secrecy::Secret;
use serde::Deserialize;

use super::{Account, Role, User};
use crate::error::AimsError;

/// Raw authentication result handed back by the transport.
///
/// When `mfa_pending` is set, `token` is a short-lived exchange token that
/// authorizes nothing except the MFA verification call, and the user/account
/// fields are typically absent.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionDescriptor {
    pub token: Secret<String>,
    #[serde(default)]
    pub token_expiration: i64,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub account: Option<Account>,
    #[serde(default)]
    pub mfa_pending: bool,
}

/// A fully established session: the result of a successful login, including
/// MFA verification where the account requires it.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: Secret<String>,
    pub user: User,
    pub account: Account,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Promote a transport session descriptor into a usable session.
    ///
    /// A descriptor still flagged as MFA-pending, or missing its user or
    /// account, is not a session and surfaces as a contract violation.
    pub(crate) fn from_descriptor(
        operation: &'static str,
        descriptor: SessionDescriptor,
    ) -> Result<Self, AimsError> {
        if descriptor.mfa_pending {
            return Err(AimsError::contract(
                operation,
                "session descriptor is still MFA-pending",
            ));
        }
        let user = descriptor
            .user
            .ok_or_else(|| AimsError::contract(operation, "session descriptor missing user"))?;
        let account = descriptor
            .account
            .ok_or_else(|| AimsError::contract(operation, "session descriptor missing account"))?;
        let expires_at = DateTime::from_timestamp(descriptor.token_expiration, 0)
            .ok_or_else(|| {
                AimsError::contract(operation, "session descriptor expiration out of range")
            })?;

        Ok(Session {
            token: descriptor.token,
            user,
            account,
            expires_at,
        })
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Decoded claims of a presented token. Never constructed by the client,
/// only received from the service.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenInfo {
    pub user: User,
    pub account: Account,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub token_expiration: i64,
}
