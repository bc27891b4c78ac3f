//! Login state machine.
//!
//! One [`LoginFlow`] models one login attempt:
//!
//! ```text
//! Anonymous --submit_credentials--> Authenticated(Session)
//!                                 | MfaPending(MfaChallenge)
//! MfaChallenge --submit_code-----> Session
//! ```
//!
//! Both transitions consume their state, so verifying MFA without a live
//! exchange token, or reusing a challenge after failure, is impossible at
//! the type level rather than a runtime error. Rejected credentials or an
//! expired challenge surface as [`AimsError::Auth`]; the caller restarts
//! from a fresh flow.
//!
//! Password change/reset and MFA device lifecycle are deliberately *not*
//! transitions of this machine — they live as standalone operations on
//! [`crate::AimsClient`].

use std::sync::Arc;

use secrecy::Secret;

use crate::config::Environment;
use crate::error::AimsError;
use crate::models::Session;
use crate::transport::Transport;

/// A single login attempt, bound to the environment of the client that
/// created it. Not shared across callers; the client retains no session
/// state once the flow completes.
pub struct LoginFlow {
    transport: Arc<dyn Transport>,
    environment: Environment,
}

/// Result of submitting primary credentials.
pub enum LoginOutcome {
    /// MFA is not required for the account (or a valid code accompanied the
    /// credentials): a full session, usable immediately.
    Authenticated(Session),
    /// The account requires MFA and no code was supplied. The challenge
    /// holds the exchange token; nothing else can be done with it.
    MfaPending(MfaChallenge),
}

impl std::fmt::Debug for LoginOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoginOutcome::Authenticated(_) => f.write_str("Authenticated(..)"),
            LoginOutcome::MfaPending(_) => f.write_str("MfaPending(..)"),
        }
    }
}

/// A pending MFA verification. Consuming `submit_code` is the only exit.
pub struct MfaChallenge {
    transport: Arc<dyn Transport>,
    environment: Environment,
    exchange_token: Secret<String>,
}

impl LoginFlow {
    pub(crate) fn new(transport: Arc<dyn Transport>, environment: Environment) -> Self {
        Self {
            transport,
            environment,
        }
    }

    pub async fn submit_credentials(
        self,
        email: &str,
        password: &Secret<String>,
        mfa_code: Option<&str>,
    ) -> Result<LoginOutcome, AimsError> {
        if email.trim().is_empty() {
            return Err(AimsError::validation("authenticate", "email must not be empty"));
        }

        let descriptor = self
            .transport
            .authenticate(email, password, mfa_code, self.environment)
            .await?;

        if descriptor.mfa_pending {
            tracing::debug!(environment = self.environment.as_str(), "MFA challenge issued");
            return Ok(LoginOutcome::MfaPending(MfaChallenge {
                transport: self.transport,
                environment: self.environment,
                exchange_token: descriptor.token,
            }));
        }

        Session::from_descriptor("authenticate", descriptor).map(LoginOutcome::Authenticated)
    }
}

impl MfaChallenge {
    pub async fn submit_code(self, code: &str) -> Result<Session, AimsError> {
        if code.trim().is_empty() {
            return Err(AimsError::validation("verify_mfa", "MFA code must not be empty"));
        }

        let descriptor = self
            .transport
            .authenticate_with_exchange_token(&self.exchange_token, code, self.environment)
            .await?;

        Session::from_descriptor("verify_mfa", descriptor)
    }
}
