//! Transport seam between the typed façade and the network.
//!
//! The client core never talks HTTP directly; it builds a
//! [`RequestDescriptor`] and hands it to a [`Transport`]. The reference
//! implementation is [`HttpTransport`]; tests substitute their own.

mod http;

pub use http::HttpTransport;

use async_trait::async_trait;
use secrecy::Secret;
use serde_json::Value;

use crate::config::Environment;
use crate::error::AimsError;
use crate::models::SessionDescriptor;
use crate::request::RequestDescriptor;

/// Network collaborator contract.
///
/// `fetch` accepts the descriptor's retry-budget and cache-TTL hints; the
/// mutating calls take no retry hint by design — re-issuing a non-idempotent
/// request is the caller's decision.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, descriptor: &RequestDescriptor) -> Result<Value, AimsError>;

    async fn create(&self, descriptor: &RequestDescriptor) -> Result<Value, AimsError>;

    async fn update(&self, descriptor: &RequestDescriptor) -> Result<Value, AimsError>;

    async fn delete(&self, descriptor: &RequestDescriptor) -> Result<Value, AimsError>;

    /// Exchange primary credentials for a session. When the account requires
    /// MFA and no code accompanied the credentials, the returned descriptor
    /// is flagged MFA-pending and carries an exchange token instead of a
    /// session token.
    async fn authenticate(
        &self,
        identifier: &str,
        secret: &Secret<String>,
        mfa_code: Option<&str>,
        environment: Environment,
    ) -> Result<SessionDescriptor, AimsError>;

    /// Complete a pending MFA challenge. The exchange token authorizes this
    /// call and nothing else.
    async fn authenticate_with_exchange_token(
        &self,
        exchange_token: &Secret<String>,
        mfa_code: &str,
        environment: Environment,
    ) -> Result<SessionDescriptor, AimsError>;
}
