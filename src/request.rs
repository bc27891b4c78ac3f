//! Request descriptors: the shape handed to the transport for every
//! operation, plus the builder that enforces local validation before
//! anything goes over the wire.

use serde::Serialize;
use serde_json::Value;

use crate::config::Environment;
use crate::error::AimsError;

/// Retry budget assigned to idempotent reads. Repeating a fetch has no side
/// effect, so the transport may re-issue it on transient failure.
pub const DEFAULT_READ_RETRIES: u32 = 5;

/// Cache TTL hint for the access-key listing, which is read-heavy and
/// changes slowly. Everything else is fetched fresh.
pub const ACCESS_KEY_LIST_TTL_MS: u64 = 60_000;

/// Logical operation kind, mapped by the transport onto
/// GET/POST/PUT/DELETE semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Fetch,
    Create,
    Update,
    Delete,
}

/// A fully shaped, transport-ready request.
///
/// Mutating descriptors default to a zero retry budget: re-issuing a
/// create/update/delete after a timeout risks duplicate side effects, so
/// that decision is left to the caller.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub service: &'static str,
    /// Logical operation name, carried into every failure for diagnostics.
    pub operation: &'static str,
    pub environment: Environment,
    pub method: Method,
    /// Account the path is rooted under; `None` for global operations.
    pub account_id: Option<String>,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub payload: Option<Value>,
    pub retry_budget: u32,
    pub cache_ttl_ms: Option<u64>,
}

impl RequestDescriptor {
    fn new(method: Method, operation: &'static str, environment: Environment) -> Self {
        let retry_budget = match method {
            Method::Fetch => DEFAULT_READ_RETRIES,
            _ => 0,
        };
        Self {
            service: "aims",
            operation,
            environment,
            method,
            account_id: None,
            path: String::new(),
            query: Vec::new(),
            payload: None,
            retry_budget,
            cache_ttl_ms: None,
        }
    }

    pub fn fetch(operation: &'static str, environment: Environment) -> Self {
        Self::new(Method::Fetch, operation, environment)
    }

    pub fn create(operation: &'static str, environment: Environment) -> Self {
        Self::new(Method::Create, operation, environment)
    }

    pub fn update(operation: &'static str, environment: Environment) -> Self {
        Self::new(Method::Update, operation, environment)
    }

    pub fn delete(operation: &'static str, environment: Environment) -> Self {
        Self::new(Method::Delete, operation, environment)
    }

    /// Root the path under a specific account.
    ///
    /// Global operations simply never call this; an account id that *is*
    /// supplied but empty is rejected here, before the transport sees it.
    pub fn scoped(mut self, account_id: &str) -> Result<Self, AimsError> {
        if account_id.trim().is_empty() {
            return Err(AimsError::validation(
                self.operation,
                "account id must not be empty",
            ));
        }
        self.account_id = Some(account_id.to_string());
        Ok(self)
    }

    /// Build the path from fixed and substituted segments. Substituted
    /// segments come from caller input, so every segment is checked for
    /// emptiness.
    pub fn path(mut self, segments: &[&str]) -> Result<Self, AimsError> {
        for segment in segments {
            if segment.trim().is_empty() {
                return Err(AimsError::validation(
                    self.operation,
                    "path segment must not be empty",
                ));
            }
        }
        self.path = format!("/{}", segments.join("/"));
        Ok(self)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn retries(mut self, budget: u32) -> Self {
        self.retry_budget = budget;
        self
    }

    pub fn cache_ttl_ms(mut self, ttl_ms: u64) -> Self {
        self.cache_ttl_ms = Some(ttl_ms);
        self
    }
}
