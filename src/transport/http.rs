//! Reference `Transport` backed by reqwest.
//!
//! Honors the descriptor's retry budget for reads, keeps a small in-process
//! TTL cache for descriptors that carry a cache hint, and maps HTTP statuses
//! onto the crate's error taxonomy. Only fetch responses are ever cached, so
//! one-time-reveal creation responses (access-key secrets) cannot leak into
//! later reads.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;

use crate::config::{ClientConfig, Environment};
use crate::error::AimsError;
use crate::models::SessionDescriptor;
use crate::request::RequestDescriptor;
use crate::transport::Transport;

const AUTH_TOKEN_HEADER: &str = "x-aims-auth-token";
const SESSION_TOKEN_HEADER: &str = "x-aims-session-token";

struct CachedResponse {
    expires_at: Instant,
    body: Value,
}

pub struct HttpTransport {
    http: reqwest::Client,
    production_url: String,
    integration_url: String,
    session_token: Option<Secret<String>>,
    cache: DashMap<String, CachedResponse>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            production_url: config.production_url.clone(),
            integration_url: config.integration_url.clone(),
            session_token: None,
            cache: DashMap::new(),
        }
    }

    /// Attach a session token presented on every subsequent request. The
    /// client does not retain sessions itself; the caller owns the session
    /// and binds it here.
    pub fn with_session_token(mut self, token: Secret<String>) -> Self {
        self.session_token = Some(token);
        self
    }

    fn base_url(&self, environment: Environment) -> &str {
        match environment {
            Environment::Production => &self.production_url,
            Environment::Integration => &self.integration_url,
        }
    }

    fn url_for(&self, descriptor: &RequestDescriptor) -> String {
        let base = self.base_url(descriptor.environment);
        match &descriptor.account_id {
            Some(account_id) => format!(
                "{base}/{}/v1/{account_id}{}",
                descriptor.service, descriptor.path
            ),
            None => format!("{base}/{}/v1{}", descriptor.service, descriptor.path),
        }
    }

    async fn send(
        &self,
        method: reqwest::Method,
        descriptor: &RequestDescriptor,
        url: &str,
    ) -> Result<Value, AimsError> {
        let operation = descriptor.operation;
        let mut request = self.http.request(method, url);
        if !descriptor.query.is_empty() {
            request = request.query(&descriptor.query);
        }
        if let Some(payload) = &descriptor.payload {
            request = request.json(payload);
        }
        if let Some(token) = &self.session_token {
            request = request.header(AUTH_TOKEN_HEADER, token.expose_secret());
        }

        let response = request.send().await.map_err(|e| AimsError::Network {
            operation,
            source: Box::new(e),
        })?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        let text = response.text().await.map_err(|e| AimsError::Network {
            operation,
            source: Box::new(e),
        })?;

        if !status.is_success() {
            return Err(Self::status_error(operation, status, url, retry_after, &text));
        }

        if text.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| AimsError::contract(operation, format!("unparsable response body: {e}")))
    }

    fn status_error(
        operation: &'static str,
        status: reqwest::StatusCode,
        url: &str,
        retry_after: Option<u64>,
        body: &str,
    ) -> AimsError {
        match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                AimsError::auth(operation, format!("{status}: {body}"))
            }
            reqwest::StatusCode::NOT_FOUND => AimsError::NotFound {
                operation,
                path: url.to_string(),
            },
            reqwest::StatusCode::TOO_MANY_REQUESTS => AimsError::RateLimit {
                operation,
                retry_after,
            },
            _ => AimsError::Network {
                operation,
                source: format!("{status}: {body}").into(),
            },
        }
    }

    fn cache_key(&self, descriptor: &RequestDescriptor, url: &str) -> String {
        format!("{url}?{:?}", descriptor.query)
    }

    fn parse_session(operation: &'static str, mut body: Value) -> Result<SessionDescriptor, AimsError> {
        let authentication = body
            .get_mut("authentication")
            .map(Value::take)
            .ok_or_else(|| AimsError::contract(operation, "missing `authentication` object"))?;
        serde_json::from_value(authentication)
            .map_err(|e| AimsError::contract(operation, format!("bad `authentication` object: {e}")))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, descriptor: &RequestDescriptor) -> Result<Value, AimsError> {
        let url = self.url_for(descriptor);
        let cache_key = self.cache_key(descriptor, &url);

        if descriptor.cache_ttl_ms.is_some() {
            if let Some(hit) = self.cache.get(&cache_key) {
                if hit.expires_at > Instant::now() {
                    tracing::debug!(operation = descriptor.operation, "serving cached response");
                    return Ok(hit.body.clone());
                }
            }
        }

        let mut attempt: u32 = 0;
        loop {
            match self.send(reqwest::Method::GET, descriptor, &url).await {
                Ok(body) => {
                    if let Some(ttl_ms) = descriptor.cache_ttl_ms {
                        self.cache.insert(
                            cache_key,
                            CachedResponse {
                                expires_at: Instant::now() + Duration::from_millis(ttl_ms),
                                body: body.clone(),
                            },
                        );
                    }
                    return Ok(body);
                }
                Err(err) if matches!(err, AimsError::Network { .. })
                    && attempt < descriptor.retry_budget =>
                {
                    attempt += 1;
                    tracing::warn!(
                        operation = descriptor.operation,
                        attempt,
                        error = %err,
                        "read failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(200 * u64::from(attempt))).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn create(&self, descriptor: &RequestDescriptor) -> Result<Value, AimsError> {
        let url = self.url_for(descriptor);
        self.send(reqwest::Method::POST, descriptor, &url).await
    }

    async fn update(&self, descriptor: &RequestDescriptor) -> Result<Value, AimsError> {
        let url = self.url_for(descriptor);
        self.send(reqwest::Method::PUT, descriptor, &url).await
    }

    async fn delete(&self, descriptor: &RequestDescriptor) -> Result<Value, AimsError> {
        let url = self.url_for(descriptor);
        self.send(reqwest::Method::DELETE, descriptor, &url).await
    }

    async fn authenticate(
        &self,
        identifier: &str,
        secret: &Secret<String>,
        mfa_code: Option<&str>,
        environment: Environment,
    ) -> Result<SessionDescriptor, AimsError> {
        let operation = "authenticate";
        let url = format!("{}/aims/v1/authenticate", self.base_url(environment));

        let mut request = self
            .http
            .post(&url)
            .basic_auth(identifier, Some(secret.expose_secret()));
        if let Some(code) = mfa_code {
            request = request.json(&serde_json::json!({ "mfa_code": code }));
        }

        let response = request.send().await.map_err(|e| AimsError::Network {
            operation,
            source: Box::new(e),
        })?;
        let status = response.status();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        let text = response.text().await.map_err(|e| AimsError::Network {
            operation,
            source: Box::new(e),
        })?;

        if status.is_success() {
            let body: Value = serde_json::from_str(&text).map_err(|e| {
                AimsError::contract(operation, format!("unparsable response body: {e}"))
            })?;
            return Self::parse_session(operation, body);
        }

        // Valid credentials against an MFA-required account come back as a
        // 401 carrying the exchange token for the verification step.
        if status == reqwest::StatusCode::UNAUTHORIZED {
            if let Some(exchange_token) = serde_json::from_str::<Value>(&text)
                .ok()
                .as_ref()
                .and_then(|body| body.get("mfa_token"))
                .and_then(Value::as_str)
            {
                return Ok(SessionDescriptor {
                    token: Secret::new(exchange_token.to_string()),
                    token_expiration: 0,
                    user: None,
                    account: None,
                    mfa_pending: true,
                });
            }
        }

        Err(Self::status_error(operation, status, &url, retry_after, &text))
    }

    async fn authenticate_with_exchange_token(
        &self,
        exchange_token: &Secret<String>,
        mfa_code: &str,
        environment: Environment,
    ) -> Result<SessionDescriptor, AimsError> {
        let operation = "verify_mfa";
        let url = format!("{}/aims/v1/authenticate", self.base_url(environment));

        let response = self
            .http
            .post(&url)
            .header(SESSION_TOKEN_HEADER, exchange_token.expose_secret())
            .json(&serde_json::json!({ "mfa_code": mfa_code }))
            .send()
            .await
            .map_err(|e| AimsError::Network {
                operation,
                source: Box::new(e),
            })?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        let text = response.text().await.map_err(|e| AimsError::Network {
            operation,
            source: Box::new(e),
        })?;

        if !status.is_success() {
            return Err(Self::status_error(operation, status, &url, retry_after, &text));
        }

        let body: Value = serde_json::from_str(&text)
            .map_err(|e| AimsError::contract(operation, format!("unparsable response body: {e}")))?;
        Self::parse_session(operation, body)
    }
}
