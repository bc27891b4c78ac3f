#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use serde_json::{json, Value};

use aims_client::config::Environment;
use aims_client::error::AimsError;
use aims_client::models::SessionDescriptor;
use aims_client::request::RequestDescriptor;
use aims_client::transport::Transport;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .try_init();
}

/// Canned authentication behavior, consumed in order.
pub enum AuthBehavior {
    Session(Value),
    MfaRequired(String),
    Reject(String),
}

/// Scripted transport: queued responses, captured descriptors, no network.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Value>>,
    auth_behaviors: Mutex<VecDeque<AuthBehavior>>,
    captured: Mutex<Vec<RequestDescriptor>>,
    auth_calls: Mutex<Vec<AuthCall>>,
}

/// Record of one authenticate/verify call as seen by the transport.
#[derive(Debug, Clone)]
pub struct AuthCall {
    pub identifier: String,
    pub mfa_code: Option<String>,
    pub exchange_token: Option<String>,
    pub environment: Environment,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, body: Value) {
        self.responses.lock().unwrap().push_back(body);
    }

    pub fn push_session(&self, descriptor: Value) {
        self.auth_behaviors
            .lock()
            .unwrap()
            .push_back(AuthBehavior::Session(descriptor));
    }

    pub fn push_mfa_required(&self, exchange_token: &str) {
        self.auth_behaviors
            .lock()
            .unwrap()
            .push_back(AuthBehavior::MfaRequired(exchange_token.to_string()));
    }

    pub fn push_reject(&self, message: &str) {
        self.auth_behaviors
            .lock()
            .unwrap()
            .push_back(AuthBehavior::Reject(message.to_string()));
    }

    pub fn captured(&self) -> Vec<RequestDescriptor> {
        self.captured.lock().unwrap().clone()
    }

    pub fn last_descriptor(&self) -> RequestDescriptor {
        self.captured
            .lock()
            .unwrap()
            .last()
            .expect("no descriptor captured")
            .clone()
    }

    pub fn auth_calls(&self) -> Vec<AuthCall> {
        self.auth_calls.lock().unwrap().clone()
    }

    fn next_response(&self, descriptor: &RequestDescriptor) -> Result<Value, AimsError> {
        self.captured.lock().unwrap().push(descriptor.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AimsError::Network {
                operation: descriptor.operation,
                source: "no scripted response".into(),
            })
    }

    fn next_auth(&self, operation: &'static str) -> Result<SessionDescriptor, AimsError> {
        match self.auth_behaviors.lock().unwrap().pop_front() {
            Some(AuthBehavior::Session(body)) => Ok(serde_json::from_value(body)
                .expect("scripted session descriptor must deserialize")),
            Some(AuthBehavior::MfaRequired(token)) => Ok(SessionDescriptor {
                token: Secret::new(token),
                token_expiration: 0,
                user: None,
                account: None,
                mfa_pending: true,
            }),
            Some(AuthBehavior::Reject(message)) => Err(AimsError::Auth { operation, message }),
            None => Err(AimsError::Network {
                operation,
                source: "no scripted auth behavior".into(),
            }),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn fetch(&self, descriptor: &RequestDescriptor) -> Result<Value, AimsError> {
        self.next_response(descriptor)
    }

    async fn create(&self, descriptor: &RequestDescriptor) -> Result<Value, AimsError> {
        self.next_response(descriptor)
    }

    async fn update(&self, descriptor: &RequestDescriptor) -> Result<Value, AimsError> {
        self.next_response(descriptor)
    }

    async fn delete(&self, descriptor: &RequestDescriptor) -> Result<Value, AimsError> {
        self.next_response(descriptor)
    }

    async fn authenticate(
        &self,
        identifier: &str,
        _secret: &Secret<String>,
        mfa_code: Option<&str>,
        environment: Environment,
    ) -> Result<SessionDescriptor, AimsError> {
        self.auth_calls.lock().unwrap().push(AuthCall {
            identifier: identifier.to_string(),
            mfa_code: mfa_code.map(str::to_string),
            exchange_token: None,
            environment,
        });
        self.next_auth("authenticate")
    }

    async fn authenticate_with_exchange_token(
        &self,
        exchange_token: &Secret<String>,
        mfa_code: &str,
        environment: Environment,
    ) -> Result<SessionDescriptor, AimsError> {
        self.auth_calls.lock().unwrap().push(AuthCall {
            identifier: String::new(),
            mfa_code: Some(mfa_code.to_string()),
            exchange_token: Some(exchange_token.expose_secret().clone()),
            environment,
        });
        self.next_auth("verify_mfa")
    }
}

pub fn session_body(email: &str) -> Value {
    json!({
        "token": "tok-123",
        "token_expiration": 4102444800i64,
        "user": {
            "id": "u-1",
            "account_id": "1000",
            "name": "Bob Dobalina",
            "email": email,
        },
        "account": {
            "id": "1000",
            "name": "Example Co",
            "active": true,
            "mfa_required": false,
        },
        "mfa_pending": false,
    })
}

pub fn user_body(id: &str, email: &str) -> Value {
    json!({
        "id": id,
        "account_id": "1000",
        "name": "Bob Dobalina",
        "email": email,
    })
}
