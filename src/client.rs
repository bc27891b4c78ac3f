//! The AIMS client façade.
//!
//! Each method shapes a [`RequestDescriptor`] for one logical operation,
//! hands it to the transport, and reshapes the response into the declared
//! entity type. The client holds no state beyond its configuration: sessions
//! are owned by the caller, and the routing environment is fixed at
//! construction.

use std::sync::Arc;

use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use validator::ValidateEmail;

use crate::auth::LoginFlow;
use crate::config::{ClientConfig, Environment};
use crate::dtos::{
    self, AccessKeyLabelPayload, CreateRolePayload, CreateUserPayload, UpdateRoleNamePayload,
    UpdateRolePermissionsPayload,
};
use crate::envelope::unwrap_collection;
use crate::error::AimsError;
use crate::models::{AccessKey, Account, CreatedAccessKey, Role, TokenInfo, User};
use crate::request::{Method, RequestDescriptor, ACCESS_KEY_LIST_TTL_MS};
use crate::transport::{HttpTransport, Transport};

/// Optional filters for the managed-account listings.
#[derive(Debug, Default, Clone)]
pub struct ManagedAccountsFilter {
    pub active: Option<bool>,
    pub relationship: Option<String>,
}

pub struct AimsClient {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
}

impl AimsClient {
    pub fn new(transport: Arc<dyn Transport>, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    /// Build a client over the reference HTTP transport.
    pub fn from_config(config: ClientConfig) -> Self {
        let transport = Arc::new(HttpTransport::new(&config));
        Self::new(transport, config)
    }

    pub fn environment(&self) -> Environment {
        self.config.environment
    }

    /// Rebind the routing environment. Consumes the client, so an in-flight
    /// request can never observe a half-switched instance; callers needing
    /// both environments concurrently hold two clients.
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.config.environment = environment;
        self
    }

    /// Start a login attempt bound to this client's environment.
    pub fn login(&self) -> LoginFlow {
        LoginFlow::new(Arc::clone(&self.transport), self.environment())
    }

    // ---- accounts -------------------------------------------------------

    pub async fn get_account_details(&self, account_id: &str) -> Result<Account, AimsError> {
        let op = "get_account_details";
        let descriptor = RequestDescriptor::fetch(op, self.environment())
            .scoped(account_id)?
            .path(&["account"])?;
        decode(op, self.send(descriptor).await?)
    }

    pub async fn get_managed_accounts(
        &self,
        account_id: &str,
        filter: ManagedAccountsFilter,
    ) -> Result<Vec<Account>, AimsError> {
        let op = "get_managed_accounts";
        let descriptor = RequestDescriptor::fetch(op, self.environment())
            .scoped(account_id)?
            .path(&["accounts", "managed"])?;
        let descriptor = apply_managed_filter(descriptor, filter);
        unwrap_collection(op, "accounts", self.send(descriptor).await?)
    }

    pub async fn get_managed_account_ids(
        &self,
        account_id: &str,
        filter: ManagedAccountsFilter,
    ) -> Result<Vec<String>, AimsError> {
        let op = "get_managed_account_ids";
        let descriptor = RequestDescriptor::fetch(op, self.environment())
            .scoped(account_id)?
            .path(&["account_ids", "managed"])?;
        let descriptor = apply_managed_filter(descriptor, filter);
        unwrap_collection(op, "account_ids", self.send(descriptor).await?)
    }

    /// Toggle the account's MFA requirement. The only operation that writes
    /// this flag.
    pub async fn require_mfa(
        &self,
        account_id: &str,
        mfa_required: bool,
    ) -> Result<Account, AimsError> {
        let op = "require_mfa";
        let descriptor = RequestDescriptor::update(op, self.environment())
            .scoped(account_id)?
            .path(&["account"])?
            .payload(json!({ "mfa_required": mfa_required }));
        decode(op, self.send(descriptor).await?)
    }

    // ---- users ----------------------------------------------------------

    pub async fn create_user(
        &self,
        account_id: &str,
        payload: CreateUserPayload,
    ) -> Result<User, AimsError> {
        let op = "create_user";
        dtos::validated(op, &payload)?;
        let descriptor = RequestDescriptor::create(op, self.environment())
            .scoped(account_id)?
            .path(&["users"])?
            .payload(dtos::to_payload(op, &payload)?);
        decode(op, self.send(descriptor).await?)
    }

    pub async fn get_user_details(
        &self,
        account_id: &str,
        user_id: &str,
    ) -> Result<User, AimsError> {
        let op = "get_user_details";
        let descriptor = RequestDescriptor::fetch(op, self.environment())
            .scoped(account_id)?
            .path(&["users", user_id])?;
        decode(op, self.send(descriptor).await?)
    }

    pub async fn get_users(&self, account_id: &str) -> Result<Vec<User>, AimsError> {
        let op = "get_users";
        let descriptor = RequestDescriptor::fetch(op, self.environment())
            .scoped(account_id)?
            .path(&["users"])?;
        unwrap_collection(op, "users", self.send(descriptor).await?)
    }

    /// Fetch a user by id alone, without account scoping.
    pub async fn get_user_by_id(&self, user_id: &str) -> Result<User, AimsError> {
        let op = "get_user_by_id";
        let descriptor =
            RequestDescriptor::fetch(op, self.environment()).path(&["user", user_id])?;
        decode(op, self.send(descriptor).await?)
    }

    pub async fn delete_user(&self, account_id: &str, user_id: &str) -> Result<(), AimsError> {
        let op = "delete_user";
        let descriptor = RequestDescriptor::delete(op, self.environment())
            .scoped(account_id)?
            .path(&["users", user_id])?;
        self.send(descriptor).await.map(|_| ())
    }

    // ---- roles ----------------------------------------------------------

    pub async fn get_account_role(
        &self,
        account_id: &str,
        role_id: &str,
    ) -> Result<Role, AimsError> {
        let op = "get_account_role";
        let descriptor = RequestDescriptor::fetch(op, self.environment())
            .scoped(account_id)?
            .path(&["roles", role_id])?;
        decode(op, self.send(descriptor).await?)
    }

    /// Fetch a global role: visible to every account, so the path carries no
    /// account segment.
    pub async fn get_global_role(&self, role_id: &str) -> Result<Role, AimsError> {
        let op = "get_global_role";
        let descriptor =
            RequestDescriptor::fetch(op, self.environment()).path(&["roles", role_id])?;
        decode(op, self.send(descriptor).await?)
    }

    pub async fn get_account_roles(&self, account_id: &str) -> Result<Vec<Role>, AimsError> {
        let op = "get_account_roles";
        let descriptor = RequestDescriptor::fetch(op, self.environment())
            .scoped(account_id)?
            .path(&["roles"])?;
        unwrap_collection(op, "roles", self.send(descriptor).await?)
    }

    pub async fn get_global_roles(&self) -> Result<Vec<Role>, AimsError> {
        let op = "get_global_roles";
        let descriptor = RequestDescriptor::fetch(op, self.environment()).path(&["roles"])?;
        unwrap_collection(op, "roles", self.send(descriptor).await?)
    }

    pub async fn create_role(
        &self,
        account_id: &str,
        payload: CreateRolePayload,
    ) -> Result<Role, AimsError> {
        let op = "create_role";
        dtos::validated(op, &payload)?;
        let descriptor = RequestDescriptor::create(op, self.environment())
            .scoped(account_id)?
            .path(&["roles"])?
            .payload(dtos::to_payload(op, &payload)?);
        decode(op, self.send(descriptor).await?)
    }

    pub async fn update_role_name(
        &self,
        account_id: &str,
        role_id: &str,
        payload: UpdateRoleNamePayload,
    ) -> Result<Role, AimsError> {
        let op = "update_role_name";
        dtos::validated(op, &payload)?;
        let descriptor = RequestDescriptor::update(op, self.environment())
            .scoped(account_id)?
            .path(&["roles", role_id])?
            .payload(dtos::to_payload(op, &payload)?);
        decode(op, self.send(descriptor).await?)
    }

    pub async fn update_role_permissions(
        &self,
        account_id: &str,
        role_id: &str,
        payload: UpdateRolePermissionsPayload,
    ) -> Result<Role, AimsError> {
        let op = "update_role_permissions";
        let descriptor = RequestDescriptor::update(op, self.environment())
            .scoped(account_id)?
            .path(&["roles", role_id])?
            .payload(dtos::to_payload(op, &payload)?);
        decode(op, self.send(descriptor).await?)
    }

    pub async fn delete_role(&self, account_id: &str, role_id: &str) -> Result<(), AimsError> {
        let op = "delete_role";
        let descriptor = RequestDescriptor::delete(op, self.environment())
            .scoped(account_id)?
            .path(&["roles", role_id])?;
        self.send(descriptor).await.map(|_| ())
    }

    // ---- access keys ----------------------------------------------------

    /// Create an access key. The response is the only place the secret ever
    /// appears; it deserializes into [`CreatedAccessKey`] and is never
    /// cached (only fetch descriptors carry a TTL).
    pub async fn create_access_key(
        &self,
        account_id: &str,
        user_id: &str,
        label: impl Into<String>,
    ) -> Result<CreatedAccessKey, AimsError> {
        let op = "create_access_key";
        let payload = AccessKeyLabelPayload { label: label.into() };
        dtos::validated(op, &payload)?;
        let descriptor = RequestDescriptor::create(op, self.environment())
            .scoped(account_id)?
            .path(&["users", user_id, "access_keys"])?
            .payload(dtos::to_payload(op, &payload)?);
        decode(op, self.send(descriptor).await?)
    }

    /// List a user's access keys. Read-heavy and slow to change, so the
    /// descriptor carries a cache TTL (60s unless overridden).
    pub async fn get_access_keys(
        &self,
        account_id: &str,
        user_id: &str,
        ttl_ms: Option<u64>,
    ) -> Result<Vec<AccessKey>, AimsError> {
        let op = "get_access_keys";
        let descriptor = RequestDescriptor::fetch(op, self.environment())
            .scoped(account_id)?
            .path(&["users", user_id, "access_keys"])?
            .query("out", "full")
            .cache_ttl_ms(ttl_ms.unwrap_or(ACCESS_KEY_LIST_TTL_MS));
        unwrap_collection(op, "access_keys", self.send(descriptor).await?)
    }

    pub async fn get_access_key_by_id(
        &self,
        access_key_id: &str,
    ) -> Result<AccessKey, AimsError> {
        let op = "get_access_key_by_id";
        let descriptor = RequestDescriptor::fetch(op, self.environment())
            .path(&["access_keys", access_key_id])?;
        decode(op, self.send(descriptor).await?)
    }

    pub async fn update_access_key(
        &self,
        access_key_id: &str,
        label: impl Into<String>,
    ) -> Result<AccessKey, AimsError> {
        let op = "update_access_key";
        let payload = AccessKeyLabelPayload { label: label.into() };
        dtos::validated(op, &payload)?;
        let descriptor = RequestDescriptor::update(op, self.environment())
            .path(&["access_keys", access_key_id])?
            .payload(dtos::to_payload(op, &payload)?);
        decode(op, self.send(descriptor).await?)
    }

    pub async fn delete_access_key(
        &self,
        account_id: &str,
        user_id: &str,
        access_key_id: &str,
    ) -> Result<(), AimsError> {
        let op = "delete_access_key";
        let descriptor = RequestDescriptor::delete(op, self.environment())
            .scoped(account_id)?
            .path(&["users", user_id, "access_keys", access_key_id])?;
        self.send(descriptor).await.map(|_| ())
    }

    // ---- tokens ---------------------------------------------------------

    /// Decode the claims of a presented token. Global: no account segment.
    pub async fn get_token_info(&self, token: &str) -> Result<TokenInfo, AimsError> {
        let op = "get_token_info";
        let encoded = urlencoding::encode(token);
        let descriptor =
            RequestDescriptor::fetch(op, self.environment()).path(&["token_info", encoded.as_ref()])?;
        decode(op, self.send(descriptor).await?)
    }

    // ---- password & MFA side flows -------------------------------------

    /// Change a password with the current one in hand. Independent of the
    /// login flow: requires no session and produces none.
    pub async fn change_password(
        &self,
        email: &str,
        current_password: &Secret<String>,
        new_password: &Secret<String>,
    ) -> Result<(), AimsError> {
        let op = "change_password";
        require_email(op, email)?;
        if new_password.expose_secret().is_empty() {
            return Err(AimsError::validation(op, "new password must not be empty"));
        }
        let descriptor = RequestDescriptor::create(op, self.environment())
            .path(&["change_password"])?
            .payload(json!({
                "email": email,
                "current_password": current_password.expose_secret(),
                "new_password": new_password.expose_secret(),
            }));
        self.send(descriptor).await.map(|_| ())
    }

    /// Start a password reset; the service emails a reset token, and the
    /// user lands on `return_to` afterwards.
    pub async fn initiate_reset(&self, email: &str, return_to: &str) -> Result<(), AimsError> {
        let op = "initiate_reset";
        require_email(op, email)?;
        let descriptor = RequestDescriptor::create(op, self.environment())
            .path(&["reset_password"])?
            .payload(json!({ "email": email, "return_to": return_to }));
        self.send(descriptor).await.map(|_| ())
    }

    pub async fn complete_reset(
        &self,
        reset_token: &str,
        new_password: &Secret<String>,
    ) -> Result<(), AimsError> {
        let op = "complete_reset";
        if new_password.expose_secret().is_empty() {
            return Err(AimsError::validation(op, "new password must not be empty"));
        }
        let encoded = urlencoding::encode(reset_token);
        let descriptor = RequestDescriptor::update(op, self.environment())
            .path(&["reset_password", encoded.as_ref()])?
            .payload(json!({ "password": new_password.expose_secret() }));
        self.send(descriptor).await.map(|_| ())
    }

    /// Enroll an MFA device for the authenticated user. Mutates the MFA
    /// requirement out of band; not a login-flow transition.
    pub async fn enroll_mfa(&self, mfa_code: &str) -> Result<(), AimsError> {
        let op = "enroll_mfa";
        if mfa_code.trim().is_empty() {
            return Err(AimsError::validation(op, "MFA code must not be empty"));
        }
        let descriptor = RequestDescriptor::create(op, self.environment())
            .path(&["user", "mfa"])?
            .payload(json!({ "mfa_code": mfa_code }));
        self.send(descriptor).await.map(|_| ())
    }

    /// Remove a user's MFA device, addressed by email (the stable external
    /// identifier, independent of numeric id).
    pub async fn remove_mfa(&self, email: &str) -> Result<(), AimsError> {
        let op = "remove_mfa";
        require_email(op, email)?;
        let encoded = urlencoding::encode(email);
        let descriptor = RequestDescriptor::delete(op, self.environment())
            .path(&["user", "mfa", encoded.as_ref()])?;
        self.send(descriptor).await.map(|_| ())
    }

    // ---- dispatch -------------------------------------------------------

    async fn send(&self, descriptor: RequestDescriptor) -> Result<Value, AimsError> {
        tracing::debug!(
            operation = descriptor.operation,
            environment = descriptor.environment.as_str(),
            method = ?descriptor.method,
            path = %descriptor.path,
            account_id = descriptor.account_id.as_deref(),
            "dispatching aims request"
        );
        let result = match descriptor.method {
            Method::Fetch => self.transport.fetch(&descriptor).await,
            Method::Create => self.transport.create(&descriptor).await,
            Method::Update => self.transport.update(&descriptor).await,
            Method::Delete => self.transport.delete(&descriptor).await,
        };
        if let Err(err) = &result {
            tracing::error!(operation = descriptor.operation, error = %err, "aims request failed");
        }
        result
    }
}

fn apply_managed_filter(
    mut descriptor: RequestDescriptor,
    filter: ManagedAccountsFilter,
) -> RequestDescriptor {
    if let Some(active) = filter.active {
        descriptor = descriptor.query("active", active);
    }
    if let Some(relationship) = filter.relationship {
        descriptor = descriptor.query("relationship", relationship);
    }
    descriptor
}

fn require_email(operation: &'static str, email: &str) -> Result<(), AimsError> {
    if !email.validate_email() {
        return Err(AimsError::validation(operation, "invalid email format"));
    }
    Ok(())
}

fn decode<T: DeserializeOwned>(operation: &'static str, body: Value) -> Result<T, AimsError> {
    serde_json::from_value(body)
        .map_err(|e| AimsError::contract(operation, format!("unexpected response shape: {e}")))
}
