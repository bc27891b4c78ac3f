//! Typed async client for the AIMS identity and access management service.
//!
//! The crate turns logical operations (create a user, list managed accounts,
//! authenticate) into well-formed, scoped request descriptors with retry and
//! cache hints, hands them to a pluggable [`transport::Transport`], and
//! reshapes responses into the entity types under [`models`]. Login is
//! modeled as a consuming state machine in [`auth`], so an MFA verification
//! without a live exchange token cannot be expressed.
//!
//! ```no_run
//! use aims_client::{AimsClient, ClientConfig, LoginOutcome};
//! use secrecy::Secret;
//!
//! # async fn demo() -> Result<(), aims_client::AimsError> {
//! let client = AimsClient::from_config(ClientConfig::default());
//! let password = Secret::new("hunter2".to_string());
//! match client.login().submit_credentials("bob@example.com", &password, None).await? {
//!     LoginOutcome::Authenticated(session) => {
//!         let accounts = client
//!             .get_managed_accounts(&session.account.id, Default::default())
//!             .await?;
//!         println!("{} managed accounts", accounts.len());
//!     }
//!     LoginOutcome::MfaPending(challenge) => {
//!         let session = challenge.submit_code("123456").await?;
//!         println!("authenticated as {}", session.user.email);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod dtos;
pub mod error;
pub mod models;
pub mod request;
pub mod transport;

mod envelope;

pub use auth::{LoginFlow, LoginOutcome, MfaChallenge};
pub use client::{AimsClient, ManagedAccountsFilter};
pub use config::{ClientConfig, Environment};
pub use error::AimsError;
pub use request::{Method, RequestDescriptor};
