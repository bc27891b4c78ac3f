mod common;

use std::sync::Arc;

use secrecy::{ExposeSecret, Secret};

use aims_client::{AimsClient, AimsError, ClientConfig, Environment, LoginOutcome};
use common::MockTransport;

fn client_with(mock: &Arc<MockTransport>) -> AimsClient {
    let config = ClientConfig {
        environment: Environment::Integration,
        ..ClientConfig::default()
    };
    AimsClient::new(mock.clone(), config)
}

fn password() -> Secret<String> {
    Secret::new("hunter2".to_string())
}

#[tokio::test]
async fn valid_credentials_without_mfa_yield_a_session_directly() {
    common::init_tracing();
    let mock = Arc::new(MockTransport::new());
    mock.push_session(common::session_body("bob@example.com"));
    let client = client_with(&mock);

    let outcome = client
        .login()
        .submit_credentials("bob@example.com", &password(), None)
        .await
        .unwrap();

    let session = match outcome {
        LoginOutcome::Authenticated(session) => session,
        LoginOutcome::MfaPending(_) => panic!("expected a full session"),
    };
    assert_eq!(session.user.email, "bob@example.com");
    assert_eq!(session.account.id, "1000");
    assert!(!session.is_expired());

    let calls = mock.auth_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].environment, Environment::Integration);
    assert_eq!(calls[0].mfa_code, None);
}

#[tokio::test]
async fn mfa_required_account_yields_a_challenge_not_a_session() {
    let mock = Arc::new(MockTransport::new());
    mock.push_mfa_required("exchange-tok-1");
    mock.push_session(common::session_body("bob@example.com"));
    let client = client_with(&mock);

    let outcome = client
        .login()
        .submit_credentials("bob@example.com", &password(), None)
        .await
        .unwrap();

    let challenge = match outcome {
        LoginOutcome::MfaPending(challenge) => challenge,
        LoginOutcome::Authenticated(_) => panic!("expected an MFA challenge"),
    };

    let session = challenge.submit_code("123456").await.unwrap();
    assert_eq!(session.user.email, "bob@example.com");

    // The verification call presented the exchange token, nothing else.
    let calls = mock.auth_calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].exchange_token.as_deref(), Some("exchange-tok-1"));
    assert_eq!(calls[1].mfa_code.as_deref(), Some("123456"));
}

#[tokio::test]
async fn rejected_credentials_surface_as_auth_error() {
    let mock = Arc::new(MockTransport::new());
    mock.push_reject("invalid credentials");
    let client = client_with(&mock);

    let err = client
        .login()
        .submit_credentials("bob@example.com", &password(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AimsError::Auth { .. }));
    assert_eq!(err.operation(), "authenticate");
}

#[tokio::test]
async fn rejected_mfa_code_consumes_the_challenge() {
    let mock = Arc::new(MockTransport::new());
    mock.push_mfa_required("exchange-tok-2");
    mock.push_reject("invalid or expired code");
    let client = client_with(&mock);

    let outcome = client
        .login()
        .submit_credentials("bob@example.com", &password(), None)
        .await
        .unwrap();
    let challenge = match outcome {
        LoginOutcome::MfaPending(challenge) => challenge,
        LoginOutcome::Authenticated(_) => panic!("expected an MFA challenge"),
    };

    let err = challenge.submit_code("000000").await.unwrap_err();
    assert!(matches!(err, AimsError::Auth { .. }));
    // `submit_code` consumed the challenge; restarting means a fresh
    // LoginFlow, which the type system already enforces.
}

#[tokio::test]
async fn empty_email_is_rejected_locally() {
    let mock = Arc::new(MockTransport::new());
    let client = client_with(&mock);

    let err = client
        .login()
        .submit_credentials("  ", &password(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AimsError::Validation { .. }));
    assert!(mock.auth_calls().is_empty());
}

#[tokio::test]
async fn session_token_is_redacted_from_debug_output() {
    let mock = Arc::new(MockTransport::new());
    mock.push_session(common::session_body("bob@example.com"));
    let client = client_with(&mock);

    let outcome = client
        .login()
        .submit_credentials("bob@example.com", &password(), None)
        .await
        .unwrap();
    if let LoginOutcome::Authenticated(session) = outcome {
        let rendered = format!("{session:?}");
        assert!(!rendered.contains(session.token.expose_secret()));
    }
}
