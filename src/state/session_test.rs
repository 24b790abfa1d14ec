use futures::executor::block_on;

use super::*;
use crate::net::mock::{MockTransport, client_with};
use crate::net::transport::Method;

const CALLBACK: &str = "/auth/social/callback/";

fn service(transport: &MockTransport) -> SessionService {
    let (api, _) = client_with(transport);
    SessionService::new(api.store().clone(), api)
}

fn mentor() -> User {
    User {
        id: "7".to_owned(),
        name: "Mo".to_owned(),
        email: "mo@example.com".to_owned(),
        role: "mentor".to_owned(),
        avatar: None,
    }
}

// =============================================================
// Stored session
// =============================================================

#[test]
fn fresh_service_is_not_authenticated() {
    let session = service(&MockTransport::new());
    assert!(!session.is_authenticated());
    assert_eq!(session.user(), None);
    assert_eq!(session.snapshot(), SessionSnapshot::default());
}

#[test]
fn login_then_logout() {
    let session = service(&MockTransport::new());
    session.login("tok", &mentor());
    assert!(session.is_authenticated());
    assert_eq!(session.user(), Some(mentor()));
    assert!(session.snapshot().is_authenticated());

    session.logout();
    assert!(!session.is_authenticated());
    assert_eq!(session.user(), None);
}

#[test]
fn empty_token_is_not_authenticated() {
    let session = service(&MockTransport::new());
    session.login("", &mentor());
    assert!(!session.is_authenticated());
}

#[test]
fn validate_forces_logout_when_user_missing() {
    let (api, _) = client_with(&MockTransport::new());
    let store = api.store().clone();
    let session = SessionService::new(store.clone(), api);
    store.set(TOKEN_KEY, "tok");

    assert!(!session.validate());
    assert!(!session.is_authenticated());
}

#[test]
fn validate_forces_logout_when_user_unparseable() {
    let (api, _) = client_with(&MockTransport::new());
    let store = api.store().clone();
    let session = SessionService::new(store.clone(), api);
    store.set(TOKEN_KEY, "tok");
    store.set(USER_KEY, &serde_json::json!({"name": "no id"}));

    assert!(!session.validate());
    assert!(!store.contains(TOKEN_KEY));
}

#[test]
fn validate_keeps_complete_session() {
    let session = service(&MockTransport::new());
    session.login("tok", &mentor());
    assert!(session.validate());
    assert!(session.is_authenticated());
}

#[test]
fn return_path_is_taken_once_and_ignores_login() {
    let session = service(&MockTransport::new());
    session.remember_return_path("/login?x=1");
    assert_eq!(session.take_return_path(), None);

    session.remember_return_path("/mentor/sessions");
    assert_eq!(session.take_return_path().as_deref(), Some("/mentor/sessions"));
    assert_eq!(session.take_return_path(), None);
}

// =============================================================
// Social callback
// =============================================================

#[test]
fn callback_with_missing_params_fails_fast() {
    let transport = MockTransport::new();
    let session = service(&transport);
    assert_eq!(block_on(session.handle_social_callback("", "s")), Err(SessionError::MissingParameter("code")));
    assert_eq!(block_on(session.handle_social_callback("c", " ")), Err(SessionError::MissingParameter("state")));
    assert!(transport.requests().is_empty());
}

#[test]
fn callback_for_existing_account_logs_in() {
    let transport = MockTransport::new();
    transport.respond(
        Method::Post,
        CALLBACK,
        200,
        serde_json::json!({"token": "fresh", "user": {"id": 7, "name": "Mo", "email": "mo@example.com", "role": "mentor"}}),
    );
    let session = service(&transport);

    let outcome = block_on(session.handle_social_callback("c", "s")).unwrap();
    assert_eq!(outcome, CallbackOutcome::LoggedIn { user: mentor(), role: Some(Role::Mentor) });
    assert_eq!(session.token().as_deref(), Some("fresh"));
    assert_eq!(session.user(), Some(mentor()));
}

#[test]
fn callback_for_unknown_account_needs_registration() {
    let transport = MockTransport::new();
    transport.respond(
        Method::Post,
        CALLBACK,
        200,
        serde_json::json!({"needs_registration": true, "email": "new@example.com", "name": "New"}),
    );
    let session = service(&transport);

    let outcome = block_on(session.handle_social_callback("c", "s")).unwrap();
    match outcome {
        CallbackOutcome::NeedsRegistration(pending) => {
            assert_eq!(pending.email.as_deref(), Some("new@example.com"));
            assert_eq!(pending.name.as_deref(), Some("New"));
        }
        other => panic!("expected NeedsRegistration, got {other:?}"),
    }
    assert!(!session.is_authenticated());
}

#[test]
fn callback_server_error_is_a_structured_failure() {
    let transport = MockTransport::new();
    transport.respond(Method::Post, CALLBACK, 400, serde_json::json!({"detail": "Invalid state"}));
    let session = service(&transport);

    let outcome = block_on(session.handle_social_callback("c", "s")).unwrap();
    match outcome {
        CallbackOutcome::Failed(err) => assert_eq!(err.message, "Invalid state"),
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[test]
fn callback_token_without_user_is_a_failure() {
    let transport = MockTransport::new();
    transport.respond(Method::Post, CALLBACK, 200, serde_json::json!({"token": "t"}));
    let session = service(&transport);

    let outcome = block_on(session.handle_social_callback("c", "s")).unwrap();
    assert!(matches!(outcome, CallbackOutcome::Failed(_)));
    assert!(!session.is_authenticated());
}

#[test]
fn callback_rejection_does_not_clear_existing_session() {
    let transport = MockTransport::new();
    transport.respond(Method::Post, CALLBACK, 401, serde_json::json!({"detail": "bad code"}));
    let session = service(&transport);
    session.login("existing", &mentor());

    let outcome = block_on(session.handle_social_callback("c", "s")).unwrap();
    assert!(matches!(outcome, CallbackOutcome::Failed(ref e) if e.is_unauthorized()));
    assert!(session.is_authenticated());
}

// =============================================================
// Registration
// =============================================================

fn registration() -> RegistrationRequest {
    RegistrationRequest {
        full_name: "Mo".to_owned(),
        email: "mo@example.com".to_owned(),
        password: "pw".to_owned(),
        field_of_study: "Physics".to_owned(),
        country: "NG".to_owned(),
        ..RegistrationRequest::default()
    }
}

#[test]
fn register_stores_returned_session() {
    let transport = MockTransport::new();
    transport.respond(
        Method::Post,
        "/auth/register/",
        201,
        serde_json::json!({"token": "new", "user": {"id": "7", "name": "Mo", "email": "mo@example.com", "role": "mentor"}}),
    );
    let session = service(&transport);

    let user = block_on(session.register(&registration())).unwrap();
    assert_eq!(user, mentor());
    assert_eq!(session.token().as_deref(), Some("new"));
}

#[test]
fn register_validation_error_passes_message_through() {
    let transport = MockTransport::new();
    transport.respond(
        Method::Post,
        "/auth/register/",
        400,
        serde_json::json!({"email": ["A user with this email already exists."]}),
    );
    let session = service(&transport);

    let err = block_on(session.register(&registration())).unwrap_err();
    assert_eq!(err.message, "email: A user with this email already exists.");
    assert_eq!(err.status, Some(400));
    assert!(!session.is_authenticated());
}

#[test]
fn register_without_session_in_response_fails() {
    let transport = MockTransport::new();
    transport.respond(Method::Post, "/auth/register/", 201, serde_json::json!({"detail": "created"}));
    let session = service(&transport);
    assert!(block_on(session.register(&registration())).is_err());
    assert!(!session.is_authenticated());
}
