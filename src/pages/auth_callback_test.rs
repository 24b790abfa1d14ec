use super::*;
use crate::net::client::ApiError;

fn mentee() -> User {
    User {
        id: "5".to_owned(),
        name: "Mina".to_owned(),
        email: "mina@example.com".to_owned(),
        role: "mentee".to_owned(),
        avatar: None,
    }
}

#[test]
fn logged_in_outcome_signs_in() {
    let step = resolve_outcome(Ok(CallbackOutcome::LoggedIn { user: mentee(), role: Some(Role::Mentee) }));
    assert_eq!(step, CallbackStep::SignedIn { user: mentee(), role: Some(Role::Mentee) });
}

#[test]
fn unknown_account_goes_to_registration() {
    let pending = PendingRegistration { email: Some("x@example.com".to_owned()), ..PendingRegistration::default() };
    let step = resolve_outcome(Ok(CallbackOutcome::NeedsRegistration(pending.clone())));
    assert_eq!(step, CallbackStep::Register(pending));
}

#[test]
fn failures_carry_a_message() {
    let step = resolve_outcome(Ok(CallbackOutcome::Failed(ApiError::new("code expired"))));
    assert_eq!(step, CallbackStep::Failed("code expired".to_owned()));

    let step = resolve_outcome(Err(SessionError::MissingParameter("code")));
    assert!(matches!(step, CallbackStep::Failed(ref m) if m.contains("incomplete")));
}

#[test]
fn provider_error_prefers_description() {
    assert_eq!(
        provider_error(Some("User cancelled".to_owned()), Some("access_denied".to_owned())),
        Some("User cancelled".to_owned())
    );
    assert_eq!(provider_error(Some(" ".to_owned()), Some("access_denied".to_owned())), Some("access_denied".to_owned()));
    assert_eq!(provider_error(None, None), None);
    assert_eq!(provider_error(None, Some(String::new())), None);
}
