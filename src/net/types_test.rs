use super::*;

fn user_with_role(role: &str) -> User {
    User {
        id: "u-1".to_owned(),
        name: "Ada".to_owned(),
        email: "ada@example.com".to_owned(),
        role: role.to_owned(),
        avatar: None,
    }
}

// =============================================================
// Role
// =============================================================

#[test]
fn role_serializes_to_snake_case() {
    assert_eq!(serde_json::to_string(&Role::SuperAdmin).unwrap(), "\"super_admin\"");
    assert_eq!(serde_json::to_string(&Role::Mentee).unwrap(), "\"mentee\"");
}

#[test]
fn role_parses_wire_names_case_insensitively() {
    assert_eq!("mentor".parse::<Role>(), Ok(Role::Mentor));
    assert_eq!("MENTEE".parse::<Role>(), Ok(Role::Mentee));
    assert_eq!("super-admin".parse::<Role>(), Ok(Role::SuperAdmin));
    assert_eq!("owner".parse::<Role>(), Err(UnknownRole("owner".to_owned())));
}

#[test]
fn role_landing_paths() {
    assert_eq!(Role::Mentee.landing_path(), "/mentee/dashboard");
    assert_eq!(Role::Mentor.landing_path(), "/mentor/dashboard");
    assert_eq!(Role::Admin.landing_path(), "/admin/dashboard");
    assert_eq!(Role::SuperAdmin.landing_path(), "/admin/dashboard");
}

// =============================================================
// User
// =============================================================

#[test]
fn role_claim_distinguishes_missing_known_and_unrecognized() {
    assert_eq!(user_with_role("").role_claim(), RoleClaim::Missing);
    assert_eq!(user_with_role("  ").role_claim(), RoleClaim::Missing);
    assert_eq!(user_with_role("mentor").role_claim(), RoleClaim::Known(Role::Mentor));
    assert_eq!(user_with_role("owner").role_claim(), RoleClaim::Unrecognized("owner".to_owned()));
    assert_eq!(user_with_role("owner").role(), None);
}

#[test]
fn user_accepts_numeric_id_and_backend_aliases() {
    let user: User = serde_json::from_value(serde_json::json!({
        "id": 17,
        "full_name": "Grace",
        "email": "g@example.com",
        "role": "mentee",
        "avatar_url": "https://example.com/g.png"
    }))
    .unwrap();
    assert_eq!(user.id, "17");
    assert_eq!(user.name, "Grace");
    assert_eq!(user.avatar.as_deref(), Some("https://example.com/g.png"));
    assert_eq!(user.role(), Some(Role::Mentee));
}

#[test]
fn user_without_id_is_rejected() {
    let parsed = serde_json::from_value::<User>(serde_json::json!({"name": "x"}));
    assert!(parsed.is_err());
}

// =============================================================
// Notification bodies
// =============================================================

#[test]
fn notification_reads_type_and_created_at_aliases() {
    let n: Notification = serde_json::from_value(serde_json::json!({
        "id": 3,
        "is_read": false,
        "notification_type": "session_booked",
        "created_at": "2026-01-01T00:00:00Z",
        "data": {"session_id": 9}
    }))
    .unwrap();
    assert_eq!(n.id, "3");
    assert_eq!(n.kind, "session_booked");
    assert_eq!(n.timestamp, "2026-01-01T00:00:00Z");
    assert_eq!(n.payload["session_id"], 9);
}

#[test]
fn notification_list_accepts_bare_and_paginated() {
    let item = serde_json::json!({"id": "a", "is_read": true, "type": "x", "timestamp": "t"});
    let bare: NotificationListBody = serde_json::from_value(serde_json::json!([item.clone()])).unwrap();
    let paged: NotificationListBody =
        serde_json::from_value(serde_json::json!({"count": 1, "results": [item]})).unwrap();
    assert_eq!(bare.into_items().len(), 1);
    assert_eq!(paged.into_items()[0].id, "a");
}

#[test]
fn unread_count_accepts_all_shapes() {
    for body in [serde_json::json!(7), serde_json::json!({"count": 7}), serde_json::json!({"unread_count": 7})] {
        let parsed: UnreadCountBody = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.count(), 7);
    }
}

#[test]
fn social_callback_body_reads_registration_fields() {
    let body: SocialCallbackBody = serde_json::from_value(serde_json::json!({
        "needs_registration": true,
        "email": "new@example.com",
        "registration_token": "rt-1"
    }))
    .unwrap();
    assert!(body.needs_registration);
    assert!(body.token.is_none());
    let pending = body.pending_registration();
    assert_eq!(pending.email.as_deref(), Some("new@example.com"));
    assert_eq!(pending.registration_token.as_deref(), Some("rt-1"));
    assert_eq!(pending.name, None);
}

#[test]
fn social_callback_body_accepts_access_alias() {
    let body: SocialCallbackBody = serde_json::from_value(serde_json::json!({
        "access": "tok",
        "user": {"id": 1, "name": "A", "email": "a@b.com", "role": "mentor"}
    }))
    .unwrap();
    assert_eq!(body.token.as_deref(), Some("tok"));
    assert_eq!(body.user.unwrap().role(), Some(Role::Mentor));
}
