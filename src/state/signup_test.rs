use super::*;

fn step_one() -> SignupData {
    SignupData {
        full_name: Some("Grace Hopper".to_owned()),
        email: Some("grace@example.com".to_owned()),
        password: Some("cobol-1959".to_owned()),
        ..SignupData::default()
    }
}

fn step_two() -> SignupData {
    SignupData {
        field_of_study: Some("Mathematics".to_owned()),
        country: Some("US".to_owned()),
        interests: Some(vec!["compilers".to_owned()]),
        ..SignupData::default()
    }
}

#[test]
fn empty_data_is_missing_everything() {
    let data = SignupData::default();
    assert!(!data.is_complete());
    assert_eq!(data.missing_fields(), vec!["full_name", "email", "password", "field_of_study", "country"]);
}

#[test]
fn partial_merges_accumulate_to_complete() {
    let mut data = SignupData::default();
    data.merge(step_one());
    assert!(!data.is_complete());
    assert_eq!(data.missing_fields(), vec!["field_of_study", "country"]);

    data.merge(step_two());
    assert!(data.is_complete());
    assert_eq!(data.full_name.as_deref(), Some("Grace Hopper"));
    assert_eq!(data.interests, Some(vec!["compilers".to_owned()]));
}

#[test]
fn merge_order_does_not_matter_for_disjoint_steps() {
    let mut forward = SignupData::default();
    forward.merge(step_one());
    forward.merge(step_two());

    let mut backward = SignupData::default();
    backward.merge(step_two());
    backward.merge(step_one());

    assert_eq!(forward, backward);
}

#[test]
fn merge_overwrites_only_provided_fields() {
    let mut data = step_one();
    data.merge(SignupData { email: Some("g@navy.mil".to_owned()), ..SignupData::default() });
    assert_eq!(data.email.as_deref(), Some("g@navy.mil"));
    assert_eq!(data.full_name.as_deref(), Some("Grace Hopper"));
}

#[test]
fn blank_values_count_as_missing() {
    let mut data = step_one();
    data.merge(step_two());
    data.merge(SignupData { country: Some("   ".to_owned()), ..SignupData::default() });
    assert!(!data.is_complete());
    assert_eq!(data.missing_fields(), vec!["country"]);
}

#[test]
fn reset_clears_all_fields() {
    let mut data = step_one();
    data.merge(step_two());
    data.reset();
    assert_eq!(data, SignupData::default());
}

#[test]
fn to_request_lists_missing_fields() {
    assert_eq!(step_one().to_request(), Err(vec!["field_of_study", "country"]));
}

#[test]
fn to_request_trims_text_but_not_password() {
    let mut data = step_one();
    data.merge(step_two());
    data.merge(SignupData {
        full_name: Some("  Grace Hopper ".to_owned()),
        password: Some(" spaced ".to_owned()),
        bio: Some("   ".to_owned()),
        ..SignupData::default()
    });
    let request = data.to_request().unwrap();
    assert_eq!(request.full_name, "Grace Hopper");
    assert_eq!(request.password, " spaced ");
    assert_eq!(request.bio, None);
    assert_eq!(request.interests, vec!["compilers".to_owned()]);
}

#[test]
fn from_pending_prefills_identity() {
    let data = SignupData::from_pending(PendingRegistration {
        email: Some("new@example.com".to_owned()),
        name: Some("New Person".to_owned()),
        registration_token: Some("reg-1".to_owned()),
    });
    assert_eq!(data.email.as_deref(), Some("new@example.com"));
    assert_eq!(data.full_name.as_deref(), Some("New Person"));
    assert_eq!(data.to_request().unwrap_err(), vec!["password", "field_of_study", "country"]);
}
