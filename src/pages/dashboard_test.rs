use super::*;

#[test]
fn admin_roles_share_a_heading() {
    assert_eq!(dashboard_heading(Role::Admin), dashboard_heading(Role::SuperAdmin));
    assert_eq!(dashboard_heading(Role::Mentee), "Mentee dashboard");
    assert_eq!(dashboard_heading(Role::Mentor), "Mentor dashboard");
}

#[test]
fn theme_toggle_offers_the_other_theme() {
    assert_eq!(theme_toggle_label(Theme::Light), "Dark mode");
    assert_eq!(theme_toggle_label(Theme::Dark), "Light mode");
}
