//! Multi-step signup accumulator.
//!
//! Each wizard step merges its fields into one [`SignupData`] held in a
//! context signal. Nothing here is persisted; a reload starts the flow over.

#[cfg(test)]
#[path = "signup_test.rs"]
mod signup_test;

use leptos::prelude::*;
use serde::{Deserialize, Serialize};

use crate::net::types::{PendingRegistration, RegistrationRequest};

/// Fields collected across the signup steps. `None` means not yet entered.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupData {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub field_of_study: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub interests: Option<Vec<String>>,
    /// Set when the flow starts from a social login without an account.
    pub registration_token: Option<String>,
}

fn filled(value: Option<&String>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

impl SignupData {
    /// Shallow merge: every `Some` in `partial` overwrites the current value.
    pub fn merge(&mut self, partial: Self) {
        fn take<T>(slot: &mut Option<T>, incoming: Option<T>) {
            if incoming.is_some() {
                *slot = incoming;
            }
        }
        take(&mut self.full_name, partial.full_name);
        take(&mut self.email, partial.email);
        take(&mut self.password, partial.password);
        take(&mut self.field_of_study, partial.field_of_study);
        take(&mut self.country, partial.country);
        take(&mut self.phone, partial.phone);
        take(&mut self.role, partial.role);
        take(&mut self.bio, partial.bio);
        take(&mut self.interests, partial.interests);
        take(&mut self.registration_token, partial.registration_token);
    }

    /// Names of required fields that are absent or blank, in form order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("full_name", self.full_name.as_ref()),
            ("email", self.email.as_ref()),
            ("password", self.password.as_ref()),
            ("field_of_study", self.field_of_study.as_ref()),
            ("country", self.country.as_ref()),
        ]
        .into_iter()
        .filter(|(_, value)| !filled(*value))
        .map(|(name, _)| name)
        .collect()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Seed from a social identity that has no account yet.
    #[must_use]
    pub fn from_pending(pending: PendingRegistration) -> Self {
        Self {
            full_name: pending.name,
            email: pending.email,
            registration_token: pending.registration_token,
            ..Self::default()
        }
    }

    /// Registration payload, or the missing required fields.
    ///
    /// # Errors
    ///
    /// Returns the names from [`Self::missing_fields`] when incomplete.
    pub fn to_request(&self) -> Result<RegistrationRequest, Vec<&'static str>> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(missing);
        }
        let text = |v: &Option<String>| v.as_deref().map(str::trim).unwrap_or_default().to_owned();
        let optional = |v: &Option<String>| v.as_deref().map(str::trim).filter(|t| !t.is_empty()).map(str::to_owned);
        Ok(RegistrationRequest {
            full_name: text(&self.full_name),
            email: text(&self.email),
            password: self.password.clone().unwrap_or_default(),
            field_of_study: text(&self.field_of_study),
            country: text(&self.country),
            phone: optional(&self.phone),
            role: optional(&self.role),
            bio: optional(&self.bio),
            interests: self.interests.clone().unwrap_or_default(),
            registration_token: self.registration_token.clone(),
        })
    }
}

/// Install a fresh accumulator for the signup subtree.
pub fn provide_signup_context() -> RwSignal<SignupData> {
    let data = RwSignal::new(SignupData::default());
    provide_context(data);
    data
}

/// The accumulator installed by [`provide_signup_context`].
///
/// # Panics
///
/// Panics if called outside a signup subtree.
#[must_use]
pub fn use_signup() -> RwSignal<SignupData> {
    expect_context::<RwSignal<SignupData>>()
}
