//! Build-time application configuration.
//!
//! The WASM bundle has no process environment at runtime, so values are baked
//! in with `option_env!` when the crate is compiled. [`AppConfig::from_lookup`]
//! takes any key lookup so the resolution rules are testable.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

/// Base URL used when `API_URL` is not set. Development only.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolved application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_url: String,
    pub app_name: String,
    pub app_version: String,
    pub request_timeout: Duration,
    /// `None` when any identity-provider setting is missing (social login off).
    pub identity: Option<IdentityProviderConfig>,
}

/// Hosted identity provider settings for social login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityProviderConfig {
    pub domain: String,
    pub client_id: String,
    pub audience: String,
}

impl IdentityProviderConfig {
    /// Build the provider's authorization URL.
    ///
    /// `redirect_uri` must already be URL-safe.
    #[must_use]
    pub fn authorize_url(&self, redirect_uri: &str, state: &str) -> String {
        let domain = self.domain.trim_start_matches("https://").trim_end_matches('/');
        format!(
            "https://{domain}/authorize?response_type=code&client_id={}&audience={}&redirect_uri={redirect_uri}&state={state}&scope=openid%20profile%20email",
            self.client_id, self.audience
        )
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            app_name: "Mentor Portal".to_owned(),
            app_version: env!("CARGO_PKG_VERSION").to_owned(),
            request_timeout: DEFAULT_TIMEOUT,
            identity: None,
        }
    }
}

impl AppConfig {
    /// Resolve from the variables present at compile time.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| {
            let value = match key {
                "API_URL" => option_env!("API_URL"),
                "APP_NAME" => option_env!("APP_NAME"),
                "APP_VERSION" => option_env!("APP_VERSION"),
                "API_TIMEOUT_MS" => option_env!("API_TIMEOUT_MS"),
                "AUTH_DOMAIN" => option_env!("AUTH_DOMAIN"),
                "AUTH_CLIENT_ID" => option_env!("AUTH_CLIENT_ID"),
                "AUTH_AUDIENCE" => option_env!("AUTH_AUDIENCE"),
                _ => None,
            };
            value.map(str::to_owned)
        })
    }

    /// Resolve using `lookup`; blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let api_url = get("API_URL").unwrap_or_else(|| {
            log::warn!("config: API_URL not set, using development default {DEFAULT_API_URL}");
            defaults.api_url.clone()
        });
        let request_timeout = match get("API_TIMEOUT_MS").map(|v| v.parse::<u64>()) {
            Some(Ok(ms)) if ms > 0 => Duration::from_millis(ms),
            Some(_) => {
                log::warn!("config: invalid API_TIMEOUT_MS, using {}ms", DEFAULT_TIMEOUT.as_millis());
                DEFAULT_TIMEOUT
            }
            None => DEFAULT_TIMEOUT,
        };
        let identity = match (get("AUTH_DOMAIN"), get("AUTH_CLIENT_ID"), get("AUTH_AUDIENCE")) {
            (Some(domain), Some(client_id), Some(audience)) => {
                Some(IdentityProviderConfig { domain, client_id, audience })
            }
            _ => None,
        };

        Self {
            api_url,
            app_name: get("APP_NAME").unwrap_or(defaults.app_name),
            app_version: get("APP_VERSION").unwrap_or(defaults.app_version),
            request_timeout,
            identity,
        }
    }
}
