//! Delivery channel selection.
//!
//! The channel is picked per request from the environment, first match wins:
//!
//! | Variable | Channel |
//! |----------|---------|
//! | `RESEND_API_KEY` | Email API (bearer-authenticated `POST`) |
//! | `FORMSPREE_ENDPOINT` | Form relay (`POST` of the submission as JSON) |
//! | neither | Log only |
//!
//! `CONTACT_EMAIL` overrides the email API recipient. Empty values count as unset.

pub const EMAIL_API_KEY_VAR: &str = "RESEND_API_KEY";
pub const FORM_RELAY_URL_VAR: &str = "FORMSPREE_ENDPOINT";
pub const RECIPIENT_VAR: &str = "CONTACT_EMAIL";

/// Delivery-related environment, captured at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayEnv {
    pub email_api_key: Option<String>,
    pub form_relay_url: Option<String>,
    pub recipient: Option<String>,
}

impl RelayEnv {
    pub fn from_process() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            email_api_key: get(EMAIL_API_KEY_VAR),
            form_relay_url: get(FORM_RELAY_URL_VAR),
            recipient: get(RECIPIENT_VAR),
        }
    }
}

/// Where [`RelayEnv`] comes from on each request.
#[derive(Debug, Clone, Default)]
pub enum EnvSource {
    /// Re-read the process environment every time.
    #[default]
    Process,
    /// A fixed snapshot.
    Fixed(RelayEnv),
}

impl EnvSource {
    pub fn current(&self) -> RelayEnv {
        match self {
            EnvSource::Process => RelayEnv::from_process(),
            EnvSource::Fixed(env) => env.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Channel {
    EmailApi { api_key: String },
    FormRelay { url: String },
    LogOnly,
}

impl Channel {
    pub fn select(env: &RelayEnv) -> Channel {
        if let Some(api_key) = &env.email_api_key {
            Channel::EmailApi {
                api_key: api_key.clone(),
            }
        } else if let Some(url) = &env.form_relay_url {
            Channel::FormRelay { url: url.clone() }
        } else {
            Channel::LogOnly
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Channel::EmailApi { .. } => "email-api",
            Channel::FormRelay { .. } => "form-relay",
            Channel::LogOnly => "log",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> RelayEnv {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RelayEnv::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn email_api_wins_when_both_configured() {
        let env = env(&[
            (EMAIL_API_KEY_VAR, "re_123"),
            (FORM_RELAY_URL_VAR, "https://formspree.io/f/abc"),
        ]);
        assert_eq!(
            Channel::select(&env),
            Channel::EmailApi {
                api_key: "re_123".to_string()
            }
        );
    }

    #[test]
    fn form_relay_when_only_relay_configured() {
        let env = env(&[(FORM_RELAY_URL_VAR, "https://formspree.io/f/abc")]);
        assert_eq!(
            Channel::select(&env),
            Channel::FormRelay {
                url: "https://formspree.io/f/abc".to_string()
            }
        );
    }

    #[test]
    fn log_only_when_nothing_configured() {
        assert_eq!(Channel::select(&env(&[])), Channel::LogOnly);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let env = env(&[(EMAIL_API_KEY_VAR, "  "), (FORM_RELAY_URL_VAR, "")]);
        assert_eq!(env, RelayEnv::default());
        assert_eq!(Channel::select(&env), Channel::LogOnly);
    }

    #[test]
    fn recipient_override_is_read() {
        let env = env(&[(RECIPIENT_VAR, "inbox@example.com")]);
        assert_eq!(env.recipient.as_deref(), Some("inbox@example.com"));
    }

    #[test]
    fn fixed_source_returns_snapshot() {
        let snapshot = env(&[(FORM_RELAY_URL_VAR, "https://relay.test/f")]);
        assert_eq!(EnvSource::Fixed(snapshot.clone()).current(), snapshot);
    }
}
