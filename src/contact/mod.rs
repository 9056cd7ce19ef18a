//! Contact relay: validate a form submission and hand it to exactly one
//! delivery channel.
//!
//! ```text
//! POST /api/contact {name, email, message, budget?, subject?}
//!   ├─ invalid           → 400 {"error": "..."}          (no outbound call)
//!   ├─ RESEND_API_KEY    → email API  ─┐
//!   ├─ FORMSPREE_ENDPOINT→ form relay ─┼─ non-2xx / transport error → 500
//!   └─ neither           → log line   ─┴─ ok → 200 {"success": true, ...}
//! ```
//!
//! One attempt per request. Nothing is retried, queued or stored; a failed
//! delivery is logged and reported to the submitter.

pub mod channel;
pub mod server;
pub mod submission;

pub use channel::{Channel, EnvSource, RelayEnv};
pub use submission::{ContactSubmission, ValidationError};

use crate::config::ContactConfig;
use axum::http::StatusCode;
use serde_json::json;
use thiserror::Error;

pub const SUCCESS_MESSAGE: &str = "Message sent successfully!";
pub const FAILURE_MESSAGE: &str = "Failed to send message. Please try again later.";

#[derive(Error, Debug)]
pub enum RelayError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("{channel} responded with HTTP {status}: {body}")]
    Upstream {
        channel: &'static str,
        status: u16,
        body: String,
    },
    #[error("{channel} request failed: {source}")]
    Transport {
        channel: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::Invalid(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// What the submitter sees. Upstream details stay in the server log.
    pub fn public_message(&self) -> String {
        match self {
            RelayError::Invalid(e) => e.to_string(),
            _ => FAILURE_MESSAGE.to_string(),
        }
    }
}

/// How a submission was delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    EmailApi,
    FormRelay,
    /// No channel configured; carries the line that was logged.
    Logged(String),
}

/// Stateless relay. Cheap to share behind an `Arc` across requests.
pub struct Relay {
    client: reqwest::Client,
    config: ContactConfig,
    env: EnvSource,
    fallback_recipient: String,
}

impl Relay {
    /// `fallback_recipient` is used when neither `CONTACT_EMAIL` nor
    /// `[contact].recipient` names a destination (normally the profile email).
    pub fn new(
        config: ContactConfig,
        env: EnvSource,
        fallback_recipient: impl Into<String>,
    ) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(RelayError::Client)?;
        Ok(Self {
            client,
            config,
            env,
            fallback_recipient: fallback_recipient.into(),
        })
    }

    pub fn config(&self) -> &ContactConfig {
        &self.config
    }

    /// Validate and deliver one submission.
    pub async fn submit(&self, submission: &ContactSubmission) -> Result<Delivery, RelayError> {
        submission.validate()?;

        let env = self.env.current();
        let channel = Channel::select(&env);
        tracing::debug!(channel = channel.name(), "delivering contact submission");

        let result = match &channel {
            Channel::EmailApi { api_key } => {
                let recipient = env
                    .recipient
                    .as_deref()
                    .or(self.config.recipient.as_deref())
                    .unwrap_or(&self.fallback_recipient);
                self.send_email(api_key, recipient, submission)
                    .await
                    .map(|()| Delivery::EmailApi)
            }
            Channel::FormRelay { url } => self
                .send_form(url, submission)
                .await
                .map(|()| Delivery::FormRelay),
            Channel::LogOnly => {
                let line = submission.log_line();
                tracing::info!("{line}");
                Ok(Delivery::Logged(line))
            }
        };

        match &result {
            Ok(_) => tracing::info!(channel = channel.name(), "contact submission delivered"),
            Err(e) => tracing::error!(channel = channel.name(), error = %e, "contact delivery failed"),
        }
        result
    }

    async fn send_email(
        &self,
        api_key: &str,
        recipient: &str,
        submission: &ContactSubmission,
    ) -> Result<(), RelayError> {
        let payload = json!({
            "from": self.config.sender,
            "to": [recipient],
            "reply_to": submission.email.trim(),
            "subject": submission.subject_line(&self.config.subject_prefix),
            "text": submission.to_text(),
        });
        let request = self
            .client
            .post(&self.config.email_api_url)
            .bearer_auth(api_key)
            .json(&payload);
        self.dispatch("email-api", request).await
    }

    async fn send_form(&self, url: &str, submission: &ContactSubmission) -> Result<(), RelayError> {
        let request = self
            .client
            .post(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(submission);
        self.dispatch("form-relay", request).await
    }

    async fn dispatch(
        &self,
        channel: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<(), RelayError> {
        let response = request
            .send()
            .await
            .map_err(|source| RelayError::Transport { channel, source })?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(RelayError::Upstream {
            channel,
            status: status.as_u16(),
            body,
        })
    }
}

/// JSON body for a successful submission.
pub fn success_body() -> serde_json::Value {
    json!({ "success": true, "message": SUCCESS_MESSAGE })
}
