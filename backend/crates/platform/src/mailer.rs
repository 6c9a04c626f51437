//! Outbound Mail Delivery
//!
//! Fire-and-forget notifier boundary. The core never retries; a failed send
//! surfaces as a request failure to the caller.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Mail delivery errors
#[derive(Debug, Error)]
pub enum MailError {
    /// Delivery API rejected or could not be reached
    #[error("Mail delivery failed: {0}")]
    DeliveryFailed(String),
}

/// An outbound message
#[derive(Debug, Clone)]
pub struct Mail {
    pub to: String,
    pub to_name: Option<String>,
    pub subject: String,
    pub text: String,
}

/// Mail delivery abstraction
///
/// Implementations decide how to deliver (HTTP API, SMTP relay, log).
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message or return an error
    async fn send(&self, mail: Mail) -> Result<(), MailError>;
}

/// Local dev mailer that logs the message instead of sending it
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: Mail) -> Result<(), MailError> {
        tracing::info!(
            to = %mail.to,
            subject = %mail.subject,
            body = %mail.text,
            "mail send stub"
        );
        Ok(())
    }
}

// ============================================================================
// Transactional mail HTTP API
// ============================================================================

/// Configuration for the HTTP mail API
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// API endpoint, e.g. https://api.brevo.com/v3/smtp/email
    pub endpoint: String,
    pub api_key: String,
    pub sender_email: String,
    pub sender_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiAddress {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiSendBody {
    sender: ApiAddress,
    to: Vec<ApiAddress>,
    subject: String,
    text_content: String,
}

/// Mailer that posts JSON to a transactional-mail HTTP API
#[derive(Debug, Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    config: MailConfig,
}

impl HttpMailer {
    pub fn new(config: MailConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, mail: Mail) -> Result<(), MailError> {
        let body = ApiSendBody {
            sender: ApiAddress {
                email: self.config.sender_email.clone(),
                name: self.config.sender_name.clone(),
            },
            to: vec![ApiAddress {
                email: mail.to,
                name: mail.to_name,
            }],
            subject: mail.subject,
            text_content: mail.text,
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("api-key", &self.config.api_key)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| MailError::DeliveryFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, detail = %detail, "mail API rejected message");
            return Err(MailError::DeliveryFailed(format!(
                "mail API returned status {}",
                status
            )));
        }

        Ok(())
    }
}
