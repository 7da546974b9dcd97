use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, Context};
use folio_email_contracts::{Email, EmailService};
use folio_models::{email_address::EmailAddress, Sensitive};
use folio_utils::trace_instrument;
use http::HttpClient;
use serde::Serialize;
use tracing::warn;
use url::Url;

mod http;

/// Base URL of the transactional email API.
pub const DEFAULT_ENDPOINT: &str = "https://api.brevo.com/v3/";

/// Client of a Brevo compatible transactional email HTTP API.
#[derive(Debug, Clone)]
pub struct EmailServiceImpl {
    client: HttpClient,
    config: Option<Arc<EmailServiceConfig>>,
}

#[derive(Debug, Clone)]
pub struct EmailServiceConfig {
    pub api_key: Sensitive<String>,
    pub sender: EmailAddress,
    pub endpoint: Url,
    pub timeout: Duration,
}

impl EmailServiceConfig {
    pub fn new(
        api_key: String,
        sender: EmailAddress,
        endpoint_override: Option<Url>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let mut endpoint = match endpoint_override {
            Some(endpoint) => endpoint,
            None => DEFAULT_ENDPOINT.parse()?,
        };
        if !endpoint.path().ends_with('/') {
            endpoint.set_path(&format!("{}/", endpoint.path()));
        }

        Ok(Self {
            api_key: api_key.into(),
            sender,
            endpoint,
            timeout,
        })
    }
}

impl EmailServiceImpl {
    /// Creates a new email service. Without a config, the service is
    /// considered unconfigured and refuses to send emails.
    pub fn new(config: Option<EmailServiceConfig>) -> Self {
        Self {
            client: HttpClient::default(),
            config: config.map(Arc::new),
        }
    }

    fn config(&self) -> anyhow::Result<&EmailServiceConfig> {
        self.config
            .as_deref()
            .ok_or_else(|| anyhow!("Email service is not configured"))
    }
}

impl EmailService for EmailServiceImpl {
    fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    #[trace_instrument(skip(self))]
    async fn send(&self, email: Email) -> anyhow::Result<bool> {
        let config = self.config()?;

        let request = SendEmailRequest {
            sender: Contact {
                email: config.sender.as_str(),
            },
            to: [Contact {
                email: email.recipient.as_str(),
            }],
            reply_to: email.reply_to.as_ref().map(|reply_to| Contact {
                email: reply_to.as_str(),
            }),
            subject: &email.subject,
            html_content: email.html.as_deref(),
            text_content: &email.text,
        };

        let response = self
            .client
            .post(config.endpoint.join("smtp/email")?)
            .header("api-key", config.api_key.as_str())
            .timeout(config.timeout)
            .json(&request)
            .send()
            .await
            .context("Failed to reach email provider")?;

        let status = response.status();
        if status.is_success() {
            return Ok(true);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(%status, %body, "email provider rejected email");
        Ok(false)
    }

    #[trace_instrument(skip(self))]
    async fn ping(&self) -> anyhow::Result<()> {
        let config = self.config()?;

        self.client
            .get(config.endpoint.join("account")?)
            .header("api-key", config.api_key.as_str())
            .timeout(config.timeout)
            .send()
            .await
            .context("Failed to reach email provider")?
            .error_for_status()
            .map(|_| ())
            .context("Email provider rejected credentials")
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailRequest<'a> {
    sender: Contact<'a>,
    to: [Contact<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<Contact<'a>>,
    subject: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    html_content: Option<&'a str>,
    text_content: &'a str,
}

#[derive(Serialize)]
struct Contact<'a> {
    email: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_gets_trailing_slash() {
        let config = EmailServiceConfig::new(
            "key".into(),
            "me@example.com".parse().unwrap(),
            Some("http://127.0.0.1:8003/v3".parse().unwrap()),
            Duration::from_secs(10),
        )
        .unwrap();

        assert_eq!(
            config.endpoint.join("smtp/email").unwrap().as_str(),
            "http://127.0.0.1:8003/v3/smtp/email"
        );
    }

    #[test]
    fn default_endpoint() {
        let config = EmailServiceConfig::new(
            "key".into(),
            "me@example.com".parse().unwrap(),
            None,
            Duration::from_secs(10),
        )
        .unwrap();

        assert_eq!(
            config.endpoint.join("smtp/email").unwrap().as_str(),
            "https://api.brevo.com/v3/smtp/email"
        );
    }

    #[test]
    fn request_body() {
        let request = SendEmailRequest {
            sender: Contact {
                email: "me@example.com",
            },
            to: [Contact {
                email: "me@example.com",
            }],
            reply_to: Some(Contact {
                email: "ann@example.com",
            }),
            subject: "Hello",
            html_content: None,
            text_content: "Hi",
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "sender": {"email": "me@example.com"},
                "to": [{"email": "me@example.com"}],
                "replyTo": {"email": "ann@example.com"},
                "subject": "Hello",
                "textContent": "Hi",
            })
        );
    }

    #[tokio::test]
    async fn unconfigured() {
        let sut = EmailServiceImpl::new(None);

        assert!(!sut.is_configured());
        assert!(sut.ping().await.is_err());
        let result = sut
            .send(Email {
                recipient: "me@example.com".parse().unwrap(),
                subject: "Hello".into(),
                text: "Hi".into(),
                html: None,
                reply_to: None,
            })
            .await;
        assert!(result.is_err());
    }
}
