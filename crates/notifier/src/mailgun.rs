//! Mailgun email delivery.
//!
//! Sends each message with `POST {api_base}/v3/{domain}/messages`,
//! authenticated with HTTP basic auth (`api` / API key) and a form body.
//! API documentation: https://documentation.mailgun.com/docs/mailgun/api-reference/

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;

use ratecast_core::errors::{Error, Result};
use ratecast_core::notifications::{Message, NotifierTrait};
use ratecast_core::RequestContext;

pub const DEFAULT_MAILGUN_API_BASE: &str = "https://api.mailgun.net";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum MailgunError {
    #[error("Mailgun request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Mailgun rejected message to {to}: HTTP {status} - {body}")]
    Rejected {
        to: String,
        status: u16,
        body: String,
    },
}

impl From<MailgunError> for Error {
    fn from(err: MailgunError) -> Self {
        Error::Notifier(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct MailgunConfig {
    pub api_key: String,
    pub domain: String,
    /// Sender, e.g. `Ratecast <rates@mg.example.com>`
    pub from: String,
    pub api_base: String,
}

impl MailgunConfig {
    pub fn new(api_key: String, domain: String, from: String) -> Self {
        Self {
            api_key,
            domain,
            from,
            api_base: DEFAULT_MAILGUN_API_BASE.to_string(),
        }
    }
}

#[derive(Serialize)]
struct MessageForm<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

pub struct MailgunNotifier {
    client: Client,
    config: MailgunConfig,
}

impl MailgunNotifier {
    pub fn new(config: MailgunConfig) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, config }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/v3/{}/messages",
            self.config.api_base.trim_end_matches('/'),
            self.config.domain
        )
    }

    async fn deliver(&self, message: &Message) -> std::result::Result<(), MailgunError> {
        let form = MessageForm {
            from: &self.config.from,
            to: &message.to,
            subject: &message.subject,
            text: &message.body,
        };

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth("api", Some(&self.config.api_key))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailgunError::Rejected {
                to: message.to.clone(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl NotifierTrait for MailgunNotifier {
    async fn send(&self, ctx: &RequestContext, message: &Message) -> Result<()> {
        debug!("Mailgun send to {} via {}", message.to, self.config.domain);
        ctx.run(self.deliver(message)).await?.map_err(|e| {
            warn!("{}", e);
            Error::from(e)
        })
    }
}
