//! Discord integration -- post attendance announcements via webhook.
//!
//! The webhook URL targets one channel, so the sink binds its destination
//! at construction and callers supply only the message text. Failures are
//! recoverable: a failed announcement never invalidates the check-in or
//! scheduler state that triggered it.

use reqwest::Client;
use serde_json::json;
use url::Url;

use crate::error::NotifyError;
use crate::storage::Config;

pub struct DiscordWebhook {
    webhook_url: String,
    client: Client,
}

impl DiscordWebhook {
    /// Build a sink for `webhook_url`.
    ///
    /// # Errors
    /// Returns `InvalidWebhook` if the URL does not parse or is not http(s).
    pub fn new(webhook_url: &str) -> Result<Self, NotifyError> {
        let parsed =
            Url::parse(webhook_url).map_err(|e| NotifyError::InvalidWebhook(e.to_string()))?;
        if parsed.scheme() != "https" && parsed.scheme() != "http" {
            return Err(NotifyError::InvalidWebhook(format!(
                "unsupported scheme '{}'",
                parsed.scheme()
            )));
        }
        Ok(Self {
            webhook_url: webhook_url.to_string(),
            client: Client::new(),
        })
    }

    /// Build a sink from the configured webhook URL.
    ///
    /// # Errors
    /// Returns `NotConfigured` if no URL is set.
    pub fn from_config(config: &Config) -> Result<Self, NotifyError> {
        match config.notify.webhook_url.as_deref() {
            Some(url) => Self::new(url),
            None => Err(NotifyError::NotConfigured),
        }
    }

    /// Post a message to the webhook.
    ///
    /// # Errors
    /// Returns `Rejected` when the sink answers with a non-success status,
    /// or `Request` on transport failure.
    pub async fn announce(&self, content: &str) -> Result<(), NotifyError> {
        let body = json!({ "content": content });
        let resp = self
            .client
            .post(&self.webhook_url)
            .json(&body)
            .send()
            .await?;

        if resp.status().is_success() || resp.status().as_u16() == 204 {
            Ok(())
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(NotifyError::Rejected { status, body })
        }
    }
}
