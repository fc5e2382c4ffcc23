use async_trait::async_trait;
use serde::Serialize;

use crate::application::ports::mail_sender::{MailSender, OutgoingMail};

/// Hands mail to an HTTP relay as `{from, to, subject, text}`.
pub struct WebhookMailSender {
    client: reqwest::Client,
    url: String,
    from: String,
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

impl WebhookMailSender {
    pub fn new(url: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            from: from.into(),
        }
    }
}

#[async_trait]
impl MailSender for WebhookMailSender {
    async fn send(&self, mail: &OutgoingMail) -> anyhow::Result<()> {
        let resp = self
            .client
            .post(&self.url)
            .json(&WebhookPayload {
                from: &self.from,
                to: &mail.to,
                subject: &mail.subject,
                text: &mail.text,
            })
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("mail webhook request failed: {e}"))?;
        if !resp.status().is_success() {
            anyhow::bail!("mail webhook returned status {}", resp.status());
        }
        tracing::debug!(to = %super::mask_email(&mail.to), subject = %mail.subject, "mail_sent");
        Ok(())
    }
}
