use async_trait::async_trait;

use crate::application::ports::mail_sender::{MailSender, OutgoingMail};

/// Development fallback: writes mail to the log instead of delivering it.
#[derive(Default)]
pub struct LogMailSender;

#[async_trait]
impl MailSender for LogMailSender {
    async fn send(&self, mail: &OutgoingMail) -> anyhow::Result<()> {
        tracing::info!(
            to = %super::mask_email(&mail.to),
            subject = %mail.subject,
            "mail_delivery_skipped"
        );
        tracing::debug!(body = %mail.text, "mail_body");
        Ok(())
    }
}
