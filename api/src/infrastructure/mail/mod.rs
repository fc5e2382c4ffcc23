mod log_sender;
mod webhook_sender;

pub use log_sender::LogMailSender;
pub use webhook_sender::WebhookMailSender;

/// `jane@example.com` -> `j***@example.com`
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{first}***@{domain}")
        }
        None => "***".to_string(),
    }
}
