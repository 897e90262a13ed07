use crate::config::toml_config::EmailConfig;
use crate::domain::{AlertDispatcher, AlertIntent};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use lettre::message::{header, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;

const SMTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends alerts by email over SMTP (STARTTLS).
pub struct EmailDispatcher {
    config: EmailConfig,
}

impl EmailDispatcher {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn build_message(&self, subject: String, text: String, html: String) -> Result<Message> {
        let mut builder = Message::builder()
            .from(self.config.from_address.parse()?)
            .subject(subject);

        for to in &self.config.to_addresses {
            builder = builder.to(to.parse()?);
        }

        let message = builder.multipart(
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(header::ContentType::TEXT_PLAIN)
                        .body(text),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(header::ContentType::TEXT_HTML)
                        .body(html),
                ),
        )?;
        Ok(message)
    }

    fn alert_message(&self, alert: &AlertIntent) -> Result<Message> {
        let subject = format!("Domain alert: {}", alert.domain);
        let time = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");

        let text = format!(
            "Domain monitoring alert\n\nDomain: {}\nProblem: {}\nDetails: {}\nTime: {}\n\n\
             This message was sent automatically by your domain monitor.",
            alert.domain,
            alert.kind.title(),
            alert.message,
            time
        );
        let html = format!(
            "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
             <h2 style=\"color: #dc2626;\">Domain monitoring alert</h2>\
             <p><strong>Domain:</strong> {}</p>\
             <p><strong>Problem:</strong> {}</p>\
             <p><strong>Details:</strong> {}</p>\
             <p><strong>Time:</strong> {}</p>\
             <hr style=\"margin: 20px 0;\">\
             <p style=\"color: #666; font-size: 14px;\">This message was sent automatically by your domain monitor.</p>\
             </div>",
            escape_html(&alert.domain),
            alert.kind.title(),
            escape_html(&alert.message),
            time
        );

        self.build_message(subject, text, html)
    }

    fn test_message(&self, domain: &str) -> Result<Message> {
        let subject = format!("Test notification: {}", domain);
        let time = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");

        let text = format!(
            "This is a test notification for {}.\nIf you can read this, alerting works.\nTime: {}",
            domain, time
        );
        let html = format!(
            "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
             <h2 style=\"color: #059669;\">Domain monitor test notification</h2>\
             <p>This is a test notification for <strong>{}</strong>.</p>\
             <p>If you can read this, alerting works.</p>\
             <p><strong>Time:</strong> {}</p>\
             </div>",
            escape_html(domain),
            time
        );

        self.build_message(subject, text, html)
    }

    async fn deliver(&self, message: Message) -> Result<()> {
        let mut transport =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.port())
                .timeout(Some(SMTP_TIMEOUT));

        if let (Some(user), Some(pass)) = (&self.config.username, &self.config.password) {
            transport = transport.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        transport.build().send(message).await?;
        Ok(())
    }
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[async_trait]
impl AlertDispatcher for EmailDispatcher {
    async fn send(&self, alert: &AlertIntent) -> Result<()> {
        let message = self.alert_message(alert)?;
        self.deliver(message).await?;
        tracing::info!(
            domain = %alert.domain,
            recipients = self.config.to_addresses.len(),
            "Alert email sent"
        );
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "email"
    }

    async fn send_test(&self, domain: &str) -> Result<()> {
        let message = self.test_message(domain)?;
        self.deliver(message).await
    }
}
