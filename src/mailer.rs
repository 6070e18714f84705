//! Outbound mail
//!
//! Delivery goes through the [`MailTransport`] trait so tests can swap
//! the SMTP relay for a recording stub. The production transport is
//! lettre over STARTTLS.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::MailerConfig;
use crate::error::{AppError, Result};

/// A message ready for delivery, body already rendered.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, message: &OutgoingEmail) -> Result<()>;
}

/// SMTP relay transport.
pub struct SmtpMailTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailTransport {
    pub fn new(config: &MailerConfig) -> Result<Self> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| AppError::Configuration(format!("Invalid SMTP relay host: {}", e)))?
            .port(config.port)
            .credentials(credentials)
            .build();
        let from = config
            .from_address
            .parse()
            .map_err(|e| AppError::Configuration(format!("Invalid SMTP from address: {}", e)))?;

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn deliver(&self, message: &OutgoingEmail) -> Result<()> {
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|e| AppError::Validation(format!("Invalid recipient address: {}", e)))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&message.subject)
            .header(ContentType::TEXT_HTML)
            .body(message.html_body.clone())
            .map_err(|e| AppError::Mail(format!("Failed to build message: {}", e)))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| AppError::Mail(e.to_string()))?;

        tracing::info!("Email delivered to {}", message.to);
        Ok(())
    }
}

/// Sends campaign mail with an open-tracking pixel appended to the
/// body.
#[derive(Clone)]
pub struct Mailer {
    transport: Arc<dyn MailTransport>,
    base_url: String,
}

impl Mailer {
    pub fn new(transport: Arc<dyn MailTransport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    pub fn smtp(config: &MailerConfig, base_url: impl Into<String>) -> Result<Self> {
        let transport = SmtpMailTransport::new(config)?;
        Ok(Self::new(Arc::new(transport), base_url))
    }

    pub fn pixel_url(&self, tracking_id: &str) -> String {
        format!(
            "{}/api/email/track/{}",
            self.base_url.trim_end_matches('/'),
            tracking_id
        )
    }

    /// Delivers the message with the tracking pixel injected, returning
    /// the pixel URL that was embedded.
    pub async fn send_tracked(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
        tracking_id: &str,
    ) -> Result<String> {
        let pixel_url = self.pixel_url(tracking_id);
        let message = OutgoingEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            html_body: append_tracking_pixel(html_body, &pixel_url),
        };
        self.transport.deliver(&message).await?;
        Ok(pixel_url)
    }
}

/// Injects a 1x1 tracking image, just before `</body>` when the markup
/// has one, appended at the end otherwise.
pub fn append_tracking_pixel(html: &str, pixel_url: &str) -> String {
    let tag = format!(
        "<img src=\"{}\" width=\"1\" height=\"1\" style=\"display:none\" alt=\"\" />",
        pixel_url
    );

    match html.rfind("</body>") {
        Some(pos) => {
            let mut out = String::with_capacity(html.len() + tag.len());
            out.push_str(&html[..pos]);
            out.push_str(&tag);
            out.push_str(&html[pos..]);
            out
        }
        None => format!("{}{}", html, tag),
    }
}
