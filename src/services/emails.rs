//! Email campaigns
//!
//! Sends a tracked message through the relay, then logs it to the
//! email collection. Engagement flags are written back here when opens
//! and clicks are reported.

use uuid::Uuid;

use crate::config;
use crate::error::{AppError, Result};
use crate::mailer::Mailer;
use crate::services::metrics::{self, EmailStats};
use crate::store::models::{ActivityKind, Email, NewEmail};
use crate::store::repos::{ActivityRepository, EmailRepository};

/// One outgoing campaign message.
#[derive(Debug, Clone)]
pub struct CampaignInput {
    pub sender_id: String,
    pub recipient_id: Option<String>,
    pub recipient_email: String,
    pub subject: String,
    pub html_body: String,
    /// URLs in the body whose clicks should be tracked
    pub links: Vec<String>,
}

#[derive(Clone)]
pub struct EmailCampaignService {
    emails: EmailRepository,
    activity: ActivityRepository,
    mailer: Option<Mailer>,
}

impl EmailCampaignService {
    pub fn new(
        emails: EmailRepository,
        activity: ActivityRepository,
        mailer: Option<Mailer>,
    ) -> Self {
        Self {
            emails,
            activity,
            mailer,
        }
    }

    /// Delivers the message and logs it. Fails without logging when
    /// the relay is not configured or rejects the message.
    pub async fn send_campaign(&self, input: CampaignInput) -> Result<Email> {
        if input.recipient_email.trim().is_empty() {
            return Err(AppError::Validation("Recipient email is required".to_string()));
        }
        if input.subject.trim().is_empty() {
            return Err(AppError::Validation("Subject is required".to_string()));
        }
        if input.subject.len() > config::MAX_SUBJECT_LENGTH {
            return Err(AppError::Validation(format!(
                "Subject exceeds {} characters",
                config::MAX_SUBJECT_LENGTH
            )));
        }

        let mailer = self.mailer.as_ref().ok_or_else(|| {
            AppError::Configuration("Email sending is not configured".to_string())
        })?;

        let tracking_id = Uuid::new_v4().to_string();
        mailer
            .send_tracked(
                &input.recipient_email,
                &input.subject,
                &input.html_body,
                &tracking_id,
            )
            .await?;

        let email = self
            .emails
            .create(NewEmail {
                sender_id: input.sender_id,
                recipient_id: input.recipient_id,
                recipient_email: input.recipient_email,
                subject: input.subject,
                links: input.links,
                tracking_id: Some(tracking_id),
            })
            .await?;

        self.activity
            .record(
                ActivityKind::EmailSent,
                &format!("Email '{}' sent to {}", email.subject, email.recipient_email),
            )
            .await?;

        Ok(email)
    }

    /// Flags the email opened, as reported by the pixel loading on the
    /// recipient's side.
    pub async fn record_open(&self, email_id: &str) -> Result<Email> {
        self.emails
            .mark_opened(email_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Email {} not found", email_id)))
    }

    /// Flags one link of the email clicked.
    pub async fn record_click(&self, email_id: &str, url: &str) -> Result<Email> {
        self.emails
            .mark_link_clicked(email_id, url)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Email {} not found", email_id)))
    }

    pub async fn sent_by(&self, sender_id: &str) -> Result<Vec<Email>> {
        self.emails.find_by_sender(sender_id).await
    }

    pub async fn stats(&self) -> Result<EmailStats> {
        let emails = self.emails.get_all().await?;
        Ok(metrics::email_stats(&emails))
    }

    pub async fn stats_for_sender(&self, sender_id: &str) -> Result<EmailStats> {
        let emails = self.emails.find_by_sender(sender_id).await?;
        Ok(metrics::email_stats(&emails))
    }
}
