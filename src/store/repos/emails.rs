//! Email log repository
//!
//! One row per sent campaign email, carrying open and per-link click
//! flags that the engagement metrics are computed from.

use chrono::Utc;

use crate::error::Result;
use crate::store::models::{Email, EmailLink, NewEmail};
use crate::store::{collections, generate_id, CollectionStore};

#[derive(Debug, Clone)]
pub struct EmailRepository {
    store: CollectionStore,
}

impl EmailRepository {
    pub fn new(store: CollectionStore) -> Self {
        Self { store }
    }

    async fn load(&self) -> Result<Vec<Email>> {
        self.store.read_collection(collections::EMAILS).await
    }

    async fn save(&self, emails: &[Email]) -> Result<()> {
        self.store.write_collection(collections::EMAILS, emails).await
    }

    pub async fn create(&self, input: NewEmail) -> Result<Email> {
        let mut emails = self.load().await?;

        let email = Email {
            id: generate_id(),
            sender_id: input.sender_id,
            recipient_id: input.recipient_id,
            recipient_email: input.recipient_email,
            subject: input.subject,
            sent_at: Utc::now(),
            opened: false,
            opened_at: None,
            links: input
                .links
                .into_iter()
                .map(|url| EmailLink { url, clicked: false })
                .collect(),
            tracking_id: input.tracking_id,
        };
        emails.push(email.clone());
        self.save(&emails).await?;

        tracing::debug!("Logged email {} to {}", email.id, email.recipient_email);
        Ok(email)
    }

    pub async fn get_all(&self) -> Result<Vec<Email>> {
        self.load().await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Email>> {
        let emails = self.load().await?;
        Ok(emails.into_iter().find(|e| e.id == id))
    }

    pub async fn find_by_sender(&self, sender_id: &str) -> Result<Vec<Email>> {
        let emails = self.load().await?;
        Ok(emails
            .into_iter()
            .filter(|e| e.sender_id == sender_id)
            .collect())
    }

    pub async fn find_by_recipient(&self, recipient_email: &str) -> Result<Vec<Email>> {
        let emails = self.load().await?;
        Ok(emails
            .into_iter()
            .filter(|e| e.recipient_email == recipient_email)
            .collect())
    }

    /// Sets the opened flag and timestamp. Later opens keep the first
    /// timestamp.
    pub async fn mark_opened(&self, id: &str) -> Result<Option<Email>> {
        let mut emails = self.load().await?;

        let Some(email) = emails.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };

        if !email.opened {
            email.opened = true;
            email.opened_at = Some(Utc::now());
        }

        let updated = email.clone();
        self.save(&emails).await?;

        Ok(Some(updated))
    }

    /// Flags the matching link as clicked.
    pub async fn mark_link_clicked(&self, id: &str, url: &str) -> Result<Option<Email>> {
        let mut emails = self.load().await?;

        let Some(email) = emails.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };

        if let Some(link) = email.links.iter_mut().find(|l| l.url == url) {
            link.clicked = true;
        }

        let updated = email.clone();
        self.save(&emails).await?;

        Ok(Some(updated))
    }
}
