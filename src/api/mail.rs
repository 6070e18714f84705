//! Send-mail endpoint
//!
//! Thin wrapper over the relay: validates the payload, delivers the
//! message with the tracking pixel injected, and hands the tracking id
//! back to the caller. Logging the email record is the caller's job.

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::AppState;
use crate::config;
use crate::error::{AppError, Result};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SendEmailRequest {
    pub to: Option<String>,
    pub subject: Option<String>,
    pub html_content: Option<String>,
    pub sender_id: Option<String>,
    pub recipient_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailResponse {
    pub success: bool,
    pub tracking_id: String,
    pub pixel_url: String,
    pub sent_at: DateTime<Utc>,
}

pub async fn send_email(
    State(state): State<AppState>,
    Json(request): Json<SendEmailRequest>,
) -> Result<Json<SendEmailResponse>> {
    let to = require_field(request.to, "to")?;
    let subject = require_field(request.subject, "subject")?;
    let html_content = require_field(request.html_content, "htmlContent")?;
    let sender_id = require_field(request.sender_id, "senderId")?;

    if subject.len() > config::MAX_SUBJECT_LENGTH {
        return Err(AppError::Validation(format!(
            "Subject exceeds {} characters",
            config::MAX_SUBJECT_LENGTH
        )));
    }

    let mailer = state.mailer.as_ref().ok_or_else(|| {
        AppError::Configuration("Email sending is not configured".to_string())
    })?;

    let tracking_id = Uuid::new_v4().to_string();
    let pixel_url = mailer
        .send_tracked(&to, &subject, &html_content, &tracking_id)
        .await?;

    tracing::info!("Campaign email sent to {} by sender {}", to, sender_id);

    Ok(Json(SendEmailResponse {
        success: true,
        tracking_id,
        pixel_url,
        sent_at: Utc::now(),
    }))
}

fn require_field(value: Option<String>, name: &str) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation(format!("Missing required field: {}", name)))
}
