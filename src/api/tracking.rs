//! Engagement tracking endpoints
//!
//! The pixel endpoint always answers with the image so broken tracking
//! never shows up in a recipient's mail client. The click endpoint
//! validates its target and bounces the browser straight through.

use axum::extract::{Path, Query};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use url::Url;

use crate::error::{AppError, Result};

/// 1x1 transparent GIF, served for every open-tracking request.
pub const TRACKING_PIXEL_GIF: [u8; 43] = [
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, // "GIF89a"
    0x01, 0x00, 0x01, 0x00, // 1x1 logical screen
    0x80, 0x00, 0x00, // 2-color global palette, background 0
    0x00, 0x00, 0x00, // color 0: black
    0xFF, 0xFF, 0xFF, // color 1: white
    0x21, 0xF9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, // graphic control, color 0 transparent
    0x2C, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, // image descriptor
    0x02, 0x02, 0x44, 0x01, 0x00, // 1 pixel of LZW data
    0x3B, // trailer
];

pub async fn open_pixel(Path(tracking_id): Path<String>) -> impl IntoResponse {
    tracing::debug!("Open pixel served for tracking id {}", tracking_id);

    (
        [
            (header::CONTENT_TYPE, "image/gif"),
            (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate"),
            (header::PRAGMA, "no-cache"),
            (header::EXPIRES, "0"),
        ],
        TRACKING_PIXEL_GIF.to_vec(),
    )
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClickParams {
    pub url: Option<String>,
    pub link_id: Option<String>,
    pub email_id: Option<String>,
}

pub async fn click_redirect(
    Path(tracking_id): Path<String>,
    Query(params): Query<ClickParams>,
) -> Result<Response> {
    let target = params
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Missing url parameter".to_string()))?;

    let parsed = Url::parse(&target)
        .map_err(|_| AppError::Validation(format!("Invalid redirect url: {}", target)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::Validation(format!(
            "Unsupported redirect scheme: {}",
            parsed.scheme()
        )));
    }

    tracing::info!(
        "Tracked click for {} on {} (link {:?}, email {:?})",
        tracking_id,
        target,
        params.link_id,
        params.email_id
    );

    // 302 with the target exactly as received
    Ok((StatusCode::FOUND, [(header::LOCATION, target)]).into_response())
}
