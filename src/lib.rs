//! QEdge, a lightweight HR learning and engagement platform
//!
//! State lives in a directory of JSON collection files, one per entity
//! type, fronted by repositories and services. The HTTP server exposes
//! the mail delivery surface: campaign sending plus the open-pixel and
//! click-redirect tracking endpoints.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod mailer;
pub mod services;
pub mod store;

pub use app::AppState;
pub use error::{AppError, Result};
