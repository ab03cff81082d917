//! Typed HTTP client for the REST API plus the console's local context
//! (session, locale, theme) and page renderers.

pub mod api;
pub mod i18n;
pub mod session;
pub mod views;

pub use api::ApiClient;
pub use session::{Preferences, SessionStore};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("session expired; log in again")]
    SessionExpired,
    #[error("not logged in")]
    NotLoggedIn,
    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("session file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
