//! One-shot notices carried in the session across a redirect. Pushed by
//! a handler, drained by the next page render.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

const FLASH_KEY: &str = "flash_messages";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flash {
    pub level: Level,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
}

impl Flash {
    pub fn css_class(&self) -> &'static str {
        match self.level {
            Level::Success => "notice notice-success",
            Level::Error => "notice notice-error",
        }
    }
}

pub async fn push(
    session: &Session,
    level: Level,
    text: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    let mut messages: Vec<Flash> = session.get(FLASH_KEY).await?.unwrap_or_default();
    messages.push(Flash {
        level,
        text: text.into(),
    });
    session.insert(FLASH_KEY, messages).await
}

pub async fn success(
    session: &Session,
    text: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    push(session, Level::Success, text).await
}

pub async fn error(
    session: &Session,
    text: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    push(session, Level::Error, text).await
}

/// Drain all pending notices. Read failures render as no notices rather
/// than breaking the page.
pub async fn take(session: &Session) -> Vec<Flash> {
    match session.remove::<Vec<Flash>>(FLASH_KEY).await {
        Ok(Some(messages)) => messages,
        _ => Vec::new(),
    }
}
