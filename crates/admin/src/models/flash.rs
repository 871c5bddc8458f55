//! One-shot notices carried across a redirect.
//!
//! Handlers push a [`Flash`] before redirecting; the next rendered page
//! takes and displays them.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use super::session::keys;

/// Notice severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    /// CSS class for the notice banner.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "bg-green-100 text-green-800",
            Self::Error => "bg-red-100 text-red-800",
        }
    }
}

/// A notice shown once on the next page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

/// Queue a notice for the next page.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn push_flash(
    session: &Session,
    flash: Flash,
) -> Result<(), tower_sessions::session::Error> {
    let mut pending: Vec<Flash> = session.get(keys::FLASH).await?.unwrap_or_default();
    pending.push(flash);
    session.insert(keys::FLASH, pending).await
}

/// Take all pending notices. A session error yields none.
pub async fn take_flashes(session: &Session) -> Vec<Flash> {
    match session.remove::<Vec<Flash>>(keys::FLASH).await {
        Ok(pending) => pending.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read flash notices");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_flashes_are_taken_once() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);

        push_flash(&session, Flash::success("Menu item created.")).await.unwrap();
        push_flash(&session, Flash::error("Image could not be removed.")).await.unwrap();

        let taken = take_flashes(&session).await;
        assert_eq!(
            taken,
            vec![
                Flash::success("Menu item created."),
                Flash::error("Image could not be removed."),
            ]
        );
        assert!(take_flashes(&session).await.is_empty());
    }
}
