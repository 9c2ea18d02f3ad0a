//! Draft cache: a best-effort shadow copy of the working collection.
//!
//! Nothing here returns an error. A draft that cannot be written is simply
//! not there next time, and a draft that cannot be read back is treated as
//! absent.

use crate::db::{LocalStorage, DRAFT_KEY};
use crate::models::{Collection, DraftSummary};

/// Persists the in-progress collection to local storage.
#[derive(Clone)]
pub struct DraftCache {
    storage: LocalStorage,
}

impl DraftCache {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    /// Overwrite the saved draft with `collection`.
    pub async fn save(&self, collection: &Collection) {
        if let Err(e) = self.storage.set_json(DRAFT_KEY, collection).await {
            tracing::warn!("Failed to save working draft: {}", e);
        }
    }

    /// The saved draft, or `None` when absent or unreadable.
    pub async fn load(&self) -> Option<Collection> {
        match self.storage.get_json::<Collection>(DRAFT_KEY).await {
            Ok(draft) => draft,
            Err(e) => {
                tracing::warn!("Ignoring unreadable working draft: {}", e);
                None
            }
        }
    }

    /// Summary of the saved draft when it holds any posts.
    pub async fn summary(&self) -> Option<DraftSummary> {
        self.load()
            .await
            .filter(|d| !d.posts.is_empty())
            .map(|d| DraftSummary::from(&d))
    }

    /// Delete the saved draft.
    pub async fn clear(&self) {
        if let Err(e) = self.storage.remove_item(DRAFT_KEY).await {
            tracing::warn!("Failed to clear working draft: {}", e);
        }
    }
}
