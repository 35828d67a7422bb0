//! Session-scoped list storage
//!
//! Lists live only for the session that generated them: a new generation
//! fully replaces the prior list, never merges, and everything is discarded
//! with the process. Status transitions are caller-driven and unconstrained.

use crate::models::{ActivityStatus, BucketListItem, EnrichedActivity};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory store of one bucket list per session.
pub struct SessionStore {
    lists: RwLock<HashMap<Uuid, Vec<BucketListItem>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            lists: RwLock::new(HashMap::new()),
        }
    }

    /// Materialize a freshly generated list into the session, replacing
    /// whatever was there. Ids are assigned here, exactly once.
    pub async fn replace_list(
        &self,
        session: Uuid,
        activities: Vec<EnrichedActivity>,
    ) -> Vec<BucketListItem> {
        let items: Vec<BucketListItem> = activities
            .into_iter()
            .map(BucketListItem::materialize)
            .collect();

        let mut lists = self.lists.write().await;
        lists.insert(session, items.clone());
        items
    }

    pub async fn list(&self, session: Uuid) -> Option<Vec<BucketListItem>> {
        let lists = self.lists.read().await;
        lists.get(&session).cloned()
    }

    /// Caller-driven status transition; any state is reachable from any
    /// state. Returns the updated item, or `None` for an unknown
    /// session/item.
    pub async fn set_status(
        &self,
        session: Uuid,
        item_id: Uuid,
        status: ActivityStatus,
    ) -> Option<BucketListItem> {
        let mut lists = self.lists.write().await;
        let item = lists
            .get_mut(&session)?
            .iter_mut()
            .find(|item| item.id == item_id)?;
        item.status = status;
        Some(item.clone())
    }

    pub async fn clear(&self, session: Uuid) {
        let mut lists = self.lists.write().await;
        lists.remove(&session);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivityDraft;

    fn enriched(activity: &str) -> EnrichedActivity {
        ActivityDraft {
            activity: activity.to_string(),
            description: format!("Go and {}", activity),
        }
        .into()
    }

    #[tokio::test]
    async fn test_replace_never_merges() {
        let store = SessionStore::new();
        let session = Uuid::new_v4();

        let first = store
            .replace_list(session, vec![enriched("a"), enriched("b")])
            .await;
        assert_eq!(first.len(), 2);

        let second = store.replace_list(session, vec![enriched("c")]).await;
        assert_eq!(second.len(), 1);

        let held = store.list(session).await.unwrap();
        assert_eq!(held.len(), 1);
        assert_eq!(held[0].activity, "c");
        // Prior list is fully replaced, including its ids.
        assert!(first.iter().all(|old| old.id != held[0].id));
    }

    #[tokio::test]
    async fn test_status_transitions_are_unconstrained() {
        let store = SessionStore::new();
        let session = Uuid::new_v4();

        let items = store.replace_list(session, vec![enriched("a")]).await;
        let id = items[0].id;

        let updated = store
            .set_status(session, id, ActivityStatus::Completed)
            .await
            .unwrap();
        assert_eq!(updated.status, ActivityStatus::Completed);

        // Completed back to ToDo is allowed; there is no state machine.
        let reverted = store
            .set_status(session, id, ActivityStatus::ToDo)
            .await
            .unwrap();
        assert_eq!(reverted.status, ActivityStatus::ToDo);
        assert_eq!(reverted.id, id);
    }

    #[tokio::test]
    async fn test_unknown_session_or_item() {
        let store = SessionStore::new();
        let session = Uuid::new_v4();

        assert!(store.list(session).await.is_none());
        assert!(store
            .set_status(session, Uuid::new_v4(), ActivityStatus::InProgress)
            .await
            .is_none());

        store.replace_list(session, vec![enriched("a")]).await;
        assert!(store
            .set_status(session, Uuid::new_v4(), ActivityStatus::InProgress)
            .await
            .is_none());

        store.clear(session).await;
        assert!(store.list(session).await.is_none());
    }
}
