//! Document store — the single source of truth for one workspace's CV.
//!
//! Built on a `tokio::sync::watch` channel: writers publish complete replacement
//! values, readers take `Arc` snapshots and never observe a half-applied edit.
//! Read-modify-publish (`update`) runs under the channel's write lock, so the
//! manual editor never loses a concurrent write.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::watch;

use crate::models::CvDocument;

#[derive(Debug, Clone)]
struct StoreState {
    document: Arc<CvDocument>,
    revision: u64,
    /// Record ids that were published once and later dropped.
    retired: HashSet<String>,
}

impl StoreState {
    fn publish(&mut self, next: Arc<CvDocument>) {
        let kept = next.record_ids();
        self.retired.extend(
            self.document
                .record_ids()
                .into_iter()
                .filter(|id| !kept.contains(id)),
        );
        self.document = next;
        self.revision += 1;
    }
}

pub struct DocumentStore {
    tx: watch::Sender<StoreState>,
}

/// Receives every document published after `subscribe` was called.
pub struct DocumentSubscription {
    rx: watch::Receiver<StoreState>,
}

impl DocumentSubscription {
    /// Waits for the next publication. `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<(u64, Arc<CvDocument>)> {
        self.rx.changed().await.ok()?;
        let state = self.rx.borrow_and_update();
        Some((state.revision, Arc::clone(&state.document)))
    }
}

impl DocumentStore {
    pub fn new(document: CvDocument) -> Self {
        let (tx, _) = watch::channel(StoreState {
            document: Arc::new(document),
            revision: 0,
            retired: HashSet::new(),
        });
        Self { tx }
    }

    pub fn snapshot(&self) -> Arc<CvDocument> {
        Arc::clone(&self.tx.borrow().document)
    }

    /// Number of documents published since creation.
    pub fn revision(&self) -> u64 {
        self.tx.borrow().revision
    }

    /// Snapshot and retired ids read under one lock.
    pub fn snapshot_with_retired(&self) -> (Arc<CvDocument>, HashSet<String>) {
        let state = self.tx.borrow();
        (Arc::clone(&state.document), state.retired.clone())
    }

    /// Publishes `document` as the new value, unconditionally.
    pub fn replace(&self, document: Arc<CvDocument>) {
        self.tx.send_modify(|state| state.publish(document));
    }

    /// Derives the next document from the current one and publishes it. When `f`
    /// fails nothing is published and subscribers are not woken.
    pub fn update<F, E>(&self, f: F) -> Result<Arc<CvDocument>, E>
    where
        F: FnOnce(&CvDocument) -> Result<CvDocument, E>,
    {
        self.update_with_retired(|document, _| f(document))
    }

    /// Like `update`, but `f` also sees the retired ids. Both are read under the
    /// same lock as the publication, so a concurrent removal cannot slip between
    /// the check and the write.
    pub fn update_with_retired<F, E>(&self, f: F) -> Result<Arc<CvDocument>, E>
    where
        F: FnOnce(&CvDocument, &HashSet<String>) -> Result<CvDocument, E>,
    {
        let mut published = None;
        let mut failure = None;

        self.tx.send_if_modified(|state| match f(&state.document, &state.retired) {
            Ok(next) => {
                let next = Arc::new(next);
                state.publish(Arc::clone(&next));
                published = Some(next);
                true
            }
            Err(e) => {
                failure = Some(e);
                false
            }
        });

        match failure {
            Some(e) => Err(e),
            None => Ok(published.unwrap_or_else(|| self.snapshot())),
        }
    }

    pub fn subscribe(&self) -> DocumentSubscription {
        DocumentSubscription {
            rx: self.tx.subscribe(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_publishes_full_value() {
        let store = DocumentStore::new(CvDocument::sample());
        let mut next = CvDocument::sample();
        next.theme.primary_color = "#0a1a3f".to_string();

        store.replace(Arc::new(next.clone()));

        assert_eq!(*store.snapshot(), next);
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_old_snapshot_is_unaffected_by_replace() {
        let store = DocumentStore::new(CvDocument::sample());
        let before = store.snapshot();
        store.replace(Arc::new(CvDocument::default()));
        assert_eq!(*before, CvDocument::sample());
    }

    #[test]
    fn test_failed_update_publishes_nothing() {
        let store = DocumentStore::new(CvDocument::sample());
        let result: Result<_, &str> = store.update(|_| Err("nope"));
        assert_eq!(result.unwrap_err(), "nope");
        assert_eq!(store.revision(), 0);
        assert_eq!(*store.snapshot(), CvDocument::sample());
    }

    #[test]
    fn test_removed_ids_are_retired() {
        let store = DocumentStore::new(CvDocument::sample());
        store
            .update::<_, ()>(|doc| {
                let mut next = doc.clone();
                next.experiences.retain(|e| e.id != "2");
                Ok(next)
            })
            .unwrap();

        let (_, retired) = store.snapshot_with_retired();
        assert!(retired.contains("2"));
        // "1" is still used by both lists
        assert!(!retired.contains("1"));
    }

    #[test]
    fn test_update_with_retired_sees_removals_from_earlier_writes() {
        let store = DocumentStore::new(CvDocument::sample());
        store
            .update(|doc| crate::editor::remove_experience(doc, "2"))
            .unwrap();

        // a full replacement bringing "2" back is refused inside the same write
        let result = store.update_with_retired(|current, retired| {
            let candidate = CvDocument::sample();
            candidate.validate_reply(current, retired)?;
            Ok::<_, crate::models::DocumentError>(candidate)
        });

        assert!(matches!(
            result,
            Err(crate::models::DocumentError::RetiredId { .. })
        ));
        assert_eq!(store.revision(), 1);
        assert_eq!(store.snapshot().experiences.len(), 1);
    }

    #[tokio::test]
    async fn test_subscribers_see_each_publication() {
        let store = DocumentStore::new(CvDocument::sample());
        let mut sub = store.subscribe();

        let mut next = CvDocument::sample();
        next.skills.push("Rust".to_string());
        store.replace(Arc::new(next));

        let (revision, doc) = sub.changed().await.unwrap();
        assert_eq!(revision, 1);
        assert_eq!(doc.skills.last().map(String::as_str), Some("Rust"));
    }
}
