//! Workspaces pair one document store with one conversation session.

pub mod handlers;

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};
use uuid::Uuid;

use crate::chat::interpreter::Interpreter;
use crate::chat::ChatSession;
use crate::llm_client::LanguageModel;
use crate::models::CvDocument;
use crate::store::DocumentStore;

pub struct Workspace {
    pub id: Uuid,
    pub store: DocumentStore,
    pub session: ChatSession,
}

#[derive(Clone)]
pub struct WorkspaceRegistry {
    model: Arc<dyn LanguageModel>,
    workspaces: Arc<RwLock<HashMap<Uuid, Arc<Workspace>>>>,
}

impl WorkspaceRegistry {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            model,
            workspaces: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// The caller validates `document` first. Must run inside the tokio runtime.
    pub fn create(&self, document: CvDocument) -> Arc<Workspace> {
        let id = Uuid::new_v4();
        let workspace = Arc::new(Workspace {
            id,
            store: DocumentStore::new(document),
            session: ChatSession::new(id, Interpreter::new(Arc::clone(&self.model))),
        });

        self.workspaces
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::clone(&workspace));

        // ends once the workspace is removed and its last handle dropped
        let mut updates = workspace.store.subscribe();
        tokio::spawn(async move {
            while let Some((revision, document)) = updates.changed().await {
                debug!(
                    "Workspace {id}: revision {revision} published ({} experiences, {} education)",
                    document.experiences.len(),
                    document.education.len()
                );
            }
            debug!("Workspace {id}: store dropped, subscription closed");
        });

        info!("Created workspace {id}");
        workspace
    }

    pub fn get(&self, id: Uuid) -> Option<Arc<Workspace>> {
        self.workspaces
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// Forgets the workspace. Requests already holding it run to completion.
    pub fn remove(&self, id: Uuid) -> Option<Arc<Workspace>> {
        let removed = self
            .workspaces
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
        if removed.is_some() {
            info!("Removed workspace {id}");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedModel;

    #[tokio::test]
    async fn test_create_then_get() {
        let registry = WorkspaceRegistry::new(Arc::new(ScriptedModel::new(vec![])));
        let created = registry.create(CvDocument::sample());

        let found = registry.get(created.id).unwrap();
        assert!(Arc::ptr_eq(&created, &found));
        assert_eq!(*found.store.snapshot(), CvDocument::sample());
        assert!(registry.get(Uuid::new_v4()).is_none());
    }

    #[tokio::test]
    async fn test_remove_forgets_workspace_and_releases_store() {
        let registry = WorkspaceRegistry::new(Arc::new(ScriptedModel::new(vec![])));
        let created = registry.create(CvDocument::sample());
        let mut updates = created.store.subscribe();

        let removed = registry.remove(created.id).unwrap();
        assert!(Arc::ptr_eq(&created, &removed));
        assert!(registry.get(created.id).is_none());
        assert!(registry.remove(created.id).is_none());

        drop(created);
        drop(removed);
        // no sender left: subscribers see the end of the stream
        assert!(updates.changed().await.is_none());
    }

    #[tokio::test]
    async fn test_workspaces_are_independent() {
        let registry = WorkspaceRegistry::new(Arc::new(ScriptedModel::new(vec![])));
        let a = registry.create(CvDocument::sample());
        let b = registry.create(CvDocument::default());

        a.store.replace(Arc::new(CvDocument::default()));

        assert_eq!(*a.store.snapshot(), CvDocument::default());
        assert_eq!(b.store.revision(), 0);
        assert_ne!(a.id, b.id);
    }
}
