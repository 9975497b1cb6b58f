use std::sync::{Mutex, MutexGuard};

use crate::error::{NotifyError, StoreError};
use crate::notify::Notifier;
use crate::workflow::{Notification, NotificationKind, Project, RequestHistory};

use super::{ApprovalStore, StoreDocument};

/// Process-local store. Also collects notifications into per-user inboxes.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    doc: Mutex<StoreDocument>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with projects.
    pub fn with_projects(projects: impl IntoIterator<Item = Project>) -> Self {
        let store = Self::new();
        {
            let mut doc = store.lock();
            for project in projects {
                doc.put_project(&project);
            }
        }
        store
    }

    pub fn inbox(&self, recipient_id: &str) -> Vec<Notification> {
        self.lock().inbox(recipient_id)
    }

    pub fn snapshot(&self) -> StoreDocument {
        self.lock().clone()
    }

    // A poisoned lock only means another test thread panicked mid-write;
    // the maps themselves are still usable.
    fn lock(&self) -> MutexGuard<'_, StoreDocument> {
        self.doc.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ApprovalStore for InMemoryStore {
    async fn find_request_history(&self, id: &str) -> Result<Option<RequestHistory>, StoreError> {
        Ok(self.lock().request_histories.get(id).cloned())
    }

    async fn find_project(&self, id: &str) -> Result<Option<Project>, StoreError> {
        Ok(self.lock().projects.get(id).cloned())
    }

    async fn find_request_histories_for_project(
        &self,
        project_id: &str,
    ) -> Result<Vec<RequestHistory>, StoreError> {
        Ok(self.lock().histories_for_project(project_id))
    }

    async fn open_request_history(
        &self,
        record: &RequestHistory,
    ) -> Result<RequestHistory, StoreError> {
        self.lock().open_request_history(record)
    }

    async fn save_request_history(
        &self,
        record: &RequestHistory,
    ) -> Result<RequestHistory, StoreError> {
        self.lock().put_request_history(record)
    }

    async fn save_project(&self, project: &Project) -> Result<Project, StoreError> {
        Ok(self.lock().put_project(project))
    }
}

impl Notifier for InMemoryStore {
    async fn notify(
        &self,
        recipient_id: &str,
        title: &str,
        content: &str,
        kind: NotificationKind,
    ) -> Result<(), NotifyError> {
        self.lock()
            .notifications
            .push(Notification::new(recipient_id, title, content, kind));
        Ok(())
    }
}
