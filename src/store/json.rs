//! File-backed store: one pretty-printed JSON document per store.
//!
//! Every operation loads the document, applies the change and writes it back
//! atomically (temp file, then rename). An async mutex serializes
//! read-modify-write cycles inside the process; separate processes sharing
//! the file are not coordinated.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{NotifyError, StoreError};
use crate::notify::Notifier;
use crate::workflow::{Notification, NotificationKind, Project, RequestHistory};

use super::{ApprovalStore, StoreDocument};

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    guard: Arc<Mutex<()>>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole document. A missing file is an empty store.
    pub async fn load(&self) -> Result<StoreDocument, StoreError> {
        let _held = self.guard.lock().await;
        self.read().await
    }

    pub async fn inbox(&self, recipient_id: &str) -> Result<Vec<Notification>, StoreError> {
        Ok(self.load().await?.inbox(recipient_id))
    }

    async fn read(&self) -> Result<StoreDocument, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreDocument::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, doc: &StoreDocument) -> Result<(), StoreError> {
        let mut content = serde_json::to_string_pretty(doc)?;
        content.push('\n');

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, content).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;
        debug!(path = %self.path.display(), "store written");
        Ok(())
    }

    /// Load, mutate and persist under the process-local guard.
    async fn update<T>(
        &self,
        apply: impl FnOnce(&mut StoreDocument) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let _held = self.guard.lock().await;
        let mut doc = self.read().await?;
        let out = apply(&mut doc)?;
        self.write(&doc).await?;
        Ok(out)
    }
}

impl ApprovalStore for JsonFileStore {
    async fn find_request_history(&self, id: &str) -> Result<Option<RequestHistory>, StoreError> {
        Ok(self.load().await?.request_histories.remove(id))
    }

    async fn find_project(&self, id: &str) -> Result<Option<Project>, StoreError> {
        Ok(self.load().await?.projects.remove(id))
    }

    async fn find_request_histories_for_project(
        &self,
        project_id: &str,
    ) -> Result<Vec<RequestHistory>, StoreError> {
        Ok(self.load().await?.histories_for_project(project_id))
    }

    async fn open_request_history(
        &self,
        record: &RequestHistory,
    ) -> Result<RequestHistory, StoreError> {
        self.update(|doc| doc.open_request_history(record)).await
    }

    async fn save_request_history(
        &self,
        record: &RequestHistory,
    ) -> Result<RequestHistory, StoreError> {
        self.update(|doc| doc.put_request_history(record)).await
    }

    async fn save_project(&self, project: &Project) -> Result<Project, StoreError> {
        self.update(|doc| Ok(doc.put_project(project))).await
    }
}

impl Notifier for JsonFileStore {
    async fn notify(
        &self,
        recipient_id: &str,
        title: &str,
        content: &str,
        kind: NotificationKind,
    ) -> Result<(), NotifyError> {
        let notification = Notification::new(recipient_id, title, content, kind);
        self.update(|doc| {
            doc.notifications.push(notification);
            Ok(())
        })
        .await?;
        Ok(())
    }
}
