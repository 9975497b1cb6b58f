//! Persistence for projects, request histories and notifications.
//!
//! [`ApprovalStore`] is the contract the workflow needs. Two backends share
//! the same in-memory [`StoreDocument`]: [`InMemoryStore`] keeps it behind a
//! mutex, [`JsonFileStore`] keeps it in a JSON file on disk.

mod json;
mod memory;

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::workflow::{Notification, Project, RequestHistory, RequestStatus};

pub use json::JsonFileStore;
pub use memory::InMemoryStore;

/// Storage operations the approval workflow depends on.
///
/// No locking is assumed across calls. `save_request_history` is the single
/// optimistic check: a stored record may only be replaced by a copy carrying
/// the same `version`.
pub trait ApprovalStore {
    fn find_request_history(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<RequestHistory>, StoreError>> + Send;

    fn find_project(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<Project>, StoreError>> + Send;

    /// All cycles recorded for a project, newest first.
    fn find_request_histories_for_project(
        &self,
        project_id: &str,
    ) -> impl Future<Output = Result<Vec<RequestHistory>, StoreError>> + Send;

    /// Insert a new pending cycle unless the project already has one.
    /// The check and the insert are a single step; a refusal is
    /// `StoreError::PendingRequest`.
    fn open_request_history(
        &self,
        record: &RequestHistory,
    ) -> impl Future<Output = Result<RequestHistory, StoreError>> + Send;

    /// Upsert by id. Returns the stored copy with its bumped version.
    fn save_request_history(
        &self,
        record: &RequestHistory,
    ) -> impl Future<Output = Result<RequestHistory, StoreError>> + Send;

    /// Upsert by id, last write wins.
    fn save_project(
        &self,
        project: &Project,
    ) -> impl Future<Output = Result<Project, StoreError>> + Send;
}

impl<T: ApprovalStore + Send + Sync> ApprovalStore for Arc<T> {
    fn find_request_history(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<RequestHistory>, StoreError>> + Send {
        (**self).find_request_history(id)
    }

    fn find_project(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<Project>, StoreError>> + Send {
        (**self).find_project(id)
    }

    fn find_request_histories_for_project(
        &self,
        project_id: &str,
    ) -> impl Future<Output = Result<Vec<RequestHistory>, StoreError>> + Send {
        (**self).find_request_histories_for_project(project_id)
    }

    fn open_request_history(
        &self,
        record: &RequestHistory,
    ) -> impl Future<Output = Result<RequestHistory, StoreError>> + Send {
        (**self).open_request_history(record)
    }

    fn save_request_history(
        &self,
        record: &RequestHistory,
    ) -> impl Future<Output = Result<RequestHistory, StoreError>> + Send {
        (**self).save_request_history(record)
    }

    fn save_project(
        &self,
        project: &Project,
    ) -> impl Future<Output = Result<Project, StoreError>> + Send {
        (**self).save_project(project)
    }
}

/// Everything a store holds. Serialized as-is by [`JsonFileStore`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default)]
    pub projects: BTreeMap<String, Project>,
    #[serde(default)]
    pub request_histories: BTreeMap<String, RequestHistory>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
}

impl StoreDocument {
    pub fn histories_for_project(&self, project_id: &str) -> Vec<RequestHistory> {
        let mut records: Vec<RequestHistory> = self
            .request_histories
            .values()
            .filter(|r| r.project_id == project_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.request_date.cmp(&a.request_date));
        records
    }

    pub fn put_request_history(
        &mut self,
        record: &RequestHistory,
    ) -> Result<RequestHistory, StoreError> {
        if let Some(stored) = self.request_histories.get(&record.id)
            && stored.version != record.version
        {
            return Err(StoreError::VersionConflict {
                id: record.id.clone(),
                expected: record.version,
                found: stored.version,
            });
        }

        let mut saved = record.clone();
        saved.version = record.version + 1;
        self.request_histories
            .insert(saved.id.clone(), saved.clone());
        Ok(saved)
    }

    pub fn open_request_history(
        &mut self,
        record: &RequestHistory,
    ) -> Result<RequestHistory, StoreError> {
        let pending = self
            .request_histories
            .values()
            .find(|r| r.project_id == record.project_id && r.request_status == RequestStatus::Pending);
        if let Some(pending) = pending {
            return Err(StoreError::PendingRequest {
                project_id: record.project_id.clone(),
                pending_id: pending.id.clone(),
            });
        }
        self.put_request_history(record)
    }

    pub fn put_project(&mut self, project: &Project) -> Project {
        self.projects.insert(project.id.clone(), project.clone());
        project.clone()
    }

    /// Notifications addressed to `recipient_id`, oldest first.
    pub fn inbox(&self, recipient_id: &str) -> Vec<Notification> {
        self.notifications
            .iter()
            .filter(|n| n.recipient_id == recipient_id)
            .cloned()
            .collect()
    }
}
