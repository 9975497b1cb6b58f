use chrono::Utc;
use tracing::{error, info, warn};

use crate::error::{StoreError, WorkflowError};
use crate::notify::{Message, Notifier};
use crate::store::ApprovalStore;

use super::record::{Project, RequestHistory};
use super::state::{Transition, ensure_pending, require_actor, require_reason};

/// How a pending cycle is closed.
#[derive(Debug, Clone)]
enum Resolution {
    Approve { remarks: Option<String> },
    Reject { reason: String },
}

impl Resolution {
    fn transition(&self) -> Transition {
        match self {
            Resolution::Approve { .. } => Transition::Approve,
            Resolution::Reject { .. } => Transition::Reject,
        }
    }
}

/// Drives the project approval workflow: request, approve, reject.
///
/// Each operation writes the request history first and the project
/// projection second. The history is the source of truth; if the second
/// write fails the caller gets [`WorkflowError::PartialFailure`].
pub struct ApprovalCoordinator<S, N> {
    store: S,
    notifier: N,
    /// Recipient of "approval requested" notifications.
    approver_id: String,
}

impl<S: ApprovalStore, N: Notifier> ApprovalCoordinator<S, N> {
    pub fn new(store: S, notifier: N, approver_id: impl Into<String>) -> Self {
        Self {
            store,
            notifier,
            approver_id: approver_id.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Open a new approval cycle for a project.
    ///
    /// Refused with [`WorkflowError::Conflict`] while another cycle for the
    /// same project is still pending.
    pub async fn request_approval(
        &self,
        project_id: &str,
        requester_id: &str,
        remarks: Option<String>,
    ) -> Result<RequestHistory, WorkflowError> {
        require_actor("requester", requester_id)?;
        let mut project = self.load_project(project_id).await?;

        let opened = RequestHistory::open(project_id, requester_id, remarks);
        let record = match self.store.open_request_history(&opened).await {
            Ok(record) => record,
            Err(StoreError::PendingRequest {
                project_id,
                pending_id,
            }) => {
                return Err(WorkflowError::Conflict {
                    project_id,
                    pending_id,
                });
            }
            Err(e) => return Err(e.into()),
        };

        check_projection(&project, Transition::Request);
        project.status = project.status.after(Transition::Request);
        project.mirror(&record);
        let project = self.save_projection(&record, &project).await?;

        info!(
            request_history_id = %record.id,
            project_id,
            requester_id,
            "approval requested"
        );

        self.dispatch(&self.approver_id, Message::approval_requested(&project, &record))
            .await;
        Ok(record)
    }

    /// Approve a pending cycle. `remarks` overwrites the request remarks
    /// only when given.
    pub async fn approve_project(
        &self,
        request_history_id: &str,
        approver_id: &str,
        remarks: Option<String>,
    ) -> Result<RequestHistory, WorkflowError> {
        self.resolve(request_history_id, approver_id, Resolution::Approve { remarks })
            .await
    }

    /// Reject a pending cycle. The reason is stored exactly as given.
    pub async fn reject_project(
        &self,
        request_history_id: &str,
        approver_id: &str,
        rejection_reason: &str,
    ) -> Result<RequestHistory, WorkflowError> {
        require_reason(rejection_reason)?;
        self.resolve(
            request_history_id,
            approver_id,
            Resolution::Reject {
                reason: rejection_reason.to_string(),
            },
        )
        .await
    }

    /// Every cycle recorded for a project, newest first.
    pub async fn history_for_project(
        &self,
        project_id: &str,
    ) -> Result<Vec<RequestHistory>, WorkflowError> {
        self.load_project(project_id).await?;
        Ok(self
            .store
            .find_request_histories_for_project(project_id)
            .await?)
    }

    async fn resolve(
        &self,
        request_history_id: &str,
        approver_id: &str,
        resolution: Resolution,
    ) -> Result<RequestHistory, WorkflowError> {
        require_actor("approver", approver_id)?;
        let transition = resolution.transition();

        let record = self.load_pending(request_history_id).await?;
        let mut project = self.load_project(&record.project_id).await?;

        // Re-check against the freshest copy right before mutating it.
        let mut record = self.load_pending(request_history_id).await?;
        let now = Utc::now();
        match resolution {
            Resolution::Approve { remarks } => record.approve(approver_id, now, remarks),
            Resolution::Reject { reason } => record.reject(approver_id, now, &reason),
        }
        let record = self.commit_resolution(&record).await?;

        check_projection(&project, transition);
        project.status = project.status.after(transition);
        project.mirror(&record);
        let project = self.save_projection(&record, &project).await?;

        info!(
            request_history_id = %record.id,
            project_id = %project.id,
            approver_id,
            status = %record.request_status,
            "approval request resolved"
        );

        let message = match transition {
            Transition::Reject => Message::approval_rejected(&project, &record),
            _ => Message::approval_granted(&project, &record),
        };
        self.dispatch(&record.requester_id, message).await;
        Ok(record)
    }

    async fn load_project(&self, project_id: &str) -> Result<Project, WorkflowError> {
        self.store
            .find_project(project_id)
            .await?
            .ok_or_else(|| WorkflowError::project_not_found(project_id))
    }

    async fn load_history(&self, id: &str) -> Result<RequestHistory, WorkflowError> {
        self.store
            .find_request_history(id)
            .await?
            .ok_or_else(|| WorkflowError::history_not_found(id))
    }

    async fn load_pending(&self, id: &str) -> Result<RequestHistory, WorkflowError> {
        let record = self.load_history(id).await?;
        ensure_pending(&record)?;
        Ok(record)
    }

    /// Save a resolved record. Losing the optimistic race means another
    /// resolver got there first, which the caller sees as `InvalidState`.
    async fn commit_resolution(
        &self,
        record: &RequestHistory,
    ) -> Result<RequestHistory, WorkflowError> {
        match self.store.save_request_history(record).await {
            Ok(saved) => Ok(saved),
            Err(StoreError::VersionConflict { .. }) => {
                let current = self.load_history(&record.id).await?;
                warn!(
                    request_history_id = %record.id,
                    status = %current.request_status,
                    "concurrent resolution lost the race"
                );
                Err(WorkflowError::InvalidState {
                    id: record.id.clone(),
                    status: current.request_status,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save_projection(
        &self,
        record: &RequestHistory,
        project: &Project,
    ) -> Result<Project, WorkflowError> {
        self.store.save_project(project).await.map_err(|source| {
            error!(
                request_history_id = %record.id,
                project_id = %project.id,
                error = %source,
                "request history saved but project projection was not"
            );
            WorkflowError::PartialFailure {
                request_history_id: record.id.clone(),
                project_id: project.id.clone(),
                source,
            }
        })
    }

    async fn dispatch(&self, recipient_id: &str, message: Message) {
        if let Err(e) = self
            .notifier
            .notify(recipient_id, &message.title, &message.content, message.kind)
            .await
        {
            warn!(recipient_id, kind = %message.kind, error = %e, "notification failed");
        }
    }
}

/// The projection should agree with the history before a transition; when a
/// past partial failure left it behind, the history wins and we say so.
fn check_projection(project: &Project, transition: Transition) {
    if let Err(invalid) = project.approval_status.apply(transition) {
        warn!(project_id = %project.id, %invalid, "project projection out of sync with request history");
    }
}
