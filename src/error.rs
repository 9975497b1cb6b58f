use thiserror::Error;

use crate::workflow::RequestStatus;

/// Errors raised by the approval workflow.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: Entity, id: String },

    #[error("Request {id} has already been processed (status: {status})")]
    InvalidState { id: String, status: RequestStatus },

    #[error("Project {project_id} already has a pending approval request: {pending_id}")]
    Conflict {
        project_id: String,
        pending_id: String,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// The request history was written but the project projection was not.
    /// The two records disagree until an operator reconciles them.
    #[error(
        "Partial failure: request {request_history_id} was saved but project {project_id} was not: {source}"
    )]
    PartialFailure {
        request_history_id: String,
        project_id: String,
        #[source]
        source: StoreError,
    },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl WorkflowError {
    pub(crate) fn project_not_found(id: &str) -> Self {
        WorkflowError::NotFound {
            entity: Entity::Project,
            id: id.to_string(),
        }
    }

    pub(crate) fn history_not_found(id: &str) -> Self {
        WorkflowError::NotFound {
            entity: Entity::RequestHistory,
            id: id.to_string(),
        }
    }

    /// Errors the caller caused and can correct; never worth retrying as-is.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            WorkflowError::NotFound { .. }
                | WorkflowError::InvalidState { .. }
                | WorkflowError::Conflict { .. }
                | WorkflowError::Validation(_)
        )
    }
}

/// The kind of record a [`WorkflowError::NotFound`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Project,
    RequestHistory,
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Entity::Project => write!(f, "Project"),
            Entity::RequestHistory => write!(f, "Request history"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Stale write to {id}: expected version {expected}, found {found}")]
    VersionConflict { id: String, expected: u64, found: u64 },

    /// Refused to open a cycle while another one for the project is pending.
    #[error("Project {project_id} already has a pending request: {pending_id}")]
    PendingRequest {
        project_id: String,
        pending_id: String,
    },

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification to {recipient_id} could not be delivered: {reason}")]
    Delivery { recipient_id: String, reason: String },

    #[error("Notification store error: {0}")]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = WorkflowError::project_not_found("proj-9");
        assert_eq!(err.to_string(), "Project not found: proj-9");

        let err = WorkflowError::history_not_found("abc");
        assert_eq!(err.to_string(), "Request history not found: abc");
    }

    #[test]
    fn invalid_state_display() {
        let err = WorkflowError::InvalidState {
            id: "abc".into(),
            status: RequestStatus::Approved,
        };
        assert_eq!(
            err.to_string(),
            "Request abc has already been processed (status: approved)"
        );
    }

    #[test]
    fn partial_failure_keeps_source() {
        let err = WorkflowError::PartialFailure {
            request_history_id: "h-1".into(),
            project_id: "proj-1".into(),
            source: StoreError::Unavailable("disk full".into()),
        };
        assert!(err.to_string().contains("h-1"));
        assert!(err.to_string().contains("proj-1"));
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "Store unavailable: disk full");
        assert!(!err.is_client_error());
    }

    #[test]
    fn client_error_classification() {
        assert!(WorkflowError::Validation("x".into()).is_client_error());
        assert!(WorkflowError::project_not_found("p").is_client_error());
        assert!(
            WorkflowError::Conflict {
                project_id: "p".into(),
                pending_id: "h".into(),
            }
            .is_client_error()
        );
        assert!(!WorkflowError::Store(StoreError::Unavailable("down".into())).is_client_error());
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WorkflowError>();
        assert_send_sync::<NotifyError>();
    }
}
