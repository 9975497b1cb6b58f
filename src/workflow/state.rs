use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::WorkflowError;

use super::record::RequestHistory;

/// Status of a single approval cycle, as recorded in its request history.
///
/// Each cycle flows: PENDING → APPROVED | REJECTED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "pending"),
            RequestStatus::Approved => write!(f, "approved"),
            RequestStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Approval state projected onto a project from its latest cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    #[default]
    Unsubmitted,
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalStatus::Unsubmitted => write!(f, "unsubmitted"),
            ApprovalStatus::Pending => write!(f, "pending"),
            ApprovalStatus::Approved => write!(f, "approved"),
            ApprovalStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl From<RequestStatus> for ApprovalStatus {
    fn from(status: RequestStatus) -> Self {
        match status {
            RequestStatus::Pending => ApprovalStatus::Pending,
            RequestStatus::Approved => ApprovalStatus::Approved,
            RequestStatus::Rejected => ApprovalStatus::Rejected,
        }
    }
}

/// An approval event applied to a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Request,
    Approve,
    Reject,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Request => write!(f, "request"),
            Transition::Approve => write!(f, "approve"),
            Transition::Reject => write!(f, "reject"),
        }
    }
}

/// A move the approval state machine refuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: ApprovalStatus,
    pub transition: Transition,
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot {} a project whose approval is {}", self.transition, self.from)
    }
}

impl ApprovalStatus {
    /// Compute the projection status after `transition`.
    ///
    /// - `Request` starts a new cycle from any non-pending status.
    /// - `Approve` and `Reject` resolve a pending cycle and nothing else.
    pub fn apply(self, transition: Transition) -> Result<ApprovalStatus, InvalidTransition> {
        let next = match (self, transition) {
            (
                ApprovalStatus::Unsubmitted | ApprovalStatus::Approved | ApprovalStatus::Rejected,
                Transition::Request,
            ) => Some(ApprovalStatus::Pending),
            (ApprovalStatus::Pending, Transition::Approve) => Some(ApprovalStatus::Approved),
            (ApprovalStatus::Pending, Transition::Reject) => Some(ApprovalStatus::Rejected),
            _ => None,
        };

        next.ok_or(InvalidTransition {
            from: self,
            transition,
        })
    }
}

/// Operational lifecycle of a project, advanced as a side effect of approval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Draft,
    PendingApproval,
    OpenForStaffing,
    InProgress,
    Closed,
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectStatus::Draft => write!(f, "DRAFT"),
            ProjectStatus::PendingApproval => write!(f, "PENDING_APPROVAL"),
            ProjectStatus::OpenForStaffing => write!(f, "OPEN_FOR_STAFFING"),
            ProjectStatus::InProgress => write!(f, "IN_PROGRESS"),
            ProjectStatus::Closed => write!(f, "CLOSED"),
        }
    }
}

impl ProjectStatus {
    /// Operational status after an approval event. Only the draft/pending
    /// edge moves; a project already staffing keeps its status on re-approval.
    pub fn after(self, transition: Transition) -> ProjectStatus {
        match (self, transition) {
            (ProjectStatus::Draft, Transition::Request) => ProjectStatus::PendingApproval,
            (ProjectStatus::PendingApproval, Transition::Approve) => ProjectStatus::OpenForStaffing,
            (ProjectStatus::PendingApproval, Transition::Reject) => ProjectStatus::Draft,
            (status, _) => status,
        }
    }
}

/// Refuse to touch a cycle that is no longer pending.
pub fn ensure_pending(record: &RequestHistory) -> Result<(), WorkflowError> {
    if record.request_status == RequestStatus::Pending {
        Ok(())
    } else {
        Err(WorkflowError::InvalidState {
            id: record.id.clone(),
            status: record.request_status,
        })
    }
}

pub fn require_actor(role: &str, id: &str) -> Result<(), WorkflowError> {
    if id.trim().is_empty() {
        return Err(WorkflowError::Validation(format!("{role} id must not be empty")));
    }
    Ok(())
}

/// The reason is checked trimmed but stored exactly as given.
pub fn require_reason(reason: &str) -> Result<(), WorkflowError> {
    if reason.trim().is_empty() {
        return Err(WorkflowError::Validation(
            "rejection reason must not be empty".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_is_legal_from_every_resolved_status() {
        for from in [
            ApprovalStatus::Unsubmitted,
            ApprovalStatus::Approved,
            ApprovalStatus::Rejected,
        ] {
            assert_eq!(from.apply(Transition::Request), Ok(ApprovalStatus::Pending));
        }
    }

    #[test]
    fn request_while_pending_is_refused() {
        let err = ApprovalStatus::Pending.apply(Transition::Request).unwrap_err();
        assert_eq!(err.from, ApprovalStatus::Pending);
        assert_eq!(err.to_string(), "cannot request a project whose approval is pending");
    }

    #[test]
    fn only_pending_can_be_resolved() {
        assert_eq!(
            ApprovalStatus::Pending.apply(Transition::Approve),
            Ok(ApprovalStatus::Approved)
        );
        assert_eq!(
            ApprovalStatus::Pending.apply(Transition::Reject),
            Ok(ApprovalStatus::Rejected)
        );

        for from in [
            ApprovalStatus::Unsubmitted,
            ApprovalStatus::Approved,
            ApprovalStatus::Rejected,
        ] {
            assert!(from.apply(Transition::Approve).is_err());
            assert!(from.apply(Transition::Reject).is_err());
        }
    }

    #[test]
    fn project_status_follows_approval_events() {
        let status = ProjectStatus::Draft.after(Transition::Request);
        assert_eq!(status, ProjectStatus::PendingApproval);
        assert_eq!(status.after(Transition::Approve), ProjectStatus::OpenForStaffing);
        assert_eq!(status.after(Transition::Reject), ProjectStatus::Draft);

        // Re-approval of a running project leaves it running.
        assert_eq!(
            ProjectStatus::InProgress.after(Transition::Request),
            ProjectStatus::InProgress
        );
        assert_eq!(
            ProjectStatus::InProgress.after(Transition::Approve),
            ProjectStatus::InProgress
        );
    }

    #[test]
    fn request_status_terminality() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(RequestStatus::Approved.is_terminal());
        assert!(RequestStatus::Rejected.is_terminal());
    }

    #[test]
    fn statuses_mirror_onto_projection() {
        assert_eq!(ApprovalStatus::from(RequestStatus::Pending), ApprovalStatus::Pending);
        assert_eq!(ApprovalStatus::from(RequestStatus::Approved), ApprovalStatus::Approved);
        assert_eq!(ApprovalStatus::from(RequestStatus::Rejected), ApprovalStatus::Rejected);
    }

    #[test]
    fn reason_and_actor_validation() {
        assert!(require_reason("missing budget detail").is_ok());
        assert!(matches!(require_reason(""), Err(WorkflowError::Validation(_))));
        assert!(matches!(require_reason("   \n"), Err(WorkflowError::Validation(_))));

        assert!(require_actor("approver", "user-2").is_ok());
        let err = require_actor("approver", " ").unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: approver id must not be empty");
    }

    #[test]
    fn ensure_pending_rejects_resolved_records() {
        let mut record = RequestHistory::open("proj-1", "user-1", None);
        assert!(ensure_pending(&record).is_ok());

        record.request_status = RequestStatus::Approved;
        match ensure_pending(&record) {
            Err(WorkflowError::InvalidState { id, status }) => {
                assert_eq!(id, record.id);
                assert_eq!(status, RequestStatus::Approved);
            }
            other => panic!("expected InvalidState, got {other:?}"),
        }
    }

    #[test]
    fn status_serialization() {
        assert_eq!(serde_json::to_string(&RequestStatus::Pending).unwrap(), "\"pending\"");
        assert_eq!(
            serde_json::to_string(&ApprovalStatus::Unsubmitted).unwrap(),
            "\"unsubmitted\""
        );
        assert_eq!(
            serde_json::to_string(&ProjectStatus::OpenForStaffing).unwrap(),
            "\"open_for_staffing\""
        );
    }
}
