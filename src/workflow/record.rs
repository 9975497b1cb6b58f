use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::state::{ApprovalStatus, ProjectStatus, RequestStatus};

/// Tag distinguishing request kinds that share the request history table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestType {
    ProjectApproval,
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestType::ProjectApproval => write!(f, "project-approval"),
        }
    }
}

/// Audit record of one approval cycle for a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestHistory {
    pub id: String,
    pub project_id: String,
    pub requester_id: String,
    pub request_type: RequestType,
    pub request_status: RequestStatus,
    pub request_date: DateTime<Utc>,
    pub approver_id: Option<String>,
    pub approval_date: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub remarks: Option<String>,
    /// Optimistic concurrency token, bumped by the store on every save.
    #[serde(default)]
    pub version: u64,
}

impl RequestHistory {
    /// Open a new pending cycle.
    pub fn open(project_id: &str, requester_id: &str, remarks: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            project_id: project_id.to_string(),
            requester_id: requester_id.to_string(),
            request_type: RequestType::ProjectApproval,
            request_status: RequestStatus::Pending,
            request_date: Utc::now(),
            approver_id: None,
            approval_date: None,
            rejection_reason: None,
            remarks,
            version: 0,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.approver_id.is_some()
    }

    pub fn approve(&mut self, approver_id: &str, at: DateTime<Utc>, remarks: Option<String>) {
        self.request_status = RequestStatus::Approved;
        self.approver_id = Some(approver_id.to_string());
        self.approval_date = Some(at);
        if remarks.is_some() {
            self.remarks = remarks;
        }
    }

    pub fn reject(&mut self, approver_id: &str, at: DateTime<Utc>, reason: &str) {
        self.request_status = RequestStatus::Rejected;
        self.approver_id = Some(approver_id.to_string());
        self.approval_date = Some(at);
        self.rejection_reason = Some(reason.to_string());
    }
}

/// The approval-relevant subset of a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub approval_status: ApprovalStatus,
    pub approver_id: Option<String>,
    pub approval_date: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            status: ProjectStatus::Draft,
            approval_status: ApprovalStatus::Unsubmitted,
            approver_id: None,
            approval_date: None,
            rejection_reason: None,
            updated_at: Utc::now(),
        }
    }

    /// Copy the outcome of `record` onto the projection.
    ///
    /// A pending cycle leaves the previous resolution fields in place; they
    /// keep describing the most recently resolved cycle.
    pub fn mirror(&mut self, record: &RequestHistory) {
        self.approval_status = record.request_status.into();
        if record.is_resolved() {
            self.approver_id = record.approver_id.clone();
            self.approval_date = record.approval_date;
            self.rejection_reason = record.rejection_reason.clone();
        }
        self.updated_at = Utc::now();
    }
}

/// Type tag carried by every workflow notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ApprovalRequested,
    ApprovalGranted,
    ApprovalRejected,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::ApprovalRequested => write!(f, "approval_requested"),
            NotificationKind::ApprovalGranted => write!(f, "approval_granted"),
            NotificationKind::ApprovalRejected => write!(f, "approval_rejected"),
        }
    }
}

/// A message for one user, created as a side effect and never read back by
/// the workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub recipient_id: String,
    pub title: String,
    pub content: String,
    pub kind: NotificationKind,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(recipient_id: &str, title: &str, content: &str, kind: NotificationKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            recipient_id: recipient_id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            kind,
            created_at: Utc::now(),
        }
    }
}
