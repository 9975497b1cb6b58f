use crate::workflow::{NotificationKind, Project, RequestHistory};

/// Rendered title and body for one workflow notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub title: String,
    pub content: String,
    pub kind: NotificationKind,
}

impl Message {
    /// Sent to the designated approver when a cycle opens.
    pub fn approval_requested(project: &Project, record: &RequestHistory) -> Self {
        let mut content = format!(
            "{} requested approval for project \"{}\" ({}).",
            record.requester_id, project.name, project.id
        );
        if let Some(remarks) = &record.remarks {
            content.push_str(&format!(" Remarks: {remarks}"));
        }
        Self {
            title: format!("Approval requested: {}", project.name),
            content,
            kind: NotificationKind::ApprovalRequested,
        }
    }

    /// Sent to the requester when the cycle is approved.
    pub fn approval_granted(project: &Project, record: &RequestHistory) -> Self {
        let approver = record.approver_id.as_deref().unwrap_or("unknown");
        let mut content = format!(
            "Your approval request for project \"{}\" ({}) was approved by {approver}.",
            project.name, project.id
        );
        if let Some(remarks) = &record.remarks {
            content.push_str(&format!(" Remarks: {remarks}"));
        }
        Self {
            title: format!("Project approved: {}", project.name),
            content,
            kind: NotificationKind::ApprovalGranted,
        }
    }

    /// Sent to the requester when the cycle is rejected. Carries the reason.
    pub fn approval_rejected(project: &Project, record: &RequestHistory) -> Self {
        let approver = record.approver_id.as_deref().unwrap_or("unknown");
        let reason = record.rejection_reason.as_deref().unwrap_or("");
        Self {
            title: format!("Project rejected: {}", project.name),
            content: format!(
                "Your approval request for project \"{}\" ({}) was rejected by {approver}. Reason: {reason}",
                project.name, project.id
            ),
            kind: NotificationKind::ApprovalRejected,
        }
    }
}
