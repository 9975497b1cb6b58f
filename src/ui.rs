//! Terminal rendering of workflow results.
//!
//! Uses `console` for colored output: green for approved, red for rejected,
//! yellow for pending.

use console::Style;

use crate::error::WorkflowError;
use crate::workflow::{Notification, Project, RequestHistory, RequestStatus};

/// Prints records, projects and inboxes to stdout, colored by status.
pub struct Printer {
    // Green style for approved requests.
    green: Style,
    // Red style for rejections and errors.
    red: Style,
    // Yellow style for pending requests.
    yellow: Style,
    // Dim style for secondary details.
    dim: Style,
}

impl Default for Printer {
    fn default() -> Self {
        Self {
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
            dim: Style::new().dim(),
        }
    }
}

impl Printer {
    fn status_style(&self, status: RequestStatus) -> &Style {
        match status {
            RequestStatus::Pending => &self.yellow,
            RequestStatus::Approved => &self.green,
            RequestStatus::Rejected => &self.red,
        }
    }

    /// One-line summary followed by the record as pretty JSON.
    pub fn request(&self, record: &RequestHistory) {
        let style = self.status_style(record.request_status);
        println!(
            "  {} {} ({})",
            style.apply_to("●"),
            record.id,
            style.apply_to(record.request_status)
        );
        println!(
            "{}",
            serde_json::to_string_pretty(record).unwrap_or_default()
        );
    }

    pub fn project(&self, project: &Project) {
        println!(
            "  {} {} [{}] approval: {}",
            self.green.apply_to("+"),
            project.id,
            project.status,
            project.approval_status
        );
    }

    pub fn history(&self, records: &[RequestHistory]) {
        if records.is_empty() {
            println!("  {}", self.dim.apply_to("no approval requests"));
            return;
        }
        for record in records {
            let style = self.status_style(record.request_status);
            let resolved_by = record
                .approver_id
                .as_deref()
                .map(|a| format!(" by {a}"))
                .unwrap_or_default();
            println!(
                "  {} {} {} requested by {}{}",
                record.request_date.format("%Y-%m-%d %H:%M"),
                record.id,
                style.apply_to(record.request_status),
                record.requester_id,
                resolved_by
            );
            if let Some(reason) = &record.rejection_reason {
                println!("      {}", self.dim.apply_to(format!("reason: {reason}")));
            }
        }
    }

    pub fn inbox(&self, notifications: &[Notification]) {
        if notifications.is_empty() {
            println!("  {}", self.dim.apply_to("no notifications"));
            return;
        }
        for n in notifications {
            println!("  {} {}", self.yellow.apply_to("✉"), n.title);
            println!("      {}", n.content);
        }
    }

    pub fn error(&self, err: &WorkflowError) {
        let label = if err.is_client_error() {
            self.yellow.apply_to("refused")
        } else {
            self.red.apply_to("failed")
        };
        eprintln!("  {} {label}: {err}", self.red.apply_to("✗"));
    }
}
