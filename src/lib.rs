//! Project approval workflow for a staffing and partner-management platform.
//!
//! [`workflow::ApprovalCoordinator`] keeps a project's approval projection in
//! lock-step with its append-oriented request history and notifies the
//! people involved. Persistence and notification delivery are injected
//! through [`store::ApprovalStore`] and [`notify::Notifier`].

pub mod cli;
pub mod config;
pub mod error;
pub mod notify;
pub mod store;
pub mod ui;
pub mod workflow;

pub use error::{NotifyError, StoreError, WorkflowError};
