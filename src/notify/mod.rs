//! Best-effort notifications raised by the approval workflow.

mod message;

use std::future::Future;
use std::sync::Arc;

use tracing::info;

use crate::error::NotifyError;
use crate::workflow::NotificationKind;

pub use message::Message;

/// Creates a notification for one user. Callers treat failures as
/// informational: a notification error never undoes a state change.
pub trait Notifier {
    fn notify(
        &self,
        recipient_id: &str,
        title: &str,
        content: &str,
        kind: NotificationKind,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send;
}

impl<T: Notifier + Send + Sync> Notifier for Arc<T> {
    fn notify(
        &self,
        recipient_id: &str,
        title: &str,
        content: &str,
        kind: NotificationKind,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send {
        (**self).notify(recipient_id, title, content, kind)
    }
}

/// Writes notifications to the log instead of delivering them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    async fn notify(
        &self,
        recipient_id: &str,
        title: &str,
        content: &str,
        kind: NotificationKind,
    ) -> Result<(), NotifyError> {
        info!(recipient_id, %kind, title, content, "notification");
        Ok(())
    }
}
