mod coordinator;
mod record;
mod state;

pub use coordinator::ApprovalCoordinator;
pub use record::{Notification, NotificationKind, Project, RequestHistory, RequestType};
pub use state::{
    ApprovalStatus, InvalidTransition, ProjectStatus, RequestStatus, Transition, ensure_pending,
    require_actor, require_reason,
};
