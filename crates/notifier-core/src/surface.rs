use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::CANONICAL_NOTIFICATION_ID;
use crate::presentation::{Presentation, RenderRequest};

/// Slot a notification is posted under. Posting again to the same slot
/// replaces the previous notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(pub i64);

impl NotificationId {
    /// Shared by the single-thread and multi-thread summaries.
    pub const CANONICAL: NotificationId = NotificationId(CANONICAL_NOTIFICATION_ID);

    /// Delivery failures get their own slot per thread so they coexist with
    /// the summary.
    pub fn for_thread(thread_id: i64) -> Self {
        NotificationId(thread_id)
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Host notification service. Calls are fire-and-forget.
pub trait NotificationSurface: Send + Sync {
    fn render(&self, id: NotificationId, request: &RenderRequest);

    /// Remove the notification in `id`; a no-op when nothing is posted.
    fn cancel(&self, id: NotificationId);

    fn apply(&self, presentation: &Presentation) {
        match presentation {
            Presentation::Render { id, request } => self.render(*id, request),
            Presentation::Cancel { id } => self.cancel(*id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Render {
        id: NotificationId,
        request: RenderRequest,
    },
    Cancel {
        id: NotificationId,
    },
}

/// Surface that keeps every call. Useful for tests and dry runs.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    calls: Mutex<Vec<SurfaceCall>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().clone()
    }

    pub fn renders(&self) -> Vec<(NotificationId, RenderRequest)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::Render { id, request } => Some((*id, request.clone())),
                SurfaceCall::Cancel { .. } => None,
            })
            .collect()
    }
}

impl NotificationSurface for RecordingSurface {
    fn render(&self, id: NotificationId, request: &RenderRequest) {
        self.calls.lock().push(SurfaceCall::Render {
            id,
            request: request.clone(),
        });
    }

    fn cancel(&self, id: NotificationId) {
        self.calls.lock().push(SurfaceCall::Cancel { id });
    }
}
