pub mod alarms;
pub mod builder;
pub mod chime;
pub mod constants;
pub mod error;
pub mod models;
pub mod notifier;
pub mod preferences;
pub mod presentation;
pub mod signal;
pub mod silence;
pub mod sources;
pub mod surface;

pub use error::{NotifierError, Result};
pub use models::{NotificationItem, NotificationState, Recipient, Recipients, StyledText};
pub use notifier::{MessageNotifier, UpdateOutcome};
pub use presentation::{NavigationTarget, Presentation, RenderRequest};
pub use signal::{SignalDecision, VisibleThread};
pub use surface::{NotificationId, NotificationSurface};
