pub mod item;
pub mod recipient;
pub mod state;
pub mod styled;

pub use item::{encrypted_placeholder, normalize_body, NavigationTarget, NotificationItem};
pub use recipient::{Recipient, Recipients};
pub use state::NotificationState;
pub use styled::{StyledSpan, StyledText, TextStyle};
