//! Presentation selector
//!
//! Turns a built [`NotificationState`] into exactly one surface action. The
//! request is assembled in one step and never modified afterwards.

use serde::Serialize;

use crate::alarms::{self, Alarms};
use crate::constants::{icons, strings};
use crate::models::{NotificationState, Recipients, StyledText, TextStyle};
use crate::preferences::NotificationPreferences;
use crate::surface::NotificationId;

pub use crate::models::NavigationTarget;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionKind {
    /// Mark every listed thread as read
    MarkAsRead { thread_ids: Vec<i64> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderAction {
    pub icon: String,
    pub title: String,
    #[serde(flatten)]
    pub kind: ActionKind,
}

/// Expanded layout of a notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum RenderStyle {
    /// One block of text, one item summary per line
    BigText(StyledText),
    /// One line per item
    Inbox(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderRequest {
    pub small_icon: String,
    pub large_icon: Option<String>,
    pub title: String,
    pub text: StyledText,
    pub content_info: Option<String>,
    pub number: Option<usize>,
    /// Status-bar line; only set for alerting updates
    pub ticker: Option<String>,
    pub style: Option<RenderStyle>,
    pub content_target: NavigationTarget,
    pub actions: Vec<RenderAction>,
    pub alarms: Alarms,
    pub auto_cancel: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Presentation {
    Render {
        id: NotificationId,
        request: RenderRequest,
    },
    Cancel {
        id: NotificationId,
    },
}

impl Presentation {
    pub fn id(&self) -> NotificationId {
        match self {
            Presentation::Render { id, .. } | Presentation::Cancel { id } => *id,
        }
    }

    pub fn request(&self) -> Option<&RenderRequest> {
        match self {
            Presentation::Render { request, .. } => Some(request),
            Presentation::Cancel { .. } => None,
        }
    }
}

/// Choose how to show `state` in the canonical slot.
///
/// Empty states cancel. States touching at most one resolved thread get the
/// single-thread layout, anything else the multi-thread summary. The
/// mark-as-read action is only offered while messages can be decrypted.
pub fn select(
    state: &NotificationState,
    signal: bool,
    locked: bool,
    prefs: &dyn NotificationPreferences,
) -> Presentation {
    let request = if state.is_empty() {
        None
    } else if state.has_multiple_threads() {
        Some(multiple_thread_request(state, signal, locked, prefs))
    } else {
        Some(single_thread_request(state, signal, locked, prefs))
    };

    match request {
        Some(request) => Presentation::Render {
            id: NotificationId::CANONICAL,
            request,
        },
        None => Presentation::Cancel {
            id: NotificationId::CANONICAL,
        },
    }
}

fn single_thread_request(
    state: &NotificationState,
    signal: bool,
    locked: bool,
    prefs: &dyn NotificationPreferences,
) -> RenderRequest {
    let notifications = state.notifications();
    let first = &notifications[0];
    let count = state.message_count();

    let detail = notifications
        .iter()
        .fold(StyledText::default(), |acc, item| {
            acc.concat(&item.big_style_summary())
                .append("\n", TextStyle::Plain)
        });

    let content_target = if first.has_resolved_thread() {
        first.navigation_target()
    } else {
        NavigationTarget::Landing
    };

    RenderRequest {
        small_icon: icons::NOTIFICATION.to_string(),
        large_icon: first.individual_recipient.contact_photo.clone(),
        title: first.recipients.to_short_string(),
        text: first.text().clone(),
        content_info: Some(count.to_string()),
        number: Some(count),
        ticker: signal.then(|| first.ticker_text()),
        style: Some(RenderStyle::BigText(detail)),
        content_target,
        actions: mark_read_actions(state, locked, strings::MARK_AS_READ),
        alarms: alarms::decorate(prefs, signal),
        auto_cancel: false,
    }
}

fn multiple_thread_request(
    state: &NotificationState,
    signal: bool,
    locked: bool,
    prefs: &dyn NotificationPreferences,
) -> RenderRequest {
    let notifications = state.notifications();
    let first = &notifications[0];
    let count = state.message_count();

    RenderRequest {
        small_icon: icons::NOTIFICATION.to_string(),
        large_icon: Some(icons::NOTIFICATION.to_string()),
        title: strings::new_messages(count),
        text: StyledText::plain(strings::most_recent_from(
            &first.individual_recipient_name(),
        )),
        content_info: Some(count.to_string()),
        number: Some(count),
        ticker: signal.then(|| first.ticker_text()),
        style: Some(RenderStyle::Inbox(
            notifications.iter().map(|n| n.ticker_text()).collect(),
        )),
        content_target: NavigationTarget::Landing,
        actions: mark_read_actions(state, locked, strings::MARK_ALL_AS_READ),
        alarms: alarms::decorate(prefs, signal),
        auto_cancel: false,
    }
}

fn mark_read_actions(state: &NotificationState, locked: bool, title: &str) -> Vec<RenderAction> {
    if locked {
        return Vec::new();
    }
    vec![RenderAction {
        icon: icons::CHECK.to_string(),
        title: title.to_string(),
        kind: ActionKind::MarkAsRead {
            thread_ids: state.thread_ids(),
        },
    }]
}

/// Failure notice for a message that could not be sent, posted in the
/// thread's own slot. Always alerts.
pub fn delivery_failure(
    recipients: &Recipients,
    thread_id: i64,
    prefs: &dyn NotificationPreferences,
) -> Presentation {
    let request = RenderRequest {
        small_icon: icons::NOTIFICATION.to_string(),
        large_icon: Some(icons::DELIVERY_WARNING.to_string()),
        title: strings::DELIVERY_FAILED_TITLE.to_string(),
        text: StyledText::plain(strings::DELIVERY_FAILED_TEXT),
        content_info: None,
        number: None,
        ticker: Some(strings::DELIVERY_FAILED_TICKER.to_string()),
        style: None,
        content_target: NavigationTarget::Thread {
            thread_id,
            recipients: recipients.clone(),
        },
        actions: Vec::new(),
        alarms: alarms::decorate(prefs, true),
        auto_cancel: true,
    };

    Presentation::Render {
        id: NotificationId::for_thread(thread_id),
        request,
    }
}
