use std::io::{self, Write};

use notifier_core::presentation::RenderRequest;
use notifier_core::{NotificationId, NotificationSurface};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tracing::warn;

/// Prints each surface call as one JSON document.
pub struct ConsoleSurface {
    pretty: bool,
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSurface {
    pub fn stdout(pretty: bool) -> Self {
        Self::with_writer(pretty, Box::new(io::stdout()))
    }

    pub fn with_writer(pretty: bool, out: Box<dyn Write + Send>) -> Self {
        Self {
            pretty,
            out: Mutex::new(out),
        }
    }

    pub fn emit(&self, value: &Value) {
        let encoded = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        let line = match encoded {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to encode surface call: {}", e);
                return;
            }
        };

        let mut out = self.out.lock();
        if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
            warn!("Failed to write surface call: {}", e);
        }
    }
}

impl NotificationSurface for ConsoleSurface {
    fn render(&self, id: NotificationId, request: &RenderRequest) {
        self.emit(&json!({
            "action": "render",
            "id": id,
            "request": request,
        }));
    }

    fn cancel(&self, id: NotificationId) {
        self.emit(&json!({
            "action": "cancel",
            "id": id,
        }));
    }
}
