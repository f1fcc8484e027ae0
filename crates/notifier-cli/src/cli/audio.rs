use std::sync::Arc;

use notifier_core::chime::{Completion, CuePlayer, PreparedCue};
use notifier_core::Result;
use tracing::info;

/// Stands in for a sound device: reports the cue and completes immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingCuePlayer;

struct LoggedCue {
    uri: String,
    volume: f32,
    looping: bool,
}

impl CuePlayer for LoggingCuePlayer {
    fn prepare(&self, uri: &str, volume: f32, looping: bool) -> Result<Box<dyn PreparedCue>> {
        Ok(Box::new(LoggedCue {
            uri: uri.to_string(),
            volume,
            looping,
        }))
    }
}

impl PreparedCue for LoggedCue {
    fn start(self: Box<Self>, on_complete: Completion) -> Result<()> {
        info!(
            "Chime {} (volume {:.2}, looping {})",
            self.uri, self.volume, self.looping
        );
        on_complete();
        Ok(())
    }
}

/// Player for the current build: the rodio backend with `--features audio`.
pub fn default_player() -> Arc<dyn CuePlayer> {
    #[cfg(feature = "audio")]
    {
        Arc::new(notifier_core::chime::RodioCuePlayer::new())
    }
    #[cfg(not(feature = "audio"))]
    {
        Arc::new(LoggingCuePlayer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_logging_cue_completes() {
        let done = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&done);
        let cue = LoggingCuePlayer.prepare("file:///tmp/chime.ogg", 0.25, false).unwrap();
        cue.start(Box::new(move || flag.store(true, Ordering::SeqCst)))
            .unwrap();
        assert!(done.load(Ordering::SeqCst));
    }
}
