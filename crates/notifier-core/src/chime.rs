//! In-thread chime
//!
//! When a message lands in the conversation the user is already reading,
//! no system notification is posted. Instead a short cue plays at reduced
//! volume. Playback runs in the background and any failure is only logged.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::constants::CHIME_VOLUME;
use crate::error::Result;
use crate::preferences::NotificationPreferences;

/// Callback run once playback has finished.
pub type Completion = Box<dyn FnOnce() + Send + 'static>;

/// Loads audio cues.
pub trait CuePlayer: Send + Sync {
    fn prepare(&self, uri: &str, volume: f32, looping: bool) -> Result<Box<dyn PreparedCue>>;
}

/// A loaded cue, ready to play once.
pub trait PreparedCue: Send {
    /// Start playback without blocking. `on_complete` runs when playback
    /// ends; it is dropped uncalled if this returns an error.
    fn start(self: Box<Self>, on_complete: Completion) -> Result<()>;
}

/// Audio focus arbitration with other playing apps.
pub trait AudioFocus: Send + Sync {
    /// Ask other streams to duck for a short cue.
    fn request_transient(&self);

    fn abandon(&self);
}

/// For hosts without focus arbitration.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAudioFocus;

impl AudioFocus for NoopAudioFocus {
    fn request_transient(&self) {}

    fn abandon(&self) {}
}

#[derive(Clone)]
pub struct InThreadChime {
    player: Arc<dyn CuePlayer>,
    focus: Arc<dyn AudioFocus>,
}

impl InThreadChime {
    pub fn new(player: Arc<dyn CuePlayer>, focus: Arc<dyn AudioFocus>) -> Self {
        Self { player, focus }
    }

    /// Play the notification ringtone once if in-thread alerts are on.
    ///
    /// Returns whether playback was started.
    pub fn ring(&self, prefs: &dyn NotificationPreferences) -> bool {
        if !prefs.is_in_thread_alerts_enabled() {
            return false;
        }

        let Some(uri) = prefs.ringtone().filter(|uri| !uri.trim().is_empty()) else {
            return false;
        };

        let cue = match self.player.prepare(&uri, CHIME_VOLUME, false) {
            Ok(cue) => cue,
            Err(e) => {
                warn!("In-thread chime unavailable: {}", e);
                return false;
            }
        };

        self.focus.request_transient();

        let focus = Arc::clone(&self.focus);
        match cue.start(Box::new(move || focus.abandon())) {
            Ok(()) => {
                debug!("Playing in-thread chime {}", uri);
                true
            }
            Err(e) => {
                warn!("In-thread chime failed to start: {}", e);
                self.focus.abandon();
                false
            }
        }
    }
}

#[cfg(feature = "audio")]
pub use rodio_player::RodioCuePlayer;

#[cfg(feature = "audio")]
mod rodio_player {
    use rodio::{Decoder, OutputStream, Sink, Source};
    use std::fs::File;
    use std::io::BufReader;
    use tracing::warn;

    use super::{Completion, CuePlayer, PreparedCue};
    use crate::error::{NotifierError, Result};

    /// Plays local sound files through the default output device.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct RodioCuePlayer;

    impl RodioCuePlayer {
        pub fn new() -> Self {
            Self
        }
    }

    struct RodioCue {
        uri: String,
        source: Decoder<BufReader<File>>,
        volume: f32,
        looping: bool,
    }

    fn cue_error(uri: &str, err: impl std::fmt::Display) -> NotifierError {
        NotifierError::CueLoad {
            uri: uri.to_string(),
            message: err.to_string(),
        }
    }

    impl CuePlayer for RodioCuePlayer {
        fn prepare(&self, uri: &str, volume: f32, looping: bool) -> Result<Box<dyn PreparedCue>> {
            let path = uri.strip_prefix("file://").unwrap_or(uri);
            let file = File::open(path).map_err(|e| cue_error(uri, e))?;
            let source = Decoder::new(BufReader::new(file)).map_err(|e| cue_error(uri, e))?;

            Ok(Box::new(RodioCue {
                uri: uri.to_string(),
                source,
                volume,
                looping,
            }))
        }
    }

    impl PreparedCue for RodioCue {
        fn start(self: Box<Self>, on_complete: Completion) -> Result<()> {
            let RodioCue {
                uri,
                source,
                volume,
                looping,
            } = *self;
            let thread_uri = uri.clone();

            // The output stream is not Send, so it is opened on the playback thread
            std::thread::Builder::new()
                .name("in-thread-chime".to_string())
                .spawn(move || {
                    match OutputStream::try_default() {
                        Ok((_stream, handle)) => match Sink::try_new(&handle) {
                            Ok(sink) => {
                                sink.set_volume(volume);
                                if looping {
                                    sink.append(source.repeat_infinite());
                                } else {
                                    sink.append(source);
                                }
                                sink.sleep_until_end();
                            }
                            Err(e) => warn!("Failed to create audio sink for {}: {}", thread_uri, e),
                        },
                        Err(e) => warn!("Failed to open audio output for {}: {}", thread_uri, e),
                    }
                    on_complete();
                })
                .map_err(|e| cue_error(&uri, e))?;

            Ok(())
        }
    }
}
