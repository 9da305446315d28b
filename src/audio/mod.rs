#[cfg(feature = "audio")]
pub mod sfx;

use serde::{Deserialize, Serialize};

/// Interaction sounds the shell can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cue {
    DialogOpened,
}

/// Fire-and-forget audio feedback. Called with the session lock held, so
/// implementations must return quickly.
pub trait SoundCue: Send + Sync + 'static {
    fn play(&self, cue: Cue);
}

/// Used when audio is disabled or no output device exists
pub struct Silent;

impl SoundCue for Silent {
    fn play(&self, _cue: Cue) {}
}
