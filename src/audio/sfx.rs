use rodio::{Decoder, OutputStream, OutputStreamHandle, Source};
use std::collections::HashMap;

use super::{Cue, SoundCue};
use crate::config::AudioConfig;

/// SfxEngine handles low-latency sound effects.
/// It pre-loads samples into memory to ensure instant playback.
pub struct SfxEngine {
    stream_handle: OutputStreamHandle,
    samples: HashMap<Cue, Vec<u8>>,
    volume: f32,
}

impl SfxEngine {
    /// Returns (SfxEngine, OutputStream).
    /// The caller must keep the OutputStream alive; it cannot cross threads.
    pub fn open_default(config: &AudioConfig) -> Result<(Self, OutputStream), String> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| format!("Failed to get default audio output: {}", e))?;
        Ok((Self::new(stream_handle, config), stream))
    }

    pub fn new(stream_handle: OutputStreamHandle, config: &AudioConfig) -> Self {
        let mut engine = Self {
            stream_handle,
            samples: HashMap::new(),
            volume: config.volume,
        };
        engine.preload_assets(config);
        engine
    }

    fn preload_assets(&mut self, config: &AudioConfig) {
        log::debug!("[Audio] Preloading SFX assets...");

        let assets = [(Cue::DialogOpened, config.open_cue.as_str())];

        for (cue, filename) in assets {
            let path = config.asset_dir.join(filename);
            match std::fs::read(&path) {
                Ok(data) => {
                    self.samples.insert(cue, data);
                    log::debug!("[Audio] Loaded: {:?}", cue);
                }
                Err(e) => {
                    log::warn!("[Audio] Failed to load {}: {}", path.display(), e);
                }
            }
        }
    }
}

impl SoundCue for SfxEngine {
    fn play(&self, cue: Cue) {
        let Some(data) = self.samples.get(&cue) else {
            log::warn!("[Audio] Sound not found: {:?}", cue);
            return;
        };

        // Re-decoding from the in-memory buffer is fast enough for short cues
        let cursor = std::io::Cursor::new(data.clone());
        match Decoder::new(cursor) {
            Ok(source) => {
                let source = source.amplify(self.volume).convert_samples();
                if let Err(e) = self.stream_handle.play_raw(source) {
                    log::warn!("[Audio] Playback failed for {:?}: {}", cue, e);
                }
            }
            Err(e) => log::warn!("[Audio] Decode error for {:?}: {}", cue, e),
        }
    }
}
