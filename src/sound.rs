use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use log::{debug, warn};
use rodio::source::Source;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

use crate::config::Config;
use crate::error::AudioError;

/// Sound effects requested by the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sound {
    Start,
    Music,
    /// Piece settled under normal gravity.
    SoftLock,
    /// Piece settled while soft dropping.
    ForceLock,
    HardDrop,
    LineClear,
    Tetris,
    Rotate,
    GameOver,
}

impl Sound {
    pub const ALL: [Sound; 9] = [
        Sound::Start,
        Sound::Music,
        Sound::SoftLock,
        Sound::ForceLock,
        Sound::HardDrop,
        Sound::LineClear,
        Sound::Tetris,
        Sound::Rotate,
        Sound::GameOver,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Sound::Start => "start.wav",
            Sound::Music => "music.wav",
            Sound::SoftLock => "slow-hit.wav",
            Sound::ForceLock => "force-hit.wav",
            Sound::HardDrop => "line-drop.wav",
            Sound::LineClear => "line-remove.wav",
            Sound::Tetris => "line-removal4.wav",
            Sound::Rotate => "block-rotate.wav",
            Sound::GameOver => "game-over.wav",
        }
    }

    pub fn looping(self) -> bool {
        matches!(self, Sound::Music)
    }
}

/// Plays [`Sound`]s through rodio. Effects are detached and forgotten; the
/// music loop owns a dedicated sink so it can be paused, muted and replaced.
pub struct SoundManager {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    music_sink: Sink,
    clips: HashMap<Sound, Arc<[u8]>>,
    volume: f32,
    muted: bool,
    paused: bool,
}

impl SoundManager {
    pub fn new(config: &Config) -> Result<Self, AudioError> {
        let (stream, stream_handle) = OutputStream::try_default()?;
        let music_sink = Sink::try_new(&stream_handle)?;
        Ok(SoundManager {
            _stream: stream,
            stream_handle,
            music_sink,
            clips: load_clips(&config.sound_dir),
            volume: config.volume,
            muted: config.muted,
            paused: false,
        })
    }

    /// Fire and forget. Failures are logged, never returned.
    pub fn play(&mut self, sound: Sound) {
        if sound == Sound::GameOver {
            self.music_sink.clear();
        }
        if let Err(e) = self.try_play(sound) {
            warn!("{e}");
        }
    }

    fn try_play(&mut self, sound: Sound) -> Result<(), AudioError> {
        let Some(bytes) = self.clips.get(&sound) else {
            return Ok(());
        };
        let source = Decoder::new(Cursor::new(Arc::clone(bytes))).map_err(|source| AudioError::Decode {
            file: sound.file_name(),
            source,
        })?;

        if sound.looping() {
            self.music_sink.clear();
            self.music_sink.append(source.repeat_infinite());
            self.music_sink.set_volume(self.current_volume());
            if !self.paused {
                self.music_sink.play();
            }
        } else {
            let sink = Sink::try_new(&self.stream_handle)?;
            sink.set_volume(self.current_volume());
            sink.append(source);
            sink.detach();
        }
        Ok(())
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        self.music_sink.set_volume(self.current_volume());
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.music_sink.play();
        } else {
            self.music_sink.pause();
        }
        self.paused = !self.paused;
    }

    fn current_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }
}

/// Reads every known clip from `dir`. Missing files are skipped with a warning.
fn load_clips(dir: &Path) -> HashMap<Sound, Arc<[u8]>> {
    let mut clips = HashMap::new();
    for sound in Sound::ALL {
        match read_clip(dir, sound) {
            Ok(bytes) => {
                debug!("loaded {} ({} bytes)", sound.file_name(), bytes.len());
                clips.insert(sound, bytes);
            }
            Err(e) => warn!("{e}; {:?} will be silent", sound),
        }
    }
    clips
}

fn read_clip(dir: &Path, sound: Sound) -> Result<Arc<[u8]>, AudioError> {
    let path = dir.join(sound.file_name());
    fs::read(&path)
        .map(Arc::from)
        .map_err(|source| AudioError::Io { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn file_names_are_distinct() {
        let names: HashSet<_> = Sound::ALL.iter().map(|s| s.file_name()).collect();
        assert_eq!(names.len(), Sound::ALL.len());
    }

    #[test]
    fn only_music_loops() {
        let looping: Vec<_> = Sound::ALL.into_iter().filter(|s| s.looping()).collect();
        assert_eq!(looping, vec![Sound::Music]);
    }

    #[test]
    fn missing_clip_is_io_error() {
        let dir = std::env::temp_dir().join("tetris-clone-no-sounds-here");
        match read_clip(&dir, Sound::Rotate) {
            Err(AudioError::Io { path, .. }) => assert!(path.ends_with("block-rotate.wav")),
            other => panic!("expected io error, got {:?}", other.map(|b| b.len())),
        }
    }

    #[test]
    fn missing_directory_loads_nothing() {
        let dir = std::env::temp_dir().join("tetris-clone-no-sounds-here");
        assert!(load_clips(&dir).is_empty());
    }
}
