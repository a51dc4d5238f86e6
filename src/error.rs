use std::path::PathBuf;

use thiserror::Error;

/// Failures of the audio backend. Never reach the simulation: the sound
/// manager logs and drops them.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output available: {0}")]
    Stream(#[from] rodio::StreamError),

    #[error("could not start playback: {0}")]
    Play(#[from] rodio::PlayError),

    #[error("could not decode {file}: {source}")]
    Decode {
        file: &'static str,
        #[source]
        source: rodio::decoder::DecoderError,
    },

    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
