use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop the cycle loop. After a range error the scheduler is
/// idle and the user can correct the configuration and start again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("Please enter valid min and max values: {reason}")]
    InvalidRangeConfig { reason: String },

    #[error("the scheduler thread is no longer running")]
    WorkerGone,
}

impl SchedulerError {
    pub fn invalid_range(reason: impl Into<String>) -> Self {
        SchedulerError::InvalidRangeConfig {
            reason: reason.into(),
        }
    }
}

/// Failures while loading or playing a cue. These are logged and never
/// interrupt the countdown.
#[derive(Debug, Error)]
pub enum EffectError {
    #[error("sound {0} is not in the catalog")]
    UnknownSound(usize),

    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },

    #[error("audio output unavailable: {0}")]
    Stream(#[from] rodio::StreamError),

    #[error("could not start playback: {0}")]
    Play(#[from] rodio::PlayError),
}
