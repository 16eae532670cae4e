use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};
use tracing::debug;

use crate::utilities::cache::SoundCache;
use crate::utilities::error::EffectError;

enum CueOutput {
    Device {
        _stream: OutputStream,
        handle: OutputStreamHandle,
    },
    /// Sinks that are never attached to a device.
    #[cfg(test)]
    Idle,
}

impl CueOutput {
    fn new_sink(&self) -> Result<Sink, EffectError> {
        match self {
            CueOutput::Device { handle, .. } => Ok(Sink::try_new(handle)?),
            #[cfg(test)]
            CueOutput::Idle => Ok(Sink::new_idle().0),
        }
    }
}

/// Plays catalog cues on the default output device, one at a time.
///
/// The output stream is not `Send`, so a player has to be created on the
/// thread that uses it.
pub struct CuePlayer {
    output: CueOutput,
    catalog: SoundCache,
    volume: f32,
    current: Option<Sink>,
}

impl CuePlayer {
    /// `volume_percent` is clamped to 0..=100.
    pub fn try_new(catalog: SoundCache, volume_percent: u8) -> Result<Self, EffectError> {
        let (stream, handle) = OutputStream::try_default()?;
        Ok(Self::with_output(
            CueOutput::Device {
                _stream: stream,
                handle,
            },
            catalog,
            volume_percent,
        ))
    }

    fn with_output(output: CueOutput, catalog: SoundCache, volume_percent: u8) -> Self {
        Self {
            output,
            catalog,
            volume: f32::from(volume_percent.min(100)) / 100.0,
            current: None,
        }
    }

    #[cfg(test)]
    pub fn idle(catalog: SoundCache, volume_percent: u8) -> Self {
        Self::with_output(CueOutput::Idle, catalog, volume_percent)
    }

    #[cfg(test)]
    pub fn current_cue(&self) -> Option<&Sink> {
        self.current.as_ref()
    }

    /// Starts `index` without waiting for it to finish. Whatever was still
    /// playing is stopped first.
    pub fn play(&mut self, index: usize) -> Result<(), EffectError> {
        self.release();
        let cue = self.catalog.get_sound(index)?;
        let source = SamplesBuffer::new(cue.channels, cue.sample_rate, cue.samples.clone());

        let sink = self.output.new_sink()?;
        sink.set_volume(self.volume);
        sink.append(source);
        self.current = Some(sink);
        debug!(index, "cue playing");
        Ok(())
    }

    pub fn release(&mut self) {
        if let Some(sink) = self.current.take() {
            sink.stop();
        }
    }
}

impl Drop for CuePlayer {
    fn drop(&mut self) {
        self.release();
    }
}
