use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use rodio::{Decoder, Source};
use tracing::debug;

use crate::utilities::config::Settings;
use crate::utilities::error::EffectError;
use crate::utilities::sound::SAMPLE_RATE;
use crate::utilities::sound_type::{SOUND_CATALOG_SIZE, SoundType};
use crate::utilities::state::ViewState;

/// Decoded audio for one catalog slot.
#[derive(Debug, Clone)]
pub struct Cue {
    pub channels: u16,
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

#[derive(Debug, Clone)]
pub enum CatalogSource {
    BuiltIn,
    /// `sound1.wav` through `sound5.wav` in this directory.
    Directory(PathBuf),
}

/// Sound catalog that decodes each slot on first use.
pub struct SoundCache {
    source: CatalogSource,
    slots: [Option<Cue>; SOUND_CATALOG_SIZE],
}

impl SoundCache {
    pub fn new(source: CatalogSource) -> Self {
        Self {
            source,
            slots: Default::default(),
        }
    }

    pub fn get_sound(&mut self, index: usize) -> Result<&Cue, EffectError> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(EffectError::UnknownSound(index))?;
        if slot.is_none() {
            let cue = match &self.source {
                CatalogSource::BuiltIn => built_in_cue(index)?,
                CatalogSource::Directory(dir) => load_cue(&sound_path(dir, index))?,
            };
            debug!(index, samples = cue.samples.len(), "cue loaded");
            *slot = Some(cue);
        }
        slot.as_ref().ok_or(EffectError::UnknownSound(index))
    }
}

pub fn sound_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("sound{}.wav", index + 1))
}

fn built_in_cue(index: usize) -> Result<Cue, EffectError> {
    let sound_type = SoundType::from_index(index).ok_or(EffectError::UnknownSound(index))?;
    Ok(Cue {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        samples: sound_type.create_sound(),
    })
}

fn load_cue(path: &Path) -> Result<Cue, EffectError> {
    let file = File::open(path).map_err(|source| EffectError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let decoder = Decoder::new(BufReader::new(file)).map_err(|source| EffectError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let channels = decoder.channels();
    let sample_rate = decoder.sample_rate();
    Ok(Cue {
        channels,
        sample_rate,
        samples: decoder.convert_samples::<f32>().collect(),
    })
}

/// Last frame drawn, so the display only repaints when something changed.
#[derive(Default)]
pub struct UICache {
    pub last_frame: Option<(ViewState, Settings)>,
}

impl UICache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the frame and reports whether it differs from the last one.
    pub fn refresh(&mut self, view: &ViewState, settings: &Settings) -> bool {
        let changed = self
            .last_frame
            .as_ref()
            .is_none_or(|(last_view, last_settings)| {
                last_view != view || last_settings != settings
            });
        if changed {
            self.last_frame = Some((view.clone(), settings.clone()));
        }
        changed
    }
}
