//! Per-cycle effect selection.
//!
//! Each cycle boundary draws three independent choices from the injected
//! random source: which sound to play, which color to show and where the
//! arrow points. Intensity levels that cannot be read select nothing.

use rand::Rng;

use crate::utilities::config::Settings;
use crate::utilities::palette::CueColor;
use crate::utilities::sound_type::SOUND_CATALOG_SIZE;

pub const FULL_TURN_DEGREES: u16 = 360;

/// What the sink should do at the end of one countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EffectBundle {
    /// Index into the sound catalog.
    pub sound: Option<usize>,
    pub color: Option<CueColor>,
    /// Always in `0..360`.
    pub arrow_degrees: Option<u16>,
}

impl EffectBundle {
    pub fn is_empty(&self) -> bool {
        self.sound.is_none() && self.color.is_none() && self.arrow_degrees.is_none()
    }
}

pub fn select_effects<R: Rng + ?Sized>(settings: &Settings, rng: &mut R) -> EffectBundle {
    let sound = select_sound(settings.sound_level(), rng);
    let color = select_color(settings.color_level(), rng);
    let arrow_degrees = if settings.arrow_enabled {
        Some(rng.gen_range(0..FULL_TURN_DEGREES))
    } else {
        None
    };

    EffectBundle {
        sound,
        color,
        arrow_degrees,
    }
}

fn select_sound<R: Rng + ?Sized>(level: Option<u8>, rng: &mut R) -> Option<usize> {
    match level {
        None | Some(0) => None,
        Some(1) => Some(0),
        Some(level) => {
            let choices = usize::from(level).min(SOUND_CATALOG_SIZE);
            Some(rng.gen_range(0..choices))
        }
    }
}

fn select_color<R: Rng + ?Sized>(level: Option<u8>, rng: &mut R) -> Option<CueColor> {
    match level {
        None | Some(0) => None,
        Some(level) => {
            let choices = usize::from(level).min(CueColor::ALL.len());
            Some(CueColor::ALL[rng.gen_range(0..choices)])
        }
    }
}
