use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::utilities::error::SchedulerError;

pub const DEFAULT_MIN_SECONDS: u32 = 10;
pub const DEFAULT_MAX_SECONDS: u32 = 20;
pub const MAX_INTENSITY: u8 = 5;

/// User-editable settings, kept as the raw text the user typed so that a
/// half-edited value is stored as-is and only judged at a cycle boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub min_seconds: String,
    pub max_seconds: String,
    pub sound_intensity: String,
    pub color_intensity: String,
    pub arrow_enabled: bool,
    /// Display only; the scheduler never reads it.
    pub show_countdown: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_seconds: DEFAULT_MIN_SECONDS.to_string(),
            max_seconds: DEFAULT_MAX_SECONDS.to_string(),
            sound_intensity: "0".to_string(),
            color_intensity: "0".to_string(),
            arrow_enabled: false,
            show_countdown: true,
        }
    }
}

impl Settings {
    /// Parses and checks the countdown range. Inverted ranges are rejected,
    /// never clamped.
    pub fn duration_bounds(&self) -> Result<(u32, u32), SchedulerError> {
        let min = parse_seconds("min", &self.min_seconds)?;
        let max = parse_seconds("max", &self.max_seconds)?;
        if min > max {
            return Err(SchedulerError::invalid_range(format!(
                "min ({min}) is greater than max ({max})"
            )));
        }
        Ok((min, max))
    }

    pub fn sound_level(&self) -> Option<u8> {
        parse_intensity(&self.sound_intensity)
    }

    pub fn color_level(&self) -> Option<u8> {
        parse_intensity(&self.color_intensity)
    }
}

fn parse_seconds(label: &str, text: &str) -> Result<u32, SchedulerError> {
    text.trim().parse::<u32>().map_err(|_| {
        SchedulerError::invalid_range(format!(
            "{label} seconds {:?} is not a non-negative whole number",
            text
        ))
    })
}

/// `None` for anything outside `0..=5`, including text that isn't a number.
pub fn parse_intensity(text: &str) -> Option<u8> {
    text.trim()
        .parse::<u8>()
        .ok()
        .filter(|level| *level <= MAX_INTENSITY)
}

/// Shared handle to the one authoritative copy of the settings. The input
/// side writes through it at any time; the scheduler takes a snapshot at
/// each cycle boundary.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    inner: Arc<Mutex<Settings>>,
}

impl ConfigStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Arc::new(Mutex::new(settings)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Settings> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> Settings {
        self.lock().clone()
    }

    pub fn min_seconds(&self) -> String {
        self.lock().min_seconds.clone()
    }

    pub fn set_min_seconds(&self, value: impl Into<String>) {
        self.lock().min_seconds = value.into();
    }

    pub fn max_seconds(&self) -> String {
        self.lock().max_seconds.clone()
    }

    pub fn set_max_seconds(&self, value: impl Into<String>) {
        self.lock().max_seconds = value.into();
    }

    pub fn sound_intensity(&self) -> String {
        self.lock().sound_intensity.clone()
    }

    pub fn set_sound_intensity(&self, value: impl Into<String>) {
        self.lock().sound_intensity = value.into();
    }

    pub fn color_intensity(&self) -> String {
        self.lock().color_intensity.clone()
    }

    pub fn set_color_intensity(&self, value: impl Into<String>) {
        self.lock().color_intensity = value.into();
    }

    pub fn arrow_enabled(&self) -> bool {
        self.lock().arrow_enabled
    }

    pub fn set_arrow_enabled(&self, enabled: bool) {
        self.lock().arrow_enabled = enabled;
    }

    pub fn show_countdown(&self) -> bool {
        self.lock().show_countdown
    }

    pub fn set_show_countdown(&self, show: bool) {
        self.lock().show_countdown = show;
    }
}
