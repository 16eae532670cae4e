use crate::utilities::sound::{
    create_beep_sound, create_cowbell_sound, create_kick_sound, create_triangle_sound,
    create_wood_block_sound,
};

/// Number of slots in every sound catalog, built-in or loaded from disk.
pub const SOUND_CATALOG_SIZE: usize = SoundType::ALL.len();

/// Built-in cues, in catalog order. Slot 0 is the default cue played when
/// only one sound is enabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundType {
    Beep,
    Woodblock,
    Cowbell,
    Triangle,
    Kick,
}

impl SoundType {
    pub const ALL: [SoundType; 5] = [
        SoundType::Beep,
        SoundType::Woodblock,
        SoundType::Cowbell,
        SoundType::Triangle,
        SoundType::Kick,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn create_sound(&self) -> Vec<f32> {
        match self {
            SoundType::Beep => create_beep_sound(),
            SoundType::Woodblock => create_wood_block_sound(),
            SoundType::Cowbell => create_cowbell_sound(),
            SoundType::Triangle => create_triangle_sound(),
            SoundType::Kick => create_kick_sound(),
        }
    }
}
