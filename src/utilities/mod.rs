pub mod audio;
pub mod cache;
pub mod config;
pub mod display;
pub mod effects;
pub mod error;
pub mod input;
pub mod palette;
pub mod runtime;
pub mod scheduler;
pub mod sink;
pub mod sound;
pub mod sound_type;
pub mod state;
