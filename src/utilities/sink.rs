use std::sync::mpsc::Sender;

use tracing::warn;

use crate::utilities::audio::CuePlayer;
use crate::utilities::scheduler::{EffectSink, SchedulerEvent};

/// Realizes scheduler events: audio is played right here on the scheduler
/// thread, everything visual is forwarded to the terminal.
pub struct PresentationSink {
    ui_tx: Sender<SchedulerEvent>,
    player: Option<CuePlayer>,
}

impl PresentationSink {
    /// `player` is `None` when no output device could be opened; the timer
    /// still runs, silently.
    pub fn new(ui_tx: Sender<SchedulerEvent>, player: Option<CuePlayer>) -> Self {
        Self { ui_tx, player }
    }
}

impl EffectSink for PresentationSink {
    fn emit(&mut self, event: SchedulerEvent) {
        match &event {
            SchedulerEvent::Fired(bundle) => {
                if let (Some(index), Some(player)) = (bundle.sound, self.player.as_mut()) {
                    if let Err(err) = player.play(index) {
                        warn!(index, %err, "failed to play cue");
                    }
                }
            }
            SchedulerEvent::Stopped => {
                if let Some(player) = self.player.as_mut() {
                    player.release();
                }
            }
            // A cue fired just before a rejection is left to finish.
            SchedulerEvent::Countdown(_) | SchedulerEvent::Rejected(_) => {}
        }

        // The terminal may already be gone during shutdown.
        let _ = self.ui_tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utilities::cache::{CatalogSource, SoundCache};
    use crate::utilities::config::{ConfigStore, Settings};
    use crate::utilities::effects::EffectBundle;
    use crate::utilities::runtime::SchedulerHandle;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    fn sound(index: usize) -> SchedulerEvent {
        SchedulerEvent::Fired(EffectBundle {
            sound: Some(index),
            ..EffectBundle::default()
        })
    }

    #[test]
    fn silent_sink_forwards_every_event() {
        let (tx, rx) = mpsc::channel();
        let mut sink = PresentationSink::new(tx, None);
        let bundle = EffectBundle {
            sound: Some(4),
            ..EffectBundle::default()
        };
        sink.emit(SchedulerEvent::Countdown(2));
        sink.emit(SchedulerEvent::Fired(bundle));
        sink.emit(SchedulerEvent::Stopped);

        let received: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            received,
            vec![
                SchedulerEvent::Countdown(2),
                SchedulerEvent::Fired(bundle),
                SchedulerEvent::Stopped,
            ]
        );
    }

    #[test]
    fn closed_terminal_channel_is_not_fatal() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut sink = PresentationSink::new(tx, None);
        sink.emit(SchedulerEvent::Countdown(1));
    }

    #[test]
    fn fired_cue_plays_until_stopped() {
        let (tx, _rx) = mpsc::channel();
        let player = CuePlayer::idle(SoundCache::new(CatalogSource::BuiltIn), 80);
        let mut sink = PresentationSink::new(tx, Some(player));

        sink.emit(sound(0));
        sink.emit(sound(4));
        let playing = sink.player.as_ref().and_then(CuePlayer::current_cue);
        assert_eq!(playing.map(|cue| cue.len()), Some(1));

        sink.emit(SchedulerEvent::Stopped);
        assert!(sink.player.as_ref().unwrap().current_cue().is_none());
    }

    #[test]
    fn playback_failure_is_forwarded_and_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = mpsc::channel();
        let catalog = SoundCache::new(CatalogSource::Directory(dir.path().into()));
        let player = CuePlayer::idle(catalog, 80);
        let mut sink = PresentationSink::new(tx, Some(player));

        sink.emit(sound(0));
        assert_eq!(rx.try_recv(), Ok(sound(0)));
        assert!(sink.player.as_ref().unwrap().current_cue().is_none());
    }

    #[test]
    fn missing_sound_files_do_not_stop_the_loop() {
        let dir = tempfile::tempdir().unwrap();
        let sound_dir = dir.path().to_path_buf();
        let store = ConfigStore::new(Settings {
            min_seconds: "1".to_string(),
            max_seconds: "1".to_string(),
            sound_intensity: "1".to_string(),
            ..Settings::default()
        });
        let period = Duration::from_millis(20);
        let (tx, rx) = mpsc::channel();
        let handle = SchedulerHandle::spawn(store, StdRng::seed_from_u64(3), period, move || {
            let catalog = SoundCache::new(CatalogSource::Directory(sound_dir));
            PresentationSink::new(tx, Some(CuePlayer::idle(catalog, 80)))
        })
        .unwrap();

        handle.start().unwrap();
        thread::sleep(period * 10);
        handle.stop();

        let events: Vec<_> = rx.try_iter().collect();
        let fired = events.iter().filter(|e| **e == sound(0)).count();
        assert!(fired >= 2, "expected the loop to keep firing, got {events:?}");
        assert_eq!(events.last(), Some(&SchedulerEvent::Stopped));
    }
}
