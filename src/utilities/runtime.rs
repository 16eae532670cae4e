use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info, warn};

use crate::utilities::config::ConfigStore;
use crate::utilities::error::SchedulerError;
use crate::utilities::scheduler::{CycleScheduler, EffectSink};

enum Command {
    Start,
    Stop { done: Sender<()> },
    Shutdown,
}

/// Owns the scheduler thread. Every transition runs on that one thread,
/// so ticks and user commands never overlap.
pub struct SchedulerHandle {
    tx: Sender<Command>,
    worker: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Spawns the scheduler thread. The sink is built on that thread, which
    /// lets it hold audio resources that can't cross threads.
    pub fn spawn<R, S, F>(
        store: ConfigStore,
        rng: R,
        tick_period: Duration,
        make_sink: F,
    ) -> io::Result<Self>
    where
        R: Rng + Send + 'static,
        S: EffectSink,
        F: FnOnce() -> S + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let worker = thread::Builder::new()
            .name("cue-scheduler".to_string())
            .spawn(move || {
                let scheduler =
                    CycleScheduler::new(store, rng, make_sink()).with_tick_period(tick_period);
                scheduler_loop(scheduler, rx);
            })?;

        Ok(Self {
            tx,
            worker: Some(worker),
        })
    }

    /// Range errors arrive through the sink; this only fails when the
    /// scheduler thread has died.
    pub fn start(&self) -> Result<(), SchedulerError> {
        self.tx.send(Command::Start).map_err(|_| {
            warn!("start requested but the scheduler thread is gone");
            SchedulerError::WorkerGone
        })
    }

    /// Returns once the scheduler has stopped; no tick is delivered after.
    pub fn stop(&self) {
        let (done, stopped) = mpsc::channel();
        if self.tx.send(Command::Stop { done }).is_ok() {
            let _ = stopped.recv();
        }
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        let _ = self.tx.send(Command::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn scheduler_loop<R: Rng, S: EffectSink>(
    mut scheduler: CycleScheduler<R, S>,
    rx: Receiver<Command>,
) {
    loop {
        let command = match scheduler.next_deadline() {
            Some(deadline) => {
                let wait = deadline.saturating_duration_since(Instant::now());
                match rx.recv_timeout(wait) {
                    Ok(command) => Some(command),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match rx.recv() {
                Ok(command) => Some(command),
                Err(_) => break,
            },
        };

        // Errors were already handed to the sink as `Rejected`.
        let outcome = match command {
            None => scheduler.poll(Instant::now()),
            Some(Command::Start) => scheduler.start(),
            Some(Command::Stop { done }) => {
                scheduler.stop();
                let _ = done.send(());
                Ok(())
            }
            Some(Command::Shutdown) => break,
        };
        if let Err(err) = outcome {
            debug!(%err, phase = ?scheduler.phase(), "scheduler went idle");
        }
    }

    scheduler.stop();
    info!(cycles = scheduler.cycles_completed(), "scheduler thread exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utilities::config::Settings;
    use crate::utilities::scheduler::SchedulerEvent;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::{Arc, Mutex};

    const PERIOD: Duration = Duration::from_millis(20);

    #[derive(Clone, Default)]
    struct SharedLog(Arc<Mutex<Vec<SchedulerEvent>>>);

    impl SharedLog {
        fn events(&self) -> Vec<SchedulerEvent> {
            self.0.lock().unwrap().clone()
        }
    }

    impl EffectSink for SharedLog {
        fn emit(&mut self, event: SchedulerEvent) {
            self.0.lock().unwrap().push(event);
        }
    }

    fn spawn(min: &str, max: &str) -> (SchedulerHandle, SharedLog, ConfigStore) {
        let store = ConfigStore::new(Settings {
            min_seconds: min.to_string(),
            max_seconds: max.to_string(),
            ..Settings::default()
        });
        let log = SharedLog::default();
        let sink = log.clone();
        let handle =
            SchedulerHandle::spawn(store.clone(), StdRng::seed_from_u64(1), PERIOD, move || sink)
                .unwrap();
        (handle, log, store)
    }

    fn fired(events: &[SchedulerEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, SchedulerEvent::Fired(_)))
            .count()
    }

    #[test]
    fn loops_until_stopped_and_then_stays_quiet() {
        let (handle, log, _store) = spawn("1", "1");
        handle.start().unwrap();
        thread::sleep(PERIOD * 10);
        handle.stop();

        let events = log.events();
        assert!(fired(&events) >= 2, "expected repeated cycles, got {events:?}");
        assert_eq!(events.last(), Some(&SchedulerEvent::Stopped));

        thread::sleep(PERIOD * 5);
        assert_eq!(log.events().len(), events.len());
    }

    #[test]
    fn repeated_start_keeps_a_single_countdown() {
        let (handle, log, _store) = spawn("50", "50");
        handle.start().unwrap();
        handle.start().unwrap();
        handle.start().unwrap();
        thread::sleep(PERIOD * 3 + PERIOD / 2);
        handle.stop();

        let countdowns: Vec<u32> = log
            .events()
            .iter()
            .filter_map(|e| match e {
                SchedulerEvent::Countdown(n) => Some(*n),
                _ => None,
            })
            .collect();
        assert_eq!(countdowns.first(), Some(&50));
        for pair in countdowns.windows(2) {
            assert_eq!(pair[0], pair[1] + 1, "double decrement in {countdowns:?}");
        }
    }

    #[test]
    fn invalid_range_is_reported_through_the_sink() {
        let (handle, log, store) = spawn("20", "10");
        handle.start().unwrap();
        handle.stop();
        assert!(matches!(log.events().as_slice(), [SchedulerEvent::Rejected(_)]));

        store.set_min_seconds("5");
        store.set_max_seconds("5");
        handle.start().unwrap();
        handle.stop();
        assert_eq!(
            &log.events()[1..],
            &[SchedulerEvent::Countdown(5), SchedulerEvent::Stopped]
        );
    }

    #[test]
    fn start_reports_a_dead_worker() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let handle = SchedulerHandle { tx, worker: None };
        assert_eq!(handle.start(), Err(SchedulerError::WorkerGone));
        handle.stop();
    }

    #[test]
    fn dropping_the_handle_stops_a_running_scheduler() {
        let (handle, log, _store) = spawn("30", "30");
        handle.start().unwrap();
        drop(handle);
        assert_eq!(log.events().last(), Some(&SchedulerEvent::Stopped));
    }
}
