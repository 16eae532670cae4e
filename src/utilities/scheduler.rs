//! Repeating random-length countdown.
//!
//! ```text
//! Idle --start()--> CountingDown --tick() at 0--> CountingDown (fresh duration)
//!   ^                    |
//!   +------stop()--------+
//! ```
//!
//! The scheduler owns its tick source. It does not spawn threads: the
//! caller either calls `tick()` directly or calls `poll()` with the current
//! time and lets the scheduler decide whether a tick is due.

use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info, warn};

use crate::utilities::config::{ConfigStore, Settings};
use crate::utilities::effects::{EffectBundle, select_effects};
use crate::utilities::error::SchedulerError;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Idle,
    CountingDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleState {
    pub remaining_seconds: u32,
    pub running: bool,
}

/// Everything the scheduler tells the outside world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerEvent {
    /// Seconds left in the current cycle, sent on start and on every tick
    /// that doesn't end the cycle.
    Countdown(u32),
    Fired(EffectBundle),
    /// Sent once per `stop()` that actually stopped something. Sinks reset
    /// rendered effects and release audio here.
    Stopped,
    /// The configuration couldn't produce a cycle; the scheduler is idle.
    Rejected(SchedulerError),
}

pub trait EffectSink {
    fn emit(&mut self, event: SchedulerEvent);
}

/// The single recurring tick. Dropping it is cancellation.
#[derive(Debug)]
struct TickSource {
    period: Duration,
    next_due: Instant,
}

impl TickSource {
    fn arm(period: Duration) -> Self {
        Self {
            period,
            next_due: Instant::now() + period,
        }
    }

    fn fire_if_due(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due += self.period;
        true
    }
}

pub struct CycleScheduler<R, S> {
    store: ConfigStore,
    rng: R,
    sink: S,
    state: CycleState,
    ticker: Option<TickSource>,
    period: Duration,
    cycles_completed: u64,
}

impl<R: Rng, S: EffectSink> CycleScheduler<R, S> {
    pub fn new(store: ConfigStore, rng: R, sink: S) -> Self {
        Self {
            store,
            rng,
            sink,
            state: CycleState::default(),
            ticker: None,
            period: TICK_PERIOD,
            cycles_completed: 0,
        }
    }

    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn phase(&self) -> CyclePhase {
        if self.state.running {
            CyclePhase::CountingDown
        } else {
            CyclePhase::Idle
        }
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// When the next tick is due, or `None` while idle.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.ticker.as_ref().map(|ticker| ticker.next_due)
    }

    /// Starts counting down. A no-op while a countdown is already running:
    /// there is never more than one tick source.
    pub fn start(&mut self) -> Result<(), SchedulerError> {
        if self.state.running {
            debug!("start ignored, already counting down");
            return Ok(());
        }
        let settings = self.store.snapshot();
        self.begin_cycle(&settings)
    }

    /// Advances the countdown by one second. Ignored while idle, so a tick
    /// that races a `stop()` has no effect.
    pub fn tick(&mut self) -> Result<(), SchedulerError> {
        if !self.state.running {
            return Ok(());
        }

        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
        if self.state.remaining_seconds > 0 {
            self.sink
                .emit(SchedulerEvent::Countdown(self.state.remaining_seconds));
            return Ok(());
        }

        self.ticker = None;
        let settings = self.store.snapshot();
        let bundle = select_effects(&settings, &mut self.rng);
        self.cycles_completed += 1;
        debug!(
            cycle = self.cycles_completed,
            silent = bundle.is_empty(),
            ?bundle,
            "cycle finished"
        );
        self.sink.emit(SchedulerEvent::Fired(bundle));

        self.begin_cycle(&settings)
    }

    /// Delivers a tick if one is due at `now`.
    pub fn poll(&mut self, now: Instant) -> Result<(), SchedulerError> {
        let due = self
            .ticker
            .as_mut()
            .is_some_and(|ticker| ticker.fire_if_due(now));
        if due { self.tick() } else { Ok(()) }
    }

    /// Cancels the countdown. Idempotent.
    pub fn stop(&mut self) {
        if !self.state.running {
            return;
        }
        self.ticker = None;
        self.state = CycleState::default();
        info!(cycles = self.cycles_completed, "countdown stopped");
        self.sink.emit(SchedulerEvent::Stopped);
    }

    fn begin_cycle(&mut self, settings: &Settings) -> Result<(), SchedulerError> {
        let (min, max) = match settings.duration_bounds() {
            Ok(bounds) => bounds,
            Err(err) => {
                self.ticker = None;
                self.state = CycleState::default();
                warn!(%err, "refusing to start a cycle");
                self.sink.emit(SchedulerEvent::Rejected(err.clone()));
                return Err(err);
            }
        };

        let duration = self.rng.gen_range(min..=max);
        self.state = CycleState {
            remaining_seconds: duration,
            running: true,
        };
        self.ticker = Some(TickSource::arm(self.period));
        info!(duration, min, max, "countdown started");
        self.sink.emit(SchedulerEvent::Countdown(duration));
        Ok(())
    }
}
