use std::fs::File;
use std::io::{self, BufWriter, Stdout, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use clap::Parser;
use crossterm::{
    cursor,
    event::{Event, KeyEventKind, poll, read},
    execute,
    style::ResetColor,
    terminal::{Clear, ClearType, disable_raw_mode, enable_raw_mode},
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::utilities::audio::CuePlayer;
use crate::utilities::cache::{CatalogSource, SoundCache, UICache};
use crate::utilities::config::{ConfigStore, DEFAULT_MAX_SECONDS, DEFAULT_MIN_SECONDS, Settings};
use crate::utilities::display::display_ui;
use crate::utilities::input::{KeyOutcome, handle_key};
use crate::utilities::runtime::SchedulerHandle;
use crate::utilities::scheduler::{SchedulerEvent, TICK_PERIOD};
use crate::utilities::sink::PresentationSink;
use crate::utilities::state::ViewState;

mod utilities;

/// Waits a random number of seconds, plays a cue, and does it again.
#[derive(Parser, Debug)]
#[command(name = "random-cue-timer", version)]
struct Args {
    /// Shortest countdown in seconds
    #[arg(long, default_value_t = DEFAULT_MIN_SECONDS)]
    min: u32,

    /// Longest countdown in seconds
    #[arg(long, default_value_t = DEFAULT_MAX_SECONDS)]
    max: u32,

    /// How many different sounds to pick from (0 = silent)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=5))]
    sounds: u8,

    /// How many different colors to pick from (0 = none)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=5))]
    colors: u8,

    /// Point an arrow in a random direction every cycle
    #[arg(long)]
    arrow: bool,

    /// Hide the countdown
    #[arg(long)]
    hide_countdown: bool,

    /// Directory holding sound1.wav .. sound5.wav; built-in cues otherwise
    #[arg(long)]
    sound_dir: Option<PathBuf>,

    /// Playback volume in percent
    #[arg(long, default_value_t = 80, value_parser = clap::value_parser!(u8).range(0..=100))]
    volume: u8,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs here (the terminal is taken by the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn settings(&self) -> Settings {
        Settings {
            min_seconds: self.min.to_string(),
            max_seconds: self.max.to_string(),
            sound_intensity: self.sounds.to_string(),
            color_intensity: self.colors.to_string(),
            arrow_enabled: self.arrow,
            show_countdown: !self.hide_countdown,
        }
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn open_player(source: CatalogSource, volume: u8) -> Option<CuePlayer> {
    match CuePlayer::try_new(SoundCache::new(source), volume) {
        Ok(player) => Some(player),
        Err(err) => {
            warn!(%err, "no audio output, running silently");
            None
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let store = ConfigStore::new(args.settings());
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let source = match &args.sound_dir {
        Some(dir) => CatalogSource::Directory(dir.clone()),
        None => CatalogSource::BuiltIn,
    };
    let volume = args.volume;

    let (ui_tx, ui_rx) = mpsc::channel();
    let scheduler = SchedulerHandle::spawn(store.clone(), rng, TICK_PERIOD, move || {
        PresentationSink::new(ui_tx, open_player(source, volume))
    })?;
    info!(?args, "timer ready");

    enable_raw_mode()?;
    let mut buffered_stdout = BufWriter::new(io::stdout());
    execute!(buffered_stdout, cursor::Hide, Clear(ClearType::All))?;

    let result = run_ui(&store, &scheduler, &ui_rx, &mut buffered_stdout);

    drop(scheduler);
    execute!(
        buffered_stdout,
        ResetColor,
        cursor::Show,
        Clear(ClearType::All),
        cursor::MoveTo(0, 0),
    )?;
    buffered_stdout.flush()?;
    disable_raw_mode()?;
    result?;

    println!("Random cue timer stopped. Goodbye!");
    Ok(())
}

fn run_ui(
    store: &ConfigStore,
    scheduler: &SchedulerHandle,
    ui_rx: &Receiver<SchedulerEvent>,
    writer: &mut BufWriter<Stdout>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut view = ViewState::new();
    let mut ui_cache = UICache::new();

    loop {
        for event in ui_rx.try_iter() {
            view.apply(event);
        }
        display_ui(&view, &store.snapshot(), &mut ui_cache, writer)?;

        if poll(Duration::from_millis(50))? {
            if let Event::Key(key_event) = read()? {
                if key_event.kind == KeyEventKind::Press
                    && handle_key(key_event, &mut view, store, scheduler) == KeyOutcome::Quit
                {
                    return Ok(());
                }
            }
        }
    }
}
