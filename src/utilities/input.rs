use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::utilities::config::{ConfigStore, MAX_INTENSITY};
use crate::utilities::runtime::SchedulerHandle;
use crate::utilities::state::ViewState;

const MAX_FIELD_LEN: usize = 5;

/// The editable text fields, in focus order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    MinSeconds,
    MaxSeconds,
    Sounds,
    Colors,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::MinSeconds,
        Field::MaxSeconds,
        Field::Sounds,
        Field::Colors,
    ];

    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        let idx = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::MinSeconds => "Min seconds",
            Field::MaxSeconds => "Max seconds",
            Field::Sounds => "Sounds (0-5)",
            Field::Colors => "Colors (0-5)",
        }
    }

    pub fn read(&self, store: &ConfigStore) -> String {
        match self {
            Field::MinSeconds => store.min_seconds(),
            Field::MaxSeconds => store.max_seconds(),
            Field::Sounds => store.sound_intensity(),
            Field::Colors => store.color_intensity(),
        }
    }

    pub fn write(&self, store: &ConfigStore, value: String) {
        match self {
            Field::MinSeconds => store.set_min_seconds(value),
            Field::MaxSeconds => store.set_max_seconds(value),
            Field::Sounds => store.set_sound_intensity(value),
            Field::Colors => store.set_color_intensity(value),
        }
    }

    fn step_limit(&self) -> u32 {
        match self {
            Field::MinSeconds | Field::MaxSeconds => 99_999,
            Field::Sounds | Field::Colors => u32::from(MAX_INTENSITY),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

pub fn handle_key(
    key: KeyEvent,
    view: &mut ViewState,
    store: &ConfigStore,
    scheduler: &SchedulerHandle,
) -> KeyOutcome {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return KeyOutcome::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return KeyOutcome::Quit;
        }
        KeyCode::Char(' ') | KeyCode::Enter => toggle_running(view, scheduler),
        KeyCode::Tab => view.focus = view.focus.next(),
        KeyCode::BackTab => view.focus = view.focus.prev(),
        KeyCode::Char(digit) if digit.is_ascii_digit() => type_digit(view.focus, store, digit),
        KeyCode::Backspace => erase(view.focus, store),
        KeyCode::Up => step(view.focus, store, 1),
        KeyCode::Down => step(view.focus, store, -1),
        KeyCode::Char('a') => store.set_arrow_enabled(!store.arrow_enabled()),
        KeyCode::Char('c') => store.set_show_countdown(!store.show_countdown()),
        _ => {}
    }
    KeyOutcome::Continue
}

/// Flips `view.running` right away so a quick second press stops what the
/// first one started. A rejected start flips it back via `Rejected`.
fn toggle_running(view: &mut ViewState, scheduler: &SchedulerHandle) {
    if view.running {
        scheduler.stop();
        view.go_idle();
    } else {
        view.message = None;
        match scheduler.start() {
            Ok(()) => view.running = true,
            Err(err) => view.message = Some(err.to_string()),
        }
    }
}

fn type_digit(field: Field, store: &ConfigStore, digit: char) {
    let mut text = field.read(store);
    if text.len() < MAX_FIELD_LEN {
        text.push(digit);
        field.write(store, text);
    }
}

fn erase(field: Field, store: &ConfigStore) {
    let mut text = field.read(store);
    text.pop();
    field.write(store, text);
}

/// Arrow-key nudge. Text that isn't a number is treated as zero.
fn step(field: Field, store: &ConfigStore, delta: i64) {
    let current = field.read(store).trim().parse::<i64>().unwrap_or(0);
    let next = (current + delta).clamp(0, i64::from(field.step_limit()));
    field.write(store, next.to_string());
}
