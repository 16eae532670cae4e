use crate::utilities::input::Field;
use crate::utilities::palette::CueColor;
use crate::utilities::scheduler::SchedulerEvent;

/// What the terminal shows, rebuilt from scheduler events. The scheduler
/// never touches this directly.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub running: bool,
    pub countdown: u32,
    pub color: Option<CueColor>,
    pub rotation_degrees: u16,
    pub show_arrow: bool,
    pub last_sound: Option<usize>,
    pub cycles: u32,
    pub message: Option<String>,
    pub focus: Field,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: SchedulerEvent) {
        match event {
            SchedulerEvent::Countdown(remaining) => {
                self.running = true;
                self.countdown = remaining;
            }
            SchedulerEvent::Fired(bundle) => {
                self.cycles = self.cycles.saturating_add(1);
                self.color = bundle.color;
                self.show_arrow = bundle.arrow_degrees.is_some();
                self.rotation_degrees = bundle.arrow_degrees.unwrap_or(0);
                self.last_sound = bundle.sound;
            }
            SchedulerEvent::Stopped => self.go_idle(),
            SchedulerEvent::Rejected(err) => {
                self.go_idle();
                self.message = Some(err.to_string());
            }
        }
    }

    /// Idle always renders neutral: no countdown, color or arrow.
    pub fn go_idle(&mut self) {
        self.running = false;
        self.countdown = 0;
        self.color = None;
        self.rotation_degrees = 0;
        self.show_arrow = false;
    }

    /// Countdown text; blank while idle and once a cycle hits zero.
    pub fn countdown_label(&self) -> String {
        if self.running && self.countdown > 0 {
            self.countdown.to_string()
        } else {
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utilities::effects::EffectBundle;
    use crate::utilities::error::SchedulerError;

    #[test]
    fn fired_bundle_updates_rendered_effects() {
        let mut view = ViewState::new();
        view.apply(SchedulerEvent::Countdown(3));
        view.apply(SchedulerEvent::Fired(EffectBundle {
            sound: Some(2),
            color: Some(CueColor::Blue),
            arrow_degrees: Some(270),
        }));

        assert_eq!(view.color, Some(CueColor::Blue));
        assert_eq!(view.rotation_degrees, 270);
        assert!(view.show_arrow);
        assert_eq!(view.last_sound, Some(2));
        assert_eq!(view.cycles, 1);
    }

    #[test]
    fn stop_resets_color_and_arrow() {
        let mut view = ViewState::new();
        view.apply(SchedulerEvent::Countdown(3));
        view.apply(SchedulerEvent::Fired(EffectBundle {
            sound: None,
            color: Some(CueColor::Red),
            arrow_degrees: Some(90),
        }));
        view.apply(SchedulerEvent::Stopped);

        assert!(!view.running);
        assert_eq!(view.countdown_label(), "");
        assert_eq!(view.color, None);
        assert_eq!(view.rotation_degrees, 0);
        assert!(!view.show_arrow);
    }

    #[test]
    fn rejection_shows_the_message() {
        let mut view = ViewState::new();
        view.apply(SchedulerEvent::Rejected(SchedulerError::invalid_range(
            "min (20) is greater than max (10)",
        )));
        assert!(!view.running);
        assert!(view.message.as_deref().unwrap().starts_with("Please enter valid"));
    }

    #[test]
    fn rejection_at_a_boundary_clears_the_last_cue() {
        let mut view = ViewState::new();
        view.apply(SchedulerEvent::Countdown(1));
        view.apply(SchedulerEvent::Fired(EffectBundle {
            sound: Some(0),
            color: Some(CueColor::Green),
            arrow_degrees: Some(45),
        }));
        view.apply(SchedulerEvent::Rejected(SchedulerError::invalid_range(
            "min (9) is greater than max (3)",
        )));

        assert!(!view.running);
        assert_eq!(view.color, None);
        assert_eq!(view.rotation_degrees, 0);
        assert!(!view.show_arrow);
        assert_eq!(view.cycles, 1);
        assert!(view.message.is_some());
    }

    #[test]
    fn countdown_label_is_blank_at_zero() {
        let mut view = ViewState::new();
        assert_eq!(view.countdown_label(), "");
        view.apply(SchedulerEvent::Countdown(7));
        assert_eq!(view.countdown_label(), "7");
        view.apply(SchedulerEvent::Countdown(0));
        assert_eq!(view.countdown_label(), "");
    }
}
